use crate::utils::error::{Result, ToolkitError};
use std::env;
use std::path::PathBuf;
use url::Url;

/// Target OS segment used in release download URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Darwin,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Darwin
        } else {
            Platform::Linux
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Darwin => "darwin",
            Platform::Windows => "windows",
        }
    }

    /// Suffix appended to bare executable artifacts.
    pub fn exe_suffix(&self) -> &'static str {
        match self {
            Platform::Windows => ".exe",
            _ => "",
        }
    }
}

/// Architecture segment used in release download URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Amd64,
    Arm64,
}

impl Arch {
    pub fn current() -> Result<Self> {
        match env::consts::ARCH {
            "x86_64" => Ok(Arch::Amd64),
            "aarch64" => Ok(Arch::Arm64),
            other => Err(ToolkitError::ConfigError {
                message: format!("Unsupported host architecture: {}", other),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }
}

/// How a release artifact must be handled after download, decided from the
/// URL path the same way the tar/mv branch in CI shell scripts would.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
    Plain,
}

impl ArchiveKind {
    pub fn from_url(url: &str) -> Self {
        // Only the path decides; query strings must not confuse the match.
        let path = Url::parse(url)
            .map(|u| u.path().to_string())
            .unwrap_or_else(|_| url.to_string());

        if path.ends_with(".tar.gz") || path.ends_with(".tgz") || path.ends_with(".tar") {
            ArchiveKind::TarGz
        } else if path.ends_with(".zip") {
            ArchiveKind::Zip
        } else {
            ArchiveKind::Plain
        }
    }
}

/// One artifact to fetch and place into the bin directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub url: String,
    pub bin_name: String,
}

impl Download {
    pub fn new(url: impl Into<String>, bin_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bin_name: bin_name.into(),
        }
    }
}

/// Everything an action wants done before its tool is first invoked.
#[derive(Debug, Clone, Default)]
pub struct InstallPlan {
    pub env: Vec<(String, String)>,
    pub dirs: Vec<PathBuf>,
    pub downloads: Vec<Download>,
}

/// Well-known directories of the surrounding CI job.
#[derive(Debug, Clone)]
pub struct Paths {
    pub home_dir: PathBuf,
    pub workspace_dir: PathBuf,
    pub bin_dir: PathBuf,
}

impl Paths {
    /// Workspace comes from `GITHUB_WORKSPACE` when the runner provides it,
    /// otherwise the current directory; installed binaries land in
    /// `<workspace>/bin`.
    pub fn from_env() -> Result<Self> {
        let home_dir = env::var_os("HOME")
            .or_else(|| env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .ok_or_else(|| ToolkitError::ConfigError {
                message: "Neither HOME nor USERPROFILE is set".to_string(),
            })?;

        let workspace_dir = match env::var_os("GITHUB_WORKSPACE") {
            Some(dir) => PathBuf::from(dir),
            None => env::current_dir()?,
        };

        let bin_dir = workspace_dir.join("bin");

        Ok(Self {
            home_dir,
            workspace_dir,
            bin_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_kind_from_url() {
        assert_eq!(
            ArchiveKind::from_url("https://get.helm.sh/helm-v3.2.4-linux-amd64.tar.gz"),
            ArchiveKind::TarGz
        );
        assert_eq!(
            ArchiveKind::from_url("https://example.com/tool.tgz"),
            ArchiveKind::TarGz
        );
        assert_eq!(
            ArchiveKind::from_url("https://get.helm.sh/helm-v3.2.4-windows-amd64.zip"),
            ArchiveKind::Zip
        );
        assert_eq!(
            ArchiveKind::from_url(
                "https://github.com/kubernetes/kops/releases/download/latest/kops-linux-amd64"
            ),
            ArchiveKind::Plain
        );
    }

    #[test]
    fn archive_kind_ignores_query_string() {
        assert_eq!(
            ArchiveKind::from_url("https://example.com/tool?redirect=a.tar.gz"),
            ArchiveKind::Plain
        );
    }

    #[test]
    fn windows_gets_exe_suffix() {
        assert_eq!(Platform::Windows.exe_suffix(), ".exe");
        assert_eq!(Platform::Linux.exe_suffix(), "");
        assert_eq!(Platform::Darwin.as_str(), "darwin");
    }
}
