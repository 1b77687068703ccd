use crate::domain::ports::Workflow;
use crate::utils::error::{Result, ToolkitError};
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Publishes environment variables, PATH entries, and step outputs through
/// the runner's control files (`GITHUB_ENV`, `GITHUB_PATH`, `GITHUB_OUTPUT`).
/// Exports also mutate this process's environment so the tools we spawn next
/// see them without waiting for the following job step. Outside a runner the
/// control files are absent and only the process environment is touched.
#[derive(Debug, Clone, Default)]
pub struct GithubWorkflow {
    env_file: Option<PathBuf>,
    path_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
}

impl GithubWorkflow {
    pub fn from_env() -> Self {
        Self {
            env_file: env::var_os("GITHUB_ENV").map(PathBuf::from),
            path_file: env::var_os("GITHUB_PATH").map(PathBuf::from),
            output_file: env::var_os("GITHUB_OUTPUT").map(PathBuf::from),
        }
    }

    pub fn new(
        env_file: Option<PathBuf>,
        path_file: Option<PathBuf>,
        output_file: Option<PathBuf>,
    ) -> Self {
        Self {
            env_file,
            path_file,
            output_file,
        }
    }

    fn append_line(file: &Path, line: &str) -> Result<()> {
        let mut handle = OpenOptions::new().create(true).append(true).open(file)?;
        writeln!(handle, "{}", line)?;
        Ok(())
    }

    /// Multiline values use the runner's heredoc form. The delimiter is
    /// unique per write and never a substring of the value, so a value
    /// carrying a previous delimiter cannot terminate the block early.
    fn unique_delimiter(value: &str) -> String {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        loop {
            let candidate = format!(
                "__KUBE_TOOLKIT_EOF_{}_{}__",
                std::process::id(),
                COUNTER.fetch_add(1, Ordering::Relaxed)
            );
            if !value.contains(&candidate) {
                return candidate;
            }
        }
    }

    fn format_env_entry(name: &str, value: &str) -> String {
        if value.contains('\n') {
            let delimiter = Self::unique_delimiter(value);
            format!("{}<<{}\n{}\n{}", name, delimiter, value, delimiter)
        } else {
            format!("{}={}", name, value)
        }
    }
}

impl Workflow for GithubWorkflow {
    fn export_var(&self, name: &str, value: &str) -> Result<()> {
        tracing::debug!("Exporting {}={}", name, value);
        env::set_var(name, value);
        if let Some(file) = &self.env_file {
            Self::append_line(file, &Self::format_env_entry(name, value))?;
        }
        Ok(())
    }

    fn add_path(&self, dir: &Path) -> Result<()> {
        tracing::debug!("Prepending {} to PATH", dir.display());

        let mut entries = vec![dir.to_path_buf()];
        if let Some(current) = env::var_os("PATH") {
            entries.extend(env::split_paths(&current));
        }
        let joined = env::join_paths(entries).map_err(|e| ToolkitError::ConfigError {
            message: format!("Cannot add {} to PATH: {}", dir.display(), e),
        })?;
        env::set_var("PATH", joined);

        if let Some(file) = &self.path_file {
            Self::append_line(file, &dir.display().to_string())?;
        }
        Ok(())
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        match &self.output_file {
            Some(file) => Self::append_line(file, &Self::format_env_entry(name, value))?,
            None => tracing::info!("Output {}={}", name, value),
        }
        Ok(())
    }
}
