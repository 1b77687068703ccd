use crate::utils::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Built-in tool versions, used when neither the action input nor the
/// manifest pins one.
pub mod defaults {
    pub const HELM: &str = "3.2.4";
    pub const HELMFILE: &str = "0.125.5";
    pub const MINIKUBE: &str = "1.12.3";
    pub const KUBERNETES: &str = "1.18.8";
    pub const SKAFFOLD: &str = "1.12.1";
    pub const CONTAINER_STRUCTURE_TEST: &str = "1.9.1";
}

/// Optional `tools.toml` manifest pinning tool versions for a repository:
///
/// ```toml
/// [tools]
/// helm = "3.2.4"
/// minikube = "1.12.3"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub tools: PinnedVersions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PinnedVersions {
    pub helm: Option<String>,
    pub helmfile: Option<String>,
    pub kops: Option<String>,
    pub minikube: Option<String>,
    pub kubernetes: Option<String>,
    pub skaffold: Option<String>,
    pub container_structure_test: Option<String>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Missing manifest path means an empty manifest, not an error.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

/// Resolution order: explicit input, then manifest pin, then built-in default.
pub fn resolve_version(
    input: Option<&str>,
    pinned: Option<&str>,
    default: &str,
) -> String {
    input
        .filter(|v| !v.is_empty())
        .or(pinned)
        .unwrap_or(default)
        .to_string()
}

/// Like `resolve_version` but with no built-in fallback (kops tracks the
/// `latest` release tag when nothing is pinned).
pub fn resolve_optional_version(input: Option<&str>, pinned: Option<&str>) -> Option<String> {
    input
        .filter(|v| !v.is_empty())
        .or(pinned)
        .map(|v| v.to_string())
}
