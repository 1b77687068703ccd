use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_integer, validate_url,
    validate_version, Validate,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Every input can be given as a CLI flag or, when running as a CI action,
/// as an `INPUT_*` environment variable set by the runner.
#[derive(Debug, Clone, Parser)]
#[command(name = "kube-toolkit")]
#[command(about = "Install Kubernetes tooling into a CI job and drive it from declarative inputs")]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true, env = "INPUT_VERBOSE")]
    pub verbose: bool,

    /// Optional tools.toml manifest pinning tool versions
    #[arg(long, global = true, env = "KUBE_TOOLKIT_MANIFEST")]
    pub manifest: Option<PathBuf>,

    #[command(subcommand)]
    pub command: ToolCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ToolCommand {
    /// Install helm and helmfile, then run a helm or helmfile command
    Helm(HelmConfig),
    /// Install kops, export cluster kubecfg, then run a kops command
    Kops(KopsConfig),
    /// Install minikube and kubectl, start a cluster, publish its IP
    Minikube(MinikubeConfig),
    /// Install skaffold (and container-structure-test), then run skaffold
    Skaffold(SkaffoldConfig),
}

#[derive(Debug, Clone, Args)]
pub struct HelmConfig {
    #[arg(long, env = "INPUT_HELM_VERSION")]
    pub helm_version: Option<String>,

    #[arg(long, env = "INPUT_HELMFILE_VERSION")]
    pub helmfile_version: Option<String>,

    /// Whitespace-separated helm arguments, e.g. "upgrade --install app ./chart"
    #[arg(long, env = "INPUT_HELM_COMMAND")]
    pub helm_command: Option<String>,

    /// Whitespace-separated helmfile arguments, e.g. "sync"
    #[arg(long, env = "INPUT_HELMFILE_COMMAND")]
    pub helmfile_command: Option<String>,

    /// Repository config path, relative to the workspace
    #[arg(long, env = "INPUT_REPOSITORY_CONFIG")]
    pub repository_config: Option<String>,

    /// Helmfile state file path, relative to the workspace
    #[arg(long, env = "INPUT_HELMFILE_CONFIG")]
    pub helmfile_config: Option<String>,

    #[arg(long, env = "INPUT_ENVIRONMENT")]
    pub environment: Option<String>,

    #[arg(long, env = "INPUT_INTERACTIVE")]
    pub interactive: Option<String>,

    #[arg(long, env = "INPUT_KUBE_CONTEXT")]
    pub kube_context: Option<String>,

    #[arg(long, env = "INPUT_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct KopsConfig {
    /// Release version; omit to track the latest release
    #[arg(long, env = "INPUT_KOPS_VERSION")]
    pub kops_version: Option<String>,

    #[arg(long, env = "INPUT_CLUSTER_NAME")]
    pub cluster_name: String,

    /// State store URL, e.g. s3://kops-state
    #[arg(long, env = "INPUT_STATE_STORE")]
    pub state_store: String,

    #[arg(long, env = "INPUT_KUBECONFIG")]
    pub kubeconfig: Option<String>,

    /// Whitespace-separated kops arguments, e.g. "update cluster --yes"
    #[arg(long, env = "INPUT_COMMAND")]
    pub command: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct MinikubeConfig {
    #[arg(long, env = "INPUT_MINIKUBE_VERSION")]
    pub minikube_version: Option<String>,

    #[arg(long, env = "INPUT_KUBERNETES_VERSION")]
    pub kubernetes_version: Option<String>,

    #[arg(long, env = "INPUT_PROFILE", default_value = "minikube")]
    pub profile: String,

    /// Comma-separated addon names to enable
    #[arg(long, env = "INPUT_ADDONS")]
    pub addons: Option<String>,

    #[arg(long, env = "INPUT_CPUS")]
    pub cpus: Option<String>,

    #[arg(long, env = "INPUT_MEMORY")]
    pub memory: Option<String>,

    #[arg(long, env = "INPUT_NODES")]
    pub nodes: Option<String>,

    #[arg(long, env = "INPUT_NETWORK_PLUGIN")]
    pub network_plugin: Option<String>,

    #[arg(long, env = "INPUT_WAIT")]
    pub wait: Option<String>,

    #[arg(long, env = "INPUT_AUTO_UPDATE_DRIVERS")]
    pub auto_update_drivers: Option<String>,

    #[arg(long, env = "INPUT_INTERACTIVE")]
    pub interactive: Option<String>,

    #[arg(long, env = "INPUT_DELETE_ON_FAILURE")]
    pub delete_on_failure: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct SkaffoldConfig {
    #[arg(long, env = "INPUT_SKAFFOLD_VERSION")]
    pub skaffold_version: Option<String>,

    #[arg(long, env = "INPUT_CONTAINER_STRUCTURE_TEST_VERSION")]
    pub container_structure_test_version: Option<String>,

    /// Whitespace-separated skaffold arguments
    #[arg(long, env = "INPUT_COMMAND", default_value = "build")]
    pub command: String,

    #[arg(long, env = "INPUT_BUILD_IMAGE")]
    pub build_image: Option<String>,

    #[arg(long, env = "INPUT_CACHE_ARTIFACTS")]
    pub cache_artifacts: Option<String>,

    #[arg(long, env = "INPUT_DEFAULT_REPO")]
    pub default_repo: Option<String>,

    #[arg(long, env = "INPUT_FILENAME")]
    pub filename: Option<String>,

    #[arg(long, env = "INPUT_INSECURE_REGISTRIES")]
    pub insecure_registries: Option<String>,

    #[arg(long, env = "INPUT_KUBE_CONTEXT")]
    pub kube_context: Option<String>,

    #[arg(long, env = "INPUT_KUBECONFIG")]
    pub kubeconfig: Option<String>,

    #[arg(long, env = "INPUT_NAMESPACE")]
    pub namespace: Option<String>,

    #[arg(long, env = "INPUT_PROFILE")]
    pub profile: Option<String>,

    #[arg(long, env = "INPUT_PUSH")]
    pub push: Option<String>,

    /// "true" skips installing and wiring container-structure-test
    #[arg(long, env = "INPUT_SKIP_TESTS", default_value = "false")]
    pub skip_tests: String,

    #[arg(long, env = "INPUT_TAG")]
    pub tag: Option<String>,
}

fn validate_optional_version(field: &str, value: &Option<String>) -> Result<()> {
    match value {
        Some(v) if !v.is_empty() => validate_version(field, v),
        _ => Ok(()),
    }
}

impl Validate for HelmConfig {
    fn validate(&self) -> Result<()> {
        validate_optional_version("helm-version", &self.helm_version)?;
        validate_optional_version("helmfile-version", &self.helmfile_version)?;
        if let Some(path) = &self.repository_config {
            validate_path("repository-config", path)?;
        }
        if let Some(path) = &self.helmfile_config {
            validate_path("helmfile-config", path)?;
        }
        Ok(())
    }
}

impl Validate for KopsConfig {
    fn validate(&self) -> Result<()> {
        validate_optional_version("kops-version", &self.kops_version)?;
        validate_non_empty_string("cluster-name", &self.cluster_name)?;
        // Schemes of the state store backends kops supports.
        validate_url(
            "state-store",
            &self.state_store,
            &["s3", "gs", "azureblob", "swift", "do", "file"],
        )?;
        Ok(())
    }
}

impl Validate for MinikubeConfig {
    fn validate(&self) -> Result<()> {
        validate_optional_version("minikube-version", &self.minikube_version)?;
        validate_optional_version("kubernetes-version", &self.kubernetes_version)?;
        validate_non_empty_string("profile", &self.profile)?;
        if let Some(cpus) = &self.cpus {
            validate_positive_integer("cpus", cpus)?;
        }
        if let Some(nodes) = &self.nodes {
            validate_positive_integer("nodes", nodes)?;
        }
        Ok(())
    }
}

impl Validate for SkaffoldConfig {
    fn validate(&self) -> Result<()> {
        validate_optional_version("skaffold-version", &self.skaffold_version)?;
        validate_optional_version(
            "container-structure-test-version",
            &self.container_structure_test_version,
        )?;
        validate_non_empty_string("command", &self.command)?;
        Ok(())
    }
}

impl Validate for ToolCommand {
    fn validate(&self) -> Result<()> {
        match self {
            ToolCommand::Helm(config) => config.validate(),
            ToolCommand::Kops(config) => config.validate(),
            ToolCommand::Minikube(config) => config.validate(),
            ToolCommand::Skaffold(config) => config.validate(),
        }
    }
}
