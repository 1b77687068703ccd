use crate::config::cli::KopsConfig;
use crate::config::manifest::{resolve_optional_version, Manifest};
use crate::core::actions::{flag_args, non_empty, split_command};
use crate::domain::model::{Arch, Download, InstallPlan, Paths, Platform};
use crate::domain::ports::{Action, ActionContext};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Installs kops, points it at the cluster via environment variables,
/// exports the cluster kubecfg, then runs the requested kops command.
pub struct KopsAction {
    config: KopsConfig,
    release_tag: String,
    platform: Platform,
    arch: Arch,
}

impl KopsAction {
    pub fn new(config: KopsConfig, manifest: &Manifest) -> Result<Self> {
        // No pinned version means tracking the latest release tag.
        let release_tag =
            resolve_optional_version(config.kops_version.as_deref(), manifest.tools.kops.as_deref())
                .map(|version| format!("v{}", version))
                .unwrap_or_else(|| "latest".to_string());
        Ok(Self {
            config,
            release_tag,
            platform: Platform::current(),
            arch: Arch::current()?,
        })
    }

    fn kops_url(&self) -> String {
        format!(
            "https://github.com/kubernetes/kops/releases/download/{}/kops-{}-{}{}",
            self.release_tag,
            self.platform.as_str(),
            self.arch.as_str(),
            self.platform.exe_suffix()
        )
    }

    fn command_args(&self, command: &str) -> Vec<String> {
        let mut args = split_command(command);
        args.extend(flag_args(&[("kubeconfig", &self.config.kubeconfig)]));
        args
    }
}

#[async_trait]
impl Action for KopsAction {
    fn name(&self) -> &'static str {
        "kops"
    }

    fn plan(&self, _paths: &Paths) -> Result<InstallPlan> {
        Ok(InstallPlan {
            env: vec![
                (
                    "KOPS_CLUSTER_NAME".to_string(),
                    self.config.cluster_name.clone(),
                ),
                (
                    "KOPS_STATE_STORE".to_string(),
                    self.config.state_store.clone(),
                ),
            ],
            dirs: Vec::new(),
            downloads: vec![Download::new(
                self.kops_url(),
                format!("kops{}", self.platform.exe_suffix()),
            )],
        })
    }

    async fn run(&self, ctx: &ActionContext<'_>) -> Result<()> {
        ctx.runner
            .run("kops", &["export".to_string(), "kubecfg".to_string()])
            .await?;

        if let Some(command) = non_empty(&self.config.command) {
            ctx.runner.run("kops", &self.command_args(command)).await?;
        } else {
            tracing::info!("No kops command given; kubecfg exported only");
        }

        Ok(())
    }
}
