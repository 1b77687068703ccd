use crate::config::cli::MinikubeConfig;
use crate::config::manifest::{defaults, resolve_version, Manifest};
use crate::core::actions::flag_args;
use crate::domain::model::{Arch, Download, InstallPlan, Paths, Platform};
use crate::domain::ports::{Action, ActionContext};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Installs minikube and a matching kubectl, starts a cluster, then
/// publishes the cluster IP as a step output and wires the job environment
/// for the in-cluster docker daemon.
pub struct MinikubeAction {
    config: MinikubeConfig,
    minikube_version: String,
    kubernetes_version: String,
    platform: Platform,
    arch: Arch,
}

impl MinikubeAction {
    pub fn new(config: MinikubeConfig, manifest: &Manifest) -> Result<Self> {
        let minikube_version = resolve_version(
            config.minikube_version.as_deref(),
            manifest.tools.minikube.as_deref(),
            defaults::MINIKUBE,
        );
        let kubernetes_version = resolve_version(
            config.kubernetes_version.as_deref(),
            manifest.tools.kubernetes.as_deref(),
            defaults::KUBERNETES,
        );
        Ok(Self {
            config,
            minikube_version,
            kubernetes_version,
            platform: Platform::current(),
            arch: Arch::current()?,
        })
    }

    fn minikube_url(&self) -> String {
        format!(
            "https://github.com/kubernetes/minikube/releases/download/v{}/minikube-{}-{}{}",
            self.minikube_version,
            self.platform.as_str(),
            self.arch.as_str(),
            self.platform.exe_suffix()
        )
    }

    fn kubectl_url(&self) -> String {
        format!(
            "https://storage.googleapis.com/kubernetes-release/release/v{}/bin/{}/{}/kubectl{}",
            self.kubernetes_version,
            self.platform.as_str(),
            self.arch.as_str(),
            self.platform.exe_suffix()
        )
    }

    // Profile selection rides on the MINIKUBE_PROFILE_NAME export, so no
    // --profile flag here.
    fn start_args(&self) -> Vec<String> {
        let kubernetes_version = Some(format!("v{}", self.kubernetes_version));
        let mut args = vec!["start".to_string(), "--embed-certs".to_string()];
        args.extend(flag_args(&[
            ("auto-update-drivers", &self.config.auto_update_drivers),
            ("cpus", &self.config.cpus),
            ("delete-on-failure", &self.config.delete_on_failure),
            ("interactive", &self.config.interactive),
            ("kubernetes-version", &kubernetes_version),
            ("memory", &self.config.memory),
            ("network-plugin", &self.config.network_plugin),
            ("nodes", &self.config.nodes),
            ("wait", &self.config.wait),
        ]));
        // One --addons flag per entry of the comma-separated input.
        if let Some(addons) = &self.config.addons {
            args.extend(
                addons
                    .split(',')
                    .map(str::trim)
                    .filter(|addon| !addon.is_empty())
                    .map(|addon| format!("--addons={}", addon)),
            );
        }
        args
    }
}

#[async_trait]
impl Action for MinikubeAction {
    fn name(&self) -> &'static str {
        "minikube"
    }

    fn plan(&self, paths: &Paths) -> Result<InstallPlan> {
        let minikube_home = paths.home_dir.join(".minikube");
        let suffix = self.platform.exe_suffix();
        Ok(InstallPlan {
            env: vec![
                (
                    "MINIKUBE_PROFILE_NAME".to_string(),
                    self.config.profile.clone(),
                ),
                (
                    "MINIKUBE_HOME".to_string(),
                    minikube_home.display().to_string(),
                ),
            ],
            dirs: vec![minikube_home.join("cache")],
            downloads: vec![
                Download::new(self.minikube_url(), format!("minikube{}", suffix)),
                Download::new(self.kubectl_url(), format!("kubectl{}", suffix)),
            ],
        })
    }

    async fn run(&self, ctx: &ActionContext<'_>) -> Result<()> {
        ctx.runner.run("minikube", &self.start_args()).await?;

        let ip = ctx
            .runner
            .run_capture("minikube", &["ip".to_string()])
            .await?;
        tracing::info!("Cluster is up at {}", ip);

        let cert_path = ctx.paths.home_dir.join(".minikube").join("certs");
        ctx.workflow
            .export_var("DOCKER_HOST", &format!("tcp://{}:2376", ip))?;
        ctx.workflow.export_var("DOCKER_TLS_VERIFY", "1")?;
        ctx.workflow
            .export_var("DOCKER_CERT_PATH", &cert_path.display().to_string())?;
        ctx.workflow
            .export_var("MINIKUBE_ACTIVE_DOCKERD", &self.config.profile)?;
        ctx.workflow.set_output("ip", &ip)?;

        Ok(())
    }
}
