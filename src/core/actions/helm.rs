use crate::config::cli::HelmConfig;
use crate::config::manifest::{defaults, resolve_version, Manifest};
use crate::core::actions::{flag_args, non_empty, split_command};
use crate::domain::model::{Arch, Download, InstallPlan, Paths, Platform};
use crate::domain::ports::{Action, ActionContext};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Installs helm and helmfile, refreshes chart repositories when a
/// repository config is present in the workspace, then runs either a
/// helmfile or a helm command.
pub struct HelmAction {
    config: HelmConfig,
    helm_version: String,
    helmfile_version: String,
    platform: Platform,
    arch: Arch,
}

impl HelmAction {
    pub fn new(config: HelmConfig, manifest: &Manifest) -> Result<Self> {
        let helm_version = resolve_version(
            config.helm_version.as_deref(),
            manifest.tools.helm.as_deref(),
            defaults::HELM,
        );
        let helmfile_version = resolve_version(
            config.helmfile_version.as_deref(),
            manifest.tools.helmfile.as_deref(),
            defaults::HELMFILE,
        );
        Ok(Self {
            config,
            helm_version,
            helmfile_version,
            platform: Platform::current(),
            arch: Arch::current()?,
        })
    }

    fn helm_url(&self) -> String {
        // Windows releases ship as zip, everything else as tar.gz.
        let extension = match self.platform {
            Platform::Windows => "zip",
            _ => "tar.gz",
        };
        format!(
            "https://get.helm.sh/helm-v{}-{}-{}.{}",
            self.helm_version,
            self.platform.as_str(),
            self.arch.as_str(),
            extension
        )
    }

    fn helmfile_url(&self) -> String {
        format!(
            "https://github.com/roboll/helmfile/releases/download/v{}/helmfile_{}_{}{}",
            self.helmfile_version,
            self.platform.as_str(),
            self.arch.as_str(),
            self.platform.exe_suffix()
        )
    }

    fn helmfile_global_args(&self) -> Vec<String> {
        flag_args(&[
            ("environment", &self.config.environment),
            ("interactive", &self.config.interactive),
            ("kube-context", &self.config.kube_context),
            ("log-level", &self.config.log_level),
        ])
    }

    /// `--repository-config <path>` when the configured file exists under
    /// the workspace, nothing otherwise.
    fn repository_args(&self, paths: &Paths) -> Vec<String> {
        match &self.config.repository_config {
            Some(relative) => {
                let path = paths.workspace_dir.join(relative);
                if path.is_file() {
                    vec!["--repository-config".to_string(), path.display().to_string()]
                } else {
                    tracing::debug!("No repository config at {}", path.display());
                    Vec::new()
                }
            }
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl Action for HelmAction {
    fn name(&self) -> &'static str {
        "helm"
    }

    fn plan(&self, paths: &Paths) -> Result<InstallPlan> {
        let cache_dir = paths.home_dir.join(".cache");
        let suffix = self.platform.exe_suffix();
        Ok(InstallPlan {
            env: vec![(
                "XDG_CACHE_HOME".to_string(),
                cache_dir.display().to_string(),
            )],
            dirs: vec![cache_dir.join("helm")],
            downloads: vec![
                Download::new(self.helm_url(), format!("helm{}", suffix)),
                Download::new(self.helmfile_url(), format!("helmfile{}", suffix)),
            ],
        })
    }

    async fn run(&self, ctx: &ActionContext<'_>) -> Result<()> {
        let repository_args = self.repository_args(ctx.paths);

        if !repository_args.is_empty() {
            let mut args = vec!["repo".to_string(), "update".to_string()];
            args.extend(repository_args.iter().cloned());
            ctx.runner.run("helm", &args).await?;
        }

        if let Some(command) = non_empty(&self.config.helmfile_command) {
            let mut args = self.helmfile_global_args();
            if let Some(relative) = &self.config.helmfile_config {
                let path = ctx.paths.workspace_dir.join(relative);
                if path.is_file() {
                    args.push("--file".to_string());
                    args.push(path.display().to_string());
                }
            }
            args.extend(split_command(command));
            ctx.runner.run("helmfile", &args).await?;
        } else if let Some(command) = non_empty(&self.config.helm_command) {
            let mut args = split_command(command);
            args.extend(repository_args);
            ctx.runner.run("helm", &args).await?;
        } else {
            tracing::info!("No helm or helmfile command given; install only");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config() -> HelmConfig {
        HelmConfig {
            helm_version: Some("3.2.4".to_string()),
            helmfile_version: Some("0.125.5".to_string()),
            helm_command: None,
            helmfile_command: None,
            repository_config: None,
            helmfile_config: None,
            environment: None,
            interactive: None,
            kube_context: None,
            log_level: None,
        }
    }

    fn paths() -> Paths {
        Paths {
            home_dir: PathBuf::from("/home/runner"),
            workspace_dir: PathBuf::from("/workspace"),
            bin_dir: PathBuf::from("/workspace/bin"),
        }
    }

    #[test]
    fn urls_follow_the_release_layout() {
        let action = HelmAction::new(config(), &Manifest::default()).unwrap();
        if action.platform == Platform::Linux && action.arch == Arch::Amd64 {
            assert_eq!(
                action.helm_url(),
                "https://get.helm.sh/helm-v3.2.4-linux-amd64.tar.gz"
            );
            assert_eq!(
                action.helmfile_url(),
                "https://github.com/roboll/helmfile/releases/download/v0.125.5/helmfile_linux_amd64"
            );
        }
    }

    #[test]
    fn plan_exports_cache_home_and_installs_both_binaries() {
        let action = HelmAction::new(config(), &Manifest::default()).unwrap();
        let plan = action.plan(&paths()).unwrap();

        assert_eq!(
            plan.env,
            vec![(
                "XDG_CACHE_HOME".to_string(),
                "/home/runner/.cache".to_string()
            )]
        );
        assert_eq!(plan.dirs, vec![PathBuf::from("/home/runner/.cache/helm")]);
        let names: Vec<&str> = plan
            .downloads
            .iter()
            .map(|d| d.bin_name.as_str())
            .collect();
        assert!(names.contains(&"helm") || names.contains(&"helm.exe"));
        assert_eq!(plan.downloads.len(), 2);
    }

    #[test]
    fn manifest_pin_applies_when_input_is_absent() {
        let manifest: Manifest = toml::from_str("[tools]\nhelm = \"3.6.0\"").unwrap();
        let mut cfg = config();
        cfg.helm_version = None;
        let action = HelmAction::new(cfg, &manifest).unwrap();
        assert_eq!(action.helm_version, "3.6.0");
    }

    #[test]
    fn helmfile_global_args_follow_the_input_table() {
        let mut cfg = config();
        cfg.environment = Some("production".to_string());
        cfg.log_level = Some("debug".to_string());
        let action = HelmAction::new(cfg, &Manifest::default()).unwrap();
        assert_eq!(
            action.helmfile_global_args(),
            vec!["--environment=production", "--log-level=debug"]
        );
    }

    #[test]
    fn missing_repository_config_produces_no_flags() {
        let mut cfg = config();
        cfg.repository_config = Some("does/not/exist.yaml".to_string());
        let action = HelmAction::new(cfg, &Manifest::default()).unwrap();
        assert!(action.repository_args(&paths()).is_empty());
    }
}
