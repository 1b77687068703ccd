use crate::config::cli::SkaffoldConfig;
use crate::config::manifest::{defaults, resolve_version, Manifest};
use crate::core::actions::{flag_args, split_command};
use crate::domain::model::{Arch, Download, InstallPlan, Paths, Platform};
use crate::domain::ports::{Action, ActionContext};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Installs skaffold (plus container-structure-test unless tests are
/// skipped) and runs the requested skaffold command against a persistent
/// cache file. Build output is captured and republished as a step output.
pub struct SkaffoldAction {
    config: SkaffoldConfig,
    skaffold_version: String,
    structure_test_version: String,
    platform: Platform,
    arch: Arch,
}

impl SkaffoldAction {
    pub fn new(config: SkaffoldConfig, manifest: &Manifest) -> Result<Self> {
        let skaffold_version = resolve_version(
            config.skaffold_version.as_deref(),
            manifest.tools.skaffold.as_deref(),
            defaults::SKAFFOLD,
        );
        let structure_test_version = resolve_version(
            config.container_structure_test_version.as_deref(),
            manifest.tools.container_structure_test.as_deref(),
            defaults::CONTAINER_STRUCTURE_TEST,
        );
        Ok(Self {
            config,
            skaffold_version,
            structure_test_version,
            platform: Platform::current(),
            arch: Arch::current()?,
        })
    }

    fn skaffold_url(&self) -> String {
        format!(
            "https://github.com/GoogleContainerTools/skaffold/releases/download/v{}/skaffold-{}-{}{}",
            self.skaffold_version,
            self.platform.as_str(),
            self.arch.as_str(),
            self.platform.exe_suffix()
        )
    }

    fn structure_test_url(&self) -> String {
        format!(
            "https://storage.googleapis.com/container-structure-test/v{}/container-structure-test-{}-{}",
            self.structure_test_version,
            self.platform.as_str(),
            self.arch.as_str()
        )
    }

    fn skip_tests(&self) -> bool {
        self.config.skip_tests == "true"
    }

    fn skaffold_args(&self, paths: &Paths) -> Vec<String> {
        let cache_file = paths.home_dir.join(".skaffold").join("cache");
        let mut args = split_command(&self.config.command);
        args.push(format!("--cache-file={}", cache_file.display()));
        args.extend(flag_args(&[
            ("build-image", &self.config.build_image),
            ("cache-artifacts", &self.config.cache_artifacts),
            ("default-repo", &self.config.default_repo),
            ("filename", &self.config.filename),
            ("insecure-registries", &self.config.insecure_registries),
            ("kube-context", &self.config.kube_context),
            ("kubeconfig", &self.config.kubeconfig),
            ("namespace", &self.config.namespace),
            ("profile", &self.config.profile),
            ("push", &self.config.push),
            ("skip-tests", &Some(self.config.skip_tests.clone())),
            ("tag", &self.config.tag),
        ]));
        args
    }

    fn is_build(&self) -> bool {
        split_command(&self.config.command)
            .iter()
            .any(|word| word == "build")
    }
}

#[async_trait]
impl Action for SkaffoldAction {
    fn name(&self) -> &'static str {
        "skaffold"
    }

    fn plan(&self, paths: &Paths) -> Result<InstallPlan> {
        let mut downloads = vec![Download::new(
            self.skaffold_url(),
            format!("skaffold{}", self.platform.exe_suffix()),
        )];
        if !self.skip_tests() {
            downloads.push(Download::new(
                self.structure_test_url(),
                format!("container-structure-test{}", self.platform.exe_suffix()),
            ));
        }
        Ok(InstallPlan {
            env: Vec::new(),
            dirs: vec![paths.home_dir.join(".skaffold")],
            downloads,
        })
    }

    async fn run(&self, ctx: &ActionContext<'_>) -> Result<()> {
        let args = self.skaffold_args(ctx.paths);

        if self.is_build() {
            // Republish the build result so later steps can consume the
            // produced image tags; JSON output is passed through compacted.
            let stdout = ctx.runner.run_capture("skaffold", &args).await?;
            let result = match serde_json::from_str::<serde_json::Value>(&stdout) {
                Ok(json) => serde_json::to_string(&json)?,
                Err(_) => stdout,
            };
            if !result.is_empty() {
                ctx.workflow.set_output("build-result", &result)?;
            }
        } else {
            ctx.runner.run("skaffold", &args).await?;
        }

        Ok(())
    }
}
