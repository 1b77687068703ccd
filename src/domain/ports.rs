use crate::domain::model::{InstallPlan, Paths};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Channel back to the surrounding CI job: environment exports, PATH
/// additions, and step outputs.
pub trait Workflow: Send + Sync {
    fn export_var(&self, name: &str, value: &str) -> Result<()>;
    fn add_path(&self, dir: &Path) -> Result<()>;
    fn set_output(&self, name: &str, value: &str) -> Result<()>;
}

/// Runs external tools. `run` streams output to the job log; `run_capture`
/// returns trimmed stdout for republishing as an output variable.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<()>;
    async fn run_capture(&self, program: &str, args: &[String]) -> Result<String>;
}

/// Handles shared by the engine with a running action.
pub struct ActionContext<'a> {
    pub runner: &'a dyn ProcessRunner,
    pub workflow: &'a dyn Workflow,
    pub paths: &'a Paths,
}

/// One CI action: declare what to install, then drive the installed tool.
#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;

    /// Environment exports, directories, and downloads needed up front.
    fn plan(&self, paths: &Paths) -> Result<InstallPlan>;

    /// Invoked after every download in the plan has been installed.
    async fn run(&self, ctx: &ActionContext<'_>) -> Result<()>;
}
