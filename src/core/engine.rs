use crate::core::installer::Installer;
use crate::domain::model::Paths;
use crate::domain::ports::{Action, ActionContext, ProcessRunner, Workflow};
use crate::utils::error::Result;
use std::fs;

/// Drives one action end to end: export the planned environment, create the
/// cache directories, install every download, then hand over to the action's
/// own run phase.
pub struct Engine<'a> {
    installer: Installer<'a>,
    runner: &'a dyn ProcessRunner,
    workflow: &'a dyn Workflow,
    paths: Paths,
}

impl<'a> Engine<'a> {
    pub fn new(
        installer: Installer<'a>,
        runner: &'a dyn ProcessRunner,
        workflow: &'a dyn Workflow,
        paths: Paths,
    ) -> Self {
        Self {
            installer,
            runner,
            workflow,
            paths,
        }
    }

    pub async fn run(&self, action: &dyn Action) -> Result<()> {
        tracing::info!("Preparing {} action", action.name());
        let plan = action.plan(&self.paths)?;

        for (name, value) in &plan.env {
            self.workflow.export_var(name, value)?;
        }
        for dir in &plan.dirs {
            tracing::debug!("Creating {}", dir.display());
            fs::create_dir_all(dir)?;
        }
        for download in &plan.downloads {
            self.installer.install(download).await?;
        }

        tracing::info!("Running {} action", action.name());
        let ctx = ActionContext {
            runner: self.runner,
            workflow: self.workflow,
            paths: &self.paths,
        };
        action.run(&ctx).await?;

        tracing::info!("{} action completed", action.name());
        Ok(())
    }
}
