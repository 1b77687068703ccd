use crate::domain::ports::ProcessRunner;
use crate::utils::error::{Result, ToolkitError};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Executes tools found on the (already updated) PATH.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

#[async_trait]
impl ProcessRunner for ShellRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<()> {
        tracing::info!("Running: {} {}", program, args.join(" "));
        let status = Command::new(program).args(args).status().await?;
        if status.success() {
            Ok(())
        } else {
            Err(ToolkitError::ExecError {
                program: program.to_string(),
                code: status.code(),
            })
        }
    }

    async fn run_capture(&self, program: &str, args: &[String]) -> Result<String> {
        tracing::info!("Running (captured): {} {}", program, args.join(" "));
        let output = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .await?;

        if !output.status.success() {
            return Err(ToolkitError::ExecError {
                program: program.to_string(),
                code: output.status.code(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
