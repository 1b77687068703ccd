pub mod actions;
pub mod engine;
pub mod installer;

pub use crate::domain::model::{ArchiveKind, Download, InstallPlan, Paths};
pub use crate::domain::ports::{Action, ActionContext, ProcessRunner, Workflow};
pub use crate::utils::error::Result;
pub use engine::Engine;
pub use installer::Installer;
