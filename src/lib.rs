pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{GithubWorkflow, ShellRunner};
pub use config::{Cli, Manifest, ToolCommand};
pub use core::actions::{HelmAction, KopsAction, MinikubeAction, SkaffoldAction};
pub use core::{Engine, Installer};
pub use domain::model::Paths;
pub use domain::ports::Action;
pub use utils::error::{Result, ToolkitError};
