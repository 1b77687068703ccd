pub mod cli;
pub mod manifest;

pub use cli::{Cli, HelmConfig, KopsConfig, MinikubeConfig, SkaffoldConfig, ToolCommand};
pub use manifest::Manifest;
