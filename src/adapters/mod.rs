// Adapters layer: concrete implementations for external systems (the CI
// runner's control files and the host's process spawner).

pub mod runner;
pub mod workflow;

pub use runner::ShellRunner;
pub use workflow::GithubWorkflow;
