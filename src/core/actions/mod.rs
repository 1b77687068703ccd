pub mod helm;
pub mod kops;
pub mod minikube;
pub mod skaffold;

pub use helm::HelmAction;
pub use kops::KopsAction;
pub use minikube::MinikubeAction;
pub use skaffold::SkaffoldAction;

/// Maps a table of named inputs to `--name=value` flags, skipping unset and
/// empty entries.
pub(crate) fn flag_args(flags: &[(&str, &Option<String>)]) -> Vec<String> {
    flags
        .iter()
        .filter_map(|(name, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| format!("--{}={}", name, v))
        })
        .collect()
}

pub(crate) fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(String::from).collect()
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_table_skips_unset_and_empty() {
        let kube_context = Some("staging".to_string());
        let log_level = Some(String::new());
        let environment = None;
        let args = flag_args(&[
            ("kube-context", &kube_context),
            ("log-level", &log_level),
            ("environment", &environment),
        ]);
        assert_eq!(args, vec!["--kube-context=staging".to_string()]);
    }

    #[test]
    fn command_splitting_collapses_whitespace() {
        assert_eq!(
            split_command("upgrade  --install  app"),
            vec!["upgrade", "--install", "app"]
        );
        assert!(split_command("   ").is_empty());
    }
}
