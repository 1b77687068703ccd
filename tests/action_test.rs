use async_trait::async_trait;
use kube_toolkit::config::cli::{HelmConfig, KopsConfig, MinikubeConfig, SkaffoldConfig};
use kube_toolkit::domain::model::Paths;
use kube_toolkit::domain::ports::{Action, ActionContext, ProcessRunner};
use kube_toolkit::utils::error::Result;
use kube_toolkit::{GithubWorkflow, HelmAction, KopsAction, Manifest, MinikubeAction, SkaffoldAction};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;

#[derive(Clone)]
struct RecordingRunner {
    calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    capture_output: String,
}

impl RecordingRunner {
    fn new(capture_output: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            capture_output: capture_output.to_string(),
        }
    }

    async fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ProcessRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<()> {
        self.calls
            .lock()
            .await
            .push((program.to_string(), args.to_vec()));
        Ok(())
    }

    async fn run_capture(&self, program: &str, args: &[String]) -> Result<String> {
        self.calls
            .lock()
            .await
            .push((program.to_string(), args.to_vec()));
        Ok(self.capture_output.clone())
    }
}

struct Fixture {
    _temp: TempDir,
    paths: Paths,
    env_file: PathBuf,
    output_file: PathBuf,
    workflow: GithubWorkflow,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let home_dir = temp.path().join("home");
        let workspace_dir = temp.path().join("workspace");
        fs::create_dir_all(&home_dir).unwrap();
        fs::create_dir_all(&workspace_dir).unwrap();

        let env_file = temp.path().join("github_env");
        let output_file = temp.path().join("github_output");
        let workflow = GithubWorkflow::new(
            Some(env_file.clone()),
            Some(temp.path().join("github_path")),
            Some(output_file.clone()),
        );

        let paths = Paths {
            bin_dir: workspace_dir.join("bin"),
            home_dir,
            workspace_dir,
        };

        Self {
            _temp: temp,
            paths,
            env_file,
            output_file,
            workflow,
        }
    }

    fn context<'a>(&'a self, runner: &'a RecordingRunner) -> ActionContext<'a> {
        ActionContext {
            runner,
            workflow: &self.workflow,
            paths: &self.paths,
        }
    }
}

#[tokio::test]
async fn kops_exports_kubecfg_before_running_the_command() {
    let fixture = Fixture::new();
    let runner = RecordingRunner::new("");
    let action = KopsAction::new(
        KopsConfig {
            kops_version: Some("1.18.2".to_string()),
            cluster_name: "ci.k8s.local".to_string(),
            state_store: "s3://kops-state".to_string(),
            kubeconfig: Some("/tmp/kubeconfig".to_string()),
            command: Some("update cluster --yes".to_string()),
        },
        &Manifest::default(),
    )
    .unwrap();

    action.run(&fixture.context(&runner)).await.unwrap();

    let calls = runner.calls().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "kops");
    assert_eq!(calls[0].1, vec!["export", "kubecfg"]);
    assert_eq!(
        calls[1].1,
        vec!["update", "cluster", "--yes", "--kubeconfig=/tmp/kubeconfig"]
    );
}

#[tokio::test]
async fn helm_updates_repositories_when_the_config_exists() {
    let fixture = Fixture::new();
    let repo_config = fixture.paths.workspace_dir.join("repositories.yaml");
    fs::write(&repo_config, "repositories: []\n").unwrap();

    let runner = RecordingRunner::new("");
    let action = HelmAction::new(
        HelmConfig {
            helm_version: Some("3.2.4".to_string()),
            helmfile_version: None,
            helm_command: Some("upgrade --install app ./chart".to_string()),
            helmfile_command: None,
            repository_config: Some("repositories.yaml".to_string()),
            helmfile_config: None,
            environment: None,
            interactive: None,
            kube_context: None,
            log_level: None,
        },
        &Manifest::default(),
    )
    .unwrap();

    action.run(&fixture.context(&runner)).await.unwrap();

    let calls = runner.calls().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "helm");
    assert_eq!(calls[0].1[..2], ["repo".to_string(), "update".to_string()]);
    assert!(calls[0].1[2] == "--repository-config");
    assert_eq!(calls[1].0, "helm");
    assert_eq!(
        calls[1].1[..4],
        [
            "upgrade".to_string(),
            "--install".to_string(),
            "app".to_string(),
            "./chart".to_string()
        ]
    );
    // Repository flags ride along on the helm command too.
    assert!(calls[1].1.contains(&"--repository-config".to_string()));
}

#[tokio::test]
async fn helmfile_command_takes_precedence_and_carries_global_flags() {
    let fixture = Fixture::new();
    let helmfile_config = fixture.paths.workspace_dir.join("helmfile.yaml");
    fs::write(&helmfile_config, "releases: []\n").unwrap();

    let runner = RecordingRunner::new("");
    let action = HelmAction::new(
        HelmConfig {
            helm_version: None,
            helmfile_version: None,
            helm_command: Some("version".to_string()),
            helmfile_command: Some("sync".to_string()),
            repository_config: None,
            helmfile_config: Some("helmfile.yaml".to_string()),
            environment: Some("staging".to_string()),
            interactive: None,
            kube_context: None,
            log_level: None,
        },
        &Manifest::default(),
    )
    .unwrap();

    action.run(&fixture.context(&runner)).await.unwrap();

    let calls = runner.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "helmfile");
    assert_eq!(calls[0].1[0], "--environment=staging");
    assert!(calls[0].1.contains(&"--file".to_string()));
    assert_eq!(calls[0].1.last().unwrap(), "sync");
}

#[tokio::test]
async fn minikube_publishes_the_cluster_ip_and_docker_environment() {
    let fixture = Fixture::new();
    let runner = RecordingRunner::new("192.168.49.2");
    let action = MinikubeAction::new(
        MinikubeConfig {
            minikube_version: None,
            kubernetes_version: None,
            profile: "ci".to_string(),
            addons: Some("ingress".to_string()),
            cpus: Some("2".to_string()),
            memory: None,
            nodes: None,
            network_plugin: None,
            wait: None,
            auto_update_drivers: None,
            interactive: None,
            delete_on_failure: None,
        },
        &Manifest::default(),
    )
    .unwrap();

    action.run(&fixture.context(&runner)).await.unwrap();

    let calls = runner.calls().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].1[0], "start");
    assert!(calls[0].1.contains(&"--addons=ingress".to_string()));
    assert_eq!(calls[1].1, vec!["ip"]);

    let env_content = fs::read_to_string(&fixture.env_file).unwrap();
    assert!(env_content.contains("DOCKER_HOST=tcp://192.168.49.2:2376\n"));
    assert!(env_content.contains("DOCKER_TLS_VERIFY=1\n"));
    assert!(env_content.contains("MINIKUBE_ACTIVE_DOCKERD=ci\n"));

    let output_content = fs::read_to_string(&fixture.output_file).unwrap();
    assert!(output_content.contains("ip=192.168.49.2\n"));
}

#[tokio::test]
async fn skaffold_build_republishes_json_output() {
    let fixture = Fixture::new();
    let runner = RecordingRunner::new(
        "{\n  \"builds\": [ {\"imageName\": \"app\", \"tag\": \"app:abc123\"} ]\n}",
    );
    let action = SkaffoldAction::new(
        SkaffoldConfig {
            skaffold_version: Some("1.12.1".to_string()),
            container_structure_test_version: None,
            command: "build".to_string(),
            build_image: None,
            cache_artifacts: None,
            default_repo: Some("gcr.io/ci".to_string()),
            filename: None,
            insecure_registries: None,
            kube_context: None,
            kubeconfig: None,
            namespace: None,
            profile: None,
            push: None,
            skip_tests: "false".to_string(),
            tag: None,
        },
        &Manifest::default(),
    )
    .unwrap();

    action.run(&fixture.context(&runner)).await.unwrap();

    let calls = runner.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "skaffold");
    assert_eq!(calls[0].1[0], "build");
    assert!(calls[0].1.iter().any(|a| a.starts_with("--cache-file=")));
    assert!(calls[0].1.contains(&"--default-repo=gcr.io/ci".to_string()));

    // The multiline JSON is compacted before being published.
    let output_content = fs::read_to_string(&fixture.output_file).unwrap();
    assert!(output_content.starts_with("build-result={\"builds\":"));
    assert!(output_content.contains("app:abc123"));
}

#[tokio::test]
async fn skaffold_non_build_commands_stream_instead_of_capturing() {
    let fixture = Fixture::new();
    let runner = RecordingRunner::new("should not be captured");
    let action = SkaffoldAction::new(
        SkaffoldConfig {
            skaffold_version: None,
            container_structure_test_version: None,
            command: "deploy --tail".to_string(),
            build_image: None,
            cache_artifacts: None,
            default_repo: None,
            filename: None,
            insecure_registries: None,
            kube_context: None,
            kubeconfig: None,
            namespace: None,
            profile: None,
            push: None,
            skip_tests: "true".to_string(),
            tag: None,
        },
        &Manifest::default(),
    )
    .unwrap();

    action.run(&fixture.context(&runner)).await.unwrap();

    let calls = runner.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1[..2], ["deploy".to_string(), "--tail".to_string()]);
    assert!(!fixture.output_file.exists());
}
