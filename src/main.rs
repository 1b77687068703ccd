use clap::Parser;
use kube_toolkit::utils::error::ErrorSeverity;
use kube_toolkit::utils::{logger, validation::Validate};
use kube_toolkit::{
    Action, Cli, Engine, GithubWorkflow, HelmAction, Installer, KopsAction, Manifest,
    MinikubeAction, Paths, ShellRunner, SkaffoldAction, ToolCommand, ToolkitError,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if logger::running_in_ci() {
        logger::init_ci_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting kube-toolkit");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.command.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(cli).await {
        Ok(()) => {
            tracing::info!("✅ Action completed successfully");
            println!("✅ Action completed successfully");
        }
        Err(e) => {
            tracing::error!(
                "❌ Action failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<(), ToolkitError> {
    let manifest = Manifest::load_optional(cli.manifest.as_deref())?;
    let paths = Paths::from_env()?;
    let workflow = GithubWorkflow::from_env();
    let runner = ShellRunner;

    let action: Box<dyn Action> = match cli.command {
        ToolCommand::Helm(config) => Box::new(HelmAction::new(config, &manifest)?),
        ToolCommand::Kops(config) => Box::new(KopsAction::new(config, &manifest)?),
        ToolCommand::Minikube(config) => Box::new(MinikubeAction::new(config, &manifest)?),
        ToolCommand::Skaffold(config) => Box::new(SkaffoldAction::new(config, &manifest)?),
    };

    let installer = Installer::new(paths.bin_dir.clone(), &workflow);
    let engine = Engine::new(installer, &runner, &workflow, paths);
    engine.run(action.as_ref()).await
}
