//! Designate CLI - resolve a deployment against a YAML registry and trigger Spinnaker

use clap::{Args, Parser, Subcommand};
use console::style;
use designate_repo::DEFAULT_API_URL;
use designate_spinnaker::DispatchMode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod exit_codes;

use error::{CliError, Result};

#[derive(Parser)]
#[command(name = "designate")]
#[command(author = "Designate Contributors")]
#[command(version)]
#[command(about = "Resolve a deployment against a YAML registry and trigger Spinnaker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

/// Where the registry is read from
#[derive(Args, Debug, Clone)]
pub struct RegistryArgs {
    /// Registry repository (owner/repo)
    #[arg(long, env = "REGISTRY_REPO", required_unless_present = "registry_path")]
    pub registry_repo: Option<String>,

    /// Registry branch
    #[arg(long, env = "REGISTRY_BRANCH", required_unless_present = "registry_path")]
    pub registry_branch: Option<String>,

    /// GitHub token (takes precedence over GitHub App credentials)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub App id
    #[arg(long, env = "GITHUB_APP_ID")]
    pub github_app_id: Option<u64>,

    /// GitHub App private key (PEM, base64-encoded)
    #[arg(long, env = "GITHUB_APP_PRIVATE_KEY", hide_env_values = true)]
    pub github_app_private_key: Option<String>,

    /// GitHub API endpoint
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub github_api_url: String,

    /// Read the registry from a local checkout instead of GitHub
    #[arg(long, value_name = "DIR")]
    pub registry_path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an app, render its values and trigger its pipeline
    #[command(disable_version_flag = true)]
    Deploy {
        #[command(flatten)]
        registry: RegistryArgs,

        /// Helm chart to deploy
        #[arg(long)]
        chart: String,

        /// Pipeline (deployment method) to trigger
        #[arg(long)]
        pipeline: String,

        /// Target environment name
        #[arg(long)]
        environment: String,

        /// Version to deploy
        #[arg(long)]
        version: String,

        /// App name, as found in the registry
        #[arg(long)]
        name: String,

        /// How the trigger endpoint is addressed
        #[arg(long, env = "DESIGNATE_TRIGGER_MODE", default_value = "pipeline")]
        trigger_mode: DispatchMode,
    },

    /// Check that every registry document classifies
    Lint {
        #[command(flatten)]
        registry: RegistryArgs,
    },
}

fn main() {
    // Missing .env is fine
    dotenvy::dotenv().ok();
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(err) = run(cli) {
        tracing::debug!(code = err.code(), "command failed");
        eprintln!("{} {}", style("✗").red(), err);
        if let CliError::TemplateRendering { diagnostic, .. } = &err {
            eprintln!("{:?}", miette::Report::new(diagnostic.clone()));
        }
        std::process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    // One sequential pipeline, no parallel work
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::Deploy {
            registry,
            chart,
            pipeline,
            environment,
            version,
            name,
            trigger_mode,
        } => runtime.block_on(commands::deploy::run(
            &registry,
            &name,
            designate_core::DeploymentArgs::new(version, environment, pipeline, chart),
            trigger_mode,
        )),

        Commands::Lint { registry } => runtime.block_on(commands::lint::run(&registry)),
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
