//! Netdeploy - deploy pre-built artifacts to configured networks
//!
//! Usage:
//!   netdeploy tasks                         # List registered tasks
//!   netdeploy deploy                        # Pick networks interactively
//!   netdeploy deploy --networks a,b         # Deploy to named networks
//!   netdeploy deploy --ci --stage testnet   # Unattended, every testnet network
//!
//! The deploy task is experimental and only registered when
//! `NETDEPLOY_ENABLE_EXPERIMENTAL_TASK_DEPLOY` is set.

mod interactive;
mod render;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use netdeploy_core::cancel::Cancellation;
use netdeploy_core::config::{CONFIG_FILE_NAME, ConfigStore};
use netdeploy_core::context::DeployContext;
use netdeploy_core::deploy::DeploymentReport;
use netdeploy_core::error::TaskError;
use netdeploy_core::feature::{ENABLE_DEPLOY_TASK_ENV, FeatureFlags};
use netdeploy_core::network::Stage;
use netdeploy_core::task::{DeployArgs, TASK_DEPLOY, TaskRegistry};

use crate::interactive::DialoguerPrompter;

/// Exit code when the invocation was interrupted
const EXIT_CANCELLED: i32 = 130;

#[derive(Parser)]
#[command(name = "netdeploy")]
#[command(about = "Deploy pre-built artifacts to configured networks", long_about = None)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered tasks
    Tasks,

    /// Deploy artifacts to networks
    Deploy(DeployCommand),
}

#[derive(Args)]
struct DeployCommand {
    /// Comma-separated networks; omit to choose interactively, pass "" for none
    #[arg(long, value_delimiter = ',')]
    networks: Option<Vec<String>>,

    /// Only deploy artifacts carrying one of these tags
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,

    /// Restrict networks to a stage (mainnet, testnet, sandbox)
    #[arg(long)]
    stage: Option<Stage>,

    /// Run without prompts; omitted networks mean every matching network
    #[arg(long)]
    ci: bool,

    /// Discard previous deployments first
    #[arg(long)]
    reset: bool,

    /// Output format
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

impl DeployCommand {
    fn to_args(&self) -> DeployArgs {
        DeployArgs {
            networks: self.networks.as_ref().map(|names| {
                names
                    .iter()
                    .map(|n| n.trim())
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
                    .collect()
            }),
            tags: self.tags.clone(),
            stage: self.stage,
            ci: self.ci,
            reset: self.reset,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "netdeploy={level},netdeploy_core={level},warn",
                    level = cli.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let registry = build_registry(&cli.config, &FeatureFlags::from_env())?;

    match cli.command {
        Commands::Tasks => {
            render::write_task_list(&mut std::io::stdout(), registry.all())?;
            if !registry.contains(TASK_DEPLOY) {
                println!();
                println!("Enable the deploy task with {}=1", ENABLE_DEPLOY_TASK_ENV);
            }
        }
        Commands::Deploy(command) => run_deploy(&registry, &command).await?,
    }

    Ok(())
}

/// Build the task registry. The config is only read when a task needs it.
fn build_registry(config_path: &Path, flags: &FeatureFlags) -> Result<TaskRegistry> {
    if !flags.deploy_task_enabled() {
        return Ok(TaskRegistry::new());
    }
    let store = ConfigStore::from_path(config_path);
    let config = store.load()?;
    let context = DeployContext::from_config(&config, &store, Arc::new(DialoguerPrompter::new()))?;
    Ok(TaskRegistry::with_builtin_tasks(flags, &context))
}

async fn run_deploy(registry: &TaskRegistry, command: &DeployCommand) -> Result<()> {
    let cancel = Cancellation::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling deployment");
            trigger.cancel();
        }
    });

    let args = serde_json::to_value(command.to_args())?;
    let value = match registry.run(TASK_DEPLOY, args, &cancel).await {
        Ok(value) => value,
        Err(TaskError::TaskNotFound(_)) => anyhow::bail!(
            "The deploy task is disabled. Set {}=1 to enable it.",
            ENABLE_DEPLOY_TASK_ENV
        ),
        Err(TaskError::Cancelled) => {
            eprintln!("Deployment cancelled.");
            // Blocking prompt threads may still wait on stdin
            std::process::exit(EXIT_CANCELLED);
        }
        Err(e) => return Err(e.into()),
    };

    let report: DeploymentReport = serde_json::from_value(value)?;
    let mut stdout = std::io::stdout();
    match command.format {
        OutputFormat::Table => render::write_report_table(&mut stdout, &report)?,
        OutputFormat::Json => render::write_report_json(&mut stdout, &report)?,
    }

    if report.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}
