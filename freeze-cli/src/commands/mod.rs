//! Commands module
//!
//! Defines the CLI commands and their handlers.

mod disable;
mod enable;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Subcommand};
use freeze_client::{CodefreshClient, DEFAULT_HOST};
use freeze_orchestrator::config::DEFAULT_PAGE_SIZE;
use freeze_orchestrator::{OrchestratorConfig, TriggerOrchestrator};
use tracing::debug;

use crate::config::Config;

/// Flags shared by every command
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Pipeline to act on
    #[arg(long)]
    pub pipeline_id: Option<String>,

    /// Project whose pipelines are all acted on
    #[arg(long)]
    pub project_id: Option<String>,

    /// Codefresh API token
    #[arg(long, env = "CF_API_KEY", hide_env_values = true)]
    pub token: Option<String>,

    /// Codefresh API URL
    #[arg(long, env = "CF_URL", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Take the token and host from the Codefresh CLI config
    #[arg(long)]
    pub use_cfconfig: bool,

    /// Path to the Codefresh CLI config [default: ~/.cfconfig]
    #[arg(long)]
    pub cfconfig: Option<PathBuf>,

    /// Context of the Codefresh CLI config [default: its current context]
    #[arg(long)]
    pub cfconfig_context: Option<String>,

    /// Pipelines per listing page when acting on a project, 0 for unbounded
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u64,

    /// JSON log file [default: output-<unix-millis>.log]
    #[arg(long, conflicts_with = "no_log_file")]
    pub log_file: Option<PathBuf>,

    /// Do not write a JSON log file
    #[arg(long)]
    pub no_log_file: bool,
}

/// Top-level CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Disable the enabled triggers of the target pipelines
    Disable {
        #[command(flatten)]
        common: CommonArgs,

        /// Also delete the trigger registrations
        #[arg(long)]
        delete_triggers: bool,

        /// Terminate active builds (not implemented, skipped with a warning)
        #[arg(long)]
        terminate_builds: bool,
    },
    /// Restore the triggers disabled or deleted by a previous `disable`
    Enable {
        #[command(flatten)]
        common: CommonArgs,
    },
}

impl Commands {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Disable { common, .. } | Commands::Enable { common } => common,
        }
    }
}

/// Handle a CLI command
///
/// Resolves the configuration, builds the orchestrator and routes the
/// command to its handler.
pub async fn handle_command(command: Commands) -> Result<()> {
    let config = Config::resolve(command.common())?;
    debug!(
        "Resolved configuration: host={}, target={:?}, page_size={}",
        config.host, config.target, config.page_size
    );
    let orchestrator = build_orchestrator(&config);

    match command {
        Commands::Disable {
            delete_triggers,
            terminate_builds,
            ..
        } => {
            disable::handle_disable(&orchestrator, &config, delete_triggers, terminate_builds)
                .await
        }
        Commands::Enable { .. } => enable::handle_enable(&orchestrator, &config).await,
    }
}

fn build_orchestrator(config: &Config) -> TriggerOrchestrator {
    let client = CodefreshClient::new(config.host.as_str(), config.token.as_str());
    TriggerOrchestrator::new(
        Arc::new(client),
        OrchestratorConfig::default().with_page_size(config.page_size),
    )
}
