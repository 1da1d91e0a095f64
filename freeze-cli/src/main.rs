//! Freeze CLI
//!
//! Command-line interface that suspends and restores the triggers of
//! Codefresh pipelines.

mod cfconfig;
mod commands;
mod config;
mod error;
mod logging;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use colored::*;
use commands::{Commands, handle_command};
use error::CliError;
use freeze_client::ClientError;
use freeze_orchestrator::OrchestratorError;

#[derive(Parser, Debug)]
#[command(name = "freeze")]
#[command(about = "Codefresh pipeline trigger freeze CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match command_error(&err) {
            Some(e) => return fail(&e.into()),
            None => err.exit(),
        },
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

async fn run(cli: Cli) -> Result<()> {
    logging::init(logging::log_file(cli.command.common()).as_deref())?;
    handle_command(cli.command).await
}

/// Maps a missing or unknown command to a validation error
///
/// Other parse failures (help, version, bad flags) are left to clap.
fn command_error(err: &clap::Error) -> Option<CliError> {
    match err.kind() {
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            Some(CliError::missing_command())
        }
        ErrorKind::InvalidSubcommand => match err.get(ContextKind::InvalidSubcommand) {
            Some(ContextValue::String(command)) => Some(CliError::unknown_command(command)),
            _ => Some(CliError::unknown_command("")),
        },
        _ => None,
    }
}

fn fail(err: &anyhow::Error) -> ExitCode {
    eprintln!("{} {}", format!("❌ {}:", error_kind(err)).red().bold(), format!("{:#}", err).red());
    ExitCode::FAILURE
}

/// Name of the first typed error in the chain
fn error_kind(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|cause| {
            if let Some(e) = cause.downcast_ref::<CliError>() {
                Some(e.kind())
            } else if let Some(e) = cause.downcast_ref::<OrchestratorError>() {
                Some(e.kind())
            } else {
                cause.downcast_ref::<ClientError>().map(ClientError::kind)
            }
        })
        .unwrap_or("Error")
}
