//! Enable command handler

use anyhow::{Context, Result};
use freeze_orchestrator::{Action, TriggerOrchestrator};

use crate::config::Config;
use crate::output::print_report;

pub async fn handle_enable(orchestrator: &TriggerOrchestrator, config: &Config) -> Result<()> {
    let report = orchestrator
        .run(&config.target, Action::Restore)
        .await
        .context("Unable to restore triggers")?;

    print_report(Action::Restore, &report);
    Ok(())
}
