//! Disable command handler

use anyhow::{Context, Result};
use freeze_orchestrator::{Action, TriggerOrchestrator};
use tracing::warn;

use crate::config::Config;
use crate::output::print_report;

/// Action run by `disable`
pub fn disable_action(delete_triggers: bool) -> Action {
    if delete_triggers {
        Action::SuspendAndPurge
    } else {
        Action::Suspend
    }
}

pub async fn handle_disable(
    orchestrator: &TriggerOrchestrator,
    config: &Config,
    delete_triggers: bool,
    terminate_builds: bool,
) -> Result<()> {
    if terminate_builds {
        warn!("Active builds termination currently not implemented and will be skipped.");
    }

    let action = disable_action(delete_triggers);
    let report = orchestrator
        .run(&config.target, action)
        .await
        .with_context(|| format!("Unable to {} triggers", action))?;

    print_report(action, &report);
    Ok(())
}
