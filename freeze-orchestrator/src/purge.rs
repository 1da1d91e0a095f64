//! Purge: delete the trigger registrations of a pipeline

use freeze_core::checkpoint::Checkpoint;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::report::PurgeOutcome;
use crate::{TriggerOrchestrator, first_error};

impl TriggerOrchestrator {
    /// Deletes every trigger registration of a pipeline
    ///
    /// Registrations are fetched with their event data, deleted concurrently,
    /// and only after all deletions succeeded are the full original objects
    /// stored as the deleted-triggers checkpoint. If a deletion fails, the
    /// ones that went through are not checkpointed.
    pub async fn purge(&self, pipeline_id: &str) -> Result<PurgeOutcome> {
        let registrations = self
            .gateway
            .list_pipeline_triggers(pipeline_id, true)
            .await?
            .unwrap_or_default();
        debug!(
            "Pipeline {}: triggers to be deleted: {:?}",
            pipeline_id, registrations
        );

        if registrations.is_empty() {
            info!(
                "Pipeline {}: there are no triggers, nothing to delete",
                pipeline_id
            );
            return Ok(PurgeOutcome::NothingToDo);
        }

        let events: Vec<String> = registrations.iter().map(|r| r.event.clone()).collect();
        info!(
            "Pipeline {}: following triggers will be deleted: {:?}",
            pipeline_id, events
        );

        let results = join_all(
            registrations
                .iter()
                .map(|r| self.gateway.delete_trigger(&r.event, pipeline_id)),
        )
        .await;

        let deleted = results.iter().filter(|r| r.is_ok()).count();
        if deleted < results.len() {
            warn!(
                "Pipeline {}: {} of {} triggers were deleted before a failure and are not checkpointed",
                pipeline_id,
                deleted,
                results.len()
            );
        }
        first_error(results)?;

        info!(
            "Pipeline {}: following triggers were deleted: {:?}",
            pipeline_id, events
        );

        let checkpoint = self
            .write_checkpoint(pipeline_id, &Checkpoint::DeletedTriggers(registrations))
            .await;

        Ok(PurgeOutcome::Purged { events, checkpoint })
    }
}
