//! Restore: undo suspend and purge from their checkpoints

use freeze_core::checkpoint::{Checkpoint, CheckpointKind};
use freeze_core::domain::annotation::Annotation;
use freeze_core::domain::pipeline::TriggerIds;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::report::{RecreateOutcome, ReenableOutcome, RestoreOutcome};
use crate::{TriggerOrchestrator, first_error};

impl TriggerOrchestrator {
    /// Reverses a previous suspend and purge of a pipeline
    ///
    /// Annotations are listed once; re-enabling and re-creating then run
    /// concurrently on that snapshot. They use disjoint checkpoint keys.
    pub async fn restore(&self, pipeline_id: &str) -> Result<RestoreOutcome> {
        let annotations = self
            .gateway
            .list_annotations(pipeline_id, self.config.entity_type)
            .await?;

        let (reenable, recreate) = futures::join!(
            self.reenable_triggers(pipeline_id, &annotations),
            self.recreate_triggers(pipeline_id, &annotations)
        );

        Ok(RestoreOutcome {
            reenable: reenable?,
            recreate: recreate?,
        })
    }

    async fn reenable_triggers(
        &self,
        pipeline_id: &str,
        annotations: &[Annotation],
    ) -> Result<ReenableOutcome> {
        let keys = &self.config.checkpoint_keys;
        let git = keys.load(annotations, CheckpointKind::DisabledGitTriggers)?;
        let cron = keys.load(annotations, CheckpointKind::DisabledCronTriggers)?;

        if git.is_none() && cron.is_none() {
            info!(
                "Pipeline {}: there are no previously disabled triggers, nothing to enable",
                pipeline_id
            );
            return Ok(ReenableOutcome::NothingToDo);
        }

        let requested = TriggerIds {
            git: git
                .as_ref()
                .map(|c| c.trigger_ids().to_vec())
                .unwrap_or_default(),
            cron: cron
                .as_ref()
                .map(|c| c.trigger_ids().to_vec())
                .unwrap_or_default(),
        };
        info!(
            "Pipeline {}: following triggers will be enabled: git={:?} cron={:?}",
            pipeline_id, requested.git, requested.cron
        );

        let mut pipeline = self.gateway.get_pipeline(pipeline_id).await?;
        let enabled = pipeline.enable_triggers(&requested);
        warn_missing(pipeline_id, "git", &requested.git, &enabled.git);
        warn_missing(pipeline_id, "cron", &requested.cron, &enabled.cron);

        self.gateway.replace_pipeline(pipeline_id, &pipeline).await?;
        info!(
            "Pipeline {}: following triggers were enabled: git={:?} cron={:?}",
            pipeline_id, enabled.git, enabled.cron
        );

        let present: Vec<&str> = [git.as_ref(), cron.as_ref()]
            .into_iter()
            .flatten()
            .map(|checkpoint| keys.key(checkpoint.kind()))
            .collect();
        let results = join_all(present.iter().map(|key| {
            self.gateway
                .delete_annotation(pipeline_id, self.config.entity_type, key)
        }))
        .await;
        first_error(results)?;

        for key in &present {
            info!(
                "Pipeline {}: \"{}\" annotation was deleted from the pipeline",
                pipeline_id, key
            );
        }

        Ok(ReenableOutcome::Reenabled {
            enabled,
            cleared: present.into_iter().map(str::to_string).collect(),
        })
    }

    async fn recreate_triggers(
        &self,
        pipeline_id: &str,
        annotations: &[Annotation],
    ) -> Result<RecreateOutcome> {
        let keys = &self.config.checkpoint_keys;
        let registrations = match keys.load(annotations, CheckpointKind::DeletedTriggers)? {
            Some(Checkpoint::DeletedTriggers(registrations)) if !registrations.is_empty() => {
                registrations
            }
            _ => {
                info!(
                    "Pipeline {}: there are no previously deleted triggers, nothing to create",
                    pipeline_id
                );
                return Ok(RecreateOutcome::NothingToDo);
            }
        };
        debug!(
            "Pipeline {}: triggers to be created: {:?}",
            pipeline_id, registrations
        );

        let events: Vec<String> = registrations.iter().map(|r| r.event.clone()).collect();
        info!(
            "Pipeline {}: following triggers will be created: {:?}",
            pipeline_id, events
        );

        let results = join_all(
            registrations
                .iter()
                .map(|r| self.gateway.create_trigger(&r.event, pipeline_id, Some(r))),
        )
        .await;
        first_error(results)?;
        info!(
            "Pipeline {}: following triggers were created: {:?}",
            pipeline_id, events
        );

        let key = keys.key(CheckpointKind::DeletedTriggers);
        self.gateway
            .delete_annotation(pipeline_id, self.config.entity_type, key)
            .await?;
        info!(
            "Pipeline {}: \"{}\" annotation was deleted from the pipeline",
            pipeline_id, key
        );

        Ok(RecreateOutcome::Recreated {
            events,
            cleared: key.to_string(),
        })
    }
}

fn warn_missing(pipeline_id: &str, kind: &str, requested: &[String], found: &[String]) {
    let missing: Vec<&String> = requested.iter().filter(|id| !found.contains(id)).collect();
    if !missing.is_empty() {
        warn!(
            "Pipeline {}: {} triggers {:?} are no longer on the pipeline and were skipped",
            pipeline_id, kind, missing
        );
    }
}
