//! Freeze Orchestrator
//!
//! Suspends and restores the triggers of Codefresh pipelines.
//!
//! The orchestrator works in three single-pipeline operations plus a
//! project-wide fan-out:
//! - Suspend: disable the enabled git and cron triggers, remember their ids
//! - Purge: delete the trigger registrations, remember their full payloads
//! - Restore: undo both from what was remembered, then forget it
//! - Fan-out: apply one of the above to every pipeline of a project
//!
//! What was changed is remembered as annotations on the pipeline itself,
//! there is no local state. Each step is a separate remote call; a mutation
//! is always confirmed before the checkpoint describing it is written.

pub mod config;
pub mod error;
mod fanout;
mod purge;
pub mod report;
mod restore;
mod suspend;

#[cfg(test)]
mod fake;

pub use config::OrchestratorConfig;
pub use error::{OrchestratorError, Result};
pub use fanout::PipelinePager;
pub use report::{
    ActionOutcome, CheckpointWrite, FanOutReport, PipelineReport, PurgeOutcome, RecreateOutcome,
    ReenableOutcome, RestoreOutcome, RunReport, SuspendOutcome,
};

use std::fmt;
use std::sync::Arc;

use freeze_client::CodefreshGateway;
use freeze_core::checkpoint::Checkpoint;
use tracing::{error, info};

/// Operation applied to a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Suspend,
    Purge,
    /// Suspend and purge, run concurrently
    SuspendAndPurge,
    Restore,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Suspend => "suspend",
            Action::Purge => "purge",
            Action::SuspendAndPurge => "suspend+purge",
            Action::Restore => "restore",
        };
        f.write_str(name)
    }
}

/// What an action is applied to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Pipeline(String),
    /// Every pipeline of the project
    Project(String),
}

/// Trigger state orchestrator
///
/// Holds no mutable state; concurrent operations on different pipelines
/// only share the gateway.
#[derive(Clone)]
pub struct TriggerOrchestrator {
    gateway: Arc<dyn CodefreshGateway>,
    config: OrchestratorConfig,
}

impl TriggerOrchestrator {
    pub fn new(gateway: Arc<dyn CodefreshGateway>, config: OrchestratorConfig) -> Self {
        Self { gateway, config }
    }

    /// Applies `action` to the target
    pub async fn run(&self, target: &Target, action: Action) -> Result<RunReport> {
        match target {
            Target::Pipeline(pipeline_id) => {
                let outcome = self.apply(pipeline_id, action).await?;
                Ok(RunReport::Pipeline(PipelineReport {
                    pipeline_id: pipeline_id.clone(),
                    outcome,
                }))
            }
            Target::Project(project_id) => {
                Ok(RunReport::Project(self.fan_out(project_id, action).await?))
            }
        }
    }

    /// Applies `action` to a single pipeline
    pub async fn apply(&self, pipeline_id: &str, action: Action) -> Result<ActionOutcome> {
        match action {
            Action::Suspend => Ok(ActionOutcome::Suspend(self.suspend(pipeline_id).await?)),
            Action::Purge => Ok(ActionOutcome::Purge(self.purge(pipeline_id).await?)),
            Action::SuspendAndPurge => {
                let (suspended, purged) =
                    futures::join!(self.suspend(pipeline_id), self.purge(pipeline_id));
                Ok(ActionOutcome::SuspendAndPurge(suspended?, purged?))
            }
            Action::Restore => Ok(ActionOutcome::Restore(self.restore(pipeline_id).await?)),
        }
    }

    /// Writes a checkpoint annotation
    ///
    /// Never fails: the outcome is returned and logged so that a committed
    /// mutation is not reported as an error.
    async fn write_checkpoint(&self, pipeline_id: &str, checkpoint: &Checkpoint) -> CheckpointWrite {
        let key = self.config.checkpoint_keys.key(checkpoint.kind()).to_string();

        let result = match checkpoint.encode() {
            Ok(value) => self
                .gateway
                .create_annotation(pipeline_id, self.config.entity_type, &key, value)
                .await
                .map(|_| ())
                .map_err(OrchestratorError::from),
            Err(e) => Err(OrchestratorError::from(e)),
        };

        match result {
            Ok(()) => {
                info!(
                    "Pipeline {}: \"{}\" annotation was added to the pipeline",
                    pipeline_id, key
                );
                CheckpointWrite { key, success: true }
            }
            Err(e) => {
                error!(
                    "Pipeline {}: unable to add \"{}\" annotation, the change it describes is not recorded: {}",
                    pipeline_id, key, e
                );
                CheckpointWrite { key, success: false }
            }
        }
    }
}

/// Collects the results of a concurrent batch, keeping the first error
///
/// Every future of the batch has already run to completion.
fn first_error<T, E>(results: Vec<std::result::Result<T, E>>) -> std::result::Result<Vec<T>, E> {
    results.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeGateway, pipeline};

    #[test]
    fn test_action_display() {
        assert_eq!(Action::SuspendAndPurge.to_string(), "suspend+purge");
        assert_eq!(Action::Restore.to_string(), "restore");
    }

    #[tokio::test]
    async fn test_run_on_single_pipeline() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.add_pipeline(pipeline("p1", &[("g1", false)], None));
        let orchestrator = TriggerOrchestrator::new(gateway.clone(), OrchestratorConfig::default());

        let report = orchestrator
            .run(&Target::Pipeline("p1".to_string()), Action::Suspend)
            .await
            .unwrap();

        let pipelines = report.pipelines();
        assert_eq!(pipelines.len(), 1);
        assert_eq!(pipelines[0].pipeline_id, "p1");
        assert!(!pipelines[0].outcome.is_noop());
    }

    #[tokio::test]
    async fn test_suspend_and_purge_runs_both() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.add_pipeline(pipeline("p1", &[("g1", false)], None));
        gateway.add_registration("p1", "registry:app:push");
        let orchestrator = TriggerOrchestrator::new(gateway.clone(), OrchestratorConfig::default());

        let outcome = orchestrator
            .apply("p1", Action::SuspendAndPurge)
            .await
            .unwrap();

        match outcome {
            ActionOutcome::SuspendAndPurge(
                SuspendOutcome::Suspended { .. },
                PurgeOutcome::Purged { events, .. },
            ) => assert_eq!(events, vec!["registry:app:push"]),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(gateway.registrations("p1").is_empty());
        assert!(gateway.pipeline("p1").spec.triggers[0].disabled);
    }

    #[tokio::test]
    async fn test_missing_pipeline_is_not_found() {
        let gateway = Arc::new(FakeGateway::new());
        let orchestrator = TriggerOrchestrator::new(gateway, OrchestratorConfig::default());

        let err = orchestrator.apply("nope", Action::Suspend).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.kind(), "NotFoundError");
    }

    #[test]
    fn test_first_error_keeps_first() {
        let results: Vec<std::result::Result<u8, &str>> = vec![Ok(1), Err("a"), Err("b")];
        assert_eq!(first_error(results), Err("a"));
    }

    #[tokio::test]
    async fn test_custom_checkpoint_keys() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.add_pipeline(pipeline("p1", &[("g1", false)], Some(&[("c1", false)])));
        let keys = freeze_core::checkpoint::CheckpointKeys {
            disabled_git_triggers: "freeze/git".to_string(),
            disabled_cron_triggers: "freeze/cron".to_string(),
            deleted_triggers: "freeze/deleted".to_string(),
        };
        let orchestrator = TriggerOrchestrator::new(
            gateway.clone(),
            OrchestratorConfig::default().with_checkpoint_keys(keys),
        );

        orchestrator.suspend("p1").await.unwrap();

        assert_eq!(
            gateway.annotation_value("p1", "freeze/git"),
            Some(serde_json::json!(["g1"]))
        );
        assert_eq!(gateway.annotation_value("p1", "disabled_git_triggers"), None);

        let outcome = orchestrator.restore("p1").await.unwrap();

        assert_eq!(
            outcome.reenable,
            ReenableOutcome::Reenabled {
                enabled: freeze_core::domain::pipeline::TriggerIds {
                    git: vec!["g1".to_string()],
                    cron: vec!["c1".to_string()],
                },
                cleared: vec!["freeze/git".to_string(), "freeze/cron".to_string()],
            }
        );
        assert_eq!(gateway.annotation_value("p1", "freeze/git"), None);
        assert_eq!(gateway.annotation_value("p1", "freeze/cron"), None);
        assert!(!gateway.pipeline("p1").spec.triggers[0].disabled);
    }
}
