//! Suspend: disable the enabled spec triggers of a pipeline

use freeze_core::checkpoint::Checkpoint;
use tracing::info;

use crate::TriggerOrchestrator;
use crate::error::Result;
use crate::report::SuspendOutcome;

impl TriggerOrchestrator {
    /// Disables every enabled git and cron trigger of a pipeline
    ///
    /// The pipeline is replaced once with all triggers flipped. Only then are
    /// the git and cron checkpoints written, concurrently. The checkpoints
    /// hold exactly the ids flipped by this call, so triggers that were
    /// already disabled stay disabled after a restore.
    pub async fn suspend(&self, pipeline_id: &str) -> Result<SuspendOutcome> {
        let mut pipeline = self.gateway.get_pipeline(pipeline_id).await?;

        let disabled = pipeline.disable_enabled_triggers();
        if disabled.is_empty() {
            info!(
                "Pipeline {}: there are no enabled triggers, nothing to disable",
                pipeline_id
            );
            return Ok(SuspendOutcome::NothingToDo);
        }

        info!(
            "Pipeline {}: following triggers will be disabled: git={:?} cron={:?}",
            pipeline_id, disabled.git, disabled.cron
        );
        self.gateway.replace_pipeline(pipeline_id, &pipeline).await?;
        info!(
            "Pipeline {}: following triggers were disabled: git={:?} cron={:?}",
            pipeline_id, disabled.git, disabled.cron
        );

        let git = Checkpoint::DisabledGitTriggers(disabled.git.clone());
        let cron = Checkpoint::DisabledCronTriggers(disabled.cron.clone());
        let (git_write, cron_write) = futures::join!(
            self.write_checkpoint(pipeline_id, &git),
            self.write_checkpoint(pipeline_id, &cron)
        );

        Ok(SuspendOutcome::Suspended {
            disabled,
            checkpoints: vec![git_write, cron_write],
        })
    }
}
