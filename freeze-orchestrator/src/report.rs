//! Outcome reports
//!
//! Every operation returns what it changed. "Nothing to do" is an outcome,
//! not an error. Checkpoint writes carry their own success flag because a
//! failed write does not undo the mutation it describes.

use freeze_core::domain::pipeline::TriggerIds;

/// Result of one checkpoint annotation write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointWrite {
    pub key: String,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuspendOutcome {
    /// No enabled git or cron trigger was found
    NothingToDo,
    Suspended {
        /// Ids disabled by this run, in pipeline order
        disabled: TriggerIds,
        /// Git then cron checkpoint writes
        checkpoints: Vec<CheckpointWrite>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurgeOutcome {
    /// The pipeline has no trigger registrations
    NothingToDo,
    Purged {
        /// Events of the deleted registrations
        events: Vec<String>,
        checkpoint: CheckpointWrite,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReenableOutcome {
    /// No disabled-triggers checkpoint was found
    NothingToDo,
    Reenabled {
        /// Checkpointed ids that were found on the pipeline and enabled
        enabled: TriggerIds,
        /// Checkpoint keys removed afterwards
        cleared: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecreateOutcome {
    /// No deleted-triggers checkpoint, or an empty one
    NothingToDo,
    Recreated {
        /// Events of the re-created registrations
        events: Vec<String>,
        /// Checkpoint key removed afterwards
        cleared: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOutcome {
    pub reenable: ReenableOutcome,
    pub recreate: RecreateOutcome,
}

/// Outcome of one action on one pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Suspend(SuspendOutcome),
    Purge(PurgeOutcome),
    SuspendAndPurge(SuspendOutcome, PurgeOutcome),
    Restore(RestoreOutcome),
}

impl ActionOutcome {
    /// True when nothing was changed on the remote side
    pub fn is_noop(&self) -> bool {
        match self {
            ActionOutcome::Suspend(s) => *s == SuspendOutcome::NothingToDo,
            ActionOutcome::Purge(p) => *p == PurgeOutcome::NothingToDo,
            ActionOutcome::SuspendAndPurge(s, p) => {
                *s == SuspendOutcome::NothingToDo && *p == PurgeOutcome::NothingToDo
            }
            ActionOutcome::Restore(r) => {
                r.reenable == ReenableOutcome::NothingToDo
                    && r.recreate == RecreateOutcome::NothingToDo
            }
        }
    }

    /// Checkpoint writes that did not succeed
    pub fn failed_checkpoints(&self) -> Vec<&CheckpointWrite> {
        let mut writes: Vec<&CheckpointWrite> = Vec::new();

        let suspend = match self {
            ActionOutcome::Suspend(s) | ActionOutcome::SuspendAndPurge(s, _) => Some(s),
            _ => None,
        };
        if let Some(SuspendOutcome::Suspended { checkpoints, .. }) = suspend {
            writes.extend(checkpoints);
        }

        let purge = match self {
            ActionOutcome::Purge(p) | ActionOutcome::SuspendAndPurge(_, p) => Some(p),
            _ => None,
        };
        if let Some(PurgeOutcome::Purged { checkpoint, .. }) = purge {
            writes.push(checkpoint);
        }

        writes.into_iter().filter(|w| !w.success).collect()
    }
}

/// Outcome of an action on a single pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub pipeline_id: String,
    pub outcome: ActionOutcome,
}

/// Outcome of an action over every pipeline of a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanOutReport {
    pub project_id: String,
    /// Number of listing pages requested
    pub pages: usize,
    pub pipelines: Vec<PipelineReport>,
}

impl FanOutReport {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            pages: 0,
            pipelines: Vec::new(),
        }
    }
}

/// Outcome of a top-level run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    Pipeline(PipelineReport),
    Project(FanOutReport),
}

impl RunReport {
    pub fn pipelines(&self) -> &[PipelineReport] {
        match self {
            RunReport::Pipeline(report) => std::slice::from_ref(report),
            RunReport::Project(report) => &report.pipelines,
        }
    }
}
