//! Pipeline domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Pipeline as returned by `GET api/pipelines/{id}`
///
/// Only the parts the orchestrator touches are modeled. Everything else is
/// carried in `extra` and written back unchanged by a replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub metadata: PipelineMetadata,
    #[serde(default)]
    pub spec: PipelineSpec,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineMetadata {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "projectId", default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Git push triggers
    #[serde(default)]
    pub triggers: Vec<SpecTrigger>,
    /// Cron triggers; absent on pipelines that never had one
    #[serde(
        rename = "cronTriggers",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cron_triggers: Option<Vec<SpecTrigger>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A trigger declared in the pipeline spec (git or cron)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecTrigger {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Ids of spec triggers, split by kind, in the order they appear in the pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerIds {
    pub git: Vec<String>,
    pub cron: Vec<String>,
}

impl TriggerIds {
    pub fn is_empty(&self) -> bool {
        self.git.is_empty() && self.cron.is_empty()
    }
}

impl Pipeline {
    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    /// Disables every enabled trigger and returns the ids that were flipped
    ///
    /// Triggers that were already disabled are not part of the result.
    pub fn disable_enabled_triggers(&mut self) -> TriggerIds {
        let mut flipped = TriggerIds::default();

        for trigger in self.spec.triggers.iter_mut().filter(|t| !t.disabled) {
            trigger.disabled = true;
            flipped.git.push(trigger.id.clone());
        }

        if let Some(cron_triggers) = self.spec.cron_triggers.as_mut() {
            for trigger in cron_triggers.iter_mut().filter(|t| !t.disabled) {
                trigger.disabled = true;
                flipped.cron.push(trigger.id.clone());
            }
        }

        flipped
    }

    /// Enables the triggers named in `ids` and returns the ids that were matched
    ///
    /// Triggers not listed stay as they are, even if disabled.
    pub fn enable_triggers(&mut self, ids: &TriggerIds) -> TriggerIds {
        let mut matched = TriggerIds::default();

        for trigger in self.spec.triggers.iter_mut() {
            if ids.git.contains(&trigger.id) {
                trigger.disabled = false;
                matched.git.push(trigger.id.clone());
            }
        }

        if let Some(cron_triggers) = self.spec.cron_triggers.as_mut() {
            for trigger in cron_triggers.iter_mut() {
                if ids.cron.contains(&trigger.id) {
                    trigger.disabled = false;
                    matched.cron.push(trigger.id.clone());
                }
            }
        }

        matched
    }
}
