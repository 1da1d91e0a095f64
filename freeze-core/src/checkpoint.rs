//! Checkpoints
//!
//! A checkpoint is an annotation on a pipeline that records what a suspend
//! or purge changed, so that a later restore can undo exactly that. The
//! annotation value is untyped on the wire; this module turns it into a
//! [`Checkpoint`] keyed by the annotation key, and back.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use thiserror::Error;

use crate::domain::annotation::Annotation;
use crate::domain::trigger::TriggerRegistration;

pub const DISABLED_GIT_TRIGGERS_KEY: &str = "disabled_git_triggers";
pub const DISABLED_CRON_TRIGGERS_KEY: &str = "disabled_cron_triggers";
pub const DELETED_TRIGGERS_KEY: &str = "deleted_triggers";

/// Errors raised while decoding or encoding a checkpoint value
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// The stored value does not have the shape its key requires
    #[error("Invalid \"{key}\" checkpoint: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Invalid base64 in deleted triggers checkpoint: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid JSON in checkpoint: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CheckpointError>;

/// The three checkpoint slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckpointKind {
    DisabledGitTriggers,
    DisabledCronTriggers,
    DeletedTriggers,
}

/// Annotation keys used for each checkpoint slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointKeys {
    pub disabled_git_triggers: String,
    pub disabled_cron_triggers: String,
    pub deleted_triggers: String,
}

impl Default for CheckpointKeys {
    fn default() -> Self {
        Self {
            disabled_git_triggers: DISABLED_GIT_TRIGGERS_KEY.to_string(),
            disabled_cron_triggers: DISABLED_CRON_TRIGGERS_KEY.to_string(),
            deleted_triggers: DELETED_TRIGGERS_KEY.to_string(),
        }
    }
}

impl CheckpointKeys {
    pub fn key(&self, kind: CheckpointKind) -> &str {
        match kind {
            CheckpointKind::DisabledGitTriggers => &self.disabled_git_triggers,
            CheckpointKind::DisabledCronTriggers => &self.disabled_cron_triggers,
            CheckpointKind::DeletedTriggers => &self.deleted_triggers,
        }
    }

    /// Finds the annotation holding the given slot
    ///
    /// When the service returns more than one, the last one wins.
    pub fn find<'a>(
        &self,
        annotations: &'a [Annotation],
        kind: CheckpointKind,
    ) -> Option<&'a Annotation> {
        let key = self.key(kind);
        annotations.iter().rev().find(|a| a.key == key)
    }

    /// Finds and decodes the given slot
    pub fn load(
        &self,
        annotations: &[Annotation],
        kind: CheckpointKind,
    ) -> Result<Option<Checkpoint>> {
        self.find(annotations, kind)
            .map(|annotation| Checkpoint::decode(kind, self.key(kind), &annotation.value))
            .transpose()
    }
}

/// Typed value of a checkpoint annotation
#[derive(Debug, Clone, PartialEq)]
pub enum Checkpoint {
    /// Ids of git triggers disabled by a suspend
    DisabledGitTriggers(Vec<String>),
    /// Ids of cron triggers disabled by a suspend
    DisabledCronTriggers(Vec<String>),
    /// Full registrations removed by a purge
    DeletedTriggers(Vec<TriggerRegistration>),
}

impl Checkpoint {
    pub fn kind(&self) -> CheckpointKind {
        match self {
            Checkpoint::DisabledGitTriggers(_) => CheckpointKind::DisabledGitTriggers,
            Checkpoint::DisabledCronTriggers(_) => CheckpointKind::DisabledCronTriggers,
            Checkpoint::DeletedTriggers(_) => CheckpointKind::DeletedTriggers,
        }
    }

    /// Ids held by a disabled-triggers checkpoint; empty for deleted triggers
    pub fn trigger_ids(&self) -> &[String] {
        match self {
            Checkpoint::DisabledGitTriggers(ids) | Checkpoint::DisabledCronTriggers(ids) => ids,
            Checkpoint::DeletedTriggers(_) => &[],
        }
    }

    /// Wire form of the checkpoint
    ///
    /// Trigger id lists are stored as plain JSON arrays. Deleted registrations
    /// are stored as base64 of their JSON array.
    pub fn encode(&self) -> Result<Value> {
        match self {
            Checkpoint::DisabledGitTriggers(ids) | Checkpoint::DisabledCronTriggers(ids) => {
                Ok(serde_json::to_value(ids)?)
            }
            Checkpoint::DeletedTriggers(registrations) => {
                let json = serde_json::to_vec(registrations)?;
                Ok(Value::String(STANDARD.encode(json)))
            }
        }
    }

    /// Reads a stored value back
    ///
    /// A `null` id list decodes to an empty list. A `null` or empty deleted
    /// triggers value decodes to no registrations.
    pub fn decode(kind: CheckpointKind, key: &str, value: &Value) -> Result<Self> {
        match kind {
            CheckpointKind::DisabledGitTriggers => {
                Ok(Checkpoint::DisabledGitTriggers(decode_ids(key, value)?))
            }
            CheckpointKind::DisabledCronTriggers => {
                Ok(Checkpoint::DisabledCronTriggers(decode_ids(key, value)?))
            }
            CheckpointKind::DeletedTriggers => match value {
                Value::Null => Ok(Checkpoint::DeletedTriggers(Vec::new())),
                Value::String(encoded) if encoded.is_empty() => {
                    Ok(Checkpoint::DeletedTriggers(Vec::new()))
                }
                Value::String(encoded) => {
                    let json = STANDARD.decode(encoded)?;
                    Ok(Checkpoint::DeletedTriggers(serde_json::from_slice(&json)?))
                }
                other => Err(CheckpointError::InvalidValue {
                    key: key.to_string(),
                    reason: format!("expected a base64 string, found {}", json_type(other)),
                }),
            },
        }
    }
}

fn decode_ids(key: &str, value: &Value) -> Result<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(id) => Ok(id.clone()),
                other => Err(CheckpointError::InvalidValue {
                    key: key.to_string(),
                    reason: format!("expected trigger id string, found {}", json_type(other)),
                }),
            })
            .collect(),
        other => Err(CheckpointError::InvalidValue {
            key: key.to_string(),
            reason: format!("expected an array of trigger ids, found {}", json_type(other)),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
