//! Trigger registration domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Webhook-style trigger registration (`api/hermes/triggers`)
///
/// Distinct from the git and cron triggers declared in a pipeline spec. A
/// registration can only be re-created from its full original payload, so
/// the whole object is kept, including fields the orchestrator never reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerRegistration {
    /// Event identifier, e.g. `registry:dockerhub:org:app:push:5b1e`
    pub event: String,
    /// Id of the pipeline the event is bound to
    pub pipeline: String,
    /// Only populated when listed with `with-event=true`
    #[serde(
        rename = "event-data",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub event_data: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
