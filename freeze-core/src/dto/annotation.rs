//! Annotation DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::annotation::EntityType;

/// Body of `POST api/annotations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnotation {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub key: String,
    pub value: Value,
}
