//! Pipeline listing DTOs

use serde::{Deserialize, Serialize};

use crate::domain::pipeline::Pipeline;

/// One page of `GET api/pipelines`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipelines {
    #[serde(default)]
    pub docs: Vec<Pipeline>,
    /// Total number of pipelines matching the filters, across all pages
    pub count: u64,
}

/// Query parameters for `GET api/pipelines`
///
/// A `limit` of 0 asks the service for an unbounded page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPipelinesParams {
    #[serde(rename = "projectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub offset: u64,
    pub limit: u64,
}

impl ListPipelinesParams {
    pub fn for_project(project_id: impl Into<String>, offset: u64, limit: u64) -> Self {
        Self {
            project_id: Some(project_id.into()),
            offset,
            limit,
        }
    }
}
