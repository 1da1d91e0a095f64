//! Gateway trait
//!
//! The set of Codefresh operations the trigger orchestrator depends on.
//! [`CodefreshClient`] is the HTTP implementation; tests provide their own.

use async_trait::async_trait;
use freeze_core::domain::annotation::{Annotation, EntityType};
use freeze_core::domain::pipeline::Pipeline;
use freeze_core::domain::trigger::TriggerRegistration;
use freeze_core::dto::pipeline::{ListPipelinesParams, Pipelines};
use serde_json::Value;

use crate::CodefreshClient;
use crate::error::Result;

/// Remote operations used by the orchestrator
///
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait CodefreshGateway: Send + Sync {
    /// Fetch a pipeline; `NotFound` if it does not exist
    async fn get_pipeline(&self, id: &str) -> Result<Pipeline>;

    /// Replace a pipeline wholesale; `NotFound` if it does not exist
    async fn replace_pipeline(&self, id: &str, pipeline: &Pipeline) -> Result<Pipeline>;

    /// Fetch one page of pipelines
    async fn list_pipelines(&self, params: &ListPipelinesParams) -> Result<Pipelines>;

    /// List trigger registrations of a pipeline; `None` when the service answers `null`
    async fn list_pipeline_triggers(
        &self,
        pipeline_id: &str,
        with_event: bool,
    ) -> Result<Option<Vec<TriggerRegistration>>>;

    /// Delete the registration of `event` for a pipeline
    async fn delete_trigger(&self, event: &str, pipeline_id: &str) -> Result<()>;

    /// Register `event` for a pipeline, optionally with its original payload
    async fn create_trigger(
        &self,
        event: &str,
        pipeline_id: &str,
        payload: Option<&TriggerRegistration>,
    ) -> Result<()>;

    /// List annotations of an entity; empty when there are none
    async fn list_annotations(
        &self,
        entity_id: &str,
        entity_type: EntityType,
    ) -> Result<Vec<Annotation>>;

    /// Create an annotation on an entity
    async fn create_annotation(
        &self,
        entity_id: &str,
        entity_type: EntityType,
        key: &str,
        value: Value,
    ) -> Result<Annotation>;

    /// Delete an annotation; `NotFound` if the entity does not exist
    async fn delete_annotation(
        &self,
        entity_id: &str,
        entity_type: EntityType,
        key: &str,
    ) -> Result<Value>;
}

#[async_trait]
impl CodefreshGateway for CodefreshClient {
    async fn get_pipeline(&self, id: &str) -> Result<Pipeline> {
        CodefreshClient::get_pipeline(self, id).await
    }

    async fn replace_pipeline(&self, id: &str, pipeline: &Pipeline) -> Result<Pipeline> {
        CodefreshClient::replace_pipeline(self, id, pipeline).await
    }

    async fn list_pipelines(&self, params: &ListPipelinesParams) -> Result<Pipelines> {
        CodefreshClient::list_pipelines(self, params).await
    }

    async fn list_pipeline_triggers(
        &self,
        pipeline_id: &str,
        with_event: bool,
    ) -> Result<Option<Vec<TriggerRegistration>>> {
        CodefreshClient::list_pipeline_triggers(self, pipeline_id, with_event).await
    }

    async fn delete_trigger(&self, event: &str, pipeline_id: &str) -> Result<()> {
        CodefreshClient::delete_trigger(self, event, pipeline_id).await
    }

    async fn create_trigger(
        &self,
        event: &str,
        pipeline_id: &str,
        payload: Option<&TriggerRegistration>,
    ) -> Result<()> {
        CodefreshClient::create_trigger(self, event, pipeline_id, payload).await
    }

    async fn list_annotations(
        &self,
        entity_id: &str,
        entity_type: EntityType,
    ) -> Result<Vec<Annotation>> {
        CodefreshClient::list_annotations(self, entity_id, entity_type).await
    }

    async fn create_annotation(
        &self,
        entity_id: &str,
        entity_type: EntityType,
        key: &str,
        value: Value,
    ) -> Result<Annotation> {
        CodefreshClient::create_annotation(self, entity_id, entity_type, key, value).await
    }

    async fn delete_annotation(
        &self,
        entity_id: &str,
        entity_type: EntityType,
        key: &str,
    ) -> Result<Value> {
        CodefreshClient::delete_annotation(self, entity_id, entity_type, key).await
    }
}
