//! Annotation API endpoints

use crate::CodefreshClient;
use crate::error::{ClientError, Result};
use freeze_core::domain::annotation::{Annotation, EntityType};
use freeze_core::dto::annotation::CreateAnnotation;
use reqwest::{Method, StatusCode};
use serde_json::Value;

impl CodefreshClient {
    // =============================================================================
    // Annotations
    // =============================================================================

    /// List the annotations of an entity
    ///
    /// # Returns
    /// An empty list when the entity has none (Codefresh answers 404 in that case)
    pub async fn list_annotations(
        &self,
        entity_id: &str,
        entity_type: EntityType,
    ) -> Result<Vec<Annotation>> {
        let response = self
            .request(Method::GET, "api/annotations")
            .query(&[("entityId", entity_id), ("entityType", entity_type.as_str())])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        Ok(self
            .handle_optional_response(response)
            .await?
            .unwrap_or_default())
    }

    /// Create an annotation on an entity
    ///
    /// # Returns
    /// The stored annotation
    pub async fn create_annotation(
        &self,
        entity_id: &str,
        entity_type: EntityType,
        key: &str,
        value: Value,
    ) -> Result<Annotation> {
        let response = self
            .request(Method::POST, "api/annotations")
            .json(&CreateAnnotation {
                entity_id: entity_id.to_string(),
                entity_type,
                key: key.to_string(),
                value,
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Delete an annotation from an entity
    ///
    /// # Returns
    /// Whatever Codefresh answers with, `Value::Null` for an empty body
    pub async fn delete_annotation(
        &self,
        entity_id: &str,
        entity_type: EntityType,
        key: &str,
    ) -> Result<Value> {
        let response = self
            .request(Method::DELETE, "api/annotations")
            .query(&[
                ("entityId", entity_id),
                ("entityType", entity_type.as_str()),
                ("key", key),
            ])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(format!(
                "Entity #{} was not found",
                entity_id
            )));
        }

        Ok(self
            .handle_optional_response(response)
            .await?
            .unwrap_or(Value::Null))
    }
}
