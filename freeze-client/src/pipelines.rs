//! Pipeline-related API endpoints

use crate::CodefreshClient;
use crate::error::{ClientError, Result};
use freeze_core::domain::pipeline::Pipeline;
use freeze_core::dto::pipeline::{ListPipelinesParams, Pipelines};
use reqwest::{Method, StatusCode};

impl CodefreshClient {
    // =============================================================================
    // Pipeline Management
    // =============================================================================

    /// Get a pipeline by ID
    ///
    /// # Errors
    /// [`ClientError::NotFound`] when the pipeline does not exist
    pub async fn get_pipeline(&self, id: &str) -> Result<Pipeline> {
        let response = self
            .request(Method::GET, &format!("api/pipelines/{}", id))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(format!("Pipeline #{} was not found", id)));
        }

        self.handle_response(response).await
    }

    /// Replace a pipeline with the given definition
    ///
    /// The whole object is sent; Codefresh has no partial update for pipelines.
    ///
    /// # Returns
    /// The pipeline as stored by Codefresh
    pub async fn replace_pipeline(&self, id: &str, pipeline: &Pipeline) -> Result<Pipeline> {
        let response = self
            .request(Method::PUT, &format!("api/pipelines/{}", id))
            .json(pipeline)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(format!("Pipeline #{} was not found", id)));
        }

        self.handle_response(response).await
    }

    /// List one page of pipelines
    ///
    /// # Arguments
    /// * `params` - Filters plus `offset`/`limit`
    ///
    /// # Returns
    /// The page and the total count of pipelines matching the filters
    pub async fn list_pipelines(&self, params: &ListPipelinesParams) -> Result<Pipelines> {
        let response = self
            .request(Method::GET, "api/pipelines")
            .query(params)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
