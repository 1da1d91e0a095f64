//! Trigger registration API endpoints (`api/hermes/triggers`)

use crate::CodefreshClient;
use crate::error::{ClientError, Result};
use freeze_core::domain::trigger::TriggerRegistration;
use reqwest::{Method, StatusCode};

/// Encodes an event identifier for use in a hermes trigger path
///
/// The identifier is percent-encoded twice. Hermes decodes the path segment
/// once more than the router does, so a single pass is not enough.
pub fn encode_event(event: &str) -> String {
    urlencoding::encode(&urlencoding::encode(event)).into_owned()
}

impl CodefreshClient {
    /// List the trigger registrations bound to a pipeline
    ///
    /// # Arguments
    /// * `pipeline_id` - The pipeline ID
    /// * `with_event` - Populate `event-data` on every registration
    ///
    /// # Returns
    /// `None` when Codefresh answers with `null` or an empty body
    pub async fn list_pipeline_triggers(
        &self,
        pipeline_id: &str,
        with_event: bool,
    ) -> Result<Option<Vec<TriggerRegistration>>> {
        let response = self
            .request(
                Method::GET,
                &format!("api/hermes/triggers/pipeline/{}", pipeline_id),
            )
            .query(&[("with-event", with_event)])
            .send()
            .await?;

        self.handle_optional_response(response).await
    }

    /// Delete the registration of `event` for a pipeline
    pub async fn delete_trigger(&self, event: &str, pipeline_id: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, &trigger_path(event, pipeline_id))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(format!(
                "Event \"{}\" was not found",
                event
            )));
        }

        self.handle_empty_response(response).await
    }

    /// Register `event` for a pipeline
    ///
    /// # Arguments
    /// * `event` - Event identifier
    /// * `pipeline_id` - The pipeline ID
    /// * `payload` - Full registration to send as body, so that `event-data` is kept
    pub async fn create_trigger(
        &self,
        event: &str,
        pipeline_id: &str,
        payload: Option<&TriggerRegistration>,
    ) -> Result<()> {
        let mut request = self.request(Method::POST, &trigger_path(event, pipeline_id));
        if let Some(payload) = payload {
            request = request.json(payload);
        }
        let response = request.send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(format!(
                "Event \"{}\" was not found",
                event
            )));
        }

        self.handle_empty_response(response).await
    }
}

fn trigger_path(event: &str, pipeline_id: &str) -> String {
    format!("api/hermes/triggers/{}/{}", encode_event(event), pipeline_id)
}
