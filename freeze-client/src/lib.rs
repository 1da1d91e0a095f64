//! Freeze HTTP Client
//!
//! A small, type-safe HTTP client for the parts of the Codefresh API that the
//! trigger orchestrator needs: pipelines, hermes trigger registrations and
//! annotations.
//!
//! The orchestrator never uses [`CodefreshClient`] directly; it goes through
//! the [`CodefreshGateway`] trait so that it can be driven by an in-memory
//! gateway in tests.
//!
//! # Example
//!
//! ```no_run
//! use freeze_client::CodefreshClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), freeze_client::ClientError> {
//!     let client = CodefreshClient::new("https://g.codefresh.io", "my-api-token");
//!
//!     let pipeline = client.get_pipeline("5f1b2c3d4e5f6a7b8c9d0e1f").await?;
//!     println!("{} has {} git triggers", pipeline.id(), pipeline.spec.triggers.len());
//!     Ok(())
//! }
//! ```

pub mod error;
mod annotations;
mod gateway;
mod pipelines;
mod triggers;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use gateway::CodefreshGateway;
pub use triggers::encode_event;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

/// Default Codefresh host
pub const DEFAULT_HOST: &str = "https://g.codefresh.io";

/// HTTP client for the Codefresh API
///
/// Every request carries the API token in the `Authorization` header, as
/// Codefresh expects it (no scheme prefix).
#[derive(Clone)]
pub struct CodefreshClient {
    /// Base URL of the Codefresh API (e.g., "https://g.codefresh.io")
    base_url: String,
    /// API token
    token: String,
    /// HTTP client instance
    client: Client,
}

impl std::fmt::Debug for CodefreshClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodefreshClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl CodefreshClient {
    /// Create a new Codefresh client
    ///
    /// # Arguments
    /// * `base_url` - The Codefresh host (e.g., "https://g.codefresh.io")
    /// * `token` - API token sent as the `Authorization` header
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(base_url, token, Client::new())
    }

    /// Create a new Codefresh client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use freeze_client::CodefreshClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = CodefreshClient::with_client("https://g.codefresh.io", "token", http_client);
    /// ```
    pub fn with_client(
        base_url: impl Into<String>,
        token: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        }
    }

    /// Get the base URL of the Codefresh API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `api/pipelines/{id}`
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Start a request with the headers every Codefresh call needs
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!("{} {}", method, path);
        self.client
            .request(method, self.url(path))
            .header(AUTHORIZATION, &self.token)
            .header(CONTENT_TYPE, "application/json")
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body may be empty or `null`
    async fn handle_optional_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<Option<T>> {
        let response = Self::check_status(response).await?;
        let body = response.text().await?;

        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content (e.g., DELETE operations)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        Self::check_status(response).await?;
        Ok(())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        let message = if error_text.trim().is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            error_text
        };
        Err(ClientError::api_error(status.as_u16(), message))
    }
}
