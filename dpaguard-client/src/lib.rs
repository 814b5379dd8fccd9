//! DPA Guard HTTP Client
//!
//! A simple, type-safe HTTP client for communicating with the DPA Guard review API.
//!
//! This crate is shared by the CLI (for one-shot commands) and the tracker
//! (for job status polling), so both decode the API the same way and
//! report failures in the same words.
//!
//! # Example
//!
//! ```no_run
//! use dpaguard_client::ReviewClient;
//! use dpaguard_core::domain::review::ReviewId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dpaguard_client::ClientError> {
//!     let client = ReviewClient::new("http://localhost:8000");
//!
//!     let status = client.get_job(&ReviewId::from("review-1")).await?;
//!     println!("Job is {}", status.stage);
//!     Ok(())
//! }
//! ```

pub mod error;
mod health;
mod reviews;

// Re-export commonly used types
pub use error::{ClientError, Result, format_error, is_retryable_http_status};

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

/// HTTP client for the DPA Guard review API
///
/// Endpoints are organized into logical groups:
/// - Review lifecycle (create, get, upload, start)
/// - Job tracking (status of the analysis job)
/// - Results (explain/results payloads)
/// - Health probes
#[derive(Debug, Clone)]
pub struct ReviewClient {
    /// Base URL of the review API (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl ReviewClient {
    /// Create a new review API client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the review API (e.g., "http://localhost:8000")
    ///
    /// # Example
    /// ```
    /// use dpaguard_client::ReviewClient;
    ///
    /// let client = ReviewClient::new("http://localhost:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new review API client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use dpaguard_client::ReviewClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ReviewClient::with_client("http://localhost:8000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the review API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url().path());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::api_error(
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
                &body,
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
