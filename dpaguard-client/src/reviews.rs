//! Review-related API endpoints

use crate::ReviewClient;
use crate::error::Result;
use dpaguard_core::domain::job::JobStatus;
use dpaguard_core::domain::review::{Review, ReviewId};
use dpaguard_core::dto::review::{CreateReview, StartReviewResponse, UploadResponse};
use reqwest::multipart::{Form, Part};
use serde_json::Value as JsonValue;
use tracing::debug;

impl ReviewClient {
    // =============================================================================
    // Review Lifecycle
    // =============================================================================

    /// Create a new review
    ///
    /// # Arguments
    /// * `context_json` - Optional review context (role, region, vendor type)
    ///
    /// # Returns
    /// The created review, in `CREATED` status
    pub async fn create_review(&self, context_json: Option<JsonValue>) -> Result<Review> {
        let url = self.url("/reviews");
        let request = self.client.post(&url);
        let request = match context_json {
            Some(context_json) => request.json(&CreateReview {
                context_json: Some(context_json),
            }),
            None => request,
        };
        let response = request.send().await?;

        self.handle_response(response).await
    }

    /// Get a review by ID
    pub async fn get_review(&self, review_id: &ReviewId) -> Result<Review> {
        let url = self.url(&format!("/reviews/{}", review_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Upload the document to analyze
    ///
    /// # Arguments
    /// * `review_id` - The review the document belongs to
    /// * `file_name` - File name reported to the backend
    /// * `mime` - MIME type of the document
    /// * `bytes` - Document contents
    pub async fn upload_document(
        &self,
        review_id: &ReviewId,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse> {
        let url = self.url(&format!("/reviews/{}/upload", review_id));
        debug!("Uploading {} ({} bytes) to review {}", file_name, bytes.len(), review_id);

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = Form::new().part("file", part);
        let response = self.client.post(&url).multipart(form).send().await?;

        self.handle_response(response).await
    }

    /// Start (or restart) processing of an uploaded review
    ///
    /// # Returns
    /// The acknowledgement, including the backend job id when one was issued
    pub async fn start_review(&self, review_id: &ReviewId) -> Result<StartReviewResponse> {
        let url = self.url(&format!("/reviews/{}/start", review_id));
        let response = self.client.post(&url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Job Tracking
    // =============================================================================

    /// Get the status of the analysis job of a review
    pub async fn get_job(&self, review_id: &ReviewId) -> Result<JobStatus> {
        let url = self.url(&format!("/reviews/{}/job", review_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Results
    // =============================================================================

    /// Get the analysis results of a review
    ///
    /// The payload is returned raw; see `dpaguard_core::report` for normalization.
    pub async fn get_results(&self, review_id: &ReviewId) -> Result<JsonValue> {
        let url = self.url(&format!("/reviews/{}/results", review_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get the per-clause explanation of a review
    pub async fn get_explain(&self, review_id: &ReviewId) -> Result<JsonValue> {
        let url = self.url(&format!("/reviews/{}/explain", review_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
