//! Jobs repository
//!
//! Handles communication with the review API for job-related operations:
//! - Querying the status of a review's analysis job
//! - (Re)starting the analysis job

use async_trait::async_trait;
use dpaguard_client::{ClientError, ReviewClient};
use dpaguard_core::domain::job::JobStatus;
use dpaguard_core::domain::review::ReviewId;
use dpaguard_core::dto::review::StartReviewResponse;
use std::sync::Arc;

/// Repository trait for job-related operations with the review API
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Queries the current status of the review's analysis job
    ///
    /// # Arguments
    /// * `review_id` - The review whose job is tracked
    async fn job_status(&self, review_id: &ReviewId) -> Result<JobStatus, ClientError>;

    /// Triggers (or re-triggers) the review's analysis job
    ///
    /// # Arguments
    /// * `review_id` - The review to process
    async fn start_job(&self, review_id: &ReviewId) -> Result<StartReviewResponse, ClientError>;
}

/// HTTP implementation of JobRepository
pub struct HttpJobRepository {
    client: Arc<ReviewClient>,
}

impl HttpJobRepository {
    /// Creates a new HTTP job repository
    ///
    /// # Arguments
    /// * `client` - Shared review API client
    pub fn new(client: Arc<ReviewClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobRepository for HttpJobRepository {
    async fn job_status(&self, review_id: &ReviewId) -> Result<JobStatus, ClientError> {
        self.client.get_job(review_id).await
    }

    async fn start_job(&self, review_id: &ReviewId) -> Result<StartReviewResponse, ClientError> {
        self.client.start_review(review_id).await
    }
}
