//! Review DTOs for the review API

use serde::{Deserialize, Serialize};

use crate::domain::review::{ReviewDoc, ReviewId, ReviewStatus};

/// Request to create a new review
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateReview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_json: Option<serde_json::Value>,
}

/// Response to a document upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub review_id: ReviewId,
    pub status: ReviewStatus,
    pub doc: Option<ReviewDoc>,
}

/// Response to a request that (re)starts processing of a review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartReviewResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub review_id: ReviewId,
    pub status: ReviewStatus,
    #[serde(default)]
    pub job_id: Option<String>,
}
