//! Review domain types

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a review as issued by the review API
///
/// The backend issues UUIDs, but the identifier is treated as opaque text
/// so that it round-trips exactly as the API reported it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(String);

impl ReviewId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReviewId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ReviewId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<Uuid> for ReviewId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

/// Lifecycle status of a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    Created,
    Uploaded,
    Processing,
    Completed,
    Failed,
}

impl ReviewStatus {
    /// Whether the backend allows moving from `self` to `next`
    ///
    /// CREATED -> UPLOADED -> PROCESSING -> {COMPLETED, FAILED}; the two
    /// outcomes are final.
    pub fn can_transition_to(&self, next: ReviewStatus) -> bool {
        matches!(
            (self, next),
            (ReviewStatus::Created, ReviewStatus::Uploaded)
                | (ReviewStatus::Uploaded, ReviewStatus::Processing)
                | (ReviewStatus::Processing, ReviewStatus::Completed)
                | (ReviewStatus::Processing, ReviewStatus::Failed)
        )
    }

    pub fn is_final(&self) -> bool {
        matches!(self, ReviewStatus::Completed | ReviewStatus::Failed)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReviewStatus::Created => "CREATED",
            ReviewStatus::Uploaded => "UPLOADED",
            ReviewStatus::Processing => "PROCESSING",
            ReviewStatus::Completed => "COMPLETED",
            ReviewStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// Metadata of the document attached to a review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDoc {
    pub filename: Option<String>,
    pub mime: Option<String>,
    pub size_bytes: Option<u64>,
    pub sha256: Option<String>,
    pub storage_key: Option<String>,
}

/// A review record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub review_id: ReviewId,
    pub status: ReviewStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub context_json: Option<serde_json::Value>,
    #[serde(default)]
    pub doc: Option<ReviewDoc>,
}
