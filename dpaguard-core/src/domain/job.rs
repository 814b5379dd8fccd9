//! Job domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Coarse progress marker reported by the analysis backend
///
/// Anything the backend reports that is not one of the known markers
/// (including a missing or null value) is read as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum JobStage {
    #[default]
    Pending,
    Started,
    Success,
    Failure,
}

impl JobStage {
    /// Parses a backend stage marker, falling back to `Pending`
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "STARTED" => JobStage::Started,
            "SUCCESS" => JobStage::Success,
            "FAILURE" => JobStage::Failure,
            _ => JobStage::Pending,
        }
    }

    /// Wire representation of the stage
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStage::Pending => "PENDING",
            JobStage::Started => "STARTED",
            JobStage::Success => "SUCCESS",
            JobStage::Failure => "FAILURE",
        }
    }

    /// Whether the stage is a terminal outcome
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStage::Success | JobStage::Failure)
    }
}

impl From<Option<String>> for JobStage {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().map(JobStage::parse).unwrap_or_default()
    }
}

impl From<JobStage> for String {
    fn from(stage: JobStage) -> Self {
        stage.as_str().to_string()
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time status of a review's analysis job
///
/// Returned by `GET /reviews/{id}/job`. `ready` and `successful` are kept
/// optional: a payload that omits them says nothing about the outcome.
/// Fields the backend adds beyond these are preserved in `extra` so the
/// raw payload can be reproduced for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(rename = "state", alias = "stage", default)]
    pub stage: JobStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successful: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl JobStatus {
    /// Creates a status carrying only a stage marker
    pub fn with_stage(stage: JobStage) -> Self {
        Self {
            stage,
            ..Default::default()
        }
    }

    /// The job finished and did not succeed
    pub fn is_failed(&self) -> bool {
        self.stage == JobStage::Failure
            || (self.ready == Some(true) && self.successful == Some(false))
    }

    /// The job finished successfully
    pub fn is_succeeded(&self) -> bool {
        self.stage == JobStage::Success || self.successful == Some(true)
    }

    /// Human-readable failure explanation, preferring `error` over `detail`
    pub fn failure_reason(&self) -> Option<&str> {
        [self.error.as_deref(), self.detail.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|reason| !reason.is_empty())
    }
}
