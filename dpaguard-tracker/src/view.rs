//! Host-facing view of a tracked review

use dpaguard_core::domain::job::{JobStage, JobStatus};
use dpaguard_core::domain::review::ReviewId;
use serde::Serialize;

use crate::checklist::Checklist;
use crate::session::{Fault, PollSession};

/// Read-only snapshot of the session, republished after every transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerView {
    pub review_id: ReviewId,
    pub job_id: Option<String>,
    pub job_state: JobStage,
    pub checklist: Checklist,
    pub paused: bool,
    pub job_failed: bool,
    pub completed: bool,
    pub restarting: bool,
    pub fault: Option<Fault>,
    pub error_message: Option<String>,
    pub last_response: Option<JobStatus>,
    /// Offer a retry control (polling paused by the breaker)
    pub show_retry: bool,
    /// Offer a restart control (the job failed)
    pub show_restart: bool,
    /// Outcome of the last diagnostics copy
    pub notice: Option<String>,
    /// Status queries issued so far
    pub queries_issued: u64,
}

impl TrackerView {
    pub fn from_session(session: &PollSession, notice: Option<String>, queries_issued: u64) -> Self {
        Self {
            review_id: session.review_id().clone(),
            job_id: session.job_id().map(str::to_string),
            job_state: session.job_state(),
            checklist: Checklist::from_session(session),
            paused: session.paused(),
            job_failed: session.job_failed(),
            completed: session.completed(),
            restarting: session.restarting(),
            fault: session.fault(),
            error_message: session.error_message().map(str::to_string),
            last_response: session.last_response().cloned(),
            show_retry: session.paused() && !session.job_failed(),
            show_restart: session.job_failed(),
            notice,
            queries_issued,
        }
    }
}

/// Support bundle copied to the clipboard on request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics<'a> {
    pub review_id: &'a ReviewId,
    pub job_id: Option<&'a str>,
    pub job_state: JobStage,
    pub last_response: Option<&'a JobStatus>,
    pub error_message: Option<&'a str>,
}

impl<'a> Diagnostics<'a> {
    pub fn from_session(session: &'a PollSession) -> Self {
        Self {
            review_id: session.review_id(),
            job_id: session.job_id(),
            job_state: session.job_state(),
            last_response: session.last_response(),
            error_message: session.error_message(),
        }
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
