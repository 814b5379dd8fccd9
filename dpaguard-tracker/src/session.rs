//! Job state machine
//!
//! [`PollSession`] holds everything known about the tracked job and is the
//! only place that state changes. Every query result, query failure and user
//! action goes through one of its transition methods, each of which tells
//! the scheduler what to do next via a [`Directive`].
//!
//! Two kinds of failure are kept apart:
//! - transport failures (the status request itself failed) are counted and
//!   trip a breaker after a threshold; `retry` resumes polling
//! - job failures (the backend reports the job failed) are terminal until
//!   the job is restarted

use dpaguard_core::domain::job::{JobStage, JobStatus};
use dpaguard_core::domain::review::ReviewId;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Message shown when the backend reports failure without an explanation
pub const DEFAULT_FAILURE_MESSAGE: &str = "Processing failed. Please retry or restart.";

/// What the scheduler should do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Keep polling on the regular interval
    Continue,
    /// Stop polling until the user acts
    Pause,
    /// The job succeeded; stop polling and notify completion
    Complete,
}

/// Kind of fault currently reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fault {
    /// Status queries are failing
    Transport,
    /// The job itself failed
    Job,
    /// The last restart request failed
    Restart,
}

/// Why a restart request was not sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartRejection {
    InProgress,
    Completed,
}

/// State of one tracked review
#[derive(Debug, Clone)]
pub struct PollSession {
    review_id: ReviewId,
    job_id: Option<String>,
    job_state: JobStage,
    consecutive_transport_failures: u32,
    job_failed: bool,
    paused: bool,
    completed: bool,
    restarting: bool,
    generation: u64,
    last_response: Option<JobStatus>,
    error_message: Option<String>,
    fault: Option<Fault>,
}

impl PollSession {
    pub fn new(review_id: ReviewId, job_id: Option<String>) -> Self {
        Self {
            review_id,
            job_id,
            job_state: JobStage::Pending,
            consecutive_transport_failures: 0,
            job_failed: false,
            paused: false,
            completed: false,
            restarting: false,
            generation: 0,
            last_response: None,
            error_message: None,
            fault: None,
        }
    }

    pub fn review_id(&self) -> &ReviewId {
        &self.review_id
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn job_state(&self) -> JobStage {
        self.job_state
    }

    pub fn consecutive_transport_failures(&self) -> u32 {
        self.consecutive_transport_failures
    }

    pub fn job_failed(&self) -> bool {
        self.job_failed
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn restarting(&self) -> bool {
        self.restarting
    }

    /// Incremented by every successful restart; responses to queries issued
    /// under an older generation are stale
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_response(&self) -> Option<&JobStatus> {
        self.last_response.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn fault(&self) -> Option<Fault> {
        self.fault
    }

    /// Whether the scheduler should be polling
    pub fn is_active(&self) -> bool {
        !self.paused && !self.completed
    }

    /// Whether a response to a query issued under `generation` may still be applied
    pub fn accepts(&self, generation: u64) -> bool {
        generation == self.generation && self.is_active()
    }

    /// Records a status query that could not complete
    ///
    /// # Arguments
    /// * `message` - User-facing description of the failure
    /// * `threshold` - Consecutive failures after which polling pauses
    pub fn on_transport_failure(&mut self, message: String, threshold: u32) -> Directive {
        self.consecutive_transport_failures += 1;
        let failures = self.consecutive_transport_failures;

        if failures >= threshold {
            warn!(
                "Status query for review {} failed {} times in a row, pausing: {}",
                self.review_id, failures, message
            );
            self.paused = true;
            self.error_message = Some(message);
            self.fault = Some(Fault::Transport);
            return Directive::Pause;
        }

        debug!(
            "Status query for review {} failed ({}/{}): {}",
            self.review_id, failures, threshold, message
        );
        Directive::Continue
    }

    /// Applies a status reported by the backend
    pub fn on_status(&mut self, status: JobStatus) -> Directive {
        self.consecutive_transport_failures = 0;
        self.error_message = None;
        self.fault = None;
        if let Some(job_id) = &status.job_id {
            self.job_id = Some(job_id.clone());
        }

        let directive = if status.is_failed() {
            let message = status
                .failure_reason()
                .unwrap_or(DEFAULT_FAILURE_MESSAGE)
                .to_string();
            warn!("Job for review {} failed: {}", self.review_id, message);
            self.job_state = JobStage::Failure;
            self.job_failed = true;
            self.paused = true;
            self.error_message = Some(message);
            self.fault = Some(Fault::Job);
            Directive::Pause
        } else if status.is_succeeded() {
            info!("Job for review {} succeeded", self.review_id);
            self.job_state = JobStage::Success;
            self.completed = true;
            Directive::Complete
        } else {
            if status.stage != self.job_state {
                debug!(
                    "Job for review {} moved {} -> {}",
                    self.review_id, self.job_state, status.stage
                );
            }
            self.job_state = status.stage;
            Directive::Continue
        };

        self.last_response = Some(status);
        directive
    }

    /// Clears a pause so polling can resume
    ///
    /// Returns whether polling should resume. A session that was not paused,
    /// or that already completed, is left as is. Resuming a failed job simply
    /// re-queries it: if the backend still reports failure the session pauses
    /// again.
    pub fn resume(&mut self) -> bool {
        if self.completed || !self.paused {
            return false;
        }

        info!("Resuming status polling for review {}", self.review_id);
        self.consecutive_transport_failures = 0;
        self.error_message = None;
        self.fault = None;
        self.paused = false;
        self.job_failed = false;
        true
    }

    /// Marks a restart request as in flight
    pub fn begin_restart(&mut self) -> Result<(), RestartRejection> {
        if self.completed {
            return Err(RestartRejection::Completed);
        }
        if self.restarting {
            return Err(RestartRejection::InProgress);
        }
        self.restarting = true;
        Ok(())
    }

    /// Applies a successful restart and opens a new generation
    ///
    /// A session that completed while the start call was in flight keeps its
    /// completed state and rejects the restart.
    pub fn restart_succeeded(&mut self, job_id: Option<String>) -> Result<(), RestartRejection> {
        self.restarting = false;
        if self.completed {
            info!(
                "Ignoring restart of review {}: the job already succeeded",
                self.review_id
            );
            return Err(RestartRejection::Completed);
        }
        self.generation += 1;
        if job_id.is_some() {
            self.job_id = job_id;
        }
        self.job_state = JobStage::Pending;
        self.consecutive_transport_failures = 0;
        self.job_failed = false;
        self.paused = false;
        self.error_message = None;
        self.fault = None;
        info!(
            "Restarted job for review {} (generation {})",
            self.review_id, self.generation
        );
        Ok(())
    }

    /// Records a restart request that did not reach the backend
    ///
    /// The pause and failure state are kept: the restart did not take effect.
    pub fn restart_failed(&mut self, message: String) {
        self.restarting = false;
        warn!("Restart of review {} failed: {}", self.review_id, message);
        self.error_message = Some(message);
        self.fault = Some(Fault::Restart);
    }
}
