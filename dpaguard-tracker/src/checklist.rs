//! Processing checklist
//!
//! The five milestones shown while a review is processed. The backend only
//! reports coarse stages, so the checklist is derived from the session
//! rather than reported milestone by milestone.

use serde::Serialize;
use std::fmt;

use crate::session::PollSession;

/// Fixed processing milestones, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    Uploaded,
    Extracted,
    Classifying,
    Evaluating,
    Reporting,
}

impl Milestone {
    pub const ALL: [Milestone; 5] = [
        Milestone::Uploaded,
        Milestone::Extracted,
        Milestone::Classifying,
        Milestone::Evaluating,
        Milestone::Reporting,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Milestone::Uploaded => "Document uploaded",
            Milestone::Extracted => "Text extracted",
            Milestone::Classifying => "Classifying clauses...",
            Milestone::Evaluating => "Evaluating risk",
            Milestone::Reporting => "Generating report",
        }
    }
}

/// Status of a single milestone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneStatus {
    Done,
    Active,
    Pending,
    Error,
}

impl fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MilestoneStatus::Done => "done",
            MilestoneStatus::Active => "active",
            MilestoneStatus::Pending => "pending",
            MilestoneStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Status of every milestone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Checklist([MilestoneStatus; 5]);

impl Checklist {
    /// Derives the checklist from the session
    ///
    /// A failed job is always shown as failing while classifying: the
    /// backend does not say which step broke.
    pub fn from_session(session: &PollSession) -> Self {
        use MilestoneStatus::*;

        if session.job_failed() {
            Self([Done, Done, Error, Pending, Pending])
        } else if session.completed() {
            Self([Done; 5])
        } else {
            Self([Done, Done, Active, Pending, Pending])
        }
    }

    pub fn statuses(&self) -> [MilestoneStatus; 5] {
        self.0
    }

    pub fn status_of(&self, milestone: Milestone) -> MilestoneStatus {
        self.0[milestone as usize]
    }

    /// Milestones paired with their statuses, in order
    pub fn items(&self) -> impl Iterator<Item = (Milestone, MilestoneStatus)> + '_ {
        Milestone::ALL.into_iter().zip(self.0)
    }
}
