//! DPA Guard Tracker
//!
//! Follows the analysis job of a single review from submission to result.
//!
//! Architecture:
//! - Configuration: Poll interval, failure threshold and completion delay
//! - Session: The job state machine and the state it owns
//! - Repositories: Status and start calls against the review API
//! - Scheduler: The repeating poll timer and the task that drives the session
//! - Tracker: The handle a host uses to read the view and trigger actions
//!
//! All session state lives in one task. Host actions and query results reach
//! it as messages, so transitions are applied one at a time in arrival order.

pub mod checklist;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod repository;
mod scheduler;
pub mod session;
pub mod tracker;
pub mod view;

pub use checklist::{Checklist, Milestone, MilestoneStatus};
pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, NoClipboard};
pub use config::TrackerConfig;
pub use error::TrackerError;
pub use repository::{HttpJobRepository, JobRepository};
pub use session::{Directive, Fault, PollSession, RestartRejection};
pub use tracker::{CopyOutcome, RestartOutcome, ReviewTracker, TrackerBuilder};
pub use view::{Diagnostics, TrackerView};
