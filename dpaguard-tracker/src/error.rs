//! Error types for the tracker

use thiserror::Error;

/// Errors surfaced to the host by the tracker handle
///
/// Failures of the tracked job or of the review API never show up here:
/// they become part of the session state and the view.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The configuration cannot drive a poll loop
    #[error("Invalid tracker configuration: {0}")]
    InvalidConfig(String),

    /// The tracking task is no longer running
    #[error("Tracker for review {0} has stopped")]
    Stopped(String),
}
