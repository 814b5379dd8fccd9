//! Configuration module
//!
//! Handles CLI configuration including the review API URL and the tracker
//! overrides shared by the commands that follow a job.

use clap::Args;
use dpaguard_tracker::TrackerConfig;
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the review API
    pub api_url: String,
}

/// Tracker overrides accepted by `watch` and `submit`
#[derive(Debug, Clone, Default, Args)]
pub struct PollArgs {
    /// Milliseconds between job status queries
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Consecutive failed queries before polling pauses
    #[arg(long)]
    pub failure_threshold: Option<u32>,
}

impl PollArgs {
    /// Tracker configuration: environment first, then these flags
    pub fn tracker_config(&self) -> TrackerConfig {
        let mut config = TrackerConfig::from_env();
        if let Some(ms) = self.poll_interval_ms {
            config = config.with_poll_interval(Duration::from_millis(ms));
        }
        if let Some(threshold) = self.failure_threshold {
            config = config.with_failure_threshold(threshold);
        }
        config
    }
}
