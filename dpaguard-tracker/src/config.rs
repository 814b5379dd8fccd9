//! Tracker configuration
//!
//! Defines the timing and failure-handling parameters of the job poll loop.

use std::time::Duration;

use crate::error::TrackerError;

/// Tracker configuration
///
/// All values are overridable so hosts can tune polling for slow backends
/// or speed it up in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// How often to query the job status while the job is running
    pub poll_interval: Duration,

    /// Consecutive transport failures tolerated before polling pauses
    pub failure_threshold: u32,

    /// Pause between observing success and notifying the host, so the
    /// final checklist state is visible before the host moves on
    pub completion_delay: Duration,
}

impl TrackerConfig {
    /// Creates configuration from environment variables
    ///
    /// Recognized environment variables (all optional):
    /// - DPAGUARD_POLL_INTERVAL_MS (default: 1500)
    /// - DPAGUARD_FAILURE_THRESHOLD (default: 3)
    /// - DPAGUARD_COMPLETION_DELAY_MS (default: 400)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let poll_interval = std::env::var("DPAGUARD_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval);

        let failure_threshold = std::env::var("DPAGUARD_FAILURE_THRESHOLD")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(defaults.failure_threshold);

        let completion_delay = std::env::var("DPAGUARD_COMPLETION_DELAY_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.completion_delay);

        Self {
            poll_interval,
            failure_threshold,
            completion_delay,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_failure_threshold(mut self, failure_threshold: u32) -> Self {
        self.failure_threshold = failure_threshold;
        self
    }

    pub fn with_completion_delay(mut self, completion_delay: Duration) -> Self {
        self.completion_delay = completion_delay;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.poll_interval.is_zero() {
            return Err(TrackerError::InvalidConfig(
                "poll_interval must be greater than 0".to_string(),
            ));
        }

        if self.failure_threshold == 0 {
            return Err(TrackerError::InvalidConfig(
                "failure_threshold must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1500),
            failure_threshold: 3,
            completion_delay: Duration::from_millis(400),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrackerConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(1500));
        assert_eq!(config.failure_threshold, 3);
        assert_eq!(config.completion_delay, Duration::from_millis(400));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = TrackerConfig::default().with_poll_interval(Duration::ZERO);
        assert!(config.validate().is_err());

        let config = TrackerConfig::default().with_failure_threshold(0);
        assert!(config.validate().is_err());

        // A zero completion delay is fine: notify right away.
        let config = TrackerConfig::default().with_completion_delay(Duration::ZERO);
        assert!(config.validate().is_ok());
    }
}
