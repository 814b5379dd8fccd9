//! Poll timer

use std::time::Duration;
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::debug;

/// Repeating timer that paces status queries
///
/// A started scheduler ticks once immediately, then every `period`. A stopped
/// scheduler never ticks.
pub struct PollScheduler {
    period: Duration,
    interval: Option<Interval>,
}

impl PollScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    /// Starts ticking, replacing any running timer
    pub fn start(&mut self) {
        self.stop();
        let mut interval = time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
        debug!("Poll timer started (period: {:?})", self.period);
    }

    pub fn stop(&mut self) {
        if self.interval.take().is_some() {
            debug!("Poll timer stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Waits for the next tick; pends forever while stopped
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
