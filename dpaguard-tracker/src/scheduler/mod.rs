//! Scheduler layer for the tracker
//!
//! This layer owns the repeating poll timer and the task that drives the
//! session. Query and restart calls run as spawned tasks; their results come
//! back to the driving task and are applied there.

pub mod poller;
pub mod ticker;

pub use poller::{Command, SessionPoller};
