//! Repository layer
//!
//! Repositories abstract the review API calls the tracker depends on. They
//! carry no business logic: deciding what a failure means is the session's
//! job.
//!
//! Repositories are trait-based so the poll loop can be driven by scripted
//! responses in tests.

mod jobs;

pub use jobs::{HttpJobRepository, JobRepository};
