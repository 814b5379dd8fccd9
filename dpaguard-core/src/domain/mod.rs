//! Core domain types
//!
//! This module contains the core domain structures used across DPA Guard crates.
//! These types mirror what the review API reports and are shared between
//! the HTTP client (for decoding) and the tracker (for state transitions).

pub mod job;
pub mod review;
