//! DPA Guard Core
//!
//! Core types and abstractions for the DPA Guard review tooling.
//!
//! This crate contains:
//! - Domain types: Core business entities (Review, JobStatus, etc.)
//! - DTOs: Request/response bodies exchanged with the review API
//! - Intake rules: Review context and upload validation
//! - Report normalization: Turning raw analysis payloads into display-ready findings

pub mod domain;
pub mod dto;
pub mod intake;
pub mod report;
