//! Data Transfer Objects for the review API
//!
//! Request and response bodies exchanged with the review backend that have
//! no life outside a single call. Long-lived entities live in `domain`.

pub mod review;
