//! Structured tracing events for token refreshes and content calls.

pub mod call;
pub mod refresh;
