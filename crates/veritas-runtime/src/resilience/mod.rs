//! Resilience patterns for veritas-runtime.
//!
//! This module provides bounded retry with exponential backoff for
//! transient failures. There is deliberately no circuit breaker or rate
//! limiter: each check is a single interactive request.

mod retry;

pub use retry::{RetryPolicy, Transient};
