//! Resilience patterns for calls to the Gemini API.
//!
//! Only retry with exponential backoff is provided; one request is in flight
//! at a time, so rate limiting and circuit breaking have nothing to protect.

mod retry;

pub use retry::{RetryConfig, RetryExecutor};
