//! Resilience layer for bucket operations.
//!
//! Bucket creation on a freshly provisioned storage backend may be refused
//! until the new access key has propagated, so creation runs under a small
//! fixed retry budget. Nothing else is retried.

mod retry;

pub use retry::{RetryConfig, RetryPolicy};
