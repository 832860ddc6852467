//! Mock implementations for testing.
//!
//! `MockTransport` replays queued responses and records what was sent;
//! `MockSigner` stamps fixed headers without touching any credentials.

mod signer;
mod transport;

pub use signer::{MockSigner, SignCall, MOCK_AUTHORIZATION};
pub use transport::{MockResponse, MockTransport};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Body S3-compatible stores return when a bucket name is owned elsewhere.
pub const BUCKET_ALREADY_EXISTS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
    <Code>BucketAlreadyExists</Code>
    <BucketName>taken</BucketName>
    <RequestId>tx000000000000000000001-0000000000-0000-default</RequestId>
</Error>"#;

/// Body returned for an unknown bucket.
pub const NO_SUCH_BUCKET_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
    <Code>NoSuchBucket</Code>
    <RequestId>tx000000000000000000002-0000000000-0000-default</RequestId>
</Error>"#;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
