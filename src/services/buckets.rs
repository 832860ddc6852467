//! Buckets service: create, delete and existence checks.

use crate::error::{BucketError, ProviderError};
use crate::resilience::RetryPolicy;
use crate::sender::{Request, SendOutput, Sender};
use crate::types::CannedAcl;
use std::sync::Arc;
use tracing::{debug, info};

/// Body marker for a bucket name owned by another account.
const BUCKET_ALREADY_EXISTS: &str = "<Code>BucketAlreadyExists</Code>";

/// Service for bucket operations.
pub struct BucketsService {
    sender: Arc<Sender>,
    create_retry: RetryPolicy,
}

impl BucketsService {
    /// Create a new buckets service.
    pub fn new(sender: Arc<Sender>, create_retry: RetryPolicy) -> Self {
        Self {
            sender,
            create_retry,
        }
    }

    /// Create a bucket with the given canned ACL.
    ///
    /// 200 is success. A 409 carrying `BucketAlreadyExists` fails at once;
    /// any other status is retried under the creation retry policy, and
    /// the last status and body are reported once attempts run out.
    pub async fn create(&self, name: &str, acl: CannedAcl) -> Result<(), ProviderError> {
        self.create_retry
            .execute(|attempt| async move {
                debug!(bucket = name, attempt, acl = acl.as_str(), "creating bucket");
                let output = self
                    .sender
                    .send(Request::new("PUT", name).with_header("x-amz-acl", acl.as_str()))
                    .await?;
                check_create(name, output)
            })
            .await?;

        info!(bucket = name, "bucket created");
        Ok(())
    }

    /// Delete a bucket. Only 204 counts as success.
    pub async fn delete(&self, name: &str) -> Result<(), ProviderError> {
        let output = self.sender.send(Request::new("DELETE", name)).await?;
        if output.status == 204 {
            info!(bucket = name, "bucket deleted");
            return Ok(());
        }
        Err(BucketError::unexpected_status(
            "deleteBucket",
            "delete",
            name,
            output.status,
            &output.body,
        )
        .into())
    }

    /// Check that a bucket exists and is accessible by reading its ACL.
    pub async fn exists(&self, name: &str) -> Result<(), ProviderError> {
        let output = self
            .sender
            .send(Request::new("GET", name).with_param("acl", ""))
            .await?;
        if output.status == 200 {
            return Ok(());
        }
        Err(BucketError::unexpected_status(
            "bucketExist",
            "check",
            name,
            output.status,
            &output.body,
        )
        .into())
    }
}

fn check_create(name: &str, output: SendOutput) -> Result<(), ProviderError> {
    if output.status == 200 {
        return Ok(());
    }
    if output.status == 409 && String::from_utf8_lossy(&output.body).contains(BUCKET_ALREADY_EXISTS)
    {
        return Err(BucketError::AlreadyExists {
            bucket: name.to_string(),
        }
        .into());
    }
    Err(BucketError::unexpected_status(
        "createBucket",
        "create",
        name,
        output.status,
        &output.body,
    )
    .into())
}

impl std::fmt::Debug for BucketsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketsService")
            .field("sender", &self.sender)
            .field("create_retry", &self.create_retry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn output(status: u16, body: &'static str) -> SendOutput {
        SendOutput {
            status,
            body: Bytes::from(body),
        }
    }

    #[test]
    fn test_check_create_ok() {
        assert!(check_create("b", output(200, "")).is_ok());
    }

    #[test]
    fn test_check_create_conflict_is_terminal() {
        let err = check_create("b", output(409, "<Error><Code>BucketAlreadyExists</Code></Error>"))
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Bucket(BucketError::AlreadyExists { .. })
        ));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_check_create_owned_conflict_is_retryable() {
        let err = check_create(
            "b",
            output(409, "<Error><Code>BucketAlreadyOwnedByYou</Code></Error>"),
        )
        .unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err.status_code(), Some(409));
    }

    #[test]
    fn test_check_create_other_status() {
        let err = check_create("b", output(201, "")).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err.status_code(), Some(201));
    }
}
