//! Mock signer for testing.

use super::lock;
use crate::error::SigningError;
use crate::signing::{AwsSigner, SignedRequest};
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

/// Authorization value stamped on every request signed by [`MockSigner`].
pub const MOCK_AUTHORIZATION: &str =
    "AWS4-HMAC-SHA256 Credential=mock/20240115/dc-sto1/s3/aws4_request, SignedHeaders=host, Signature=mock";

/// One recorded call to [`MockSigner::sign`].
#[derive(Debug, Clone)]
pub struct SignCall {
    /// HTTP method.
    pub method: String,
    /// URL that was signed.
    pub url: Url,
    /// Caller headers.
    pub headers: HashMap<String, String>,
}

/// Signer that adds fixed headers, or always fails.
#[derive(Debug, Default)]
pub struct MockSigner {
    failure: Option<String>,
    calls: Mutex<Vec<SignCall>>,
}

impl MockSigner {
    /// A signer that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A signer that always fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Number of sign calls, failed ones included.
    pub fn sign_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// The most recent sign call.
    pub fn last_sign_request(&self) -> Option<SignCall> {
        lock(&self.calls).last().cloned()
    }
}

impl AwsSigner for MockSigner {
    fn sign(
        &self,
        method: &str,
        url: &Url,
        headers: &HashMap<String, String>,
        _body: Option<&[u8]>,
    ) -> Result<SignedRequest, SigningError> {
        lock(&self.calls).push(SignCall {
            method: method.to_string(),
            url: url.clone(),
            headers: headers.clone(),
        });

        if let Some(message) = &self.failure {
            return Err(SigningError::CalculationFailed {
                message: message.clone(),
            });
        }

        let mut signed = headers.clone();
        signed.insert("authorization".to_string(), MOCK_AUTHORIZATION.to_string());
        signed.insert("x-amz-date".to_string(), "20240115T100000Z".to_string());
        signed.insert(
            "x-amz-content-sha256".to_string(),
            crate::signing::sha256_hex(b""),
        );

        Ok(SignedRequest {
            method: method.to_string(),
            url: url.clone(),
            headers: signed,
        })
    }
}
