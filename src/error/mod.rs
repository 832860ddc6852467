//! Error types for the Ceph provider.
//!
//! Errors are grouped by the layer that produces them: the signed HTTP
//! sender reports the phase that failed, the storage client reports
//! unexpected responses, and configuration errors come from resolving the
//! provider block. The resource layer turns all of them into diagnostics.

use thiserror::Error;

/// Top-level error type for the provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Errors raised while building, signing or sending a request.
    #[error("send: {0}")]
    Send(#[from] SendError),

    /// Bucket operation errors.
    #[error("{0}")]
    Bucket(#[from] BucketError),
}

impl ProviderError {
    /// Returns true if repeating the same request may succeed.
    ///
    /// Only unexpected status codes qualify; transport failures and the
    /// ownership conflict are reported straight away.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::Bucket(BucketError::UnexpectedStatus { .. })
        )
    }

    /// Returns the HTTP status code if the error came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProviderError::Bucket(BucketError::UnexpectedStatus { status, .. }) => Some(*status),
            ProviderError::Bucket(BucketError::AlreadyExists { .. }) => Some(409),
            ProviderError::Send(SendError::ReadBody { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The endpoint is not a bare host name.
    #[error("Invalid endpoint '{endpoint}': {details}")]
    InvalidEndpoint {
        /// The rejected endpoint value.
        endpoint: String,
        /// Why it was rejected.
        details: String,
    },

    /// A resource operation ran before the provider produced a client.
    #[error("provider is not configured: access_key and secret_key must be set")]
    NotConfigured,

    /// The HTTP transport could not be built.
    #[error("failed to build HTTP transport: {message}")]
    Transport {
        /// Error message.
        message: String,
    },
}

/// Errors from the signed HTTP sender, one variant per phase.
#[derive(Debug, Error)]
pub enum SendError {
    /// The bucket URL could not be parsed.
    #[error("failed to parse URL: {url}, {message}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// Parser message.
        message: String,
    },

    /// The HTTP request could not be constructed.
    #[error("failed to create request, {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// The request could not be signed.
    #[error("failed to sign request, {0}")]
    Signing(#[from] SigningError),

    /// The request could not be delivered.
    #[error("error while sending request, {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// The response body could not be read.
    #[error("error while reading response (status {status}), {message}")]
    ReadBody {
        /// Status code received before the body failed.
        status: u16,
        /// Error message.
        message: String,
    },
}

/// AWS Signature V4 signing errors.
#[derive(Debug, Error)]
pub enum SigningError {
    /// Signature calculation failed.
    #[error("signature calculation failed: {message}")]
    CalculationFailed {
        /// Details about the calculation error.
        message: String,
    },

    /// The URL has no host to sign.
    #[error("missing host in URL '{url}'")]
    MissingHost {
        /// The URL without a host.
        url: String,
    },
}

/// Bucket operation errors.
#[derive(Debug, Error)]
pub enum BucketError {
    /// The bucket name is taken by another account.
    #[error("createBucket: '{bucket}' bucket already exists under different user's ownership")]
    AlreadyExists {
        /// The bucket name.
        bucket: String,
    },

    /// The storage endpoint answered with a status the operation does not accept.
    #[error("{operation}: failed to {action} bucket '{bucket}', status code: {status}, response: {body}")]
    UnexpectedStatus {
        /// Operation name used as the message prefix.
        operation: &'static str,
        /// Verb describing what failed.
        action: &'static str,
        /// The bucket name.
        bucket: String,
        /// HTTP status code.
        status: u16,
        /// Raw response body, lossily decoded.
        body: String,
    },
}

impl BucketError {
    /// Build an unexpected-status error from a raw response.
    pub fn unexpected_status(
        operation: &'static str,
        action: &'static str,
        bucket: &str,
        status: u16,
        body: &[u8],
    ) -> Self {
        BucketError::UnexpectedStatus {
            operation,
            action,
            bucket: bucket.to_string(),
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unexpected_status_is_retryable() {
        let unexpected = ProviderError::Bucket(BucketError::unexpected_status(
            "createBucket",
            "create",
            "b",
            403,
            b"<Code>InvalidAccessKeyId</Code>",
        ));
        assert!(unexpected.is_retryable());

        let conflict = ProviderError::Bucket(BucketError::AlreadyExists { bucket: "b".into() });
        assert!(!conflict.is_retryable());

        let transport = ProviderError::Send(SendError::Transport {
            message: "connection refused".into(),
        });
        assert!(!transport.is_retryable());
    }

    #[test]
    fn test_status_code() {
        let err = ProviderError::Bucket(BucketError::unexpected_status(
            "deleteBucket",
            "delete",
            "b",
            409,
            b"",
        ));
        assert_eq!(err.status_code(), Some(409));

        let err = ProviderError::Configuration(ConfigurationError::NotConfigured);
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_unexpected_status_message_carries_status_and_body() {
        let err = BucketError::unexpected_status(
            "bucketExist",
            "check",
            "photos",
            404,
            b"<Code>NoSuchBucket</Code>",
        );
        let msg = err.to_string();
        assert!(msg.starts_with("bucketExist:"));
        assert!(msg.contains("404"));
        assert!(msg.contains("<Code>NoSuchBucket</Code>"));
    }

    #[test]
    fn test_send_error_names_phase() {
        let err = ProviderError::from(SendError::Signing(SigningError::CalculationFailed {
            message: "bad key".into(),
        }));
        assert_eq!(
            err.to_string(),
            "send: failed to sign request, signature calculation failed: bad key"
        );
    }
}
