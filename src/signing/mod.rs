//! AWS Signature V4 signing.
//!
//! Only header-based signing is needed: every bucket call carries an
//! `Authorization` header computed over the canonical request, with the
//! payload hash sent in `x-amz-content-sha256`.

mod canonical;
mod signer;

pub use canonical::CanonicalRequest;
pub use signer::{AwsSigner, AwsSignerV4, SignedRequest};

use crate::credentials::AwsCredentials;
use crate::error::SigningError;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// AWS Signature V4 algorithm identifier.
pub const AWS_ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Service name for S3.
pub const S3_SERVICE: &str = "s3";

/// Calculate SHA-256 hash of data.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Calculate HMAC-SHA256.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, SigningError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| SigningError::CalculationFailed {
        message: e.to_string(),
    })?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Generate the signing key for AWS Signature V4.
///
/// kDate = HMAC("AWS4" + SecretKey, Date)
/// kRegion = HMAC(kDate, Region)
/// kService = HMAC(kRegion, Service)
/// kSigning = HMAC(kService, "aws4_request")
pub fn derive_signing_key(
    secret_key: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, SigningError> {
    let k_secret = format!("AWS4{}", secret_key);
    let k_date = hmac_sha256(k_secret.as_bytes(), date_stamp.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

/// Build the credential scope string.
///
/// Format: `{date}/{region}/{service}/aws4_request`
pub fn build_credential_scope(date_stamp: &str, region: &str, service: &str) -> String {
    format!("{}/{}/{}/aws4_request", date_stamp, region, service)
}

/// Format a timestamp for AWS signatures (`YYYYMMDD'T'HHMMSS'Z'`).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Format a date stamp for AWS signatures (`YYYYMMDD`).
pub fn format_date_stamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%d").to_string()
}

/// Check if a header takes part in the signature.
pub fn should_sign_header(header_name: &str) -> bool {
    let name_lower = header_name.to_lowercase();

    if name_lower == "host" || name_lower.starts_with("x-amz-") {
        return true;
    }

    name_lower == "content-type" || name_lower == "content-md5" || name_lower == "content-length"
}

/// Where and as whom a request is signed.
#[derive(Debug, Clone, Copy)]
pub struct SigningScope<'a> {
    /// Signing region.
    pub region: &'a str,
    /// Signing service.
    pub service: &'a str,
    /// Request time.
    pub timestamp: &'a DateTime<Utc>,
}

/// Compute the `Authorization` header value for a canonical request.
pub fn authorization_header(
    request: &CanonicalRequest<'_>,
    credentials: &AwsCredentials,
    scope: SigningScope<'_>,
) -> Result<String, SigningError> {
    let date_stamp = format_date_stamp(scope.timestamp);
    let amz_date = format_datetime(scope.timestamp);
    let credential_scope = build_credential_scope(&date_stamp, scope.region, scope.service);

    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        AWS_ALGORITHM,
        amz_date,
        credential_scope,
        sha256_hex(request.to_string().as_bytes())
    );

    let signing_key = derive_signing_key(
        credentials.secret_access_key(),
        &date_stamp,
        scope.region,
        scope.service,
    )?;
    let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

    Ok(format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        AWS_ALGORITHM,
        credentials.access_key_id(),
        credential_scope,
        request.signed_headers(),
        signature
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex(b"test"),
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_derive_signing_key_reference_value() {
        let key = derive_signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        )
        .unwrap();
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn test_build_credential_scope() {
        let scope = build_credential_scope("20231215", "dc-sto1", "s3");
        assert_eq!(scope, "20231215/dc-sto1/s3/aws4_request");
    }

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2023, 12, 15, 10, 30, 45).unwrap();
        assert_eq!(format_datetime(&dt), "20231215T103045Z");
        assert_eq!(format_date_stamp(&dt), "20231215");
    }

    #[test]
    fn test_should_sign_header() {
        assert!(should_sign_header("Host"));
        assert!(should_sign_header("x-amz-acl"));
        assert!(should_sign_header("X-Amz-Content-Sha256"));
        assert!(should_sign_header("Content-Type"));
        assert!(!should_sign_header("User-Agent"));
        assert!(!should_sign_header("Accept"));
    }

    #[test]
    fn test_authorization_header_get_vanilla() {
        let credentials =
            AwsCredentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
        let timestamp = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();
        let headers = vec![
            ("host".to_string(), "example.amazonaws.com".to_string()),
            ("x-amz-date".to_string(), "20150830T123600Z".to_string()),
        ];
        let empty_hash = sha256_hex(b"");
        let request = CanonicalRequest::new("GET", "/", "", &headers, &empty_hash);

        let authorization = authorization_header(
            &request,
            &credentials,
            SigningScope {
                region: "us-east-1",
                service: "service",
                timestamp: &timestamp,
            },
        )
        .unwrap();

        assert_eq!(
            authorization,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
             SignedHeaders=host;x-amz-date, \
             Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
        );
    }
}
