//! Provider block configuration and its environment fallback.

use crate::config::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_REGION};
use crate::credentials::AwsCredentials;
use crate::error::ConfigurationError;
use serde::Deserialize;

/// Environment variable for `access_key`.
pub const ACCESS_KEY_ENV: &str = "S3_ACCESS_KEY";
/// Environment variable for `secret_key`.
pub const SECRET_KEY_ENV: &str = "S3_SECRET";
/// Environment variable for `region`.
pub const REGION_ENV: &str = "S3_REGION";
/// Environment variable for `endpoint`.
pub const ENDPOINT_ENV: &str = "S3_ENDPOINT";

/// The provider block as written by the user. Every field may be absent.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Access key id.
    pub access_key: Option<String>,
    /// Secret access key.
    pub secret_key: Option<String>,
    /// Signing region.
    pub region: Option<String>,
    /// Endpoint host.
    pub endpoint: Option<String>,
}

/// Configuration ready to build a storage client from.
#[derive(Debug)]
pub struct ResolvedConfig {
    /// Credentials for the signer.
    pub credentials: AwsCredentials,
    /// Endpoint configuration.
    pub client: ClientConfig,
}

impl ProviderConfig {
    /// Fill unset attributes through a variable lookup.
    ///
    /// Attributes set in the block win over the environment.
    pub fn with_lookup(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            access_key: self.access_key.or_else(|| lookup(ACCESS_KEY_ENV)),
            secret_key: self.secret_key.or_else(|| lookup(SECRET_KEY_ENV)),
            region: self.region.or_else(|| lookup(REGION_ENV)),
            endpoint: self.endpoint.or_else(|| lookup(ENDPOINT_ENV)),
        }
    }

    /// Resolve into a client configuration.
    ///
    /// Returns `Ok(None)` when the access key or secret key is blank after
    /// trimming; the provider then stays unconfigured without reporting an
    /// error. A blank region or endpoint takes its default.
    pub fn resolve(&self) -> Result<Option<ResolvedConfig>, ConfigurationError> {
        let access_key = trimmed(&self.access_key);
        let secret_key = trimmed(&self.secret_key);
        if access_key.is_empty() || secret_key.is_empty() {
            return Ok(None);
        }

        let client = ClientConfig::builder()
            .region(or_default(trimmed(&self.region), DEFAULT_REGION))
            .endpoint(or_default(trimmed(&self.endpoint), DEFAULT_ENDPOINT))
            .build()?;

        Ok(Some(ResolvedConfig {
            credentials: AwsCredentials::new(access_key, secret_key),
            client,
        }))
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "[REDACTED]"))
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn trimmed(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or_default()
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}
