//! Configuration types for the storage client.
//!
//! `ClientConfig` describes where buckets live and how to reach them. It is
//! built once per provider configuration and never changes afterwards.

use crate::error::ConfigurationError;
use crate::types::CannedAcl;
use std::time::Duration;

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "dc-sto1";

/// Endpoint host used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "objects.dc-sto1.glesys.net";

/// ACL applied to every bucket the provider creates.
pub const DEFAULT_ACL: CannedAcl = CannedAcl::Private;

/// Configuration for the storage client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Signing region (e.g. "dc-sto1").
    pub region: String,

    /// Endpoint host, optionally with a port. Never carries a scheme.
    pub endpoint: String,

    /// Put the bucket name in the host name instead of the path.
    ///
    /// Path-style: `https://endpoint/bucket`
    /// Virtual-hosted: `https://bucket.endpoint`
    pub virtual_hosted: bool,

    /// Talk plain HTTP instead of HTTPS.
    pub insecure: bool,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Timeout for a whole request including the body.
    pub read_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            virtual_hosted: false,
            insecure: false,
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// URL scheme for the configured transport security.
    pub fn scheme(&self) -> &'static str {
        if self.insecure {
            "http"
        } else {
            "https"
        }
    }

    /// Build the URL string for a bucket according to the hosting style.
    pub fn bucket_url(&self, bucket: &str) -> String {
        if self.virtual_hosted {
            format!("{}://{}.{}", self.scheme(), bucket, self.endpoint)
        } else {
            format!("{}://{}/{}", self.scheme(), self.endpoint, bucket)
        }
    }
}

/// Builder for client configuration.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    region: Option<String>,
    endpoint: Option<String>,
    virtual_hosted: Option<bool>,
    insecure: Option<bool>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Set the signing region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the endpoint host.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Enable virtual-hosted bucket addressing.
    pub fn virtual_hosted(mut self, enabled: bool) -> Self {
        self.virtual_hosted = Some(enabled);
        self
    }

    /// Use plain HTTP.
    pub fn insecure(mut self, enabled: bool) -> Self {
        self.insecure = Some(enabled);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<ClientConfig, ConfigurationError> {
        let defaults = ClientConfig::default();
        let endpoint = self.endpoint.unwrap_or(defaults.endpoint);
        validate_endpoint(&endpoint)?;

        Ok(ClientConfig {
            region: self.region.unwrap_or(defaults.region),
            endpoint,
            virtual_hosted: self.virtual_hosted.unwrap_or(defaults.virtual_hosted),
            insecure: self.insecure.unwrap_or(defaults.insecure),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            read_timeout: self.read_timeout.unwrap_or(defaults.read_timeout),
        })
    }
}

/// The endpoint is spliced into a URL, so it must be a bare `host[:port]`.
fn validate_endpoint(endpoint: &str) -> Result<(), ConfigurationError> {
    let invalid = |details: &str| ConfigurationError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        details: details.to_string(),
    };

    if endpoint.trim().is_empty() {
        return Err(invalid("endpoint is empty"));
    }
    if endpoint.contains("://") {
        return Err(invalid("expected a host name without a scheme"));
    }
    if endpoint.contains(['/', '?', '#']) || endpoint.chars().any(char::is_whitespace) {
        return Err(invalid("expected a bare host name, optionally with a port"));
    }
    Ok(())
}
