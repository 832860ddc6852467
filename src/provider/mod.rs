//! Provider entrypoint.
//!
//! Declares the provider schema, turns a provider block into a shared
//! [`StorageClient`] and lists the resource types it serves.

mod config;

pub use config::{
    ProviderConfig, ResolvedConfig, ACCESS_KEY_ENV, ENDPOINT_ENV, REGION_ENV, SECRET_KEY_ENV,
};

use crate::client::StorageClient;
use crate::config::{DEFAULT_ENDPOINT, DEFAULT_REGION};
use crate::diagnostics::Diagnostics;
use crate::resilience::RetryConfig;
use crate::resource::{Resource, S3BucketResource, BUCKET_RESOURCE_TYPE};
use crate::schema::{AttributeSchema, Schema};
use crate::signing::AwsSigner;
use crate::transport::HttpTransport;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Provider and resource schemas, as served to the host.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchema {
    /// Provider block schema.
    pub provider: Schema,
    /// Schema per resource type.
    pub resources: BTreeMap<&'static str, Schema>,
}

/// The provider.
pub struct Provider {
    env: EnvLookup,
    transport: Option<Arc<dyn HttpTransport>>,
    signer: Option<Arc<dyn AwsSigner>>,
    create_retry: RetryConfig,
}

impl Provider {
    /// A provider reading its fallbacks from the process environment.
    pub fn new() -> Self {
        Self {
            env: Box::new(|key| std::env::var(key).ok()),
            transport: None,
            signer: None,
            create_retry: RetryConfig::default(),
        }
    }

    /// Replace the environment lookup.
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.env = Box::new(lookup);
        self
    }

    /// Build clients over this transport instead of HTTPS.
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build clients with this signer instead of SigV4 over the configured keys.
    pub fn with_signer(mut self, signer: Arc<dyn AwsSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Override the retry budget for bucket creation.
    pub fn with_create_retry(mut self, retry: RetryConfig) -> Self {
        self.create_retry = retry;
        self
    }

    /// Resource types served by this provider.
    pub fn resource_types(&self) -> Vec<&'static str> {
        vec![BUCKET_RESOURCE_TYPE]
    }

    /// Provider and resource schemas.
    pub fn schema(&self) -> ProviderSchema {
        let mut resources = BTreeMap::new();
        resources.insert(BUCKET_RESOURCE_TYPE, S3BucketResource.schema());
        ProviderSchema {
            provider: provider_schema(),
            resources,
        }
    }

    /// Configure the provider from a provider block.
    ///
    /// Returns no client and no diagnostics when the credentials are blank,
    /// so the host can still plan without them.
    pub fn configure(&self, config: ProviderConfig) -> (Option<StorageClient>, Diagnostics) {
        let mut diags = Diagnostics::new();

        let resolved = match config.with_lookup(&self.env).resolve() {
            Ok(Some(resolved)) => resolved,
            Ok(None) => {
                warn!("access_key or secret_key not set, skipping provider configuration");
                return (None, diags);
            }
            Err(e) => {
                diags.error(e);
                return (None, diags);
            }
        };

        let region = resolved.client.region.clone();
        let endpoint = resolved.client.endpoint.clone();

        let mut builder = StorageClient::builder(resolved.client, resolved.credentials)
            .create_retry(self.create_retry.clone());
        if let Some(transport) = &self.transport {
            builder = builder.transport(transport.clone());
        }
        if let Some(signer) = &self.signer {
            builder = builder.signer(signer.clone());
        }

        match builder.build() {
            Ok(client) => {
                info!(region = %region, endpoint = %endpoint, "provider configured");
                (Some(client), diags)
            }
            Err(e) => {
                diags.error(e);
                (None, diags)
            }
        }
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("create_retry", &self.create_retry)
            .finish_non_exhaustive()
    }
}

fn provider_schema() -> Schema {
    Schema {
        attributes: vec![
            AttributeSchema::required(
                "access_key",
                "The access key to authenticate to S3 instance. Can also be provided by setting the S3_ACCESS_KEY environment variable.",
            )
            .env(ACCESS_KEY_ENV),
            AttributeSchema::required(
                "secret_key",
                "The secret key to authenticate to S3 instance. Can also be provided by setting the S3_SECRET environment variable.",
            )
            .sensitive()
            .env(SECRET_KEY_ENV),
            AttributeSchema::optional(
                "region",
                "The region of the S3 instance. Can also be provided by setting the S3_REGION environment variable. Defaults to dc-sto1.",
            )
            .env(REGION_ENV)
            .default_value(DEFAULT_REGION),
            AttributeSchema::optional(
                "endpoint",
                "The endpoint host of the S3 instance, without scheme. Can also be provided by setting the S3_ENDPOINT environment variable. Defaults to objects.dc-sto1.glesys.net.",
            )
            .env(ENDPOINT_ENV)
            .default_value(DEFAULT_ENDPOINT),
        ],
    }
}
