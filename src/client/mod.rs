//! Storage client.
//!
//! One `StorageClient` is built per provider configuration and shared by
//! every resource operation. It owns no mutable state.

use crate::config::ClientConfig;
use crate::credentials::AwsCredentials;
use crate::error::ProviderError;
use crate::resilience::{RetryConfig, RetryPolicy};
use crate::sender::Sender;
use crate::services::BucketsService;
use crate::signing::{AwsSigner, AwsSignerV4};
use crate::transport::{HttpTransport, ReqwestTransport};
use std::sync::Arc;

/// Handle to the object storage endpoint.
pub struct StorageClient {
    config: Arc<ClientConfig>,
    buckets: BucketsService,
}

impl StorageClient {
    /// Create a builder for the given endpoint configuration and credentials.
    pub fn builder(config: ClientConfig, credentials: AwsCredentials) -> StorageClientBuilder {
        StorageClientBuilder::new(config, credentials)
    }

    /// Get the buckets service.
    pub fn buckets(&self) -> &BucketsService {
        &self.buckets
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl std::fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for the storage client.
pub struct StorageClientBuilder {
    config: ClientConfig,
    credentials: AwsCredentials,
    transport: Option<Arc<dyn HttpTransport>>,
    signer: Option<Arc<dyn AwsSigner>>,
    create_retry: RetryConfig,
}

impl StorageClientBuilder {
    /// Create a new builder.
    pub fn new(config: ClientConfig, credentials: AwsCredentials) -> Self {
        Self {
            config,
            credentials,
            transport: None,
            signer: None,
            create_retry: RetryConfig::default(),
        }
    }

    /// Use a custom HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom signer instead of SigV4 over the configured credentials.
    pub fn signer(mut self, signer: Arc<dyn AwsSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Override the retry budget for bucket creation.
    pub fn create_retry(mut self, retry: RetryConfig) -> Self {
        self.create_retry = retry;
        self
    }

    /// Build the storage client.
    pub fn build(self) -> Result<StorageClient, ProviderError> {
        let config = Arc::new(self.config);

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::builder()
                    .connect_timeout(config.connect_timeout)
                    .read_timeout(config.read_timeout)
                    .build()?,
            ),
        };

        let signer = match self.signer {
            Some(signer) => signer,
            None => Arc::new(AwsSignerV4::new(self.credentials, config.region.clone())),
        };

        let sender = Arc::new(Sender::new(config.clone(), transport, signer));
        Ok(StorageClient {
            config,
            buckets: BucketsService::new(sender, RetryPolicy::new(self.create_retry)),
        })
    }
}
