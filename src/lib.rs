//! Ceph S3 bucket provider.
//!
//! Manages S3 buckets on a Ceph object gateway (Glesys object storage by
//! default) for an infrastructure-as-code host.
//!
//! # Layers
//!
//! - **Sender**: builds, signs (AWS Signature V4) and executes exactly one
//!   HTTP call per bucket request.
//! - **Storage client**: create, delete and existence checks on buckets,
//!   with a fixed retry budget on creation.
//! - **Resource adapter**: the `ceph_s3_bucket` lifecycle, reporting every
//!   failure as a diagnostic.
//! - **Provider / server**: resolves the provider block (with environment
//!   fallback) and serves the host over newline-delimited JSON.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ceph_provider::{BucketState, Provider, ProviderConfig, Resource, S3BucketResource};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (client, diags) = Provider::new().configure(ProviderConfig {
//!         access_key: Some("AKID".into()),
//!         secret_key: Some("SECRET".into()),
//!         ..Default::default()
//!     });
//!     assert!(diags.is_empty());
//!
//!     let client = client.expect("credentials were given");
//!     let mut state = BucketState::new("my-bucket");
//!     let diags = S3BucketResource.create(&client, &mut state).await;
//!     for diag in &diags {
//!         eprintln!("{}", diag);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod mocks;
pub mod provider;
pub mod resilience;
pub mod resource;
pub mod schema;
pub mod sender;
pub mod server;
pub mod services;
pub mod signing;
pub mod transport;
pub mod types;

pub use client::{StorageClient, StorageClientBuilder};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_ACL, DEFAULT_ENDPOINT, DEFAULT_REGION};
pub use credentials::AwsCredentials;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{BucketError, ConfigurationError, ProviderError, SendError, SigningError};
pub use provider::{Provider, ProviderConfig};
pub use resilience::{RetryConfig, RetryPolicy};
pub use resource::{BucketState, Resource, S3BucketResource, BUCKET_RESOURCE_TYPE};
pub use server::Server;
pub use services::BucketsService;
pub use signing::{AwsSigner, AwsSignerV4};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::CannedAcl;

/// Result type for storage client operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
