//! Resource adapters.
//!
//! A resource adapter maps one host resource type onto storage client
//! calls. Every failure comes back as a diagnostic, never as a panic.

mod bucket;

pub use bucket::{BucketState, S3BucketResource, BUCKET_RESOURCE_TYPE};

use crate::client::StorageClient;
use crate::diagnostics::Diagnostics;
use crate::schema::Schema;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Lifecycle of one managed resource type.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Typed state exchanged with the host.
    type State: Serialize + DeserializeOwned + Send;

    /// Name the host addresses this resource by.
    fn type_name(&self) -> &'static str;

    /// Attribute schema.
    fn schema(&self) -> Schema;

    /// Create the resource and fill in computed attributes.
    async fn create(&self, client: &StorageClient, state: &mut Self::State) -> Diagnostics;

    /// Check that the resource still exists.
    async fn read(&self, client: &StorageClient, state: &mut Self::State) -> Diagnostics;

    /// Apply in-place changes.
    async fn update(&self, client: &StorageClient, state: &mut Self::State) -> Diagnostics;

    /// Remove the resource.
    async fn delete(&self, client: &StorageClient, state: &mut Self::State) -> Diagnostics;
}
