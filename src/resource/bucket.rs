//! The `ceph_s3_bucket` resource.

use super::Resource;
use crate::client::StorageClient;
use crate::config::DEFAULT_ACL;
use crate::diagnostics::Diagnostics;
use crate::schema::{AttributeSchema, Schema};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Resource type name registered with the host.
pub const BUCKET_RESOURCE_TYPE: &str = "ceph_s3_bucket";

/// Host state of one bucket.
///
/// The bucket name doubles as the resource id; no other identifier exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketState {
    /// Resource id, set once the bucket has been created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Bucket name.
    pub name: String,
    /// RFC3339 timestamp recorded when the bucket was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

impl BucketState {
    /// State for a bucket that has not been created yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Adapter for S3 buckets on a Ceph object gateway.
#[derive(Debug, Clone, Copy, Default)]
pub struct S3BucketResource;

#[async_trait]
impl Resource for S3BucketResource {
    type State = BucketState;

    fn type_name(&self) -> &'static str {
        BUCKET_RESOURCE_TYPE
    }

    fn schema(&self) -> Schema {
        Schema {
            attributes: vec![
                AttributeSchema::required("name", "The name of the bucket."),
                AttributeSchema::computed(
                    "created",
                    "Time the bucket was created by this provider, in RFC3339 format.",
                ),
            ],
        }
    }

    async fn create(&self, client: &StorageClient, state: &mut BucketState) -> Diagnostics {
        let mut diags = Diagnostics::new();
        debug!(bucket = %state.name, "create");

        match client.buckets().create(&state.name, DEFAULT_ACL).await {
            Ok(()) => {
                state.id = Some(state.name.clone());
                state.created = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
            }
            Err(e) => diags.error(e),
        }
        diags
    }

    async fn read(&self, client: &StorageClient, state: &mut BucketState) -> Diagnostics {
        let mut diags = Diagnostics::new();
        debug!(bucket = %state.name, "read");

        if let Err(e) = client.buckets().exists(&state.name).await {
            diags.error(e);
        }
        diags
    }

    async fn update(&self, _client: &StorageClient, state: &mut BucketState) -> Diagnostics {
        let mut diags = Diagnostics::new();
        warn!(bucket = %state.name, "update requested for bucket");
        diags.warn("bucket update not supported");
        diags
    }

    async fn delete(&self, client: &StorageClient, state: &mut BucketState) -> Diagnostics {
        let mut diags = Diagnostics::new();
        debug!(bucket = %state.name, "delete");

        if let Err(e) = client.buckets().delete(&state.name).await {
            diags.error(e);
        }
        diags
    }
}
