//! Host protocol server.
//!
//! The host drives the provider over newline-delimited JSON: one request
//! object per line on stdin, one response object per line on stdout.
//! Requests are handled strictly in order.
//!
//! ```text
//! {"op":"get_schema"}
//! {"op":"configure","config":{"access_key":"...","secret_key":"..."}}
//! {"op":"create","resource_type":"ceph_s3_bucket","state":{"name":"foo"}}
//! ```
//!
//! Every response carries `diagnostics`; lifecycle calls add `state` and
//! `get_schema` adds `schema`.

use crate::client::StorageClient;
use crate::diagnostics::Diagnostics;
use crate::error::ConfigurationError;
use crate::provider::{Provider, ProviderConfig, ProviderSchema};
use crate::resource::{Resource, S3BucketResource, BUCKET_RESOURCE_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// One request from the host.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HostRequest {
    /// Describe the provider and its resources.
    GetSchema,
    /// Configure the provider.
    Configure {
        /// Provider block.
        #[serde(default)]
        config: ProviderConfig,
    },
    /// Create a resource.
    Create(LifecycleRequest),
    /// Re-validate a resource.
    Read(LifecycleRequest),
    /// Update a resource in place.
    Update(LifecycleRequest),
    /// Delete a resource.
    Delete(LifecycleRequest),
}

/// Payload of a lifecycle request.
#[derive(Debug, Deserialize)]
pub struct LifecycleRequest {
    /// Resource type, e.g. `ceph_s3_bucket`.
    pub resource_type: String,
    /// Current resource state.
    pub state: Value,
}

/// One response to the host.
#[derive(Debug, Default, Serialize)]
pub struct HostResponse {
    /// Diagnostics, possibly empty.
    pub diagnostics: Diagnostics,
    /// New resource state. Absent once a resource is deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    /// Schemas, for `get_schema`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<ProviderSchema>,
}

impl HostResponse {
    fn diagnostics(diagnostics: Diagnostics) -> Self {
        Self {
            diagnostics,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Create,
    Read,
    Update,
    Delete,
}

/// Serves one provider instance to the host.
#[derive(Debug)]
pub struct Server {
    provider: Provider,
    client: Option<StorageClient>,
    bucket: S3BucketResource,
}

impl Server {
    /// Create a server for an unconfigured provider.
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            client: None,
            bucket: S3BucketResource,
        }
    }

    /// True once a configure call produced a client.
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Read requests until EOF, writing one response line per request.
    ///
    /// A line that is not valid UTF-8 gets a "malformed request" response
    /// like any other undecodable line; only I/O errors end the loop early.
    pub async fn serve<R, W>(mut self, mut reader: R, mut writer: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(line.trim_end_matches(['\r', '\n'])).await,
                Err(e) => malformed(e),
            };
            let mut out = serde_json::to_vec(&response)?;
            out.push(b'\n');
            writer.write_all(&out).await?;
            writer.flush().await?;
        }
        info!("host closed the connection");
        Ok(())
    }

    /// Handle one raw request line.
    pub async fn handle_line(&mut self, line: &str) -> HostResponse {
        match serde_json::from_str::<HostRequest>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => malformed(e),
        }
    }

    /// Handle one decoded request.
    pub async fn handle(&mut self, request: HostRequest) -> HostResponse {
        match request {
            HostRequest::GetSchema => HostResponse {
                schema: Some(self.provider.schema()),
                ..HostResponse::default()
            },
            HostRequest::Configure { config } => {
                debug!(?config, "configure");
                let (client, diags) = self.provider.configure(config);
                self.client = client;
                HostResponse::diagnostics(diags)
            }
            HostRequest::Create(req) => self.lifecycle(Lifecycle::Create, req).await,
            HostRequest::Read(req) => self.lifecycle(Lifecycle::Read, req).await,
            HostRequest::Update(req) => self.lifecycle(Lifecycle::Update, req).await,
            HostRequest::Delete(req) => self.lifecycle(Lifecycle::Delete, req).await,
        }
    }

    async fn lifecycle(&self, op: Lifecycle, req: LifecycleRequest) -> HostResponse {
        let mut diags = Diagnostics::new();

        if req.resource_type != BUCKET_RESOURCE_TYPE {
            diags.error(format!("unknown resource type '{}'", req.resource_type));
            return HostResponse::diagnostics(diags);
        }
        let Some(client) = &self.client else {
            diags.error(ConfigurationError::NotConfigured);
            return HostResponse::diagnostics(diags);
        };

        run(&self.bucket, op, client, req.state).await
    }
}

fn malformed(err: impl std::fmt::Display) -> HostResponse {
    let mut diags = Diagnostics::new();
    diags.error_with_detail("malformed request", err.to_string());
    HostResponse::diagnostics(diags)
}

async fn run<R: Resource>(
    resource: &R,
    op: Lifecycle,
    client: &StorageClient,
    state: Value,
) -> HostResponse {
    let mut diags = Diagnostics::new();

    let mut state: R::State = match serde_json::from_value(state) {
        Ok(state) => state,
        Err(e) => {
            diags.error_with_detail(
                format!("invalid state for {}", resource.type_name()),
                e.to_string(),
            );
            return HostResponse::diagnostics(diags);
        }
    };

    diags.extend(match op {
        Lifecycle::Create => resource.create(client, &mut state).await,
        Lifecycle::Read => resource.read(client, &mut state).await,
        Lifecycle::Update => resource.update(client, &mut state).await,
        Lifecycle::Delete => resource.delete(client, &mut state).await,
    });

    let removed = op == Lifecycle::Delete && !diags.has_errors();
    let state = if removed {
        None
    } else {
        match serde_json::to_value(&state) {
            Ok(value) => Some(value),
            Err(e) => {
                diags.error(format!("failed to encode state: {}", e));
                None
            }
        }
    };

    HostResponse {
        diagnostics: diags,
        state,
        schema: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    fn server() -> Server {
        Server::new(Provider::new().with_env(|_| None))
    }

    #[tokio::test]
    async fn test_malformed_line() {
        let response = server().handle_line("{not json").await;
        assert_eq!(response.diagnostics.len(), 1);
        let diag = response.diagnostics.iter().next().unwrap();
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.summary, "malformed request");
    }

    #[tokio::test]
    async fn test_unconfigured_lifecycle() {
        let response = server()
            .handle_line(r#"{"op":"read","resource_type":"ceph_s3_bucket","state":{"name":"foo"}}"#)
            .await;
        let diag = response.diagnostics.iter().next().unwrap();
        assert!(diag.summary.starts_with("provider is not configured"));
        assert!(response.state.is_none());
    }

    #[tokio::test]
    async fn test_unknown_resource_type() {
        let response = server()
            .handle_line(r#"{"op":"create","resource_type":"ceph_s3_object","state":{}}"#)
            .await;
        assert_eq!(
            response.diagnostics.iter().next().unwrap().summary,
            "unknown resource type 'ceph_s3_object'"
        );
    }

    #[tokio::test]
    async fn test_get_schema() {
        let response = server().handle_line(r#"{"op":"get_schema"}"#).await;
        assert!(response.diagnostics.is_empty());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["schema"]["resources"]["ceph_s3_bucket"]["attributes"][0]["name"], "name");
        assert!(json.get("state").is_none());
    }

    #[tokio::test]
    async fn test_configure_without_credentials_stays_unconfigured() {
        let mut server = server();
        let response = server.handle_line(r#"{"op":"configure","config":{}}"#).await;
        assert!(response.diagnostics.is_empty());
        assert!(!server.is_configured());
    }
}
