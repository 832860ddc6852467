//! Signed HTTP sender.
//!
//! Turns a [`Request`] descriptor into exactly one signed HTTP call against
//! the configured endpoint. Retrying is left to the caller.

use crate::config::ClientConfig;
use crate::error::SendError;
use crate::signing::AwsSigner;
use crate::transport::{HttpRequest, HttpTransport};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// One bucket-level request, consumed by [`Sender::send`].
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// HTTP method.
    pub method: &'static str,
    /// Bucket name.
    pub name: String,
    /// Extra headers to sign and send.
    pub headers: HashMap<String, String>,
    /// Query parameters. An empty value renders as `key=`.
    pub params: Vec<(String, String)>,
}

impl Request {
    /// Create a request for a bucket.
    pub fn new(method: &'static str, name: impl Into<String>) -> Self {
        Self {
            method,
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }
}

/// Status and body of a completed call.
#[derive(Debug, Clone)]
pub struct SendOutput {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Bytes,
}

/// Builds, signs and executes bucket requests.
pub struct Sender {
    config: Arc<ClientConfig>,
    transport: Arc<dyn HttpTransport>,
    signer: Arc<dyn AwsSigner>,
}

impl Sender {
    /// Create a new sender.
    pub fn new(
        config: Arc<ClientConfig>,
        transport: Arc<dyn HttpTransport>,
        signer: Arc<dyn AwsSigner>,
    ) -> Self {
        Self {
            config,
            transport,
            signer,
        }
    }

    /// Build the full URL for a request, query parameters included.
    pub fn build_url(&self, request: &Request) -> Result<Url, SendError> {
        let raw = self.config.bucket_url(&request.name);
        let mut url = Url::parse(&raw).map_err(|e| SendError::InvalidUrl {
            url: raw.clone(),
            message: e.to_string(),
        })?;

        if !request.params.is_empty() {
            let mut params = request.params.clone();
            params.sort();
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(url)
    }

    /// Execute one signed call and return its status and body.
    pub async fn send(&self, request: Request) -> Result<SendOutput, SendError> {
        let url = self.build_url(&request)?;
        let signed = self.signer.sign(request.method, &url, &request.headers, None)?;

        let http_request =
            HttpRequest::new(signed.method, signed.url.as_str()).with_headers(signed.headers);

        let response = self.transport.send(http_request).await?;
        debug!(
            method = request.method,
            url = %url,
            status = response.status,
            request_id = response.request_id().unwrap_or(""),
            "bucket request completed"
        );

        Ok(SendOutput {
            status: response.status,
            body: response.body,
        })
    }
}

impl std::fmt::Debug for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sender")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
