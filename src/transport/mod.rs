//! HTTP transport layer for bucket requests.
//!
//! The transport executes an already-signed request and hands back the raw
//! status and body. It never retries and never interprets the status.

use crate::error::{ConfigurationError, SendError};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use std::collections::HashMap;
use std::time::Duration;

const USER_AGENT: &str = concat!("terraform-provider-ceph/", env!("CARGO_PKG_VERSION"));

/// HTTP request to be sent.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: String,
    /// Request URL.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
}

impl HttpRequest {
    /// Create a new HTTP request.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add multiple headers.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }
}

/// HTTP response received.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Get a header value by name (case-insensitive).
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get the request ID from response headers.
    pub fn request_id(&self) -> Option<&str> {
        self.get_header("x-amz-request-id")
    }
}

/// HTTP transport trait for making requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request and return the response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SendError>;
}

/// Default HTTP transport using reqwest.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a new transport with default settings.
    pub fn new() -> Result<Self, ConfigurationError> {
        Self::builder().build()
    }

    /// Create a transport builder.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SendError> {
        let http_request = self.build_request(&request)?;

        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(|e| SendError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.bytes().await.map_err(|e| SendError::ReadBody {
            status,
            message: e.to_string(),
        })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl ReqwestTransport {
    fn build_request(&self, request: &HttpRequest) -> Result<reqwest::Request, SendError> {
        let invalid = |message: String| SendError::InvalidRequest { message };

        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| invalid(format!("invalid HTTP method '{}': {}", request.method, e)))?;

        let mut headers = HeaderMap::with_capacity(request.headers.len());
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| invalid(format!("invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| invalid(format!("invalid value for header '{}': {}", name, e)))?;
            headers.insert(name, value);
        }

        self.client
            .request(method, &request.url)
            .headers(headers)
            .build()
            .map_err(|e| invalid(e.to_string()))
    }
}

/// Lowercased names; repeated headers are joined with `, `.
fn collect_headers(map: &HeaderMap) -> HashMap<String, String> {
    let mut headers: HashMap<String, String> = HashMap::with_capacity(map.keys_len());
    for (name, value) in map {
        let value = String::from_utf8_lossy(value.as_bytes());
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    headers
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport").finish_non_exhaustive()
    }
}

/// Builder for reqwest transport.
pub struct ReqwestTransportBuilder {
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl ReqwestTransportBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(30),
        }
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<ReqwestTransport, ConfigurationError> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.read_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ConfigurationError::Transport {
                message: e.to_string(),
            })?;

        Ok(ReqwestTransport { client })
    }
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_request_builder() {
        let request = HttpRequest::new("PUT", "https://objects.example.net/foo")
            .with_header("x-amz-acl", "private");

        assert_eq!(request.method, "PUT");
        assert_eq!(request.url, "https://objects.example.net/foo");
        assert_eq!(request.headers.get("x-amz-acl"), Some(&"private".to_string()));
    }

    #[test]
    fn test_http_response_headers() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/xml".to_string());
        headers.insert("x-amz-request-id".to_string(), "ABC123".to_string());

        let response = HttpResponse {
            status: 200,
            headers,
            body: Bytes::new(),
        };

        assert_eq!(response.get_header("content-type"), Some("application/xml"));
        assert_eq!(response.request_id(), Some("ABC123"));
        assert_eq!(response.get_header("etag"), None);
    }

    #[test]
    fn test_transport_builder() {
        let transport = ReqwestTransport::builder()
            .connect_timeout(Duration::from_secs(10))
            .read_timeout(Duration::from_secs(60))
            .build();

        assert!(transport.is_ok());
    }

    #[test]
    fn test_collect_headers_joins_repeats() {
        let mut map = HeaderMap::new();
        map.append("x-amz-meta-a", HeaderValue::from_static("1"));
        map.append("x-amz-meta-a", HeaderValue::from_static("2"));
        map.insert("ETag", HeaderValue::from_static("\"abc\""));

        let headers = collect_headers(&map);
        assert_eq!(headers.get("x-amz-meta-a").unwrap(), "1, 2");
        assert_eq!(headers.get("etag").unwrap(), "\"abc\"");
    }

    #[tokio::test]
    async fn test_invalid_header_is_request_error() {
        let transport = ReqwestTransport::new().unwrap();
        let result = transport
            .send(HttpRequest::new("PUT", "http://localhost/").with_header("x-amz-acl", "bad\nvalue"))
            .await;

        assert!(matches!(result, Err(SendError::InvalidRequest { .. })));
    }

    #[tokio::test]
    async fn test_invalid_method_is_request_error() {
        let transport = ReqwestTransport::new().unwrap();
        let result = transport
            .send(HttpRequest::new("NOT A METHOD", "http://localhost/"))
            .await;

        assert!(matches!(result, Err(SendError::InvalidRequest { .. })));
    }
}
