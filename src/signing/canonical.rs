//! Canonical request building for AWS Signature V4.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Characters left unescaped in canonical URIs and query strings.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// URI-encode one path segment or query component.
pub fn uri_encode(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}

/// The request as seen by the signature algorithm.
///
/// `Display` renders the canonical form:
///
/// ```text
/// HTTPMethod\n
/// CanonicalURI\n
/// CanonicalQueryString\n
/// CanonicalHeaders\n
/// SignedHeaders\n
/// HashedPayload
/// ```
#[derive(Debug, Clone)]
pub struct CanonicalRequest<'a> {
    method: &'a str,
    path: &'a str,
    query: &'a str,
    headers: BTreeMap<String, Vec<String>>,
    payload_hash: &'a str,
}

impl<'a> CanonicalRequest<'a> {
    /// Collect the parts of a request. Headers that are not signed are dropped.
    pub fn new(
        method: &'a str,
        path: &'a str,
        query: &'a str,
        headers: &[(String, String)],
        payload_hash: &'a str,
    ) -> Self {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in headers {
            let name_lower = name.to_lowercase();
            if !super::should_sign_header(&name_lower) {
                continue;
            }
            let trimmed = value.split_whitespace().collect::<Vec<_>>().join(" ");
            map.entry(name_lower).or_default().push(trimmed);
        }

        Self {
            method,
            path,
            query,
            headers: map,
            payload_hash,
        }
    }

    /// Semicolon-separated list of lowercase signed header names.
    pub fn signed_headers(&self) -> String {
        let names: BTreeSet<&str> = self.headers.keys().map(String::as_str).collect();
        names.into_iter().collect::<Vec<_>>().join(";")
    }

    /// Each segment is decoded then encoded once, since `url` paths arrive
    /// already escaped.
    fn canonical_uri(&self) -> String {
        if self.path.is_empty() {
            return "/".to_string();
        }

        let normalized = if self.path.starts_with('/') {
            self.path.to_string()
        } else {
            format!("/{}", self.path)
        };

        normalized
            .split('/')
            .map(|segment| uri_encode(&percent_decode_str(segment).decode_utf8_lossy()))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Parameters sorted by name then value, each side URI-encoded.
    ///
    /// The incoming query is already percent-encoded by `url`, so each side
    /// is decoded first to avoid double escaping.
    fn canonical_query(&self) -> String {
        let mut params: Vec<(String, String)> = url::form_urlencoded::parse(self.query.as_bytes())
            .map(|(k, v)| (uri_encode(&k), uri_encode(&v)))
            .collect();
        params.sort();

        params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn canonical_headers(&self) -> String {
        self.headers
            .iter()
            .map(|(name, values)| format!("{}:{}\n", name, values.join(",")))
            .collect()
    }
}

impl fmt::Display for CanonicalRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\n{}\n{}\n{}\n{}",
            self.method.to_uppercase(),
            self.canonical_uri(),
            self.canonical_query(),
            self.canonical_headers(),
            self.signed_headers(),
            self.payload_hash
        )
    }
}
