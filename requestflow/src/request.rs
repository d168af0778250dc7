//! Request and response value types handled by an execution context.
//!
//! The context never parses HTTP itself; these types are the already-parsed
//! shapes handed over by the transport collaborator.

use crate::headers::Headers;
use serde::{Deserialize, Serialize};
use url::Url;

/// The inbound request currently bound to an execution context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundRequest {
    /// The request URI (resource path plus query).
    pub uri: String,
    /// The request headers.
    pub headers: Headers,
}

impl InboundRequest {
    /// Creates a request for a URI with no headers.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            headers: Headers::new(),
        }
    }

    /// Sets the request headers.
    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a single request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns the resource path of the request URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.split('?').next().unwrap_or(&self.uri)
    }
}

/// A previously fetched HTTP response held in the context's response cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    /// The response status code.
    pub status: u16,
    /// The response headers.
    pub headers: Headers,
    /// The response body.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<u8>,
}

impl CachedResponse {
    /// Creates a response with a status and no headers or body.
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Sets the response headers.
    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a single response header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the response body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

/// A synthetic request descriptor for cookie extraction.
///
/// Cookie extraction needs a request to attribute cookies to an origin; no
/// real request exists for cached responses, so one is simulated per URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticRequest {
    /// The full URL the cached response was fetched from.
    pub full_url: String,
    /// The host component of the URL.
    pub host: String,
    /// The origin host; always equal to `host`.
    pub origin_host: String,
    /// Whether the request is unverifiable; always false.
    pub is_unverifiable: bool,
}

impl SyntheticRequest {
    /// Builds a descriptor for a URL.
    ///
    /// Returns `None` when the URL cannot be parsed or has no host.
    #[must_use]
    pub fn for_url(url: &str) -> Option<Self> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_string();
        Some(Self {
            full_url: url.to_string(),
            origin_host: host.clone(),
            host,
            is_unverifiable: false,
        })
    }
}
