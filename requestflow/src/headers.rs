//! Header names and the read-only header map used across the crate.
//!
//! Header names are opaque string constants supplied by the transport
//! collaborator; the crate never interprets them beyond exact-match lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Header names recognized by the derived identity properties.
pub mod names {
    /// Transaction ID correlating a request across services.
    pub const TRANSACTION_ID: &str = "X-Transaction-Id";
    /// Client platform identifier.
    pub const CLIENT_PLATFORM: &str = "X-Client-Platform";
    /// Legacy client platform identifier, consulted when the current one is absent.
    pub const CLIENT_PLATFORM_LEGACY: &str = "X-Client-Platform-Old";
    /// Authentication token.
    pub const TOKEN: &str = "X-Token";
    /// Client version string (dot-separated integers).
    pub const CLIENT_VERSION: &str = "X-Client-Version";
    /// Client product name.
    pub const PRODUCT: &str = "X-Product";
    /// Requested language/locale.
    pub const LANGUAGE: &str = "X-Language";
    /// Marker requesting per-user cookie proxying.
    pub const PROXY_COOKIES: &str = "X-Proxy-Cookies";
    /// Server cookie assignment header on cached responses.
    pub const SET_COOKIE: &str = "Set-Cookie";
}

/// A case-sensitive string header map.
///
/// Lookups never fail; absent headers resolve to the caller's default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers {
    entries: HashMap<String, String>,
}

impl Headers {
    /// Creates an empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a header value, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Gets a header value, falling back to `default` when absent.
    #[must_use]
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Checks whether a header is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Sets a header value, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Removes a header, returning the previous value if any.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(name)
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no headers are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all header name/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<HashMap<String, String>> for Headers {
    fn from(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_returns_default_when_absent() {
        let headers = Headers::new();
        assert_eq!(headers.get_or(names::CLIENT_VERSION, "0"), "0");
    }

    #[test]
    fn test_get_or_returns_value_when_present() {
        let mut headers = Headers::new();
        headers.insert(names::CLIENT_VERSION, "1.2.3");
        assert_eq!(headers.get_or(names::CLIENT_VERSION, "0"), "1.2.3");
    }

    #[test]
    fn test_from_iterator() {
        let headers: Headers = [(names::TOKEN, "abc"), (names::PRODUCT, "Player")]
            .into_iter()
            .collect();
        assert_eq!(headers.len(), 2);
        assert!(headers.contains(names::TOKEN));
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut headers = Headers::new();
        headers.insert("Accept", "*/*");
        let json = serde_json::to_string(&headers).unwrap();
        let back: Headers = serde_json::from_str(&json).unwrap();
        assert_eq!(headers, back);
    }
}
