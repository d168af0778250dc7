//! Persistent cookie storage keyed by origin host.
//!
//! Cookies are extracted from already-cached response headers; no network
//! I/O happens here. Matching semantics beyond parsing are delegated to the
//! `cookie` crate.

use crate::headers::names;
use crate::request::{CachedResponse, SyntheticRequest};
use cookie::{Cookie, CookieJar};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// A cookie store with one jar per origin host.
///
/// Created lazily by the owning context and shared by reference for the rest
/// of the execution.
#[derive(Debug, Default)]
pub struct CookieStore {
    jars: RwLock<HashMap<String, CookieJar>>,
}

impl CookieStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts `Set-Cookie` headers from a cached response into the jar for
    /// the synthetic request's origin host.
    ///
    /// Responses without the header mutate nothing. Unparseable cookie values
    /// are skipped. Returns the number of cookies added.
    pub fn extract_from_response(
        &self,
        response: &CachedResponse,
        request: &SyntheticRequest,
    ) -> usize {
        let Some(raw) = response.headers.get(names::SET_COOKIE) else {
            return 0;
        };

        debug!(
            host = %request.host,
            url = %request.full_url,
            "Found a Set-Cookie header on a cached response"
        );

        let mut added = 0;
        let mut jars = self.jars.write();
        let jar = jars.entry(request.origin_host.clone()).or_default();
        for value in raw.split("\r\n") {
            match Cookie::parse(value.trim().to_owned()) {
                Ok(parsed) => {
                    jar.add(parsed);
                    added += 1;
                }
                Err(error) => {
                    debug!(host = %request.host, %error, "Skipping unparseable cookie");
                }
            }
        }
        added
    }

    /// Returns the cookies stored for a host.
    #[must_use]
    pub fn cookies_for_host(&self, host: &str) -> Vec<Cookie<'static>> {
        self.jars
            .read()
            .get(host)
            .map(|jar| jar.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns every host with at least one stored cookie.
    #[must_use]
    pub fn hosts(&self) -> Vec<String> {
        self.jars.read().keys().cloned().collect()
    }

    /// Returns the number of hosts with stored cookies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jars.read().len()
    }

    /// Returns true if no cookies are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jars.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic(url: &str) -> SyntheticRequest {
        SyntheticRequest::for_url(url).unwrap()
    }

    #[test]
    fn test_extracts_cookie_keyed_by_host() {
        let store = CookieStore::new();
        let response = CachedResponse::new(200).with_header(names::SET_COOKIE, "session=abc; Path=/");

        let added = store.extract_from_response(&response, &synthetic("http://a.test/x"));

        assert_eq!(added, 1);
        let cookies = store.cookies_for_host("a.test");
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name(), "session");
        assert_eq!(cookies[0].value(), "abc");
    }

    #[test]
    fn test_response_without_header_mutates_nothing() {
        let store = CookieStore::new();
        let response = CachedResponse::new(200);

        let added = store.extract_from_response(&response, &synthetic("http://a.test/x"));

        assert_eq!(added, 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_unparseable_cookie_is_skipped() {
        let store = CookieStore::new();
        let response = CachedResponse::new(200).with_header(names::SET_COOKIE, ";;;");

        let added = store.extract_from_response(&response, &synthetic("http://a.test/x"));
        assert_eq!(added, 0);
        assert!(store.cookies_for_host("a.test").is_empty());
    }

    #[test]
    fn test_hosts_are_kept_separate() {
        let store = CookieStore::new();
        let response_a = CachedResponse::new(200).with_header(names::SET_COOKIE, "a=1");
        let response_b = CachedResponse::new(200).with_header(names::SET_COOKIE, "b=2");

        store.extract_from_response(&response_a, &synthetic("http://a.test/"));
        store.extract_from_response(&response_b, &synthetic("http://b.test/"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.cookies_for_host("a.test")[0].name(), "a");
        assert_eq!(store.cookies_for_host("b.test")[0].name(), "b");
    }

    #[test]
    fn test_same_cookie_name_replaces_previous_value() {
        let store = CookieStore::new();
        let first = CachedResponse::new(200).with_header(names::SET_COOKIE, "session=old");
        let second = CachedResponse::new(200).with_header(names::SET_COOKIE, "session=new");

        store.extract_from_response(&first, &synthetic("http://a.test/"));
        store.extract_from_response(&second, &synthetic("http://a.test/"));

        let cookies = store.cookies_for_host("a.test");
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].value(), "new");
    }
}
