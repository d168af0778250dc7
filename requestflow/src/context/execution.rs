//! The per-execution request context.

use super::{ContextValue, ContextValues};
use crate::cookies::CookieStore;
use crate::errors::HookError;
use crate::headers::{names, Headers};
use crate::request::{CachedResponse, InboundRequest, SyntheticRequest};
use crate::sandbox::{sandbox_flags, Sandbox, BEGIN_SESSION};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, error};
use uuid::Uuid;

/// Request paths starting with this marker never get session data.
pub const PRIVATE_RESOURCE_PREFIX: &str = "/:/";

/// Minimum host server version for the streamed transport protocol.
const STREAM_TRANSPORT_BASELINE: (u32, u32, u32) = (0, 9, 6);

/// Flag markers accumulated on a context during execution.
pub mod context_flags {
    /// The response was served indirectly.
    pub const INDIRECT: &str = "Indirect";
    /// The resource may be synced for offline use.
    pub const SYNCABLE: &str = "Syncable";
}

/// Per-execution state container for one in-flight request.
///
/// Exactly one context exists per concurrent execution and is never shared
/// across executions; no field is synchronized internally. The context holds
/// a non-owning back-reference to the sandbox that created it, so the sandbox
/// must outlive the context. When the sandbox is gone every query degrades to
/// its documented default instead of failing.
#[derive(Debug)]
pub struct RequestContext {
    sandbox: Weak<Sandbox>,
    execution_id: Uuid,
    request: Option<InboundRequest>,
    cache_time: Option<Duration>,
    cookie_jar: Option<Arc<CookieStore>>,
    /// Routing prefix associated with this execution.
    pub prefix: Option<String>,
    /// Previously fetched responses keyed by URL, used for cookie extraction.
    pub cached_http_responses: BTreeMap<String, CachedResponse>,
    /// Outbound response status, finalized by after-request hooks.
    pub response_status: Option<u16>,
    /// Outbound response headers, finalized by after-request hooks.
    pub response_headers: Headers,
    /// Outbound request headers, seeded from the sandbox's custom headers.
    pub http_headers: Headers,
    /// Session data populated by the session-begin entry point.
    pub session_data: HashMap<String, serde_json::Value>,
    /// Streaming protocols advertised by the client.
    pub protocols: Vec<String>,
    /// Preference values resolved for this execution.
    pub pref_values: HashMap<String, String>,
    /// Ordered flag markers accumulated during execution.
    pub flags: Vec<String>,
    /// Ordered log markers accumulated during execution.
    pub log: Vec<String>,
}

impl RequestContext {
    /// Creates a context bound to a sandbox.
    ///
    /// The sandbox's custom headers are copied, not aliased.
    #[must_use]
    pub fn new(sandbox: &Arc<Sandbox>) -> Self {
        Self {
            sandbox: Arc::downgrade(sandbox),
            execution_id: Uuid::new_v4(),
            request: None,
            cache_time: None,
            cookie_jar: None,
            prefix: None,
            cached_http_responses: BTreeMap::new(),
            response_status: None,
            response_headers: Headers::new(),
            http_headers: sandbox.custom_headers.clone(),
            session_data: HashMap::new(),
            protocols: Vec::new(),
            pref_values: HashMap::new(),
            flags: Vec::new(),
            log: Vec::new(),
        }
    }

    /// Returns the unique id of this execution, used for log correlation.
    #[must_use]
    pub fn execution_id(&self) -> Uuid {
        self.execution_id
    }

    fn sandbox(&self) -> Option<Arc<Sandbox>> {
        self.sandbox.upgrade()
    }

    /// Returns the currently bound request, if any.
    #[must_use]
    pub fn request(&self) -> Option<&InboundRequest> {
        self.request.as_ref()
    }

    /// Binds a request to this context.
    ///
    /// Binding a request runs every registered before-request hook in
    /// registration order. Binding `None` is a pure state reset and runs no
    /// hooks.
    ///
    /// # Errors
    ///
    /// Returns the first before-hook failure; the request stays bound.
    pub fn set_request(&mut self, request: Option<InboundRequest>) -> Result<(), HookError> {
        let run_hooks = request.is_some();
        self.request = request;
        if !run_hooks {
            return Ok(());
        }
        let Some(sandbox) = self.sandbox() else {
            return Ok(());
        };
        sandbox.core.runtime.hook_chain().run_before(self)
    }

    /// Finalizes the response headers.
    ///
    /// Copies the current response headers and runs every registered
    /// after-request hook against the copy, in registration order.
    ///
    /// # Errors
    ///
    /// Returns the first after-hook failure.
    pub fn final_headers(&mut self) -> Result<Headers, HookError> {
        let mut headers = self.response_headers.clone();
        if let Some(sandbox) = self.sandbox() {
            sandbox
                .core
                .runtime
                .hook_chain()
                .run_after(self, &mut headers)?;
        }
        Ok(headers)
    }

    /// Returns the minimum cache lifetime merged so far.
    #[must_use]
    pub fn cache_time(&self) -> Option<Duration> {
        self.cache_time
    }

    /// Merges a proposed cache lifetime.
    ///
    /// `None` adopts the networking layer's default lifetime. An explicit
    /// value is adopted only when it narrows the current lifetime; the merged
    /// value never grows.
    pub fn set_cache_time(&mut self, value: Option<Duration>) {
        match value {
            None => {
                if let Some(sandbox) = self.sandbox() {
                    self.cache_time = Some(sandbox.core.networking.cache_time);
                }
            }
            Some(proposed) => {
                if self.cache_time.map_or(true, |current| proposed < current) {
                    self.cache_time = Some(proposed);
                }
            }
        }
    }

    /// Gets a header from the bound request.
    ///
    /// Returns `None` when no request is bound or the header is absent.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.as_ref().and_then(|r| r.headers.get(name))
    }

    /// Gets a header from the bound request, falling back to `default`.
    #[must_use]
    pub fn header_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.header(name).unwrap_or(default)
    }

    /// The transaction id header, if present.
    #[must_use]
    pub fn transaction_id(&self) -> Option<&str> {
        self.header(names::TRANSACTION_ID)
    }

    /// The client platform, consulting the legacy header when the current
    /// one is absent.
    #[must_use]
    pub fn platform(&self) -> Option<&str> {
        self.header(names::CLIENT_PLATFORM)
            .or_else(|| self.header(names::CLIENT_PLATFORM_LEGACY))
    }

    /// The authentication token header, if present.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.header(names::TOKEN)
    }

    /// The client version, defaulting to `"0"`.
    #[must_use]
    pub fn client_version(&self) -> &str {
        self.header_or(names::CLIENT_VERSION, "0")
    }

    /// The client product header, if present.
    #[must_use]
    pub fn product(&self) -> Option<&str> {
        self.header(names::PRODUCT)
    }

    /// The requested locale header, if present.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.header(names::LANGUAGE)
    }

    /// Whether this execution must proxy per-user session cookies.
    ///
    /// True when the sandbox policy always requires session cookies, or when
    /// the bound request carries a proxy-cookies or token header, or the host
    /// runs daemonized. Evaluated on every access.
    #[must_use]
    pub fn uses_user_cookies(&self) -> bool {
        let Some(sandbox) = self.sandbox() else {
            return false;
        };
        if sandbox.policy.always_use_session_cookies {
            return true;
        }
        self.request.as_ref().is_some_and(|request| {
            request.headers.contains(names::PROXY_COOKIES)
                || request.headers.contains(names::TOKEN)
                || sandbox.core.config.daemonized
        })
    }

    /// Negotiates the streamed transport protocol capability.
    ///
    /// Combines the configured platform/product support table with the
    /// sandbox feature flag and the host server baseline version. Missing or
    /// malformed inputs degrade to unsupported; this never fails.
    #[must_use]
    pub fn supports_stream_transport(&self) -> bool {
        let Some(sandbox) = self.sandbox() else {
            return false;
        };
        let enabled = sandbox.has_flag(sandbox_flags::STREAM_TRANSPORT);

        debug!(
            execution_id = %self.execution_id,
            enabled,
            platform = ?self.platform(),
            product = ?self.product(),
            client_version = %self.client_version(),
            server_version = %sandbox.core.server_version,
            "Checking for stream transport support"
        );

        let platform_supported = sandbox
            .core
            .config
            .platforms_supporting_stream_transport
            .platform_supported(self.platform(), self.product(), self.client_version());

        let (major, minor, patch) = STREAM_TRANSPORT_BASELINE;
        platform_supported && enabled && sandbox.core.server_version_at_least(major, minor, patch)
    }

    /// Resets and, when applicable, repopulates the session data.
    ///
    /// Session data stays empty when no request is bound or the request
    /// targets a private resource. Otherwise the sandbox's session-begin
    /// entry point runs if defined; its failure is logged and swallowed, so
    /// session creation never aborts the surrounding request.
    pub fn create_session_data(&mut self) {
        self.session_data = HashMap::new();

        let private = self
            .request
            .as_ref()
            .map_or(true, |r| r.path().starts_with(PRIVATE_RESOURCE_PREFIX));
        if private {
            return;
        }

        let Some(function) = self
            .sandbox()
            .and_then(|sandbox| sandbox.environment.get(BEGIN_SESSION))
        else {
            return;
        };

        if let Err(err) = function.call(self) {
            error!(
                execution_id = %self.execution_id,
                error = %err,
                "Exception calling the session-begin function"
            );
        }
    }

    /// Returns the cookie store, creating it on first use.
    ///
    /// The store is created at most once per context and shared by
    /// reference for the rest of the execution.
    pub fn cookie_jar(&mut self) -> Arc<CookieStore> {
        if let Some(jar) = &self.cookie_jar {
            return Arc::clone(jar);
        }
        let jar = Arc::new(CookieStore::new());
        self.cookie_jar = Some(Arc::clone(&jar));
        jar
    }

    /// Returns the cookie store only if it has been created.
    #[must_use]
    pub fn cookie_jar_if_created(&self) -> Option<&Arc<CookieStore>> {
        self.cookie_jar.as_ref()
    }

    /// Reconciles server-observed cookies from cached responses into the
    /// cookie store.
    ///
    /// Responses are visited in URL order; each one carrying a `Set-Cookie`
    /// header contributes cookies under its origin host via a synthetic
    /// per-URL request descriptor. Purely in-memory.
    pub fn reconcile_cached_response_cookies(&mut self) {
        let jar = self.cookie_jar();
        for (url, response) in &self.cached_http_responses {
            debug!(
                execution_id = %self.execution_id,
                url = %url,
                "Attempting to extract cookies from a cached response"
            );
            match SyntheticRequest::for_url(url) {
                Some(request) => {
                    jar.extract_from_response(response, &request);
                }
                None => {
                    debug!(url = %url, "Skipping cached response with unparseable URL");
                }
            }
        }
    }

    /// Appends a flag marker.
    pub fn add_flag(&mut self, flag: impl Into<String>) {
        self.flags.push(flag.into());
    }

    /// Exports the propagatable context fields as an immutable snapshot.
    #[must_use]
    pub fn export_values(&self) -> ContextValues {
        ContextValues::new()
            .with(ContextValue::Request(self.request.clone()))
            .with(ContextValue::CacheTime(self.cache_time))
            .with(ContextValue::Prefix(self.prefix.clone()))
            .with(ContextValue::CachedHttpResponses(
                self.cached_http_responses.clone(),
            ))
            .with(ContextValue::Flags(self.flags.clone()))
    }

    /// Applies exported values as direct field assignments, in order.
    ///
    /// A later value for the same field wins. Fields without a value in the
    /// collection are untouched. Importing a request does not run hooks.
    pub fn import_values(&mut self, values: ContextValues) {
        for value in values {
            match value {
                ContextValue::Request(request) => self.request = request,
                ContextValue::CacheTime(cache_time) => self.cache_time = cache_time,
                ContextValue::Prefix(prefix) => self.prefix = prefix,
                ContextValue::CachedHttpResponses(responses) => {
                    self.cached_http_responses = responses;
                }
                ContextValue::Flags(flags) => self.flags = flags,
            }
        }
    }
}
