//! The sandbox/runtime collaborator surface consumed by execution contexts.
//!
//! The sandbox owns configuration, policy, feature flags, and the registered
//! handler groups. It is shared read-mostly across all concurrent contexts;
//! each context holds a non-owning back-reference to it, so a sandbox must
//! outlive every context it spawns.

use crate::capability::CapabilityMatrix;
use crate::context::RequestContext;
use crate::headers::Headers;
use crate::hooks::{HandlerGroup, HookChain};
use crate::utils::ServerVersion;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Feature flag names checked against [`Sandbox::flags`].
pub mod sandbox_flags {
    /// Enables negotiation of the streamed transport protocol.
    pub const STREAM_TRANSPORT: &str = "StreamTransport";
}

/// Name of the session-begin entry point in the sandbox environment.
pub const BEGIN_SESSION: &str = "BeginSession";

/// Cookie-handling policy for a sandbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Policy {
    /// When set, every request proxies per-user session cookies.
    pub always_use_session_cookies: bool,
}

/// A named extension function exposed by the sandbox environment.
pub trait NamedFunction: Send + Sync {
    /// Invokes the function against the current context.
    ///
    /// # Errors
    ///
    /// Failures are caught and logged by the caller; they never abort the
    /// surrounding request.
    fn call(&self, ctx: &mut RequestContext) -> anyhow::Result<()>;
}

impl<F> NamedFunction for F
where
    F: Fn(&mut RequestContext) -> anyhow::Result<()> + Send + Sync,
{
    fn call(&self, ctx: &mut RequestContext) -> anyhow::Result<()> {
        self(ctx)
    }
}

/// The sandbox's named extension functions.
#[derive(Clone, Default)]
pub struct Environment {
    functions: HashMap<String, Arc<dyn NamedFunction>>,
}

impl Environment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named function, replacing any previous one.
    pub fn define(&mut self, name: impl Into<String>, function: Arc<dyn NamedFunction>) {
        self.functions.insert(name.into(), function);
    }

    /// Checks whether a named function is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Looks up a named function.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn NamedFunction>> {
        self.functions.get(name).cloned()
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Environment").field("functions", &names).finish()
    }
}

/// The ordered collection of registered handler groups.
#[derive(Debug, Default)]
pub struct Runtime {
    handlers: RwLock<Vec<Arc<HandlerGroup>>>,
}

impl Runtime {
    /// Creates a runtime with no registered handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler group at the end of the order.
    pub fn register(&self, group: Arc<HandlerGroup>) {
        self.handlers.write().push(group);
    }

    /// Snapshots the current handler groups as a hook chain.
    #[must_use]
    pub fn hook_chain(&self) -> HookChain {
        HookChain::new(self.handlers.read().clone())
    }
}

/// Host-level configuration read by contexts.
#[derive(Debug, Clone, Default)]
pub struct CoreConfig {
    /// Support table for the streamed transport protocol.
    pub platforms_supporting_stream_transport: CapabilityMatrix,
    /// Whether the host runs daemonized.
    pub daemonized: bool,
}

/// Defaults supplied by the external networking layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkingDefaults {
    /// Cache lifetime adopted when a contributor proposes no explicit value.
    pub cache_time: Duration,
}

impl Default for NetworkingDefaults {
    fn default() -> Self {
        Self {
            cache_time: Duration::from_secs(300),
        }
    }
}

/// The host runtime shared by every sandbox.
#[derive(Debug)]
pub struct Core {
    /// Registered handler groups in registration order.
    pub runtime: Runtime,
    /// Host configuration.
    pub config: CoreConfig,
    /// The running host's version.
    pub server_version: ServerVersion,
    /// Networking-layer defaults.
    pub networking: NetworkingDefaults,
}

impl Default for Core {
    fn default() -> Self {
        Self {
            runtime: Runtime::new(),
            config: CoreConfig::default(),
            server_version: ServerVersion::new(1, 0, 0),
            networking: NetworkingDefaults::default(),
        }
    }
}

impl Core {
    /// Creates a core with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host configuration.
    #[must_use]
    pub fn with_config(mut self, config: CoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the host server version.
    #[must_use]
    pub fn with_server_version(mut self, version: ServerVersion) -> Self {
        self.server_version = version;
        self
    }

    /// Sets the networking defaults.
    #[must_use]
    pub fn with_networking(mut self, networking: NetworkingDefaults) -> Self {
        self.networking = networking;
        self
    }

    /// Checks whether the host server version is at least the given one.
    #[must_use]
    pub fn server_version_at_least(&self, major: u32, minor: u32, patch: u32) -> bool {
        self.server_version.at_least(major, minor, patch)
    }
}

/// The sandbox owning one plugin's configuration and extension points.
#[derive(Debug, Default)]
pub struct Sandbox {
    /// Initial outbound headers copied into each new context.
    pub custom_headers: Headers,
    /// Cookie-handling policy.
    pub policy: Policy,
    /// Named extension functions.
    pub environment: Environment,
    /// Enabled feature flags.
    pub flags: HashSet<String>,
    /// The host runtime.
    pub core: Core,
}

impl Sandbox {
    /// Creates a sandbox with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial outbound headers.
    #[must_use]
    pub fn with_custom_headers(mut self, headers: Headers) -> Self {
        self.custom_headers = headers;
        self
    }

    /// Sets the cookie-handling policy.
    #[must_use]
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Enables a feature flag.
    #[must_use]
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.insert(flag.into());
        self
    }

    /// Defines a named extension function.
    #[must_use]
    pub fn with_named_function(
        mut self,
        name: impl Into<String>,
        function: Arc<dyn NamedFunction>,
    ) -> Self {
        self.environment.define(name, function);
        self
    }

    /// Sets the host runtime.
    #[must_use]
    pub fn with_core(mut self, core: Core) -> Self {
        self.core = core;
        self
    }

    /// Checks whether a feature flag is enabled.
    #[must_use]
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }
}
