//! # Requestflow
//!
//! Request-scoped execution contexts for plugin-style request handlers.
//!
//! Requestflow manages the lifecycle and derived state of a single in-flight
//! request with support for:
//!
//! - **Execution isolation**: one context per concurrent execution, with no
//!   shared mutable state between executions
//! - **Hook chains**: ordered before/after callbacks contributed by
//!   registered handler groups
//! - **Capability negotiation**: platform/product/version support tables
//!   with wildcard fallback
//! - **Cache-lifetime merging**: order-independent convergence to the most
//!   conservative proposed lifetime
//! - **Cookie reconciliation**: extraction of server-observed cookies from
//!   cached responses into a per-host store
//!
//! ## Quick Start
//!
//! ```rust
//! use requestflow::prelude::*;
//! use std::sync::Arc;
//!
//! let sandbox = Arc::new(Sandbox::new());
//! let mut ctx = RequestContext::new(&sandbox);
//!
//! ctx.set_request(Some(InboundRequest::new("/library/sections")))?;
//! ctx.set_cache_time(Some(std::time::Duration::from_secs(60)));
//! let headers = ctx.final_headers()?;
//! # let _ = headers;
//! # Ok::<(), requestflow::errors::HookError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod capability;
pub mod context;
pub mod cookies;
pub mod errors;
pub mod headers;
pub mod hooks;
pub mod observability;
pub mod request;
pub mod sandbox;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::capability::CapabilityMatrix;
    pub use crate::context::{
        context_flags, ContextValue, ContextValues, RequestContext, PRIVATE_RESOURCE_PREFIX,
    };
    pub use crate::cookies::CookieStore;
    pub use crate::errors::{HookError, HookPhase, RequestflowError};
    pub use crate::headers::{names, Headers};
    pub use crate::hooks::{AfterRequestHook, BeforeRequestHook, HandlerGroup, HookChain};
    pub use crate::request::{CachedResponse, InboundRequest, SyntheticRequest};
    pub use crate::sandbox::{
        sandbox_flags, Core, CoreConfig, Environment, NamedFunction, NetworkingDefaults, Policy,
        Runtime, Sandbox, BEGIN_SESSION,
    };
    pub use crate::utils::{version_at_least, ServerVersion};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::sync::Arc;

    #[test]
    fn library_compiles() {
        let sandbox = Arc::new(Sandbox::new());
        let ctx = RequestContext::new(&sandbox);
        assert!(ctx.request().is_none());
    }
}
