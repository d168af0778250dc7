//! Error types for the requestflow crate.
//!
//! Configuration absence (missing headers, missing support-table entries,
//! missing session entry points) is never an error; every such case resolves
//! to a documented default. Only hook failures surface to callers.

use std::fmt;
use thiserror::Error;

/// The main error type for requestflow operations.
#[derive(Debug, Error)]
pub enum RequestflowError {
    /// A before- or after-request hook failed.
    #[error("{0}")]
    Hook(#[from] HookError),

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The hook phase in which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    /// Runs when a request is bound to the context.
    BeforeRequest,
    /// Runs when response headers are finalized.
    AfterRequest,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeRequest => write!(f, "before-request"),
            Self::AfterRequest => write!(f, "after-request"),
        }
    }
}

/// A failure raised by a registered hook.
///
/// Hook failures are not isolated: the chain stops at the failing hook and
/// the error propagates to whoever triggered it.
#[derive(Debug, Error)]
#[error("{phase} hook of handler '{handler}' failed: {source}")]
pub struct HookError {
    /// Name of the handler group that contributed the failing hook.
    pub handler: String,
    /// The phase the hook ran in.
    pub phase: HookPhase,
    /// The underlying failure.
    #[source]
    pub source: anyhow::Error,
}

impl HookError {
    /// Creates a hook error for a handler and phase.
    #[must_use]
    pub fn new(handler: impl Into<String>, phase: HookPhase, source: anyhow::Error) -> Self {
        Self {
            handler: handler.into(),
            phase,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_error_display() {
        let error = HookError::new(
            "metadata",
            HookPhase::BeforeRequest,
            anyhow::anyhow!("boom"),
        );
        let rendered = error.to_string();
        assert!(rendered.contains("before-request"));
        assert!(rendered.contains("metadata"));
        assert!(rendered.contains("boom"));
    }

    #[test]
    fn test_hook_error_converts_to_crate_error() {
        let error = HookError::new("h", HookPhase::AfterRequest, anyhow::anyhow!("x"));
        let crate_error: RequestflowError = error.into();
        assert!(matches!(crate_error, RequestflowError::Hook(_)));
    }
}
