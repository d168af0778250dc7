//! Execution context management.
//!
//! This module provides:
//! - The per-execution request context and its derived identity properties
//! - Exportable context values for crossing execution boundaries

mod execution;
mod snapshot;

pub use execution::{context_flags, RequestContext, PRIVATE_RESOURCE_PREFIX};
pub use snapshot::{ContextValue, ContextValues};
