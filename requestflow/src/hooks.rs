//! Ordered before/after hook execution contributed by registered handlers.
//!
//! Handlers register ordered lists of hooks that run around request
//! processing. The full execution order is the concatenation of each group's
//! list, with groups visited in registration order. Failures are not
//! isolated; the first failing hook aborts the chain.

use crate::context::RequestContext;
use crate::errors::{HookError, HookPhase};
use crate::headers::Headers;
use std::sync::Arc;

/// A hook invoked when a request is bound to a context.
pub trait BeforeRequestHook: Send + Sync {
    /// Runs the hook. The hook may mutate the context.
    ///
    /// # Errors
    ///
    /// Any error aborts the remaining chain and propagates to the caller.
    fn call(&self, ctx: &mut RequestContext) -> anyhow::Result<()>;
}

impl<F> BeforeRequestHook for F
where
    F: Fn(&mut RequestContext) -> anyhow::Result<()> + Send + Sync,
{
    fn call(&self, ctx: &mut RequestContext) -> anyhow::Result<()> {
        self(ctx)
    }
}

/// A hook invoked while finalizing response headers.
pub trait AfterRequestHook: Send + Sync {
    /// Runs the hook against the context and a mutable copy of the response
    /// headers.
    ///
    /// # Errors
    ///
    /// Any error aborts the remaining chain and propagates to the caller.
    fn call(&self, ctx: &mut RequestContext, headers: &mut Headers) -> anyhow::Result<()>;
}

impl<F> AfterRequestHook for F
where
    F: Fn(&mut RequestContext, &mut Headers) -> anyhow::Result<()> + Send + Sync,
{
    fn call(&self, ctx: &mut RequestContext, headers: &mut Headers) -> anyhow::Result<()> {
        self(ctx, headers)
    }
}

/// One registered handler's ordered hook lists.
#[derive(Clone, Default)]
pub struct HandlerGroup {
    name: String,
    before_all: Vec<Arc<dyn BeforeRequestHook>>,
    after_all: Vec<Arc<dyn AfterRequestHook>>,
}

impl HandlerGroup {
    /// Creates an empty handler group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            before_all: Vec::new(),
            after_all: Vec::new(),
        }
    }

    /// Appends a before-request hook.
    #[must_use]
    pub fn with_before(mut self, hook: Arc<dyn BeforeRequestHook>) -> Self {
        self.before_all.push(hook);
        self
    }

    /// Appends an after-request hook.
    #[must_use]
    pub fn with_after(mut self, hook: Arc<dyn AfterRequestHook>) -> Self {
        self.after_all.push(hook);
        self
    }

    /// Returns the handler group's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ordered before-request hooks.
    #[must_use]
    pub fn before_all(&self) -> &[Arc<dyn BeforeRequestHook>] {
        &self.before_all
    }

    /// Returns the ordered after-request hooks.
    #[must_use]
    pub fn after_all(&self) -> &[Arc<dyn AfterRequestHook>] {
        &self.after_all
    }
}

impl std::fmt::Debug for HandlerGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerGroup")
            .field("name", &self.name)
            .field("before_all", &self.before_all.len())
            .field("after_all", &self.after_all.len())
            .finish()
    }
}

/// An ordered snapshot of handler groups for one hook run.
///
/// The chain is cloned out of the shared runtime before execution so hooks
/// can freely mutate the context they receive.
#[derive(Clone, Default)]
pub struct HookChain {
    groups: Vec<Arc<HandlerGroup>>,
}

impl HookChain {
    /// Creates a chain over handler groups in registration order.
    #[must_use]
    pub fn new(groups: Vec<Arc<HandlerGroup>>) -> Self {
        Self { groups }
    }

    /// Runs every before-request hook in order.
    ///
    /// # Errors
    ///
    /// Returns the first hook failure; later hooks are not run.
    pub fn run_before(&self, ctx: &mut RequestContext) -> Result<(), HookError> {
        for group in &self.groups {
            for hook in group.before_all() {
                hook.call(ctx).map_err(|source| {
                    HookError::new(group.name(), HookPhase::BeforeRequest, source)
                })?;
            }
        }
        Ok(())
    }

    /// Runs every after-request hook in order against the headers copy.
    ///
    /// # Errors
    ///
    /// Returns the first hook failure; later hooks are not run.
    pub fn run_after(
        &self,
        ctx: &mut RequestContext,
        headers: &mut Headers,
    ) -> Result<(), HookError> {
        for group in &self.groups {
            for hook in group.after_all() {
                hook.call(ctx, headers).map_err(|source| {
                    HookError::new(group.name(), HookPhase::AfterRequest, source)
                })?;
            }
        }
        Ok(())
    }

    /// Returns the number of handler groups in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if the chain has no handler groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
