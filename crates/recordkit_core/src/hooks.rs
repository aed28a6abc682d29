//! Hook dispatchers.

use crate::error::RecordResult;
use crate::event::LifecycleEvent;
use crate::record::Record;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Listener for lifecycle events.
///
/// The dispatcher receives only the event name and the record that emitted
/// it; it reads and mutates state through that record. Returning an error
/// aborts the operation in progress. For events before the store primitive
/// nothing has been written yet; for events after it the write has already
/// happened and is not undone.
///
/// # Implementors
///
/// - [`NoopHooks`] - The default, ignores every event
/// - [`HookChain`] - Runs several dispatchers in order
/// - [`HookFn`] - Adapts a synchronous closure
#[async_trait]
pub trait Hooks: Send + Sync {
    /// Handles a single lifecycle event.
    async fn emit(&self, event: LifecycleEvent, record: &mut Record) -> RecordResult<()>;
}

/// A dispatcher that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

#[async_trait]
impl Hooks for NoopHooks {
    async fn emit(&self, _event: LifecycleEvent, _record: &mut Record) -> RecordResult<()> {
        Ok(())
    }
}

/// Runs dispatchers in registration order, stopping at the first failure.
///
/// ```rust,ignore
/// let hooks = HookChain::new()
///     .with(validator)
///     .with(audit_log);
/// let users = Collection::builder(store).table("users").hooks(hooks).build();
/// ```
#[derive(Clone, Default)]
pub struct HookChain {
    hooks: Vec<Arc<dyn Hooks>>,
}

impl HookChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a dispatcher.
    #[must_use]
    pub fn with(mut self, hooks: impl Hooks + 'static) -> Self {
        self.hooks.push(Arc::new(hooks));
        self
    }

    /// Appends a shared dispatcher.
    pub fn push(&mut self, hooks: Arc<dyn Hooks>) {
        self.hooks.push(hooks);
    }

    /// Number of dispatchers in the chain.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if the chain has no dispatchers.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

#[async_trait]
impl Hooks for HookChain {
    async fn emit(&self, event: LifecycleEvent, record: &mut Record) -> RecordResult<()> {
        for hooks in &self.hooks {
            hooks.emit(event, record).await?;
        }
        Ok(())
    }
}

impl fmt::Debug for HookChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookChain")
            .field("len", &self.hooks.len())
            .finish()
    }
}

/// A dispatcher backed by a synchronous closure.
///
/// Created with [`hook_fn`].
#[derive(Clone)]
pub struct HookFn<F> {
    f: F,
}

/// Wraps a closure as a hook dispatcher.
///
/// ```rust,ignore
/// let require_name = hook_fn(|event, record| {
///     if event == LifecycleEvent::Validate && record.get("name").is_none() {
///         return Err(RecordError::rejected(event, "name is required"));
///     }
///     Ok(())
/// });
/// ```
pub fn hook_fn<F>(f: F) -> HookFn<F>
where
    F: Fn(LifecycleEvent, &mut Record) -> RecordResult<()> + Send + Sync + 'static,
{
    HookFn { f }
}

#[async_trait]
impl<F> Hooks for HookFn<F>
where
    F: Fn(LifecycleEvent, &mut Record) -> RecordResult<()> + Send + Sync + 'static,
{
    async fn emit(&self, event: LifecycleEvent, record: &mut Record) -> RecordResult<()> {
        (self.f)(event, record)
    }
}

impl<F> fmt::Debug for HookFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookFn").finish_non_exhaustive()
    }
}
