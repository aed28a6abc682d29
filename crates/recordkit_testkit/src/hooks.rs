//! Hook dispatchers for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use recordkit_core::{Hooks, LifecycleEvent, Record, RecordError, RecordResult};
use serde_json::Value;
use std::sync::Arc;

/// Hook sequence of `save()` on a new record.
pub const CREATE_SEQUENCE: [LifecycleEvent; 5] = [
    LifecycleEvent::Validate,
    LifecycleEvent::BeforeCreate,
    LifecycleEvent::BeforeSave,
    LifecycleEvent::AfterSave,
    LifecycleEvent::AfterCreate,
];

/// Hook sequence of `update()`, and of `save()` on a persisted record.
pub const UPDATE_SEQUENCE: [LifecycleEvent; 5] = [
    LifecycleEvent::Validate,
    LifecycleEvent::BeforeUpdate,
    LifecycleEvent::BeforeSave,
    LifecycleEvent::AfterSave,
    LifecycleEvent::AfterUpdate,
];

/// Hook sequence of `fetch()`.
pub const FETCH_SEQUENCE: [LifecycleEvent; 2] =
    [LifecycleEvent::BeforeFetch, LifecycleEvent::AfterFetch];

/// Hook sequence of `remove()`.
pub const REMOVE_SEQUENCE: [LifecycleEvent; 2] =
    [LifecycleEvent::BeforeRemove, LifecycleEvent::AfterRemove];

/// One observed hook emission.
#[derive(Debug, Clone, PartialEq)]
pub struct HookCall {
    /// The event.
    pub event: LifecycleEvent,
    /// Table of the emitting record.
    pub table: String,
    /// The record's `id` at emission time.
    pub id: Option<Value>,
}

/// Records every event it sees.
///
/// Clones share the same log, so a test keeps one handle and gives the
/// other to a collection.
#[derive(Debug, Clone, Default)]
pub struct RecordingHooks {
    calls: Arc<Mutex<Vec<HookCall>>>,
}

impl RecordingHooks {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All observed calls, in order.
    pub fn calls(&self) -> Vec<HookCall> {
        self.calls.lock().clone()
    }

    /// All observed events, in order.
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.calls.lock().iter().map(|c| c.event).collect()
    }

    /// Returns the observed events and clears the log.
    pub fn take_events(&self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut *self.calls.lock())
            .into_iter()
            .map(|c| c.event)
            .collect()
    }

    /// Number of observed calls.
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns true if nothing was observed.
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Clears the log.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

#[async_trait]
impl Hooks for RecordingHooks {
    async fn emit(&self, event: LifecycleEvent, record: &mut Record) -> RecordResult<()> {
        self.calls.lock().push(HookCall {
            event,
            table: record.table().to_owned(),
            id: record.id().cloned(),
        });
        Ok(())
    }
}

/// Fails a chosen event, and optionally only for records matching a field.
#[derive(Debug, Clone)]
pub struct RejectingHooks {
    event: LifecycleEvent,
    when: Option<(String, Value)>,
    reason: String,
}

impl RejectingHooks {
    /// Rejects every emission of `event`.
    pub fn on(event: LifecycleEvent) -> Self {
        Self {
            event,
            when: None,
            reason: format!("{event} rejected"),
        }
    }

    /// Only rejects records whose `key` field equals `value`.
    #[must_use]
    pub fn when(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.when = Some((key.into(), value.into()));
        self
    }

    /// Sets the rejection reason.
    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }
}

#[async_trait]
impl Hooks for RejectingHooks {
    async fn emit(&self, event: LifecycleEvent, record: &mut Record) -> RecordResult<()> {
        if event != self.event {
            return Ok(());
        }
        let applies = match &self.when {
            Some((key, value)) => record.get(key) == Some(value),
            None => true,
        };
        if applies {
            return Err(RecordError::rejected(event, self.reason.clone()));
        }
        Ok(())
    }
}
