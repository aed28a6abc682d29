//! Per-record lifecycle: fetch, save, update, remove.
//!
//! Each operation wraps one store primitive with its hook sequence:
//!
//! | Operation       | Before                                  | Primitive | After                   |
//! |-----------------|-----------------------------------------|-----------|-------------------------|
//! | `fetch`         | beforeFetch                             | fetch     | afterFetch              |
//! | `save` (new)    | validate, beforeCreate, beforeSave      | save      | afterSave, afterCreate  |
//! | `update`        | validate, beforeUpdate, beforeSave      | update    | afterSave, afterUpdate  |
//! | `remove`        | beforeRemove                            | remove    | afterRemove             |
//!
//! `save` on a persisted record is `update(None)`.

use crate::error::{RecordError, RecordResult};
use crate::event::{Action, LifecycleEvent};
use crate::record::{Fields, Record, ID_FIELD};
use std::sync::Arc;
use tracing::{debug, trace};

impl Record {
    /// Announces `event` to this record's hook dispatcher.
    pub async fn emit(&mut self, event: LifecycleEvent) -> RecordResult<()> {
        trace!(table = self.table(), %event, "emit");
        let hooks = Arc::clone(self.hooks());
        hooks.emit(event, self).await
    }

    fn ensure_persisted(&self, action: Action) -> RecordResult<()> {
        if self.is_new() {
            return Err(RecordError::UnsavedRecord { action });
        }
        Ok(())
    }

    /// Reloads stored fields into this record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnsavedRecord`] for a new record, before any
    /// hook runs. Hook and store errors are returned unchanged.
    pub async fn fetch(&mut self) -> RecordResult<&mut Self> {
        self.ensure_persisted(Action::Fetch)?;
        debug!(table = self.table(), id = ?self.id(), "fetch");

        self.emit(LifecycleEvent::BeforeFetch).await?;
        let fields = self.store().fetch(self).await?;
        self.merge(fields);
        self.emit(LifecycleEvent::AfterFetch).await?;

        Ok(self)
    }

    /// Persists this record.
    ///
    /// A new record is inserted and becomes persisted. A persisted record is
    /// handed to [`Record::update`] without a patch, so callers never need
    /// to check the state first.
    ///
    /// # Errors
    ///
    /// Hook and store errors are returned unchanged. A failure in an
    /// after-hook leaves the insert in place.
    pub async fn save(&mut self) -> RecordResult<&mut Self> {
        if !self.is_new() {
            return self.update(None).await;
        }
        debug!(table = self.table(), "create");

        self.emit(LifecycleEvent::Validate).await?;
        self.emit(LifecycleEvent::BeforeCreate).await?;
        self.emit(LifecycleEvent::BeforeSave).await?;
        let fields = self.store().save(self).await?;
        self.merge(fields);
        self.emit(LifecycleEvent::AfterSave).await?;
        self.emit(LifecycleEvent::AfterCreate).await?;

        Ok(self)
    }

    /// Merges `patch` (if any) and writes this record back to the store.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnsavedRecord`] for a new record; the patch is
    /// not applied and no hook runs. Hook and store errors are returned
    /// unchanged.
    pub async fn update(&mut self, patch: Option<Fields>) -> RecordResult<&mut Self> {
        self.ensure_persisted(Action::Update)?;
        if let Some(patch) = patch {
            self.merge(patch);
        }
        debug!(table = self.table(), id = ?self.id(), "update");

        self.emit(LifecycleEvent::Validate).await?;
        self.emit(LifecycleEvent::BeforeUpdate).await?;
        self.emit(LifecycleEvent::BeforeSave).await?;
        let fields = self.store().update(self).await?;
        self.merge(fields);
        self.emit(LifecycleEvent::AfterSave).await?;
        self.emit(LifecycleEvent::AfterUpdate).await?;

        Ok(self)
    }

    /// Deletes the stored record and clears this record's `id`.
    ///
    /// The record itself stays usable; it is new again and a later
    /// [`Record::save`] inserts a fresh copy.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnsavedRecord`] for a new record, before any
    /// hook runs. Hook and store errors are returned unchanged.
    pub async fn remove(&mut self) -> RecordResult<&mut Self> {
        self.ensure_persisted(Action::Remove)?;
        debug!(table = self.table(), id = ?self.id(), "remove");

        self.emit(LifecycleEvent::BeforeRemove).await?;
        self.store().remove(self).await?;
        self.unset(ID_FIELD);
        self.emit(LifecycleEvent::AfterRemove).await?;

        Ok(self)
    }
}
