//! Collections: record factories and the multi-record operations.
//!
//! Every operation here is derived from [`RecordStore::find_iterator`] plus
//! the per-record lifecycle. Bulk mutations run the full lifecycle (hooks
//! and primitive) for each matched record, strictly one record at a time.

use crate::error::{RecordError, RecordResult};
use crate::hooks::{Hooks, NoopHooks};
use crate::query::Query;
use crate::record::{Fields, Record};
use crate::store::RecordStore;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use futures::future;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Table name used when none is configured.
pub const DEFAULT_TABLE: &str = "records";

/// A lazy sequence of records.
pub type RecordStream = BoxStream<'static, RecordResult<Record>>;

struct CollectionInner {
    table: String,
    store: Arc<dyn RecordStore>,
    hooks: Arc<dyn Hooks>,
}

/// A kind of record bound to a store, a table name and default hooks.
///
/// `Collection` is cheap to clone; clones share the same store and hooks.
///
/// # Example
///
/// ```rust,ignore
/// use recordkit_core::{Collection, Query};
///
/// let notes = Collection::builder(store).table("notes").build();
///
/// let note = notes.create(fields).await?;
/// let open = notes.find(Query::all().with("open", true)).await?;
/// let closed = notes.update(Query::all().with("open", true), patch).await?;
/// ```
#[derive(Clone)]
pub struct Collection {
    inner: Arc<CollectionInner>,
}

impl Collection {
    /// Creates a collection over `store` with the default table and no hooks.
    pub fn new<S: RecordStore + 'static>(store: S) -> Self {
        Self::builder(store).build()
    }

    /// Starts configuring a collection over `store`.
    pub fn builder<S: RecordStore + 'static>(store: S) -> CollectionBuilder {
        CollectionBuilder::new(Arc::new(store))
    }

    /// Returns a collection with the same store and hooks under another
    /// table name.
    ///
    /// Records produced by the returned collection carry the new table, and
    /// every record and collection operation routes through it.
    #[must_use]
    pub fn named(&self, table: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(CollectionInner {
                table: table.into(),
                store: Arc::clone(&self.inner.store),
                hooks: Arc::clone(&self.inner.hooks),
            }),
        }
    }

    /// The table name.
    pub fn table(&self) -> &str {
        &self.inner.table
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.inner.store
    }

    /// The default hook dispatcher for records of this collection.
    pub fn hooks(&self) -> &Arc<dyn Hooks> {
        &self.inner.hooks
    }

    /// Builds an in-memory record. Nothing is stored until it is saved.
    pub fn record(&self, fields: Fields) -> Record {
        Record::new(self.clone(), fields)
    }

    /// Builds a record from `fields` and saves it.
    pub async fn create(&self, fields: Fields) -> RecordResult<Record> {
        let mut record = self.record(fields);
        record.save().await?;
        Ok(record)
    }

    // =========================================================================
    // Find family
    // =========================================================================

    /// Lazily yields the records matching `query`.
    ///
    /// Each call asks the store for a fresh sequence. Nothing is read until
    /// the first item is pulled.
    pub fn find_iter(&self, query: impl Into<Query>) -> RecordStream {
        let query = query.into();
        let collection = self.clone();
        self.inner
            .store
            .find_iterator(&self.inner.table, &query)
            .map_ok(move |fields| collection.record(fields))
            .boxed()
    }

    /// Lazily yields every record in the table.
    pub fn iter(&self) -> RecordStream {
        self.find_iter(Query::all())
    }

    /// Returns all records matching `query`, in store order.
    pub async fn find(&self, query: impl Into<Query>) -> RecordResult<Vec<Record>> {
        self.find_iter(query).try_collect().await
    }

    /// Returns the first record matching `query`.
    ///
    /// Pulls at most one item from the store's sequence.
    pub async fn find_one(&self, query: impl Into<Query>) -> RecordResult<Option<Record>> {
        self.find_iter(query).try_next().await
    }

    /// Returns the record with identity `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if no record matches.
    pub async fn find_by_id(&self, id: impl Into<Value>) -> RecordResult<Record> {
        let query = Query::by_id(id);
        self.find_one(query.clone())
            .await?
            .ok_or_else(|| RecordError::not_found(self.table(), &query))
    }

    /// Counts the records matching `query`.
    pub async fn count(&self, query: impl Into<Query>) -> RecordResult<usize> {
        self.find_iter(query)
            .try_fold(0usize, |n, _| future::ready(Ok(n + 1)))
            .await
    }

    /// Returns the first record matching `query`, creating it if absent.
    ///
    /// An existing record is returned untouched and no hook fires. Otherwise
    /// a record is created from `extra` with the query fields layered on
    /// top, so **query fields win** on conflict. Note that
    /// [`Collection::create_or_update`] uses the opposite precedence.
    pub async fn find_or_create(
        &self,
        query: impl Into<Query>,
        extra: Fields,
    ) -> RecordResult<Record> {
        let query = query.into();
        if let Some(existing) = self.find_one(query.clone()).await? {
            return Ok(existing);
        }

        let mut fields = extra;
        fields.extend(query.into_fields());
        self.create(fields).await
    }

    /// Updates the first record matching `query` with `data`, creating it
    /// if absent.
    ///
    /// An existing record runs the update path with `data` merged in; the
    /// query fields are not reapplied. Otherwise a record is created from
    /// the query fields with `data` layered on top, so **data wins** on
    /// conflict, the opposite of [`Collection::find_or_create`].
    pub async fn create_or_update(
        &self,
        query: impl Into<Query>,
        data: Fields,
    ) -> RecordResult<Record> {
        let query = query.into();
        match self.find_one(query.clone()).await? {
            Some(mut existing) => {
                existing.update(Some(data)).await?;
                Ok(existing)
            }
            None => {
                let mut fields = query.into_fields();
                fields.extend(data);
                self.create(fields).await
            }
        }
    }

    // =========================================================================
    // Update family
    // =========================================================================

    /// Lazily updates each record matching `query` with `data`.
    ///
    /// A record is updated (hooks and primitive) when it is pulled, and the
    /// next one is not read until that update has finished.
    pub fn update_iter(&self, query: impl Into<Query>, data: Fields) -> RecordStream {
        self.find_iter(query)
            .and_then(move |mut record| {
                let patch = data.clone();
                async move {
                    record.update(Some(patch)).await?;
                    Ok(record)
                }
            })
            .boxed()
    }

    /// Updates every record matching `query`, returning them in store order.
    pub async fn update(&self, query: impl Into<Query>, data: Fields) -> RecordResult<Vec<Record>> {
        let records: Vec<Record> = self.update_iter(query, data).try_collect().await?;
        debug!(table = self.table(), count = records.len(), "bulk update");
        Ok(records)
    }

    /// Updates the first record matching `query`, if any.
    pub async fn update_one(
        &self,
        query: impl Into<Query>,
        data: Fields,
    ) -> RecordResult<Option<Record>> {
        match self.find_one(query).await? {
            Some(mut record) => {
                record.update(Some(data)).await?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Updates the record with identity `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if no record matches; no hook fires.
    pub async fn update_by_id(&self, id: impl Into<Value>, data: Fields) -> RecordResult<Record> {
        let query = Query::by_id(id);
        self.update_one(query.clone(), data)
            .await?
            .ok_or_else(|| RecordError::not_found(self.table(), &query))
    }

    // =========================================================================
    // Remove family
    // =========================================================================

    /// Lazily removes each record matching `query`.
    ///
    /// Yielded records are new again (their `id` is cleared).
    pub fn remove_iter(&self, query: impl Into<Query>) -> RecordStream {
        self.find_iter(query)
            .and_then(|mut record| async move {
                record.remove().await?;
                Ok(record)
            })
            .boxed()
    }

    /// Removes every record matching `query`, returning them in store order.
    pub async fn remove(&self, query: impl Into<Query>) -> RecordResult<Vec<Record>> {
        let records: Vec<Record> = self.remove_iter(query).try_collect().await?;
        debug!(table = self.table(), count = records.len(), "bulk remove");
        Ok(records)
    }

    /// Removes the first record matching `query`, if any.
    pub async fn remove_one(&self, query: impl Into<Query>) -> RecordResult<Option<Record>> {
        match self.find_one(query).await? {
            Some(mut record) => {
                record.remove().await?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Removes the record with identity `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if no record matches; no hook fires.
    pub async fn remove_by_id(&self, id: impl Into<Value>) -> RecordResult<Record> {
        let query = Query::by_id(id);
        self.remove_one(query.clone())
            .await?
            .ok_or_else(|| RecordError::not_found(self.table(), &query))
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("table", &self.inner.table)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Collection`].
pub struct CollectionBuilder {
    store: Arc<dyn RecordStore>,
    table: String,
    hooks: Arc<dyn Hooks>,
}

impl CollectionBuilder {
    /// Creates a builder over a shared store.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            table: DEFAULT_TABLE.to_owned(),
            hooks: Arc::new(NoopHooks),
        }
    }

    /// Sets the table name.
    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Sets the default hook dispatcher.
    #[must_use]
    pub fn hooks(mut self, hooks: impl Hooks + 'static) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }

    /// Sets a shared default hook dispatcher.
    #[must_use]
    pub fn shared_hooks(mut self, hooks: Arc<dyn Hooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Builds the collection.
    pub fn build(self) -> Collection {
        Collection {
            inner: Arc::new(CollectionInner {
                table: self.table,
                store: self.store,
                hooks: self.hooks,
            }),
        }
    }
}

impl fmt::Debug for CollectionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionBuilder")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
