//! Storage primitive trait definition.

use crate::error::{RecordError, RecordResult};
use crate::query::Query;
use crate::record::{Fields, Record};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

/// A lazy, owned sequence of stored field mappings.
pub type FieldStream = BoxStream<'static, RecordResult<Fields>>;

/// The storage primitives a backend supplies.
///
/// Backends implement five operations; the engine derives the whole record
/// and collection API from them. Every method has a default that fails with
/// [`RecordError::NotImplemented`] naming the missing primitive, so a backend
/// only overrides what it supports.
///
/// # Invariants
///
/// - `save` returns the stored fields, including the assigned identity
/// - `fetch`, `update` and `remove` address the stored record by the
///   record's `id` field
/// - `find_iterator` returns a fresh, independent sequence on every call
/// - Sequences are lazy: nothing is read, and no error is raised, until the
///   first item is pulled
/// - Errors are returned as-is to the caller of the lifecycle operation
///
/// # Implementors
///
/// - [`UnimplementedStore`] - Every primitive fails; the bare base behavior
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns the stored fields for `record`'s identity.
    async fn fetch(&self, _record: &Record) -> RecordResult<Fields> {
        Err(RecordError::NotImplemented("fetchPrimitive"))
    }

    /// Inserts `record`'s fields as a new stored record.
    async fn save(&self, _record: &Record) -> RecordResult<Fields> {
        Err(RecordError::NotImplemented("savePrimitive"))
    }

    /// Writes `record`'s in-memory fields over the stored record.
    async fn update(&self, _record: &Record) -> RecordResult<Fields> {
        Err(RecordError::NotImplemented("updatePrimitive"))
    }

    /// Deletes the stored record with `record`'s identity.
    async fn remove(&self, _record: &Record) -> RecordResult<()> {
        Err(RecordError::NotImplemented("removePrimitive"))
    }

    /// Returns a lazy sequence of records in `table` matching `query`.
    ///
    /// The default sequence fails on its first pull, not on construction.
    fn find_iterator(&self, _table: &str, _query: &Query) -> FieldStream {
        stream::once(async { Err(RecordError::NotImplemented("findIterator")) }).boxed()
    }
}

/// A store with no primitives.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedStore;

impl RecordStore for UnimplementedStore {}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn find_iterator_fails_on_first_pull() {
        let store = UnimplementedStore;

        // Building the sequence is fine.
        let mut seq = store.find_iterator("records", &Query::all());

        let err = seq.try_next().await.unwrap_err();
        assert!(matches!(err, RecordError::NotImplemented("findIterator")));
    }

    #[tokio::test]
    async fn unpulled_sequence_never_fails() {
        let store = UnimplementedStore;
        let seq = store.find_iterator("records", &Query::all());
        drop(seq);
    }
}
