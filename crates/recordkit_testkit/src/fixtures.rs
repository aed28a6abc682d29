//! Test fixtures and collection helpers.
//!
//! Provides a collection over a fresh in-memory store with a recording hook
//! dispatcher already attached.

use crate::hooks::RecordingHooks;
use recordkit_core::{Collection, Fields, DEFAULT_TABLE};
use recordkit_memory::{MemoryConfig, MemoryStore};
use serde_json::Value;

/// Converts a JSON object literal into [`Fields`].
///
/// # Panics
///
/// Panics if `value` is not an object.
pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A collection over a private memory store, with recorded hooks.
pub struct TestCollection {
    /// The collection under test.
    pub collection: Collection,
    /// Handle on the backing store, for inspection.
    pub store: MemoryStore,
    /// Every hook emission of records built by `collection`.
    pub hooks: RecordingHooks,
}

impl TestCollection {
    /// Creates an empty test collection on the default table.
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new(), DEFAULT_TABLE)
    }

    /// Creates an empty test collection on `table`.
    pub fn named(table: &str) -> Self {
        Self::with_store(MemoryStore::new(), table)
    }

    /// Creates an empty test collection whose store uses `config`.
    pub fn with_config(config: MemoryConfig) -> Self {
        Self::with_store(MemoryStore::with_config(config), DEFAULT_TABLE)
    }

    /// Creates a test collection whose table is pre-populated with `rows`.
    ///
    /// Seeding bypasses hooks, so the recorder starts empty.
    ///
    /// # Panics
    ///
    /// Panics if a row repeats an id.
    pub fn seeded(rows: Vec<Value>) -> Self {
        let test = Self::new();
        for row in rows {
            test.store
                .insert_raw(test.collection.table(), fields(row))
                .expect("Failed to seed row");
        }
        test
    }

    fn with_store(store: MemoryStore, table: &str) -> Self {
        let hooks = RecordingHooks::new();
        let collection = Collection::builder(store.clone())
            .table(table)
            .hooks(hooks.clone())
            .build();
        Self {
            collection,
            store,
            hooks,
        }
    }

    /// Current rows of the collection's table, as JSON values.
    pub fn rows(&self) -> Vec<Value> {
        self.store
            .rows(self.collection.table())
            .into_iter()
            .map(Value::Object)
            .collect()
    }
}

impl Default for TestCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestCollection {
    type Target = Collection;

    fn deref(&self) -> &Self::Target {
        &self.collection
    }
}
