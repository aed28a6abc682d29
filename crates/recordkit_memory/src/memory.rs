//! In-memory record store.

use crate::config::{IdStrategy, MemoryConfig};
use crate::error::MemoryError;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use parking_lot::RwLock;
use recordkit_core::{
    is_truthy, FieldStream, Fields, Query, Record, RecordError, RecordResult, RecordStore,
    ID_FIELD,
};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Arc;
use tracing::trace;

/// Returns true if every field of `query` is present in `fields` with an
/// equal value.
pub fn matches(query: &Query, fields: &Fields) -> bool {
    query
        .fields()
        .iter()
        .all(|(key, value)| fields.get(key) == Some(value))
}

/// Index key for an identity value.
///
/// Equal JSON values render identically (`1` and `1.0` stay distinct, as
/// they do under `Value` equality), so the rendering serves as the key.
fn id_key(id: &Value) -> String {
    id.to_string()
}

/// One table: rows keyed by insertion sequence, plus an id index.
#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<u64, Fields>,
    ids: HashMap<String, u64>,
    next_seq: u64,
    next_id: u64,
}

impl Table {
    fn position(&self, id: &Value) -> Option<u64> {
        self.ids.get(&id_key(id)).copied()
    }

    fn get(&self, id: &Value) -> Option<&Fields> {
        self.position(id).and_then(|seq| self.rows.get(&seq))
    }

    fn remove(&mut self, id: &Value) -> Option<Fields> {
        let seq = self.ids.remove(&id_key(id))?;
        self.rows.remove(&seq)
    }

    fn insert(
        &mut self,
        name: &str,
        strategy: &IdStrategy,
        mut fields: Fields,
    ) -> Result<Fields, MemoryError> {
        let id = match fields.get(ID_FIELD) {
            Some(id) if is_truthy(id) => {
                // Keep the counter ahead of caller-supplied integer ids.
                if let Some(n) = id.as_u64() {
                    self.next_id = self.next_id.max(n.saturating_add(1));
                }
                id.clone()
            }
            _ => {
                let id = strategy
                    .next_id(&mut self.next_id)
                    .ok_or_else(|| MemoryError::IdSpaceExhausted {
                        table: name.to_owned(),
                    })?;
                fields.insert(ID_FIELD.to_owned(), id.clone());
                id
            }
        };

        if self.position(&id).is_some() {
            return Err(MemoryError::DuplicateId {
                table: name.to_owned(),
                id,
            });
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.ids.insert(id_key(&id), seq);
        self.rows.insert(seq, fields.clone());
        Ok(fields)
    }
}

type Tables = BTreeMap<String, Table>;

/// An in-memory record store.
///
/// Tables are created on first use. Rows keep insertion order, which is
/// the order `find_iterator` yields them in.
///
/// # Thread Safety
///
/// Clones share the same tables, so a test can keep a handle for inspection
/// while a [`recordkit_core::Collection`] owns another.
///
/// # Example
///
/// ```rust,ignore
/// use recordkit_memory::MemoryStore;
///
/// let store = MemoryStore::new();
/// store.insert_raw("users", fields)?;
/// assert_eq!(store.len("users"), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    config: MemoryConfig,
}

impl MemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty store with `config`.
    #[must_use]
    pub fn with_config(config: MemoryConfig) -> Self {
        Self {
            tables: Arc::default(),
            config,
        }
    }

    /// Creates a store seeded from a `{ "<table>": [ {..}, .. ] }` document.
    ///
    /// # Errors
    ///
    /// Fails if the document is not of that shape or repeats an id.
    pub fn from_json(doc: &Value) -> RecordResult<Self> {
        let store = Self::new();
        store.load_json(doc)?;
        Ok(store)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Inserts rows from a `{ "<table>": [ {..}, .. ] }` document.
    ///
    /// # Errors
    ///
    /// Fails if the document is not of that shape or repeats an id. Rows
    /// before the offending one stay inserted.
    pub fn load_json(&self, doc: &Value) -> RecordResult<()> {
        let tables = doc
            .as_object()
            .ok_or_else(|| MemoryError::InvalidDocument("expected an object of tables".into()))?;

        for (table, rows) in tables {
            let rows = rows.as_array().ok_or_else(|| {
                MemoryError::InvalidDocument(format!("table {table} is not an array"))
            })?;
            for row in rows {
                let fields = row.as_object().cloned().ok_or_else(|| {
                    MemoryError::InvalidDocument(format!("row in table {table} is not an object"))
                })?;
                self.insert_raw(table, fields)?;
            }
        }
        Ok(())
    }

    /// Dumps every table as a `{ "<table>": [ {..}, .. ] }` document.
    pub fn to_json(&self) -> Value {
        let tables = self.tables.read();
        let doc: Map<String, Value> = tables
            .iter()
            .map(|(name, table)| {
                let rows = table.rows.values().cloned().map(Value::Object).collect();
                (name.clone(), Value::Array(rows))
            })
            .collect();
        Value::Object(doc)
    }

    /// Stores `fields` directly, bypassing any collection or hooks.
    ///
    /// Assigns an id if `fields` has none. Returns the stored fields.
    pub fn insert_raw(&self, table: &str, fields: Fields) -> RecordResult<Fields> {
        let mut tables = self.tables.write();
        let stored = tables
            .entry(table.to_owned())
            .or_default()
            .insert(table, &self.config.id_strategy, fields)?;
        Ok(stored)
    }

    /// Returns a copy of the rows of `table`, in insertion order.
    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Fields> {
        self.tables
            .read()
            .get(table)
            .map(|t| t.rows.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of rows in `table`.
    #[must_use]
    pub fn len(&self, table: &str) -> usize {
        self.tables.read().get(table).map_or(0, |t| t.rows.len())
    }

    /// Returns true if `table` has no rows.
    #[must_use]
    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }

    /// Names of all tables that have been used.
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    /// Drops every table.
    pub fn clear(&self) {
        self.tables.write().clear();
    }
}

fn record_id(record: &Record) -> Value {
    record.id().cloned().unwrap_or(Value::Null)
}

fn missing(record: &Record) -> RecordError {
    RecordError::not_found(record.table(), &Query::by_id(record_id(record)))
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch(&self, record: &Record) -> RecordResult<Fields> {
        let id = record_id(record);
        let tables = self.tables.read();
        tables
            .get(record.table())
            .and_then(|t| t.get(&id))
            .cloned()
            .ok_or_else(|| missing(record))
    }

    async fn save(&self, record: &Record) -> RecordResult<Fields> {
        let stored = self.insert_raw(record.table(), record.snapshot())?;
        trace!(table = record.table(), id = ?stored.get(ID_FIELD), "inserted");
        Ok(stored)
    }

    async fn update(&self, record: &Record) -> RecordResult<Fields> {
        let id = record_id(record);
        let mut tables = self.tables.write();
        let table = tables
            .get_mut(record.table())
            .ok_or_else(|| missing(record))?;
        let seq = table.position(&id).ok_or_else(|| missing(record))?;

        // The record was located by its id, so the index entry stays valid.
        let fields = record.snapshot();
        table.rows.insert(seq, fields.clone());
        Ok(fields)
    }

    async fn remove(&self, record: &Record) -> RecordResult<()> {
        let id = record_id(record);
        let mut tables = self.tables.write();
        tables
            .get_mut(record.table())
            .and_then(|t| t.remove(&id))
            .ok_or_else(|| missing(record))?;
        trace!(table = record.table(), %id, "removed");
        Ok(())
    }

    fn find_iterator(&self, table: &str, query: &Query) -> FieldStream {
        let cursor = Cursor {
            tables: Arc::clone(&self.tables),
            table: table.to_owned(),
            query: query.clone(),
            after: None,
        };
        stream::unfold(cursor, |mut cursor| async move {
            cursor.advance().map(|fields| (Ok(fields), cursor))
        })
        .boxed()
    }
}

/// A live position in one table.
///
/// Every pull re-reads the table and resumes after the last yielded row, so
/// rows removed or updated between pulls are handled without revisiting
/// anything.
struct Cursor {
    tables: Arc<RwLock<Tables>>,
    table: String,
    query: Query,
    after: Option<u64>,
}

impl Cursor {
    fn advance(&mut self) -> Option<Fields> {
        let tables = self.tables.read();
        let table = tables.get(&self.table)?;

        // At most one row carries a given id, so an id query is one lookup.
        if let Some(id) = self.query.fields().get(ID_FIELD) {
            if self.after.is_some() {
                return None;
            }
            let seq = table.position(id)?;
            let fields = table
                .rows
                .get(&seq)
                .filter(|fields| matches(&self.query, fields))?;
            self.after = Some(seq);
            return Some(fields.clone());
        }

        let lower = match self.after {
            Some(seq) => Bound::Excluded(seq),
            None => Bound::Unbounded,
        };

        let (seq, fields) = table
            .rows
            .range((lower, Bound::Unbounded))
            .find(|(_, fields)| matches(&self.query, fields))?;
        self.after = Some(*seq);
        Some(fields.clone())
    }
}
