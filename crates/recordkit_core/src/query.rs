//! Queries passed through to the store's find sequence.

use crate::record::{Fields, ID_FIELD};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// An opaque predicate handed to [`crate::RecordStore::find_iterator`].
///
/// The engine never interprets a query. It only builds one (match-all,
/// by-id) and layers its fields into records created by
/// `find_or_create` / `create_or_update`. How the fields are matched is up
/// to the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(Fields);

impl Query {
    /// The match-all query.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// A query on the identity field.
    #[must_use]
    pub fn by_id(id: impl Into<Value>) -> Self {
        let mut fields = Fields::new();
        fields.insert(ID_FIELD.to_owned(), id.into());
        Self(fields)
    }

    /// Adds a field to the query.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// The query fields.
    pub fn fields(&self) -> &Fields {
        &self.0
    }

    /// Consumes the query, returning its fields.
    pub fn into_fields(self) -> Fields {
        self.0
    }

    /// Returns true for the match-all query.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Fields> for Query {
    fn from(fields: Fields) -> Self {
        Self(fields)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
