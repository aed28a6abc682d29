//! Error types for the memory store.

use recordkit_core::RecordError;
use serde_json::Value;
use thiserror::Error;

/// Errors specific to the in-memory store.
///
/// These reach callers wrapped in [`RecordError::Store`], displayed as-is.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// A record with the same identity is already stored.
    #[error("duplicate id {id} in table {table}")]
    DuplicateId {
        /// Table name.
        table: String,
        /// The conflicting identity.
        id: Value,
    },

    /// The sequential strategy has no ids left in this table.
    #[error("id space exhausted in table {table}")]
    IdSpaceExhausted {
        /// Table name.
        table: String,
    },

    /// A seed document did not have the expected shape.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

impl From<MemoryError> for RecordError {
    fn from(err: MemoryError) -> Self {
        RecordError::store(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_to_transparent_store_error() {
        let err: RecordError = MemoryError::DuplicateId {
            table: "users".into(),
            id: json!(1),
        }
        .into();
        assert!(matches!(err, RecordError::Store(_)));
        assert_eq!(err.to_string(), "duplicate id 1 in table users");
    }
}
