//! Error types for RecordKit core.

use crate::event::{Action, LifecycleEvent};
use crate::query::Query;
use thiserror::Error;

/// Result type for record operations.
pub type RecordResult<T> = Result<T, RecordError>;

/// A boxed error raised by a storage backend or hook dispatcher.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in record operations.
///
/// The engine never catches errors raised by a store or a hook dispatcher;
/// they reach the caller of the operation that triggered them.
#[derive(Debug, Error)]
pub enum RecordError {
    /// No record matched a by-id lookup.
    #[error("record not found in {table}: {query}")]
    NotFound {
        /// Table that was searched.
        table: String,
        /// The query that matched nothing.
        query: Query,
    },

    /// A store primitive was not provided by the backend.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// A persisted-only action was attempted on a new record.
    #[error("cannot {action} an unsaved record")]
    UnsavedRecord {
        /// The attempted action.
        action: Action,
    },

    /// A hook dispatcher refused to let the operation continue.
    #[error("{event} hook rejected record: {reason}")]
    HookRejected {
        /// Event during which the rejection happened.
        event: LifecycleEvent,
        /// Human-readable reason.
        reason: String,
    },

    /// Backend-defined failure, passed through as-is.
    #[error(transparent)]
    Store(BoxError),
}

impl RecordError {
    /// Wraps a backend-defined error.
    pub fn store(err: impl Into<BoxError>) -> Self {
        Self::Store(err.into())
    }

    /// Creates a not-found error for `query` in `table`.
    pub fn not_found(table: impl Into<String>, query: &Query) -> Self {
        Self::NotFound {
            table: table.into(),
            query: query.clone(),
        }
    }

    /// Creates a hook rejection error.
    pub fn rejected(event: LifecycleEvent, reason: impl Into<String>) -> Self {
        Self::HookRejected {
            event,
            reason: reason.into(),
        }
    }

    /// Returns true if this is a [`RecordError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecordError::NotFound { .. })
    }

    /// Returns true if this error signals a wiring defect rather than a
    /// runtime condition.
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            RecordError::NotImplemented(_) | RecordError::UnsavedRecord { .. }
        )
    }
}
