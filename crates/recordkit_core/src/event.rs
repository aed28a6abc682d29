//! Lifecycle event names and persisted-only actions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named point in a record's lifecycle announced to its hook dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleEvent {
    /// Before any write; the place for validation.
    Validate,
    /// Before a new record is inserted.
    BeforeCreate,
    /// Before a persisted record is written back.
    BeforeUpdate,
    /// Before any insert or update.
    BeforeSave,
    /// After any insert or update.
    AfterSave,
    /// After a new record was inserted.
    AfterCreate,
    /// After a persisted record was written back.
    AfterUpdate,
    /// Before stored fields are read.
    BeforeFetch,
    /// After stored fields were read and merged.
    AfterFetch,
    /// Before the stored record is deleted.
    BeforeRemove,
    /// After the stored record was deleted.
    AfterRemove,
}

impl LifecycleEvent {
    /// Get the canonical event name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::BeforeCreate => "beforeCreate",
            Self::BeforeUpdate => "beforeUpdate",
            Self::BeforeSave => "beforeSave",
            Self::AfterSave => "afterSave",
            Self::AfterCreate => "afterCreate",
            Self::AfterUpdate => "afterUpdate",
            Self::BeforeFetch => "beforeFetch",
            Self::AfterFetch => "afterFetch",
            Self::BeforeRemove => "beforeRemove",
            Self::AfterRemove => "afterRemove",
        }
    }

    /// Get all events in declaration order.
    #[must_use]
    pub fn all() -> &'static [LifecycleEvent] {
        &[
            Self::Validate,
            Self::BeforeCreate,
            Self::BeforeUpdate,
            Self::BeforeSave,
            Self::AfterSave,
            Self::AfterCreate,
            Self::AfterUpdate,
            Self::BeforeFetch,
            Self::AfterFetch,
            Self::BeforeRemove,
            Self::AfterRemove,
        ]
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| format!("unknown lifecycle event: {s}"))
    }
}

/// A lifecycle action that requires a persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// `fetch()`
    Fetch,
    /// `update()`
    Update,
    /// `remove()`
    Remove,
}

impl Action {
    /// Get the action name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Update => "update",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
