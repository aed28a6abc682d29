//! Memory store configuration.

use serde_json::Value;

/// How the store assigns identities to records saved without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdStrategy {
    /// Per-table integer counter starting at `start`.
    Sequential {
        /// First id handed out in each table.
        start: u64,
    },
    /// Random v4 UUID strings.
    Uuid,
}

impl IdStrategy {
    /// Produces the id for the next insert, advancing `counter`.
    ///
    /// Returns `None` once the sequential id space is used up. `u64::MAX`
    /// is never generated; a counter at that value means exhausted.
    pub(crate) fn next_id(&self, counter: &mut u64) -> Option<Value> {
        match self {
            IdStrategy::Sequential { start } => {
                let id = (*counter).max(*start);
                if id == u64::MAX {
                    return None;
                }
                *counter = id + 1;
                Some(Value::from(id))
            }
            IdStrategy::Uuid => Some(Value::from(uuid::Uuid::new_v4().to_string())),
        }
    }
}

impl Default for IdStrategy {
    fn default() -> Self {
        IdStrategy::Sequential { start: 1 }
    }
}

/// Configuration for a [`crate::MemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    /// Identity assignment for saves without an id.
    pub id_strategy: IdStrategy,
}

impl MemoryConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identity strategy.
    #[must_use]
    pub fn id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    /// Uses sequential ids starting at `start`.
    #[must_use]
    pub fn sequential_from(self, start: u64) -> Self {
        self.id_strategy(IdStrategy::Sequential { start })
    }
}
