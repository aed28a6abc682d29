//! # RecordKit Memory
//!
//! In-memory record store for RecordKit.
//!
//! [`MemoryStore`] implements every [`recordkit_core::RecordStore`]
//! primitive over per-table maps kept in insertion order. It is suitable for:
//! - Unit and integration tests
//! - Demo drivers seeded from JSON documents
//! - Ephemeral data that does not need persistence
//!
//! ## Query matching
//!
//! A stored record matches a query when every query field is present in the
//! record with an equal value. The empty query matches everything.
//!
//! ## Example
//!
//! ```rust,ignore
//! use recordkit_core::{Collection, Query};
//! use recordkit_memory::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let notes = Collection::new(store.clone()).named("notes");
//!
//! notes.create(fields).await?;
//! assert_eq!(store.len("notes"), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod memory;

pub use config::{IdStrategy, MemoryConfig};
pub use error::MemoryError;
pub use memory::{matches, MemoryStore};
