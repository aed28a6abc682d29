//! # RecordKit Core
//!
//! Record lifecycle engine for RecordKit.
//!
//! A storage backend implements five primitives ([`RecordStore`]): fetch,
//! save, update and remove of a single record, plus a lazy sequence of
//! records matching a query. Everything else is derived here:
//!
//! - Per-record lifecycle (`fetch`, `save`, `update`, `remove`) with
//!   ordered hook emission and new/persisted routing
//! - Collection operations (find, count, bulk update, bulk remove,
//!   find-or-create, create-or-update) built on the lazy sequence
//! - Pluggable hook dispatchers for validation and auditing
//!
//! ## Lifecycle
//!
//! A record is **new** while its `id` field is unset or falsy, and
//! **persisted** otherwise. There is no other state flag.
//!
//! ```text
//!            save()                      remove()
//!   New ─────────────────▶ Persisted ─────────────────▶ New
//!                           │    ▲
//!                           └────┘ fetch() / update() / save()
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use recordkit_core::{Collection, Query};
//!
//! let users = Collection::new(store).named("users");
//!
//! let alice = users.create(fields(json!({ "name": "alice" }))).await?;
//! assert!(!alice.is_new());
//!
//! let renamed = users.update(Query::by_id(alice.id().cloned().unwrap()), patch).await?;
//! let removed = users.remove(Query::all()).await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod error;
mod event;
mod hooks;
mod lifecycle;
mod query;
mod record;
mod store;

pub use collection::{Collection, CollectionBuilder, RecordStream, DEFAULT_TABLE};
pub use error::{BoxError, RecordError, RecordResult};
pub use event::{Action, LifecycleEvent};
pub use hooks::{hook_fn, HookChain, HookFn, Hooks, NoopHooks};
pub use query::Query;
pub use record::{is_truthy, Fields, Record, ID_FIELD};
pub use store::{FieldStream, RecordStore, UnimplementedStore};

/// Crate version, for diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
