//! # RecordKit Testkit
//!
//! Test utilities for RecordKit.
//!
//! This crate provides:
//! - Hook dispatchers that record or reject lifecycle events
//! - Test collections over a fresh [`recordkit_memory::MemoryStore`]
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use recordkit_testkit::prelude::*;
//!
//! #[tokio::test]
//! async fn creates_record() {
//!     let t = TestCollection::new();
//!     t.create(fields(json!({ "name": "a" }))).await.unwrap();
//!     assert_eq!(t.hooks.events(), CREATE_SEQUENCE);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod hooks;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::hooks::*;
}

pub use fixtures::*;
pub use generators::*;
pub use hooks::*;
