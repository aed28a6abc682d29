//! Audit dispatcher: logs every lifecycle event.

use recordkit_core::{hook_fn, Hooks};
use tracing::info;

/// A dispatcher that logs each event at `info` and never rejects.
pub fn audit_hooks() -> impl Hooks {
    hook_fn(|event, record| {
        info!(table = record.table(), id = ?record.id(), %event, "hook");
        Ok(())
    })
}
