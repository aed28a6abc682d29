//! Data file handling.

use crate::audit::audit_hooks;
use crate::error::{CliError, CliResult};
use recordkit_core::Collection;
use recordkit_memory::MemoryStore;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A memory store loaded from a JSON data file.
///
/// The file holds `{ "<table>": [ {..}, .. ] }`. A missing file is an empty
/// store; it is created on [`Session::write`].
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    store: MemoryStore,
}

impl Session {
    /// Loads the data file at `path`.
    pub fn open(path: &Path) -> CliResult<Self> {
        let store = match fs::read_to_string(path) {
            Ok(text) => {
                let doc: Value = serde_json::from_str(&text).map_err(|source| CliError::Json {
                    path: path.to_owned(),
                    source,
                })?;
                MemoryStore::from_json(&doc)?
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(?path, "data file missing, starting empty");
                MemoryStore::new()
            }
            Err(source) => {
                return Err(CliError::Io {
                    path: path.to_owned(),
                    source,
                })
            }
        };

        Ok(Self {
            path: path.to_owned(),
            store,
        })
    }

    /// The loaded store.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// A collection on `table` with the audit dispatcher attached.
    pub fn collection(&self, table: &str) -> Collection {
        Collection::builder(self.store.clone())
            .table(table)
            .hooks(audit_hooks())
            .build()
    }

    /// Writes the store back to the data file.
    pub fn write(&self) -> CliResult<()> {
        let doc = self.store.to_json();
        let text = serde_json::to_string_pretty(&doc).map_err(|source| CliError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, text).map_err(|source| CliError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(path = ?self.path, "data file written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempdir().unwrap();
        let session = Session::open(&dir.path().join("data.json")).unwrap();
        assert!(session.store().table_names().is_empty());
    }

    #[test]
    fn write_then_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{ "notes": [ { "id": 1, "text": "hi" } ] }"#).unwrap();

        let session = Session::open(&path).unwrap();
        session
            .store()
            .insert_raw("notes", json!({ "text": "more" }).as_object().cloned().unwrap())
            .unwrap();
        session.write().unwrap();

        let reopened = Session::open(&path).unwrap();
        assert_eq!(
            reopened.store().to_json(),
            json!({ "notes": [ { "id": 1, "text": "hi" }, { "id": 2, "text": "more" } ] })
        );
    }

    #[test]
    fn invalid_json_names_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{ nope").unwrap();

        let err = Session::open(&path).unwrap_err();
        assert!(matches!(err, CliError::Json { .. }));
        assert!(err.to_string().contains("data.json"));
    }

    #[test]
    fn wrong_shape_is_a_record_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "[1, 2]").unwrap();

        let err = Session::open(&path).unwrap_err();
        assert!(matches!(err, CliError::Record(_)));
    }
}
