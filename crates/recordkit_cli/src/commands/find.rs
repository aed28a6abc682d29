//! Read-only commands: find, find-one, count.

use super::{render, render_all};
use crate::error::CliResult;
use recordkit_core::{Collection, Query};
use serde::Serialize;
use serde_json::Value;

/// Count command result.
#[derive(Debug, Serialize)]
pub struct CountResult {
    /// Table that was counted.
    pub table: String,
    /// Number of matching records.
    pub count: usize,
}

/// Lists every record matching `query`.
pub async fn find(collection: &Collection, query: Query) -> CliResult<Value> {
    Ok(render_all(collection.find(query).await?))
}

/// Returns the first matching record, or `null`.
pub async fn find_one(collection: &Collection, query: Query) -> CliResult<Value> {
    Ok(collection
        .find_one(query)
        .await?
        .map_or(Value::Null, render))
}

/// Counts the records matching `query`.
pub async fn count(collection: &Collection, query: Query) -> CliResult<CountResult> {
    Ok(CountResult {
        table: collection.table().to_owned(),
        count: collection.count(query).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordkit_memory::MemoryStore;
    use serde_json::json;

    fn notes() -> Collection {
        let store = MemoryStore::from_json(&json!({
            "notes": [ { "id": 1, "open": true }, { "id": 2, "open": false } ]
        }))
        .unwrap();
        Collection::builder(store).table("notes").build()
    }

    #[tokio::test]
    async fn find_renders_matching_rows() {
        let value = find(&notes(), Query::all().with("open", true)).await.unwrap();
        assert_eq!(value, json!([ { "id": 1, "open": true } ]));
    }

    #[tokio::test]
    async fn find_one_renders_null_when_absent() {
        let value = find_one(&notes(), Query::by_id(3)).await.unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn count_names_the_table() {
        let result = count(&notes(), Query::all()).await.unwrap();
        assert_eq!(
            serde_json::to_value(result).unwrap(),
            json!({ "table": "notes", "count": 2 })
        );
    }
}
