//! Mutating commands. Each runs the full hook lifecycle per record.

use super::{render, render_all};
use crate::error::CliResult;
use recordkit_core::{Collection, Fields, Query};
use serde_json::Value;

/// Which records a mutating command targets.
#[derive(Debug, Clone)]
pub enum Target {
    /// Exactly the record with this id; missing is an error.
    Id(Value),
    /// Every record matching the query.
    Query(Query),
}

/// Creates a record from `data`.
pub async fn create(collection: &Collection, data: Fields) -> CliResult<Value> {
    Ok(render(collection.create(data).await?))
}

/// Updates the targeted records with `data`.
pub async fn update(collection: &Collection, target: Target, data: Fields) -> CliResult<Value> {
    match target {
        Target::Id(id) => Ok(render(collection.update_by_id(id, data).await?)),
        Target::Query(query) => Ok(render_all(collection.update(query, data).await?)),
    }
}

/// Removes the targeted records. Removed records print without an id.
pub async fn remove(collection: &Collection, target: Target) -> CliResult<Value> {
    match target {
        Target::Id(id) => Ok(render(collection.remove_by_id(id).await?)),
        Target::Query(query) => Ok(render_all(collection.remove(query).await?)),
    }
}

/// Returns the first record matching `query`, creating it from `data`
/// (query fields win) if absent.
pub async fn find_or_create(
    collection: &Collection,
    query: Query,
    data: Fields,
) -> CliResult<Value> {
    Ok(render(collection.find_or_create(query, data).await?))
}

/// Updates the first record matching `query` with `data`, creating it
/// (data wins) if absent.
pub async fn create_or_update(
    collection: &Collection,
    query: Query,
    data: Fields,
) -> CliResult<Value> {
    Ok(render(collection.create_or_update(query, data).await?))
}
