//! Records: schema-less field bags with a reserved identity field.

use crate::collection::Collection;
use crate::hooks::Hooks;
use crate::store::RecordStore;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Field name reserved for record identity.
pub const ID_FIELD: &str = "id";

/// A record's field mapping.
pub type Fields = Map<String, Value>;

/// Truthiness of a field value.
///
/// `null`, `false`, numeric zero and the empty string are falsy; everything
/// else, including empty arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// One logical stored item.
///
/// A record is a mutable field mapping plus a handle to the collection it
/// belongs to. It is **new** while its `id` field is unset or falsy and
/// **persisted** otherwise; see the lifecycle methods (`fetch`, `save`,
/// `update`, `remove`) for the transitions.
///
/// Each record carries its own hook dispatcher, initialised from its
/// collection and replaceable per instance.
#[derive(Clone)]
pub struct Record {
    fields: Fields,
    collection: Collection,
    hooks: Arc<dyn Hooks>,
}

impl Record {
    pub(crate) fn new(collection: Collection, fields: Fields) -> Self {
        let hooks = Arc::clone(collection.hooks());
        Self {
            fields,
            collection,
            hooks,
        }
    }

    /// The collection this record belongs to.
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// The table name of this record's collection.
    pub fn table(&self) -> &str {
        self.collection.table()
    }

    pub(crate) fn store(&self) -> Arc<dyn RecordStore> {
        Arc::clone(self.collection.store())
    }

    /// The identity field, if set (it may still be falsy).
    pub fn id(&self) -> Option<&Value> {
        self.fields.get(ID_FIELD)
    }

    /// Returns true while the identity field is unset or falsy.
    pub fn is_new(&self) -> bool {
        !self.id().is_some_and(is_truthy)
    }

    /// Gets a field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Sets a single field.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Merges `fields` into the record; incoming values win.
    pub fn merge(&mut self, fields: Fields) -> &mut Self {
        self.fields.extend(fields);
        self
    }

    /// Removes a field, returning its previous value.
    pub fn unset(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// The record's fields.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// A shallow copy of all fields, for serialization by outer layers.
    pub fn snapshot(&self) -> Fields {
        self.fields.clone()
    }

    /// Consumes the record, returning its fields.
    pub fn into_fields(self) -> Fields {
        self.fields
    }

    /// The hook dispatcher for this record.
    pub fn hooks(&self) -> &Arc<dyn Hooks> {
        &self.hooks
    }

    /// Replaces the hook dispatcher for this record only.
    pub fn set_hooks(&mut self, hooks: Arc<dyn Hooks>) {
        self.hooks = hooks;
    }

    /// Builder-style variant of [`Record::set_hooks`].
    #[must_use]
    pub fn with_hooks(mut self, hooks: impl Hooks + 'static) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("table", &self.table())
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::UnimplementedStore;
    use serde_json::json;

    fn record(value: Value) -> Record {
        let fields = value.as_object().cloned().unwrap();
        Collection::new(UnimplementedStore).record(fields)
    }

    #[test]
    fn truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!(-3), json!("a"), json!([]), json!({})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn is_new_follows_identity_field() {
        assert!(record(json!({})).is_new());
        assert!(record(json!({ "id": null })).is_new());
        assert!(record(json!({ "id": 0 })).is_new());
        assert!(record(json!({ "id": "" })).is_new());
        assert!(!record(json!({ "id": 1 })).is_new());
        assert!(!record(json!({ "id": "abc" })).is_new());

        let mut r = record(json!({ "id": 5 }));
        r.unset(ID_FIELD);
        assert!(r.is_new());
        r.set(ID_FIELD, 6);
        assert!(!r.is_new());
    }

    #[test]
    fn merge_incoming_wins() {
        let mut r = record(json!({ "a": 1, "b": 2 }));
        r.merge(json!({ "b": 3, "c": 4 }).as_object().cloned().unwrap());
        assert_eq!(Value::Object(r.snapshot()), json!({ "a": 1, "b": 3, "c": 4 }));
    }

    #[test]
    fn set_is_chainable() {
        let mut r = record(json!({}));
        r.set("a", 1).set("b", "two");
        assert_eq!(r.get("a"), Some(&json!(1)));
        assert_eq!(r.get("b"), Some(&json!("two")));
    }

    #[test]
    fn snapshot_is_detached_copy() {
        let mut r = record(json!({ "id": 1, "name": "a" }));
        let snap = r.snapshot();
        r.set("name", "b");
        assert_eq!(snap.get("name"), Some(&json!("a")));
    }

    #[test]
    fn serializes_as_plain_fields() {
        let r = record(json!({ "id": 1, "tags": ["x"] }));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json, json!({ "id": 1, "tags": ["x"] }));
    }
}
