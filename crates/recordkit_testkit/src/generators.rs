//! Property-based test generators using proptest.
//!
//! Field keys are drawn from a small alphabet so that generated queries
//! actually hit generated rows.

use proptest::prelude::*;
use recordkit_core::{Fields, Query, ID_FIELD};
use serde_json::Value;

/// Keys used by generated fields and queries.
pub const FIELD_KEYS: [&str; 3] = ["x", "y", "name"];

/// Strategy for generating a field key (never the identity field).
pub fn field_key_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(FIELD_KEYS.to_vec()).prop_map(str::to_owned)
}

/// Strategy for generating scalar field values with frequent collisions.
pub fn field_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        (0i64..4).prop_map(Value::from),
        prop::sample::select(vec!["a", "b"]).prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ]
}

/// Strategy for generating id-less field maps.
pub fn fields_strategy() -> impl Strategy<Value = Fields> {
    prop::collection::btree_map(field_key_strategy(), field_value_strategy(), 0..3)
        .prop_map(|map| map.into_iter().collect())
}

/// Strategy for generating a batch of rows to save.
pub fn rows_strategy() -> impl Strategy<Value = Vec<Fields>> {
    prop::collection::vec(fields_strategy(), 0..12)
}

/// Strategy for generating queries over the generated keys.
pub fn query_strategy() -> impl Strategy<Value = Query> {
    fields_strategy().prop_map(Query::from)
}

/// Strategy for generating identity values, including falsy ones.
pub fn id_strategy() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        Just(Some(Value::Null)),
        Just(Some(Value::from(0))),
        Just(Some(Value::from(""))),
        Just(Some(Value::from(false))),
        (1i64..1000).prop_map(|n| Some(Value::from(n))),
        "[a-z]{1,8}".prop_map(|s| Some(Value::from(s))),
    ]
}

/// Strategy for generating field maps with an optional identity.
pub fn fields_with_id_strategy() -> impl Strategy<Value = Fields> {
    (fields_strategy(), id_strategy()).prop_map(|(mut fields, id)| {
        if let Some(id) = id {
            fields.insert(ID_FIELD.to_owned(), id);
        }
        fields
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_fields_never_carry_an_id(fields in fields_strategy()) {
            prop_assert!(!fields.contains_key(ID_FIELD));
            prop_assert!(fields.keys().all(|k| FIELD_KEYS.contains(&k.as_str())));
        }

        #[test]
        fn generated_queries_use_known_keys(query in query_strategy()) {
            prop_assert!(query.fields().len() <= FIELD_KEYS.len());
        }
    }
}
