//! Collection-level scenarios over the memory store.

use futures::TryStreamExt;
use recordkit_core::{
    Collection, HookChain, LifecycleEvent, Query, RecordError, UnimplementedStore,
};
use recordkit_testkit::prelude::*;
use serde_json::{json, Value};

fn ids(records: &[recordkit_core::Record]) -> Vec<Value> {
    records.iter().map(|r| r.id().cloned().unwrap_or(Value::Null)).collect()
}

fn three_rows() -> TestCollection {
    TestCollection::seeded(vec![
        json!({ "id": 1, "x": 1 }),
        json!({ "id": 2, "x": 1 }),
        json!({ "id": 3, "x": 2 }),
    ])
}

#[tokio::test]
async fn bulk_update_runs_full_lifecycle_per_record_in_order() {
    let t = three_rows();

    let updated = t
        .update(Query::all().with("x", 1), fields(json!({ "y": 2 })))
        .await
        .unwrap();

    assert_eq!(ids(&updated), vec![json!(1), json!(2)]);
    assert_eq!(
        t.rows(),
        vec![
            json!({ "id": 1, "x": 1, "y": 2 }),
            json!({ "id": 2, "x": 1, "y": 2 }),
            json!({ "id": 3, "x": 2 }),
        ]
    );

    let expected: Vec<LifecycleEvent> = UPDATE_SEQUENCE
        .iter()
        .chain(UPDATE_SEQUENCE.iter())
        .copied()
        .collect();
    assert_eq!(t.hooks.events(), expected);

    let call_ids: Vec<Value> = t
        .hooks
        .calls()
        .into_iter()
        .map(|c| c.id.unwrap_or(Value::Null))
        .collect();
    assert_eq!(call_ids[..5].to_vec(), vec![json!(1); 5]);
    assert_eq!(call_ids[5..].to_vec(), vec![json!(2); 5]);
}

/// Three matching rows, with a collection that records every event and
/// rejects `event` for the record with id 2.
fn rejecting_second(event: LifecycleEvent) -> (TestCollection, Collection) {
    let t = TestCollection::seeded(vec![
        json!({ "id": 1, "x": 1 }),
        json!({ "id": 2, "x": 1 }),
        json!({ "id": 3, "x": 1 }),
    ]);
    let chain = HookChain::new()
        .with(t.hooks.clone())
        .with(RejectingHooks::on(event).when("id", 2));
    let collection = Collection::builder(t.store.clone()).hooks(chain).build();
    (t, collection)
}

#[tokio::test]
async fn bulk_update_stops_at_the_first_failing_record() {
    let (t, collection) = rejecting_second(LifecycleEvent::Validate);

    let err = collection
        .update(Query::all().with("x", 1), fields(json!({ "y": 2 })))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RecordError::HookRejected { event: LifecycleEvent::Validate, .. }
    ));
    assert_eq!(
        t.rows(),
        vec![
            json!({ "id": 1, "x": 1, "y": 2 }),
            json!({ "id": 2, "x": 1 }),
            json!({ "id": 3, "x": 1 }),
        ]
    );

    let mut expected = UPDATE_SEQUENCE.to_vec();
    expected.push(LifecycleEvent::Validate);
    assert_eq!(t.hooks.events(), expected);
    let last = t.hooks.calls().pop().unwrap();
    assert_eq!(last.id, Some(json!(2)));
}

#[tokio::test]
async fn bulk_remove_stops_at_the_first_failing_record() {
    let (t, collection) = rejecting_second(LifecycleEvent::BeforeRemove);

    let err = collection.remove(Query::all()).await.unwrap_err();

    assert!(matches!(
        err,
        RecordError::HookRejected { event: LifecycleEvent::BeforeRemove, .. }
    ));
    assert_eq!(
        t.rows(),
        vec![json!({ "id": 2, "x": 1 }), json!({ "id": 3, "x": 1 })]
    );

    let mut expected = REMOVE_SEQUENCE.to_vec();
    expected.push(LifecycleEvent::BeforeRemove);
    assert_eq!(t.hooks.events(), expected);
    let last = t.hooks.calls().pop().unwrap();
    assert_eq!(last.id, Some(json!(2)));
}

#[tokio::test]
async fn remove_by_id_of_missing_record_fires_no_hooks() {
    let t = three_rows();

    let err = t.remove_by_id(4).await.unwrap_err();

    assert!(matches!(err, RecordError::NotFound { .. }));
    assert!(t.hooks.is_empty());
    assert_eq!(t.store.len(t.table()), 3);
}

#[tokio::test]
async fn remove_by_id_removes_one_record() {
    let t = TestCollection::seeded(vec![
        json!({ "id": 1 }),
        json!({ "id": 2 }),
        json!({ "id": 3 }),
    ]);

    let removed = t.remove_by_id(2).await.unwrap();

    assert!(removed.is_new());
    assert_eq!(t.rows(), vec![json!({ "id": 1 }), json!({ "id": 3 })]);
    assert_eq!(t.hooks.events(), REMOVE_SEQUENCE);
}

#[tokio::test]
async fn bulk_remove_drains_every_match() {
    let t = three_rows();

    let removed = t.remove(Query::all().with("x", 1)).await.unwrap();

    assert_eq!(removed.len(), 2);
    assert!(removed.iter().all(|r| r.is_new()));
    assert_eq!(t.rows(), vec![json!({ "id": 3, "x": 2 })]);
    assert_eq!(t.hooks.len(), 2 * REMOVE_SEQUENCE.len());
}

#[tokio::test]
async fn finders_fire_no_hooks() {
    let t = three_rows();

    assert_eq!(t.find(Query::all()).await.unwrap().len(), 3);
    assert_eq!(t.count(Query::all().with("x", 1)).await.unwrap(), 2);
    let first = t.find_one(Query::all().with("x", 2)).await.unwrap().unwrap();
    assert_eq!(first.id(), Some(&json!(3)));
    assert!(t.find_one(Query::all().with("x", 9)).await.unwrap().is_none());
    assert_eq!(t.find_by_id(2).await.unwrap().get("x"), Some(&json!(1)));

    assert!(t.hooks.is_empty());
}

#[tokio::test]
async fn find_by_id_of_missing_record_is_not_found() {
    let t = three_rows();

    let err = t.find_by_id(42).await.unwrap_err();

    assert_eq!(err.to_string(), r#"record not found in records: {"id":42}"#);
}

#[tokio::test]
async fn find_or_create_returns_existing_untouched() {
    let t = TestCollection::seeded(vec![json!({ "id": 1, "name": "a", "x": 0 })]);

    let record = t
        .find_or_create(Query::all().with("name", "a"), fields(json!({ "x": 5 })))
        .await
        .unwrap();

    assert_eq!(record.id(), Some(&json!(1)));
    assert_eq!(record.get("x"), Some(&json!(0)));
    assert!(t.hooks.is_empty());
}

#[tokio::test]
async fn find_or_create_lets_query_fields_win() {
    let t = TestCollection::new();

    let record = t
        .find_or_create(
            Query::all().with("name", "a"),
            fields(json!({ "name": "b", "x": 1 })),
        )
        .await
        .unwrap();

    assert_eq!(
        Value::Object(record.fields().clone()),
        json!({ "id": 1, "name": "a", "x": 1 })
    );
    assert_eq!(t.hooks.events(), CREATE_SEQUENCE);
}

#[tokio::test]
async fn create_or_update_lets_data_win() {
    let t = TestCollection::new();

    let record = t
        .create_or_update(Query::all().with("name", "a"), fields(json!({ "name": "b" })))
        .await
        .unwrap();

    assert_eq!(record.get("name"), Some(&json!("b")));
    assert_eq!(t.rows(), vec![json!({ "id": 1, "name": "b" })]);
    assert_eq!(t.hooks.events(), CREATE_SEQUENCE);
}

#[tokio::test]
async fn create_or_update_updates_existing() {
    let t = TestCollection::seeded(vec![json!({ "id": 7, "name": "a" })]);

    let record = t
        .create_or_update(Query::all().with("name", "a"), fields(json!({ "x": 1 })))
        .await
        .unwrap();

    assert_eq!(record.id(), Some(&json!(7)));
    assert_eq!(t.rows(), vec![json!({ "id": 7, "name": "a", "x": 1 })]);
    assert_eq!(t.hooks.events(), UPDATE_SEQUENCE);
}

#[tokio::test]
async fn update_iter_is_lazy() {
    let t = three_rows();

    let mut stream = t.update_iter(Query::all(), fields(json!({ "seen": true })));
    assert!(t.hooks.is_empty());
    assert!(t.rows().iter().all(|r| r.get("seen").is_none()));

    let first = stream.try_next().await.unwrap().unwrap();
    assert_eq!(first.id(), Some(&json!(1)));
    assert_eq!(t.hooks.events(), UPDATE_SEQUENCE);
    let seen: Vec<bool> = t.rows().iter().map(|r| r.get("seen").is_some()).collect();
    assert_eq!(seen, vec![true, false, false]);

    drop(stream);
    assert_eq!(t.hooks.len(), UPDATE_SEQUENCE.len());
}

#[tokio::test]
async fn remove_iter_is_lazy() {
    let t = three_rows();

    let mut stream = t.remove_iter(Query::all());
    assert_eq!(t.store.len(t.table()), 3);

    stream.try_next().await.unwrap().unwrap();
    assert_eq!(t.store.len(t.table()), 2);

    let rest: Vec<_> = stream.try_collect().await.unwrap();
    assert_eq!(rest.len(), 2);
    assert!(t.rows().is_empty());
}

#[tokio::test]
async fn each_find_iter_call_is_a_fresh_sequence() {
    let t = three_rows();

    let mut a = t.iter();
    a.try_next().await.unwrap();
    let all: Vec<_> = t.iter().try_collect().await.unwrap();

    assert_eq!(ids(&all), vec![json!(1), json!(2), json!(3)]);
}

#[tokio::test]
async fn update_one_and_remove_one_touch_the_first_match() {
    let t = three_rows();

    let updated = t
        .update_one(Query::all().with("x", 1), fields(json!({ "x": 5 })))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.id(), Some(&json!(1)));

    let removed = t.remove_one(Query::all().with("x", 1)).await.unwrap().unwrap();
    assert_eq!(removed.get("x"), Some(&json!(1)));
    assert_eq!(
        t.rows(),
        vec![json!({ "id": 1, "x": 5 }), json!({ "id": 3, "x": 2 })]
    );

    assert!(t.update_one(Query::all().with("x", 9), fields(json!({}))).await.unwrap().is_none());
    assert!(t.remove_one(Query::all().with("x", 9)).await.unwrap().is_none());
}

#[tokio::test]
async fn update_by_id_of_missing_record_is_not_found() {
    let t = three_rows();

    let err = t.update_by_id(99, fields(json!({ "x": 0 }))).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(t.hooks.is_empty());
}

#[tokio::test]
async fn named_collections_route_to_their_table() {
    let t = TestCollection::new();
    let users = t.collection.named("users");

    let user = users.create(fields(json!({ "name": "ann" }))).await.unwrap();

    assert_eq!(user.table(), "users");
    assert_eq!(t.store.len("users"), 1);
    assert_eq!(t.count(Query::all()).await.unwrap(), 0);
    assert_eq!(users.count(Query::all()).await.unwrap(), 1);

    let calls = t.hooks.calls();
    assert!(calls.iter().all(|c| c.table == "users"));
}

#[tokio::test]
async fn default_store_fails_find_on_first_pull() {
    let collection = Collection::new(UnimplementedStore);

    let _unpulled = collection.find_iter(Query::all());
    let err = collection.find(Query::all()).await.unwrap_err();

    assert!(matches!(err, RecordError::NotImplemented("findIterator")));
    assert!(collection.count(Query::all()).await.is_err());
}
