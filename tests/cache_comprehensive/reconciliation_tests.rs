//! Identity Reconciliation Tests
//!
//! Generated ids folding into stable ones, and the identity errors that
//! abort a write.

use crate::test_utils::*;
use graphcache::{Cache, Document, Error, Field, IdGetter, IdValue, StoreValue, Value, ROOT_QUERY_ID};
use serde_json::json;
use std::sync::Arc;

fn owner_query(fields: &[&str]) -> Document {
    Document::query([Field::new("owner").select(fields.iter().map(|name| Field::new(*name)))])
}

/// Ids only for objects carrying a `key` field, ignoring `id`
fn by_key() -> IdGetter {
    Arc::new(|value: &Value| value.get("key").and_then(Value::as_str).map(str::to_string))
}

#[test]
fn generated_record_merges_into_stable_one() {
    init_tracing();
    let mut cache = Cache::new();

    write(
        &mut cache,
        &owner_query(&["name", "email"]),
        &v(json!({"owner": {"name": "Ann", "email": "ann@x"}})),
        None,
        None,
    )
    .unwrap();
    assert!(cache.data.contains("$ROOT_QUERY.owner"));

    let get_id = by_id();
    write(
        &mut cache,
        &owner_query(&["id", "name", "age"]),
        &v(json!({"owner": {"id": "X", "name": "Ann B", "age": 30}})),
        Some(&get_id),
        None,
    )
    .unwrap();

    assert!(!cache.data.contains("$ROOT_QUERY.owner"));
    assert_eq!(cache.data.ids(), vec!["ROOT_QUERY", "X"]);
    let record = cache.data.get("X").unwrap();
    assert_eq!(
        record.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["age", "email", "id", "name"]
    );
    assert_eq!(record.get("name"), Some(&StoreValue::Scalar(Value::from("Ann B"))));
    assert_eq!(
        cache.data.field(ROOT_QUERY_ID, "owner"),
        Some(&StoreValue::Reference(IdValue::stable("X")))
    );
}

#[test]
fn nested_generated_records_follow() {
    let doc = Document::query([Field::new("owner").select([
        Field::new("key"),
        Field::new("address").select([Field::new("key"), Field::new("zip"), Field::new("city")]),
    ])]);
    let mut cache = Cache::new();

    write(
        &mut cache,
        &doc,
        &v(json!({"owner": {"address": {"zip": "123"}}})),
        None,
        None,
    )
    .unwrap();
    assert!(cache.data.contains("$ROOT_QUERY.owner.address"));

    let get_id = by_key();
    write(
        &mut cache,
        &doc,
        &v(json!({"owner": {"key": "u1", "address": {"key": "a1", "city": "Oslo"}}})),
        Some(&get_id),
        None,
    )
    .unwrap();

    assert_eq!(cache.data.ids(), vec!["ROOT_QUERY", "a1", "u1"]);
    assert_eq!(
        cache.data.field("a1", "zip"),
        Some(&StoreValue::Scalar(Value::from("123")))
    );
    assert_eq!(
        cache.data.field("a1", "city"),
        Some(&StoreValue::Scalar(Value::from("Oslo")))
    );
}

#[test]
fn stable_id_never_collapses_to_generated() {
    let mut cache = Cache::new();
    let get_id = by_id();
    let doc = owner_query(&["id", "name"]);
    write(&mut cache, &doc, &v(json!({"owner": {"id": "X", "name": "Ann"}})), Some(&get_id), None).unwrap();

    let err = write(&mut cache, &doc, &v(json!({"owner": {"name": "Ann"}})), Some(&get_id), None).unwrap_err();

    assert!(matches!(err, Error::IdentityConflict { ref existing_id } if existing_id == "X"));
    assert!(err.to_string().contains("already contains an id of X"));
    assert_eq!(
        cache.data.field(ROOT_QUERY_ID, "owner"),
        Some(&StoreValue::Reference(IdValue::stable("X")))
    );
}

#[test]
fn sentinel_prefixed_identity_is_rejected() {
    let get_id: IdGetter = Arc::new(|value: &Value| value.get("id").and_then(Value::as_str).map(|id| format!("${id}")));
    let mut cache = Cache::new();
    let err = write(&mut cache, &account_query(), &v(account_data()), Some(&get_id), None).unwrap_err();
    assert!(matches!(err, Error::InvalidIdentity { .. }));
}

#[test]
fn failed_write_keeps_earlier_records() {
    let doc = Document::query([
        Field::new("first").select([Field::new("id")]),
        Field::new("second").select([Field::new("id")]),
    ]);
    let get_id: IdGetter = Arc::new(|value: &Value| {
        value.get("id").and_then(Value::as_str).map(|id| match id {
            "bad" => "$bad".to_string(),
            other => other.to_string(),
        })
    });
    let mut cache = Cache::new();
    let err = write(
        &mut cache,
        &doc,
        &v(json!({"first": {"id": "ok"}, "second": {"id": "bad"}})),
        Some(&get_id),
        None,
    )
    .unwrap_err();

    assert!(err.is_identity_error());
    assert!(cache.data.contains("ok"));
    assert!(cache.data.field(ROOT_QUERY_ID, "second").is_none());
}

#[test]
fn changed_stable_reference_is_an_update() {
    let doc = Document::query([Field::new("account").select([
        Field::new("id"),
        Field::new("owner").select([Field::new("id")]),
    ])]);
    let get_id = by_id();
    let mut cache = Cache::new();
    write(&mut cache, &doc, &v(json!({"account": {"id": "a", "owner": {"id": "u1"}}})), Some(&get_id), None).unwrap();

    let outcome = write(
        &mut cache,
        &doc,
        &v(json!({"account": {"id": "a", "owner": {"id": "u2"}}})),
        Some(&get_id),
        None,
    )
    .unwrap();

    assert_eq!(outcome.updated_ids.iter().collect::<Vec<_>>(), vec!["a"]);
    assert!(cache.data.contains("u1"));
}
