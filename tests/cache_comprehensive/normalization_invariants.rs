//! Normalization Invariant Tests
//!
//! Shape of the flat store after writing results: records, references,
//! generated ids, round trips and conditional inclusion.

use crate::test_utils::*;
use graphcache::{
    Cache, Directive, Document, Field, FragmentDefinition, FragmentSpread, IdValue, InlineFragment,
    InputValue, Selection, StoreValue, Value, Variables, ROOT_QUERY_ID,
};
use serde_json::json;

fn reference(id: &str) -> StoreValue {
    StoreValue::Reference(IdValue::stable(id))
}

#[test]
fn account_scenario_produces_four_records() {
    init_tracing();
    let mut cache = Cache::new();
    let result = v(account_data());
    let get_id = by_id();

    write(&mut cache, &account_query(), &result, Some(&get_id), Some("1")).unwrap();

    let store = &cache.data;
    assert_eq!(store.ids(), vec!["ROOT_QUERY", "account1", "user1", "user2"]);
    assert_eq!(store.field(ROOT_QUERY_ID, NODE_KEY), Some(&reference("account1")));
    assert_eq!(store.field("account1", "owner"), Some(&reference("user1")));
    assert_eq!(
        store.field("account1", "users"),
        Some(&StoreValue::List(vec![reference("user1"), reference("user2")]))
    );
    assert_eq!(
        store.field("user2", "name"),
        Some(&StoreValue::Scalar(Value::from("User 2")))
    );

    let entry = cache.query_cache.get("1").unwrap();
    let user1 = &entry.pointers["user1"];
    assert_eq!(user1.len(), 2);
    assert!(user1[0].ptr_eq(at(&entry.result, &["node", "owner"])));
    assert!(user1[1].ptr_eq(at(&entry.result, &["node", "users", "0"])));
    assert!(entry.pointers["user2"][0].ptr_eq(at(&entry.result, &["node", "users", "1"])));
    assert!(entry.pointers["account1"][0].ptr_eq(at(&entry.result, &["node"])));
    assert_eq!(entry.pointers.len(), 3);
}

#[test]
fn store_serializes_with_reference_markers() {
    let mut cache = Cache::new();
    let get_id = by_id();
    write(&mut cache, &account_query(), &v(account_data()), Some(&get_id), None).unwrap();

    let json = serde_json::to_value(&cache.data).unwrap();
    assert_eq!(
        json["account1"]["owner"],
        json!({"Reference": {"id": "user1", "generated": false}})
    );
    assert_eq!(json["user1"]["name"], json!({"Scalar": "User 1"}));
}

#[test]
fn read_back_matches_written_result() {
    let mut cache = Cache::new();
    let get_id = by_id();
    let result = v(account_data());
    write(&mut cache, &account_query(), &result, Some(&get_id), None).unwrap();

    let read = read_back(&cache.data, &account_query(), &Variables::new()).unwrap();
    assert_eq!(read, result);
}

#[test]
fn read_back_without_identity_function() {
    let mut cache = Cache::new();
    let result = v(account_data());
    write(&mut cache, &account_query(), &result, None, None).unwrap();

    assert_eq!(read_back(&cache.data, &account_query(), &Variables::new()).unwrap(), result);
}

#[test]
fn rewriting_same_result_changes_nothing() {
    let mut cache = Cache::new();
    let get_id = by_id();
    let result = v(account_data());
    write(&mut cache, &account_query(), &result, Some(&get_id), None).unwrap();
    let once = cache.data.clone();

    let outcome = write(&mut cache, &account_query(), &v(account_data()), Some(&get_id), None).unwrap();

    assert_eq!(cache.data, once);
    assert!(outcome.updated_ids.is_empty());
    assert!(outcome.dirtied_queries.is_empty());
}

#[test]
fn generated_ids_are_sentinel_prefixed() {
    let mut cache = Cache::new();
    write(&mut cache, &account_query(), &v(account_data()), None, None).unwrap();

    let node_id = format!("$ROOT_QUERY.{NODE_KEY}");
    assert_eq!(
        cache.data.field(ROOT_QUERY_ID, NODE_KEY),
        Some(&StoreValue::Reference(IdValue::generated(node_id.clone())))
    );
    for id in cache.data.ids() {
        assert!(id == ROOT_QUERY_ID || id.starts_with('$'), "unexpected id {id}");
    }
    assert!(cache.data.contains(&format!("{node_id}.users.1")));
}

#[test]
fn variables_feed_storage_keys_and_directives() {
    let doc = Document::query([
        Field::new("user")
            .arg("id", InputValue::var("userId"))
            .select([Field::new("id"), Field::new("name")]),
        Field::new("debug")
            .directive(Directive::include(InputValue::var("withDebug")))
            .select([Field::new("id")]),
    ]);
    let mut variables = Variables::new();
    variables.insert("userId".to_string(), Value::from("u7"));
    variables.insert("withDebug".to_string(), Value::Bool(false));

    let get_id = by_id();
    let mut cache = Cache::new();
    let request = graphcache::ResultWrite::new()
        .variables(&variables)
        .data_id_from_object(get_id.as_ref())
        .query_id("q");
    graphcache::write_result_to_store(
        &mut cache,
        &doc,
        ROOT_QUERY_ID,
        v(json!({"user": {"id": "u7", "name": "Sam"}, "debug": {"id": "dbg"}})),
        &request,
    )
    .unwrap();

    assert_eq!(
        cache.data.field(ROOT_QUERY_ID, "user({\"id\":\"u7\"})"),
        Some(&reference("u7"))
    );
    assert!(cache.data.field(ROOT_QUERY_ID, "debug").is_none());
    assert!(!cache.data.contains("dbg"));
    let entry = cache.query_cache.get("q").unwrap();
    assert!(!entry.pointers.contains_key("dbg"));
    assert_eq!(entry.variables, variables);
}

#[test]
fn fragments_write_into_the_same_record() {
    let doc = Document::query([Field::new("viewer").select([
        Selection::from(Field::new("id")),
        InlineFragment::new(Some("User"), [Field::new("name")]).into(),
        FragmentSpread::new("Contact").into(),
    ])])
    .with_fragment(FragmentDefinition::new("Contact", "User", [Field::new("email")]));

    let mut cache = Cache::new();
    let get_id = by_id();
    let result = v(json!({"viewer": {"id": "me", "name": "Ann", "email": "a@x"}}));
    write(&mut cache, &doc, &result, Some(&get_id), None).unwrap();

    let record = cache.data.get("me").unwrap();
    assert_eq!(
        record.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["email", "id", "name"]
    );
    assert_eq!(read_back(&cache.data, &doc, &Variables::new()).unwrap(), result);
}

#[test]
fn skipped_fragment_is_not_written() {
    let doc = Document::query([Field::new("viewer").select([
        Selection::from(Field::new("id")),
        InlineFragment::new(None, [Field::new("secret")])
            .directive(Directive::skip(true))
            .into(),
    ])]);
    let mut cache = Cache::new();
    write(
        &mut cache,
        &doc,
        &v(json!({"viewer": {"id": "me", "secret": "s"}})),
        None,
        None,
    )
    .unwrap();

    assert!(cache.data.field("$ROOT_QUERY.viewer", "secret").is_none());
}

#[test]
fn nested_lists_keep_shape() {
    let doc = Document::query([Field::new("matrix").select([Field::new("id"), Field::new("v")])]);
    let result = v(json!({"matrix": [[{"id": "a", "v": 1}, null], [[{"id": "b", "v": 2}]]]}));
    let mut cache = Cache::new();
    let get_id = by_id();
    write(&mut cache, &doc, &result, Some(&get_id), None).unwrap();

    assert_eq!(
        cache.data.field(ROOT_QUERY_ID, "matrix"),
        Some(&StoreValue::List(vec![
            StoreValue::List(vec![reference("a"), StoreValue::null()]),
            StoreValue::List(vec![StoreValue::List(vec![reference("b")])]),
        ]))
    );
    assert_eq!(read_back(&cache.data, &doc, &Variables::new()).unwrap(), result);
}

#[test]
fn scalar_lists_and_blobs_are_leaves() {
    let doc = Document::query([Field::new("tags"), Field::new("meta")]);
    let result = v(json!({"tags": ["a", "b"], "meta": {"type": "id", "id": "x"}}));
    let mut cache = Cache::new();
    write(&mut cache, &doc, &result, None, None).unwrap();

    assert_eq!(
        cache.data.field(ROOT_QUERY_ID, "tags"),
        Some(&StoreValue::Json(v(json!(["a", "b"]))))
    );
    assert_eq!(
        cache.data.field(ROOT_QUERY_ID, "meta"),
        Some(&StoreValue::Json(v(json!({"type": "id", "id": "x"}))))
    );
    assert_eq!(cache.data.len(), 1);
}

#[test]
fn missing_field_on_read() {
    let mut cache = Cache::new();
    write(&mut cache, &Document::query([Field::new("a")]), &v(json!({"a": 1})), None, None).unwrap();

    let err = read_back(
        &cache.data,
        &Document::query([Field::new("a"), Field::new("b")]),
        &Variables::new(),
    )
    .unwrap_err();
    assert!(matches!(err, graphcache::Error::MissingField { .. }));
}
