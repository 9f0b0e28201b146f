//! Property Tests
//!
//! Randomized account/user results checked against the store invariants.

use crate::test_utils::*;
use graphcache::{merge, Cache, Document, Field, Value, Variables, ROOT_QUERY_ID};
use proptest::prelude::*;
use serde_json::json;

fn members_query() -> Document {
    Document::query([Field::new("team").select([
        Field::new("id"),
        Field::new("title"),
        Field::new("members").select([
            Field::new("id"),
            Field::new("name"),
            Field::new("manager").select([Field::new("id"), Field::new("name")]),
        ]),
    ])])
}

#[derive(Debug, Clone)]
struct Member {
    id: u8,
    name: String,
    manager: Option<u8>,
}

fn arb_member() -> impl Strategy<Value = Member> {
    (0u8..6, "[a-z]{1,5}", proptest::option::of(0u8..6)).prop_map(|(id, name, manager)| Member {
        id,
        name,
        manager,
    })
}

/// Team result where every occurrence of an entity id carries the same data
fn team_result(title: &str, members: &[Member]) -> Value {
    let first = |id: u8| members.iter().find(|member| member.id == id);
    let name_of = |id: u8| first(id).map_or_else(|| format!("m{id}"), |member| member.name.clone());
    let members: Vec<serde_json::Value> = members
        .iter()
        .map(|member| {
            json!({
                "id": format!("u{}", member.id),
                "name": name_of(member.id),
                "manager": first(member.id)
                    .and_then(|canonical| canonical.manager)
                    .map(|id| json!({"id": format!("u{id}"), "name": name_of(id)})),
            })
        })
        .collect();
    v(json!({"team": {"id": "team1", "title": title, "members": members}}))
}

proptest! {
    #[test]
    fn round_trip_through_store(title in "[a-z]{0,6}", members in prop::collection::vec(arb_member(), 0..6), stable in any::<bool>()) {
        let result = team_result(&title, &members);
        let get_id = by_id();
        let mut cache = Cache::new();
        write(&mut cache, &members_query(), &result, stable.then_some(&get_id), None).unwrap();

        let read = read_back(&cache.data, &members_query(), &Variables::new()).unwrap();
        prop_assert_eq!(read, result);
    }

    #[test]
    fn rewrite_is_idempotent(title in "[a-z]{0,6}", members in prop::collection::vec(arb_member(), 0..6), stable in any::<bool>()) {
        let result = team_result(&title, &members);
        let get_id = by_id();
        let get_id = stable.then_some(&get_id);
        let mut cache = Cache::new();
        write(&mut cache, &members_query(), &result, get_id, Some("q")).unwrap();
        let once = cache.data.clone();

        let outcome = write(&mut cache, &members_query(), &result.deep_clone(), get_id, Some("q")).unwrap();

        prop_assert_eq!(&cache.data, &once);
        prop_assert!(outcome.updated_ids.is_empty());
        prop_assert!(cache.query_cache.get("q").unwrap().result.ptr_eq(&result));
    }

    #[test]
    fn generated_ids_carry_sentinel(title in "[a-z]{0,6}", members in prop::collection::vec(arb_member(), 0..6)) {
        let mut cache = Cache::new();
        write(&mut cache, &members_query(), &team_result(&title, &members), None, None).unwrap();

        for id in cache.data.ids() {
            prop_assert!(id == ROOT_QUERY_ID || id.starts_with('$'));
        }
    }

    #[test]
    fn well_formed_ids_are_accepted(members in prop::collection::vec(arb_member(), 0..6)) {
        let get_id = by_id();
        let mut cache = Cache::new();
        let written = write(&mut cache, &members_query(), &team_result("t", &members), Some(&get_id), None);
        prop_assert!(written.is_ok());
        for member in &members {
            let member_id = format!("u{}", member.id);
            prop_assert!(cache.data.contains(&member_id));
        }
    }

    #[test]
    fn changed_member_dirties_cached_team(members in prop::collection::vec(arb_member(), 1..6), renamed in "[A-Z]{1,4}") {
        let get_id = by_id();
        let mut cache = Cache::new();
        write(&mut cache, &members_query(), &team_result("t", &members), Some(&get_id), Some("team")).unwrap();

        let target = format!("u{}", members[0].id);
        let doc = Document::query([Field::new("user").select([Field::new("id"), Field::new("name")])]);
        let outcome = write(&mut cache, &doc, &v(json!({"user": {"id": target, "name": renamed}})), Some(&get_id), None).unwrap();

        prop_assert_eq!(outcome.dirtied_queries, vec!["team".to_string()]);
        prop_assert!(cache.query_cache.get("team").unwrap().dirty);
    }

    #[test]
    fn merge_reuses_old_members(title in "[a-z]{0,6}", members in prop::collection::vec(arb_member(), 0..6)) {
        let old = team_result("before", &members);
        let new = team_result(&title, &members);
        let merged = merge(&new, &old);

        prop_assert_eq!(&merged, &new);
        prop_assert!(at(&merged, &["team", "members"]).ptr_eq(at(&old, &["team", "members"])));
    }
}
