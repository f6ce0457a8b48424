//! Listing response shapes and id extraction.

use proptest::prelude::*;
use revuecrafters::listing::{last_revue_id, revue_id, revues, ID_KEYS};
use revuecrafters::ListingError;
use serde_json::{json, Value};

#[test]
fn test_root_array() {
    let root = json!([
        { "revueId": "first" },
        { "revueId": "last" }
    ]);
    assert_eq!(last_revue_id(&root), Ok("last".to_string()));
}

#[test]
fn test_data_wrapper() {
    let root = json!({ "data": [{ "_id": "mongo-style" }], "total": 1 });
    assert_eq!(last_revue_id(&root), Ok("mongo-style".to_string()));
}

#[test]
fn test_revues_wrapper() {
    let root = json!({ "revues": [{ "id": "a" }, { "id": "b" }] });
    assert_eq!(last_revue_id(&root), Ok("b".to_string()));
}

#[test]
fn test_empty_array() {
    assert_eq!(last_revue_id(&json!([])), Err(ListingError::Empty));
    assert_eq!(
        last_revue_id(&json!({ "data": [] })),
        Err(ListingError::Empty)
    );
}

#[test]
fn test_unknown_wrapper_key() {
    let root = json!({ "items": [{ "id": "a" }] });
    assert!(revues(&root).is_none());
    assert_eq!(last_revue_id(&root), Err(ListingError::NotAnArray));
}

#[test]
fn test_last_item_without_id() {
    let root = json!([{ "id": "a" }, { "title": "no id" }]);
    assert_eq!(last_revue_id(&root), Err(ListingError::MissingId));
}

#[test]
fn test_last_item_not_an_object() {
    let root = json!([{ "id": "a" }, "b"]);
    assert_eq!(revue_id(&root[1]), None);
    assert_eq!(last_revue_id(&root), Err(ListingError::MissingId));
}

#[test]
fn test_blank_id_is_missing() {
    let root = json!([{ "revueId": "   " }]);
    assert_eq!(last_revue_id(&root), Err(ListingError::MissingId));
}

proptest! {
    #[test]
    fn prop_id_found_under_any_key(
        key_index in 0usize..3,
        id in "[A-Za-z0-9-]{1,36}",
        leading in 0usize..5,
    ) {
        let key = ID_KEYS[key_index];
        let mut items: Vec<Value> = (0..leading)
            .map(|i| json!({ "id": format!("other-{}", i) }))
            .collect();
        let mut last = json!({ "title": "t" });
        last[key] = json!(id.clone());
        items.push(last);

        for root in [
            Value::Array(items.clone()),
            json!({ "data": items.clone() }),
            json!({ "revues": items.clone() }),
        ] {
            prop_assert_eq!(last_revue_id(&root), Ok(id.clone()));
        }
    }

    #[test]
    fn prop_earlier_key_wins(a in "[a-z]{1,8}", b in "[a-z]{1,8}", c in "[a-z]{1,8}") {
        let revue = json!({ "_id": c, "id": b.clone(), "revueId": a.clone() });
        prop_assert_eq!(revue_id(&revue), Some(a.as_str()));

        let revue = json!({ "_id": "x", "id": b.clone() });
        prop_assert_eq!(revue_id(&revue), Some(b.as_str()));
    }
}
