//! Tracker lifecycle scenarios: track / diff / flush over the user example.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{push, user, user_blueprint_json, user_tracker};
use dytrack_core::{Blueprint, DiffNode, Tracker};
use serde_json::json;

#[test]
fn test_user_example_end_to_end() {
    let mut tracker = user_tracker();
    let mut user = user(1);

    tracker.track(&user).unwrap();

    user["name"] = json!("Jane Smith");
    user["permission"]["id"] = json!(2);
    push(&mut user, "posts", json!({"id": 2, "title": "Follow me"}));

    let diff = tracker.diff(&user).unwrap();
    assert_eq!(
        diff.to_value(),
        json!({
            "name": "Jane Smith",
            "permission": { "id": 2 },
            "posts": {
                "added": [ { "id": 2, "title": "Follow me" } ],
                "removed": [],
                "updated": []
            }
        })
    );
    assert!(!diff.contains("email"));
}

#[test]
fn test_parsed_blueprint_behaves_like_builder() {
    let blueprint = Blueprint::from_value(&user_blueprint_json()).unwrap();
    let mut tracker = Tracker::new(blueprint).unwrap();
    let mut user = user(1);

    tracker.track(&user).unwrap();
    user["email"] = json!("jane@new.example.com");

    assert_eq!(
        tracker.diff(&user).unwrap().to_value(),
        json!({
            "email": "jane@new.example.com",
            "posts": { "added": [], "removed": [], "updated": [] }
        })
    );
}

#[test]
fn test_parsed_field_named_tracking_nests() {
    let blueprint = Blueprint::from_value(&json!({
        "shipment": { "tracking": { "code": true } }
    }))
    .unwrap();
    let mut tracker = Tracker::new(blueprint).unwrap();
    let mut order = json!({"id": 1, "shipment": {"tracking": {"code": "A1"}}});

    tracker.track(&order).unwrap();
    order["shipment"]["tracking"]["code"] = json!("B2");

    assert_eq!(
        tracker.diff(&order).unwrap().to_value(),
        json!({ "shipment": { "tracking": { "code": "B2" } } })
    );
}

#[test]
fn test_diff_right_after_track_has_only_empty_list_buckets() {
    let mut tracker = user_tracker();
    let user = user(1);
    tracker.track(&user).unwrap();

    let diff = tracker.diff(&user).unwrap();
    assert!(!diff.has_changes());
    assert_eq!(
        diff.to_value(),
        json!({ "posts": { "added": [], "removed": [], "updated": [] } })
    );
}

#[test]
fn test_diff_without_list_fields_is_empty_after_track() {
    let mut tracker = Tracker::new(Blueprint::new().leaf("name").leaf("email")).unwrap();
    let user = user(1);
    tracker.track(&user).unwrap();
    assert!(tracker.diff(&user).unwrap().is_empty());
}

#[test]
fn test_second_track_keeps_first_snapshot() {
    let mut tracker = user_tracker();
    let mut user = user(1);
    tracker.track(&user).unwrap();

    user["name"] = json!("Changed Before Retrack");
    tracker.track(&user).unwrap();
    assert_eq!(tracker.tracked_count(), 1);

    let diff = tracker.diff(&user).unwrap();
    assert_eq!(
        diff.get("name").and_then(DiffNode::as_changed),
        Some(&json!("Changed Before Retrack"))
    );
}

#[test]
fn test_leaf_change_reports_exactly_that_field() {
    let mut tracker = Tracker::new(Blueprint::new().leaf("name").leaf("email")).unwrap();
    let mut user = user(1);
    tracker.track(&user).unwrap();

    user["email"] = json!("other@example.com");
    assert_eq!(
        tracker.diff(&user).unwrap().to_value(),
        json!({ "email": "other@example.com" })
    );
}

#[test]
fn test_nested_partiality() {
    let blueprint = Blueprint::new().nested("permission", Blueprint::new().leaf("id").leaf("name"));
    let mut tracker = Tracker::new(blueprint).unwrap();
    let mut user = user(1);
    tracker.track(&user).unwrap();

    user["permission"]["name"] = json!("Owner");
    assert_eq!(
        tracker.diff(&user).unwrap().to_value(),
        json!({ "permission": { "name": "Owner" } })
    );
}

#[test]
fn test_list_buckets_after_mixed_mutation() {
    let mut tracker = user_tracker();
    let mut user = user(1);
    push(&mut user, "posts", json!({"id": 2, "title": "Second"}));
    push(&mut user, "posts", json!({"id": 3, "title": "Third"}));
    tracker.track(&user).unwrap();

    // drop post 1, edit post 2, leave post 3 alone, add post 4
    user["posts"] = json!([
        {"id": 2, "title": "Second (edited)"},
        {"id": 3, "title": "Third"},
        {"id": 4, "title": "Fourth"}
    ]);

    let diff = tracker.diff(&user).unwrap();
    let posts = diff.get("posts").and_then(DiffNode::as_list).unwrap();
    assert_eq!(posts.added, vec![json!({"id": 4, "title": "Fourth"})]);
    assert_eq!(posts.removed, vec![json!({"id": 1, "title": "Hi there"})]);
    assert_eq!(posts.updated, vec![json!({"id": 2, "title": "Second (edited)"})]);
}

#[test]
fn test_diff_of_untracked_identity_is_empty() {
    let mut tracker = user_tracker();
    tracker.track(&user(1)).unwrap();

    let diff = tracker.diff(&user(2)).unwrap();
    assert!(diff.is_empty());
    assert_eq!(diff.to_value(), json!({}));
}

#[test]
fn test_flush_resets_tracking() {
    let mut tracker = user_tracker();
    let mut user = user(1);
    tracker.track(&user).unwrap();

    user["name"] = json!("Jane Smith");
    tracker.flush(1);
    assert!(!tracker.is_tracked(1));
    assert!(tracker.diff(&user).unwrap().is_empty());

    // re-tracking captures the current state, not the first one
    tracker.track(&user).unwrap();
    assert!(!tracker.diff(&user).unwrap().has_changes());
}

#[test]
fn test_flush_unknown_identity_is_noop() {
    let mut tracker = user_tracker();
    tracker.track(&user(1)).unwrap();
    tracker.flush(99);
    tracker.flush("not-an-id");
    tracker.flush(99);
    assert_eq!(tracker.tracked_count(), 1);
}

#[test]
fn test_trackers_do_not_share_stores() {
    let mut a = user_tracker();
    let b = user_tracker();
    let mut user = user(1);
    a.track(&user).unwrap();
    user["name"] = json!("x");

    assert!(a.diff(&user).unwrap().contains("name"));
    assert!(b.diff(&user).unwrap().is_empty());
}

#[test]
fn test_string_identities() {
    let mut tracker = Tracker::new(Blueprint::new().key_name("uuid").leaf("name")).unwrap();
    let mut obj = json!({"uuid": "7f2c", "name": "a"});
    tracker.track(&obj).unwrap();
    obj["name"] = json!("b");

    assert_eq!(tracker.diff(&obj).unwrap().to_value(), json!({"name": "b"}));
    tracker.flush("7f2c");
    assert_eq!(tracker.tracked_count(), 0);
}
