//! Snapshot-versus-current comparison.
//!
//! The core entry point is [`compare`], which walks the blueprint over a
//! stored [`FieldSnapshot`] and the object's current state in lockstep.

use std::collections::HashSet;

use dytrack_core_types::EntityKey;
use serde_json::{Map, Value};

use super::model::{DiffNode, FieldDiff, ListDiff};
use crate::blueprint::{Blueprint, BlueprintNode};
use crate::config::DuplicateKeyPolicy;
use crate::errors::Result;
use crate::path;
use crate::snapshot::model::entity_record;
use crate::snapshot::walker::{as_object, field_value, keyed_entities, nested_object, NULL};
use crate::snapshot::{EntityTable, FieldSnapshot, Snapshot};

/// Compare `snapshot` against the current state of `current`
///
/// The snapshot must have been captured with the same blueprint.
///
/// # Errors
///
/// Fails on the same structural problems in `current` that
/// [`capture`](crate::snapshot::capture) rejects: non-object roots or
/// entities, mistyped nested/list fields, unusable or duplicate entity keys.
pub fn compare(
    blueprint: &Blueprint,
    snapshot: &FieldSnapshot,
    current: &Value,
    duplicates: DuplicateKeyPolicy,
) -> Result<FieldDiff> {
    let obj = as_object(current, path::ROOT)?;
    compare_fields(blueprint, snapshot, Some(obj), path::ROOT, duplicates)
}

fn compare_fields(
    blueprint: &Blueprint,
    stored: &FieldSnapshot,
    current: Option<&Map<String, Value>>,
    at: &str,
    duplicates: DuplicateKeyPolicy,
) -> Result<FieldDiff> {
    let mut diff = FieldDiff::new();
    for (name, node) in blueprint.fields() {
        if !node.is_tracked() {
            continue;
        }
        let field_path = path::child(at, name);
        let current_value = field_value(current, name);
        if let Some(change) =
            compare_node(node, stored.get(name), current_value, &field_path, duplicates)?
        {
            diff.push(name, change);
        }
    }
    Ok(diff)
}

/// `None` means the field is unchanged; list fields always yield a node
fn compare_node(
    node: &BlueprintNode,
    stored: Option<&Snapshot>,
    current: &Value,
    at: &str,
    duplicates: DuplicateKeyPolicy,
) -> Result<Option<DiffNode>> {
    match node {
        BlueprintNode::Leaf(_) => Ok(strict_change(stored_value(stored), current)),
        BlueprintNode::Overridden(overrides) => match &overrides.predicate {
            Some(predicate) => {
                if predicate.is_equal(stored_value(stored), current) {
                    Ok(None)
                } else {
                    Ok(Some(DiffNode::Changed(current.clone())))
                }
            }
            None => Ok(strict_change(stored_value(stored), current)),
        },
        BlueprintNode::Nested(inner) => {
            let current_obj = nested_object(current, at)?;
            let empty = FieldSnapshot::new();
            let stored_fields = stored.and_then(Snapshot::as_fields).unwrap_or(&empty);
            let diff = compare_fields(inner, stored_fields, current_obj, at, duplicates)?;
            if !diff.has_changes() {
                Ok(None)
            } else {
                Ok(Some(DiffNode::Nested(diff)))
            }
        }
        BlueprintNode::ListTracking { key_name, tracking } => {
            let table = stored.and_then(Snapshot::as_entities);
            let list = compare_list(key_name, tracking, table, current, at, duplicates)?;
            Ok(Some(DiffNode::List(list)))
        }
    }
}

fn stored_value(stored: Option<&Snapshot>) -> &Value {
    stored.and_then(Snapshot::as_value).unwrap_or(&NULL)
}

fn strict_change(stored: &Value, current: &Value) -> Option<DiffNode> {
    if stored == current {
        None
    } else {
        Some(DiffNode::Changed(current.clone()))
    }
}

fn compare_list(
    key_name: &str,
    tracking: &Blueprint,
    table: Option<&EntityTable>,
    current: &Value,
    at: &str,
    duplicates: DuplicateKeyPolicy,
) -> Result<ListDiff> {
    let entities = keyed_entities(current, key_name, at, duplicates)?;
    let mut list = ListDiff::default();
    let mut present: HashSet<&EntityKey> = HashSet::with_capacity(entities.len());

    for (key, entity, entity_path) in &entities {
        present.insert(key);
        let Some(stored_fields) = table.and_then(|t| t.get(key)) else {
            list.added.push(Value::Object(Map::clone(entity)));
            continue;
        };

        let changes =
            compare_fields(tracking, stored_fields, Some(*entity), entity_path, duplicates)?;
        if changes.has_changes() {
            list.updated
                .push(entity_record(key_name, key, changes.to_map()));
        }
    }

    if let Some(table) = table {
        for (key, stored_fields) in table.iter() {
            if !present.contains(key) {
                list.removed
                    .push(entity_record(key_name, key, stored_fields.to_map()));
            }
        }
    }

    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::capture;
    use serde_json::json;

    fn diff_of(blueprint: &Blueprint, before: &Value, after: &Value) -> Value {
        let snapshot = capture(blueprint, before, DuplicateKeyPolicy::Reject).unwrap();
        compare(blueprint, &snapshot, after, DuplicateKeyPolicy::Reject)
            .unwrap()
            .to_value()
    }

    #[test]
    fn test_unchanged_leaf_is_omitted() {
        let bp = Blueprint::new().leaf("name").leaf("email");
        let obj = json!({"name": "a", "email": "e"});
        assert_eq!(diff_of(&bp, &obj, &obj), json!({}));
    }

    #[test]
    fn test_leaf_change_reports_new_value() {
        let bp = Blueprint::new().leaf("name").leaf("email");
        assert_eq!(
            diff_of(
                &bp,
                &json!({"name": "a", "email": "e"}),
                &json!({"name": "b", "email": "e"})
            ),
            json!({"name": "b"})
        );
    }

    #[test]
    fn test_removed_leaf_reports_null() {
        let bp = Blueprint::new().leaf("name");
        assert_eq!(diff_of(&bp, &json!({"name": "a"}), &json!({})), json!({"name": null}));
    }

    #[test]
    fn test_untracked_leaf_never_reported() {
        let bp = Blueprint::new().untracked("name");
        assert_eq!(diff_of(&bp, &json!({"name": "a"}), &json!({"name": "b"})), json!({}));
    }

    #[test]
    fn test_nested_reports_only_changed_children() {
        let bp = Blueprint::new().nested("permission", Blueprint::new().leaf("id").leaf("name"));
        assert_eq!(
            diff_of(
                &bp,
                &json!({"permission": {"id": 1, "name": "Admin"}}),
                &json!({"permission": {"id": 2, "name": "Admin"}})
            ),
            json!({"permission": {"id": 2}})
        );
    }

    #[test]
    fn test_nested_null_to_object() {
        let bp = Blueprint::new().nested("permission", Blueprint::new().leaf("id"));
        assert_eq!(
            diff_of(&bp, &json!({"permission": null}), &json!({"permission": {"id": 5}})),
            json!({"permission": {"id": 5}})
        );
    }

    #[test]
    fn test_predicate_suppresses_change() {
        let bp = Blueprint::new().with_predicate("email", |a, b| {
            a.as_str().map(str::to_lowercase) == b.as_str().map(str::to_lowercase)
        });
        assert_eq!(
            diff_of(&bp, &json!({"email": "Jane@X.io"}), &json!({"email": "jane@x.io"})),
            json!({})
        );
        assert_eq!(
            diff_of(&bp, &json!({"email": "jane@x.io"}), &json!({"email": "joe@x.io"})),
            json!({"email": "joe@x.io"})
        );
    }

    #[test]
    fn test_overridden_without_predicate_is_strict() {
        let bp = Blueprint::new().overridden("settings", Default::default());
        assert_eq!(
            diff_of(&bp, &json!({"settings": {"a": 1}}), &json!({"settings": {"a": 2}})),
            json!({"settings": {"a": 2}})
        );
    }

    #[test]
    fn test_list_always_present_even_when_unchanged() {
        let bp = Blueprint::new().list("posts", "id", Blueprint::new().leaf("title"));
        let obj = json!({"posts": [{"id": 1, "title": "a"}]});
        assert_eq!(
            diff_of(&bp, &obj, &obj),
            json!({"posts": {"added": [], "removed": [], "updated": []}})
        );
    }

    #[test]
    fn test_list_buckets() {
        let bp = Blueprint::new().list("posts", "id", Blueprint::new().leaf("title"));
        let before = json!({"posts": [
            {"id": 1, "title": "keep"},
            {"id": 2, "title": "old"},
            {"id": 3, "title": "gone", "body": "x"}
        ]});
        let after = json!({"posts": [
            {"id": 4, "title": "new", "body": "y"},
            {"id": 2, "title": "edited"},
            {"id": 1, "title": "keep", "body": "changed but untracked"}
        ]});
        assert_eq!(
            diff_of(&bp, &before, &after),
            json!({"posts": {
                "added": [{"id": 4, "title": "new", "body": "y"}],
                "removed": [{"id": 3, "title": "gone"}],
                "updated": [{"id": 2, "title": "edited"}]
            }})
        );
    }

    #[test]
    fn test_removed_follows_capture_order() {
        let bp = Blueprint::new().list("posts", "id", Blueprint::new());
        let before = json!({"posts": [{"id": 9}, {"id": 3}, {"id": 5}]});
        let diff = diff_of(&bp, &before, &json!({"posts": []}));
        assert_eq!(diff["posts"]["removed"], json!([{"id": 9}, {"id": 3}, {"id": 5}]));
    }

    #[test]
    fn test_list_entities_with_nested_lists() {
        let bp = Blueprint::new().list(
            "posts",
            "id",
            Blueprint::new().list("comments", "cid", Blueprint::new().leaf("text")),
        );
        let before = json!({"posts": [{"id": 1, "comments": [{"cid": "a", "text": "hi"}]}]});
        let after = json!({"posts": [{"id": 1, "comments": [{"cid": "a", "text": "hello"}]}]});
        assert_eq!(
            diff_of(&bp, &before, &after),
            json!({"posts": {"added": [], "removed": [], "updated": [
                {"id": 1, "comments": {"added": [], "removed": [], "updated": [{"cid": "a", "text": "hello"}]}}
            ]}})
        );
    }

    #[test]
    fn test_unchanged_inner_list_does_not_mark_entity_updated() {
        let bp = Blueprint::new()
            .list(
                "posts",
                "id",
                Blueprint::new().list("comments", "cid", Blueprint::new().leaf("text")),
            )
            .nested(
                "profile",
                Blueprint::new().list("links", "url", Blueprint::new()),
            );
        let obj = json!({
            "posts": [{"id": 1, "comments": [{"cid": "a", "text": "hi"}]}],
            "profile": {"links": [{"url": "x"}]}
        });
        assert_eq!(
            diff_of(&bp, &obj, &obj),
            json!({"posts": {"added": [], "removed": [], "updated": []}})
        );
    }

    #[test]
    fn test_duplicate_keys_in_current_list_rejected() {
        let bp = Blueprint::new().list("posts", "id", Blueprint::new().leaf("title"));
        let snapshot = capture(&bp, &json!({"posts": []}), DuplicateKeyPolicy::Reject).unwrap();
        let err = compare(
            &bp,
            &snapshot,
            &json!({"posts": [{"id": 1}, {"id": 1}]}),
            DuplicateKeyPolicy::Reject,
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::errors::ExErrorKind::DuplicateEntityKey);
    }
}
