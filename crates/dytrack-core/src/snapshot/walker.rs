//! Blueprint-driven capture of an object's tracked fields.
//!
//! Absent fields read as `null`. A `null` nested object captures every
//! tracked sub-field as `null`, and a `null` list captures as an empty table.

use std::collections::HashMap;

use dytrack_core_types::EntityKey;
use serde_json::{Map, Value};

use super::model::{EntityTable, FieldSnapshot, Snapshot};
use crate::blueprint::{Blueprint, BlueprintNode};
use crate::config::DuplicateKeyPolicy;
use crate::errors::{type_name, Result, TrackError};
use crate::path;

pub(crate) static NULL: Value = Value::Null;

/// An entity of a tracked list: its key, its fields and its path
pub(crate) type KeyedEntity<'a> = (EntityKey, &'a Map<String, Value>, String);

/// Capture the tracked fields of `object` as described by `blueprint`
///
/// # Errors
///
/// - `NotAnObject`: `object` or a list entity is not a JSON object
/// - `TypeMismatch`: a nested field is not an object, or a list field is
///   not an array
/// - `MissingIdentity` / `InvalidIdentity`: a list entity has no usable key
/// - `DuplicateEntityKey`: two entities in one list share a key, under
///   [`DuplicateKeyPolicy::Reject`]
pub fn capture(
    blueprint: &Blueprint,
    object: &Value,
    duplicates: DuplicateKeyPolicy,
) -> Result<FieldSnapshot> {
    let obj = as_object(object, path::ROOT)?;
    capture_fields(blueprint, Some(obj), path::ROOT, duplicates)
}

fn capture_fields(
    blueprint: &Blueprint,
    object: Option<&Map<String, Value>>,
    at: &str,
    duplicates: DuplicateKeyPolicy,
) -> Result<FieldSnapshot> {
    let mut snapshot = FieldSnapshot::new();
    for (name, node) in blueprint.fields() {
        if !node.is_tracked() {
            continue;
        }
        let value = field_value(object, name);
        let captured = capture_node(node, value, &path::child(at, name), duplicates)?;
        snapshot.push(name, captured);
    }
    Ok(snapshot)
}

fn capture_node(
    node: &BlueprintNode,
    value: &Value,
    at: &str,
    duplicates: DuplicateKeyPolicy,
) -> Result<Snapshot> {
    match node {
        // Owned copies: a predicate later compares against live state.
        BlueprintNode::Leaf(_) | BlueprintNode::Overridden(_) => Ok(Snapshot::Value(value.clone())),
        BlueprintNode::Nested(inner) => {
            let obj = nested_object(value, at)?;
            Ok(Snapshot::Fields(capture_fields(inner, obj, at, duplicates)?))
        }
        BlueprintNode::ListTracking { key_name, tracking } => {
            let mut table = EntityTable::new(key_name.as_str());
            for (key, entity, entity_path) in keyed_entities(value, key_name, at, duplicates)? {
                let fields = capture_fields(tracking, Some(entity), &entity_path, duplicates)?;
                table.upsert(key, fields);
            }
            Ok(Snapshot::Entities(table))
        }
    }
}

/// Value of `name` in `object`, `null` when either is absent
pub(crate) fn field_value<'a>(object: Option<&'a Map<String, Value>>, name: &str) -> &'a Value {
    object.and_then(|obj| obj.get(name)).unwrap_or(&NULL)
}

pub(crate) fn as_object<'a>(value: &'a Value, at: &str) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| TrackError::NotAnObject {
        path: at.to_string(),
    })
}

/// Object behind a nested field; `None` for `null`
pub(crate) fn nested_object<'a>(
    value: &'a Value,
    at: &str,
) -> Result<Option<&'a Map<String, Value>>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(obj) => Ok(Some(obj)),
        other => Err(TrackError::TypeMismatch {
            path: at.to_string(),
            expected: "object".to_string(),
            found: type_name(other).to_string(),
        }),
    }
}

/// Read the identity of `entity` from its `key_name` field
///
/// # Errors
///
/// `MissingIdentity` when the field is absent or `null`, `InvalidIdentity`
/// when it holds a float, array or object.
pub(crate) fn entity_key(
    entity: &Map<String, Value>,
    key_name: &str,
    at: &str,
) -> Result<EntityKey> {
    match entity.get(key_name) {
        None | Some(Value::Null) => Err(TrackError::MissingIdentity {
            path: at.to_string(),
            key_name: key_name.to_string(),
        }),
        Some(value) => EntityKey::from_value(value).ok_or_else(|| TrackError::InvalidIdentity {
            path: at.to_string(),
            key_name: key_name.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Entities of a list field with their keys, in list order
///
/// A `null` list yields no entities. Duplicate keys either fail or collapse
/// onto the first position with the later entity, per `duplicates`.
pub(crate) fn keyed_entities<'a>(
    value: &'a Value,
    key_name: &str,
    at: &str,
    duplicates: DuplicateKeyPolicy,
) -> Result<Vec<KeyedEntity<'a>>> {
    let items: &[Value] = match value {
        Value::Null => &[],
        Value::Array(items) => items,
        other => {
            return Err(TrackError::TypeMismatch {
                path: at.to_string(),
                expected: "array".to_string(),
                found: type_name(other).to_string(),
            })
        }
    };

    let mut keyed: Vec<KeyedEntity<'a>> = Vec::with_capacity(items.len());
    let mut positions: HashMap<EntityKey, usize> = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let index_path = path::index(at, i);
        let entity = as_object(item, &index_path)?;
        let key = entity_key(entity, key_name, &index_path)?;
        let entity_path = path::entity(at, &key);

        match positions.get(&key).copied() {
            None => {
                positions.insert(key.clone(), keyed.len());
                keyed.push((key, entity, entity_path));
            }
            Some(pos) => match duplicates {
                DuplicateKeyPolicy::Reject => {
                    return Err(TrackError::DuplicateEntityKey {
                        path: at.to_string(),
                        key: key.to_string(),
                    })
                }
                DuplicateKeyPolicy::KeepLast => keyed[pos] = (key, entity, entity_path),
            },
        }
    }
    Ok(keyed)
}
