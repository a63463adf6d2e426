//! Parsing of the object-literal blueprint shape.
//!
//! The accepted JSON shape:
//!
//! - `true` / `false` → [`BlueprintNode::Leaf`]
//! - `{"__list__": {...}}` → [`BlueprintNode::ListTracking`], with the entity
//!   key taken from the inner `__meta__.keyname` (default `"id"`)
//! - an object containing `__meta__` → [`BlueprintNode::Overridden`]
//! - any other object → [`BlueprintNode::Nested`]
//!
//! Only the reserved `__`-prefixed keys carry structure, so any user field
//! name (`tracking`, `keyname`, ...) nests as written. A `__meta__` entry
//! directly inside a blueprint sets that blueprint's identity key name. Predicates have no JSON form; attach them with the
//! builder methods afterwards.

use serde_json::Value;

use super::model::{Blueprint, BlueprintNode, Overrides, DEFAULT_KEY_NAME};
use crate::errors::{type_name, Result, TrackError};
use crate::path;

pub const META_KEY: &str = "__meta__";
pub const LIST_KEY: &str = "__list__";
const KEYNAME_KEY: &str = "keyname";

impl Blueprint {
    /// Parse a blueprint from its object-literal JSON shape
    ///
    /// # Errors
    ///
    /// Returns `InvalidBlueprint` when a node is neither a boolean nor an
    /// object, or when a `keyname` is not a string.
    pub fn from_value(value: &Value) -> Result<Blueprint> {
        parse_blueprint(value, path::ROOT)
    }

    /// Parse a blueprint from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `Serialization` for malformed JSON, otherwise as
    /// [`Blueprint::from_value`].
    pub fn from_json_str(s: &str) -> Result<Blueprint> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_value(&value)
    }
}

fn invalid(path: &str, reason: impl Into<String>) -> TrackError {
    TrackError::InvalidBlueprint {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn parse_blueprint(value: &Value, at: &str) -> Result<Blueprint> {
    let obj = value.as_object().ok_or_else(|| {
        invalid(
            at,
            format!("blueprint must be an object, found {}", type_name(value)),
        )
    })?;

    let mut blueprint = Blueprint::new();
    for (name, node) in obj {
        if name == META_KEY {
            blueprint.overrides.key_name = parse_meta_keyname(node, &path::child(at, name))?;
            continue;
        }
        let field_path = path::child(at, name);
        blueprint
            .fields
            .push((name.clone(), parse_node(node, &field_path)?));
    }
    Ok(blueprint)
}

fn parse_node(value: &Value, at: &str) -> Result<BlueprintNode> {
    match value {
        Value::Bool(tracked) => Ok(BlueprintNode::Leaf(*tracked)),
        Value::Object(obj) => {
            if let Some(meta) = obj.get(META_KEY) {
                let key_name = parse_meta_keyname(meta, &path::child(at, META_KEY))?;
                return Ok(BlueprintNode::Overridden(Overrides {
                    key_name,
                    predicate: None,
                }));
            }
            if let Some(inner) = obj.get(LIST_KEY) {
                let tracking = parse_blueprint(inner, &path::child(at, LIST_KEY))?;
                let key_name = tracking
                    .key_name_override()
                    .unwrap_or(DEFAULT_KEY_NAME)
                    .to_string();
                return Ok(BlueprintNode::ListTracking { key_name, tracking });
            }
            Ok(BlueprintNode::Nested(parse_blueprint(value, at)?))
        }
        other => Err(invalid(
            at,
            format!("expected boolean or object, found {}", type_name(other)),
        )),
    }
}

fn parse_meta_keyname(meta: &Value, at: &str) -> Result<Option<String>> {
    let obj = meta.as_object().ok_or_else(|| {
        invalid(
            at,
            format!("__meta__ must be an object, found {}", type_name(meta)),
        )
    })?;
    match obj.get(KEYNAME_KEY) {
        None => Ok(None),
        Some(Value::String(k)) => Ok(Some(k.clone())),
        Some(other) => Err(invalid(
            &path::child(at, KEYNAME_KEY),
            format!("keyname must be a string, found {}", type_name(other)),
        )),
    }
}
