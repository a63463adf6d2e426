//! Diff output types.
//!
//! `DiffNode` serializes untagged, so a serialized [`Diff`] has the plain
//! shape `{"name": "new", "permission": {"id": 2}, "posts": {"added": [..],
//! "removed": [..], "updated": [..]}}`.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Top-level diff of a tracked object
pub type Diff = FieldDiff;

/// Change recorded for one blueprint field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DiffNode {
    /// Leaf or overridden field: its new value
    Changed(Value),
    /// Nested field: only the changed sub-fields
    Nested(FieldDiff),
    /// List-tracked field: the three buckets
    List(ListDiff),
}

impl DiffNode {
    pub fn as_changed(&self) -> Option<&Value> {
        match self {
            DiffNode::Changed(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&FieldDiff> {
        match self {
            DiffNode::Nested(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListDiff> {
        match self {
            DiffNode::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            DiffNode::Changed(v) => v.clone(),
            DiffNode::Nested(d) => d.to_value(),
            DiffNode::List(l) => l.to_value(),
        }
    }
}

/// Changed fields in blueprint order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldDiff {
    entries: Vec<(String, DiffNode)>,
}

impl FieldDiff {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: impl Into<String>, node: DiffNode) {
        self.entries.push((name.into(), node));
    }

    pub fn get(&self, name: &str) -> Option<&DiffNode> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, node)| node)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DiffNode)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any entry records a change
    ///
    /// List fields are always present in a diff; one whose buckets are all
    /// empty is not a change.
    pub fn has_changes(&self) -> bool {
        self.entries.iter().any(|(_, node)| match node {
            DiffNode::List(list) => !list.is_empty(),
            DiffNode::Changed(_) | DiffNode::Nested(_) => true,
        })
    }

    pub fn to_map(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(name, node)| (name.clone(), node.to_value()))
            .collect()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }
}

impl Serialize for FieldDiff {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, node) in &self.entries {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

/// Bucketed changes of a list-tracked field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListDiff {
    /// Current entities whose key was not captured, in full
    pub added: Vec<Value>,
    /// Captured entities missing from the current list, as `{key, ...storedFields}`
    pub removed: Vec<Value>,
    /// Entities with changed tracked fields, as `{key, ...changedFields}`
    pub updated: Vec<Value>,
}

impl ListDiff {
    /// True when all three buckets are empty
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }

    pub fn to_value(&self) -> Value {
        json!({
            "added": self.added,
            "removed": self.removed,
            "updated": self.updated,
        })
    }
}
