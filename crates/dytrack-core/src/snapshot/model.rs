//! Snapshot types.
//!
//! Snapshots keep blueprint field order, and entity tables keep the order in
//! which entities were captured, so anything rendered from them is
//! deterministic.

use std::collections::HashMap;

use dytrack_core_types::EntityKey;
use serde_json::{Map, Value};

/// Captured state of one blueprint node
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// Leaf or overridden field: the captured value
    Value(Value),
    /// Nested field: its captured sub-fields
    Fields(FieldSnapshot),
    /// List-tracked field: captured fields per entity
    Entities(EntityTable),
}

impl Snapshot {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Snapshot::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_fields(&self) -> Option<&FieldSnapshot> {
        match self {
            Snapshot::Fields(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_entities(&self) -> Option<&EntityTable> {
        match self {
            Snapshot::Entities(t) => Some(t),
            _ => None,
        }
    }

    /// Render the captured state as plain data
    ///
    /// Entity tables render as arrays of `{key: id, ...fields}` records.
    pub fn to_value(&self) -> Value {
        match self {
            Snapshot::Value(v) => v.clone(),
            Snapshot::Fields(f) => f.to_value(),
            Snapshot::Entities(t) => t.to_value(),
        }
    }
}

/// Captured sub-fields, in blueprint order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldSnapshot {
    fields: Vec<(String, Snapshot)>,
}

impl FieldSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: impl Into<String>, snapshot: Snapshot) {
        self.fields.push((name.into(), snapshot));
    }

    pub fn get(&self, name: &str) -> Option<&Snapshot> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, snapshot)| snapshot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Snapshot)> {
        self.fields.iter().map(|(name, s)| (name.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_map(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(name, s)| (name.clone(), s.to_value()))
            .collect()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }
}

/// Captured entities of one list, keyed by identity, in capture order
#[derive(Debug, Clone, PartialEq)]
pub struct EntityTable {
    key_name: String,
    entries: Vec<(EntityKey, FieldSnapshot)>,
    index: HashMap<EntityKey, usize>,
}

impl EntityTable {
    pub fn new(key_name: impl Into<String>) -> Self {
        Self {
            key_name: key_name.into(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Identity field of the entities in this table
    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    /// Insert an entity, or replace the fields of an existing one in place
    ///
    /// Returns `true` if the key was new.
    pub(crate) fn upsert(&mut self, key: EntityKey, fields: FieldSnapshot) -> bool {
        match self.index.get(&key) {
            Some(&pos) => {
                self.entries[pos].1 = fields;
                false
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, fields));
                true
            }
        }
    }

    pub fn get(&self, key: &EntityKey) -> Option<&FieldSnapshot> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains(&self, key: &EntityKey) -> bool {
        self.index.contains_key(key)
    }

    /// Entities in capture order
    pub fn iter(&self) -> impl Iterator<Item = (&EntityKey, &FieldSnapshot)> {
        self.entries.iter().map(|(key, fields)| (key, fields))
    }

    pub fn keys(&self) -> impl Iterator<Item = &EntityKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Array(
            self.entries
                .iter()
                .map(|(key, fields)| entity_record(&self.key_name, key, fields.to_map()))
                .collect(),
        )
    }
}

/// `{key_name: key, ...fields}` as a JSON object
pub(crate) fn entity_record(key_name: &str, key: &EntityKey, fields: Map<String, Value>) -> Value {
    let mut record = Map::new();
    record.insert(key_name.to_string(), key.to_value());
    record.extend(fields);
    Value::Object(record)
}
