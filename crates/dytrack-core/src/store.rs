use std::collections::HashMap;

use dytrack_core_types::EntityKey;
use serde_json::Value;

use crate::snapshot::model::entity_record;
use crate::snapshot::FieldSnapshot;

/// Snapshot of one tracked object, as held by the store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSnapshot {
    pub id: EntityKey,
    pub key_name: String,
    pub fields: FieldSnapshot,
}

impl StoredSnapshot {
    /// Render as `{key_name: id, ...capturedFields}`
    pub fn to_value(&self) -> Value {
        entity_record(&self.key_name, &self.id, self.fields.to_map())
    }
}

/// In-memory snapshot store, one entry per top-level identity
///
/// Owned by a single `Tracker`; not thread-safe (no Arc/RwLock), callers
/// sharing a tracker serialize access themselves.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshots: HashMap<EntityKey, StoredSnapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            snapshots: HashMap::new(),
        }
    }

    /// Store `snapshot` unless its identity is already present
    ///
    /// Returns `true` if stored. An existing entry is never overwritten.
    pub fn insert_if_absent(&mut self, snapshot: StoredSnapshot) -> bool {
        if self.snapshots.contains_key(&snapshot.id) {
            return false;
        }
        self.snapshots.insert(snapshot.id.clone(), snapshot);
        true
    }

    pub fn get(&self, id: &EntityKey) -> Option<&StoredSnapshot> {
        self.snapshots.get(id)
    }

    pub fn contains(&self, id: &EntityKey) -> bool {
        self.snapshots.contains_key(id)
    }

    /// Remove and return the entry for `id`, if any
    pub fn remove(&mut self, id: &EntityKey) -> Option<StoredSnapshot> {
        self.snapshots.remove(id)
    }

    /// Identities currently held, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = &EntityKey> {
        self.snapshots.keys()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
