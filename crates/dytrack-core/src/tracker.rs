//! Tracker facade.
//!
//! Orchestrates the walker and the differ against a private snapshot store:
//!
//! - `track` captures an object's tracked fields the first time its
//!   identity is seen
//! - `diff` compares the stored snapshot with the object's current state
//! - `flush` forgets a snapshot so the next `track` starts over
//!
//! Each operation logs `start` and `end` (or `end_error`) events with its
//! duration and the entity id involved.

use std::time::Instant;

use dytrack_core_types::schema::{OP_DIFF, OP_FLUSH, OP_TRACK};
use dytrack_core_types::EntityKey;
use serde_json::Value;

use crate::blueprint::Blueprint;
use crate::config::TrackerConfig;
use crate::diff::{compare, Diff};
use crate::errors::Result;
use crate::path;
use crate::snapshot::capture;
use crate::snapshot::walker::{as_object, entity_key};
use crate::store::{SnapshotStore, StoredSnapshot};
use crate::{log_op_end, log_op_error, log_op_start};

/// Snapshot-and-diff tracker for objects described by one blueprint
///
/// The snapshot store lives exactly as long as the tracker. All operations
/// are synchronous and take `&self`/`&mut self`, so sharing a tracker across
/// threads requires the caller's own synchronization.
///
/// # Example
///
/// ```
/// use dytrack_core::{Blueprint, Tracker};
/// use serde_json::json;
///
/// let mut tracker = Tracker::new(Blueprint::new().leaf("name"))?;
/// let mut user = json!({"id": 1, "name": "Jane Doe"});
///
/// tracker.track(&user)?;
/// user["name"] = json!("Jane Smith");
///
/// assert_eq!(tracker.diff(&user)?.to_value(), json!({"name": "Jane Smith"}));
/// # Ok::<(), dytrack_core::TrackError>(())
/// ```
#[derive(Debug)]
pub struct Tracker {
    blueprint: Blueprint,
    config: TrackerConfig,
    store: SnapshotStore,
}

impl Tracker {
    /// Create a tracker with the default configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidBlueprint` if the blueprint fails validation.
    pub fn new(blueprint: Blueprint) -> Result<Self> {
        Self::with_config(blueprint, TrackerConfig::default())
    }

    /// Create a tracker with an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` or `InvalidBlueprint` when either fails
    /// validation.
    pub fn with_config(blueprint: Blueprint, config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        blueprint.validate()?;
        Ok(Self {
            blueprint,
            config,
            store: SnapshotStore::new(),
        })
    }

    pub fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Identity field of tracked objects
    ///
    /// The blueprint's override wins over the configured default.
    pub fn key_name(&self) -> &str {
        self.blueprint.key_name_or(&self.config.default_key_name)
    }

    /// Read the identity of a top-level object
    ///
    /// # Errors
    ///
    /// `NotAnObject`, `MissingIdentity` or `InvalidIdentity`.
    pub fn identity_of(&self, obj: &Value) -> Result<EntityKey> {
        let object = as_object(obj, path::ROOT)?;
        entity_key(object, self.key_name(), path::ROOT)
    }

    /// Capture `obj`'s tracked fields, unless its identity is already tracked
    ///
    /// A second call for a tracked identity is a no-op: the stored snapshot
    /// keeps the state from the first call.
    ///
    /// # Errors
    ///
    /// Any identity or shape error from the walker; nothing is stored then.
    pub fn track(&mut self, obj: &Value) -> Result<()> {
        log_op_start!(OP_TRACK);
        let start = Instant::now();

        let (id, captured) = self.track_impl(obj).map_err(|e| {
            log_op_error!(
                OP_TRACK,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            OP_TRACK,
            duration_ms = start.elapsed().as_millis() as u64,
            entity_id = %id,
            captured = captured,
            tracked_count = self.store.len() as u64
        );
        Ok(())
    }

    fn track_impl(&mut self, obj: &Value) -> Result<(EntityKey, bool)> {
        let id = self.identity_of(obj)?;
        if self.store.contains(&id) {
            tracing::debug!(entity_id = %id, "identity already tracked, keeping first snapshot");
            return Ok((id, false));
        }

        let fields = capture(&self.blueprint, obj, self.config.duplicate_keys)?;
        let key_name = self.key_name().to_string();
        self.store.insert_if_absent(StoredSnapshot {
            id: id.clone(),
            key_name,
            fields,
        });
        Ok((id, true))
    }

    /// Compute what changed in `obj` since it was tracked
    ///
    /// Returns an empty diff when `obj`'s identity is not tracked.
    ///
    /// # Errors
    ///
    /// Identity errors for `obj` itself, and any shape error the differ
    /// finds in its current state.
    pub fn diff(&self, obj: &Value) -> Result<Diff> {
        log_op_start!(OP_DIFF);
        let start = Instant::now();

        let (id, diff) = self.diff_impl(obj).map_err(|e| {
            log_op_error!(
                OP_DIFF,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            OP_DIFF,
            duration_ms = start.elapsed().as_millis() as u64,
            entity_id = %id,
            changed_count = diff.len() as u64
        );
        Ok(diff)
    }

    fn diff_impl(&self, obj: &Value) -> Result<(EntityKey, Diff)> {
        let id = self.identity_of(obj)?;
        let Some(stored) = self.store.get(&id) else {
            tracing::debug!(entity_id = %id, "identity not tracked, returning empty diff");
            return Ok((id, Diff::new()));
        };

        let diff = compare(&self.blueprint, &stored.fields, obj, self.config.duplicate_keys)?;
        Ok((id, diff))
    }

    /// Forget the snapshot for `id`; unknown identities are ignored
    pub fn flush(&mut self, id: impl Into<EntityKey>) {
        log_op_start!(OP_FLUSH);
        let start = Instant::now();

        let id = id.into();
        let removed = self.store.remove(&id).is_some();

        log_op_end!(
            OP_FLUSH,
            duration_ms = start.elapsed().as_millis() as u64,
            entity_id = %id,
            removed = removed,
            tracked_count = self.store.len() as u64
        );
    }

    /// Forget every snapshot
    pub fn flush_all(&mut self) {
        let dropped = self.store.len();
        self.store.clear();
        tracing::debug!(dropped = dropped as u64, "flushed all snapshots");
    }

    pub fn is_tracked(&self, id: impl Into<EntityKey>) -> bool {
        self.store.contains(&id.into())
    }

    /// The stored snapshot for `id`, if tracked
    pub fn snapshot(&self, id: impl Into<EntityKey>) -> Option<&StoredSnapshot> {
        self.store.get(&id.into())
    }

    pub fn tracked_count(&self) -> usize {
        self.store.len()
    }
}
