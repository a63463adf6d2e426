//! dytrack Core - schema-driven snapshot and diff engine
//!
//! This crate captures a point-in-time snapshot of selected fields of a
//! plain data object and later reports what changed, including:
//! - Blueprints: declarative, nested descriptions of tracked fields
//! - The walker that captures snapshots in the blueprint's shape
//! - The differ that produces partial, structured diffs with list buckets
//! - A per-tracker snapshot store and the `track` / `diff` / `flush` facade
//! - Structured errors and logging shared by every operation

pub mod blueprint;
pub mod config;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod snapshot;
pub mod store;
pub mod tracker;

mod path;

pub use dytrack_core_types as core_types;

// Re-export commonly used types
pub use blueprint::{Blueprint, BlueprintNode, FieldPredicate, Overrides};
pub use config::{DuplicateKeyPolicy, TrackerConfig};
pub use diff::{Diff, DiffNode, FieldDiff, ListDiff};
pub use dytrack_core_types::EntityKey;
pub use errors::{ExError, ExErrorKind, Result, TrackError};
pub use snapshot::{FieldSnapshot, Snapshot};
pub use store::{SnapshotStore, StoredSnapshot};
pub use tracker::Tracker;
