//! Snapshot diff engine.
//!
//! Compares a stored snapshot against an object's current state and produces
//! a structured diff holding only what changed.
//!
//! ## Entry point
//!
//! ```
//! use dytrack_core::blueprint::Blueprint;
//! use dytrack_core::config::DuplicateKeyPolicy;
//! use dytrack_core::diff::compare;
//! use dytrack_core::snapshot::capture;
//! use serde_json::json;
//!
//! let blueprint = Blueprint::new().leaf("name");
//! let before = capture(&blueprint, &json!({"name": "a"}), DuplicateKeyPolicy::Reject)?;
//! let diff = compare(&blueprint, &before, &json!({"name": "b"}), DuplicateKeyPolicy::Reject)?;
//! assert_eq!(diff.to_value(), json!({"name": "b"}));
//! # Ok::<(), dytrack_core::errors::TrackError>(())
//! ```
//!
//! ## Guarantees
//!
//! - **Partiality**: leaf and nested fields appear only when something
//!   below them changed.
//! - **List buckets**: list-tracked fields always appear, with `added`,
//!   `removed` and `updated` buckets.
//! - **Determinism**: field order follows the blueprint, `added`/`updated`
//!   follow the current list, `removed` follows capture order.

pub mod differ;
pub mod model;

pub use differ::compare;
pub use model::{Diff, DiffNode, FieldDiff, ListDiff};
