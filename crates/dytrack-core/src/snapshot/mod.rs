//! Capture of tracked fields.
//!
//! The walker ([`capture`]) reads an object through a blueprint and returns a
//! [`FieldSnapshot`] mirroring the blueprint's shape. Captured values are
//! owned copies, independent of any later mutation of the source object.
//!
//! ## Non-Responsibilities
//!
//! - Storage of snapshots (handled by `store`)
//! - Comparison against current state (handled by `diff`)

pub mod model;
pub mod walker;

pub use model::{EntityTable, FieldSnapshot, Snapshot};
pub use walker::capture;
