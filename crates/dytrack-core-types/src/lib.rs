//! Core types shared across dytrack facilities
//!
//! This crate provides foundational types used by the tracking engine,
//! its error handling, and its logging facility:
//!
//! - **Identity types**: EntityKey, the hashable identity of a tracked entity
//! - **Schema constants**: Canonical field keys and event names

pub mod identity;
pub mod schema;

pub use identity::EntityKey;
