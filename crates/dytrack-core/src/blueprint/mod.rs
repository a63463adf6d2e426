//! Declarative description of which fields of an object are tracked.
//!
//! A [`Blueprint`] is pure configuration. It is built either through the
//! builder methods on [`Blueprint`] or parsed once from the object-literal
//! JSON shape via [`Blueprint::from_value`], which resolves every node into
//! the tagged [`BlueprintNode`] variant up front.
//!
//! ```
//! use dytrack_core::blueprint::Blueprint;
//!
//! let blueprint = Blueprint::new()
//!     .leaf("name")
//!     .leaf("email")
//!     .nested("permission", Blueprint::new().leaf("id"))
//!     .list("posts", "id", Blueprint::new().leaf("title"));
//!
//! assert!(blueprint.validate().is_ok());
//! ```

pub mod model;
pub mod parse;
pub mod validation;

pub use model::{Blueprint, BlueprintNode, FieldPredicate, Overrides, DEFAULT_KEY_NAME};
