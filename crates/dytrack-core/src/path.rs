//! Dotted field paths used in error messages and log fields.

use dytrack_core_types::EntityKey;

/// Path of the tracked object itself
pub(crate) const ROOT: &str = "$";

/// Path of a named field below `parent`
pub(crate) fn child(parent: &str, name: &str) -> String {
    if parent == ROOT {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

/// Path of one entity inside the list at `parent`
pub(crate) fn entity(parent: &str, key: &EntityKey) -> String {
    format!("{}[{}]", parent, key)
}

/// Path of the entity at position `index` when its key is not yet known
pub(crate) fn index(parent: &str, index: usize) -> String {
    format!("{}[#{}]", parent, index)
}
