use std::collections::HashSet;

use super::model::{Blueprint, BlueprintNode};
use crate::errors::{Result, TrackError};
use crate::path;

impl Blueprint {
    /// Validate the blueprint's structure
    ///
    /// Checks, at every level:
    ///
    /// 1. Field names are non-empty
    /// 2. Field names are unique within their blueprint
    /// 3. Identity key names (blueprint, list and field overrides) are non-empty
    ///
    /// # Errors
    ///
    /// Returns the first `InvalidBlueprint` found, naming the offending path.
    pub fn validate(&self) -> Result<()> {
        validate_level(self, path::ROOT)
    }
}

fn invalid(path: &str, reason: impl Into<String>) -> TrackError {
    TrackError::InvalidBlueprint {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn validate_level(blueprint: &Blueprint, at: &str) -> Result<()> {
    if blueprint.key_name_override() == Some("") {
        return Err(invalid(at, "identity key name cannot be empty"));
    }

    let mut seen = HashSet::new();
    for (name, node) in blueprint.fields() {
        if name.is_empty() {
            return Err(invalid(at, "field name cannot be empty"));
        }
        let field_path = path::child(at, name);
        if !seen.insert(name) {
            return Err(invalid(&field_path, format!("duplicate field `{}`", name)));
        }

        match node {
            BlueprintNode::Leaf(_) => {}
            BlueprintNode::Nested(inner) => validate_level(inner, &field_path)?,
            BlueprintNode::ListTracking { key_name, tracking } => {
                if key_name.is_empty() {
                    return Err(invalid(&field_path, "list key name cannot be empty"));
                }
                validate_level(tracking, &field_path)?;
            }
            BlueprintNode::Overridden(overrides) => {
                if overrides.key_name.as_deref() == Some("") {
                    return Err(invalid(&field_path, "override key name cannot be empty"));
                }
            }
        }
    }
    Ok(())
}
