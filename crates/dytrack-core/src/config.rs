//! Tracker configuration.
//!
//! Embedding applications usually build a [`TrackerConfig`] in code, but it
//! is serde-deserializable so it can live in an application's own config
//! file. Every field has a default.

use serde::{Deserialize, Serialize};

use crate::blueprint::DEFAULT_KEY_NAME;
use crate::errors::{Result, TrackError};

/// What to do when two entities in one tracked list share a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// Fail with `DuplicateEntityKey`
    #[default]
    Reject,
    /// The later entity replaces the earlier one, keeping the earlier position
    KeepLast,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Identity field of top-level objects when the blueprint names none
    pub default_key_name: String,
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_key_name: DEFAULT_KEY_NAME.to_string(),
            duplicate_keys: DuplicateKeyPolicy::Reject,
        }
    }
}

impl TrackerConfig {
    /// Parse a config from JSON, filling omitted fields with defaults
    ///
    /// # Errors
    ///
    /// Returns `Serialization` for malformed JSON or unknown fields, and
    /// `InvalidConfig` if the result fails [`TrackerConfig::validate`].
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: TrackerConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_default_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.default_key_name = key_name.into();
        self
    }

    pub fn with_duplicate_keys(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_keys = policy;
        self
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` when `default_key_name` is empty.
    pub fn validate(&self) -> Result<()> {
        if self.default_key_name.is_empty() {
            return Err(TrackError::InvalidConfig {
                reason: "default_key_name cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.default_key_name, "id");
        assert_eq!(config.duplicate_keys, DuplicateKeyPolicy::Reject);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = TrackerConfig::from_json_str(r#"{"duplicate_keys": "keep_last"}"#).unwrap();
        assert_eq!(config.default_key_name, "id");
        assert_eq!(config.duplicate_keys, DuplicateKeyPolicy::KeepLast);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = TrackerConfig::from_json_str(r#"{"keyname": "uuid"}"#).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }

    #[test]
    fn test_empty_key_name_rejected() {
        let err = TrackerConfig::from_json_str(r#"{"default_key_name": ""}"#).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
    }
}
