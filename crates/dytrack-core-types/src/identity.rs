//! Identity of a tracked entity
//!
//! Every top-level object handed to the tracker, and every entity inside a
//! list-tracked field, is correlated across calls by the value stored under
//! its key field. [`EntityKey`] is the hashable form of that value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Hashable identity value read from an entity's key field
///
/// Only scalar, exactly comparable values qualify: integers, strings and
/// booleans. Integers that fit in `i64` are always stored as `Int`, so the
/// same number read as signed or unsigned yields one identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityKey {
    Int(i64),
    UInt(u64),
    Str(String),
    Bool(bool),
}

impl EntityKey {
    /// Build an identity from a JSON value
    ///
    /// Returns `None` for `null`, floating point numbers, arrays and objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Int(i))
                } else {
                    n.as_u64().map(Self::UInt)
                }
            }
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Render the identity back into a JSON value
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(i) => Value::from(*i),
            Self::UInt(u) => Value::from(*u),
            Self::Str(s) => Value::String(s.clone()),
            Self::Bool(b) => Value::Bool(*b),
        }
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::UInt(u) => write!(f, "{}", u),
            Self::Str(s) => write!(f, "{}", s),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for EntityKey {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for EntityKey {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u64> for EntityKey {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Self::Int(i),
            Err(_) => Self::UInt(value),
        }
    }
}

impl From<&str> for EntityKey {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for EntityKey {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for EntityKey {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
