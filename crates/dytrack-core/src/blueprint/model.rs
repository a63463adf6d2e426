use std::sync::Arc;

use serde_json::Value;

/// Identity field used when neither the blueprint nor the config names one
pub const DEFAULT_KEY_NAME: &str = "id";

/// Custom equality test for a field
///
/// Called as `predicate(stored, current)`; returning `true` means the two
/// values are considered equal and no change is reported.
#[derive(Clone)]
pub struct FieldPredicate(Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>);

impl FieldPredicate {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    /// Whether `stored` and `current` are equal under this predicate
    pub fn is_equal(&self, stored: &Value, current: &Value) -> bool {
        (self.0)(stored, current)
    }
}

impl std::fmt::Debug for FieldPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FieldPredicate(..)")
    }
}

/// Identity and equality overrides
///
/// On a [`Blueprint`], `key_name` replaces the default identity field of the
/// objects it describes. As a field node ([`BlueprintNode::Overridden`]),
/// `predicate` replaces strict equality for that field.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub key_name: Option<String>,
    pub predicate: Option<FieldPredicate>,
}

impl Overrides {
    pub fn with_key_name(key_name: impl Into<String>) -> Self {
        Self {
            key_name: Some(key_name.into()),
            predicate: None,
        }
    }

    pub fn with_predicate(predicate: FieldPredicate) -> Self {
        Self {
            key_name: None,
            predicate: Some(predicate),
        }
    }
}

/// How a single field is tracked
#[derive(Debug, Clone)]
pub enum BlueprintNode {
    /// Primitive-valued field; `false` leaves the field untracked
    Leaf(bool),
    /// Object-valued field whose sub-fields are tracked individually
    Nested(Blueprint),
    /// Array of entities identified by `key_name`, each tracked per `tracking`
    ListTracking {
        key_name: String,
        tracking: Blueprint,
    },
    /// Field compared through an optional custom predicate
    Overridden(Overrides),
}

impl BlueprintNode {
    /// Whether this node contributes anything to a snapshot
    pub fn is_tracked(&self) -> bool {
        !matches!(self, BlueprintNode::Leaf(false))
    }
}

/// Ordered set of tracked fields plus blueprint-level overrides
#[derive(Debug, Clone, Default)]
pub struct Blueprint {
    pub(crate) fields: Vec<(String, BlueprintNode)>,
    pub(crate) overrides: Overrides,
}

impl Blueprint {
    /// Create an empty blueprint
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field with an explicit node
    pub fn field(mut self, name: impl Into<String>, node: BlueprintNode) -> Self {
        self.fields.push((name.into(), node));
        self
    }

    /// Track a primitive field by strict equality
    pub fn leaf(self, name: impl Into<String>) -> Self {
        self.field(name, BlueprintNode::Leaf(true))
    }

    /// Declare a field without tracking it
    pub fn untracked(self, name: impl Into<String>) -> Self {
        self.field(name, BlueprintNode::Leaf(false))
    }

    /// Track selected sub-fields of an object-valued field
    pub fn nested(self, name: impl Into<String>, blueprint: Blueprint) -> Self {
        self.field(name, BlueprintNode::Nested(blueprint))
    }

    /// Track an array of entities keyed by `key_name`
    pub fn list(
        self,
        name: impl Into<String>,
        key_name: impl Into<String>,
        tracking: Blueprint,
    ) -> Self {
        self.field(
            name,
            BlueprintNode::ListTracking {
                key_name: key_name.into(),
                tracking,
            },
        )
    }

    /// Track a field through a custom equality predicate
    ///
    /// The field's value is deep-copied at capture time.
    pub fn with_predicate<F>(self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.field(
            name,
            BlueprintNode::Overridden(Overrides::with_predicate(FieldPredicate::new(predicate))),
        )
    }

    /// Add a field carrying explicit overrides
    pub fn overridden(self, name: impl Into<String>, overrides: Overrides) -> Self {
        self.field(name, BlueprintNode::Overridden(overrides))
    }

    /// Override the identity field of the objects this blueprint describes
    pub fn key_name(mut self, key_name: impl Into<String>) -> Self {
        self.overrides.key_name = Some(key_name.into());
        self
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &BlueprintNode)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Look up a field's node by name
    pub fn get(&self, name: &str) -> Option<&BlueprintNode> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, node)| node)
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    /// The overriding identity field, if any
    pub fn key_name_override(&self) -> Option<&str> {
        self.overrides.key_name.as_deref()
    }

    /// The identity field, falling back to `default`
    pub fn key_name_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.key_name_override().unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_preserves_declaration_order() {
        let bp = Blueprint::new().leaf("b").leaf("a").untracked("c");
        let names: Vec<&str> = bp.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert!(!bp.get("c").unwrap().is_tracked());
    }

    #[test]
    fn test_key_name_override() {
        let bp = Blueprint::new().key_name("uuid");
        assert_eq!(bp.key_name_or(DEFAULT_KEY_NAME), "uuid");
        assert_eq!(Blueprint::new().key_name_or(DEFAULT_KEY_NAME), "id");
    }

    #[test]
    fn test_predicate_is_called_with_stored_then_current() {
        let bp = Blueprint::new().with_predicate("n", |stored, current| {
            stored.as_i64().unwrap_or(0) <= current.as_i64().unwrap_or(0)
        });
        let Some(BlueprintNode::Overridden(o)) = bp.get("n") else {
            panic!("expected overridden node");
        };
        let predicate = o.predicate.as_ref().unwrap();
        assert!(predicate.is_equal(&json!(1), &json!(2)));
        assert!(!predicate.is_equal(&json!(2), &json!(1)));
    }
}
