//! Transform registry for referencing transforms by name.
//!
//! Configuration files name their transforms as strings; the registry maps
//! those names to transform functions. Hosts register domain-specific
//! transforms on top of the builtin set.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::document::{Document, Tag};
use crate::transform::{transform, Transform};

/// Registry for storing and resolving named transformation functions.
pub struct TransformRegistry {
    transforms: HashMap<String, Transform>,
}

impl TransformRegistry {
    /// Create a new empty transform registry.
    pub fn new() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    /// Create a registry preloaded with the builtin transforms:
    /// `trim_whitespace`, `extract_type` and `to_boolean`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register("trim_whitespace", transform(trim_whitespace));
        registry.register("extract_type", transform(extract_type));
        registry.register("to_boolean", transform(to_boolean));

        registry
    }

    /// Register a transformation function under a name.
    ///
    /// # Example
    /// ```
    /// use tagbind::{transform, TransformRegistry};
    /// use serde_json::json;
    ///
    /// let mut registry = TransformRegistry::new();
    /// registry.register("uppercase", transform(|_doc, _tag, value| {
    ///     match value.as_str() {
    ///         Some(s) => json!(s.to_uppercase()),
    ///         None => value,
    ///     }
    /// }));
    /// ```
    pub fn register(&mut self, name: impl Into<String>, func: Transform) {
        self.transforms.insert(name.into(), func);
    }

    /// Resolve a transform by name.
    pub fn get(&self, name: &str) -> Option<&Transform> {
        self.transforms.get(name)
    }

    /// Check if a transform is registered.
    pub fn has_transform(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Get list of all registered transform names.
    pub fn list_transforms(&self) -> Vec<String> {
        self.transforms.keys().cloned().collect()
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Trim leading and trailing whitespace from string values; other value
/// kinds pass through unchanged.
fn trim_whitespace(_doc: &Document, _tag: &Tag, value: JsonValue) -> JsonValue {
    match value.as_str() {
        Some(s) => JsonValue::String(s.trim().to_string()),
        None => value,
    }
}

/// Replace the value with the tag's type expression when one is present.
fn extract_type(_doc: &Document, tag: &Tag, value: JsonValue) -> JsonValue {
    match &tag.type_expression {
        Some(expr) => JsonValue::String(expr.clone()),
        None => value,
    }
}

/// Interpret the value as a boolean flag.
///
/// Flag-style tags (e.g. `@deprecated`) carry no description: an absent or
/// empty string value becomes `true`. "true"/"false" parse to their boolean;
/// anything else passes through unchanged.
fn to_boolean(_doc: &Document, _tag: &Tag, value: JsonValue) -> JsonValue {
    if value.is_null() {
        return JsonValue::Bool(true);
    }
    if let Some(s) = value.as_str() {
        match s.trim() {
            "" | "true" => return JsonValue::Bool(true),
            "false" => return JsonValue::Bool(false),
            _ => {}
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> (Document, Tag) {
        (Document::new("test.js", 1), Tag::new("param", "raw"))
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = TransformRegistry::new();
        registry.register("noop", transform(|_d, _t, v| v));

        assert!(registry.has_transform("noop"));
        assert!(registry.get("noop").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = TransformRegistry::with_builtins();

        assert!(registry.has_transform("trim_whitespace"));
        assert!(registry.has_transform("extract_type"));
        assert!(registry.has_transform("to_boolean"));
        assert_eq!(registry.list_transforms().len(), 3);
    }

    #[test]
    fn test_trim_whitespace() {
        let (doc, tag) = fixture();
        let registry = TransformRegistry::with_builtins();
        let trim = registry.get("trim_whitespace").unwrap();

        assert_eq!(trim(&doc, &tag, json!("  padded  ")), json!("padded"));
        assert_eq!(trim(&doc, &tag, json!(42)), json!(42));
    }

    #[test]
    fn test_extract_type_prefers_type_expression() {
        let (doc, _) = fixture();
        let tag = Tag::new("param", "the needle").with_type_expression("string");
        let registry = TransformRegistry::with_builtins();
        let extract = registry.get("extract_type").unwrap();

        assert_eq!(extract(&doc, &tag, json!("the needle")), json!("string"));
    }

    #[test]
    fn test_extract_type_passes_through_without_expression() {
        let (doc, tag) = fixture();
        let registry = TransformRegistry::with_builtins();
        let extract = registry.get("extract_type").unwrap();

        assert_eq!(extract(&doc, &tag, json!("raw")), json!("raw"));
    }

    #[test]
    fn test_to_boolean() {
        let (doc, tag) = fixture();
        let registry = TransformRegistry::with_builtins();
        let to_bool = registry.get("to_boolean").unwrap();

        assert_eq!(to_bool(&doc, &tag, json!("")), json!(true));
        assert_eq!(to_bool(&doc, &tag, json!(null)), json!(true));
        assert_eq!(to_bool(&doc, &tag, json!("false")), json!(false));
        assert_eq!(to_bool(&doc, &tag, json!("since 2.0")), json!("since 2.0"));
    }
}
