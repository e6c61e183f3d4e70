//! Document and tag model for post-parse property binding.
//!
//! The upstream comment parser produces `Tag`s and attaches them to a
//! `Document` through a `TagCollection`. This core reads tags out of the
//! collection and writes extracted properties back onto the document; it
//! never parses raw comment text itself.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One parsed annotation unit from a documentation comment (e.g. a `@param`
/// entry).
///
/// Tags are produced by the upstream parser and are read-only to this core.
/// A tag that failed structural parsing carries its problems in `errors`;
/// the collection routes such tags to `bad_tags` instead of the lookup table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tag {
    /// Tag kind, e.g. "param" for `@param`. Aliases are resolved upstream.
    pub tag_name: String,

    /// The tag's own name field, e.g. the parameter name of a `@param`.
    #[serde(default)]
    pub name: Option<String>,

    /// Free-text description following the tag.
    #[serde(default)]
    pub description: String,

    /// Type expression, e.g. `{string}` on `@param {string} needle`.
    #[serde(default)]
    pub type_expression: Option<String>,

    /// Line in the source file where the tag starts.
    #[serde(default)]
    pub starting_line: u32,

    /// Parse errors reported by the upstream parser. Non-empty marks the
    /// tag as malformed.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl Tag {
    /// Create a well-formed tag with the given kind and description.
    pub fn new(tag_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_type_expression(mut self, expr: impl Into<String>) -> Self {
        self.type_expression = Some(expr.into());
        self
    }

    pub fn with_starting_line(mut self, line: u32) -> Self {
        self.starting_line = line;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }

    /// Read one of the tag's fields by its configuration name.
    ///
    /// Tag definitions address the source field through `tag_property`
    /// ("description", "name", "typeExpression", "startingLine" or
    /// "tagName"). Absent optional fields and unknown names read as null.
    pub fn property(&self, name: &str) -> JsonValue {
        match name {
            "description" => JsonValue::String(self.description.clone()),
            "name" => self
                .name
                .clone()
                .map(JsonValue::String)
                .unwrap_or(JsonValue::Null),
            "typeExpression" => self
                .type_expression
                .clone()
                .map(JsonValue::String)
                .unwrap_or(JsonValue::Null),
            "startingLine" => JsonValue::from(self.starting_line),
            "tagName" => JsonValue::String(self.tag_name.clone()),
            _ => JsonValue::Null,
        }
    }
}

/// Ordered tag lookup for one document.
///
/// Built once by the upstream parser from its parse results. Tags with parse
/// errors are segregated into `bad_tags` and never returned from `get_tags`.
/// Tag-name aliases must already be canonicalized by the parser; lookup here
/// is by exact name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagCollection {
    tags: Vec<Tag>,
    bad_tags: Vec<Tag>,
}

impl TagCollection {
    /// Build a collection from parse results, routing malformed tags
    /// (non-empty `errors`) to the bad-tag list. Input order is preserved
    /// in both lists.
    pub fn new(tags: Vec<Tag>) -> Self {
        let (bad_tags, tags): (Vec<Tag>, Vec<Tag>) =
            tags.into_iter().partition(|t| !t.errors.is_empty());
        Self { tags, bad_tags }
    }

    /// All well-formed tags with the given tag name, in parse order.
    pub fn get_tags(&self, tag_name: &str) -> Vec<&Tag> {
        self.tags.iter().filter(|t| t.tag_name == tag_name).collect()
    }

    /// Tags that failed upstream parsing, in parse order.
    pub fn bad_tags(&self) -> &[Tag] {
        &self.bad_tags
    }
}

/// A document record: the sole mutable target of extraction.
///
/// Carries source location metadata, the tag collection produced upstream,
/// and an ordered property map that the extraction engine writes into via
/// each definition's `doc_property`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Source file this document was parsed from.
    pub file: String,

    /// Line in `file` where the documented item starts.
    pub starting_line: u32,

    /// Optional document identifier (used in diagnostics).
    #[serde(default)]
    pub id: Option<String>,

    /// Optional document name (used in diagnostics when `id` is absent).
    #[serde(default)]
    pub name: Option<String>,

    /// Parsed tags attached by the upstream parser.
    #[serde(default)]
    pub tags: TagCollection,

    /// Extracted properties, keyed by `doc_property`. Insertion order
    /// follows tag-definition order.
    #[serde(default)]
    properties: IndexMap<String, JsonValue>,
}

impl Document {
    pub fn new(file: impl Into<String>, starting_line: u32) -> Self {
        Self {
            file: file.into(),
            starting_line,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_tags(mut self, tags: TagCollection) -> Self {
        self.tags = tags;
        self
    }

    /// Get an extracted property by name.
    pub fn get_property(&self, name: &str) -> Option<&JsonValue> {
        self.properties.get(name)
    }

    /// Assign a property, overwriting any prior value.
    pub fn set_property(&mut self, name: impl Into<String>, value: JsonValue) {
        self.properties.insert(name.into(), value);
    }

    /// Append one element to a collection property, creating an empty
    /// collection first if the property is absent.
    ///
    /// If a prior non-array value exists under `name` it is replaced by a
    /// fresh collection; multi definitions own their target property.
    pub fn append_property(&mut self, name: &str, value: JsonValue) {
        let entry = self
            .properties
            .entry(name.to_string())
            .or_insert_with(|| JsonValue::Array(Vec::new()));

        match entry {
            JsonValue::Array(items) => items.push(value),
            other => *other = JsonValue::Array(vec![value]),
        }
    }

    /// Check whether a property has been set.
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// All extracted properties, in write order.
    pub fn properties(&self) -> &IndexMap<String, JsonValue> {
        &self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tag_property_lookup() {
        let tag = Tag::new("param", "the needle")
            .with_name("needle")
            .with_type_expression("string")
            .with_starting_line(12);

        assert_eq!(tag.property("description"), json!("the needle"));
        assert_eq!(tag.property("name"), json!("needle"));
        assert_eq!(tag.property("typeExpression"), json!("string"));
        assert_eq!(tag.property("startingLine"), json!(12));
        assert_eq!(tag.property("tagName"), json!("param"));
        assert_eq!(tag.property("bogus"), JsonValue::Null);
    }

    #[test]
    fn test_tag_property_absent_fields_are_null() {
        let tag = Tag::new("returns", "a value");

        assert_eq!(tag.property("name"), JsonValue::Null);
        assert_eq!(tag.property("typeExpression"), JsonValue::Null);
    }

    #[test]
    fn test_collection_partitions_bad_tags() {
        let tags = vec![
            Tag::new("param", "first"),
            Tag::new("param", "broken").with_error("Unterminated type expression"),
            Tag::new("returns", "result"),
        ];

        let collection = TagCollection::new(tags);

        assert_eq!(collection.get_tags("param").len(), 1);
        assert_eq!(collection.get_tags("returns").len(), 1);
        assert_eq!(collection.bad_tags().len(), 1);
        assert_eq!(collection.bad_tags()[0].description, "broken");
    }

    #[test]
    fn test_get_tags_preserves_parse_order() {
        let tags = vec![
            Tag::new("param", "first"),
            Tag::new("returns", "result"),
            Tag::new("param", "second"),
        ];

        let collection = TagCollection::new(tags);
        let params = collection.get_tags("param");

        assert_eq!(params.len(), 2);
        assert_eq!(params[0].description, "first");
        assert_eq!(params[1].description, "second");
    }

    #[test]
    fn test_get_tags_unknown_name_is_empty() {
        let collection = TagCollection::new(vec![Tag::new("param", "x")]);
        assert!(collection.get_tags("deprecated").is_empty());
    }

    #[test]
    fn test_set_and_get_property() {
        let mut doc = Document::new("src/lib.js", 1);

        doc.set_property("description", json!("a module"));

        assert!(doc.has_property("description"));
        assert_eq!(doc.get_property("description"), Some(&json!("a module")));
        assert_eq!(doc.get_property("missing"), None);
    }

    #[test]
    fn test_set_property_overwrites() {
        let mut doc = Document::new("src/lib.js", 1);

        doc.set_property("module", json!("old"));
        doc.set_property("module", json!("new"));

        assert_eq!(doc.get_property("module"), Some(&json!("new")));
    }

    #[test]
    fn test_append_property_creates_collection() {
        let mut doc = Document::new("src/lib.js", 1);

        doc.append_property("param", json!("first"));
        doc.append_property("param", json!("second"));

        assert_eq!(
            doc.get_property("param"),
            Some(&json!(["first", "second"]))
        );
    }

    #[test]
    fn test_append_property_appends_collection_as_single_element() {
        let mut doc = Document::new("src/lib.js", 1);

        doc.append_property("examples", json!(["a", "b"]));

        assert_eq!(doc.get_property("examples"), Some(&json!([["a", "b"]])));
    }

    #[test]
    fn test_properties_preserve_write_order() {
        let mut doc = Document::new("src/lib.js", 1);

        doc.set_property("b", json!(2));
        doc.set_property("a", json!(1));
        doc.set_property("c", json!(3));

        let keys: Vec<&String> = doc.properties().keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_document_serialization_round_trip() {
        let mut doc = Document::new("src/lib.js", 4)
            .with_id("module:search")
            .with_tags(TagCollection::new(vec![Tag::new("param", "needle")]));
        doc.set_property("access", json!("public"));

        let json = serde_json::to_value(&doc).expect("Should serialize");
        let doc2: Document = serde_json::from_value(json).expect("Should deserialize");

        assert_eq!(doc2.file, "src/lib.js");
        assert_eq!(doc2.id.as_deref(), Some("module:search"));
        assert_eq!(doc2.tags.get_tags("param").len(), 1);
        assert_eq!(doc2.get_property("access"), Some(&json!("public")));
    }
}
