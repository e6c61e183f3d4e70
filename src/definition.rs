//! Tag definitions and the setup-time normalization pass.
//!
//! A `TagDefinition` is the declarative rule for one tag kind: where its
//! value comes from, where it lands on the document, how many instances are
//! legal and how the value is transformed. `normalize` turns the caller's
//! definition list into an immutable processing plan for the extraction
//! engine, resolving each definition's property-extraction pipeline once so
//! the per-document hot path does no configuration work.

use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::document::{Document, Tag};
use crate::transform::{build_pipeline, Transform, TransformSpec};

/// Fallback value producer, invoked only when zero tags matched.
///
/// `None` is the explicit no-value sentinel: the definition writes nothing.
pub type DefaultFn = Arc<dyn Fn(&Document) -> Option<JsonValue> + Send + Sync>;

/// Declarative rule for extracting one kind of tag into a document property.
#[derive(Clone, Default)]
pub struct TagDefinition {
    /// Tag identifier, e.g. "param".
    pub name: String,

    /// Target property on the document. Defaults to `name`.
    pub doc_property: Option<String>,

    /// Source field to read on each matched tag. Defaults to "description".
    pub tag_property: Option<String>,

    /// Zero matches is fatal for this document.
    pub required: bool,

    /// Collection target: the tag may legally appear any number of times.
    pub multi: bool,

    /// Fallback when zero tags matched (and the tag is not required).
    pub default: Option<DefaultFn>,

    /// Transforms specific to this definition, applied before the shared
    /// default transforms.
    pub transforms: TransformSpec,
}

impl TagDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn doc_property(mut self, property: impl Into<String>) -> Self {
        self.doc_property = Some(property.into());
        self
    }

    pub fn tag_property(mut self, property: impl Into<String>) -> Self {
        self.tag_property = Some(property.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn multi(mut self, multi: bool) -> Self {
        self.multi = multi;
        self
    }

    pub fn default_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Document) -> Option<JsonValue> + Send + Sync + 'static,
    {
        self.default = Some(Arc::new(f));
        self
    }

    pub fn transforms(mut self, transforms: TransformSpec) -> Self {
        self.transforms = transforms;
        self
    }
}

impl fmt::Debug for TagDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagDefinition")
            .field("name", &self.name)
            .field("doc_property", &self.doc_property)
            .field("tag_property", &self.tag_property)
            .field("required", &self.required)
            .field("multi", &self.multi)
            .field("has_default", &self.default.is_some())
            .field("transforms", &self.transforms)
            .finish()
    }
}

/// A tag definition with its extraction pipeline resolved.
///
/// Immutable after `normalize`; the extraction engine only reads it, so one
/// resolved list is safely reusable across any number of documents.
#[derive(Clone)]
pub struct ResolvedTagDefinition {
    pub name: String,
    pub doc_property: String,
    pub tag_property: String,
    pub required: bool,
    pub multi: bool,
    pub default: Option<DefaultFn>,
    own_pipeline: Transform,
    shared_pipeline: Transform,
}

impl ResolvedTagDefinition {
    /// Extract this definition's value from one matched tag: read
    /// `tag_property` off the tag, apply the definition's own pipeline, then
    /// the shared default pipeline. Does not mutate the tag.
    pub fn get_property(&self, doc: &Document, tag: &Tag) -> JsonValue {
        let raw = tag.property(&self.tag_property);
        let value = (self.own_pipeline)(doc, tag, raw);
        (self.shared_pipeline)(doc, tag, value)
    }
}

impl fmt::Debug for ResolvedTagDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedTagDefinition")
            .field("name", &self.name)
            .field("doc_property", &self.doc_property)
            .field("tag_property", &self.tag_property)
            .field("required", &self.required)
            .field("multi", &self.multi)
            .finish()
    }
}

/// Normalize caller-supplied tag definitions into the engine's working set.
///
/// Builds the shared pipeline from `default_transforms` once, fills in each
/// definition's `doc_property`/`tag_property` defaults and composes its own
/// pipeline. Input order is preserved: it determines document-property write
/// order and which definition's required-tag failure surfaces first.
pub fn normalize(
    definitions: Vec<TagDefinition>,
    default_transforms: &TransformSpec,
) -> Vec<ResolvedTagDefinition> {
    let shared_pipeline = build_pipeline(default_transforms);

    definitions
        .into_iter()
        .map(|def| {
            let own_pipeline = build_pipeline(&def.transforms);
            ResolvedTagDefinition {
                doc_property: def.doc_property.unwrap_or_else(|| def.name.clone()),
                tag_property: def
                    .tag_property
                    .unwrap_or_else(|| "description".to_string()),
                name: def.name,
                required: def.required,
                multi: def.multi,
                default: def.default,
                own_pipeline,
                shared_pipeline: Arc::clone(&shared_pipeline),
            }
        })
        .collect()
}
