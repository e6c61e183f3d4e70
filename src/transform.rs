//! Transform pipeline builder.
//!
//! Transforms are pure value mappings `(doc, tag, value) -> value` applied
//! to a tag's raw extracted value. A tag definition may carry no transform,
//! a single transform, or an ordered sequence; the builder composes whatever
//! it is given into one pipeline function applied left-to-right.

use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::document::{Document, Tag};

/// A single transform stage. Pure with respect to `doc` and `tag`: stages
/// read them but only the threaded value changes between stages.
pub type Transform = Arc<dyn Fn(&Document, &Tag, JsonValue) -> JsonValue + Send + Sync>;

/// Wrap a closure as a shareable transform.
pub fn transform<F>(f: F) -> Transform
where
    F: Fn(&Document, &Tag, JsonValue) -> JsonValue + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Transform configuration attached to a tag definition.
///
/// Validated once at configuration-load time; the extraction hot path only
/// ever sees the composed pipeline.
#[derive(Clone, Default)]
pub enum TransformSpec {
    /// No transformation: the raw value passes through unchanged.
    #[default]
    None,

    /// One transform used as the whole pipeline.
    Single(Transform),

    /// An ordered sequence folded left-to-right: the result of stage i is
    /// the value argument of stage i+1.
    Sequence(Vec<Transform>),
}

impl TransformSpec {
    pub fn single<F>(f: F) -> Self
    where
        F: Fn(&Document, &Tag, JsonValue) -> JsonValue + Send + Sync + 'static,
    {
        Self::Single(transform(f))
    }

    pub fn sequence(transforms: Vec<Transform>) -> Self {
        Self::Sequence(transforms)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Debug for TransformSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "TransformSpec::None"),
            Self::Single(_) => write!(f, "TransformSpec::Single"),
            Self::Sequence(seq) => write!(f, "TransformSpec::Sequence(len={})", seq.len()),
        }
    }
}

/// Compose a transform configuration into one pipeline function.
///
/// - `None` yields the identity pipeline.
/// - `Single` yields the transform itself.
/// - `Sequence` yields a fold over the stages, threading `doc` and `tag`
///   unchanged into every stage.
pub fn build_pipeline(spec: &TransformSpec) -> Transform {
    match spec {
        TransformSpec::None => transform(|_doc, _tag, value| value),
        TransformSpec::Single(t) => Arc::clone(t),
        TransformSpec::Sequence(transforms) => {
            let stages: Vec<Transform> = transforms.iter().map(Arc::clone).collect();
            transform(move |doc, tag, value| {
                stages
                    .iter()
                    .fold(value, |value, stage| stage(doc, tag, value))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> (Document, Tag) {
        (Document::new("test.js", 1), Tag::new("param", "raw"))
    }

    #[test]
    fn test_none_is_identity() {
        let (doc, tag) = fixture();
        let pipeline = build_pipeline(&TransformSpec::None);

        assert_eq!(pipeline(&doc, &tag, json!("raw")), json!("raw"));
    }

    #[test]
    fn test_single_is_applied() {
        let (doc, tag) = fixture();
        let spec = TransformSpec::single(|_doc, _tag, value| {
            json!(format!("{}!", value.as_str().unwrap_or_default()))
        });

        let pipeline = build_pipeline(&spec);

        assert_eq!(pipeline(&doc, &tag, json!("raw")), json!("raw!"));
    }

    #[test]
    fn test_sequence_folds_left_to_right() {
        let (doc, tag) = fixture();
        let spec = TransformSpec::sequence(vec![
            transform(|_d, _t, v| json!(format!("{}-f", v.as_str().unwrap_or_default()))),
            transform(|_d, _t, v| json!(format!("{}-g", v.as_str().unwrap_or_default()))),
        ]);

        let pipeline = build_pipeline(&spec);

        assert_eq!(pipeline(&doc, &tag, json!("x")), json!("x-f-g"));
    }

    #[test]
    fn test_stages_see_doc_and_tag() {
        let (doc, tag) = fixture();
        let spec = TransformSpec::sequence(vec![transform(|doc, tag, _v| {
            json!(format!("{}:{}", doc.file, tag.tag_name))
        })]);

        let pipeline = build_pipeline(&spec);

        assert_eq!(pipeline(&doc, &tag, json!(null)), json!("test.js:param"));
    }

    #[test]
    fn test_empty_sequence_is_identity() {
        let (doc, tag) = fixture();
        let pipeline = build_pipeline(&TransformSpec::Sequence(vec![]));

        assert_eq!(pipeline(&doc, &tag, json!(42)), json!(42));
    }
}
