//! # Tagbind: Documentation Tag Binding Library
//!
//! Tagbind is the post-parse binding layer of a documentation pipeline: an
//! upstream parser turns raw comment text into [`Tag`]s attached to a
//! [`Document`]; tagbind decides, per declared tag kind, how many instances
//! are legal, what value to extract, how to transform it, and what to do when
//! the tag is absent.
//!
//! ## Features
//!
//! - **Declarative tag definitions**: occurrence policy, target property,
//!   source field, fallback and transforms per tag kind
//! - **Composable transform pipelines**: per-definition transforms followed
//!   by a shared default pipeline, applied left-to-right
//! - **Transform registry**: name-based transform resolution for YAML-driven
//!   configuration, with a builtin transform set
//! - **Bad-tag diagnostics**: aggregated warnings for tags that failed
//!   upstream parsing, routed to `tracing` or a custom sink
//!
//! ## Example
//!
//! ```
//! use tagbind::{
//!     normalize, Document, Tag, TagCollection, TagDefinition, TagExtractor, TransformSpec,
//! };
//! use serde_json::json;
//!
//! let definitions = vec![
//!     TagDefinition::new("param").multi(true),
//!     TagDefinition::new("returns").required(true),
//! ];
//!
//! let extractor = TagExtractor::new(normalize(definitions, &TransformSpec::None));
//!
//! let mut doc = Document::new("src/search.js", 4).with_tags(TagCollection::new(vec![
//!     Tag::new("param", "the haystack"),
//!     Tag::new("param", "the needle"),
//!     Tag::new("returns", "index of the needle"),
//! ]));
//!
//! extractor.extract(&mut doc)?;
//!
//! assert_eq!(
//!     doc.get_property("param"),
//!     Some(&json!(["the haystack", "the needle"]))
//! );
//! # Ok::<(), tagbind::ExtractionError>(())
//! ```

// Core modules
pub mod config;
pub mod definition;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod extractor;
pub mod registry;
pub mod transform;

// Re-export key types
pub use config::ExtractorConfig;
pub use definition::{normalize, DefaultFn, ResolvedTagDefinition, TagDefinition};
pub use diagnostics::format_bad_tags;
pub use document::{Document, Tag, TagCollection};
pub use error::ExtractionError;
pub use extractor::TagExtractor;
pub use registry::TransformRegistry;
pub use transform::{build_pipeline, transform, Transform, TransformSpec};
