//! Tag-definition configuration loader.
//!
//! Loads a declarative tag-definition set from YAML and resolves transform
//! names against a [`TransformRegistry`]. The loaded configuration is static:
//! parsed once per pipeline instantiation, before any document is processed.
//!
//! # Example config
//!
//! ```yaml
//! default_transforms: trim_whitespace
//! tag_definitions:
//!   - name: param
//!     multi: true
//!   - name: returns
//!     required: true
//!   - name: deprecated
//!     transforms:
//!       - to_boolean
//!     default: false
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_yaml::Value as YamlValue;

use crate::definition::{normalize, TagDefinition};
use crate::error::ExtractionError;
use crate::extractor::TagExtractor;
use crate::registry::TransformRegistry;
use crate::transform::TransformSpec;

/// A loaded tag-definition set, ready to normalize into an extractor.
#[derive(Debug)]
pub struct ExtractorConfig {
    pub tag_definitions: Vec<TagDefinition>,
    pub default_transforms: TransformSpec,
}

/// Raw YAML schema before transform-name resolution.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    default_transforms: Option<YamlValue>,
    tag_definitions: Vec<RawTagDefinition>,
}

#[derive(Debug, Deserialize)]
struct RawTagDefinition {
    name: String,
    #[serde(default)]
    doc_property: Option<String>,
    #[serde(default)]
    tag_property: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    multi: bool,
    /// Constant fallback value written when zero tags matched.
    #[serde(default)]
    default: Option<YamlValue>,
    #[serde(default)]
    transforms: Option<YamlValue>,
}

impl ExtractorConfig {
    /// Load extractor configuration from a YAML file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, the YAML is invalid, or a
    /// definition's transform configuration is malformed.
    pub fn load_from_file<P: AsRef<Path>>(
        path: P,
        registry: &TransformRegistry,
    ) -> Result<Self, String> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

        Self::from_yaml_str(&contents, registry)
    }

    /// Parse extractor configuration from YAML text.
    pub fn from_yaml_str(yaml: &str, registry: &TransformRegistry) -> Result<Self, String> {
        let raw: RawConfig =
            serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse YAML: {}", e))?;

        let default_transforms =
            resolve_transforms(raw.default_transforms.as_ref(), registry, "default_transforms")
                .map_err(|e| e.to_string())?;

        let mut tag_definitions = Vec::with_capacity(raw.tag_definitions.len());
        for raw_def in raw.tag_definitions {
            tag_definitions.push(resolve_definition(raw_def, registry).map_err(|e| e.to_string())?);
        }

        Ok(Self {
            tag_definitions,
            default_transforms,
        })
    }

    /// Normalize the configuration into a reusable extractor.
    pub fn into_extractor(self) -> TagExtractor {
        TagExtractor::new(normalize(self.tag_definitions, &self.default_transforms))
    }
}

/// Resolve one raw definition, wiring up its transforms and constant default.
fn resolve_definition(
    raw: RawTagDefinition,
    registry: &TransformRegistry,
) -> Result<TagDefinition, ExtractionError> {
    let transforms = resolve_transforms(raw.transforms.as_ref(), registry, &raw.name)?;

    let mut def = TagDefinition::new(raw.name)
        .required(raw.required)
        .multi(raw.multi)
        .transforms(transforms);

    if let Some(property) = raw.doc_property {
        def = def.doc_property(property);
    }
    if let Some(property) = raw.tag_property {
        def = def.tag_property(property);
    }
    if let Some(default) = raw.default {
        let value = serde_json::to_value(default).map_err(|e| ExtractionError::Configuration {
            tag: def.name.clone(),
            message: format!("invalid default value: {}", e),
        })?;
        def = def.default_fn(move |_doc| Some(value.clone()));
    }

    Ok(def)
}

/// Resolve a YAML `transforms` entry into a transform spec.
///
/// Legal shapes: absent/null (no transform), a single transform name, or a
/// sequence of transform names. Anything else is a configuration error
/// naming the offending tag definition.
fn resolve_transforms(
    raw: Option<&YamlValue>,
    registry: &TransformRegistry,
    definition_name: &str,
) -> Result<TransformSpec, ExtractionError> {
    let shape_error = || ExtractionError::Configuration {
        tag: definition_name.to_string(),
        message: "transform must be a function or a sequence of functions".to_string(),
    };

    match raw {
        None | Some(YamlValue::Null) => Ok(TransformSpec::None),
        Some(YamlValue::String(name)) => {
            let transform = lookup(name, registry, definition_name)?;
            Ok(TransformSpec::Single(transform))
        }
        Some(YamlValue::Sequence(items)) => {
            let mut transforms = Vec::with_capacity(items.len());
            for item in items {
                let name = item.as_str().ok_or_else(shape_error)?;
                transforms.push(lookup(name, registry, definition_name)?);
            }
            Ok(TransformSpec::Sequence(transforms))
        }
        Some(_) => Err(shape_error()),
    }
}

fn lookup(
    name: &str,
    registry: &TransformRegistry,
    definition_name: &str,
) -> Result<crate::transform::Transform, ExtractionError> {
    registry
        .get(name)
        .map(Arc::clone)
        .ok_or_else(|| ExtractionError::Configuration {
            tag: definition_name.to_string(),
            message: format!("unknown transform '{}'", name),
        })
}
