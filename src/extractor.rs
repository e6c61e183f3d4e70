//! Extraction engine: applies tag definitions to one document at a time.
//!
//! Built once from normalized definitions and reused for every document in
//! the pipeline. Each `extract` call is a single synchronous pass over the
//! definition list; the document is the only thing mutated.

use serde_json::Value as JsonValue;

use crate::definition::ResolvedTagDefinition;
use crate::diagnostics::format_bad_tags;
use crate::document::{Document, Tag};
use crate::error::ExtractionError;

/// Applies a normalized tag-definition set to documents.
///
/// Holds no per-call state: the definition list is immutable after
/// construction, so one extractor is safely shared across documents (and
/// threads, if the host parallelizes over documents).
pub struct TagExtractor {
    definitions: Vec<ResolvedTagDefinition>,
}

impl TagExtractor {
    /// Create an extractor from normalized definitions (see
    /// [`normalize`](crate::definition::normalize)).
    pub fn new(definitions: Vec<ResolvedTagDefinition>) -> Self {
        Self { definitions }
    }

    /// The definitions this extractor applies, in application order.
    pub fn definitions(&self) -> &[ResolvedTagDefinition] {
        &self.definitions
    }

    /// Extract tag properties onto `doc`, reporting bad-tag diagnostics to
    /// `tracing::warn!`.
    ///
    /// # Errors
    /// Fails fast with `MissingTag` or `DuplicateTag` when author-written
    /// documentation violates a definition's occurrence policy; remaining
    /// definitions are not applied.
    pub fn extract(&self, doc: &mut Document) -> Result<(), ExtractionError> {
        self.extract_with_sink(doc, &mut |text| {
            tracing::warn!("{}", text);
        })
    }

    /// Extract tag properties onto `doc`, reporting bad-tag diagnostics to
    /// the supplied sink.
    ///
    /// The bad-tag report is re-emitted after every definition iteration
    /// while the document's bad-tag list is non-empty; sinks should tolerate
    /// repeats or deduplicate by content.
    pub fn extract_with_sink(
        &self,
        doc: &mut Document,
        sink: &mut dyn FnMut(&str),
    ) -> Result<(), ExtractionError> {
        for def in &self.definitions {
            self.apply_definition(def, doc)?;

            if !doc.tags.bad_tags().is_empty() {
                let report = format_bad_tags(doc);
                sink(&report);
            }
        }

        Ok(())
    }

    /// Apply one definition's occurrence/default/multiplicity policy.
    fn apply_definition(
        &self,
        def: &ResolvedTagDefinition,
        doc: &mut Document,
    ) -> Result<(), ExtractionError> {
        let matched: Vec<Tag> = doc
            .tags
            .get_tags(&def.name)
            .into_iter()
            .cloned()
            .collect();

        if matched.is_empty() {
            return self.apply_default(def, doc);
        }

        if def.multi {
            let values: Vec<JsonValue> = matched
                .iter()
                .map(|tag| def.get_property(doc, tag))
                .collect();
            for value in values {
                doc.append_property(&def.doc_property, value);
            }
            return Ok(());
        }

        if matched.len() > 1 {
            return Err(ExtractionError::DuplicateTag {
                tag: def.name.clone(),
                count: matched.len(),
                file: doc.file.clone(),
                line: doc.starting_line,
            });
        }

        let value = def.get_property(doc, &matched[0]);
        doc.set_property(def.doc_property.clone(), value);
        Ok(())
    }

    /// Zero-match branch: required tags fail, otherwise the definition's
    /// default may produce a value.
    fn apply_default(
        &self,
        def: &ResolvedTagDefinition,
        doc: &mut Document,
    ) -> Result<(), ExtractionError> {
        if def.required {
            return Err(ExtractionError::MissingTag {
                tag: def.name.clone(),
                file: doc.file.clone(),
                line: doc.starting_line,
            });
        }

        let Some(default) = &def.default else {
            return Ok(());
        };

        match default(doc) {
            // A defaulted value is appended as one element even when it is
            // itself a collection.
            Some(value) if def.multi => doc.append_property(&def.doc_property, value),
            Some(value) => doc.set_property(def.doc_property.clone(), value),
            None => {}
        }

        Ok(())
    }
}
