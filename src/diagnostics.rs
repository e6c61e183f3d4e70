//! Bad-tag diagnostic formatting.
//!
//! Tags that failed upstream parsing are reported, never corrected. The
//! formatter produces one aggregated text block per document for the caller's
//! diagnostic sink to emit; it performs no I/O and no mutation itself.

use crate::document::Document;

/// Number of description characters shown per bad tag before truncation.
const DESCRIPTION_PREVIEW_CHARS: usize = 20;

/// Format an aggregated warning for every bad tag on a document.
///
/// Header identifies the document by its id (or name) when present, and by
/// its starting line and file. Each bad tag gets one summary line followed
/// by one indented bullet per parse error.
pub fn format_bad_tags(doc: &Document) -> String {
    let mut out = String::new();

    let ident = doc.id.as_deref().or(doc.name.as_deref());
    match ident {
        Some(ident) => out.push_str(&format!(
            "Invalid tags found in doc \"{}\" - starting at line {} of file {}\n",
            ident, doc.starting_line, doc.file
        )),
        None => out.push_str(&format!(
            "Invalid tags found in doc - starting at line {} of file {}\n",
            doc.starting_line, doc.file
        )),
    }

    for tag in doc.tags.bad_tags() {
        out.push_str(&format!("Line: {}: @{}", tag.starting_line, tag.tag_name));

        if let Some(expr) = &tag.type_expression {
            out.push_str(&format!(" {{{}}}", expr));
        }
        if let Some(name) = &tag.name {
            out.push_str(&format!(" {}", name));
        }
        if !tag.description.is_empty() {
            let preview: String = tag.description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
            out.push_str(&format!(" {}...", preview));
        }
        out.push('\n');

        for error in &tag.errors {
            out.push_str(&format!("    * {}\n", error));
        }
    }

    out
}
