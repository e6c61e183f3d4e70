//! Error types for configuration and extraction.

use std::fmt;

/// Error type for tag extraction operations.
///
/// `Configuration` is raised once at setup time, before any document is
/// processed. `MissingTag` and `DuplicateTag` are fatal to the current
/// document's extraction: the engine stops at the offending definition and
/// does not apply the remaining ones. Both carry the document's file and
/// starting line so the error is actionable at the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Malformed transform configuration on a tag definition.
    Configuration { tag: String, message: String },

    /// A required tag was not found on a document.
    MissingTag {
        tag: String,
        file: String,
        line: u32,
    },

    /// A non-multi tag appeared more than once (after alias resolution).
    DuplicateTag {
        tag: String,
        count: usize,
        file: String,
        line: u32,
    },
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::Configuration { tag, message } => {
                write!(f, "Invalid tag definition '{}': {}", tag, message)
            }
            ExtractionError::MissingTag { tag, file, line } => {
                write!(
                    f,
                    "Missing required tag '{}' - starting at line {} of file {}",
                    tag, line, file
                )
            }
            ExtractionError::DuplicateTag {
                tag,
                count,
                file,
                line,
            } => {
                write!(
                    f,
                    "Only one of each type of tag allowed. Found {} tags of type '{}' - starting at line {} of file {}",
                    count, tag, line, file
                )
            }
        }
    }
}

impl std::error::Error for ExtractionError {}
