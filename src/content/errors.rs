//! Diagnostics and load errors surfaced while building the content registry.
use std::{fmt, io, path::PathBuf};

use super::definitions::DefinitionKind;

/// Non-fatal problems found while indexing content. None of these stop the
/// registry from being built.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentDiagnostic {
    /// A later record reused an id; the first record was kept.
    DuplicateId {
        id: String,
        kept: DefinitionKind,
        discarded: DefinitionKind,
    },
    /// A record without an id was skipped.
    MissingId { kind: DefinitionKind },
    /// A field was outside its allowed range and was adjusted.
    Normalised {
        id: String,
        field: &'static str,
        detail: String,
    },
    /// A recipe names an item id that is not a loaded item definition.
    DanglingReference { recipe_id: String, item_id: String },
}

impl ContentDiagnostic {
    pub fn duplicate_id(id: impl Into<String>, kept: DefinitionKind, discarded: DefinitionKind) -> Self {
        Self::DuplicateId {
            id: id.into(),
            kept,
            discarded,
        }
    }

    pub fn normalised(id: impl Into<String>, field: &'static str, detail: impl Into<String>) -> Self {
        Self::Normalised {
            id: id.into(),
            field,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ContentDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId {
                id,
                kept,
                discarded,
            } => write!(
                f,
                "duplicate definition id '{}': kept the first ({}), discarded a later {}",
                id, kept, discarded
            ),
            Self::MissingId { kind } => write!(f, "skipped {} definition without an id", kind),
            Self::Normalised { id, field, detail } => {
                write!(f, "'{}' field {} adjusted: {}", id, field, detail)
            }
            Self::DanglingReference { recipe_id, item_id } => write!(
                f,
                "recipe '{}' references unknown item '{}'",
                recipe_id, item_id
            ),
        }
    }
}

/// Failure to read a content source at all. The caller decides whether to
/// fall back to built-in content.
#[derive(Debug)]
pub enum ContentLoadError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, message: String },
}

impl fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "unable to read {}: {}", path.display(), source)
            }
            Self::Parse { path, message } => {
                write!(f, "invalid content file {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for ContentLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}
