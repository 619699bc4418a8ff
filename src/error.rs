//! Error types for profile building

use std::path::PathBuf;
use thiserror::Error;

/// How an error affects the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The run aborts and no profile is produced
    Fatal,
    /// The offending item is skipped and the run continues
    Contained,
}

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Entity definition incorrect: missing subclass relation on '{id}'")]
    MissingSubclassRelation { id: String },

    #[error("Entity definition incorrect: missing domain/range relation on '{id}'")]
    MissingDomainRangeRelation { id: String },

    #[error("Vocabulary has {} invalid entity definition(s); first: {}", .0.len(), first_error(.0))]
    InvalidVocabulary(Vec<ProfileError>),

    #[error("Property '{property}' references unknown class '{class}'")]
    UnknownClass { property: String, class: String },

    #[error("Can't locate root dataset in '{source_name}'")]
    MissingRootDataset { source_name: String },

    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load {path}: {reason}")]
    LoadError { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),
}

impl ProfileError {
    /// Only dangling domain references are tolerated; everything else stops the run.
    pub fn severity(&self) -> Severity {
        match self {
            ProfileError::UnknownClass { .. } => Severity::Contained,
            _ => Severity::Fatal,
        }
    }
}

/// A non-fatal issue reported alongside a built profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A class or property without a human-readable label
    MissingLabel { entity: String },
    /// A class or property without a description
    MissingComment { entity: String },
    /// A class whose identifier has no usable local name; it is left out of the profile
    UnnamedClass { id: String },
    /// A property/class join skipped because the class is unknown
    SkippedJoin { property: String, class: String },
    /// An extension left out of the profile
    SkippedExtension { name: String, reason: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::MissingLabel { entity } => {
                write!(f, "{} does not have a label", entity)
            }
            Diagnostic::MissingComment { entity } => {
                write!(f, "{} does not have a comment (description)", entity)
            }
            Diagnostic::UnnamedClass { id } => {
                write!(f, "class '{}' has no local name and was left out", id)
            }
            Diagnostic::SkippedJoin { property, class } => {
                write!(f, "property '{}' not joined to unknown class '{}'", property, class)
            }
            Diagnostic::SkippedExtension { name, reason } => {
                write!(f, "extension '{}' skipped: {}", name, reason)
            }
        }
    }
}

fn first_error(errors: &[ProfileError]) -> String {
    errors
        .first()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "none".to_string())
}
