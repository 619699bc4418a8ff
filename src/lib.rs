//! Describo Profile Builder
//!
//! This library compiles a JSON-LD vocabulary (schema.org) and any number
//! of RO-Crate packaged vocabulary extensions into a single profile of
//! class definitions: one entry per class, carrying its ancestry and the
//! input fields for every property whose domain includes it.
//!
//! # Overview
//!
//! Building a profile runs these stages:
//!
//! 1. Expand compact identifiers against each document's `@context`
//! 2. Normalize every graph node, failing the run if any class or property
//!    is missing required relations
//! 3. Extract classes, properties and enumeration members
//! 4. Merge extensions in order; the first source to define a class keeps it
//! 5. Compute each class hierarchy, root first
//! 6. Join properties into the classes of their domain, rewriting range
//!    types through the rule tables
//! 7. Apply class renames, keeping the old name as a legacy entry
//!
//! # Usage
//!
//! ```ignore
//! use describo_profile::{build_profile, to_json_string, BaseSource, BuildOptions, FilesystemLoader, ProfileConfig};
//!
//! let rules = ProfileConfig::default().rules()?;
//! let loader = FilesystemLoader::new(
//!     BaseSource::parse("./schema.org.jsonld"),
//!     Some("./extensions".into()),
//! );
//! let result = build_profile(&loader, &rules, &BuildOptions::default())?;
//!
//! println!("{}", to_json_string(&result.profile, true)?);
//! ```

pub mod build;
pub mod collect;
pub mod config;
pub mod error;
pub mod extract;
pub mod hierarchy;
pub mod id;
pub mod join;
pub mod loader;
pub mod mapping;
pub mod normalize;
pub mod profile;
pub mod vocab;

// Re-export main types for convenience
pub use crate::build::{
    build_profile, to_json_string, BuildOptions, BuildResult, BuildStats, InMemoryLoader,
    SourceStats, VocabularyLoader,
};
pub use crate::collect::VocabularyDocument;
pub use crate::config::{ProfileConfig, Rules};
pub use crate::error::{Diagnostic, ProfileError, Severity};
pub use crate::loader::{BaseSource, FilesystemLoader};
pub use crate::profile::{ClassDefinition, InputDefinition, Profile};
