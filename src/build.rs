//! Profile building
//!
//! Loads the base vocabulary, merges each extension's classes and
//! properties in order, then computes hierarchies, joins properties and
//! applies renames once over the merged set.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

use crate::collect::VocabularyDocument;
use crate::config::Rules;
use crate::error::{Diagnostic, ProfileError};
use crate::extract::{extract, Extracted};
use crate::hierarchy::map_class_hierarchies;
use crate::join::map_properties_to_classes;
use crate::mapping::apply_mappings;
use crate::normalize::{normalize_entities, Entity};
use crate::profile::{ClassDefinition, Profile};

/// Options for a build
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Leave out extensions without a root dataset instead of failing the run
    pub skip_invalid_extensions: bool,
}

/// Source of the vocabulary documents for a build
pub trait VocabularyLoader {
    /// Load the base vocabulary
    fn load_base(&self) -> Result<VocabularyDocument, ProfileError>;

    /// Names of the extensions to merge, in merge order
    fn extension_names(&self) -> Result<Vec<String>, ProfileError>;

    /// Load one extension by name
    fn load_extension(&self, name: &str) -> Result<VocabularyDocument, ProfileError>;
}

/// A loader over documents already in memory
#[derive(Debug, Clone)]
pub struct InMemoryLoader {
    base: Value,
    extensions: Vec<(String, Value)>,
}

impl InMemoryLoader {
    pub fn new(base: Value) -> Self {
        Self {
            base,
            extensions: vec![],
        }
    }

    pub fn with_extension(mut self, name: impl Into<String>, document: Value) -> Self {
        self.extensions.push((name.into(), document));
        self
    }
}

impl VocabularyLoader for InMemoryLoader {
    fn load_base(&self) -> Result<VocabularyDocument, ProfileError> {
        VocabularyDocument::from_json(self.base.clone(), "base")
    }

    fn extension_names(&self) -> Result<Vec<String>, ProfileError> {
        Ok(self.extensions.iter().map(|(name, _)| name.clone()).collect())
    }

    fn load_extension(&self, name: &str) -> Result<VocabularyDocument, ProfileError> {
        let (_, document) = self
            .extensions
            .iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| ProfileError::LoadError {
                path: name.to_string(),
                reason: "no such extension".to_string(),
            })?;
        VocabularyDocument::from_json(document.clone(), name)
    }
}

/// Classes and properties contributed by one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStats {
    pub name: String,
    pub classes: usize,
    pub properties: usize,
}

/// Statistics from a build
#[derive(Debug, Default)]
pub struct BuildStats {
    /// Per document, base first
    pub sources: Vec<SourceStats>,
    /// Classes and properties after merging all sources
    pub classes: usize,
    pub properties: usize,
    pub enumerations: usize,
    pub extensions_merged: usize,
    pub inputs_joined: usize,
    pub joins_skipped: usize,
    pub renamed_classes: usize,
    /// Entries in the final profile, legacy names included
    pub definitions: usize,
}

/// Result of a build
#[derive(Debug)]
pub struct BuildResult {
    pub profile: Profile,
    pub stats: BuildStats,
    /// Non-fatal issues, in the order they were found
    pub diagnostics: Vec<Diagnostic>,
}

/// Expand, normalize and extract one document
fn process_document(
    mut document: VocabularyDocument,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Extracted, ProfileError> {
    document.expand_identifiers();
    let entities = normalize_entities(&document.graph)?;
    Ok(extract(entities, diagnostics))
}

/// Register class definitions; the first source to define a name keeps it
fn register_classes(classes: &[Entity], diagnostics: &mut Vec<Diagnostic>) -> BTreeMap<String, ClassDefinition> {
    let mut definitions = BTreeMap::new();

    for class in classes {
        let Some(name) = class.name.as_deref() else {
            warn!(id = %class.id, "class has no local name, leaving it out");
            diagnostics.push(Diagnostic::UnnamedClass {
                id: class.id.clone(),
            });
            continue;
        };
        if definitions.contains_key(name) {
            debug!(class = name, id = %class.id, "class already defined by an earlier source");
            continue;
        }
        definitions.insert(name.to_string(), ClassDefinition::from_entity(class, name));
    }

    definitions
}

/// Build the profile from a base vocabulary and its extensions
pub fn build_profile(
    loader: &dyn VocabularyLoader,
    rules: &Rules,
    options: &BuildOptions,
) -> Result<BuildResult, ProfileError> {
    let mut stats = BuildStats::default();
    let mut diagnostics = Vec::new();

    let base = loader.load_base()?;
    let base_name = base.source.clone();
    let Extracted {
        mut classes,
        mut properties,
        enumerations,
    } = process_document(base, &mut diagnostics)?;
    info!(
        source = %base_name,
        classes = classes.len(),
        properties = properties.len(),
        enumerations = enumerations.len(),
        "loaded base vocabulary"
    );
    stats.sources.push(SourceStats {
        name: base_name,
        classes: classes.len(),
        properties: properties.len(),
    });

    for name in loader.extension_names()? {
        let document = loader.load_extension(&name)?;

        if let Err(e) = document.root_dataset() {
            if !options.skip_invalid_extensions {
                return Err(e);
            }
            error!(extension = %name, "{}", e);
            diagnostics.push(Diagnostic::SkippedExtension {
                name: name.clone(),
                reason: e.to_string(),
            });
            continue;
        }

        let extension = process_document(document, &mut diagnostics)?;
        info!(
            extension = %name,
            classes = extension.classes.len(),
            properties = extension.properties.len(),
            "merged extension"
        );
        stats.sources.push(SourceStats {
            name,
            classes: extension.classes.len(),
            properties: extension.properties.len(),
        });
        stats.extensions_merged += 1;

        classes.extend(extension.classes);
        properties.extend(extension.properties);
    }

    stats.classes = classes.len();
    stats.properties = properties.len();
    stats.enumerations = enumerations.len();

    let mut definitions = register_classes(&classes, &mut diagnostics);
    map_class_hierarchies(&mut definitions);

    let report = map_properties_to_classes(&mut definitions, &properties, &enumerations, rules);
    stats.inputs_joined = report.joined;
    stats.joins_skipped = report.skipped.len();
    for skipped in report.skipped {
        if let ProfileError::UnknownClass { property, class } = skipped {
            diagnostics.push(Diagnostic::SkippedJoin { property, class });
        }
    }

    let profile = apply_mappings(definitions, rules);
    stats.renamed_classes = profile.aliases().count();
    stats.definitions = profile.len();

    info!(
        definitions = stats.definitions,
        inputs = stats.inputs_joined,
        skipped_joins = stats.joins_skipped,
        "profile built"
    );

    Ok(BuildResult {
        profile,
        stats,
        diagnostics,
    })
}

/// Serialize a profile to a JSON string
pub fn to_json_string(profile: &Profile, pretty: bool) -> Result<String, ProfileError> {
    if pretty {
        Ok(serde_json::to_string_pretty(profile)?)
    } else {
        Ok(serde_json::to_string(profile)?)
    }
}
