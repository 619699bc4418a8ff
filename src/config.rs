//! Rule tables that shape the profile
//!
//! [`ProfileConfig`] is the serialized form (TOML). It is checked and
//! indexed into [`Rules`] before a build starts, so a bad table fails the
//! run up front instead of producing a half-renamed profile.
//!
//! Property identifiers must be written the way the vocabulary expands
//! them. The schema.org vocabulary file uses `http://schema.org/`, not https.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::ProfileError;
use crate::vocab::{ANY_TYPE, SELECT_TYPE};

/// Replace range types of one property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapRule {
    pub property: String,
    /// Current type name -> replacement
    pub types: BTreeMap<String, String>,
}

/// Accept additional types on one property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraClassesRule {
    pub property: String,
    pub classes: Vec<String>,
}

/// Rename a class in the final profile, keeping the old name as a legacy alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRename {
    pub from: String,
    pub to: String,
}

/// Rule tables
///
/// [`ProfileConfig::default`] is the built-in rule set. A table left out of
/// a TOML file is empty, not the built-in one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Properties that take a single value
    #[serde(default)]
    pub singular_properties: Vec<String>,
    /// Value types that are not entity classes
    #[serde(default)]
    pub simple_types: Vec<String>,
    #[serde(default)]
    pub remap: Vec<RemapRule>,
    #[serde(default)]
    pub extra_classes: Vec<ExtraClassesRule>,
    #[serde(default)]
    pub rename: Vec<ClassRename>,
}

fn remap_rule(property: &str, types: &[(&str, &str)]) -> RemapRule {
    RemapRule {
        property: format!("http://schema.org/{}", property),
        types: types
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect(),
    }
}

fn rename(from: &str, to: &str) -> ClassRename {
    ClassRename {
        from: from.to_string(),
        to: to.to_string(),
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        let text_area = [("Text", "TextArea")];
        Self {
            singular_properties: vec![
                "http://schema.org/name".to_string(),
                "https://schema.org/name".to_string(),
            ],
            simple_types: [
                "Boolean", "Date", "DateTime", "Float", "Geometry", "Integer", "Number", "Text",
                "TextArea", "Time", "URL", "Value", ANY_TYPE, SELECT_TYPE,
            ]
            .iter()
            .map(|t| t.to_string())
            .collect(),
            remap: vec![
                remap_rule(
                    "description",
                    &[("Text", "TextArea"), ("TextObject", "TextArea")],
                ),
                remap_rule("disambiguatingDescription", &text_area),
                remap_rule("abstract", &text_area),
                remap_rule("citation", &text_area),
                remap_rule("comment", &text_area),
                remap_rule("conditionsOfAccess", &text_area),
                remap_rule("creditText", &text_area),
                remap_rule("temporal", &text_area),
                remap_rule("text", &text_area),
                remap_rule(
                    "geo",
                    &[("GeoCoordinates", "Geometry"), ("GeoShape", "Geometry")],
                ),
            ],
            extra_classes: vec![ExtraClassesRule {
                property: "http://schema.org/hasPart".to_string(),
                classes: vec![
                    "File".to_string(),
                    "Dataset".to_string(),
                    "RepositoryCollection".to_string(),
                    "RepositoryObject".to_string(),
                    ANY_TYPE.to_string(),
                ],
            }],
            rename: vec![
                rename("MediaObject", "File"),
                rename("Periodical", "Journal"),
                rename("Object", "RepositoryObject"),
                rename("Collection", "RepositoryCollection"),
            ],
        }
    }
}

impl ProfileConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ProfileError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load rule tables from a TOML file
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        if !path.is_file() {
            return Err(ProfileError::InvalidPath(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path).map_err(|e| ProfileError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check and index the tables
    pub fn rules(&self) -> Result<Rules, ProfileError> {
        Rules::try_from(self.clone())
    }
}

fn invalid(message: String) -> ProfileError {
    ProfileError::InvalidConfig(message)
}

fn require_name(value: &str, what: &str) -> Result<(), ProfileError> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{} must not be empty", what)));
    }
    Ok(())
}

/// Validated, indexed rule tables
#[derive(Debug, Clone, Default)]
pub struct Rules {
    singular: HashSet<String>,
    remap: HashMap<String, BTreeMap<String, String>>,
    extra_classes: HashMap<String, Vec<String>>,
    renames: BTreeMap<String, String>,
}

impl TryFrom<ProfileConfig> for Rules {
    type Error = ProfileError;

    fn try_from(config: ProfileConfig) -> Result<Self, Self::Error> {
        let simple_types: HashSet<String> = config.simple_types.into_iter().collect();

        let mut remap = HashMap::new();
        for rule in config.remap {
            require_name(&rule.property, "remap property")?;
            for (from, to) in &rule.types {
                require_name(from, "remap source type")?;
                require_name(to, "remap target type")?;
                if !simple_types.is_empty() && !simple_types.contains(to) {
                    return Err(invalid(format!(
                        "remap target '{}' for '{}' is not a simple type",
                        to, rule.property
                    )));
                }
            }
            if remap.insert(rule.property.clone(), rule.types).is_some() {
                return Err(invalid(format!(
                    "duplicate remap rule for '{}'",
                    rule.property
                )));
            }
        }

        let mut extra_classes = HashMap::new();
        for rule in config.extra_classes {
            require_name(&rule.property, "extra classes property")?;
            for class in &rule.classes {
                require_name(class, "extra class")?;
            }
            if extra_classes
                .insert(rule.property.clone(), rule.classes)
                .is_some()
            {
                return Err(invalid(format!(
                    "duplicate extra classes rule for '{}'",
                    rule.property
                )));
            }
        }

        let mut renames = BTreeMap::new();
        for rule in &config.rename {
            require_name(&rule.from, "rename source")?;
            require_name(&rule.to, "rename target")?;
            if rule.from == rule.to {
                return Err(invalid(format!("class '{}' renamed to itself", rule.from)));
            }
            if renames.insert(rule.from.clone(), rule.to.clone()).is_some() {
                return Err(invalid(format!("class '{}' renamed twice", rule.from)));
            }
        }
        let mut targets = HashSet::new();
        if let Some(shared) = renames.values().find(|to| !targets.insert(to.as_str())) {
            return Err(invalid(format!(
                "more than one class renamed to '{}'",
                shared
            )));
        }
        if let Some(chained) = renames.values().find(|to| renames.contains_key(*to)) {
            return Err(invalid(format!(
                "rename target '{}' is itself renamed",
                chained
            )));
        }

        Ok(Self {
            singular: config.singular_properties.into_iter().collect(),
            remap,
            extra_classes,
            renames,
        })
    }
}

impl Rules {
    /// Whether the property takes a single value
    pub fn is_singular(&self, property_id: &str) -> bool {
        self.singular.contains(property_id)
    }

    /// Replacement for `type_name` on `property_id`, if any
    pub fn remap(&self, property_id: &str, type_name: &str) -> Option<&str> {
        self.remap
            .get(property_id)
            .and_then(|types| types.get(type_name))
            .map(String::as_str)
    }

    pub fn has_remap(&self, property_id: &str) -> bool {
        self.remap.contains_key(property_id)
    }

    pub fn extra_classes(&self, property_id: &str) -> Option<&[String]> {
        self.extra_classes.get(property_id).map(Vec::as_slice)
    }

    /// New name of a renamed class
    pub fn renamed(&self, class: &str) -> Option<&str> {
        self.renames.get(class).map(String::as_str)
    }

    /// (old, new) class name pairs in old-name order
    pub fn renames(&self) -> impl Iterator<Item = (&str, &str)> {
        self.renames
            .iter()
            .map(|(from, to)| (from.as_str(), to.as_str()))
    }
}
