//! Profile data model
//!
//! The profile maps class names to [`ClassDefinition`]s, each listing the
//! [`InputDefinition`]s a metadata editor offers for that class.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::normalize::Entity;

/// One editable field of a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDefinition {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    pub required: bool,
    pub multiple: bool,
    pub hide: bool,
    pub readonly: bool,
    /// Accepted value types
    #[serde(rename = "type")]
    pub types: Vec<String>,
    /// Selectable values when a type is an enumeration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDefinition {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    pub sub_class_of: Vec<String>,
    pub inputs: Vec<InputDefinition>,
    /// Ancestor chain, root first and this class last
    pub hierarchy: Vec<String>,
}

impl ClassDefinition {
    /// Fresh definition for a class entity, before hierarchy and joins
    pub fn from_entity(entity: &Entity, name: &str) -> Self {
        Self {
            id: entity.id.clone(),
            name: name.to_string(),
            help: entity.comment.clone(),
            sub_class_of: entity.domain.clone(),
            inputs: vec![],
            hierarchy: entity.domain.clone(),
        }
    }

    pub fn input(&self, name: &str) -> Option<&InputDefinition> {
        self.inputs.iter().find(|i| i.name == name)
    }
}

/// The finished profile
///
/// Renamed classes stay reachable under their legacy name: both names are
/// keys of the definition map, and `aliases` records which one is canonical.
/// Serializes as the plain name -> definition map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    definitions: BTreeMap<String, ClassDefinition>,
    /// legacy name -> canonical name
    aliases: BTreeMap<String, String>,
}

impl Profile {
    pub fn new(
        definitions: BTreeMap<String, ClassDefinition>,
        aliases: BTreeMap<String, String>,
    ) -> Self {
        Self {
            definitions,
            aliases,
        }
    }

    /// The definition stored under exactly this key
    pub fn get(&self, name: &str) -> Option<&ClassDefinition> {
        self.definitions.get(name)
    }

    /// Resolve a name to its canonical definition, following legacy aliases
    pub fn canonical(&self, name: &str) -> Option<&ClassDefinition> {
        self.definitions.get(self.canonical_name(name))
    }

    /// The definition retained under a legacy name; `None` if `alias` was never renamed
    pub fn legacy(&self, alias: &str) -> Option<&ClassDefinition> {
        if self.aliases.contains_key(alias) {
            self.definitions.get(alias)
        } else {
            None
        }
    }

    fn canonical_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    /// (legacy, canonical) name pairs
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ClassDefinition)> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }
}

impl Serialize for Profile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.definitions.serialize(serializer)
    }
}
