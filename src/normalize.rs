//! Entity normalization
//!
//! Turns raw graph nodes into [`Entity`] records with local names, plain
//! text label/comment and stripped domain/range references. Class and
//! property nodes are validated here; this is the only fail-fast stage.

use serde_json::Value;
use tracing::{debug, error};

use crate::collect::{extract_id, reference_ids, text_value};
use crate::error::ProfileError;
use crate::id::local_name;
use crate::vocab::{
    is_class_tag, is_property_tag, COMMENT, DOMAIN_INCLUDES, LABEL, ONTOLOGY_ROOT_IDS,
    RANGE_INCLUDES, SUBCLASS_OF, TYPE,
};

/// What a node declares itself to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Class,
    Property,
    /// A single other type tag, by local name (enumeration members, datasets, ...)
    Other(String),
    /// A list of type tags, or none at all
    Untyped,
}

impl EntityKind {
    fn of(node: &Value) -> Self {
        match node.get(TYPE) {
            Some(Value::String(tag)) if is_class_tag(tag) => EntityKind::Class,
            Some(Value::String(tag)) if is_property_tag(tag) => EntityKind::Property,
            Some(Value::String(tag)) => match local_name(tag) {
                Some(name) => EntityKind::Other(name.to_string()),
                None => EntityKind::Untyped,
            },
            _ => EntityKind::Untyped,
        }
    }
}

/// A normalized graph node
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    pub kind: EntityKind,
    /// Local name of `id`; `None` when the identifier has nothing left after stripping
    pub name: Option<String>,
    pub label: Option<String>,
    pub comment: Option<String>,
    /// Parent classes for a class, classes it applies to for a property
    pub domain: Vec<String>,
    /// Accepted value types for a property
    pub range: Vec<String>,
}

impl Entity {
    pub fn is_class(&self) -> bool {
        self.kind == EntityKind::Class
    }

    pub fn is_property(&self) -> bool {
        self.kind == EntityKind::Property
    }

    /// Name used in log lines and diagnostics
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Local names of the identifiers a relation value references
fn stripped_references(value: &Value) -> Vec<String> {
    reference_ids(value)
        .filter_map(local_name)
        .map(String::from)
        .collect()
}

fn relation<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    node.get(key).filter(|v| !v.is_null())
}

/// Normalize a single node
pub fn normalize_entity(node: &Value) -> Result<Entity, ProfileError> {
    let id = extract_id(node).unwrap_or_default().to_string();
    let kind = EntityKind::of(node);

    let mut entity = Entity {
        name: local_name(&id).map(String::from),
        label: node.get(LABEL).and_then(text_value),
        comment: node.get(COMMENT).and_then(text_value),
        domain: vec![],
        range: vec![],
        kind,
        id,
    };

    match entity.kind {
        EntityKind::Class => match relation(node, SUBCLASS_OF) {
            Some(parents) => entity.domain = stripped_references(parents),
            None if ONTOLOGY_ROOT_IDS.contains(&entity.id.as_str()) => {}
            None => return Err(ProfileError::MissingSubclassRelation { id: entity.id }),
        },
        EntityKind::Property => {
            match (relation(node, DOMAIN_INCLUDES), relation(node, RANGE_INCLUDES)) {
                (Some(domain), Some(range)) => {
                    entity.domain = stripped_references(domain);
                    entity.range = stripped_references(range);
                }
                _ => return Err(ProfileError::MissingDomainRangeRelation { id: entity.id }),
            }
        }
        EntityKind::Other(_) | EntityKind::Untyped => {}
    }

    Ok(entity)
}

/// Normalize every node of a graph
///
/// Every failing node is reported; if any fails the whole batch is rejected
/// with [`ProfileError::InvalidVocabulary`].
pub fn normalize_entities(graph: &[Value]) -> Result<Vec<Entity>, ProfileError> {
    let mut entities = Vec::with_capacity(graph.len());
    let mut errors = Vec::new();

    for node in graph {
        if extract_id(node).is_none() {
            debug!("skipping graph node without @id");
            continue;
        }
        match normalize_entity(node) {
            Ok(entity) => entities.push(entity),
            Err(e) => {
                error!("{}", e);
                errors.push(e);
            }
        }
    }

    if errors.is_empty() {
        Ok(entities)
    } else {
        error!(
            failed = errors.len(),
            "critical errors in the input vocabulary, can't continue"
        );
        Err(ProfileError::InvalidVocabulary(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLLECTION_COMMENT: &str = "A Collection is a group of resources.";

    #[test]
    fn test_class_without_parent_fails() {
        let node = json!({
            "@id": "pcdm:Collection",
            "@type": "rdfs:Class",
            "rdfs:comment": COLLECTION_COMMENT,
            "rdfs:label": "Collection"
        });
        assert!(matches!(
            normalize_entity(&node),
            Err(ProfileError::MissingSubclassRelation { .. })
        ));
    }

    #[test]
    fn test_normalize_class() {
        let node = json!({
            "@id": "pcdm:Collection",
            "@type": "rdfs:Class",
            "rdfs:comment": COLLECTION_COMMENT,
            "rdfs:label": "Collection",
            "rdfs:subClassOf": {"@id": "https://schema.org/Thing"}
        });
        let entity = normalize_entity(&node).unwrap();
        assert_eq!(entity.kind, EntityKind::Class);
        assert_eq!(entity.name.as_deref(), Some("Collection"));
        assert_eq!(entity.label.as_deref(), Some("Collection"));
        assert_eq!(entity.comment.as_deref(), Some(COLLECTION_COMMENT));
        assert_eq!(entity.domain, vec!["Thing"]);
    }

    #[test]
    fn test_ontology_root_needs_no_parent() {
        let node = json!({
            "@id": "http://schema.org/Thing",
            "@type": "rdfs:Class",
            "rdfs:label": "Thing"
        });
        let entity = normalize_entity(&node).unwrap();
        assert!(entity.domain.is_empty());
    }

    #[test]
    fn test_property_with_unprefixed_keys_fails() {
        let node = json!({
            "@id": "pcdm:fileOf",
            "@type": "rdf:Property",
            "domainIncludes": {"@id": "https://schema.org/File"},
            "rangeIncludes": {"@id": "pcdm:Object"},
            "rdfs:label": "fileOf"
        });
        assert!(matches!(
            normalize_entity(&node),
            Err(ProfileError::MissingDomainRangeRelation { .. })
        ));
    }

    #[test]
    fn test_property_missing_range_fails() {
        let node = json!({
            "@id": "pcdm:fileOf",
            "@type": "rdf:Property",
            "schema:domainIncludes": {"@id": "https://schema.org/File"}
        });
        assert!(normalize_entity(&node).is_err());
    }

    #[test]
    fn test_normalize_property() {
        let node = json!({
            "@id": "pcdm:fileOf",
            "@type": "rdf:Property",
            "schema:domainIncludes": {"@id": "https://schema.org/File"},
            "schema:rangeIncludes": [{"@id": "pcdm:Object"}, {"@id": "schema:Text"}],
            "rdfs:comment": "Links from a File to its containing Object.",
            "rdfs:label": {"@language": "en", "@value": "fileOf"}
        });
        let entity = normalize_entity(&node).unwrap();
        assert_eq!(entity.kind, EntityKind::Property);
        assert_eq!(entity.name.as_deref(), Some("fileOf"));
        assert_eq!(entity.label.as_deref(), Some("fileOf"));
        assert_eq!(entity.domain, vec!["File"]);
        assert_eq!(entity.range, vec!["Object", "Text"]);
    }

    #[test]
    fn test_other_nodes_pass_through() {
        let member = normalize_entity(&json!({
            "@id": "http://schema.org/Monday",
            "@type": "schema:DayOfWeek",
            "rdfs:label": "Monday"
        }))
        .unwrap();
        assert_eq!(member.kind, EntityKind::Other("DayOfWeek".to_string()));

        let data_type = normalize_entity(&json!({
            "@id": "http://schema.org/Text",
            "@type": ["schema:DataType", "rdfs:Class"]
        }))
        .unwrap();
        assert_eq!(data_type.kind, EntityKind::Untyped);
    }

    #[test]
    fn test_batch_collects_every_failure() {
        let graph = vec![
            json!({"@id": "schema:Thing", "@type": "rdfs:Class"}),
            json!({"@id": "pcdm:Collection", "@type": "rdfs:Class"}),
            json!({"@id": "pcdm:fileOf", "@type": "rdf:Property"}),
            json!({"@id": "schema:Person", "@type": "rdfs:Class", "rdfs:subClassOf": {"@id": "schema:Thing"}}),
        ];
        match normalize_entities(&graph) {
            Err(ProfileError::InvalidVocabulary(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected InvalidVocabulary, got {:?}", other),
        }
    }

    #[test]
    fn test_batch_success() {
        let graph = vec![
            json!({"@id": "schema:Thing", "@type": "rdfs:Class"}),
            json!({"@type": "rdfs:Class"}),
            json!({"@id": "schema:Person", "@type": "rdfs:Class", "rdfs:subClassOf": {"@id": "schema:Thing"}}),
        ];
        let entities = normalize_entities(&graph).unwrap();
        assert_eq!(entities.len(), 2);
    }
}
