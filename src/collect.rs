//! Raw vocabulary documents
//!
//! Walks a JSON-LD document's `@graph`, reads `@id`/`@type` and reference
//! values, and locates the root dataset of RO-Crate packaged extensions.

use serde_json::Value;

use crate::error::ProfileError;
use crate::id::{expand, NamespaceContext};
use crate::vocab::{ABOUT, CONTEXT, DESCRIPTOR_TYPE, GRAPH, ID, METADATA_DESCRIPTOR_ID, TYPE, VALUE};

/// A vocabulary document split into its namespace context and node list
#[derive(Debug, Clone)]
pub struct VocabularyDocument {
    /// Where the document came from, for diagnostics
    pub source: String,
    pub context: NamespaceContext,
    pub graph: Vec<Value>,
}

impl VocabularyDocument {
    /// Split a parsed JSON-LD document
    ///
    /// A missing `@context` gives an empty context; a missing or non-array
    /// `@graph` is a structural error.
    pub fn from_json(doc: Value, source: impl Into<String>) -> Result<Self, ProfileError> {
        let source = source.into();
        let mut obj = match doc {
            Value::Object(obj) => obj,
            _ => {
                return Err(ProfileError::InvalidStructure(format!(
                    "{}: document is not a JSON object",
                    source
                )))
            }
        };

        let context = obj
            .get(CONTEXT)
            .map(NamespaceContext::from_json)
            .unwrap_or_default();

        let graph = match obj.remove(GRAPH) {
            Some(Value::Array(graph)) => graph,
            _ => {
                return Err(ProfileError::InvalidStructure(format!(
                    "{}: missing @graph array",
                    source
                )))
            }
        };

        Ok(Self {
            source,
            context,
            graph,
        })
    }

    /// Parse a document from its JSON text
    pub fn parse(content: &str, source: impl Into<String>) -> Result<Self, ProfileError> {
        let doc: Value = serde_json::from_str(content)?;
        Self::from_json(doc, source)
    }

    /// Rewrite every node's `@id` to its fully qualified form
    pub fn expand_identifiers(&mut self) {
        for node in self.graph.iter_mut() {
            let expanded = match extract_id(node) {
                Some(id) => expand(id, &self.context),
                None => continue,
            };
            if let Some(obj) = node.as_object_mut() {
                obj.insert(ID.to_string(), Value::String(expanded));
            }
        }
    }

    /// The root dataset referenced by the metadata descriptor
    pub fn root_dataset(&self) -> Result<&Value, ProfileError> {
        find_root_dataset(&self.graph).ok_or_else(|| ProfileError::MissingRootDataset {
            source_name: self.source.clone(),
        })
    }
}

/// Extract @id from an entity
pub fn extract_id(entity: &Value) -> Option<&str> {
    entity.get(ID).and_then(|v| v.as_str())
}

/// Extract @type as a list of type names
pub fn extract_types(entity: &Value) -> Vec<String> {
    match entity.get(TYPE) {
        Some(Value::String(t)) => vec![t.clone()],
        Some(Value::Array(arr)) => arr
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        _ => vec![],
    }
}

/// Check if an entity has a specific @type
pub fn has_type(entity: &Value, type_name: &str) -> bool {
    extract_types(entity).iter().any(|t| t == type_name)
}

/// Check if an entity is the metadata descriptor
pub fn is_metadata_descriptor(entity: &Value) -> bool {
    extract_id(entity)
        .map(|id| id.ends_with(METADATA_DESCRIPTOR_ID))
        .unwrap_or(false)
        && has_type(entity, DESCRIPTOR_TYPE)
}

/// Find the root dataset: the node the metadata descriptor is `about`
pub fn find_root_dataset(graph: &[Value]) -> Option<&Value> {
    let descriptor = graph.iter().find(|e| is_metadata_descriptor(e))?;
    let root_id = descriptor.get(ABOUT).and_then(|about| reference_ids(about).next())?;
    graph.iter().find(|e| extract_id(e) == Some(root_id))
}

/// Identifiers referenced by a relation value
///
/// Accepts `{"@id": ..}`, a bare string, or an array of either.
/// References without an identifier are skipped.
pub fn reference_ids(value: &Value) -> Box<dyn Iterator<Item = &str> + '_> {
    match value {
        Value::Object(obj) => Box::new(obj.get(ID).and_then(|v| v.as_str()).into_iter()),
        Value::String(s) => Box::new(std::iter::once(s.as_str())),
        Value::Array(arr) => Box::new(arr.iter().flat_map(reference_ids)),
        _ => Box::new(std::iter::empty()),
    }
}

/// Plain text of a human-readable value
///
/// Unwraps `{"@language": .., "@value": ..}`; for arrays the first usable
/// value wins.
pub fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get(VALUE).and_then(text_value),
        Value::Array(arr) => arr.iter().find_map(text_value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extension_graph() -> Vec<Value> {
        vec![
            json!({
                "@id": "ro-crate-metadata.json",
                "@type": "CreativeWork",
                "conformsTo": {"@id": "https://w3id.org/ro/crate/1.1"},
                "about": {"@id": "./"}
            }),
            json!({
                "@id": "./",
                "@type": "Dataset",
                "name": "My Research Object Crate",
                "mentions": [{"@id": "pcdm:Collection"}, {"@id": "pcdm:fileOf"}]
            }),
            json!({
                "@id": "pcdm:Collection",
                "@type": "rdfs:Class",
                "rdfs:subClassOf": {"@id": "schema:Thing"}
            }),
        ]
    }

    #[test]
    fn test_extract_types() {
        let single = json!({"@type": "rdfs:Class"});
        assert_eq!(extract_types(&single), vec!["rdfs:Class"]);

        let multiple = json!({"@type": ["schema:DataType", "rdfs:Class"]});
        assert_eq!(extract_types(&multiple), vec!["schema:DataType", "rdfs:Class"]);
    }

    #[test]
    fn test_find_root_dataset() {
        let graph = extension_graph();
        let root = find_root_dataset(&graph).unwrap();
        assert_eq!(extract_id(root), Some("./"));
        assert_eq!(root["mentions"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_root_dataset() {
        let graph = extension_graph().split_off(1);
        assert!(find_root_dataset(&graph).is_none());

        let doc = VocabularyDocument {
            source: "broken".to_string(),
            context: NamespaceContext::default(),
            graph,
        };
        assert!(matches!(
            doc.root_dataset(),
            Err(ProfileError::MissingRootDataset { .. })
        ));
    }

    #[test]
    fn test_descriptor_about_dangling() {
        let mut graph = extension_graph();
        graph.remove(1);
        assert!(find_root_dataset(&graph).is_none());
    }

    #[test]
    fn test_document_requires_graph() {
        let result = VocabularyDocument::from_json(json!({"@context": {}}), "schema.org.jsonld");
        assert!(matches!(result, Err(ProfileError::InvalidStructure(_))));
    }

    #[test]
    fn test_expand_identifiers() {
        let mut doc = VocabularyDocument::from_json(
            json!({
                "@context": {"pcdm": "https://pcdm.org/models#"},
                "@graph": extension_graph()
            }),
            "pcdm",
        )
        .unwrap();
        doc.expand_identifiers();

        assert_eq!(extract_id(&doc.graph[0]), Some("ro-crate-metadata.json"));
        assert_eq!(extract_id(&doc.graph[1]), Some("./"));
        assert_eq!(
            extract_id(&doc.graph[2]),
            Some("https://pcdm.org/models#Collection")
        );
    }

    #[test]
    fn test_reference_ids() {
        let value = json!([{"@id": "schema:Thing"}, "schema:Person", {"name": "no id"}]);
        let ids: Vec<&str> = reference_ids(&value).collect();
        assert_eq!(ids, vec!["schema:Thing", "schema:Person"]);
    }

    #[test]
    fn test_text_value() {
        assert_eq!(text_value(&json!("Person")), Some("Person".to_string()));
        assert_eq!(
            text_value(&json!({"@language": "en", "@value": "Person"})),
            Some("Person".to_string())
        );
        assert_eq!(
            text_value(&json!([{"@language": "en", "@value": "A person"}])),
            Some("A person".to_string())
        );
        assert_eq!(text_value(&json!(42)), None);
    }
}
