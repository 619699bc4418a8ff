//! Vocabulary constants
//!
//! Keys, type tags and sentinel identifiers understood by the profile
//! builder, plus the marker types it writes into input definitions.

/// JSON-LD keywords
pub const ID: &str = "@id";
pub const TYPE: &str = "@type";
pub const CONTEXT: &str = "@context";
pub const GRAPH: &str = "@graph";
pub const VALUE: &str = "@value";

/// Type tag of a class node
pub const RDFS_CLASS: &str = "rdfs:Class";

/// Type tag of a property node
pub const RDF_PROPERTY: &str = "rdf:Property";

/// Full-IRI forms of the class and property tags (scheme stripped)
pub const RDFS_CLASS_IRI: &str = "//www.w3.org/2000/01/rdf-schema#Class";
pub const RDF_PROPERTY_IRI: &str = "//www.w3.org/1999/02/22-rdf-syntax-ns#Property";

/// Relational and descriptive keys on class/property nodes
pub const SUBCLASS_OF: &str = "rdfs:subClassOf";
pub const DOMAIN_INCLUDES: &str = "schema:domainIncludes";
pub const RANGE_INCLUDES: &str = "schema:rangeIncludes";
pub const LABEL: &str = "rdfs:label";
pub const COMMENT: &str = "rdfs:comment";

/// Identifiers of the ontology root class; the only class allowed to
/// have no parent
pub const ONTOLOGY_ROOT_IDS: &[&str] = &[
    "schema:Thing",
    "http://schema.org/Thing",
    "https://schema.org/Thing",
];

/// Local name of the generic root type
pub const THING: &str = "Thing";

/// Marker type meaning "any entity type accepted"
pub const ANY_TYPE: &str = "ANY";

/// Marker type appended to inputs whose values come from an enumeration
pub const SELECT_TYPE: &str = "SelectURL";

/// Standard metadata descriptor filename
pub const METADATA_DESCRIPTOR_ID: &str = "ro-crate-metadata.json";

/// Type carried by the metadata descriptor
pub const DESCRIPTOR_TYPE: &str = "CreativeWork";

/// Descriptor property pointing at the root dataset
pub const ABOUT: &str = "about";

/// Whether a type tag names a class, in prefixed or full-IRI form
pub fn is_class_tag(tag: &str) -> bool {
    tag == RDFS_CLASS || strip_scheme(tag) == Some(RDFS_CLASS_IRI)
}

/// Whether a type tag names a property, in prefixed or full-IRI form
pub fn is_property_tag(tag: &str) -> bool {
    tag == RDF_PROPERTY || strip_scheme(tag) == Some(RDF_PROPERTY_IRI)
}

fn strip_scheme(tag: &str) -> Option<&str> {
    tag.strip_prefix("http:").or_else(|| tag.strip_prefix("https:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert!(is_class_tag("rdfs:Class"));
        assert!(is_class_tag("http://www.w3.org/2000/01/rdf-schema#Class"));
        assert!(is_class_tag("https://www.w3.org/2000/01/rdf-schema#Class"));
        assert!(!is_class_tag("schema:Class"));

        assert!(is_property_tag("rdf:Property"));
        assert!(is_property_tag(
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"
        ));
        assert!(!is_property_tag("rdfs:Class"));
    }
}
