//! Join properties into the classes of their domain
//!
//! Every property becomes an [`InputDefinition`] on each class it names in
//! its domain. Range types are rewritten by the rule tables on the way:
//! remapped, widened from `Thing` to `ANY`, extended with extra classes,
//! and tagged as a select when a type is an enumeration.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::config::Rules;
use crate::error::ProfileError;
use crate::normalize::Entity;
use crate::profile::{ClassDefinition, InputDefinition};
use crate::vocab::{ANY_TYPE, SELECT_TYPE, THING};

/// Outcome of joining properties into classes
#[derive(Debug, Default)]
pub struct JoinReport {
    /// Inputs attached to a class
    pub joined: usize,
    /// Joins skipped because the domain class has no definition
    pub skipped: Vec<ProfileError>,
}

/// Build the input definition a property contributes to each of its classes
pub fn input_definition(
    property: &Entity,
    name: &str,
    rules: &Rules,
    enumerations: &BTreeMap<String, Vec<String>>,
) -> InputDefinition {
    let mut types = property.range.clone();

    if rules.has_remap(&property.id) {
        types = types
            .into_iter()
            .map(|t| match rules.remap(&property.id, &t) {
                Some(replacement) => replacement.to_string(),
                None => t,
            })
            .collect();
    }

    types = types
        .into_iter()
        .flat_map(|t| {
            if t == THING {
                vec![t, ANY_TYPE.to_string()]
            } else {
                vec![t]
            }
        })
        .collect();

    if let Some(extra) = rules.extra_classes(&property.id) {
        types.extend(extra.iter().cloned());
        types.sort();
    }

    // When several types are enumerations the last one supplies the values.
    let mut values = None;
    for t in &types {
        if let Some(members) = enumerations.get(t) {
            values = Some(members.clone());
        }
    }
    if values.is_some() {
        types.push(SELECT_TYPE.to_string());
    }

    types.sort();
    types.dedup();

    InputDefinition {
        id: property.id.clone(),
        name: name.to_string(),
        label: property.label.clone(),
        help: property.comment.clone(),
        required: false,
        multiple: !rules.is_singular(&property.id),
        hide: false,
        readonly: false,
        types,
        values,
    }
}

/// Attach every property to the classes of its domain
///
/// A domain class without a definition skips that one join; the rest of
/// the property's domain and all other properties are still joined.
/// Inputs end up sorted by property name.
pub fn map_properties_to_classes(
    definitions: &mut BTreeMap<String, ClassDefinition>,
    properties: &[Entity],
    enumerations: &BTreeMap<String, Vec<String>>,
    rules: &Rules,
) -> JoinReport {
    let mut report = JoinReport::default();

    for property in properties {
        let Some(name) = property.name.as_deref() else {
            debug!(id = %property.id, "property without a local name, not joined");
            continue;
        };
        let input = input_definition(property, name, rules, enumerations);

        for class in &property.domain {
            match definitions.get_mut(class) {
                Some(definition) => {
                    definition.inputs.push(input.clone());
                    report.joined += 1;
                }
                None => {
                    let error = ProfileError::UnknownClass {
                        property: property.id.clone(),
                        class: class.clone(),
                    };
                    warn!("{}", error);
                    report.skipped.push(error);
                }
            }
        }
    }

    for definition in definitions.values_mut() {
        definition.inputs.sort_by(|a, b| a.name.cmp(&b.name));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfileConfig;
    use crate::normalize::EntityKind;

    fn property(id: &str, domain: &[&str], range: &[&str]) -> Entity {
        Entity {
            id: id.to_string(),
            kind: EntityKind::Property,
            name: crate::id::local_name(id).map(String::from),
            label: crate::id::local_name(id).map(String::from),
            comment: Some(format!("The {} property.", id)),
            domain: domain.iter().map(|d| d.to_string()).collect(),
            range: range.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn class(name: &str) -> ClassDefinition {
        ClassDefinition {
            id: format!("http://schema.org/{}", name),
            name: name.to_string(),
            help: None,
            sub_class_of: vec![],
            inputs: vec![],
            hierarchy: vec![],
        }
    }

    fn definitions(names: &[&str]) -> BTreeMap<String, ClassDefinition> {
        names.iter().map(|n| (n.to_string(), class(n))).collect()
    }

    fn rules() -> Rules {
        ProfileConfig::default().rules().unwrap()
    }

    #[test]
    fn test_remap_only_listed_types() {
        let description = property(
            "http://schema.org/description",
            &["Thing"],
            &["Text", "TextObject"],
        );
        let config = ProfileConfig {
            remap: vec![crate::config::RemapRule {
                property: "http://schema.org/description".to_string(),
                types: [("Text".to_string(), "TextArea".to_string())].into(),
            }],
            ..ProfileConfig::default()
        };
        let input = input_definition(
            &description,
            "description",
            &config.rules().unwrap(),
            &BTreeMap::new(),
        );
        assert_eq!(input.types, vec!["TextArea", "TextObject"]);
        assert!(input.multiple);
        assert!(!input.required && !input.hide && !input.readonly);
    }

    #[test]
    fn test_thing_widens_to_any() {
        let about = property("http://schema.org/about", &["CreativeWork"], &["Thing"]);
        let input = input_definition(&about, "about", &rules(), &BTreeMap::new());
        assert_eq!(input.types, vec!["ANY", "Thing"]);
    }

    #[test]
    fn test_extra_classes_sorted_union() {
        let has_part = property(
            "http://schema.org/hasPart",
            &["CreativeWork"],
            &["CreativeWork"],
        );
        let input = input_definition(&has_part, "hasPart", &rules(), &BTreeMap::new());
        assert_eq!(
            input.types,
            vec![
                "ANY",
                "CreativeWork",
                "Dataset",
                "File",
                "RepositoryCollection",
                "RepositoryObject"
            ]
        );
    }

    #[test]
    fn test_singular_name() {
        let name = property("http://schema.org/name", &["Thing"], &["Text"]);
        let input = input_definition(&name, "name", &rules(), &BTreeMap::new());
        assert!(!input.multiple);
    }

    #[test]
    fn test_enumeration_last_match_wins() {
        let mut enumerations = BTreeMap::new();
        enumerations.insert(
            "BookFormatType".to_string(),
            vec!["http://schema.org/EBook".to_string()],
        );
        enumerations.insert(
            "DayOfWeek".to_string(),
            vec![
                "http://schema.org/Monday".to_string(),
                "http://schema.org/Friday".to_string(),
            ],
        );
        let prop = property(
            "http://schema.org/example",
            &["Thing"],
            &["BookFormatType", "DayOfWeek", "Text"],
        );
        let input = input_definition(&prop, "example", &rules(), &enumerations);

        assert_eq!(
            input.values,
            Some(vec![
                "http://schema.org/Monday".to_string(),
                "http://schema.org/Friday".to_string()
            ])
        );
        assert_eq!(
            input.types,
            vec!["BookFormatType", "DayOfWeek", "SelectURL", "Text"]
        );
    }

    #[test]
    fn test_unknown_domain_class_is_contained() {
        let mut defs = definitions(&["Thing", "CreativeWork"]);
        let properties = vec![
            property(
                "http://schema.org/about",
                &["CreativeWork", "Nowhere", "Thing"],
                &["Thing"],
            ),
            property("http://schema.org/alternateName", &["Thing"], &["Text"]),
        ];
        let report = map_properties_to_classes(&mut defs, &properties, &BTreeMap::new(), &rules());

        assert_eq!(report.joined, 3);
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(
            &report.skipped[0],
            ProfileError::UnknownClass { class, .. } if class == "Nowhere"
        ));
        assert!(defs["Thing"].input("about").is_some());
        assert!(defs["CreativeWork"].input("about").is_some());
    }

    #[test]
    fn test_inputs_sorted_by_name() {
        let mut defs = definitions(&["Thing"]);
        let properties = vec![
            property("http://schema.org/url", &["Thing"], &["URL"]),
            property("http://schema.org/description", &["Thing"], &["Text"]),
            property("http://schema.org/name", &["Thing"], &["Text"]),
        ];
        map_properties_to_classes(&mut defs, &properties, &BTreeMap::new(), &rules());

        let names: Vec<&str> = defs["Thing"].inputs.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["description", "name", "url"]);
        assert_eq!(defs["Thing"].inputs[0].types, vec!["TextArea"]);
    }
}
