//! Class renaming
//!
//! Renamed classes are copied under their new name. The old entry is kept
//! so profiles that still refer to the legacy name keep resolving.

use std::collections::BTreeMap;
use tracing::debug;

use crate::config::Rules;
use crate::profile::{ClassDefinition, Profile};

/// Substitute renamed class names in every input's type list
fn rename_input_types(definition: &mut ClassDefinition, rules: &Rules) {
    for input in definition.inputs.iter_mut() {
        for t in input.types.iter_mut() {
            if let Some(new_name) = rules.renamed(t) {
                *t = new_name.to_string();
            }
        }
        input.types.sort();
        input.types.dedup();
    }
}

/// Apply the rename table and seal the definitions into a [`Profile`]
///
/// For each renamed class present in `definitions`, the copy under the new
/// name has the old name replaced in its `hierarchy`. Input types are
/// rewritten on both the legacy and the renamed definition. Rename sources
/// with no definition are ignored.
pub fn apply_mappings(mut definitions: BTreeMap<String, ClassDefinition>, rules: &Rules) -> Profile {
    let mut aliases = BTreeMap::new();

    for (old_name, new_name) in rules.renames() {
        let Some(legacy) = definitions.get_mut(old_name) else {
            continue;
        };
        rename_input_types(legacy, rules);

        let mut renamed = legacy.clone();
        renamed.name = new_name.to_string();
        for h in renamed.hierarchy.iter_mut() {
            if *h == old_name {
                *h = new_name.to_string();
            }
        }

        if definitions.insert(new_name.to_string(), renamed).is_some() {
            debug!(old_name, new_name, "rename replaced an existing definition");
        }
        aliases.insert(old_name.to_string(), new_name.to_string());
    }

    Profile::new(definitions, aliases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfileConfig;
    use crate::profile::InputDefinition;

    fn input(name: &str, types: &[&str]) -> InputDefinition {
        InputDefinition {
            id: format!("http://schema.org/{}", name),
            name: name.to_string(),
            label: Some(name.to_string()),
            help: None,
            required: false,
            multiple: true,
            hide: false,
            readonly: false,
            types: types.iter().map(|t| t.to_string()).collect(),
            values: None,
        }
    }

    fn class(name: &str, hierarchy: &[&str], inputs: Vec<InputDefinition>) -> ClassDefinition {
        ClassDefinition {
            id: format!("http://schema.org/{}", name),
            name: name.to_string(),
            help: Some(format!("A {}.", name)),
            sub_class_of: hierarchy
                .iter()
                .rev()
                .nth(1)
                .map(|p| vec![p.to_string()])
                .unwrap_or_default(),
            inputs,
            hierarchy: hierarchy.iter().map(|h| h.to_string()).collect(),
        }
    }

    fn sample() -> BTreeMap<String, ClassDefinition> {
        let mut defs = BTreeMap::new();
        defs.insert("Thing".to_string(), class("Thing", &["Thing"], vec![]));
        defs.insert(
            "CreativeWork".to_string(),
            class(
                "CreativeWork",
                &["Thing", "CreativeWork"],
                vec![input("associatedMedia", &["MediaObject"])],
            ),
        );
        defs.insert(
            "MediaObject".to_string(),
            class(
                "MediaObject",
                &["Thing", "CreativeWork", "MediaObject"],
                vec![
                    input("associatedMedia", &["MediaObject"]),
                    input("encodingFormat", &["Text", "URL"]),
                    input("hasPart", &["File", "MediaObject", "Periodical"]),
                ],
            ),
        );
        defs
    }

    #[test]
    fn test_rename_keeps_both_keys() {
        let rules = ProfileConfig::default().rules().unwrap();
        let profile = apply_mappings(sample(), &rules);

        assert!(profile.contains("MediaObject"));
        assert!(profile.contains("File"));

        let file = profile.get("File").unwrap();
        assert_eq!(file.name, "File");
        assert_eq!(file.hierarchy, vec!["Thing", "CreativeWork", "File"]);
        for input in &file.inputs {
            assert!(!input.types.iter().any(|t| t == "MediaObject"));
        }
        assert_eq!(
            file.input("hasPart").unwrap().types,
            vec!["File", "Journal"]
        );

        let legacy = profile.legacy("MediaObject").unwrap();
        assert_eq!(legacy.name, "MediaObject");
        assert_eq!(legacy.hierarchy.last().unwrap(), "MediaObject");
        assert_eq!(legacy.input("associatedMedia").unwrap().types, vec!["File"]);

        assert_eq!(profile.canonical("MediaObject").unwrap().name, "File");
    }

    #[test]
    fn test_untouched_classes_keep_types() {
        let rules = ProfileConfig::default().rules().unwrap();
        let profile = apply_mappings(sample(), &rules);

        let creative_work = profile.get("CreativeWork").unwrap();
        assert_eq!(
            creative_work.input("associatedMedia").unwrap().types,
            vec!["MediaObject"]
        );
    }

    #[test]
    fn test_absent_rename_source_adds_nothing() {
        let rules = ProfileConfig::default().rules().unwrap();
        let profile = apply_mappings(sample(), &rules);

        assert!(!profile.contains("Journal"));
        assert!(!profile.contains("RepositoryObject"));
        assert_eq!(profile.len(), 4);
        assert_eq!(profile.aliases().count(), 1);
    }
}
