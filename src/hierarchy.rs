//! Class hierarchies
//!
//! Each class gets its ancestor chain, root first and itself last, so the
//! metadata editor can collect inputs from every ancestor. Parents are
//! looked up by name in the definition map; a parent without a definition
//! ends its branch but still appears in the chain.

use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::warn;

use crate::profile::ClassDefinition;

/// Ancestor lists resolved so far, shared across classes
///
/// An ancestor list runs nearest first, root last, holding each name once:
/// the preorder walk over declared parents with only the last occurrence
/// of every name kept. Lists are cached per class unless a cycle was met
/// while resolving them, since those depend on where the walk started.
struct Resolver<'a> {
    definitions: &'a BTreeMap<String, ClassDefinition>,
    resolved: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> Resolver<'a> {
    fn new(definitions: &'a BTreeMap<String, ClassDefinition>) -> Self {
        Self {
            definitions,
            resolved: HashMap::new(),
        }
    }

    /// Ancestors of `class`, and whether they were reached without a cycle
    ///
    /// `path` holds the classes currently being expanded; a parent already on
    /// it closes a cycle and is recorded but not expanded again.
    fn ancestors(&mut self, class: &'a str, path: &mut Vec<&'a str>) -> (Vec<&'a str>, bool) {
        if let Some(cached) = self.resolved.get(class) {
            return (cached.clone(), true);
        }
        let definitions = self.definitions;
        let Some(definition) = definitions.get(class) else {
            return (vec![], true);
        };

        let mut acyclic = true;
        let mut segments = Vec::with_capacity(definition.sub_class_of.len());
        for parent in &definition.sub_class_of {
            let parent = parent.as_str();
            if path.contains(&parent) {
                warn!(class, parent, "cycle in class hierarchy, not following parent");
                acyclic = false;
                segments.push(vec![parent]);
                continue;
            }
            path.push(parent);
            let (above, parent_acyclic) = self.ancestors(parent, path);
            path.pop();
            acyclic &= parent_acyclic;

            let mut segment = Vec::with_capacity(above.len() + 1);
            if !above.contains(&parent) {
                segment.push(parent);
            }
            segment.extend(above);
            segments.push(segment);
        }

        // A name reached through several parents keeps its last position.
        let mut seen = HashSet::new();
        let mut merged: Vec<&'a str> = segments
            .into_iter()
            .rev()
            .flat_map(|segment| segment.into_iter().rev())
            .filter(|name| seen.insert(*name))
            .collect();
        merged.reverse();

        if acyclic {
            self.resolved.insert(class, merged.clone());
        }
        (merged, acyclic)
    }

    /// Ancestor chain of one class, root first and the class itself last
    fn hierarchy(&mut self, class: &'a str) -> Vec<String> {
        let mut path = vec![class];
        let (ancestors, _) = self.ancestors(class, &mut path);

        let mut hierarchy: Vec<String> = ancestors
            .into_iter()
            .rev()
            .filter(|name| *name != class)
            .map(String::from)
            .collect();
        hierarchy.push(class.to_string());
        hierarchy
    }
}

/// Ancestor chain of one class
///
/// The preorder list of ancestors is read back to front keeping the first
/// occurrence of each name, which places shared ancestors (ultimately the
/// ontology root) before the branches that reach them.
pub fn class_hierarchy(definitions: &BTreeMap<String, ClassDefinition>, class: &str) -> Vec<String> {
    Resolver::new(definitions).hierarchy(class)
}

/// Fill in `hierarchy` on every definition
pub fn map_class_hierarchies(definitions: &mut BTreeMap<String, ClassDefinition>) {
    let hierarchies: Vec<(String, Vec<String>)> = {
        let snapshot: &BTreeMap<String, ClassDefinition> = definitions;
        let mut resolver = Resolver::new(snapshot);
        snapshot
            .keys()
            .map(|name| (name.clone(), resolver.hierarchy(name)))
            .collect()
    };

    for (name, hierarchy) in hierarchies {
        if let Some(definition) = definitions.get_mut(&name) {
            definition.hierarchy = hierarchy;
        }
    }
}
