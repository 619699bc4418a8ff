//! Partition normalized entities into classes, properties and enumerations

use std::collections::BTreeMap;
use tracing::warn;

use crate::error::Diagnostic;
use crate::normalize::{Entity, EntityKind};

/// Entities of one vocabulary, by role
#[derive(Debug, Default)]
pub struct Extracted {
    pub classes: Vec<Entity>,
    pub properties: Vec<Entity>,
    /// Type name -> identifiers of the nodes typed with it
    pub enumerations: BTreeMap<String, Vec<String>>,
}

/// Split entities by declared type
///
/// Missing labels and comments on classes and properties are reported but
/// never reject an entity. Nodes typed with a list of tags land in no bucket.
pub fn extract(entities: Vec<Entity>, diagnostics: &mut Vec<Diagnostic>) -> Extracted {
    let mut extracted = Extracted::default();

    for entity in entities {
        match entity.kind {
            EntityKind::Class => {
                check_documentation(&entity, diagnostics);
                extracted.classes.push(entity);
            }
            EntityKind::Property => {
                check_documentation(&entity, diagnostics);
                extracted.properties.push(entity);
            }
            EntityKind::Other(ref type_name) => {
                extracted
                    .enumerations
                    .entry(type_name.clone())
                    .or_default()
                    .push(entity.id.clone());
            }
            EntityKind::Untyped => {}
        }
    }

    extracted
}

fn check_documentation(entity: &Entity, diagnostics: &mut Vec<Diagnostic>) {
    let name = entity.display_name();
    if entity.comment.is_none() {
        warn!("{} does not have a comment (description)", name);
        diagnostics.push(Diagnostic::MissingComment {
            entity: name.to_string(),
        });
    }
    if entity.label.is_none() {
        warn!("{} does not have a label", name);
        diagnostics.push(Diagnostic::MissingLabel {
            entity: name.to_string(),
        });
    }
}
