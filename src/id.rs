//! Identifier classification, expansion and local-name stripping
//!
//! Vocabulary documents refer to classes and properties either by prefixed
//! names (`schema:Person`) or by full IRIs (`http://schema.org/Person`).
//! The profile is keyed by local names, while input definitions keep the
//! expanded identifier.

use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// URI schemes that are never treated as namespace prefixes
const ABSOLUTE_SCHEMES: &[&str] = &["http", "https", "urn", "mailto", "arcp", "file"];

/// Classification of an identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdKind<'a> {
    /// Absolute URI: "https://...", "http://...", "urn:..."
    Absolute,
    /// Compact IRI: "schema:Person"
    Prefixed { prefix: &'a str, local: &'a str },
    /// Anything without a prefix separator: "./", "ro-crate-metadata.json", "Person"
    Local,
}

/// Classify an identifier string
pub fn classify_id(id: &str) -> IdKind<'_> {
    match id.split_once(':') {
        None => IdKind::Local,
        Some((prefix, local)) => {
            if ABSOLUTE_SCHEMES.contains(&prefix) || local.starts_with("//") {
                IdKind::Absolute
            } else {
                IdKind::Prefixed { prefix, local }
            }
        }
    }
}

/// Prefix to base-URI mapping taken from a document's `@context`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceContext {
    prefixes: HashMap<String, String>,
}

impl NamespaceContext {
    /// Build a context from a JSON-LD `@context` value
    ///
    /// Objects contribute their string-valued terms. Arrays (the RO-Crate
    /// `[url, {...}]` form) merge their object members in order; remote
    /// context URLs are ignored.
    pub fn from_json(value: &Value) -> Self {
        let mut context = Self::default();
        context.absorb(value);
        context
    }

    fn absorb(&mut self, value: &Value) {
        match value {
            Value::Object(obj) => {
                for (prefix, base) in obj {
                    if let Some(base) = base.as_str() {
                        self.prefixes.insert(prefix.clone(), base.to_string());
                    }
                }
            }
            Value::Array(arr) => {
                for item in arr {
                    self.absorb(item);
                }
            }
            _ => {}
        }
    }

    pub fn insert(&mut self, prefix: impl Into<String>, base: impl Into<String>) {
        self.prefixes.insert(prefix.into(), base.into());
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

/// Expand a compact IRI to a fully qualified one
///
/// Absolute and local identifiers are returned unchanged, as are compact
/// IRIs whose prefix the context does not define.
pub fn expand(id: &str, context: &NamespaceContext) -> String {
    match classify_id(id) {
        IdKind::Prefixed { prefix, local } => match context.get(prefix) {
            Some(base) => format!("{}{}", base, local),
            None => {
                debug!(id, prefix, "unknown namespace prefix, leaving identifier as-is");
                id.to_string()
            }
        },
        IdKind::Absolute | IdKind::Local => id.to_string(),
    }
}

/// Strip the namespace from an identifier
///
/// - "https://pcdm.org/models#Person" -> "Person"
/// - "http://schema.org/Person" -> "Person"
/// - "schema:Person" -> "Person"
///
/// Returns `None` when nothing is left after stripping.
pub fn local_name(id: &str) -> Option<&str> {
    let name = if let Some((_, fragment)) = id.rsplit_once('#') {
        fragment
    } else if id.starts_with("http://") || id.starts_with("https://") {
        id.rsplit('/').next().unwrap_or(id)
    } else if let Some((_, rest)) = id.split_once(':') {
        rest
    } else {
        id
    };

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
