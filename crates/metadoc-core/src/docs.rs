//! Parsed documentation keyed by canonical name.
//!
//! Reading comment markup is someone else's job; this module only holds the
//! result. A [`DocumentationSource`] answers "what documentation exists for
//! this canonical name", and [`DocumentationCollection`] is the in-memory
//! implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Documentation for one documented entity. Every field is empty by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberDocumentation {
    pub summary: String,
    pub remarks: String,
    pub examples: Vec<String>,
    /// Canonical names of related entities (`seealso`).
    pub related_members: Vec<String>,
    /// Exception canonical name to description.
    pub exceptions: Vec<(String, String)>,
    /// Parameter name to description.
    pub parameters: Vec<(String, String)>,
    /// Generic parameter name to description.
    pub generic_parameters: Vec<(String, String)>,
    pub returns: String,
    /// Description of a property's value.
    pub value: String,
}

impl MemberDocumentation {
    pub fn with_summary(summary: impl Into<String>) -> Self {
        MemberDocumentation {
            summary: summary.into(),
            ..MemberDocumentation::default()
        }
    }

    /// The description of parameter `name`, if any.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        lookup(&self.parameters, name)
    }

    /// The description of generic parameter `name`, if any.
    pub fn generic_parameter(&self, name: &str) -> Option<&str> {
        lookup(&self.generic_parameters, name)
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, description)| description.as_str())
}

/// A lookup of documentation by canonical name.
pub trait DocumentationSource {
    /// Documentation for `canonical_name`, matching case-insensitively when no
    /// exact-case entry exists.
    fn try_find(&self, canonical_name: &str) -> Option<&MemberDocumentation>;
}

/// In-memory documentation keyed by canonical name.
#[derive(Debug, Clone, Default)]
pub struct DocumentationCollection {
    entries: HashMap<String, MemberDocumentation>,
    folded: HashMap<String, String>,
}

impl DocumentationCollection {
    pub fn new() -> Self {
        DocumentationCollection::default()
    }

    /// Add or replace the documentation for `canonical_name`.
    pub fn insert(
        &mut self,
        canonical_name: impl Into<String>,
        documentation: MemberDocumentation,
    ) {
        let name = canonical_name.into();
        self.folded
            .entry(name.to_lowercase())
            .or_insert_with(|| name.clone());
        self.entries.insert(name, documentation);
    }

    pub fn with(
        mut self,
        canonical_name: impl Into<String>,
        documentation: MemberDocumentation,
    ) -> Self {
        self.insert(canonical_name, documentation);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DocumentationSource for DocumentationCollection {
    fn try_find(&self, canonical_name: &str) -> Option<&MemberDocumentation> {
        self.entries.get(canonical_name).or_else(|| {
            self.folded
                .get(&canonical_name.to_lowercase())
                .and_then(|name| self.entries.get(name))
        })
    }
}

impl FromIterator<(String, MemberDocumentation)> for DocumentationCollection {
    fn from_iter<I: IntoIterator<Item = (String, MemberDocumentation)>>(iter: I) -> Self {
        let mut collection = DocumentationCollection::new();
        for (name, documentation) in iter {
            collection.insert(name, documentation);
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_wins_over_folded() {
        let docs = DocumentationCollection::new()
            .with("T:N.Widget", MemberDocumentation::with_summary("exact"))
            .with("T:N.WIDGET", MemberDocumentation::with_summary("shouting"));

        assert_eq!(docs.try_find("T:N.Widget").unwrap().summary, "exact");
        assert_eq!(docs.try_find("T:N.WIDGET").unwrap().summary, "shouting");
        assert_eq!(docs.try_find("t:n.widget").unwrap().summary, "exact");
        assert!(docs.try_find("T:N.Gadget").is_none());
    }

    #[test]
    fn parameter_descriptions_by_name() {
        let docs = MemberDocumentation {
            parameters: vec![("count".to_string(), "How many.".to_string())],
            ..MemberDocumentation::default()
        };
        assert_eq!(docs.parameter("count"), Some("How many."));
        assert_eq!(docs.parameter("other"), None);
    }
}
