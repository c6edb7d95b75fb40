//! Canonical entities returned by the transformers

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::attribute::Attribute;
use super::connection::Connection;
use super::names::Names;

/// A canonical biological or chemical entity
///
/// Elements are keyed by a source-prefixed CURIE. Within one produced
/// collection the id is unique: rows describing the same entity are merged
/// into one element by the transformer that builds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// CURIE identifying the entity, e.g. `ChEMBL:CHEMBL25`
    pub id: String,
    /// Semantic category
    pub biolink_class: BiolinkClass,
    /// Namespace to identifier(s), e.g. `chembl`, `inchikey`, `efo`
    #[serde(default)]
    pub identifiers: BTreeMap<String, Identifier>,
    /// Names and synonym groups, primary record first
    #[serde(default)]
    pub names_synonyms: Vec<Names>,
    /// Facts about the entity itself
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Edges from upstream elements to this one
    #[serde(default)]
    pub connections: Vec<Connection>,
    /// Name of the transformer that produced the element
    #[serde(default)]
    pub source: String,
}

impl Element {
    /// Create an element with no identifiers, names, or attributes
    pub fn new(id: impl Into<String>, biolink_class: BiolinkClass, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            biolink_class,
            identifiers: BTreeMap::new(),
            names_synonyms: Vec::new(),
            attributes: Vec::new(),
            connections: Vec::new(),
            source: source.into(),
        }
    }

    /// Set a single-valued identifier, skipping null values
    pub fn set_identifier(&mut self, namespace: &str, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.identifiers
                .insert(namespace.to_string(), Identifier::Single(value.into()));
        }
    }

    /// Add a value to a list-valued identifier unless it is already there
    pub fn push_identifier(&mut self, namespace: &str, value: impl Into<String>) {
        let value = value.into();
        let entry = self
            .identifiers
            .entry(namespace.to_string())
            .or_insert_with(|| Identifier::Multiple(Vec::new()));
        entry.push(value);
    }

    /// First identifier in a namespace
    pub fn identifier(&self, namespace: &str) -> Option<&str> {
        self.identifiers.get(namespace).and_then(Identifier::first)
    }

    /// All identifiers in a namespace
    pub fn identifier_values(&self, namespace: &str) -> Vec<&str> {
        self.identifiers
            .get(namespace)
            .map(Identifier::values)
            .unwrap_or_default()
    }

    /// Append an attribute if one was built
    pub fn push_attribute(&mut self, attribute: Option<Attribute>) {
        if let Some(attribute) = attribute {
            self.attributes.push(attribute);
        }
    }

    /// Find the first attribute with a name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// One identifier or a list of identifiers for a namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Single(String),
    Multiple(Vec<String>),
}

impl Identifier {
    /// First value, if any
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(values) => values.first().map(String::as_str),
        }
    }

    /// All values in order
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Add a value, turning a single identifier into a list
    pub fn push(&mut self, value: String) {
        match self {
            Self::Multiple(values) => {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            Self::Single(existing) => {
                if *existing != value {
                    let first = std::mem::take(existing);
                    *self = Self::Multiple(vec![first, value]);
                }
            }
        }
    }
}

/// Biolink semantic categories used by the transformers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiolinkClass {
    ChemicalSubstance,
    Gene,
    Disease,
    Assay,
    MolecularEntity,
}

impl BiolinkClass {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChemicalSubstance => "ChemicalSubstance",
            Self::Gene => "Gene",
            Self::Disease => "Disease",
            Self::Assay => "Assay",
            Self::MolecularEntity => "MolecularEntity",
        }
    }
}

impl std::fmt::Display for BiolinkClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
