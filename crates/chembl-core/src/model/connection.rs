//! Connections between elements

use serde::{Deserialize, Serialize};

use super::attribute::Attribute;

/// A directed edge from an upstream element to the element owning it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Id of the element the evidence was found for
    pub source_element_id: String,
    /// Predicate declared by the transformer that created the edge
    #[serde(rename = "type")]
    pub connection_type: String,
    /// Evidence attached to the edge, in insertion order
    pub attributes: Vec<Attribute>,
}

impl Connection {
    /// Create an empty connection
    pub fn new(source_element_id: impl Into<String>, connection_type: impl Into<String>) -> Self {
        Self {
            source_element_id: source_element_id.into(),
            connection_type: connection_type.into(),
            attributes: Vec::new(),
        }
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

    /// Find the first attribute with a name, mutably
    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|a| a.name == name)
    }
}
