//! Provenance-tagged attributes

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::SOURCE;

/// A single scalar fact attached to an element or a connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name (usually the source column name)
    pub name: String,
    /// Scalar value: a string for most columns, a number for aggregated phases
    pub value: Value,
    /// Semantic type, defaults to the attribute name
    #[serde(rename = "type")]
    pub attribute_type: String,
    /// Data source the fact comes from
    pub source: String,
    /// Optional link to the record backing the fact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Name of the transformer that produced the fact
    pub provided_by: String,
}

impl Attribute {
    /// Create an attribute whose type is its own name
    pub fn new(name: impl Into<String>, value: impl Into<Value>, provided_by: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            attribute_type: name.clone(),
            name,
            value: value.into(),
            source: SOURCE.to_string(),
            url: None,
            provided_by: provided_by.into(),
        }
    }

    /// Set the semantic type
    pub fn with_type(mut self, attribute_type: impl Into<String>) -> Self {
        self.attribute_type = attribute_type.into();
        self
    }

    /// Set the url
    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }
}
