//! Control parameters and transformer queries

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::info::TransformerInfo;
use crate::error::{Error, Result};
use crate::model::Element;

/// Control values passed to a transformer, keyed by parameter name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Controls(BTreeMap<String, String>);

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a control (builder style)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// A control that must be present and non-empty
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| Error::MissingControl(name.to_string()))
    }

    /// Fill parameter defaults and check required variables
    pub fn prepare(mut self, info: &TransformerInfo) -> Result<Self> {
        for parameter in &info.parameters {
            if let Some(default) = &parameter.default {
                self.0
                    .entry(parameter.name.clone())
                    .or_insert_with(|| default.clone());
            }
        }
        for name in info.required_variables() {
            self.require(name)?;
        }
        Ok(self)
    }
}

/// A single named control value, as sent over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// Input to one transformer invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformerQuery {
    #[serde(default)]
    pub controls: Vec<Property>,
    #[serde(default)]
    pub collection: Vec<Element>,
}

impl TransformerQuery {
    /// Query with controls only
    pub fn with_controls(controls: &[(&str, &str)]) -> Self {
        Self {
            controls: controls
                .iter()
                .map(|(name, value)| Property {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect(),
            collection: Vec::new(),
        }
    }

    /// Set the upstream collection
    pub fn with_collection(mut self, collection: Vec<Element>) -> Self {
        self.collection = collection;
        self
    }

    /// Controls as a map; later duplicates win
    pub fn controls(&self) -> Controls {
        self.controls
            .iter()
            .fold(Controls::new(), |controls, p| controls.with(&p.name, &p.value))
    }
}
