//! Name and synonym records

use serde::{Deserialize, Serialize};

/// A primary name, or a group of synonyms, together with where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Names {
    /// Primary label; null when the group is ambiguous
    pub name: Option<String>,
    /// Alternate labels; null when a single value was promoted to `name`
    pub synonyms: Option<Vec<String>>,
    /// Origin of the names, e.g. `ChEMBL` or `BRAND_NAME@ChEMBL`
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Names {
    /// Create a record with a primary name and an empty synonym list
    pub fn named(name: Option<String>, source: impl Into<String>) -> Self {
        Self {
            name,
            synonyms: Some(Vec::new()),
            source: source.into(),
            url: None,
        }
    }

    /// Create a record from a group of alternate values
    ///
    /// A single value becomes the primary name; several values all go to
    /// `synonyms` and the name stays null.
    pub fn from_group(mut values: Vec<String>, source: impl Into<String>) -> Self {
        let (name, synonyms) = if values.len() == 1 {
            (values.pop(), None)
        } else {
            (None, Some(values))
        };
        Self {
            name,
            synonyms,
            source: source.into(),
            url: None,
        }
    }

    /// Set the url
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Add a synonym unless it is already listed
    pub fn add_synonym(&mut self, synonym: impl Into<String>) {
        let synonym = synonym.into();
        let synonyms = self.synonyms.get_or_insert_with(Vec::new);
        if !synonyms.contains(&synonym) {
            synonyms.push(synonym);
        }
    }
}
