//! Transformer definitions
//!
//! Each transformer publishes a `TransformerInfo`: its name, which of the
//! three verbs it implements, its control parameters, and a knowledge map
//! naming the classes it consumes and produces together with the predicate
//! used for every connection it creates.

use serde::{Deserialize, Serialize};

use crate::model::BiolinkClass;

/// Predicate used when a definition declares none
pub const DEFAULT_PREDICATE: &str = "related_to";

/// Which entry point a transformer exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformerFunction {
    /// `produce(controls)`: query terms to entities, no upstream input
    Producer,
    /// `map(collection, controls)`: entities to new related entities
    Transformer,
    /// `export(collection, controls)`: entities to annotation entities
    Exporter,
}

impl TransformerFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Producer => "producer",
            Self::Transformer => "transformer",
            Self::Exporter => "exporter",
        }
    }
}

impl std::fmt::Display for TransformerFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A control parameter accepted by a transformer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub parameter_type: String,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub biolink_class: Option<String>,
    /// Required parameters must be present and non-empty
    #[serde(default)]
    pub required: bool,
}

impl Parameter {
    /// A required string parameter
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter_type: "string".to_string(),
            default: None,
            biolink_class: None,
            required: true,
        }
    }

    /// Set the biolink class the parameter's value names
    pub fn with_biolink_class(mut self, class: impl Into<String>) -> Self {
        self.biolink_class = Some(class.into());
        self
    }
}

/// One subject-predicate-object triple a transformer can emit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub subject: BiolinkClass,
    pub predicate: String,
    pub object: BiolinkClass,
}

/// Classes and predicates a transformer works with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeMap {
    #[serde(default)]
    pub input_class: Option<BiolinkClass>,
    pub output_class: BiolinkClass,
    #[serde(default)]
    pub predicates: Vec<Predicate>,
}

/// Definition block published by a transformer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerInfo {
    pub name: String,
    pub label: String,
    pub version: String,
    pub function: TransformerFunction,
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub required_attributes: Vec<String>,
    pub knowledge_map: KnowledgeMap,
}

impl TransformerInfo {
    /// Create a definition with no parameters
    pub fn new(
        name: impl Into<String>,
        function: TransformerFunction,
        knowledge_map: KnowledgeMap,
    ) -> Self {
        let name = name.into();
        Self {
            label: "ChEMBL".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: String::new(),
            name,
            function,
            parameters: Vec::new(),
            required_attributes: Vec::new(),
            knowledge_map,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a control parameter
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Set the identifier namespaces an input element should carry
    pub fn with_required_attributes(mut self, attributes: &[&str]) -> Self {
        self.required_attributes = attributes.iter().map(|a| a.to_string()).collect();
        self
    }

    /// The predicate used for every connection this transformer creates
    pub fn predicate(&self) -> &str {
        self.knowledge_map
            .predicates
            .first()
            .map(|p| p.predicate.as_str())
            .unwrap_or(DEFAULT_PREDICATE)
    }

    /// Names of parameters that must be supplied
    pub fn required_variables(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
    }
}

impl KnowledgeMap {
    /// A map with a single predicate from `input_class` to `output_class`
    pub fn single(input_class: BiolinkClass, predicate: &str, output_class: BiolinkClass) -> Self {
        Self {
            input_class: Some(input_class),
            output_class,
            predicates: vec![Predicate {
                subject: input_class,
                predicate: predicate.to_string(),
                object: output_class,
            }],
        }
    }

    /// A map for producers, which have no input class or predicates
    pub fn produces(output_class: BiolinkClass) -> Self {
        Self {
            input_class: None,
            output_class,
            predicates: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_predicate_is_used() {
        let info = TransformerInfo::new(
            "ChEMBL indications transformer",
            TransformerFunction::Exporter,
            KnowledgeMap::single(BiolinkClass::ChemicalSubstance, "treats", BiolinkClass::Disease),
        );

        assert_eq!(info.predicate(), "treats");
    }

    #[test]
    fn test_producer_falls_back_to_default_predicate() {
        let info = TransformerInfo::new(
            "ChEMBL compound-list producer",
            TransformerFunction::Producer,
            KnowledgeMap::produces(BiolinkClass::ChemicalSubstance),
        )
        .with_parameter(Parameter::required("compounds"));

        assert_eq!(info.predicate(), DEFAULT_PREDICATE);
        assert_eq!(info.required_variables().collect::<Vec<_>>(), vec!["compounds"]);
    }

    #[test]
    fn test_definition_from_json() {
        let json = r#"{
            "name": "ChEMBL metabolite transformer",
            "label": "ChEMBL",
            "version": "2.0.0",
            "function": "transformer",
            "description": "Metabolites of compounds",
            "knowledge_map": {
                "input_class": "ChemicalSubstance",
                "output_class": "ChemicalSubstance",
                "predicates": [
                    {"subject": "ChemicalSubstance", "predicate": "has_metabolite", "object": "ChemicalSubstance"}
                ]
            }
        }"#;

        let info: TransformerInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.function, TransformerFunction::Transformer);
        assert_eq!(info.predicate(), "has_metabolite");
        assert!(info.parameters.is_empty());
    }
}
