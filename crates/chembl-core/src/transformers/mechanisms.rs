//! Mechanism exporter
//!
//! Exports the molecular targets of a compound's mechanisms of action. Each
//! mechanism row is one connection to the target's MolecularEntity, carrying
//! the mechanism references and the compound's ATC classifications.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::attributes::AttributeBuilder;
use crate::error::Result;
use crate::model::{Attribute, BiolinkClass, Connection, Element, Names, SOURCE, curie};
use crate::query::{ChemblQueries, Record, ReferenceTable};
use crate::resolve::chembl_id_of;
use crate::transformer::{
    Controls, Exporter, KnowledgeMap, TransformerFunction, TransformerInfo,
};

pub const MECHANISM_TRANSFORMER: &str = "ChEMBL mechanism transformer";

const ATC_CLASSIFICATION: &str = "atc_classification";
const ATC_LEVELS: usize = 5;

const TARGET_COLUMNS: &[&str] = &["target_name", "target_type", "target_organism"];

const MECHANISM_COLUMNS: &[&str] = &[
    "action_type",
    "mechanism_of_action",
    "mechanism_comment",
    "selectivity_comment",
    "target_chembl_id",
    "site_name",
    "binding_site_comment",
    "source_description",
];

pub struct MechanismExporter {
    queries: Arc<dyn ChemblQueries>,
    info: TransformerInfo,
}

impl MechanismExporter {
    /// Definition published by this transformer
    pub fn definition() -> TransformerInfo {
        TransformerInfo::new(
            MECHANISM_TRANSFORMER,
            TransformerFunction::Exporter,
            KnowledgeMap::single(
                BiolinkClass::ChemicalSubstance,
                "affects",
                BiolinkClass::MolecularEntity,
            ),
        )
        .with_description("Mechanisms of action of compounds, from ChEMBL drug mechanisms")
        .with_required_attributes(&["chembl", "inchikey"])
    }

    pub fn new(queries: Arc<dyn ChemblQueries>) -> Self {
        let info = Self::definition();
        Self { queries, info }
    }

    fn target(&self, id: &str, target_chembl_id: String, row: &Record) -> Element {
        let builder = AttributeBuilder::new(&self.info.name);
        let mut target = Element::new(id, BiolinkClass::MolecularEntity, &self.info.name);
        target.set_identifier("chembl", Some(id));
        target.names_synonyms = vec![Names::named(Some(target_chembl_id), SOURCE)];
        target.attributes = builder.columns(row, TARGET_COLUMNS);
        target
    }

    async fn connection(&self, source_element_id: &str, row: &Record) -> Result<Connection> {
        let builder = AttributeBuilder::new(&self.info.name);
        let mut connection = Connection::new(source_element_id, self.info.predicate());
        connection.attributes = builder.columns(row, MECHANISM_COLUMNS);
        connection.push_attribute(builder.publication(row));
        connection.attributes.extend(
            builder
                .references(self.queries.as_ref(), ReferenceTable::Mechanism, row.integer("mec_id"))
                .await?,
        );

        if let Some(molregno) = row.integer("molregno") {
            for atc in self.queries.atc_classifications(molregno).await? {
                connection.attributes.push(
                    Attribute::new(ATC_CLASSIFICATION, atc_classification(&atc), &self.info.name),
                );
            }
        }
        Ok(connection)
    }
}

/// `L1-D1|L2-D2|L3-D3|L4-D4|L5-D5` for one ATC row; null parts render empty
pub fn atc_classification(row: &Record) -> String {
    (1..=ATC_LEVELS)
        .map(|level| {
            format!(
                "{}-{}",
                row.text(&format!("level{}", level)).unwrap_or_default(),
                row.text(&format!("level{}_description", level)).unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("|")
}

#[async_trait]
impl Exporter for MechanismExporter {
    fn info(&self) -> &TransformerInfo {
        &self.info
    }

    async fn export(&self, collection: &[Element], _controls: &Controls) -> Result<Vec<Element>> {
        let mut targets: Vec<Element> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for element in collection {
            let Some(chembl_id) = chembl_id_of(self.queries.as_ref(), element).await? else {
                continue;
            };

            for row in self.queries.mechanisms(&chembl_id).await? {
                let Some(target_chembl_id) = row.text("target_chembl_id") else {
                    debug!(compound = %chembl_id, mec_id = ?row.integer("mec_id"), "Mechanism has no target");
                    continue;
                };
                let id = format!("{}{}", curie::CHEMBL, target_chembl_id);
                let connection = self.connection(&element.id, &row).await?;

                let position = *index.entry(id.clone()).or_insert_with(|| {
                    targets.push(self.target(&id, target_chembl_id, &row));
                    targets.len() - 1
                });
                targets[position].connections.push(connection);
            }
        }

        info!(compounds = collection.len(), targets = targets.len(), "Exported mechanisms");
        Ok(targets)
    }
}
