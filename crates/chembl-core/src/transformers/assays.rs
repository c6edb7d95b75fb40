//! Assay exporter
//!
//! One Assay element per distinct assay, one connection per activity row.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::attributes::AttributeBuilder;
use crate::error::Result;
use crate::model::{BiolinkClass, Connection, Element, Names, SOURCE, curie};
use crate::query::{ChemblQueries, Record};
use crate::resolve::chembl_id_of;
use crate::transformer::{
    Controls, Exporter, KnowledgeMap, TransformerFunction, TransformerInfo,
};

pub const ASSAY_TRANSFORMER: &str = "ChEMBL assay transformer";

const ASSAY_COLUMNS: &[&str] = &[
    "BAO_label",
    "assay_organism",
    "target_chembl_id",
    "target_name",
    "target_organism",
    "target_type",
    "cell_chembl_id",
    "assay_type",
    "bao_format",
    "assay_tissue_chembl_id",
    "assay_tissue_name",
    "assay_cell_type",
    "assay_subcellular_fraction",
];

const ACTIVITY_COLUMNS: &[&str] = &[
    "standard_type",
    "standard_relation",
    "standard_value",
    "standard_units",
    "pchembl_value",
    "activity_comment",
];

const SOURCE_COLUMNS: &[&str] = &[
    "source_description",
    "data_validity_comment",
    "uo_units",
    "ligand_efficiency_BEI",
    "ligand_efficiency_LE",
    "ligand_efficiency_LLE",
    "ligand_efficiency_SEI",
    "journal",
    "year",
];

pub struct AssayExporter {
    queries: Arc<dyn ChemblQueries>,
    info: TransformerInfo,
}

impl AssayExporter {
    /// Definition published by this transformer
    pub fn definition() -> TransformerInfo {
        TransformerInfo::new(
            ASSAY_TRANSFORMER,
            TransformerFunction::Exporter,
            KnowledgeMap::single(BiolinkClass::ChemicalSubstance, "related_to", BiolinkClass::Assay),
        )
        .with_description("Assays a compound was tested in, from ChEMBL activities")
        .with_required_attributes(&["chembl", "inchikey"])
    }

    pub fn new(queries: Arc<dyn ChemblQueries>) -> Self {
        let info = Self::definition();
        Self { queries, info }
    }

    fn assay(&self, id: &str, row: &Record) -> Element {
        let builder = AttributeBuilder::new(&self.info.name);
        let mut assay = Element::new(id, BiolinkClass::Assay, &self.info.name);
        assay.set_identifier("chembl", Some(id));
        let name = row.text("assay_description").unwrap_or_else(|| id.to_string());
        assay.names_synonyms = vec![Names::named(Some(name), SOURCE)];
        assay.attributes = builder.columns(row, ASSAY_COLUMNS);
        assay
    }

    fn connection(&self, source_element_id: &str, row: &Record) -> Connection {
        let builder = AttributeBuilder::new(&self.info.name);
        let mut connection = Connection::new(source_element_id, self.info.predicate());
        connection.attributes = builder.columns(row, ACTIVITY_COLUMNS);
        connection.push_attribute(builder.publication(row));
        connection.attributes.extend(builder.columns(row, SOURCE_COLUMNS));
        connection
    }
}

#[async_trait]
impl Exporter for AssayExporter {
    fn info(&self) -> &TransformerInfo {
        &self.info
    }

    async fn export(&self, collection: &[Element], _controls: &Controls) -> Result<Vec<Element>> {
        let mut assays: Vec<Element> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for element in collection {
            let Some(chembl_id) = chembl_id_of(self.queries.as_ref(), element).await? else {
                continue;
            };
            let activities = self.queries.activities(&chembl_id).await?;
            debug!(compound = %chembl_id, activities = activities.len(), "Fetched activities");

            for row in &activities {
                let Some(assay_chembl_id) = row.text("assay_chembl_id") else {
                    debug!(activity_id = ?row.integer("activity_id"), "Activity has no assay");
                    continue;
                };
                let id = format!("{}{}", curie::CHEMBL, assay_chembl_id);
                let position = *index.entry(id.clone()).or_insert_with(|| {
                    assays.push(self.assay(&id, row));
                    assays.len() - 1
                });
                assays[position]
                    .connections
                    .push(self.connection(&element.id, row));
            }
        }

        info!(compounds = collection.len(), assays = assays.len(), "Exported assays");
        Ok(assays)
    }
}
