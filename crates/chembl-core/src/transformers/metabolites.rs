//! Metabolite mapper
//!
//! Maps compounds to their direct metabolites. Metabolites are merged on their
//! ChEMBL id; every metabolism row adds one connection.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::attributes::AttributeBuilder;
use crate::error::Result;
use crate::model::{BiolinkClass, Connection, Element, Names, SOURCE, curie};
use crate::query::{ChemblQueries, Record, ReferenceTable};
use crate::resolve::chembl_id_of;
use crate::transformer::{
    Controls, KnowledgeMap, Mapper, TransformerFunction, TransformerInfo,
};

pub const METABOLITE_TRANSFORMER: &str = "ChEMBL metabolite transformer";

/// Structure columns copied to identifiers of the same name
const STRUCTURE_COLUMNS: &[&str] = &["inchi", "inchikey", "smiles"];

const METABOLISM_COLUMNS: &[&str] = &[
    "enzyme_name",
    "met_conversion",
    "met_comment",
    "organism",
    "tax_id",
    "enzyme_type",
];

pub struct MetaboliteTransformer {
    queries: Arc<dyn ChemblQueries>,
    info: TransformerInfo,
}

impl MetaboliteTransformer {
    /// Definition published by this transformer
    pub fn definition() -> TransformerInfo {
        TransformerInfo::new(
            METABOLITE_TRANSFORMER,
            TransformerFunction::Transformer,
            KnowledgeMap::single(
                BiolinkClass::ChemicalSubstance,
                "has_metabolite",
                BiolinkClass::ChemicalSubstance,
            ),
        )
        .with_description("Direct metabolites of compounds, from ChEMBL metabolism")
        .with_required_attributes(&["chembl", "inchikey"])
    }

    pub fn new(queries: Arc<dyn ChemblQueries>) -> Self {
        let info = Self::definition();
        Self { queries, info }
    }

    fn metabolite(&self, id: &str, row: &Record) -> Element {
        let mut metabolite = Element::new(id, BiolinkClass::ChemicalSubstance, &self.info.name);
        metabolite.set_identifier("chembl", Some(id));

        let name = row.text("metabolite_name");
        let mut names = Names::named(name.clone(), SOURCE);
        if let Some(pref_name) = row.text("metabolite_pref_name").filter(|p| Some(p) != name.as_ref()) {
            names.add_synonym(pref_name);
        }
        metabolite.names_synonyms = vec![names];

        let mut has_structure = false;
        for column in STRUCTURE_COLUMNS {
            if let Some(value) = row.text(column) {
                metabolite.set_identifier(column, Some(value));
                has_structure = true;
            }
        }
        if has_structure {
            let builder = AttributeBuilder::new(&self.info.name);
            metabolite.attributes.push(builder.value("structure source", SOURCE));
        }
        metabolite
    }

    async fn connection(&self, source_element_id: &str, row: &Record) -> Result<Connection> {
        let builder = AttributeBuilder::new(&self.info.name);
        let mut connection = Connection::new(source_element_id, self.info.predicate());
        connection.attributes = builder.columns(row, METABOLISM_COLUMNS);
        connection.push_attribute(builder.chembl_curie(row, "enzyme_chembl_id"));
        connection.attributes.extend(
            builder
                .references(self.queries.as_ref(), ReferenceTable::Metabolism, row.integer("met_id"))
                .await?,
        );
        Ok(connection)
    }
}

#[async_trait]
impl Mapper for MetaboliteTransformer {
    fn info(&self) -> &TransformerInfo {
        &self.info
    }

    async fn map(&self, collection: &[Element], _controls: &Controls) -> Result<Vec<Element>> {
        let mut metabolites: Vec<Element> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for element in collection {
            let Some(chembl_id) = chembl_id_of(self.queries.as_ref(), element).await? else {
                continue;
            };

            for row in self.queries.direct_metabolites(&chembl_id).await? {
                let Some(metabolite_chembl_id) = row.text("metabolite_chembl_id") else {
                    debug!(compound = %chembl_id, met_id = ?row.integer("met_id"), "Metabolite has no ChEMBL id");
                    continue;
                };
                let id = format!("{}{}", curie::CHEMBL, metabolite_chembl_id);
                let connection = self.connection(&element.id, &row).await?;

                let position = *index.entry(metabolite_chembl_id).or_insert_with(|| {
                    metabolites.push(self.metabolite(&id, &row));
                    metabolites.len() - 1
                });
                metabolites[position].connections.push(connection);
            }
        }

        info!(
            compounds = collection.len(),
            metabolites = metabolites.len(),
            "Mapped compounds to metabolites"
        );
        Ok(metabolites)
    }
}
