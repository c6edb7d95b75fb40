//! Gene-target mapper
//!
//! Maps compounds to the genes encoding their protein targets. Each target
//! row becomes one connection; the connection is attached to every Ensembl
//! gene the row's target component cross-references.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::attributes::AttributeBuilder;
use crate::error::Result;
use crate::model::{BiolinkClass, Connection, Element, curie};
use crate::query::{ChemblQueries, Record, ReferenceTable, TargetXrefCache};
use crate::resolve::chembl_id_of;
use crate::transformer::{
    Controls, KnowledgeMap, Mapper, TransformerFunction, TransformerInfo,
};

pub const TARGET_TRANSFORMER: &str = "ChEMBL gene-target transformer";

pub struct TargetTransformer {
    queries: Arc<dyn ChemblQueries>,
    xref_cache: Arc<TargetXrefCache>,
    info: TransformerInfo,
}

impl TargetTransformer {
    /// Definition published by this transformer
    pub fn definition() -> TransformerInfo {
        TransformerInfo::new(
            TARGET_TRANSFORMER,
            TransformerFunction::Transformer,
            KnowledgeMap::single(BiolinkClass::ChemicalSubstance, "affects", BiolinkClass::Gene),
        )
        .with_description("Gene targets of compounds, from ChEMBL drug mechanisms")
        .with_required_attributes(&["chembl", "inchikey"])
    }

    pub fn new(queries: Arc<dyn ChemblQueries>, xref_cache: Arc<TargetXrefCache>) -> Self {
        let info = Self::definition();
        Self {
            queries,
            xref_cache,
            info,
        }
    }

    async fn connection(&self, compound: &Element, target: &Record) -> Result<Connection> {
        let builder = AttributeBuilder::new(&self.info.name);
        let mut connection = Connection::new(&compound.id, self.info.predicate());
        connection.push_attribute(builder.column(target, "action_type"));
        connection.push_attribute(builder.column(target, "mechanism_of_action"));
        connection.attributes.extend(
            builder
                .references(
                    self.queries.as_ref(),
                    ReferenceTable::Mechanism,
                    target.integer("mec_id"),
                )
                .await?,
        );
        Ok(connection)
    }
}

#[async_trait]
impl Mapper for TargetTransformer {
    fn info(&self) -> &TransformerInfo {
        &self.info
    }

    async fn map(&self, collection: &[Element], _controls: &Controls) -> Result<Vec<Element>> {
        let mut genes: Vec<Element> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for compound in collection {
            let Some(chembl_id) = chembl_id_of(self.queries.as_ref(), compound).await? else {
                continue;
            };

            for target in self.queries.targets(&chembl_id).await? {
                let Some(component_id) = target.integer("component_id") else {
                    debug!(compound = %compound.id, "Target row has no component");
                    continue;
                };
                let connection = self.connection(compound, &target).await?;

                for gene_id in self.xref_cache.gene_ids(component_id).await?.iter() {
                    let id = format!("{}{}", curie::ENSEMBL, gene_id);
                    let position = *index.entry(id.clone()).or_insert_with(|| {
                        let mut gene = Element::new(&id, BiolinkClass::Gene, &self.info.name);
                        gene.push_identifier("ensembl", id.as_str());
                        genes.push(gene);
                        genes.len() - 1
                    });
                    genes[position].connections.push(connection.clone());
                }
            }
        }

        info!(compounds = collection.len(), genes = genes.len(), "Mapped compounds to gene targets");
        Ok(genes)
    }
}
