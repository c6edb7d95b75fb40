//! Compound producer
//!
//! Resolves `;`-separated query terms to ChemicalSubstance elements, one per
//! distinct matching molecule, carrying structure identifiers, grouped names and
//! synonyms, and the molecule dictionary's descriptive columns.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::attributes::{AVAILABILITY_LABELS, AttributeBuilder, CHIRALITY_LABELS};
use crate::error::Result;
use crate::model::{BiolinkClass, COMPOUND_REPORT_URL, Element, Names, SOURCE, curie};
use crate::query::{ChemblQueries, Record};
use crate::resolve::find_compounds;
use crate::transformer::{
    Controls, KnowledgeMap, Parameter, Producer, TransformerFunction, TransformerInfo,
};

pub const MOLECULE_PRODUCER: &str = "ChEMBL compound-list producer";

const COMPOUNDS: &str = "compounds";
const TERM_SEPARATOR: char = ';';

const STRING_COLUMNS: &[&str] = &[
    "max_phase",
    "molecule_type",
    "first_approval",
    "usan_year",
    "usan_stem",
    "usan_substem",
    "usan_stem_definition",
    "indication_class",
    "withdrawn_year",
    "withdrawn_country",
    "withdrawn_reason",
    "withdrawn_class",
];

const FLAG_COLUMNS: &[&str] = &[
    "therapeutic_flag",
    "dosed_ingredient",
    "oral",
    "parenteral",
    "topical",
    "black_box_warning",
    "natural_product",
    "first_in_class",
    "prodrug",
    "inorganic_flag",
    "polymer_flag",
    "withdrawn_flag",
];

/// Produces compounds from free-text terms, ids, or InChIKeys
pub struct MoleculeProducer {
    queries: Arc<dyn ChemblQueries>,
    info: TransformerInfo,
}

impl MoleculeProducer {
    /// Definition published by this transformer
    pub fn definition() -> TransformerInfo {
        TransformerInfo::new(
            MOLECULE_PRODUCER,
            TransformerFunction::Producer,
            KnowledgeMap::produces(BiolinkClass::ChemicalSubstance),
        )
        .with_description("Compounds from ChEMBL by name, synonym, ChEMBL id, or InChIKey")
        .with_parameter(Parameter::required(COMPOUNDS).with_biolink_class("ChemicalSubstance"))
    }

    pub fn new(queries: Arc<dyn ChemblQueries>) -> Self {
        let info = Self::definition();
        Self { queries, info }
    }

    /// Build the compound element for one molecule row
    async fn molecule(&self, row: &Record) -> Result<Option<Element>> {
        let Some(chembl_id) = row.text("chembl_id") else {
            debug!("Skipping molecule row without a ChEMBL id");
            return Ok(None);
        };
        let id = format!("{}{}", curie::CHEMBL, chembl_id);

        let mut element = Element::new(&id, BiolinkClass::ChemicalSubstance, &self.info.name);
        element.set_identifier("chembl", Some(id.as_str()));
        element.set_identifier("smiles", row.text("canonical_smiles"));
        element.set_identifier("inchi", row.text("standard_inchi"));
        element.set_identifier("inchikey", row.text("standard_inchi_key"));

        element.names_synonyms = self.names_synonyms(&chembl_id, row).await?;

        let builder = AttributeBuilder::new(&self.info.name);
        if row.text("standard_inchi_key").is_some() {
            element.attributes.push(builder.value("structure source", SOURCE));
        }
        element.attributes.extend(builder.columns(row, STRING_COLUMNS));
        for column in FLAG_COLUMNS {
            element.push_attribute(builder.flag(row, column));
        }
        element.push_attribute(builder.coded(row, "chirality", CHIRALITY_LABELS));
        element.push_attribute(builder.coded(row, "availability_type", AVAILABILITY_LABELS));

        Ok(Some(element))
    }

    /// Preferred name first, then one record per synonym type
    async fn names_synonyms(&self, chembl_id: &str, row: &Record) -> Result<Vec<Names>> {
        let synonyms = match row.integer("molregno") {
            Some(molregno) => self.queries.molecule_synonyms(molregno).await?,
            None => Vec::new(),
        };
        let mut groups = group_synonyms(&synonyms);

        let own = groups
            .iter()
            .position(|(syn_type, _)| syn_type == SOURCE)
            .map(|index| groups.remove(index).1)
            .unwrap_or_default();

        let mut names = vec![Names {
            name: row.text("pref_name"),
            synonyms: Some(own),
            source: SOURCE.to_string(),
            url: None,
        }
        .with_url(format!("{}{}", COMPOUND_REPORT_URL, chembl_id))];

        names.extend(
            groups
                .into_iter()
                .map(|(syn_type, values)| Names::from_group(values, format!("{}@{}", syn_type, SOURCE))),
        );
        Ok(names)
    }
}

/// Group synonym rows by `syn_type`, in order of first appearance
///
/// Rows without a type are grouped under the source name.
pub fn group_synonyms(rows: &[Record]) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for row in rows {
        let Some(synonym) = row.text("synonyms") else {
            continue;
        };
        let syn_type = row.text("syn_type").unwrap_or_else(|| SOURCE.to_string());
        match groups.iter_mut().find(|(existing, _)| *existing == syn_type) {
            Some((_, values)) => values.push(synonym),
            None => groups.push((syn_type, vec![synonym])),
        }
    }
    groups
}

#[async_trait]
impl Producer for MoleculeProducer {
    fn info(&self) -> &TransformerInfo {
        &self.info
    }

    async fn produce(&self, controls: &Controls) -> Result<Vec<Element>> {
        let terms = controls.require(COMPOUNDS)?;
        let builder = AttributeBuilder::new(&self.info.name);
        let mut compounds: Vec<Element> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for term in terms.split(TERM_SEPARATOR).map(str::trim).filter(|t| !t.is_empty()) {
            let rows = find_compounds(self.queries.as_ref(), term).await?;
            debug!(term = %term, matches = rows.len(), "Resolved query term");

            for row in &rows {
                let known = row
                    .text("chembl_id")
                    .and_then(|chembl_id| index.get(&format!("{}{}", curie::CHEMBL, chembl_id)).copied());
                let position = match known {
                    Some(position) => position,
                    None => {
                        let Some(compound) = self.molecule(row).await? else {
                            continue;
                        };
                        index.insert(compound.id.clone(), compounds.len());
                        compounds.push(compound);
                        compounds.len() - 1
                    }
                };

                // A compound matched by several terms keeps one query name per term
                let compound = &mut compounds[position];
                let query_name = builder.value("query name", term);
                if !compound.attributes.contains(&query_name) {
                    compound.attributes.push(query_name);
                }
            }
        }

        info!(compounds = compounds.len(), "Produced compounds");
        Ok(compounds)
    }
}
