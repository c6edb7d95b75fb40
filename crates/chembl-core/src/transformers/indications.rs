//! Indication exporter
//!
//! Exports the diseases a compound is indicated for. Indication rows are keyed
//! by MeSH id and by EFO id; a row sharing either key with an earlier row is
//! folded into the same Disease element. Within a disease, all rows from the
//! same upstream compound share one connection carrying the highest clinical
//! phase seen and every supporting reference.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::model::{Attribute, BiolinkClass, Connection, Element, Identifier, Names, SOURCE, curie};
use crate::query::{ChemblQueries, Record};
use crate::resolve::chembl_id_of;
use crate::transformer::{
    Controls, Exporter, KnowledgeMap, TransformerFunction, TransformerInfo,
};

pub const INDICATION_TRANSFORMER: &str = "ChEMBL indications transformer";

const MAX_PHASE: &str = "max phase for indication";
/// OPMI term for clinical trial phase
const MAX_PHASE_TYPE: &str = "OPMI:0000367";
const REFERENCE_TYPE: &str = "reference";

pub struct IndicationExporter {
    queries: Arc<dyn ChemblQueries>,
    info: TransformerInfo,
}

/// Per-invocation dedup state
#[derive(Default)]
struct Indications {
    elements: Vec<Element>,
    /// MeSH CURIE or EFO id → element index
    keys: HashMap<String, usize>,
    /// (element index, upstream element id) → connection index
    connections: HashMap<(usize, String), usize>,
}

impl Indications {
    /// Find the disease for a row by MeSH key then EFO id, or create it
    fn get_or_create(&mut self, mesh_key: Option<&str>, efo_id: Option<&str>, row: &Record, provided_by: &str) -> Option<usize> {
        let existing = mesh_key
            .and_then(|key| self.keys.get(key))
            .or_else(|| efo_id.and_then(|key| self.keys.get(key)))
            .copied();

        let index = match existing {
            Some(index) => index,
            None => {
                let id = mesh_key.or(efo_id)?;
                let mut disease = Element::new(id, BiolinkClass::Disease, provided_by);
                disease.names_synonyms = vec![Names::named(row.text("mesh_heading"), SOURCE)];
                disease
                    .identifiers
                    .insert("efo".to_string(), Identifier::Multiple(Vec::new()));
                disease.set_identifier("mesh", mesh_key);
                self.elements.push(disease);
                self.elements.len() - 1
            }
        };

        for key in [mesh_key, efo_id].into_iter().flatten() {
            self.keys.entry(key.to_string()).or_insert(index);
        }
        Some(index)
    }

    /// The connection from one upstream element to a disease, created on first use
    fn connection(&mut self, index: usize, source_element_id: &str, predicate: &str) -> &mut Connection {
        let disease = &mut self.elements[index];
        let position = *self
            .connections
            .entry((index, source_element_id.to_string()))
            .or_insert_with(|| {
                disease
                    .connections
                    .push(Connection::new(source_element_id, predicate));
                disease.connections.len() - 1
            });
        &mut disease.connections[position]
    }
}

impl IndicationExporter {
    /// Definition published by this transformer
    pub fn definition() -> TransformerInfo {
        TransformerInfo::new(
            INDICATION_TRANSFORMER,
            TransformerFunction::Exporter,
            KnowledgeMap::single(BiolinkClass::ChemicalSubstance, "treats", BiolinkClass::Disease),
        )
        .with_description("Indications of compounds, from ChEMBL drug indications")
        .with_required_attributes(&["chembl", "inchikey"])
    }

    pub fn new(queries: Arc<dyn ChemblQueries>) -> Self {
        let info = Self::definition();
        Self { queries, info }
    }

    fn add_row(&self, indications: &mut Indications, source_element_id: &str, row: &Record) {
        let mesh_key = row.text("mesh_id").map(|mesh| format!("{}{}", curie::MESH, mesh));
        let efo_id = row.text("efo_id");

        let Some(index) = indications.get_or_create(mesh_key.as_deref(), efo_id.as_deref(), row, &self.info.name) else {
            debug!(drugind_id = ?row.integer("drugind_id"), "Indication row has neither MeSH nor EFO id");
            return;
        };

        let disease = &mut indications.elements[index];
        if let Some(mesh_key) = mesh_key.as_deref().filter(|key| *key != disease.id) {
            warn!(
                indication = %disease.id,
                mesh_id = %mesh_key,
                drugind_id = ?row.integer("drugind_id"),
                "MeSH id mismatch for indication"
            );
        }
        if let Some(efo_id) = efo_id {
            disease.push_identifier("efo", efo_id);
        }
        if let (Some(term), Some(names)) = (row.text("efo_term"), disease.names_synonyms.first_mut()) {
            names.add_synonym(term);
        }

        let connection = indications.connection(index, source_element_id, self.info.predicate());
        self.update_max_phase(connection, row);

        if let Some(ref_type) = row.text("ref_type") {
            connection.attributes.push(
                Attribute::new(ref_type, row.get("ref_id").to_json(), &self.info.name)
                    .with_type(REFERENCE_TYPE)
                    .with_url(row.text("ref_url")),
            );
        }
    }

    /// Keep the highest phase seen on the connection's phase attribute
    fn update_max_phase(&self, connection: &mut Connection, row: &Record) {
        let phase = row.get("max_phase_for_ind");
        let Some(value) = phase.as_f64() else {
            return;
        };

        match connection.attribute_mut(MAX_PHASE) {
            Some(existing) => {
                if existing.value.as_f64().is_none_or(|current| value > current) {
                    existing.value = phase.to_json();
                }
            }
            None => connection.attributes.push(
                Attribute::new(MAX_PHASE, phase.to_json(), &self.info.name).with_type(MAX_PHASE_TYPE),
            ),
        }
    }
}

#[async_trait]
impl Exporter for IndicationExporter {
    fn info(&self) -> &TransformerInfo {
        &self.info
    }

    async fn export(&self, collection: &[Element], _controls: &Controls) -> Result<Vec<Element>> {
        let mut indications = Indications::default();

        for element in collection {
            let Some(chembl_id) = chembl_id_of(self.queries.as_ref(), element).await? else {
                continue;
            };
            for row in self.queries.indications(&chembl_id).await? {
                self.add_row(&mut indications, &element.id, &row);
            }
        }

        info!(
            compounds = collection.len(),
            indications = indications.elements.len(),
            "Exported indications"
        );
        Ok(indications.elements)
    }
}
