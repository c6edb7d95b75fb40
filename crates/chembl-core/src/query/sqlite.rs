//! SQLite implementation of the ChEMBL query service

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use super::record::Record;
use super::{ChemblQueries, ReferenceTable};
use crate::error::Result;

const COMPOUND_SELECT: &str = r#"
    SELECT
        molecule_dictionary.molregno,
        molecule_dictionary.pref_name,
        molecule_dictionary.chembl_id,
        molecule_dictionary.max_phase,
        molecule_dictionary.therapeutic_flag,
        molecule_dictionary.dosed_ingredient,
        molecule_dictionary.chebi_par_id,
        molecule_dictionary.molecule_type,
        molecule_dictionary.first_approval,
        molecule_dictionary.oral,
        molecule_dictionary.parenteral,
        molecule_dictionary.topical,
        molecule_dictionary.black_box_warning,
        molecule_dictionary.natural_product,
        molecule_dictionary.first_in_class,
        molecule_dictionary.chirality,
        molecule_dictionary.prodrug,
        molecule_dictionary.inorganic_flag,
        molecule_dictionary.usan_year,
        molecule_dictionary.availability_type,
        molecule_dictionary.usan_stem,
        molecule_dictionary.polymer_flag,
        molecule_dictionary.usan_substem,
        molecule_dictionary.usan_stem_definition,
        molecule_dictionary.indication_class,
        molecule_dictionary.withdrawn_flag,
        molecule_dictionary.withdrawn_year,
        molecule_dictionary.withdrawn_country,
        molecule_dictionary.withdrawn_reason,
        molecule_dictionary.withdrawn_class,
        compound_structures.standard_inchi,
        compound_structures.standard_inchi_key,
        compound_structures.canonical_smiles
    FROM molecule_dictionary
    JOIN compound_structures ON (compound_structures.molregno = molecule_dictionary.molregno)
"#;

const SYNONYM_JOIN: &str = r#"
    JOIN (
        SELECT DISTINCT molregno
        FROM molecule_synonyms
        WHERE synonyms = ? COLLATE NOCASE
    ) AS syn ON (syn.molregno = molecule_dictionary.molregno)
"#;

const MOLECULE_SYNONYMS: &str = r#"
    SELECT syn_type, synonyms
    FROM molecule_synonyms
    WHERE molregno = ?
"#;

const INDICATIONS: &str = r#"
    SELECT
        drug_indication.drugind_id,
        drug_indication.mesh_id,
        drug_indication.mesh_heading,
        drug_indication.efo_id,
        drug_indication.efo_term,
        drug_indication.max_phase_for_ind,
        indication_refs.ref_type,
        indication_refs.ref_id,
        indication_refs.ref_url
    FROM drug_indication
    JOIN molecule_dictionary ON (molecule_dictionary.molregno = drug_indication.molregno)
    JOIN indication_refs ON (indication_refs.drugind_id = drug_indication.drugind_id)
    WHERE molecule_dictionary.chembl_id = ?
"#;

const ACTIVITIES: &str = r#"
    SELECT
        activities.activity_id,
        activities.standard_type,
        activities.standard_relation,
        activities.standard_value,
        activities.standard_units,
        activities.pchembl_value,
        activities.activity_comment,
        assays.chembl_id AS assay_chembl_id,
        assays.description AS assay_description,
        bioassay_ontology.label AS BAO_label,
        assays.assay_organism,
        target_dictionary.chembl_id AS target_chembl_id,
        target_dictionary.pref_name AS target_name,
        target_dictionary.organism AS target_organism,
        target_dictionary.target_type,
        docs.chembl_id AS document_chembl_id,
        source.src_description AS source_description,
        cell_dictionary.chembl_id AS cell_chembl_id,
        activities.data_validity_comment,
        activities.uo_units,
        ligand_eff.bei AS ligand_efficiency_BEI,
        ligand_eff.le AS ligand_efficiency_LE,
        ligand_eff.lle AS ligand_efficiency_LLE,
        ligand_eff.sei AS ligand_efficiency_SEI,
        assay_type.assay_desc AS assay_type,
        assays.bao_format,
        tissue_dictionary.chembl_id AS assay_tissue_chembl_id,
        tissue_dictionary.pref_name AS assay_tissue_name,
        assays.assay_cell_type,
        assays.assay_subcellular_fraction,
        docs.journal,
        docs.year
    FROM activities
    JOIN molecule_dictionary ON activities.molregno = molecule_dictionary.molregno
    JOIN assays ON activities.assay_id = assays.assay_id
    LEFT JOIN bioassay_ontology ON bioassay_ontology.bao_id = assays.bao_format
    LEFT JOIN target_dictionary ON target_dictionary.tid = assays.tid
    LEFT JOIN cell_dictionary ON cell_dictionary.cell_id = assays.cell_id
    LEFT JOIN assay_type ON assay_type.assay_type = assays.assay_type
    LEFT JOIN tissue_dictionary ON tissue_dictionary.tissue_id = assays.tissue_id
    LEFT JOIN docs ON activities.doc_id = docs.doc_id
    LEFT JOIN source ON source.src_id = activities.src_id
    LEFT JOIN ligand_eff ON ligand_eff.activity_id = activities.activity_id
    WHERE molecule_dictionary.chembl_id = ?
"#;

const MECHANISMS: &str = r#"
    SELECT
        drug_mechanism.mec_id,
        drug_mechanism.molregno,
        drug_mechanism.mechanism_of_action,
        drug_mechanism.action_type,
        drug_mechanism.mechanism_comment,
        drug_mechanism.selectivity_comment,
        target_dictionary.chembl_id AS target_chembl_id,
        target_dictionary.pref_name AS target_name,
        target_dictionary.target_type,
        target_dictionary.organism AS target_organism,
        binding_sites.site_name,
        drug_mechanism.binding_site_comment,
        source.src_description AS source_description,
        docs.chembl_id AS document_chembl_id
    FROM drug_mechanism
    JOIN molecule_dictionary ON molecule_dictionary.molregno = drug_mechanism.molregno
    LEFT JOIN target_dictionary ON target_dictionary.tid = drug_mechanism.tid
    LEFT JOIN binding_sites ON binding_sites.site_id = drug_mechanism.site_id
    LEFT JOIN compound_records ON compound_records.record_id = drug_mechanism.record_id
    LEFT JOIN docs ON (docs.doc_id = compound_records.doc_id AND compound_records.doc_id != -1)
    LEFT JOIN source ON source.src_id = compound_records.src_id
    WHERE molecule_dictionary.chembl_id = ?
"#;

const TARGETS: &str = r#"
    SELECT
        drug_mechanism.mec_id,
        drug_mechanism.mechanism_of_action,
        drug_mechanism.action_type,
        target_dictionary.chembl_id AS target_chembl_id,
        target_components.component_id
    FROM drug_mechanism
    JOIN molecule_dictionary ON molecule_dictionary.molregno = drug_mechanism.molregno
    JOIN target_dictionary ON target_dictionary.tid = drug_mechanism.tid
    JOIN target_components ON target_components.tid = drug_mechanism.tid
    WHERE (target_dictionary.target_type = 'SINGLE PROTEIN' OR target_dictionary.target_type = 'PROTEIN FAMILY')
    AND molecule_dictionary.chembl_id = ?
"#;

const ATC_CLASSIFICATIONS: &str = r#"
    SELECT
        atc_classification.level1,
        atc_classification.level1_description,
        atc_classification.level2,
        atc_classification.level2_description,
        atc_classification.level3,
        atc_classification.level3_description,
        atc_classification.level4,
        atc_classification.level4_description,
        atc_classification.level5,
        atc_classification.who_name AS level5_description
    FROM molecule_atc_classification
    JOIN atc_classification ON atc_classification.level5 = molecule_atc_classification.level5
    WHERE molecule_atc_classification.molregno = ?
"#;

const DIRECT_METABOLITES: &str = r#"
    SELECT
        metabolism.met_id,
        metabolism.enzyme_name,
        metabolism.met_conversion,
        metabolism.met_comment,
        metabolism.organism,
        metabolism.tax_id,
        metabolite_record.compound_name AS metabolite_name,
        metabolite.pref_name AS metabolite_pref_name,
        metabolite.chembl_id AS metabolite_chembl_id,
        target_dictionary.target_type AS enzyme_type,
        target_dictionary.chembl_id AS enzyme_chembl_id,
        compound_structures.standard_inchi AS inchi,
        compound_structures.standard_inchi_key AS inchikey,
        compound_structures.canonical_smiles AS smiles
    FROM molecule_dictionary
    JOIN compound_records ON compound_records.molregno = molecule_dictionary.molregno
    JOIN metabolism ON metabolism.substrate_record_id = compound_records.record_id
    JOIN compound_records AS metabolite_record ON metabolite_record.record_id = metabolism.metabolite_record_id
    JOIN molecule_dictionary AS metabolite ON metabolite.molregno = metabolite_record.molregno
    LEFT JOIN target_dictionary ON (target_dictionary.tid = metabolism.enzyme_tid AND target_type != 'UNCHECKED')
    LEFT JOIN compound_structures ON compound_structures.molregno = metabolite.molregno
    WHERE molecule_dictionary.chembl_id = ?
"#;

const TARGET_XREFS: &str = r#"
    SELECT xref_id
    FROM component_xref
    WHERE component_xref.xref_src_db = 'EnsemblGene'
    AND component_id = ?
"#;

/// ChEMBL lookups over two SQLite databases
///
/// `chembl` is the ChEMBL dump; `xref` holds the `component_xref` table used to
/// map target components to Ensembl genes.
#[derive(Debug, Clone)]
pub struct SqliteChemblQueries {
    chembl: SqlitePool,
    xref: SqlitePool,
}

impl SqliteChemblQueries {
    /// Create a query service over the two pools
    pub fn new(chembl: SqlitePool, xref: SqlitePool) -> Self {
        Self { chembl, xref }
    }

    async fn fetch_by_text(&self, sql: &str, key: &str) -> Result<Vec<Record>> {
        let rows = sqlx::query(sql).bind(key).fetch_all(&self.chembl).await?;
        rows.iter().map(Record::from_sqlite_row).collect()
    }

    async fn fetch_by_id(&self, sql: &str, key: i64) -> Result<Vec<Record>> {
        let rows = sqlx::query(sql).bind(key).fetch_all(&self.chembl).await?;
        rows.iter().map(Record::from_sqlite_row).collect()
    }

    async fn compounds_where(&self, filter: &str, key: &str) -> Result<Vec<Record>> {
        let sql = format!("{}{}", COMPOUND_SELECT, filter);
        let rows = self.fetch_by_text(&sql, key).await?;
        debug!(key = %key, rows = rows.len(), "Compound lookup");
        Ok(rows)
    }
}

#[async_trait]
impl ChemblQueries for SqliteChemblQueries {
    async fn compounds_by_chembl_id(&self, chembl_id: &str) -> Result<Vec<Record>> {
        self.compounds_where("WHERE molecule_dictionary.chembl_id = ?", chembl_id)
            .await
    }

    async fn compounds_by_inchikey(&self, inchikey: &str) -> Result<Vec<Record>> {
        self.compounds_where("WHERE compound_structures.standard_inchi_key = ?", inchikey)
            .await
    }

    async fn compounds_by_pref_name(&self, name: &str) -> Result<Vec<Record>> {
        self.compounds_where("WHERE molecule_dictionary.pref_name = ?", name)
            .await
    }

    async fn compounds_by_synonym(&self, synonym: &str) -> Result<Vec<Record>> {
        self.compounds_where(SYNONYM_JOIN, synonym).await
    }

    async fn molecule_synonyms(&self, molregno: i64) -> Result<Vec<Record>> {
        self.fetch_by_id(MOLECULE_SYNONYMS, molregno).await
    }

    async fn indications(&self, chembl_id: &str) -> Result<Vec<Record>> {
        self.fetch_by_text(INDICATIONS, chembl_id).await
    }

    async fn activities(&self, chembl_id: &str) -> Result<Vec<Record>> {
        self.fetch_by_text(ACTIVITIES, chembl_id).await
    }

    async fn mechanisms(&self, chembl_id: &str) -> Result<Vec<Record>> {
        self.fetch_by_text(MECHANISMS, chembl_id).await
    }

    async fn targets(&self, chembl_id: &str) -> Result<Vec<Record>> {
        self.fetch_by_text(TARGETS, chembl_id).await
    }

    async fn atc_classifications(&self, molregno: i64) -> Result<Vec<Record>> {
        self.fetch_by_id(ATC_CLASSIFICATIONS, molregno).await
    }

    async fn direct_metabolites(&self, chembl_id: &str) -> Result<Vec<Record>> {
        self.fetch_by_text(DIRECT_METABOLITES, chembl_id).await
    }

    async fn references(&self, table: ReferenceTable, id: i64) -> Result<Vec<Record>> {
        let sql = format!(
            "SELECT ref_type, ref_id, ref_url FROM {} WHERE {} = ?",
            table.table(),
            table.id_column()
        );
        self.fetch_by_id(&sql, id).await
    }

    async fn target_xrefs(&self, component_id: i64) -> Result<Vec<String>> {
        let ids: Vec<(String,)> = sqlx::query_as(TARGET_XREFS)
            .bind(component_id)
            .fetch_all(&self.xref)
            .await?;
        Ok(ids.into_iter().map(|(id,)| id).collect())
    }
}
