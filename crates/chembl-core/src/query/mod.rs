//! Query service over the ChEMBL relational database
//!
//! The transformers never build SQL themselves. They go through the
//! `ChemblQueries` trait, which exposes a fixed, enumerated set of lookups.
//! Each lookup accepts exactly one typed key and returns rows in database
//! order; an empty vector means "not found" and is never an error.
//!
//! ## Implementations
//!
//! - `SqliteChemblQueries`: the ChEMBL SQLite dump plus the target
//!   cross-reference database, via `sqlx`
//! - an in-memory fake used by the unit tests
//!
//! The target cross-reference lookup is wrapped by `TargetXrefCache`, the
//! only state shared between invocations.

use async_trait::async_trait;

use crate::error::Result;

#[cfg(test)]
pub(crate) mod memory;
mod record;
mod sqlite;
mod xref;

pub use record::{Record, Value};
pub use sqlite::SqliteChemblQueries;
pub use xref::TargetXrefCache;

/// Reference tables that can be expanded into publication attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceTable {
    /// `mechanism_refs`, keyed by `mec_id`
    Mechanism,
    /// `metabolism_refs`, keyed by `met_id`
    Metabolism,
}

impl ReferenceTable {
    /// Table name
    pub fn table(&self) -> &'static str {
        match self {
            Self::Mechanism => "mechanism_refs",
            Self::Metabolism => "metabolism_refs",
        }
    }

    /// Column holding the owning record id
    pub fn id_column(&self) -> &'static str {
        match self {
            Self::Mechanism => "mec_id",
            Self::Metabolism => "met_id",
        }
    }
}

/// Fixed lookups against the ChEMBL database
#[async_trait]
pub trait ChemblQueries: Send + Sync {
    // ========== Compound Lookups ==========

    /// Compounds with an exact ChEMBL id
    async fn compounds_by_chembl_id(&self, chembl_id: &str) -> Result<Vec<Record>>;

    /// Compounds with an exact standard InChIKey
    async fn compounds_by_inchikey(&self, inchikey: &str) -> Result<Vec<Record>>;

    /// Compounds whose preferred name matches exactly
    async fn compounds_by_pref_name(&self, name: &str) -> Result<Vec<Record>>;

    /// Compounds with a synonym matching case-insensitively
    async fn compounds_by_synonym(&self, synonym: &str) -> Result<Vec<Record>>;

    /// Synonym rows (`syn_type`, `synonyms`) for a molecule
    async fn molecule_synonyms(&self, molregno: i64) -> Result<Vec<Record>>;

    // ========== Annotation Lookups ==========

    /// Drug indications joined with their references
    async fn indications(&self, chembl_id: &str) -> Result<Vec<Record>>;

    /// Activities joined with assay, target, document, and efficiency data
    async fn activities(&self, chembl_id: &str) -> Result<Vec<Record>>;

    /// Drug mechanisms joined with targets, binding sites, and documents
    async fn mechanisms(&self, chembl_id: &str) -> Result<Vec<Record>>;

    /// Mechanisms on protein targets, one row per target component
    async fn targets(&self, chembl_id: &str) -> Result<Vec<Record>>;

    /// ATC classification levels for a molecule
    async fn atc_classifications(&self, molregno: i64) -> Result<Vec<Record>>;

    /// Metabolism rows where the compound is the substrate
    async fn direct_metabolites(&self, chembl_id: &str) -> Result<Vec<Record>>;

    /// Reference rows (`ref_type`, `ref_id`, `ref_url`) for a record
    async fn references(&self, table: ReferenceTable, id: i64) -> Result<Vec<Record>>;

    // ========== Cross-reference Lookups ==========

    /// Ensembl gene ids cross-referenced from a target component
    async fn target_xrefs(&self, component_id: i64) -> Result<Vec<String>>;
}
