//! Output model: elements, names, attributes, and connections
//!
//! These are the records handed back to the caller of a transformer. Each
//! element is a canonical biological or chemical entity identified by a CURIE;
//! connections are edges from an upstream element to the element that owns
//! them, and attributes carry provenance-tagged scalar facts.
//!
//! ## Data Model
//!
//! - **Element**: a node (compound, gene, disease, assay, molecular entity)
//! - **Names**: a primary name or a group of synonyms with their origin
//! - **Attribute**: a single fact with its source and provider
//! - **Connection**: an edge from a source element id, carrying attributes

mod attribute;
mod connection;
mod element;
mod names;

pub use attribute::Attribute;
pub use connection::Connection;
pub use element::{BiolinkClass, Element, Identifier};
pub use names::Names;

/// Provenance tag for every attribute and name record produced here
pub const SOURCE: &str = "ChEMBL";

/// CURIE prefixes used for element ids and re-prefixed values
pub mod curie {
    pub const CHEMBL: &str = "ChEMBL:";
    pub const ENSEMBL: &str = "ENSEMBL:";
    pub const MESH: &str = "MESH:";
}

/// ChEMBL report card base URLs
pub const DOCUMENT_REPORT_URL: &str = "https://www.ebi.ac.uk/chembl/document_report_card/";
pub const COMPOUND_REPORT_URL: &str = "https://www.ebi.ac.uk/chembl/compound_report_card/";
