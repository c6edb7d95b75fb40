//! ChEMBL Core Library
//!
//! This crate turns rows of a ChEMBL SQLite dump into typed knowledge-graph
//! elements, including:
//! - Model (elements, connections, names, attributes)
//! - Query service (fixed lookups over SQLite, target cross-reference cache)
//! - Identity resolution (query terms and upstream elements to ChEMBL ids)
//! - Transformers (compounds, gene targets, indications, assays, mechanisms, metabolites)
//! - Transformer registry
//! - Storage and configuration

pub mod attributes;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod resolve;
pub mod storage;
pub mod transformer;
pub mod transformers;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::model::{BiolinkClass, Element};
    pub use crate::storage::ChemblDatabases;
    pub use crate::transformer::{TransformerQuery, TransformerRegistry};
}
