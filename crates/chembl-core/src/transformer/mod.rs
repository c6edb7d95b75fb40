//! Transformer contract and registry
//!
//! A transformer declares a `TransformerInfo` and implements exactly one of
//! three verbs:
//!
//! - `Producer::produce(controls)`: free-text query terms to entities
//! - `Mapper::map(collection, controls)`: entities to related entities
//! - `Exporter::export(collection, controls)`: entities to annotation entities
//!
//! The `TransformerRegistry` owns every transformer together with the shared
//! target cross-reference cache and dispatches queries by transformer name.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chembl_core::transformer::{TransformerQuery, TransformerRegistry};
//!
//! let registry = TransformerRegistry::new(queries);
//! let compounds = registry
//!     .transform("ChEMBL compound-list producer", &TransformerQuery::with_controls(&[("compounds", "aspirin")]))
//!     .await?;
//! let genes = registry
//!     .transform("ChEMBL gene-target transformer", &TransformerQuery::default().with_collection(compounds))
//!     .await?;
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::model::Element;

mod controls;
mod info;
mod registry;

pub use controls::{Controls, Property, TransformerQuery};
pub use info::{
    DEFAULT_PREDICATE, KnowledgeMap, Parameter, Predicate, TransformerFunction, TransformerInfo,
};
pub use registry::TransformerRegistry;

/// Turns control values into entities
#[async_trait]
pub trait Producer: Send + Sync {
    fn info(&self) -> &TransformerInfo;

    async fn produce(&self, controls: &Controls) -> Result<Vec<Element>>;
}

/// Turns upstream entities into new related entities
#[async_trait]
pub trait Mapper: Send + Sync {
    fn info(&self) -> &TransformerInfo;

    async fn map(&self, collection: &[Element], controls: &Controls) -> Result<Vec<Element>>;
}

/// Turns upstream entities into annotation entities
#[async_trait]
pub trait Exporter: Send + Sync {
    fn info(&self) -> &TransformerInfo;

    async fn export(&self, collection: &[Element], controls: &Controls) -> Result<Vec<Element>>;
}

/// A registered transformer with its single entry point
pub enum Transformer {
    Producer(Box<dyn Producer>),
    Mapper(Box<dyn Mapper>),
    Exporter(Box<dyn Exporter>),
}

impl Transformer {
    pub fn info(&self) -> &TransformerInfo {
        match self {
            Self::Producer(t) => t.info(),
            Self::Mapper(t) => t.info(),
            Self::Exporter(t) => t.info(),
        }
    }

    /// Validate controls against the definition and run the entry point
    pub async fn run(&self, query: &TransformerQuery) -> Result<Vec<Element>> {
        let controls = query.controls().prepare(self.info())?;
        match self {
            Self::Producer(t) => t.produce(&controls).await,
            Self::Mapper(t) => t.map(&query.collection, &controls).await,
            Self::Exporter(t) => t.export(&query.collection, &controls).await,
        }
    }
}

impl std::fmt::Debug for Transformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let info = self.info();
        f.debug_struct("Transformer")
            .field("name", &info.name)
            .field("function", &info.function)
            .finish()
    }
}
