//! Registry of the ChEMBL transformers

use std::sync::Arc;

use tracing::info;

use super::{Transformer, TransformerInfo, TransformerQuery};
use crate::error::{Error, Result};
use crate::model::Element;
use crate::query::{ChemblQueries, TargetXrefCache};
use crate::transformers::{
    AssayExporter, IndicationExporter, MechanismExporter, MetaboliteTransformer,
    MoleculeProducer, TargetTransformer,
};

/// All transformers over one query service
///
/// Holds the process-wide `TargetXrefCache`; keep one registry alive for the
/// lifetime of the process so cached cross-references are reused.
#[derive(Debug)]
pub struct TransformerRegistry {
    transformers: Vec<Transformer>,
    xref_cache: Arc<TargetXrefCache>,
}

impl TransformerRegistry {
    /// Register the compound producer and every downstream transformer
    pub fn new(queries: Arc<dyn ChemblQueries>) -> Self {
        let xref_cache = Arc::new(TargetXrefCache::new(Arc::clone(&queries)));
        let transformers = vec![
            Transformer::Producer(Box::new(MoleculeProducer::new(Arc::clone(&queries)))),
            Transformer::Mapper(Box::new(TargetTransformer::new(
                Arc::clone(&queries),
                Arc::clone(&xref_cache),
            ))),
            Transformer::Exporter(Box::new(IndicationExporter::new(Arc::clone(&queries)))),
            Transformer::Exporter(Box::new(AssayExporter::new(Arc::clone(&queries)))),
            Transformer::Exporter(Box::new(MechanismExporter::new(Arc::clone(&queries)))),
            Transformer::Mapper(Box::new(MetaboliteTransformer::new(queries))),
        ];
        Self {
            transformers,
            xref_cache,
        }
    }

    /// Definitions of every transformer, without opening any database
    pub fn definitions() -> Vec<TransformerInfo> {
        vec![
            MoleculeProducer::definition(),
            TargetTransformer::definition(),
            IndicationExporter::definition(),
            AssayExporter::definition(),
            MechanismExporter::definition(),
            MetaboliteTransformer::definition(),
        ]
    }

    /// Definitions of all registered transformers
    pub fn infos(&self) -> Vec<&TransformerInfo> {
        self.transformers.iter().map(Transformer::info).collect()
    }

    /// Look up a transformer by name
    pub fn get(&self, name: &str) -> Option<&Transformer> {
        self.transformers.iter().find(|t| t.info().name == name)
    }

    /// The shared cross-reference cache
    pub fn xref_cache(&self) -> &Arc<TargetXrefCache> {
        &self.xref_cache
    }

    /// Run a transformer by name
    pub async fn transform(&self, name: &str, query: &TransformerQuery) -> Result<Vec<Element>> {
        let transformer = self
            .get(name)
            .ok_or_else(|| Error::TransformerNotFound(name.to_string()))?;

        info!(
            transformer = %name,
            function = %transformer.info().function,
            inputs = query.collection.len(),
            "Running transformer"
        );
        let elements = transformer.run(query).await?;
        info!(transformer = %name, outputs = elements.len(), "Transformer finished");

        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Record;
    use crate::query::memory::InMemoryQueries;
    use crate::transformer::TransformerFunction;
    use crate::transformers::{
        ASSAY_TRANSFORMER, INDICATION_TRANSFORMER, MOLECULE_PRODUCER, TARGET_TRANSFORMER,
    };

    fn registry() -> TransformerRegistry {
        let queries = InMemoryQueries::default()
            .with_compound(
                Record::new()
                    .with("molregno", 1280)
                    .with("chembl_id", "CHEMBL25")
                    .with("pref_name", "ASPIRIN"),
            )
            .with_target(
                "CHEMBL25",
                Record::new()
                    .with("mec_id", 1)
                    .with("action_type", "INHIBITOR")
                    .with("component_id", 10),
            )
            .with_xrefs(10, &["ENSG00000073756"]);
        TransformerRegistry::new(Arc::new(queries))
    }

    #[test]
    fn test_registry_lists_all_transformers() {
        let registry = registry();
        let infos = registry.infos();

        assert_eq!(infos.len(), 6);
        assert_eq!(infos[0].function, TransformerFunction::Producer);
        assert!(registry.get(ASSAY_TRANSFORMER).is_some());
        assert!(registry.get("nonsense").is_none());
    }

    #[test]
    fn test_static_definitions_match_registered() {
        let registry = registry();
        let definitions = TransformerRegistry::definitions();
        let registered: Vec<TransformerInfo> = registry.infos().into_iter().cloned().collect();

        assert_eq!(definitions, registered);
    }

    #[tokio::test]
    async fn test_unknown_transformer() {
        let err = registry()
            .transform("nonsense", &TransformerQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E001");
    }

    #[tokio::test]
    async fn test_producer_requires_compounds() {
        let err = registry()
            .transform(MOLECULE_PRODUCER, &TransformerQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingControl(_)));
    }

    #[tokio::test]
    async fn test_chained_invocations_share_xref_cache() {
        let registry = registry();
        let compounds = registry
            .transform(
                MOLECULE_PRODUCER,
                &TransformerQuery::with_controls(&[("compounds", "aspirin")]),
            )
            .await
            .unwrap();
        assert_eq!(compounds.len(), 1);

        let query = TransformerQuery::default().with_collection(compounds);
        let genes = registry.transform(TARGET_TRANSFORMER, &query).await.unwrap();
        let again = registry.transform(TARGET_TRANSFORMER, &query).await.unwrap();

        assert_eq!(genes, again);
        assert_eq!(genes[0].id, "ENSEMBL:ENSG00000073756");
        assert_eq!(registry.xref_cache().len().await, 1);

        let indications = registry.transform(INDICATION_TRANSFORMER, &query).await.unwrap();
        assert!(indications.is_empty());
    }
}
