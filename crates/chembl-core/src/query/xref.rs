//! Read-through cache for target cross-references
//!
//! Maps a target component id to the Ensembl gene ids cross-referenced from
//! it. Entries are loaded on first use and never invalidated: the reference
//! data is read-only for the lifetime of the process. One cache is owned by
//! the transformer registry and shared by every invocation.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::ChemblQueries;
use crate::error::Result;

/// Lazily populated component id → gene ids map
pub struct TargetXrefCache {
    queries: Arc<dyn ChemblQueries>,
    entries: RwLock<HashMap<i64, Arc<[String]>>>,
}

impl TargetXrefCache {
    /// Create an empty cache over a query service
    pub fn new(queries: Arc<dyn ChemblQueries>) -> Self {
        Self {
            queries,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Gene ids for a target component, loading them on first request
    pub async fn gene_ids(&self, component_id: i64) -> Result<Arc<[String]>> {
        if let Some(ids) = self.entries.read().await.get(&component_id) {
            return Ok(Arc::clone(ids));
        }

        let ids: Arc<[String]> = self.queries.target_xrefs(component_id).await?.into();
        debug!(component_id, genes = ids.len(), "Cached target cross-references");

        let mut entries = self.entries.write().await;
        let cached = entries.entry(component_id).or_insert(ids);
        Ok(Arc::clone(cached))
    }

    /// Number of cached components
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl std::fmt::Debug for TargetXrefCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetXrefCache").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::memory::InMemoryQueries;

    #[tokio::test]
    async fn test_lookup_is_cached() {
        let queries = Arc::new(InMemoryQueries::default().with_xrefs(101, &["ENSG00000073756"]));
        let cache = TargetXrefCache::new(queries.clone());

        let first = cache.gene_ids(101).await.unwrap();
        let second = cache.gene_ids(101).await.unwrap();

        assert_eq!(&*first, &["ENSG00000073756".to_string()]);
        assert_eq!(first, second);
        assert_eq!(queries.xref_lookups(), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_empty_result_is_cached_too() {
        let queries = Arc::new(InMemoryQueries::default());
        let cache = TargetXrefCache::new(queries.clone());

        assert!(cache.gene_ids(7).await.unwrap().is_empty());
        assert!(cache.gene_ids(7).await.unwrap().is_empty());
        assert_eq!(queries.xref_lookups(), 1);
        assert!(!cache.is_empty().await);
    }
}
