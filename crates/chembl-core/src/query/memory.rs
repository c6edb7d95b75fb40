//! In-memory query service for unit tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{ChemblQueries, Record, ReferenceTable};
use crate::error::Result;

/// Canned rows keyed the way the real lookups are keyed
///
/// Every compound lookup is recorded in `calls` as `"<lookup>:<key>"` so tests
/// can assert which branch of the resolution cascade ran.
#[derive(Default)]
pub struct InMemoryQueries {
    compounds: Vec<Record>,
    synonyms: HashMap<i64, Vec<Record>>,
    indications: HashMap<String, Vec<Record>>,
    activities: HashMap<String, Vec<Record>>,
    mechanisms: HashMap<String, Vec<Record>>,
    targets: HashMap<String, Vec<Record>>,
    atc: HashMap<i64, Vec<Record>>,
    metabolites: HashMap<String, Vec<Record>>,
    references: HashMap<(ReferenceTable, i64), Vec<Record>>,
    xrefs: HashMap<i64, Vec<String>>,
    calls: Mutex<Vec<String>>,
    xref_lookups: AtomicUsize,
}

impl InMemoryQueries {
    pub fn with_compound(mut self, record: Record) -> Self {
        self.compounds.push(record);
        self
    }

    pub fn with_synonym(mut self, molregno: i64, syn_type: Option<&str>, synonym: &str) -> Self {
        self.synonyms.entry(molregno).or_default().push(
            Record::new()
                .with("syn_type", syn_type)
                .with("synonyms", synonym),
        );
        self
    }

    pub fn with_indication(mut self, chembl_id: &str, record: Record) -> Self {
        self.indications.entry(chembl_id.to_string()).or_default().push(record);
        self
    }

    pub fn with_activity(mut self, chembl_id: &str, record: Record) -> Self {
        self.activities.entry(chembl_id.to_string()).or_default().push(record);
        self
    }

    pub fn with_mechanism(mut self, chembl_id: &str, record: Record) -> Self {
        self.mechanisms.entry(chembl_id.to_string()).or_default().push(record);
        self
    }

    pub fn with_target(mut self, chembl_id: &str, record: Record) -> Self {
        self.targets.entry(chembl_id.to_string()).or_default().push(record);
        self
    }

    pub fn with_atc(mut self, molregno: i64, record: Record) -> Self {
        self.atc.entry(molregno).or_default().push(record);
        self
    }

    pub fn with_metabolite(mut self, chembl_id: &str, record: Record) -> Self {
        self.metabolites.entry(chembl_id.to_string()).or_default().push(record);
        self
    }

    pub fn with_reference(mut self, table: ReferenceTable, id: i64, ref_type: &str, ref_id: &str, ref_url: Option<&str>) -> Self {
        self.references.entry((table, id)).or_default().push(
            Record::new()
                .with("ref_type", ref_type)
                .with("ref_id", ref_id)
                .with("ref_url", ref_url),
        );
        self
    }

    pub fn with_xrefs(mut self, component_id: i64, gene_ids: &[&str]) -> Self {
        self.xrefs
            .insert(component_id, gene_ids.iter().map(|g| g.to_string()).collect());
        self
    }

    /// Compound lookups performed so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of cross-reference lookups that reached this service
    pub fn xref_lookups(&self) -> usize {
        self.xref_lookups.load(Ordering::SeqCst)
    }

    fn record_call(&self, lookup: &str, key: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("{}:{}", lookup, key));
        }
    }

    fn compounds_matching(&self, predicate: impl Fn(&Record) -> bool) -> Vec<Record> {
        self.compounds.iter().filter(|r| predicate(r)).cloned().collect()
    }
}

fn rows(map: &HashMap<String, Vec<Record>>, key: &str) -> Vec<Record> {
    map.get(key).cloned().unwrap_or_default()
}

#[async_trait]
impl ChemblQueries for InMemoryQueries {
    async fn compounds_by_chembl_id(&self, chembl_id: &str) -> Result<Vec<Record>> {
        self.record_call("chembl_id", chembl_id);
        Ok(self.compounds_matching(|r| r.text("chembl_id").as_deref() == Some(chembl_id)))
    }

    async fn compounds_by_inchikey(&self, inchikey: &str) -> Result<Vec<Record>> {
        self.record_call("inchikey", inchikey);
        Ok(self.compounds_matching(|r| r.text("standard_inchi_key").as_deref() == Some(inchikey)))
    }

    async fn compounds_by_pref_name(&self, name: &str) -> Result<Vec<Record>> {
        self.record_call("pref_name", name);
        Ok(self.compounds_matching(|r| r.text("pref_name").as_deref() == Some(name)))
    }

    async fn compounds_by_synonym(&self, synonym: &str) -> Result<Vec<Record>> {
        self.record_call("synonym", synonym);
        let wanted = synonym.to_lowercase();
        Ok(self.compounds_matching(|r| {
            r.integer("molregno")
                .and_then(|molregno| self.synonyms.get(&molregno))
                .is_some_and(|syns| {
                    syns.iter()
                        .any(|s| s.text("synonyms").is_some_and(|v| v.to_lowercase() == wanted))
                })
        }))
    }

    async fn molecule_synonyms(&self, molregno: i64) -> Result<Vec<Record>> {
        Ok(self.synonyms.get(&molregno).cloned().unwrap_or_default())
    }

    async fn indications(&self, chembl_id: &str) -> Result<Vec<Record>> {
        Ok(rows(&self.indications, chembl_id))
    }

    async fn activities(&self, chembl_id: &str) -> Result<Vec<Record>> {
        Ok(rows(&self.activities, chembl_id))
    }

    async fn mechanisms(&self, chembl_id: &str) -> Result<Vec<Record>> {
        Ok(rows(&self.mechanisms, chembl_id))
    }

    async fn targets(&self, chembl_id: &str) -> Result<Vec<Record>> {
        Ok(rows(&self.targets, chembl_id))
    }

    async fn atc_classifications(&self, molregno: i64) -> Result<Vec<Record>> {
        Ok(self.atc.get(&molregno).cloned().unwrap_or_default())
    }

    async fn direct_metabolites(&self, chembl_id: &str) -> Result<Vec<Record>> {
        Ok(rows(&self.metabolites, chembl_id))
    }

    async fn references(&self, table: ReferenceTable, id: i64) -> Result<Vec<Record>> {
        Ok(self.references.get(&(table, id)).cloned().unwrap_or_default())
    }

    async fn target_xrefs(&self, component_id: i64) -> Result<Vec<String>> {
        self.xref_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.xrefs.get(&component_id).cloned().unwrap_or_default())
    }
}
