//! Identity resolution
//!
//! Resolves a free-text query term to compound rows, and recovers the ChEMBL
//! id of an upstream element so downstream lookups can be keyed on it.
//!
//! The compound cascade is, first success wins:
//!
//! 1. `CHEMBL:`-prefixed terms (any case) lose exactly the prefix and are
//!    looked up by id; `CHEMBL`-prefixed terms are looked up unchanged
//! 2. terms shaped like an InChIKey are looked up by structure key only
//! 3. otherwise preferred name (upper-cased, then as typed), then synonym
//!
//! Detection is purely syntactic. A term nothing matches resolves to no rows.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::Result;
use crate::model::{Element, curie};
use crate::query::{ChemblQueries, Record};

const CHEMBL_CURIE_MARKER: &str = "CHEMBL:";
const CHEMBL_ID_MARKER: &str = "CHEMBL";

static INCHIKEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{14}-[A-Z]{10}-[A-Z]").expect("InChIKey pattern is valid")
});

/// How a query term will be looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompoundTerm<'a> {
    /// Exact ChEMBL id
    ChemblId(&'a str),
    /// Exact standard InChIKey
    InchiKey(&'a str),
    /// Preferred name, then synonym
    Name(&'a str),
}

impl<'a> CompoundTerm<'a> {
    /// Classify a (trimmed) query term
    pub fn classify(term: &'a str) -> Self {
        if has_marker(term, CHEMBL_CURIE_MARKER) {
            Self::ChemblId(&term[CHEMBL_CURIE_MARKER.len()..])
        } else if has_marker(term, CHEMBL_ID_MARKER) {
            Self::ChemblId(term)
        } else if INCHIKEY.is_match(term) {
            Self::InchiKey(term)
        } else {
            Self::Name(term)
        }
    }
}

fn has_marker(term: &str, marker: &str) -> bool {
    term.get(..marker.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(marker))
}

/// Compound rows matching a query term
pub async fn find_compounds(queries: &dyn ChemblQueries, term: &str) -> Result<Vec<Record>> {
    match CompoundTerm::classify(term) {
        CompoundTerm::ChemblId(id) => queries.compounds_by_chembl_id(id).await,
        CompoundTerm::InchiKey(key) => queries.compounds_by_inchikey(key).await,
        CompoundTerm::Name(name) => {
            let upper = name.to_uppercase();
            let rows = queries.compounds_by_pref_name(&upper).await?;
            if !rows.is_empty() {
                return Ok(rows);
            }

            if upper != name {
                let rows = queries.compounds_by_pref_name(name).await?;
                if !rows.is_empty() {
                    return Ok(rows);
                }
            }

            let rows = queries.compounds_by_synonym(name).await?;
            debug!(term = %name, rows = rows.len(), "Resolved term by synonym");
            Ok(rows)
        }
    }
}

/// ChEMBL id of an upstream element
///
/// Uses the `chembl` identifier when present (without its CURIE prefix);
/// otherwise looks the element's `inchikey` up and takes the first match.
pub async fn chembl_id_of(queries: &dyn ChemblQueries, element: &Element) -> Result<Option<String>> {
    if let Some(chembl) = element.identifier("chembl") {
        let id = chembl.strip_prefix(curie::CHEMBL).unwrap_or(chembl);
        return Ok(Some(id.to_string()));
    }

    if let Some(inchikey) = element.identifier("inchikey") {
        let compounds = queries.compounds_by_inchikey(inchikey).await?;
        return Ok(compounds.first().and_then(|row| row.text("chembl_id")));
    }

    debug!(element_id = %element.id, "Element has no ChEMBL id or InChIKey");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BiolinkClass;
    use crate::query::memory::InMemoryQueries;

    const ASPIRIN_KEY: &str = "BSYNRYMUTXBXSQ-UHFFFAOYSA-N";

    fn aspirin() -> Record {
        Record::new()
            .with("molregno", 1280)
            .with("chembl_id", "CHEMBL25")
            .with("pref_name", "ASPIRIN")
            .with("standard_inchi_key", ASPIRIN_KEY)
    }

    #[test]
    fn test_classify_chembl_terms() {
        assert_eq!(CompoundTerm::classify("CHEMBL25"), CompoundTerm::ChemblId("CHEMBL25"));
        assert_eq!(CompoundTerm::classify("CHEMBL:25"), CompoundTerm::ChemblId("25"));
        assert_eq!(CompoundTerm::classify("chembl:CHEMBL25"), CompoundTerm::ChemblId("CHEMBL25"));
        assert_eq!(CompoundTerm::classify("ChEMBL25"), CompoundTerm::ChemblId("ChEMBL25"));
    }

    #[test]
    fn test_classify_inchikey_and_names() {
        assert_eq!(CompoundTerm::classify(ASPIRIN_KEY), CompoundTerm::InchiKey(ASPIRIN_KEY));
        assert_eq!(
            CompoundTerm::classify("bsynrymutxbxsq-uhfffaoysa-n"),
            CompoundTerm::Name("bsynrymutxbxsq-uhfffaoysa-n")
        );
        assert_eq!(CompoundTerm::classify("aspirin"), CompoundTerm::Name("aspirin"));
        assert_eq!(CompoundTerm::classify("CHEM"), CompoundTerm::Name("CHEM"));
        assert_eq!(CompoundTerm::classify(""), CompoundTerm::Name(""));
    }

    #[tokio::test]
    async fn test_inchikey_bypasses_name_search() {
        let queries = InMemoryQueries::default();

        let rows = find_compounds(&queries, ASPIRIN_KEY).await.unwrap();

        assert!(rows.is_empty());
        assert_eq!(queries.calls(), vec![format!("inchikey:{}", ASPIRIN_KEY)]);
    }

    #[tokio::test]
    async fn test_curie_marker_is_stripped() {
        let queries = InMemoryQueries::default().with_compound(aspirin());

        assert!(find_compounds(&queries, "CHEMBL:25").await.unwrap().is_empty());
        let rows = find_compounds(&queries, "CHEMBL25").await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(queries.calls(), vec!["chembl_id:25", "chembl_id:CHEMBL25"]);
    }

    #[tokio::test]
    async fn test_name_cascade_falls_back_to_synonym() {
        let queries = InMemoryQueries::default()
            .with_compound(aspirin())
            .with_synonym(1280, Some("TRADE_NAME"), "Aspro");

        let rows = find_compounds(&queries, "aspro").await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(
            queries.calls(),
            vec!["pref_name:ASPRO", "pref_name:aspro", "synonym:aspro"]
        );
    }

    #[tokio::test]
    async fn test_upper_cased_pref_name_wins() {
        let queries = InMemoryQueries::default().with_compound(aspirin());

        let rows = find_compounds(&queries, "Aspirin").await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(queries.calls(), vec!["pref_name:ASPIRIN"]);
    }

    #[tokio::test]
    async fn test_chembl_id_of_element() {
        let queries = InMemoryQueries::default().with_compound(aspirin());

        let mut by_chembl = Element::new("ChEMBL:CHEMBL25", BiolinkClass::ChemicalSubstance, "x");
        by_chembl.set_identifier("chembl", Some("ChEMBL:CHEMBL25"));
        assert_eq!(
            chembl_id_of(&queries, &by_chembl).await.unwrap().as_deref(),
            Some("CHEMBL25")
        );

        let mut by_key = Element::new("PUBCHEM:2244", BiolinkClass::ChemicalSubstance, "x");
        by_key.set_identifier("inchikey", Some(ASPIRIN_KEY));
        assert_eq!(
            chembl_id_of(&queries, &by_key).await.unwrap().as_deref(),
            Some("CHEMBL25")
        );

        let bare = Element::new("PUBCHEM:1", BiolinkClass::ChemicalSubstance, "x");
        assert_eq!(chembl_id_of(&queries, &bare).await.unwrap(), None);
    }
}
