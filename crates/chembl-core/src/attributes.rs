//! Attribute building from query rows
//!
//! Turns a (row, column) pair into an optional provenance-tagged attribute,
//! applying the type-specific coercions used across the transformers:
//! flags become `"yes"`, enumerated codes become labels, document ids become
//! publication attributes. Reference tables expand into publication
//! attributes with a CURIE prefix chosen by reference type.

use crate::error::Result;
use crate::model::{Attribute, DOCUMENT_REPORT_URL, curie};
use crate::query::{ChemblQueries, Record, ReferenceTable};

/// Labels for `molecule_dictionary.chirality`
pub const CHIRALITY_LABELS: &[(i64, &str)] = &[
    (0, "racemic mixture"),
    (1, "single stereoisomer"),
    (2, "achiral molecule"),
];

/// Labels for `molecule_dictionary.availability_type`
pub const AVAILABILITY_LABELS: &[(i64, &str)] = &[
    (0, "discontinued"),
    (1, "prescription only"),
    (2, "over the counter"),
];

const DOCUMENT_COLUMN: &str = "document_chembl_id";

/// Builds attributes stamped with the producing transformer's name
#[derive(Debug, Clone, Copy)]
pub struct AttributeBuilder<'a> {
    provided_by: &'a str,
}

impl<'a> AttributeBuilder<'a> {
    pub fn new(provided_by: &'a str) -> Self {
        Self { provided_by }
    }

    /// Name recorded in `provided_by`
    pub fn provided_by(&self) -> &'a str {
        self.provided_by
    }

    /// Plain attribute with a fixed value
    pub fn value(&self, name: &str, value: impl Into<serde_json::Value>) -> Attribute {
        Attribute::new(name, value, self.provided_by)
    }

    /// Attribute named after a column, or None when the column is null
    pub fn column(&self, row: &Record, column: &str) -> Option<Attribute> {
        row.text(column)
            .map(|value| Attribute::new(column, value, self.provided_by))
    }

    /// Attributes for every non-null column in a list, in list order
    pub fn columns(&self, row: &Record, columns: &[&str]) -> Vec<Attribute> {
        columns
            .iter()
            .filter_map(|column| self.column(row, column))
            .collect()
    }

    /// `"yes"` when a flag column is present and positive; nothing otherwise
    pub fn flag(&self, row: &Record, column: &str) -> Option<Attribute> {
        match row.get(column).as_f64() {
            Some(flag) if flag > 0.0 => Some(Attribute::new(column, "yes", self.provided_by)),
            _ => None,
        }
    }

    /// Label for a recognised code; unknown or null codes emit nothing
    pub fn coded(&self, row: &Record, column: &str, labels: &[(i64, &str)]) -> Option<Attribute> {
        let code = row.integer(column)?;
        labels
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, label)| Attribute::new(column, *label, self.provided_by))
    }

    /// Column value re-prefixed with the ChEMBL CURIE prefix
    pub fn chembl_curie(&self, row: &Record, column: &str) -> Option<Attribute> {
        let value = row.text(column)?;
        Some(Attribute::new(
            column,
            format!("{}{}", curie::CHEMBL, value),
            self.provided_by,
        ))
    }

    /// `document_chembl_id` re-tagged as a publication
    ///
    /// The value becomes `ChEMBL:<doc id>` and the url points at the document
    /// report card.
    pub fn publication(&self, row: &Record) -> Option<Attribute> {
        let document = row.text(DOCUMENT_COLUMN)?;
        Some(
            Attribute::new("publication", format!("{}{}", curie::CHEMBL, document), self.provided_by)
                .with_type("publication")
                .with_url(Some(format!("{}{}", DOCUMENT_REPORT_URL, document))),
        )
    }

    /// Publication attributes for every reference of a record
    pub async fn references(
        &self,
        queries: &dyn ChemblQueries,
        table: ReferenceTable,
        id: Option<i64>,
    ) -> Result<Vec<Attribute>> {
        let Some(id) = id else {
            return Ok(Vec::new());
        };

        let references = queries.references(table, id).await?;
        Ok(references
            .iter()
            .filter_map(|reference| self.reference(reference))
            .collect())
    }

    fn reference(&self, reference: &Record) -> Option<Attribute> {
        let ref_type = reference.text("ref_type")?;
        let ref_id = reference.text("ref_id")?;
        let value = reference_curie(&ref_type, &ref_id);
        Some(
            Attribute::new(ref_type, value, self.provided_by)
                .with_type("publication")
                .with_url(reference.text("ref_url")),
        )
    }
}

/// Prefix a reference id according to its type
///
/// PubMed and PMID ids become `PMID:`, DOIs `DOI:`, ISBNs `ISBN:`. Other
/// types (ClinicalTrials, FDA, ...) are kept verbatim.
pub fn reference_curie(ref_type: &str, ref_id: &str) -> String {
    let prefix = match ref_type {
        "PMID" | "PubMed" => "PMID:",
        "DOI" => "DOI:",
        "ISBN" => "ISBN:",
        _ => return ref_id.to_string(),
    };
    format!("{}{}", prefix, ref_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::memory::InMemoryQueries;

    const PROVIDER: &str = "test transformer";

    #[test]
    fn test_null_column_yields_nothing() {
        let builder = AttributeBuilder::new(PROVIDER);
        let row = Record::new().with("usan_stem", None::<&str>).with("max_phase", 4);

        assert!(builder.column(&row, "usan_stem").is_none());
        let attr = builder.column(&row, "max_phase").unwrap();
        assert_eq!(attr.value, "4");
        assert_eq!(attr.attribute_type, "max_phase");
        assert_eq!(attr.provided_by, PROVIDER);
    }

    #[test]
    fn test_flags() {
        let builder = AttributeBuilder::new(PROVIDER);
        let row = Record::new()
            .with("oral", 0)
            .with("topical", 2)
            .with("prodrug", -1)
            .with("polymer_flag", None::<i64>);

        assert!(builder.flag(&row, "oral").is_none());
        assert_eq!(builder.flag(&row, "topical").unwrap().value, "yes");
        assert!(builder.flag(&row, "prodrug").is_none());
        assert!(builder.flag(&row, "polymer_flag").is_none());
    }

    #[test]
    fn test_coded_columns() {
        let builder = AttributeBuilder::new(PROVIDER);
        let row = Record::new()
            .with("chirality", 2)
            .with("availability_type", -1);

        assert_eq!(
            builder.coded(&row, "chirality", CHIRALITY_LABELS).unwrap().value,
            "achiral molecule"
        );
        assert!(builder.coded(&row, "availability_type", AVAILABILITY_LABELS).is_none());
    }

    #[test]
    fn test_publication_retagging() {
        let builder = AttributeBuilder::new(PROVIDER);
        let row = Record::new().with("document_chembl_id", "CHEMBL1124531");

        let attr = builder.publication(&row).unwrap();
        assert_eq!(attr.name, "publication");
        assert_eq!(attr.attribute_type, "publication");
        assert_eq!(attr.value, "ChEMBL:CHEMBL1124531");
        assert_eq!(
            attr.url.as_deref(),
            Some("https://www.ebi.ac.uk/chembl/document_report_card/CHEMBL1124531")
        );
        assert!(builder.publication(&Record::new()).is_none());
    }

    #[test]
    fn test_reference_prefixes() {
        assert_eq!(reference_curie("PubMed", "123"), "PMID:123");
        assert_eq!(reference_curie("PMID", "123"), "PMID:123");
        assert_eq!(reference_curie("DOI", "10.1/x"), "DOI:10.1/x");
        assert_eq!(reference_curie("ISBN", "978"), "ISBN:978");
        assert_eq!(reference_curie("FDA", "label.pdf"), "label.pdf");
    }

    #[tokio::test]
    async fn test_references_expand_in_order() {
        let queries = InMemoryQueries::default()
            .with_reference(ReferenceTable::Mechanism, 42, "PubMed", "1000", Some("http://pubmed/1000"))
            .with_reference(ReferenceTable::Mechanism, 42, "Wikipedia", "Aspirin", None);
        let builder = AttributeBuilder::new(PROVIDER);

        let refs = builder
            .references(&queries, ReferenceTable::Mechanism, Some(42))
            .await
            .unwrap();

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].name, "PubMed");
        assert_eq!(refs[0].value, "PMID:1000");
        assert_eq!(refs[0].attribute_type, "publication");
        assert_eq!(refs[0].url.as_deref(), Some("http://pubmed/1000"));
        assert_eq!(refs[1].value, "Aspirin");

        let none = builder
            .references(&queries, ReferenceTable::Metabolism, None)
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
