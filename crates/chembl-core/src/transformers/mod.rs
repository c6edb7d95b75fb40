//! The ChEMBL transformers
//!
//! | transformer | verb | input → output | predicate |
//! |---|---|---|---|
//! | `MoleculeProducer` | produce | terms → ChemicalSubstance | |
//! | `TargetTransformer` | map | ChemicalSubstance → Gene | affects |
//! | `IndicationExporter` | export | ChemicalSubstance → Disease | treats |
//! | `AssayExporter` | export | ChemicalSubstance → Assay | related_to |
//! | `MechanismExporter` | export | ChemicalSubstance → MolecularEntity | affects |
//! | `MetaboliteTransformer` | map | ChemicalSubstance → ChemicalSubstance | has_metabolite |
//!
//! Every downstream transformer keys its lookups on the ChEMBL id of each
//! upstream element, skips elements without one, and deduplicates its output
//! within one invocation.

mod assays;
mod indications;
mod mechanisms;
mod metabolites;
mod molecules;
mod targets;

pub use assays::{ASSAY_TRANSFORMER, AssayExporter};
pub use indications::{INDICATION_TRANSFORMER, IndicationExporter};
pub use mechanisms::{MECHANISM_TRANSFORMER, MechanismExporter, atc_classification};
pub use metabolites::{METABOLITE_TRANSFORMER, MetaboliteTransformer};
pub use molecules::{MOLECULE_PRODUCER, MoleculeProducer, group_synonyms};
pub use targets::{TARGET_TRANSFORMER, TargetTransformer};
