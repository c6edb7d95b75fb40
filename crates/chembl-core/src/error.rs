//! Error types for the ChEMBL transformers

use thiserror::Error;

/// Result type alias using the crate's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Transformer error types with helpful messages and suggestions
///
/// A lookup that finds nothing is not an error: it yields an empty row set and
/// the element is skipped. Everything here aborts the running invocation.
#[derive(Error, Debug)]
pub enum Error {
    // Registry errors (E001-E099)
    #[error("Transformer '{0}' not found. Run `chembl transformers` to see all transformers.")]
    TransformerNotFound(String),

    // Database errors (E400-E499)
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Unsupported column type '{1}' for column '{0}'")]
    UnsupportedColumn(String, String),

    // Input errors (E800-E899)
    #[error("Required control '{0}' is missing or empty")]
    MissingControl(String),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::TransformerNotFound(_) => "E001",
            Self::DatabaseError(_) => "E400",
            Self::UnsupportedColumn(..) => "E401",
            Self::MissingControl(_) => "E800",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::TransformerNotFound(_) => Some("chembl transformers".to_string()),
            Self::DatabaseError(_) => Some("chembl doctor".to_string()),
            Self::MissingControl(name) => Some(format!("set the '{}' control", name)),
            Self::UnsupportedColumn(..) => None,
        }
    }
}
