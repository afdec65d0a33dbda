//! Error types for the cohort_metrics crate

use thiserror::Error;

/// Custom error types for the cohort_metrics crate
#[derive(Debug, Error)]
pub enum CohortError {
    /// A required column is absent from the input
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// A field value could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, CohortError>;
