use thiserror::Error;

/// Failure inside a feature computation.
///
/// Surfaced to the user as an inline error marker on the panel; never
/// propagated past the panel that produced it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessingError {
    #[error("{0} is required")]
    MissingInput(String),

    #[error("{label} must be a number, got '{value}'")]
    InvalidNumber { label: String, value: String },

    #[error("{0}")]
    Computation(String),
}
