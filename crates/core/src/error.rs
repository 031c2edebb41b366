use thiserror::Error;

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// The engine's only error kind. Numeric degeneracies inside the formulas
/// (zero visitors, zero variance, zero baseline) are results, not errors;
/// `InvalidInput` always indicates a caller bug.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
