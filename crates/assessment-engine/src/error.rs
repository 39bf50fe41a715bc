use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing reference data: {0}")]
    MissingReferenceData(String),

    #[error("Failed to shape module result: {0}")]
    Serialization(#[from] serde_json::Error),
}
