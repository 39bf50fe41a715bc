use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field '{field}' must be a non-negative number, got {value}")]
    InvalidNumber { field: &'static str, value: f64 },

    #[error("Unknown project type: {0}")]
    UnknownProjectType(String),
}
