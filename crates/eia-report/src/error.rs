use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Unsupported report format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("PDF assembly failed: {0}")]
    Pdf(String),
}

impl From<lopdf::Error> for ReportError {
    fn from(err: lopdf::Error) -> Self {
        ReportError::Pdf(err.to_string())
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::Pdf(err.to_string())
    }
}
