use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecommendError>;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Ingest error: {0}")]
    Ingest(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RecommendError {
    /// Unknown users are an expected outcome at the query boundary
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecommendError::NotFound(_))
    }
}

// Implement conversions from other error types
impl From<csv::Error> for RecommendError {
    fn from(err: csv::Error) -> Self {
        RecommendError::Ingest(err.to_string())
    }
}

impl From<std::io::Error> for RecommendError {
    fn from(err: std::io::Error) -> Self {
        RecommendError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for RecommendError {
    fn from(err: config::ConfigError) -> Self {
        RecommendError::Configuration(err.to_string())
    }
}

impl From<serde_json::Error> for RecommendError {
    fn from(err: serde_json::Error) -> Self {
        RecommendError::Serialization(err.to_string())
    }
}
