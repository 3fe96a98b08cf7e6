use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockchainError {
    #[error("http request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid tool input: {0}")]
    InvalidInput(String),

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BlockchainError>;
