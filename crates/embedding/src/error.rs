use thiserror::Error;

pub type Result<T> = std::result::Result<T, EmbeddingError>;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Missing embedding service API key")]
    MissingApiKey,

    #[error("Embedding service rejected credentials ({status})")]
    AuthFailed { status: u16 },

    #[error("Embedding service rate limit exceeded")]
    RateLimited,

    #[error("Embedding request timed out")]
    Timeout,

    #[error("Embedding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed embedding response: {0}")]
    InvalidResponse(String),

    #[error("Embedding service error ({status}): {body}")]
    Unexpected { status: u16, body: String },
}
