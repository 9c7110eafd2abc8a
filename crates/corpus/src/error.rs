use thiserror::Error;

pub type Result<T> = std::result::Result<T, CorpusError>;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Corpus store is not available")]
    StoreUnavailable,

    #[error("Unsupported corpus schema_version {found} (expected {expected})")]
    SchemaVersion { found: u32, expected: u32 },

    #[error("Vector dimension mismatch: {expected} vs {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Cannot compute centroid of zero vectors")]
    EmptyCentroid,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
