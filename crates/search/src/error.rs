use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Corpus error: {0}")]
    Corpus(#[from] docfinder_corpus::CorpusError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] docfinder_embedding::EmbeddingError),
}
