use anyhow::{Context, Result};
use docfinder_embedding::{EmbeddingConfig, DEFAULT_DIMENSION};
use std::env;
use std::path::PathBuf;

const CORPUS_PATH_VAR: &str = "DOCFINDER_CORPUS_PATH";
const EMBEDDING_URL_VAR: &str = "DOCFINDER_EMBEDDING_URL";
const EMBEDDING_MODEL_VAR: &str = "DOCFINDER_EMBEDDING_MODEL";
const EMBEDDING_DIMENSION_VAR: &str = "DOCFINDER_EMBEDDING_DIMENSION";
const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Server configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub corpus_path: PathBuf,
    pub embedding: EmbeddingConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let corpus_path = non_empty_var(CORPUS_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_corpus_path);

        let api_key = non_empty_var(API_KEY_VAR)
            .with_context(|| format!("{API_KEY_VAR} is required for query embedding"))?;

        let mut embedding = EmbeddingConfig::new(api_key);
        if let Some(url) = non_empty_var(EMBEDDING_URL_VAR) {
            embedding = embedding.base_url(url);
        }
        if let Some(model) = non_empty_var(EMBEDDING_MODEL_VAR) {
            embedding = embedding.model(model);
        }
        let dimension = match non_empty_var(EMBEDDING_DIMENSION_VAR) {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("{EMBEDDING_DIMENSION_VAR} must be a positive integer"))?,
            None => DEFAULT_DIMENSION,
        };
        embedding = embedding.dimension(dimension);

        Ok(Self {
            corpus_path,
            embedding,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn default_corpus_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".docfinder")
        .join("corpus.json")
}
