//! # Docfinder Embedding
//!
//! Async client for an OpenAI-compatible `/embeddings` endpoint.
//!
//! The engine only ever embeds query text; stored document vectors are
//! pre-computed by the corpus builder. Service failures are translated into
//! [`EmbeddingError`] and surfaced to the caller immediately — there is no
//! retry logic anywhere in this crate.

mod client;
mod error;

pub use client::{EmbeddingClient, EmbeddingConfig, DEFAULT_DIMENSION};
pub use error::{EmbeddingError, Result};
