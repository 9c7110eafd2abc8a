//! # Docfinder Corpus
//!
//! Read-only access to a prebuilt documentation corpus plus the similarity
//! primitives the search layers are built on.
//!
//! A corpus snapshot pairs every document with one pre-computed embedding,
//! stored as packed little-endian f32 bytes of a fixed, corpus-wide
//! dimensionality. This crate never computes embeddings and never writes
//! to an existing snapshot; ingestion is a separate tool.

mod error;
mod store;
mod types;
pub mod vector;

pub use error::{CorpusError, Result};
pub use store::{CorpusStore, CORPUS_SCHEMA_VERSION};
pub use types::{CorpusStats, Document, DocumentRecord, ScoredResult};
