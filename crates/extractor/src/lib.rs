//! # Docfinder Extractor
//!
//! Mines fenced code blocks out of a single document body: sentence-level
//! context around each block, heuristic repair of a known comma-corruption
//! pattern, topic categorization, and a validity filter that silently drops
//! low-value fragments.
//!
//! The miner is independent of the search layers; it operates on one
//! document's raw text per call and keeps no state between calls.

mod category;
mod extractor;
mod filter;
mod repair;
mod types;

pub use category::categorize;
pub use extractor::extract_from_document;
pub use filter::is_valid_example;
pub use repair::repair_code;
pub use types::{Category, CodeExample, Complexity};
