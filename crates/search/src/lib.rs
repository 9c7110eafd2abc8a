//! # Docfinder Search
//!
//! Ranking layers over the corpus: brute-force primary search with an
//! auto-relaxing similarity floor, centroid-based related-document
//! discovery with heuristic relationship labels, and platform
//! compatibility annotation for result payloads.

mod compat;
mod error;
mod primary;
mod related;

pub use compat::{CompatibilityAnalyzer, CompatibilityInfo, PlatformAvailability};
pub use error::{Result, SearchError};
pub use primary::{rank_corpus, SemanticSearch, DEFAULT_LIMIT, DEFAULT_MIN_SIMILARITY};
pub use related::{classify, find_related, RelatedResult, Relationship};
