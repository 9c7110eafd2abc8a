use crate::error::Result;
use docfinder_corpus::vector::{cosine_similarity, decode_vector};
use docfinder_corpus::{CorpusStore, ScoredResult};
use docfinder_embedding::EmbeddingClient;

pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.3;

/// Floor the auto-relax step never goes below.
const RELAX_FLOOR: f32 = 0.2;
const RELAX_STEP: f32 = 0.1;

/// Brute-force semantic search over the full corpus.
///
/// Every search is a sequential scan: embed the query, score each stored
/// vector by cosine similarity, sort, filter, truncate. The corpus is small
/// enough (tens of thousands of pages) that a scan beats maintaining an
/// approximate index.
///
/// Embedding and ranking are separate calls: embedding is the only await
/// point, and the ranking scan is synchronous so callers can schedule it
/// off the async executor.
pub struct SemanticSearch {
    embedder: EmbeddingClient,
}

impl SemanticSearch {
    #[must_use]
    pub const fn new(embedder: EmbeddingClient) -> Self {
        Self { embedder }
    }

    /// Embed a query for ranking. Embedding-service failures propagate
    /// unmodified.
    pub async fn embed(&self, query: &str) -> Result<Vec<f32>> {
        log::debug!("Embedding search query: '{query}'");
        Ok(self.embedder.embed(query).await?)
    }

    /// Rank the corpus against an embedded query. An empty result list is
    /// a valid outcome, not an error.
    pub fn rank(
        &self,
        store: &CorpusStore,
        query_vector: &[f32],
        limit: usize,
        min_similarity: f32,
    ) -> Result<Vec<ScoredResult>> {
        log::debug!("Ranking corpus: limit={limit}, floor={min_similarity}");
        let results = rank_corpus(store, query_vector, limit, min_similarity)?;
        log::info!("Search returned {} results", results.len());
        Ok(results)
    }
}

/// Score the whole corpus against a query vector, applying the similarity
/// floor and the single-shot auto-relax step.
///
/// Relaxation fires at most once: when fewer than `min(3, limit)` documents
/// survive the initial floor and the floor sits above 0.2, the filter is
/// recomputed once at `max(0.2, floor - 0.1)`. A still-sparse corpus after
/// that simply yields fewer results.
pub fn rank_corpus(
    store: &CorpusStore,
    query_vector: &[f32],
    limit: usize,
    min_similarity: f32,
) -> docfinder_corpus::Result<Vec<ScoredResult>> {
    let mut scored = Vec::with_capacity(store.len());
    for record in store.records() {
        let vector = decode_vector(&record.embedding);
        let score = cosine_similarity(query_vector, &vector)?;
        scored.push(ScoredResult {
            document: record.document.clone(),
            score,
        });
    }

    // Stable sort keeps corpus id order for ties.
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut surviving = count_at_floor(&scored, min_similarity);
    let mut floor = min_similarity;
    if surviving < limit.min(3) && min_similarity > RELAX_FLOOR {
        floor = (min_similarity - RELAX_STEP).max(RELAX_FLOOR);
        log::debug!("Auto-relaxing similarity floor {min_similarity} -> {floor}");
        surviving = count_at_floor(&scored, floor);
    }

    scored.truncate(surviving.min(limit));
    Ok(scored)
}

fn count_at_floor(sorted: &[ScoredResult], floor: f32) -> usize {
    sorted.iter().take_while(|r| r.score >= floor).count()
}
