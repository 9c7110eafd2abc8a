use docfinder_corpus::{CorpusError, CorpusStats, CorpusStore, Document, ScoredResult};
use docfinder_embedding::EmbeddingClient;
use docfinder_extractor::{extract_from_document, CodeExample};
use docfinder_search::{
    CompatibilityAnalyzer, CompatibilityInfo, Result as SearchResult, SemanticSearch,
};
use std::sync::Arc;

/// The retrieval engine behind the MCP tools.
///
/// Holds the corpus snapshot (read-only, shared via `Arc` so scans can run
/// on the blocking pool), the query embedder, and the compatibility
/// annotation cache. The cache is mutable state, so the server keeps
/// exactly one `Engine` behind a mutex — that lock is the concurrency-1
/// admission gate for every tool call.
pub struct Engine {
    store: Option<Arc<CorpusStore>>,
    search: SemanticSearch,
    compat: CompatibilityAnalyzer,
}

impl Engine {
    #[must_use]
    pub fn new(store: Option<CorpusStore>, embedder: EmbeddingClient) -> Self {
        Self {
            store: store.map(Arc::new),
            search: SemanticSearch::new(embedder),
            compat: CompatibilityAnalyzer::new(),
        }
    }

    fn store(&self) -> Result<&CorpusStore, CorpusError> {
        self.store.as_deref().ok_or(CorpusError::StoreUnavailable)
    }

    /// A handle to the corpus snapshot, for scans that outlive the engine
    /// lock.
    pub fn shared_store(&self) -> Result<Arc<CorpusStore>, CorpusError> {
        self.store.clone().ok_or(CorpusError::StoreUnavailable)
    }

    /// Embed a search query. The only await point in the search pipeline.
    pub async fn embed_query(&self, query: &str) -> SearchResult<Vec<f32>> {
        self.search.embed(query).await
    }

    /// Rank the full corpus against an embedded query. Synchronous scan.
    pub fn rank(
        &self,
        query_vector: &[f32],
        limit: usize,
        min_similarity: f32,
    ) -> SearchResult<Vec<ScoredResult>> {
        let store = self.store()?;
        self.search.rank(store, query_vector, limit, min_similarity)
    }

    /// Mine code examples from one document. `None` when the id is absent.
    pub fn extract_code(&self, document_id: &str) -> Result<Option<Vec<CodeExample>>, CorpusError> {
        let store = self.store()?;
        Ok(store.get(document_id).map(extract_from_document))
    }

    pub fn get_document(&self, id: &str) -> Result<Option<Document>, CorpusError> {
        Ok(self.store()?.get(id).cloned())
    }

    pub fn get_documents(&self, ids: &[String]) -> Result<Vec<Document>, CorpusError> {
        Ok(self
            .store()?
            .get_many(ids)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn stats(&self) -> Result<CorpusStats, CorpusError> {
        Ok(self.store()?.stats())
    }

    /// Best-effort compatibility annotation; cached per document id.
    pub fn annotate_compatibility(&mut self, document: &Document) -> Option<CompatibilityInfo> {
        self.compat.analyze(document)
    }
}
