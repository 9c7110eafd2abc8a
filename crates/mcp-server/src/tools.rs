//! MCP tools for Docfinder.
//!
//! Every tool funnels through one `Engine` behind a `tokio::sync::Mutex`:
//! the lock acts as a concurrency-1 admission gate and in-flight requests
//! queue on it. Corpus scans are synchronous, so each one runs on the
//! blocking pool via `gated_scan` while the caller awaits it under a
//! deadline; time spent queued on the gate counts against the deadline.
//! When a deadline expires the caller gets a timeout error immediately and
//! the abandoned scan finishes on the blocking pool, releasing the gate
//! when its guard drops.

use crate::engine::Engine;
use docfinder_corpus::ScoredResult;
use docfinder_search::{
    find_related, CompatibilityInfo, RelatedResult, DEFAULT_LIMIT, DEFAULT_MIN_SIMILARITY,
};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task;

/// Embedding-dependent operations.
const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);
/// Related-document discovery phase inside a search.
const RELATED_TIMEOUT: Duration = Duration::from_secs(15);
/// Code example mining.
const MINING_TIMEOUT: Duration = Duration::from_secs(15);
/// Direct lookups and statistics.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// How many primary results seed related-document discovery.
const RELATED_SEED_COUNT: usize = 3;

const MAX_LIMIT: usize = 50;

/// Docfinder MCP service.
#[derive(Clone)]
pub struct DocfinderService {
    engine: Arc<Mutex<Engine>>,
    tool_router: ToolRouter<Self>,
}

impl DocfinderService {
    #[must_use]
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_handler]
impl ServerHandler for DocfinderService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Docfinder answers natural-language questions about Apple developer \
                 documentation. Use 'search_documentation' for semantic queries (results \
                 include related documents), 'get_code_examples' to mine code blocks out \
                 of one document, 'get_documentation' / 'get_documents' to fetch full \
                 pages, and 'get_statistics' for corpus info."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Tool Input/Output Schemas
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Natural-language search query
    #[schemars(description = "Natural language search query")]
    pub query: String,

    /// Maximum results (default: 10)
    #[schemars(description = "Maximum number of results (1-50)")]
    pub limit: Option<usize>,

    /// Minimum similarity floor (default: 0.3)
    #[schemars(description = "Minimum cosine similarity in [0, 1]")]
    pub min_similarity: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub related: Vec<RelatedHit>,
}

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub score: f32,
    /// Platform availability; absent when the document is untagged or its
    /// tags are unparsable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<CompatibilityInfo>,
}

#[derive(Debug, Serialize)]
pub struct RelatedHit {
    pub id: String,
    pub title: String,
    pub url: String,
    pub score: f32,
    pub relationship: &'static str,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CodeExamplesRequest {
    /// Document to mine for code examples
    #[schemars(description = "Document id returned by search_documentation")]
    pub document_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDocumentRequest {
    /// Document id
    #[schemars(description = "Document id")]
    pub document_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDocumentsRequest {
    /// Document ids; absent ids are skipped
    #[schemars(description = "Document ids to fetch")]
    pub document_ids: Vec<String>,
}

// ============================================================================
// Tools
// ============================================================================

#[tool_router]
impl DocfinderService {
    #[tool(
        description = "Search Apple developer documentation using natural language. Returns scored results with platform compatibility plus topically related documents."
    )]
    pub async fn search_documentation(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        if request.query.trim().is_empty() {
            return Ok(CallToolResult::error(vec![Content::text(
                "Error: Query cannot be empty",
            )]));
        }
        let limit = request.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let min_similarity = request
            .min_similarity
            .unwrap_or(DEFAULT_MIN_SIMILARITY)
            .clamp(0.0, 1.0);

        let engine = Arc::clone(&self.engine);
        let query = request.query.clone();
        let Some(outcome) = deadline(SEARCH_TIMEOUT, async move {
            let guard = engine.lock_owned().await;
            let query_vector = guard.embed_query(&query).await?;

            // The ranking scan runs off the executor; the gate travels with
            // it and comes back.
            let (mut guard, results) = task::spawn_blocking(move || {
                let results = guard.rank(&query_vector, limit, min_similarity);
                (guard, results)
            })
            .await
            .expect("ranking scan panicked");
            let results = results?;

            // Discovery scans the shared snapshot, not the engine, so an
            // expired scan never strands the gate.
            let store = guard.shared_store()?;
            let seeds: Vec<ScoredResult> =
                results[..results.len().min(RELATED_SEED_COUNT)].to_vec();
            let discovery_query = query.clone();
            let related = match deadline(RELATED_TIMEOUT, async move {
                task::spawn_blocking(move || find_related(&store, &seeds, &discovery_query))
                    .await
                    .expect("discovery scan panicked")
            })
            .await
            {
                Some(Ok(related)) => related,
                Some(Err(e)) => {
                    // Discovery is an enrichment; its failure degrades to an
                    // empty list rather than failing the search.
                    log::warn!("Related-document discovery failed: {e}");
                    Vec::new()
                }
                None => {
                    log::warn!("Related-document discovery timed out");
                    Vec::new()
                }
            };

            let hits = results
                .iter()
                .map(|r| search_hit(&mut guard, r))
                .collect();
            Ok::<_, docfinder_search::SearchError>(SearchResponse {
                results: hits,
                related: related.iter().map(related_hit).collect(),
            })
        })
        .await
        else {
            return Ok(timeout_error("search_documentation", SEARCH_TIMEOUT));
        };

        match outcome {
            Ok(response) => Ok(json_result(&response)),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(format!(
                "Search error: {e}"
            ))])),
        }
    }

    #[tool(
        description = "Extract code examples from one documentation page: each fenced block with surrounding context, repaired formatting, topic category, and complexity."
    )]
    pub async fn get_code_examples(
        &self,
        Parameters(request): Parameters<CodeExamplesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let document_id = request.document_id.clone();
        let Some(outcome) = deadline(
            MINING_TIMEOUT,
            gated_scan(&self.engine, move |engine| {
                engine.extract_code(&document_id)
            }),
        )
        .await
        else {
            return Ok(timeout_error("get_code_examples", MINING_TIMEOUT));
        };

        match outcome {
            Ok(Some(examples)) => Ok(json_result(&examples)),
            Ok(None) => Ok(CallToolResult::error(vec![Content::text(format!(
                "Document not found: {}",
                request.document_id
            ))])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(format!(
                "Error: {e}"
            ))])),
        }
    }

    #[tool(description = "Fetch one documentation page by id, including its full text body.")]
    pub async fn get_documentation(
        &self,
        Parameters(request): Parameters<GetDocumentRequest>,
    ) -> Result<CallToolResult, McpError> {
        let document_id = request.document_id.clone();
        let Some(outcome) = deadline(
            LOOKUP_TIMEOUT,
            gated_scan(&self.engine, move |engine| {
                engine.get_document(&document_id)
            }),
        )
        .await
        else {
            return Ok(timeout_error("get_documentation", LOOKUP_TIMEOUT));
        };

        match outcome {
            Ok(Some(document)) => Ok(json_result(&document)),
            Ok(None) => Ok(CallToolResult::error(vec![Content::text(format!(
                "Document not found: {}",
                request.document_id
            ))])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(format!(
                "Error: {e}"
            ))])),
        }
    }

    #[tool(description = "Fetch several documentation pages by id; unknown ids are skipped.")]
    pub async fn get_documents(
        &self,
        Parameters(request): Parameters<GetDocumentsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let Some(outcome) = deadline(
            LOOKUP_TIMEOUT,
            gated_scan(&self.engine, move |engine| {
                engine.get_documents(&request.document_ids)
            }),
        )
        .await
        else {
            return Ok(timeout_error("get_documents", LOOKUP_TIMEOUT));
        };

        match outcome {
            Ok(documents) => Ok(json_result(&documents)),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(format!(
                "Error: {e}"
            ))])),
        }
    }

    #[tool(description = "Corpus statistics: total document count and a few sample titles.")]
    pub async fn get_statistics(&self) -> Result<CallToolResult, McpError> {
        let Some(outcome) = deadline(LOOKUP_TIMEOUT, gated_scan(&self.engine, |engine| engine.stats()))
            .await
        else {
            return Ok(timeout_error("get_statistics", LOOKUP_TIMEOUT));
        };

        match outcome {
            Ok(stats) => Ok(json_result(&stats)),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(format!(
                "Error: {e}"
            ))])),
        }
    }
}

async fn deadline<T>(duration: Duration, operation: impl Future<Output = T>) -> Option<T> {
    tokio::time::timeout(duration, operation).await.ok()
}

/// Acquires the admission gate, then runs a synchronous engine operation on
/// the blocking pool. `tokio::time::timeout` can only expire at an await
/// point, so a scan run inline would hold the executor past any deadline;
/// here the caller awaits the join handle and a deadline wrapped around this
/// future expires on time. An abandoned scan finishes in the background and
/// releases the gate when its guard drops.
async fn gated_scan<T, F>(engine: &Arc<Mutex<Engine>>, operation: F) -> T
where
    F: FnOnce(&mut Engine) -> T + Send + 'static,
    T: Send + 'static,
{
    let mut guard = Arc::clone(engine).lock_owned().await;
    task::spawn_blocking(move || operation(&mut guard))
        .await
        .expect("engine scan panicked")
}

fn timeout_error(operation: &str, duration: Duration) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!(
        "Error: {operation} timed out after {}s",
        duration.as_secs()
    ))])
}

fn json_result<T: Serialize>(value: &T) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(value).unwrap_or_default(),
    )])
}

fn search_hit(engine: &mut Engine, result: &ScoredResult) -> SearchHit {
    SearchHit {
        id: result.document.id.clone(),
        title: result.document.title.clone(),
        url: result.document.url.clone(),
        description: result.document.description.clone(),
        score: result.score,
        compatibility: engine.annotate_compatibility(&result.document),
    }
}

fn related_hit(result: &RelatedResult) -> RelatedHit {
    RelatedHit {
        id: result.document.id.clone(),
        title: result.document.title.clone(),
        url: result.document.url.clone(),
        score: result.score,
        relationship: result.relationship.as_str(),
    }
}
