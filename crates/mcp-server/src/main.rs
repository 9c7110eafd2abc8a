//! Docfinder MCP server
//!
//! Answers natural-language queries against a prebuilt Apple developer
//! documentation corpus: brute-force semantic search over pre-computed
//! embeddings, related-document discovery, and code example mining.
//!
//! ## Tools
//!
//! - `search_documentation` - semantic search with related documents
//! - `get_code_examples` - mine code blocks from one page
//! - `get_documentation` / `get_documents` - fetch full pages
//! - `get_statistics` - corpus summary
//!
//! ## Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "docfinder": {
//!       "command": "docfinder-mcp",
//!       "env": { "OPENAI_API_KEY": "sk-..." }
//!     }
//!   }
//! }
//! ```

use anyhow::Result;
use docfinder_corpus::CorpusStore;
use docfinder_embedding::EmbeddingClient;
use rmcp::transport::stdio;
use rmcp::ServiceExt;

mod config;
mod engine;
mod tools;

use config::ServerConfig;
use engine::Engine;
use tools::DocfinderService;

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr only: stdout carries the MCP protocol.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    log::info!("Starting Docfinder MCP server");

    let config = ServerConfig::from_env()?;
    let embedder = EmbeddingClient::new(config.embedding.clone())?;

    // A missing corpus is not fatal at startup; tools report
    // StoreUnavailable until a snapshot is installed.
    let store = match CorpusStore::load(&config.corpus_path).await {
        Ok(store) => Some(store),
        Err(e) => {
            log::warn!(
                "Could not load corpus from {}: {e}",
                config.corpus_path.display()
            );
            None
        }
    };

    let service = DocfinderService::new(Engine::new(store, embedder));
    let server = service.serve(stdio()).await?;

    server.waiting().await?;

    log::info!("Docfinder MCP server stopped");
    Ok(())
}
