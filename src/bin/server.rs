//! Knowledge-base server binary
//!
//! Run with: cargo run --bin kb-rag-server

use kb_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kb_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from the environment
    let config = RagConfig::from_env()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Generation model: {}", config.gemini.model);
    tracing::info!("  - Embedding model: {}", config.gemini.embedding_model);
    tracing::info!(
        "  - Embedding dimensions: {}",
        config.gemini.embedding_dimensions()
    );
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Database: {}", config.storage.database_path);

    if !config.gemini.is_configured() {
        tracing::warn!("GEMINI_API_KEY is not configured");
        tracing::warn!("Embedding and generation calls will fail until it is set:");
        tracing::warn!("  export GEMINI_API_KEY=<your key>");
    }

    let server = RagServer::new(config)?;

    println!("\nServer starting...");
    println!("  Health: http://{}/", server.address());
    println!("\nEndpoints:");
    println!("  POST   /api/documents/upload - Upload a PDF");
    println!("  POST   /api/documents/text   - Add a text document");
    println!("  POST   /api/query            - Ask questions");
    println!("  GET    /api/documents        - List documents");
    println!("  DELETE /api/documents/:id    - Delete a document");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
