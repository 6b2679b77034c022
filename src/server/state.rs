//! Application state for the HTTP server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::AnswerComposer;
use crate::ingestion::Ingestor;
use crate::providers::{EmbeddingGateway, EmbeddingProvider, GeminiClient, LlmProvider};
use crate::retrieval::Ranker;
use crate::storage::DocumentStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    store: Arc<DocumentStore>,
    ingestor: Ingestor,
    composer: AnswerComposer,
}

impl AppState {
    /// Create state wired to the Gemini API and the configured database
    pub fn new(config: RagConfig) -> Result<Self> {
        let store = Arc::new(DocumentStore::new(&config.storage.database_path)?);
        let gemini = Arc::new(GeminiClient::new(config.gemini.clone())?);
        Self::with_providers(config, store, gemini.clone(), gemini)
    }

    /// Create state with explicit providers.
    ///
    /// Every collaborator is injected here; tests pass deterministic
    /// doubles instead of the live API clients.
    pub fn with_providers(
        config: RagConfig,
        store: Arc<DocumentStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Result<Self> {
        config.validate()?;
        let gateway = EmbeddingGateway::new(embedder);
        let ingestor = Ingestor::new(&config.chunking, gateway.clone(), store.clone());
        let composer = AnswerComposer::new(
            gateway,
            llm,
            Ranker::new(store.clone()),
            config.retrieval.clone(),
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                ingestor,
                composer,
            }),
        })
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &DocumentStore {
        &self.inner.store
    }

    pub fn ingestor(&self) -> &Ingestor {
        &self.inner.ingestor
    }

    pub fn composer(&self) -> &AnswerComposer {
        &self.inner.composer
    }
}
