//! Embedding provider trait and the fail-open gateway

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;

/// Role a text plays in asymmetric embedding models.
///
/// Document-role and query-role vectors differ for identical text; never
/// assume `embed(x, Query) == embed(x, Document)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedRole {
    /// Text being stored for later retrieval
    Document,
    /// Text used to search stored documents
    Query,
}

/// Trait for generating text embeddings
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text in the given role
    async fn embed(&self, text: &str, role: EmbedRole) -> Result<Vec<f32>>;

    /// Embedding dimensionality; every vector this provider returns has
    /// exactly this length
    fn dimensions(&self) -> usize;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Fail-open wrapper around an [`EmbeddingProvider`].
///
/// A provider failure never aborts ingestion or a query: the failed text
/// gets a zero vector of the expected dimension, and ranking scores zero
/// vectors as minimum similarity. One bad call degrades one chunk, nothing
/// more.
#[derive(Clone)]
pub struct EmbeddingGateway {
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingGateway {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    pub fn dimensions(&self) -> usize {
        self.provider.dimensions()
    }

    /// Embed a batch of texts in the document role, one vector per input
    pub async fn embed_documents(&self, texts: &[String]) -> Vec<Vec<f32>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_one(text, EmbedRole::Document).await);
        }
        embeddings
    }

    /// Embed a query string in the query role
    pub async fn embed_query(&self, text: &str) -> Vec<f32> {
        self.embed_one(text, EmbedRole::Query).await
    }

    async fn embed_one(&self, text: &str, role: EmbedRole) -> Vec<f32> {
        match self.provider.embed(text, role).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "embedding failed, substituting zero vector"
                );
                vec![0.0; self.provider.dimensions()]
            }
        }
    }
}
