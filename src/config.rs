//! Configuration for the RAG service
//!
//! All settings are environment-sourced with documented defaults, so the
//! binary runs out of the box against a local SQLite file and only needs
//! `GEMINI_API_KEY` to reach the provider.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Placeholder value shipped in sample env files; treated as "not configured"
pub const API_KEY_PLACEHOLDER: &str = "your_gemini_api_key_here";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Gemini provider configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Allowed CORS origins
    pub cors_origins: Vec<String>,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["http://localhost:3000".to_string()],
            max_upload_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// Gemini provider configuration (embeddings + generation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; empty or the placeholder means "not configured"
    pub api_key: String,
    /// Generation model id
    pub model: String,
    /// Embedding model id
    pub embedding_model: String,
    /// API base URL (overridable for tests)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "models/gemini-2.5-flash-lite".to_string(),
            embedding_model: "models/text-embedding-004".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 60,
        }
    }
}

impl GeminiConfig {
    /// Whether a usable API key is present
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && self.api_key != API_KEY_PLACEHOLDER
    }

    /// Embedding dimensionality implied by the model id
    pub fn embedding_dimensions(&self) -> usize {
        if self.embedding_model.contains("embedding-001") {
            3072
        } else {
            768
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Default number of chunks returned per query
    pub top_k: usize,
    /// Minimum relevance score (0-100) a chunk needs to reach the prompt
    pub min_relevance_score: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_relevance_score: 50.0,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "knowledge_base.db".to_string(),
        }
    }
}

impl RagConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("HOST") {
            config.server.host = host;
        }
        if let Some(port) = env_parse::<u16>("PORT")? {
            config.server.port = port;
        }
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(size) = env_parse::<usize>("MAX_UPLOAD_SIZE")? {
            config.server.max_upload_size = size;
        }

        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.gemini.api_key = key;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.gemini.model = model;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.gemini.embedding_model = model;
        }

        if let Some(size) = env_parse::<usize>("CHUNK_SIZE")? {
            config.chunking.chunk_size = size;
        }
        if let Some(overlap) = env_parse::<usize>("CHUNK_OVERLAP")? {
            config.chunking.chunk_overlap = overlap;
        }
        if let Some(top_k) = env_parse::<usize>("TOP_K_RESULTS")? {
            config.retrieval.top_k = top_k;
        }
        if let Some(score) = env_parse::<f32>("MIN_RELEVANCE_SCORE")? {
            config.retrieval.min_relevance_score = score;
        }

        if let Ok(path) = std::env::var("DATABASE_PATH") {
            config.storage.database_path = path;
        }

        config.validate()?;
        Ok(config)
    }

    /// Sanity checks on values that would break the pipeline
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("CHUNK_SIZE must be positive".to_string()));
        }
        // overlap < chunk_size / 2 guarantees every window advances, even
        // after sentence-boundary shortening
        if self.chunking.chunk_overlap >= self.chunking.chunk_size / 2 {
            return Err(Error::Config(format!(
                "CHUNK_OVERLAP ({}) must be less than half of CHUNK_SIZE ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("TOP_K_RESULTS must be positive".to_string()));
        }
        if !(0.0..=100.0).contains(&self.retrieval.min_relevance_score) {
            return Err(Error::Config(
                "MIN_RELEVANCE_SCORE must be between 0 and 100".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("invalid value for {}: {:?}", name, raw))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RagConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.retrieval.min_relevance_score, 50.0);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn placeholder_key_is_not_configured() {
        let mut gemini = GeminiConfig::default();
        assert!(!gemini.is_configured());
        gemini.api_key = API_KEY_PLACEHOLDER.to_string();
        assert!(!gemini.is_configured());
        gemini.api_key = "real-key".to_string();
        assert!(gemini.is_configured());
    }

    #[test]
    fn embedding_dimensions_follow_model() {
        let mut gemini = GeminiConfig::default();
        assert_eq!(gemini.embedding_dimensions(), 768);
        gemini.embedding_model = "models/embedding-001".to_string();
        assert_eq!(gemini.embedding_dimensions(), 3072);
    }

    #[test]
    fn oversized_overlap_rejected() {
        let mut config = RagConfig::default();
        config.chunking.chunk_overlap = 600;
        assert!(config.validate().is_err());
    }
}
