//! Provider abstractions for embeddings and answer generation
//!
//! Trait-based so request handlers and tests can substitute deterministic
//! doubles for the remote Gemini API.

pub mod embedding;
pub mod gemini;
pub mod llm;

pub use embedding::{EmbedRole, EmbeddingGateway, EmbeddingProvider};
pub use gemini::GeminiClient;
pub use llm::{GenerationOptions, LlmProvider};
