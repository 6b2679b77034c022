//! LLM provider trait for answer generation

use async_trait::async_trait;

use crate::error::Result;

/// Generation controls passed through to the provider
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub max_output_tokens: u32,
}

impl GenerationOptions {
    /// Settings for grounded question answering
    pub fn grounded() -> Self {
        Self {
            temperature: 0.7,
            top_p: Some(0.95),
            top_k: Some(40),
            max_output_tokens: 2048,
        }
    }

    /// Settings for short conversational replies
    pub fn casual() -> Self {
        Self {
            temperature: 0.9,
            top_p: None,
            top_k: None,
            max_output_tokens: 256,
        }
    }
}

/// Trait for single-turn text generation
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a prompt, returning the generated text.
    ///
    /// Error messages must carry enough of the provider's failure text for
    /// downstream classification (rate limit vs. configuration vs. other).
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model identifier in use
    fn model(&self) -> &str;
}
