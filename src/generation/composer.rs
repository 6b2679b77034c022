//! Answer composition: query classification, relevance filtering,
//! grounded generation, and graceful degradation on provider errors.
//!
//! Generation failures never fail the request. Every error path still
//! produces a well-formed answer object, with a sources-inclusion policy
//! that depends on the failure kind.

use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::generation::prompt::PromptBuilder;
use crate::providers::{EmbeddingGateway, GenerationOptions, LlmProvider};
use crate::retrieval::Ranker;
use crate::types::response::{QueryResponse, Source};

/// Interrogative cues; a short query containing any of these as a
/// substring is still treated as knowledge-seeking
const CUE_WORDS: [&str; 10] = [
    "what", "how", "why", "when", "where", "who", "which", "explain", "describe", "tell me",
];

const RATE_LIMIT_ANSWER: &str =
    "⚠️ **API Rate Limit Exhausted**\n\nPlease wait for **1 minute** before trying again.";

const INSUFFICIENT_INFO_ANSWER: &str = "I don't have enough information in my knowledge base to answer this question. Please upload relevant documents first.";

/// Classification of a generation-provider failure.
///
/// The only reliable signal the upstream API gives is free text, so this
/// matches substrings of the lowercased message. Fragile by nature; kept
/// as a compatibility shim and pinned by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    /// Quota or rate-limit exhaustion
    RateLimit,
    /// Wrong or unavailable model id
    ModelConfig,
    /// Anything else
    Other,
}

impl LlmErrorKind {
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if ["exhausted", "quota", "rate limit", "429"]
            .iter()
            .any(|k| lower.contains(k))
        {
            Self::RateLimit
        } else if lower.contains("not found") || lower.contains("invalid") {
            Self::ModelConfig
        } else {
            Self::Other
        }
    }
}

/// Casual-vs-knowledge-seeking classification.
///
/// Casual: at most 3 whitespace tokens and no interrogative cue anywhere
/// in the lowercased text (substring match, so "whatever" counts as a cue).
pub fn is_casual_query(query: &str) -> bool {
    let lower = query.to_lowercase();
    let lower = lower.trim();
    let word_count = lower.split_whitespace().count();
    word_count <= 3 && !CUE_WORDS.iter().any(|cue| lower.contains(cue))
}

/// Composes answers from retrieval results and the generation provider
pub struct AnswerComposer {
    embeddings: EmbeddingGateway,
    llm: Arc<dyn LlmProvider>,
    ranker: Ranker,
    retrieval: RetrievalConfig,
}

impl AnswerComposer {
    pub fn new(
        embeddings: EmbeddingGateway,
        llm: Arc<dyn LlmProvider>,
        ranker: Ranker,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            embeddings,
            llm,
            ranker,
            retrieval,
        }
    }

    /// Answer a query, routing between the casual and knowledge-seeking
    /// paths. Only storage failures propagate as errors; generation
    /// failures degrade into explanatory answers.
    pub async fn answer(&self, query: &str, top_k: Option<usize>) -> Result<QueryResponse> {
        if is_casual_query(query) {
            tracing::info!(query, "casual query, skipping retrieval");
            return Ok(self.casual_answer(query).await);
        }

        let top_k = top_k.unwrap_or(self.retrieval.top_k);
        let query_vector = self.embeddings.embed_query(query).await;
        let results = self.ranker.rank(&query_vector, top_k)?;

        // Filter by relevance while keeping the pre-filter index for
        // source numbering
        let mut context_parts = Vec::new();
        let mut sources = Vec::new();
        for (index, result) in results.iter().enumerate() {
            if result.relevance < self.retrieval.min_relevance_score {
                continue;
            }
            context_parts.push(PromptBuilder::source_block(index, result));
            sources.push(Source::from_result(result));
        }

        tracing::info!(
            ranked = results.len(),
            surviving = sources.len(),
            min_relevance = self.retrieval.min_relevance_score,
            "retrieval complete"
        );

        if sources.is_empty() {
            return Ok(QueryResponse::new(
                INSUFFICIENT_INFO_ANSWER.to_string(),
                Vec::new(),
                query.to_string(),
            ));
        }

        let context = context_parts.join("\n");
        let prompt = PromptBuilder::build_rag_prompt(query, &context);

        let response = match self
            .llm
            .generate(&prompt, &GenerationOptions::grounded())
            .await
        {
            Ok(answer) => QueryResponse::new(answer, sources, query.to_string()),
            Err(e) => self.degraded_answer(query, sources, &e.to_string()),
        };
        Ok(response)
    }

    async fn casual_answer(&self, query: &str) -> QueryResponse {
        let prompt = PromptBuilder::build_casual_prompt(query);
        match self
            .llm
            .generate(&prompt, &GenerationOptions::casual())
            .await
        {
            Ok(answer) => QueryResponse::new(answer, Vec::new(), query.to_string()),
            Err(e) => {
                let message = e.to_string();
                let answer = match LlmErrorKind::classify(&message) {
                    LlmErrorKind::RateLimit => RATE_LIMIT_ANSWER.to_string(),
                    LlmErrorKind::ModelConfig => model_config_answer(&message),
                    LlmErrorKind::Other => format!("⚠️ Error: {}", message),
                };
                QueryResponse::new(answer, Vec::new(), query.to_string())
            }
        }
    }

    fn degraded_answer(
        &self,
        query: &str,
        sources: Vec<Source>,
        message: &str,
    ) -> QueryResponse {
        match LlmErrorKind::classify(message) {
            LlmErrorKind::RateLimit => {
                tracing::warn!(error = message, "generation rate limited");
                // sources deliberately withheld on this path
                QueryResponse::new(RATE_LIMIT_ANSWER.to_string(), Vec::new(), query.to_string())
            }
            LlmErrorKind::ModelConfig => {
                tracing::error!(error = message, "generation model misconfigured");
                QueryResponse::new(model_config_answer(message), Vec::new(), query.to_string())
            }
            LlmErrorKind::Other => {
                tracing::error!(error = message, "generation failed");
                let answer = format!(
                    "Error generating response: {}\n\nHowever, I found {} relevant sources that might help answer your question.",
                    message,
                    sources.len()
                );
                QueryResponse::new(answer, sources, query.to_string())
            }
        }
    }
}

fn model_config_answer(message: &str) -> String {
    format!(
        "⚠️ **Model Configuration Error**: {}\n\nPlease check the GEMINI_MODEL setting.",
        message
    )
}
