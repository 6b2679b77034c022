//! Response types for the HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::retrieval::SearchResult;

/// Longest chunk excerpt included in a citation
const SNIPPET_MAX_CHARS: usize = 300;

/// Citation pointing back into a stored document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Filename of the source document
    pub document_name: String,
    /// Chunk excerpt, capped at 300 characters
    pub chunk_text: String,
    /// Relevance score (0-100), one decimal place
    pub relevance_score: f32,
    /// First source line of the chunk (1-based)
    pub start_line: u32,
    /// Last source line of the chunk (1-based, inclusive)
    pub end_line: u32,
    /// Page number for PDF sources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
}

impl Source {
    /// Build a citation from a ranked search result
    pub fn from_result(result: &SearchResult) -> Self {
        Self {
            document_name: result.document_name.clone(),
            chunk_text: truncate_chars(&result.content, SNIPPET_MAX_CHARS),
            relevance_score: (result.relevance * 10.0).round() / 10.0,
            start_line: result.start_line,
            end_line: result.end_line,
            page_number: result.page_number,
        }
    }
}

/// Truncate to a maximum number of characters, appending an ellipsis
/// marker when anything was cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Response from the question-answering endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer
    pub answer: String,
    /// Citations backing the answer
    pub sources: Vec<Source>,
    /// The original query, echoed back
    pub query: String,
    /// When the answer was produced
    pub timestamp: DateTime<Utc>,
}

impl QueryResponse {
    pub fn new(answer: String, sources: Vec<Source>, query: String) -> Self {
        Self {
            answer,
            sources,
            query,
            timestamp: Utc::now(),
        }
    }
}

/// Response from both ingestion endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub message: String,
    pub document_id: String,
    pub filename: String,
    /// Present for PDF uploads only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
}

/// Entry in the document listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub id: String,
    pub filename: String,
    pub upload_date: DateTime<Utc>,
    pub doc_type: String,
    pub chunk_count: usize,
}

/// Response from document deletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    pub document_id: String,
}

/// Health report served at the root path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "warning"
    pub status: String,
    pub message: String,
    pub gemini_configured: bool,
}
