//! Query request types

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum query length in characters
pub const MAX_QUERY_LEN: usize = 1000;

/// Bounds for the per-request top_k override
pub const MIN_TOP_K: usize = 1;
pub const MAX_TOP_K: usize = 20;

/// Query request for the question-answering endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    pub query: String,

    /// Number of chunks to retrieve; falls back to the configured default
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl QueryRequest {
    /// Validate request bounds before the pipeline runs
    pub fn validate(&self) -> Result<()> {
        let len = self.query.chars().count();
        if len < 1 || len > MAX_QUERY_LEN {
            return Err(Error::InvalidRequest(format!(
                "query must be between 1 and {} characters",
                MAX_QUERY_LEN
            )));
        }
        if let Some(top_k) = self.top_k {
            if !(MIN_TOP_K..=MAX_TOP_K).contains(&top_k) {
                return Err(Error::InvalidRequest(format!(
                    "top_k must be between {} and {}",
                    MIN_TOP_K, MAX_TOP_K
                )));
            }
        }
        Ok(())
    }
}

/// Request body for text document ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentUpload {
    /// Name to store the document under
    pub filename: String,
    /// Full text body
    pub content: String,
    /// Document kind label (default: "text")
    #[serde(default = "default_doc_type")]
    pub doc_type: String,
    /// Optional caller metadata
    #[serde(default)]
    pub metadata: Option<std::collections::HashMap<String, serde_json::Value>>,
}

fn default_doc_type() -> String {
    "text".to_string()
}
