//! Document and chunk types with source tracking for citations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Kind of document stored in the knowledge base
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// Plain text body submitted as JSON
    Text,
    /// Uploaded PDF file
    Pdf,
}

impl DocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Pdf => "pdf",
        }
    }

    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "pdf" => Self::Pdf,
            _ => Self::Text,
        }
    }
}

impl Default for DocType {
    fn default() -> Self {
        Self::Text
    }
}

/// A document stored in the knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Original filename
    pub filename: String,
    /// Document kind
    pub doc_type: DocType,
    /// Original PDF bytes, retained for re-download (PDF uploads only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_binary: Option<Vec<u8>>,
    /// Caller-supplied metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    /// When the document was ingested
    pub upload_date: DateTime<Utc>,
    /// Number of chunks produced
    pub total_chunks: usize,
}

impl Document {
    pub fn new(filename: String, doc_type: DocType) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            doc_type,
            pdf_binary: None,
            metadata: HashMap::new(),
            upload_date: Utc::now(),
            total_chunks: 0,
        }
    }
}

/// A chunk of document text with its embedding and source location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Owning document
    pub document_id: Uuid,
    /// Position within the document (0-based)
    pub chunk_index: usize,
    /// Chunk text (trimmed)
    pub content: String,
    /// Embedding vector; empty when the chunk was never embedded
    pub embedding: Vec<f32>,
    /// First source line covered (1-based; per-page for PDFs)
    pub start_line: u32,
    /// Last source line covered (1-based, inclusive)
    pub end_line: u32,
    /// Page number for PDF chunks (1-based)
    pub page_number: Option<u32>,
}

/// A chunk joined with its owning document, as returned by the store
/// for ranking
#[derive(Debug, Clone)]
pub struct StoredChunk {
    pub document_id: Uuid,
    pub document_name: String,
    pub doc_type: DocType,
    pub chunk: Chunk,
}
