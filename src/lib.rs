//! kb-rag: Knowledge-base question answering with citation-aware answers
//!
//! This crate provides a complete RAG (Retrieval-Augmented Generation) service:
//! document ingestion with line/page attribution, embedding-based retrieval,
//! and LLM answer generation grounded in the stored documents.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    document::{Chunk, DocType, Document},
    query::QueryRequest,
    response::{QueryResponse, Source},
};
