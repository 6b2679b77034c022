//! Core types for the RAG service

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, DocType, Document};
pub use query::QueryRequest;
pub use response::{
    DeleteResponse, DocumentInfo, HealthResponse, IngestResponse, QueryResponse, Source,
};
