//! Error types for the RAG service

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by ingestion, retrieval, generation, and the HTTP layer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request failed validation (bad query length, bad top_k, missing field)
    #[error("{0}")]
    InvalidRequest(String),

    /// Upload with a file type other than PDF
    #[error("Only PDF files are allowed. Please upload a PDF document.")]
    UnsupportedFileType,

    /// Document or resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Document produced no usable content during ingestion
    #[error("{0}")]
    EmptyDocument(String),

    /// PDF parsing failure
    #[error("Failed to parse PDF: {0}")]
    PdfParse(String),

    /// Embedding provider failure (only surfaced by health paths; the
    /// ingestion/query paths fail open to zero vectors instead)
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// LLM provider failure; the message text drives answer-level
    /// classification downstream
    #[error("{0}")]
    Llm(String),

    /// Storage layer failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catch-all internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidRequest(_) | Error::UnsupportedFileType => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            Error::NotFound("Document not found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::UnsupportedFileType.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Storage("disk full".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unsupported_file_type_message() {
        assert_eq!(
            Error::UnsupportedFileType.to_string(),
            "Only PDF files are allowed. Please upload a PDF document."
        );
    }
}
