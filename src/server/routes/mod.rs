//! API routes for the knowledge-base server

pub mod documents;
pub mod query;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{delete, get, post},
    Json, Router,
};

use crate::server::state::AppState;
use crate::types::response::HealthResponse;

/// Build all /api routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Document management
        .route("/documents", get(documents::list_documents))
        .route("/documents/:id", delete(documents::delete_document))
        // Ingestion - with larger body limit for PDF uploads
        .route(
            "/documents/upload",
            post(documents::upload_pdf).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/documents/text", post(documents::upload_text))
        // Query
        .route("/query", post(query::query_knowledge_base))
}

/// GET / - health report
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let configured = state.config().gemini.is_configured();
    Json(HealthResponse {
        status: if configured { "healthy" } else { "warning" }.to_string(),
        message: if configured {
            "AI Knowledge Base API is running".to_string()
        } else {
            "Gemini API key not configured".to_string()
        },
        gemini_configured: configured,
    })
}
