//! Question-answering endpoint

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::query::QueryRequest;
use crate::types::response::QueryResponse;

/// POST /api/query - answer a question from the knowledge base
pub async fn query_knowledge_base(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    request.validate()?;

    tracing::info!(
        query_len = request.query.chars().count(),
        top_k = ?request.top_k,
        "query received"
    );

    let response = state.composer().answer(&request.query, request.top_k).await?;
    Ok(Json(response))
}
