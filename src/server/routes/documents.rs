//! Document ingestion and management endpoints

use axum::{
    extract::{Multipart, Path, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::document::DocType;
use crate::types::query::DocumentUpload;
use crate::types::response::{DeleteResponse, DocumentInfo, IngestResponse};

/// POST /api/documents/upload - ingest a PDF file (multipart)
pub async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidRequest(format!("invalid multipart body: {}", e)))?
    {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        // extension gate runs before the body is even read
        if !filename.to_lowercase().ends_with(".pdf") {
            return Err(Error::UnsupportedFileType);
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::InvalidRequest(format!("failed to read upload: {}", e)))?;

        let document = state
            .ingestor()
            .ingest_pdf(&filename, bytes.to_vec(), None)
            .await?;

        return Ok(Json(IngestResponse {
            message: "Document uploaded and indexed successfully".to_string(),
            document_id: document.id.to_string(),
            filename,
            doc_type: Some("pdf".to_string()),
        }));
    }

    Err(Error::InvalidRequest(
        "no file field in multipart body".to_string(),
    ))
}

/// POST /api/documents/text - ingest a text body (JSON)
pub async fn upload_text(
    State(state): State<AppState>,
    Json(upload): Json<DocumentUpload>,
) -> Result<Json<IngestResponse>> {
    let document = state
        .ingestor()
        .ingest_text(
            &upload.filename,
            &upload.content,
            DocType::from_str_lossy(&upload.doc_type),
            upload.metadata,
        )
        .await?;

    Ok(Json(IngestResponse {
        message: "Document uploaded and indexed successfully".to_string(),
        document_id: document.id.to_string(),
        filename: upload.filename,
        doc_type: None,
    }))
}

/// GET /api/documents - list all documents
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<Vec<DocumentInfo>>> {
    Ok(Json(state.store().list_documents()?))
}

/// DELETE /api/documents/:id - delete a document and its chunks
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if state.store().delete_document(&id)? {
        tracing::info!(document_id = %id, "document deleted");
        Ok(Json(DeleteResponse {
            message: "Document deleted successfully".to_string(),
            document_id: id,
        }))
    } else {
        Err(Error::NotFound("Document not found".to_string()))
    }
}
