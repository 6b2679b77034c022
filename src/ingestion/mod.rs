//! Document ingestion pipeline: chunk, embed, persist

mod chunker;
pub mod pdf;

pub use chunker::{TextChunk, TextChunker};

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::providers::EmbeddingGateway;
use crate::storage::DocumentStore;
use crate::types::document::{Chunk, DocType, Document};

/// Ingestion pipeline shared by the upload endpoints.
///
/// A document is chunked, each chunk embedded in the document role, and
/// the whole result written in one transaction. Failed ingestion leaves no
/// partial document behind.
pub struct Ingestor {
    chunker: TextChunker,
    embeddings: EmbeddingGateway,
    store: Arc<DocumentStore>,
}

impl Ingestor {
    pub fn new(
        chunking: &ChunkingConfig,
        embeddings: EmbeddingGateway,
        store: Arc<DocumentStore>,
    ) -> Self {
        Self {
            chunker: TextChunker::new(chunking.chunk_size, chunking.chunk_overlap),
            embeddings,
            store,
        }
    }

    /// Ingest a plain text body
    pub async fn ingest_text(
        &self,
        filename: &str,
        content: &str,
        doc_type: DocType,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) -> Result<Document> {
        let text_chunks = self.chunker.chunk_text(content);
        if text_chunks.is_empty() {
            return Err(Error::EmptyDocument(
                "No content found in document".to_string(),
            ));
        }

        let located: Vec<(TextChunk, Option<u32>)> =
            text_chunks.into_iter().map(|c| (c, None)).collect();
        self.persist(filename, doc_type, None, metadata, located).await
    }

    /// Ingest a PDF, chunking each page independently.
    ///
    /// Line numbers are relative to the page a chunk came from, and the
    /// original bytes are retained on the document record.
    pub async fn ingest_pdf(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) -> Result<Document> {
        let pages = pdf::extract_pages(&bytes)?;

        let mut located = Vec::new();
        for page in &pages {
            for chunk in self.chunker.chunk_text(&page.text) {
                located.push((chunk, Some(page.page_number)));
            }
        }

        if located.is_empty() {
            return Err(Error::EmptyDocument(
                "No text content found in PDF".to_string(),
            ));
        }

        self.persist(filename, DocType::Pdf, Some(bytes), metadata, located)
            .await
    }

    async fn persist(
        &self,
        filename: &str,
        doc_type: DocType,
        pdf_binary: Option<Vec<u8>>,
        metadata: Option<HashMap<String, serde_json::Value>>,
        located: Vec<(TextChunk, Option<u32>)>,
    ) -> Result<Document> {
        let texts: Vec<String> = located.iter().map(|(c, _)| c.text.clone()).collect();
        let embeddings = self.embeddings.embed_documents(&texts).await;

        let mut document = Document::new(filename.to_string(), doc_type);
        document.pdf_binary = pdf_binary;
        document.metadata = metadata.unwrap_or_default();
        document.total_chunks = located.len();

        let chunks: Vec<Chunk> = located
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(index, ((text_chunk, page_number), embedding))| Chunk {
                document_id: document.id,
                chunk_index: index,
                content: text_chunk.text,
                embedding,
                start_line: text_chunk.start_line,
                end_line: text_chunk.end_line,
                page_number,
            })
            .collect();

        self.store.insert_document(&document, &chunks)?;

        tracing::info!(
            document_id = %document.id,
            filename,
            doc_type = doc_type.as_str(),
            chunks = chunks.len(),
            "document ingested"
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::embedding::{EmbedRole, EmbeddingProvider};
    use async_trait::async_trait;

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, _text: &str, _role: EmbedRole) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0, 0.0])
        }

        fn dimensions(&self) -> usize {
            3
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn ingestor(store: Arc<DocumentStore>) -> Ingestor {
        Ingestor::new(
            &ChunkingConfig::default(),
            EmbeddingGateway::new(Arc::new(StubEmbedder)),
            store,
        )
    }

    #[tokio::test]
    async fn text_document_single_line_single_chunk() {
        let store = Arc::new(DocumentStore::in_memory().unwrap());
        let document = ingestor(store.clone())
            .ingest_text(
                "policy.txt",
                "The refund policy allows returns within 30 days. Contact support for help.",
                DocType::Text,
                None,
            )
            .await
            .unwrap();

        assert_eq!(document.total_chunks, 1);
        let stored = store.all_chunks().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].chunk.start_line, 1);
        assert_eq!(stored[0].chunk.end_line, 1);
        assert_eq!(stored[0].chunk.page_number, None);
        assert_eq!(stored[0].chunk.embedding.len(), 3);
    }

    #[tokio::test]
    async fn empty_text_is_rejected_without_store_write() {
        let store = Arc::new(DocumentStore::in_memory().unwrap());
        let result = ingestor(store.clone())
            .ingest_text("empty.txt", "   \n  ", DocType::Text, None)
            .await;

        assert!(matches!(result, Err(Error::EmptyDocument(_))));
        assert_eq!(store.document_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn unparsable_pdf_is_rejected_without_store_write() {
        let store = Arc::new(DocumentStore::in_memory().unwrap());
        let result = ingestor(store.clone())
            .ingest_pdf("bad.pdf", b"not a pdf".to_vec(), None)
            .await;

        assert!(result.is_err());
        assert_eq!(store.document_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn metadata_round_trips_to_store() {
        let store = Arc::new(DocumentStore::in_memory().unwrap());
        let mut metadata = HashMap::new();
        metadata.insert("source".to_string(), serde_json::json!("wiki"));
        ingestor(store.clone())
            .ingest_text("meta.txt", "some content here", DocType::Text, Some(metadata))
            .await
            .unwrap();
        assert_eq!(store.document_count().unwrap(), 1);
    }
}
