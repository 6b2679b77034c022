//! SQLite store for documents and their embedded chunks
//!
//! A document and all of its chunks are written and deleted as one
//! transaction, so concurrent readers never observe a partial document.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::document::{Chunk, DocType, Document, StoredChunk};
use crate::types::response::DocumentInfo;

/// SQLite-backed document store
pub struct DocumentStore {
    conn: Arc<Mutex<Connection>>,
}

impl DocumentStore {
    /// Create or open the database at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| Error::Storage(format!("failed to open database: {}", e)))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Storage(format!("failed to open in-memory database: {}", e)))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
        "#,
        )
        .map_err(|e| Error::Storage(format!("failed to set pragmas: {}", e)))?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                filename TEXT NOT NULL,
                doc_type TEXT NOT NULL,
                pdf_binary BLOB,
                metadata TEXT,
                upload_date TEXT NOT NULL,
                total_chunks INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS chunks (
                document_id TEXT NOT NULL,
                chunk_index INTEGER NOT NULL,
                content TEXT NOT NULL,
                embedding BLOB NOT NULL,
                start_line INTEGER NOT NULL,
                end_line INTEGER NOT NULL,
                page_number INTEGER,
                PRIMARY KEY (document_id, chunk_index)
            );

            CREATE INDEX IF NOT EXISTS idx_chunks_document_id ON chunks(document_id);
        "#,
        )
        .map_err(|e| Error::Storage(format!("failed to run migrations: {}", e)))?;

        Ok(())
    }

    /// Insert a document and all its chunks atomically
    pub fn insert_document(&self, document: &Document, chunks: &[Chunk]) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let metadata_json = if document.metadata.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&document.metadata)?)
        };

        tx.execute(
            "INSERT INTO documents (id, filename, doc_type, pdf_binary, metadata, upload_date, total_chunks)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                document.id.to_string(),
                document.filename,
                document.doc_type.as_str(),
                document.pdf_binary,
                metadata_json,
                document.upload_date,
                chunks.len() as i64,
            ],
        )?;

        for chunk in chunks {
            tx.execute(
                "INSERT INTO chunks (document_id, chunk_index, content, embedding, start_line, end_line, page_number)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    chunk.document_id.to_string(),
                    chunk.chunk_index as i64,
                    chunk.content,
                    embedding_to_blob(&chunk.embedding),
                    chunk.start_line as i64,
                    chunk.end_line as i64,
                    chunk.page_number.map(|p| p as i64),
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// List all documents, newest first
    pub fn list_documents(&self) -> Result<Vec<DocumentInfo>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, filename, upload_date, doc_type, total_chunks
             FROM documents ORDER BY upload_date DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(DocumentInfo {
                id: row.get(0)?,
                filename: row.get(1)?,
                upload_date: row.get::<_, DateTime<Utc>>(2)?,
                doc_type: row.get(3)?,
                chunk_count: row.get::<_, i64>(4)? as usize,
            })
        })?;

        let mut documents = Vec::new();
        for row in rows {
            documents.push(row?);
        }
        Ok(documents)
    }

    /// Delete a document and its chunks atomically.
    ///
    /// Returns false when no document with that id exists.
    pub fn delete_document(&self, id: &str) -> Result<bool> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM chunks WHERE document_id = ?1", params![id])?;
        let deleted = tx.execute("DELETE FROM documents WHERE id = ?1", params![id])?;

        tx.commit()?;
        Ok(deleted > 0)
    }

    /// Load every chunk with its owning document's name, for ranking
    pub fn all_chunks(&self) -> Result<Vec<StoredChunk>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT c.document_id, c.chunk_index, c.content, c.embedding,
                    c.start_line, c.end_line, c.page_number, d.filename, d.doc_type
             FROM chunks c
             JOIN documents d ON d.id = c.document_id
             ORDER BY c.document_id, c.chunk_index",
        )?;

        let rows = stmt.query_map([], |row| {
            let document_id: String = row.get(0)?;
            let embedding_blob: Vec<u8> = row.get(3)?;
            Ok((
                document_id,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                embedding_blob,
                row.get::<_, i64>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, Option<i64>>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, String>(8)?,
            ))
        })?;

        let mut chunks = Vec::new();
        for row in rows {
            let (id, index, content, blob, start_line, end_line, page_number, filename, doc_type) =
                row?;
            let document_id = Uuid::parse_str(&id)
                .map_err(|e| Error::Storage(format!("corrupt document id {:?}: {}", id, e)))?;
            chunks.push(StoredChunk {
                document_id,
                document_name: filename,
                doc_type: DocType::from_str_lossy(&doc_type),
                chunk: Chunk {
                    document_id,
                    chunk_index: index as usize,
                    content,
                    embedding: blob_to_embedding(&blob),
                    start_line: start_line as u32,
                    end_line: end_line as u32,
                    page_number: page_number.map(|p| p as u32),
                },
            });
        }
        Ok(chunks)
    }

    /// Fetch the retained PDF bytes for a document, if any
    pub fn pdf_binary(&self, id: &str) -> Result<Option<Vec<u8>>> {
        let conn = self.conn.lock();
        let binary = conn
            .query_row(
                "SELECT pdf_binary FROM documents WHERE id = ?1",
                params![id],
                |row| row.get::<_, Option<Vec<u8>>>(0),
            )
            .optional()?;
        Ok(binary.flatten())
    }

    /// Number of stored documents
    pub fn document_count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of stored chunks across all documents
    pub fn chunk_count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Serialize an embedding as little-endian f32 bytes
fn embedding_to_blob(embedding: &[f32]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(embedding.len() * 4);
    for value in embedding {
        blob.extend_from_slice(&value.to_le_bytes());
    }
    blob
}

/// Deserialize little-endian f32 bytes back into an embedding
fn blob_to_embedding(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|bytes| f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::DocType;

    fn sample_document(filename: &str) -> (Document, Vec<Chunk>) {
        let document = Document::new(filename.to_string(), DocType::Text);
        let chunks = vec![
            Chunk {
                document_id: document.id,
                chunk_index: 0,
                content: "first chunk".to_string(),
                embedding: vec![0.1, 0.2, 0.3],
                start_line: 1,
                end_line: 2,
                page_number: None,
            },
            Chunk {
                document_id: document.id,
                chunk_index: 1,
                content: "second chunk".to_string(),
                embedding: vec![0.4, 0.5, 0.6],
                start_line: 2,
                end_line: 4,
                page_number: None,
            },
        ];
        (document, chunks)
    }

    #[test]
    fn embedding_blob_round_trip() {
        let embedding = vec![0.5f32, -1.25, 3.0, 0.0];
        assert_eq!(blob_to_embedding(&embedding_to_blob(&embedding)), embedding);
        assert!(blob_to_embedding(&[]).is_empty());
    }

    #[test]
    fn insert_list_delete() {
        let store = DocumentStore::in_memory().unwrap();
        let (document, chunks) = sample_document("notes.txt");
        store.insert_document(&document, &chunks).unwrap();

        let listed = store.list_documents().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].filename, "notes.txt");
        assert_eq!(listed[0].doc_type, "text");
        assert_eq!(listed[0].chunk_count, 2);
        assert_eq!(store.chunk_count().unwrap(), 2);

        assert!(store.delete_document(&document.id.to_string()).unwrap());
        assert_eq!(store.document_count().unwrap(), 0);
        assert_eq!(store.chunk_count().unwrap(), 0);
    }

    #[test]
    fn reopened_database_keeps_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.db");

        {
            let store = DocumentStore::new(&path).unwrap();
            let (document, chunks) = sample_document("persisted.txt");
            store.insert_document(&document, &chunks).unwrap();
        }

        let store = DocumentStore::new(&path).unwrap();
        assert_eq!(store.document_count().unwrap(), 1);
        assert_eq!(store.chunk_count().unwrap(), 2);
        assert_eq!(store.list_documents().unwrap()[0].filename, "persisted.txt");
    }

    #[test]
    fn delete_missing_returns_false() {
        let store = DocumentStore::in_memory().unwrap();
        assert!(!store.delete_document("no-such-id").unwrap());
    }

    #[test]
    fn all_chunks_joins_document_name() {
        let store = DocumentStore::in_memory().unwrap();
        let (document, chunks) = sample_document("joined.txt");
        store.insert_document(&document, &chunks).unwrap();

        let stored = store.all_chunks().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].document_name, "joined.txt");
        assert_eq!(stored[0].doc_type, DocType::Text);
        assert_eq!(stored[0].chunk.embedding, vec![0.1, 0.2, 0.3]);
        assert_eq!(stored[1].chunk.chunk_index, 1);
        assert_eq!(stored[1].chunk.end_line, 4);
    }

    #[test]
    fn pdf_binary_retained() {
        let store = DocumentStore::in_memory().unwrap();
        let mut document = Document::new("paper.pdf".to_string(), DocType::Pdf);
        document.pdf_binary = Some(vec![0x25, 0x50, 0x44, 0x46]);
        let chunk = Chunk {
            document_id: document.id,
            chunk_index: 0,
            content: "page one".to_string(),
            embedding: vec![1.0],
            start_line: 1,
            end_line: 1,
            page_number: Some(1),
        };
        store.insert_document(&document, &[chunk]).unwrap();

        let binary = store.pdf_binary(&document.id.to_string()).unwrap();
        assert_eq!(binary, Some(vec![0x25, 0x50, 0x44, 0x46]));
        let stored = store.all_chunks().unwrap();
        assert_eq!(stored[0].chunk.page_number, Some(1));
    }
}
