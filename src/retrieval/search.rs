//! Brute-force similarity ranking over stored chunks
//!
//! Every query scans every stored chunk: O(total chunk count), no index and
//! no cached norms. That ceiling is deliberate at this scale; an ANN layer
//! would change the tie-break contract and belongs behind this same
//! interface if it ever arrives.

use crate::error::Result;
use crate::storage::DocumentStore;
use crate::types::document::{DocType, StoredChunk};

/// A ranked chunk with its scores and source location
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub document_id: uuid::Uuid,
    pub document_name: String,
    pub doc_type: DocType,
    pub chunk_index: usize,
    pub content: String,
    /// Cosine distance: 0 identical, 2 opposite
    pub distance: f32,
    /// Relevance percentage derived from distance (0-100)
    pub relevance: f32,
    pub start_line: u32,
    pub end_line: u32,
    pub page_number: Option<u32>,
}

/// Brute-force ranker over the document store
pub struct Ranker {
    store: std::sync::Arc<DocumentStore>,
}

impl Ranker {
    pub fn new(store: std::sync::Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Rank all stored chunks against a query vector, closest first,
    /// truncated to `top_k`. Chunks without an embedding are skipped.
    pub fn rank(&self, query_vector: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        let chunks = self.store.all_chunks()?;

        let mut results: Vec<SearchResult> = chunks
            .into_iter()
            .filter(|stored| !stored.chunk.embedding.is_empty())
            .map(|stored| score_chunk(query_vector, stored))
            .collect();

        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);

        tracing::debug!(
            returned = results.len(),
            top_k,
            "ranked stored chunks against query"
        );
        Ok(results)
    }
}

fn score_chunk(query_vector: &[f32], stored: StoredChunk) -> SearchResult {
    let similarity = cosine_similarity(query_vector, &stored.chunk.embedding);
    let distance = 1.0 - similarity;
    SearchResult {
        document_id: stored.document_id,
        document_name: stored.document_name,
        doc_type: stored.doc_type,
        chunk_index: stored.chunk.chunk_index,
        content: stored.chunk.content,
        distance,
        relevance: relevance_from_distance(distance),
        start_line: stored.chunk.start_line,
        end_line: stored.chunk.end_line,
        page_number: stored.chunk.page_number,
    }
}

/// Cosine similarity between two vectors.
///
/// A zero-norm vector (the fail-open embedding path produces these) scores
/// 0.0 instead of dividing by zero, so it ranks at maximal distance.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Rescale cosine distance (0-2) to a 0-100 relevance percentage.
///
/// Single source of truth for the formula: filtering and citation display
/// both go through here.
pub fn relevance_from_distance(distance: f32) -> f32 {
    ((1.0 - distance / 2.0) * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::{Chunk, DocType, Document};
    use std::sync::Arc;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![0.3, -0.7, 1.2];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_is_symmetric() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![-2.0, 0.5, 4.0];
        assert!((cosine_similarity(&a, &b) - cosine_similarity(&b, &a)).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_scores_zero_similarity() {
        let zero = vec![0.0; 3];
        let v = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
        assert_eq!(cosine_similarity(&v, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn mismatched_lengths_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn relevance_endpoints() {
        assert_eq!(relevance_from_distance(0.0), 100.0);
        assert_eq!(relevance_from_distance(1.0), 50.0);
        assert_eq!(relevance_from_distance(2.0), 0.0);
        // out-of-range distances clamp instead of escaping 0-100
        assert_eq!(relevance_from_distance(-0.5), 100.0);
        assert_eq!(relevance_from_distance(3.0), 0.0);
    }

    fn store_with_chunks(embeddings: &[Vec<f32>]) -> Arc<DocumentStore> {
        let store = DocumentStore::in_memory().unwrap();
        let document = Document::new("ranked.txt".to_string(), DocType::Text);
        let chunks: Vec<Chunk> = embeddings
            .iter()
            .enumerate()
            .map(|(i, embedding)| Chunk {
                document_id: document.id,
                chunk_index: i,
                content: format!("chunk {}", i),
                embedding: embedding.clone(),
                start_line: 1,
                end_line: 1,
                page_number: None,
            })
            .collect();
        store.insert_document(&document, &chunks).unwrap();
        Arc::new(store)
    }

    #[test]
    fn ranks_closest_first_and_truncates() {
        let store = store_with_chunks(&[
            vec![0.0, 1.0],  // orthogonal to the query
            vec![1.0, 0.0],  // identical direction
            vec![1.0, 1.0],  // in between
            vec![-1.0, 0.0], // opposite
        ]);
        let ranker = Ranker::new(store);

        let results = ranker.rank(&[1.0, 0.0], 3).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].chunk_index, 1);
        assert!(results[0].distance.abs() < 1e-6);
        assert_eq!(results[1].chunk_index, 2);
        assert_eq!(results[2].chunk_index, 0);
        // distances are non-decreasing
        assert!(results[0].distance <= results[1].distance);
        assert!(results[1].distance <= results[2].distance);
    }

    #[test]
    fn empty_store_returns_empty() {
        let store = Arc::new(DocumentStore::in_memory().unwrap());
        let ranker = Ranker::new(store);
        assert!(ranker.rank(&[1.0, 0.0], 5).unwrap().is_empty());
    }

    #[test]
    fn zero_query_vector_does_not_panic() {
        let store = store_with_chunks(&[vec![1.0, 0.0], vec![0.0, 1.0]]);
        let ranker = Ranker::new(store);
        let results = ranker.rank(&[0.0, 0.0], 5).unwrap();
        assert_eq!(results.len(), 2);
        for result in &results {
            assert_eq!(result.distance, 1.0);
            assert_eq!(result.relevance, 50.0);
        }
    }
}
