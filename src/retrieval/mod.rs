//! Query-time retrieval: brute-force cosine ranking over the store

mod search;

pub use search::{cosine_similarity, relevance_from_distance, Ranker, SearchResult};
