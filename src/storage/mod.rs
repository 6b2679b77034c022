//! Persistent storage for documents and chunks

mod database;

pub use database::DocumentStore;
