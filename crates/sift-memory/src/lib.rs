//! Document ingestion (load, split) and embedding-backed retrieval.

pub mod document;
pub mod error;
pub mod in_memory_store;
pub mod index;
pub mod vector_store;

pub use error::MemoryError;
pub use in_memory_store::InMemoryVectorStore;
pub use index::{DocumentIndex, ScoredChunk};
pub use vector_store::{ScoredVectorPoint, VectorPoint, VectorStore, VectorStoreError};
