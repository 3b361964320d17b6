use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use serde_json::json;
use sift_llm::provider::EmbedFn;
use uuid::Uuid;

use crate::document::{Chunk, Metadata};
use crate::error::MemoryError;
use crate::vector_store::{ScoredVectorPoint, VectorPoint, VectorStore, VectorStoreError};

pub const DEFAULT_COLLECTION: &str = "sift_documents";

/// A retrieved chunk with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Embeds chunks into a [`VectorStore`] collection and answers similarity queries.
pub struct DocumentIndex {
    store: Arc<dyn VectorStore>,
    collection: String,
    embed_fn: EmbedFn,
}

impl std::fmt::Debug for DocumentIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentIndex")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl DocumentIndex {
    pub fn new(store: Arc<dyn VectorStore>, embed_fn: EmbedFn) -> Self {
        Self {
            store,
            collection: DEFAULT_COLLECTION.to_owned(),
            embed_fn,
        }
    }

    /// Embed and store `chunks`. Returns the number of chunks written.
    ///
    /// Point ids derive from metadata, position and content, so indexing the same
    /// chunk twice overwrites the earlier point.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding or storage fails.
    pub async fn create_from_documents(&self, chunks: &[Chunk]) -> Result<usize, MemoryError> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let mut points = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let vector = (self.embed_fn)(chunk.content()).await?;
            points.push(VectorPoint {
                id: chunk_id(chunk).to_string(),
                vector,
                payload: chunk_payload(chunk)?,
            });
        }

        let dim = points[0].vector.len() as u64;
        self.store.ensure_collection(&self.collection, dim).await?;

        let count = points.len();
        self.store.upsert(&self.collection, points).await?;
        tracing::info!(chunks = count, collection = %self.collection, "indexed chunks");
        Ok(count)
    }

    /// The `k` chunks most similar to `query`, best first. An index that has
    /// never been written to returns no results.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding the query or searching fails.
    pub async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk>, MemoryError> {
        if k == 0 || !self.store.collection_exists(&self.collection).await? {
            return Ok(Vec::new());
        }

        let vector = (self.embed_fn)(query).await?;
        let hits = self
            .store
            .search(&self.collection, vector, k as u64)
            .await?;
        tracing::debug!(query, hits = hits.len(), "similarity search");

        hits.into_iter().map(scored_chunk).collect()
    }

    /// Number of stored chunks.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn len(&self) -> Result<usize, MemoryError> {
        Ok(self.store.count(&self.collection).await?)
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn is_empty(&self) -> Result<bool, MemoryError> {
        Ok(self.len().await? == 0)
    }
}

/// Every metadata entry takes part, so equal text on different PDF pages
/// stays distinct.
fn chunk_id(chunk: &Chunk) -> Uuid {
    let mut key = String::new();
    for (name, value) in chunk.metadata() {
        let _ = write!(key, "{name}={value}\0");
    }
    let _ = write!(key, "{}\0{}", chunk.chunk_index(), chunk.content());
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
}

fn chunk_payload(chunk: &Chunk) -> Result<HashMap<String, serde_json::Value>, MemoryError> {
    Ok(HashMap::from([
        ("content".to_owned(), json!(chunk.content())),
        ("chunk_index".to_owned(), json!(chunk.chunk_index())),
        ("offset".to_owned(), json!(chunk.offset())),
        ("metadata".to_owned(), serde_json::to_value(chunk.metadata())?),
    ]))
}

fn scored_chunk(point: ScoredVectorPoint) -> Result<ScoredChunk, MemoryError> {
    let mut payload = point.payload;
    let missing = |field: &str| {
        VectorStoreError::Serialization(format!("point {} has no valid {field}", point.id))
    };

    let content = payload
        .get("content")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| missing("content"))?
        .to_owned();
    let chunk_index = payload
        .get("chunk_index")
        .and_then(serde_json::Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| missing("chunk_index"))?;
    let offset = payload
        .get("offset")
        .and_then(serde_json::Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| missing("offset"))?;
    let metadata: Metadata = match payload.remove("metadata") {
        Some(value) => serde_json::from_value(value)?,
        None => Metadata::new(),
    };

    Ok(ScoredChunk {
        chunk: Chunk::new(content, metadata, chunk_index, offset),
        score: point.score,
    })
}

#[cfg(test)]
mod tests {
    use sift_llm::mock::MockProvider;
    use sift_llm::provider::embed_fn;

    use super::*;
    use crate::document::MetadataValue;
    use crate::in_memory_store::InMemoryVectorStore;

    fn chunk(source: &str, index: usize, content: &str) -> Chunk {
        let metadata = Metadata::from([("source".to_owned(), MetadataValue::from(source))]);
        Chunk::new(content.to_owned(), metadata, index, index * 10)
    }

    fn mock_index() -> (DocumentIndex, Arc<InMemoryVectorStore>) {
        let store = Arc::new(InMemoryVectorStore::new());
        let index = DocumentIndex::new(
            Arc::clone(&store) as Arc<dyn VectorStore>,
            embed_fn(Arc::new(MockProvider::default())),
        );
        (index, store)
    }

    fn failing_embed() -> EmbedFn {
        Box::new(|_text: &str| {
            Box::pin(async move { Err(sift_llm::LlmError::Other("mock embed error".into())) })
        })
    }

    #[tokio::test]
    async fn empty_input_returns_zero() {
        let (index, store) = mock_index();
        assert_eq!(index.create_from_documents(&[]).await.unwrap(), 0);
        assert!(!store.collection_exists(DEFAULT_COLLECTION).await.unwrap());
    }

    #[tokio::test]
    async fn search_before_indexing_is_empty() {
        let (index, _) = mock_index();
        assert!(index.similarity_search("anything", 3).await.unwrap().is_empty());
        assert!(index.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn indexes_and_retrieves_best_match() {
        let (index, _) = mock_index();
        let chunks = vec![
            chunk("python.txt", 0, "Python is a high level programming language"),
            chunk("ml.txt", 0, "Machine learning models learn patterns from data"),
            chunk("dl.txt", 0, "Deep learning stacks neural network layers"),
        ];
        assert_eq!(index.create_from_documents(&chunks).await.unwrap(), 3);
        assert_eq!(index.len().await.unwrap(), 3);

        let hits = index
            .similarity_search("python programming language", 2)
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk, chunks[0]);
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn reindexing_same_chunks_does_not_duplicate() {
        let (index, _) = mock_index();
        let chunks = vec![chunk("a.txt", 0, "alpha"), chunk("a.txt", 1, "beta")];
        index.create_from_documents(&chunks).await.unwrap();
        index.create_from_documents(&chunks).await.unwrap();
        assert_eq!(index.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn embed_failure_propagates() {
        let store: Arc<dyn VectorStore> = Arc::new(InMemoryVectorStore::new());
        let index = DocumentIndex::new(store, failing_embed());
        let err = index
            .create_from_documents(&[chunk("a.txt", 0, "alpha")])
            .await
            .unwrap_err();
        assert!(matches!(err, MemoryError::Llm(_)));
    }

    #[tokio::test]
    async fn zero_k_short_circuits() {
        let (index, _) = mock_index();
        index
            .create_from_documents(&[chunk("a.txt", 0, "alpha")])
            .await
            .unwrap();
        assert!(index.similarity_search("alpha", 0).await.unwrap().is_empty());
    }

    #[test]
    fn chunk_id_is_deterministic() {
        let a = chunk("a.txt", 0, "alpha");
        assert_eq!(chunk_id(&a), chunk_id(&a.clone()));
        assert_ne!(chunk_id(&a), chunk_id(&chunk("a.txt", 1, "alpha")));
        assert_ne!(chunk_id(&a), chunk_id(&chunk("b.txt", 0, "alpha")));
    }

    fn page_chunk(page: usize, content: &str) -> Chunk {
        let metadata = Metadata::from([
            ("source".to_owned(), MetadataValue::from("report.pdf")),
            ("page".to_owned(), MetadataValue::from(page)),
        ]);
        Chunk::new(content.to_owned(), metadata, 0, 0)
    }

    #[test]
    fn chunk_id_distinguishes_pages() {
        assert_ne!(
            chunk_id(&page_chunk(0, "Page intentionally left blank")),
            chunk_id(&page_chunk(1, "Page intentionally left blank"))
        );
    }

    #[tokio::test]
    async fn repeated_page_text_keeps_every_page() {
        let (index, _) = mock_index();
        let chunks = vec![
            page_chunk(0, "Confidential footer"),
            page_chunk(1, "Confidential footer"),
        ];
        assert_eq!(index.create_from_documents(&chunks).await.unwrap(), 2);
        assert_eq!(index.len().await.unwrap(), 2);

        let hits = index.similarity_search("Confidential footer", 2).await.unwrap();
        let mut pages: Vec<String> = hits
            .iter()
            .filter_map(|hit| hit.chunk.metadata().get("page"))
            .map(ToString::to_string)
            .collect();
        pages.sort();
        assert_eq!(pages, vec!["0", "1"]);
    }

    #[test]
    fn payload_without_content_is_rejected() {
        let point = ScoredVectorPoint {
            id: "x".into(),
            score: 0.5,
            payload: HashMap::from([("chunk_index".to_owned(), json!(0))]),
        };
        let err = scored_chunk(point).unwrap_err();
        assert!(matches!(
            err,
            MemoryError::VectorStore(VectorStoreError::Serialization(_))
        ));
    }
}
