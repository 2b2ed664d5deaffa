//! Query-time retrieval over the knowledge base.

use crate::error::IngestResult;
use bscforge_index::Index;
use bscforge_nvidia::NvidiaClient;
use tracing::info;

/// Smallest allowed neighbor count.
pub const MIN_K: usize = 1;
/// Largest allowed neighbor count.
pub const MAX_K: usize = 10;

/// Retrieves the chunk texts most similar to a query.
pub struct Retriever {
    index: Index,
    client: NvidiaClient,
    embedding_model: String,
    collection: String,
    k: usize,
}

impl Retriever {
    /// Create a retriever. The neighbor count is clamped to
    /// [`MIN_K`]..=[`MAX_K`].
    pub fn new(
        index: Index,
        client: NvidiaClient,
        embedding_model: impl Into<String>,
        collection: impl Into<String>,
        k: usize,
    ) -> Self {
        Self {
            index,
            client,
            embedding_model: embedding_model.into(),
            collection: collection.into(),
            k: k.clamp(MIN_K, MAX_K),
        }
    }

    /// Current neighbor count.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Change the neighbor count, clamped to the allowed range.
    pub fn set_k(&mut self, k: usize) {
        self.k = k.clamp(MIN_K, MAX_K);
    }

    /// Return the texts of at most k chunks most similar to the query,
    /// in similarity order. Embedding or index failures propagate; there
    /// is no retry.
    pub async fn context(&self, query: &str) -> IngestResult<Vec<String>> {
        info!("Retrieving top {} chunks", self.k);

        let query_embedding = self.client.embed(&self.embedding_model, query).await?;
        let results = self
            .index
            .vector_search(&self.collection, &query_embedding, self.k)?;

        Ok(results.into_iter().map(|r| r.chunk.content).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bscforge_config::ApiConfig;

    fn test_retriever(k: usize) -> Retriever {
        let index = Index::open_in_memory().unwrap();
        let client = NvidiaClient::from_config(&ApiConfig::default()).unwrap();
        Retriever::new(index, client, "test-embed", "kb", k)
    }

    #[test]
    fn test_k_clamped_to_range() {
        assert_eq!(test_retriever(0).k(), MIN_K);
        assert_eq!(test_retriever(5).k(), 5);
        assert_eq!(test_retriever(50).k(), MAX_K);
    }

    #[test]
    fn test_set_k_clamps() {
        let mut retriever = test_retriever(5);
        retriever.set_k(0);
        assert_eq!(retriever.k(), MIN_K);
        retriever.set_k(10);
        assert_eq!(retriever.k(), MAX_K);
        retriever.set_k(100);
        assert_eq!(retriever.k(), MAX_K);
    }
}
