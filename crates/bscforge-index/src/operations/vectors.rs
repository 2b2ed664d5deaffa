//! Vector storage and nearest-neighbor search.

use crate::database::Index;
use crate::error::IndexResult;
use bscforge_core::{Chunk, ChunkId};
use rusqlite::params;

/// Result of a similarity search.
#[derive(Debug, Clone)]
pub struct SimilarityResult {
    /// The matching chunk.
    pub chunk: Chunk,
    /// Cosine similarity score.
    pub similarity: f32,
}

/// Calculate cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot_product = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for i in 0..a.len() {
        dot_product += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    dot_product / denominator
}

fn decode_vector(bytes: &[u8], dimensions: usize) -> Vec<f32> {
    bytes
        .chunks(4)
        .take(dimensions)
        .map(|b| {
            if b.len() == 4 {
                f32::from_le_bytes([b[0], b[1], b[2], b[3]])
            } else {
                0.0
            }
        })
        .collect()
}

impl Index {
    /// Store the embedding of a chunk.
    pub fn store_embedding(&self, chunk_id: &ChunkId, vector: &[f32], model: &str) -> IndexResult<()> {
        let conn = self.conn()?;

        let vector_bytes: Vec<u8> = vector.iter().flat_map(|f| f.to_le_bytes()).collect();

        conn.execute(
            r#"
            INSERT OR REPLACE INTO embeddings (chunk_id, vector, model, dimensions)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![chunk_id, vector_bytes, model, vector.len() as i32],
        )?;

        Ok(())
    }

    /// Get the embedding of a chunk, if any.
    pub fn get_embedding(&self, chunk_id: &ChunkId) -> IndexResult<Option<Vec<f32>>> {
        let conn = self.conn()?;

        let result = conn.query_row(
            "SELECT vector, dimensions FROM embeddings WHERE chunk_id = ?1",
            params![chunk_id],
            |row| {
                let bytes: Vec<u8> = row.get(0)?;
                let dimensions: i32 = row.get(1)?;
                Ok((bytes, dimensions))
            },
        );

        match result {
            Ok((bytes, dimensions)) => Ok(Some(decode_vector(&bytes, dimensions as usize))),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Find the chunks of a collection most similar to the query vector.
    ///
    /// Brute-force cosine scan over all stored embeddings; results are
    /// similarity-ranked and truncated to `limit`.
    pub fn vector_search(
        &self,
        collection: &str,
        query_vector: &[f32],
        limit: usize,
    ) -> IndexResult<Vec<SimilarityResult>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT c.id, c.collection, c.chunk_index, c.content,
                   e.vector, e.dimensions
            FROM embeddings e
            JOIN chunks c ON c.id = e.chunk_id
            WHERE c.collection = ?1
            "#,
        )?;

        let rows = stmt.query_map(params![collection], |row| {
            let chunk = Chunk {
                id: row.get(0)?,
                collection: row.get(1)?,
                chunk_index: row.get(2)?,
                content: row.get(3)?,
            };
            let vector_bytes: Vec<u8> = row.get(4)?;
            let dimensions: i32 = row.get(5)?;
            Ok((chunk, vector_bytes, dimensions))
        })?;

        let mut results: Vec<SimilarityResult> = Vec::new();
        for row_result in rows {
            let (chunk, vector_bytes, dimensions) = row_result?;
            let vector = decode_vector(&vector_bytes, dimensions as usize);
            let similarity = cosine_similarity(query_vector, &vector);
            results.push(SimilarityResult { chunk, similarity });
        }

        // Rank by similarity, descending; ties keep scan order
        results.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap());
        results.truncate(limit);

        Ok(results)
    }

    /// Get embedding statistics for a collection: (embedded_count, total_count).
    pub fn embedding_stats(&self, collection: &str) -> IndexResult<(i64, i64)> {
        let conn = self.conn()?;

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )?;

        let embedded: i64 = conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM embeddings e
            JOIN chunks c ON c.id = e.chunk_id
            WHERE c.collection = ?1
            "#,
            params![collection],
            |row| row.get(0),
        )?;

        Ok((embedded, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        // Identical vectors
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.0001);

        // Orthogonal vectors
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 0.0001);

        // Opposite vectors
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) - (-1.0)).abs() < 0.0001);

        // Empty vectors
        let a: Vec<f32> = vec![];
        let b: Vec<f32> = vec![];
        assert_eq!(cosine_similarity(&a, &b), 0.0);

        // Different lengths
        let a = vec![1.0, 0.0];
        let b = vec![1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_embedding_roundtrip() {
        let index = Index::open_in_memory().unwrap();

        let chunk = Chunk::new("kb", 0, "Test content");
        index.create_chunks(&[chunk.clone()]).unwrap();

        let vector = vec![0.1, 0.2, 0.3, 0.4];
        index.store_embedding(&chunk.id, &vector, "test-model").unwrap();

        let retrieved = index.get_embedding(&chunk.id).unwrap().unwrap();
        assert_eq!(retrieved.len(), 4);
        assert!((retrieved[0] - 0.1).abs() < 0.0001);
        assert!((retrieved[3] - 0.4).abs() < 0.0001);
    }

    #[test]
    fn test_vector_search_ranking() {
        let index = Index::open_in_memory().unwrap();

        let chunk1 = Chunk::new("kb", 0, "Needham-Schroeder key exchange");
        let chunk2 = Chunk::new("kb", 1, "QUIC v1 handshake");
        index.create_chunks(&[chunk1.clone(), chunk2.clone()]).unwrap();

        index
            .store_embedding(&chunk1.id, &[1.0, 0.0, 0.0, 0.0], "test-model")
            .unwrap();
        index
            .store_embedding(&chunk2.id, &[0.0, 1.0, 0.0, 0.0], "test-model")
            .unwrap();

        let results = index.vector_search("kb", &[0.9, 0.1, 0.0, 0.0], 10).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.id, chunk1.id);
    }

    #[test]
    fn test_vector_search_respects_limit() {
        let index = Index::open_in_memory().unwrap();

        let chunks: Vec<Chunk> = (0..20)
            .map(|i| Chunk::new("kb", i, format!("chunk {}", i)))
            .collect();
        index.create_chunks(&chunks).unwrap();

        for (i, chunk) in chunks.iter().enumerate() {
            index
                .store_embedding(&chunk.id, &[1.0, i as f32], "test-model")
                .unwrap();
        }

        for k in 1..=10 {
            let results = index.vector_search("kb", &[1.0, 0.5], k).unwrap();
            assert!(results.len() <= k);
        }
    }

    #[test]
    fn test_vector_search_scoped_to_collection() {
        let index = Index::open_in_memory().unwrap();

        let chunk_a = Chunk::new("kb", 0, "in collection");
        let chunk_b = Chunk::new("other", 0, "different collection");
        index.create_chunks(&[chunk_a.clone(), chunk_b.clone()]).unwrap();

        index.store_embedding(&chunk_a.id, &[1.0, 0.0], "m").unwrap();
        index.store_embedding(&chunk_b.id, &[1.0, 0.0], "m").unwrap();

        let results = index.vector_search("kb", &[1.0, 0.0], 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.id, chunk_a.id);
    }

    #[test]
    fn test_embedding_stats() {
        let index = Index::open_in_memory().unwrap();

        let chunks: Vec<Chunk> = (0..3).map(|i| Chunk::new("kb", i, format!("c{}", i))).collect();
        index.create_chunks(&chunks).unwrap();

        index.store_embedding(&chunks[0].id, &[1.0], "m").unwrap();
        index.store_embedding(&chunks[1].id, &[1.0], "m").unwrap();

        let (embedded, total) = index.embedding_stats("kb").unwrap();
        assert_eq!(embedded, 2);
        assert_eq!(total, 3);
    }
}
