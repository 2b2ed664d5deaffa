//! Chunk storage operations.

use crate::database::Index;
use crate::error::{IndexError, IndexResult};
use bscforge_core::Chunk;
use rusqlite::params;

impl Index {
    /// Store multiple chunks in one transaction.
    pub fn create_chunks(&self, chunks: &[Chunk]) -> IndexResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO chunks (id, collection, chunk_index, content)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )?;

            for chunk in chunks {
                stmt.execute(params![
                    chunk.id,
                    chunk.collection,
                    chunk.chunk_index,
                    chunk.content,
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Get all chunks of a collection, in index order.
    pub fn get_chunks(&self, collection: &str) -> IndexResult<Vec<Chunk>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, collection, chunk_index, content
             FROM chunks WHERE collection = ?1 ORDER BY chunk_index",
        )?;

        let chunks = stmt.query_map(params![collection], |row| {
            Ok(Chunk {
                id: row.get(0)?,
                collection: row.get(1)?,
                chunk_index: row.get(2)?,
                content: row.get(3)?,
            })
        })?;

        chunks.collect::<Result<Vec<_>, _>>().map_err(IndexError::from)
    }

    /// Get chunks of a collection that have no embedding yet.
    pub fn get_unembedded_chunks(&self, collection: &str, limit: usize) -> IndexResult<Vec<Chunk>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT c.id, c.collection, c.chunk_index, c.content
            FROM chunks c
            LEFT JOIN embeddings e ON e.chunk_id = c.id
            WHERE c.collection = ?1 AND e.chunk_id IS NULL
            ORDER BY c.chunk_index
            LIMIT ?2
            "#,
        )?;

        let chunks = stmt.query_map(params![collection, limit as i64], |row| {
            Ok(Chunk {
                id: row.get(0)?,
                collection: row.get(1)?,
                chunk_index: row.get(2)?,
                content: row.get(3)?,
            })
        })?;

        chunks.collect::<Result<Vec<_>, _>>().map_err(IndexError::from)
    }

    /// Delete all chunks of a collection (embeddings cascade).
    pub fn clear_collection(&self, collection: &str) -> IndexResult<i64> {
        let conn = self.conn()?;
        let count = conn.execute("DELETE FROM chunks WHERE collection = ?1", params![collection])?;
        Ok(count as i64)
    }

    /// Count chunks in a collection.
    pub fn count_chunks(&self, collection: &str) -> IndexResult<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_storage() {
        let index = Index::open_in_memory().unwrap();

        let chunks = vec![
            Chunk::new("kb", 0, "First chunk content"),
            Chunk::new("kb", 1, "Second chunk content"),
        ];
        index.create_chunks(&chunks).unwrap();

        let stored = index.get_chunks("kb").unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].content, "First chunk content");
        assert_eq!(stored[1].content, "Second chunk content");

        assert_eq!(index.count_chunks("kb").unwrap(), 2);
        assert_eq!(index.count_chunks("other").unwrap(), 0);
    }

    #[test]
    fn test_clear_collection() {
        let index = Index::open_in_memory().unwrap();

        index
            .create_chunks(&[Chunk::new("kb", 0, "content")])
            .unwrap();
        index
            .create_chunks(&[Chunk::new("keep", 0, "other collection")])
            .unwrap();

        let deleted = index.clear_collection("kb").unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(index.count_chunks("kb").unwrap(), 0);
        assert_eq!(index.count_chunks("keep").unwrap(), 1);
    }

    #[test]
    fn test_unembedded_chunks() {
        let index = Index::open_in_memory().unwrap();

        let chunk1 = Chunk::new("kb", 0, "Embedded chunk");
        let chunk2 = Chunk::new("kb", 1, "Unembedded chunk");
        index.create_chunks(&[chunk1.clone(), chunk2.clone()]).unwrap();

        index
            .store_embedding(&chunk1.id, &[1.0, 0.0], "test-model")
            .unwrap();

        let unembedded = index.get_unembedded_chunks("kb", 10).unwrap();
        assert_eq!(unembedded.len(), 1);
        assert_eq!(unembedded[0].id, chunk2.id);
    }
}
