//! Aggregate statistics over the knowledge base.

use crate::database::Index;
use crate::error::IndexResult;
use rusqlite::params;

/// Summary counts for the status display.
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    pub total_documents: i64,
    pub total_chunks: i64,
    pub embedded_chunks: i64,
}

impl Index {
    /// Gather summary statistics for a collection.
    pub fn get_stats(&self, collection: &str) -> IndexResult<IndexStats> {
        let conn = self.conn()?;

        let total_documents: i64 =
            conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;

        let total_chunks: i64 = conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )?;

        let embedded_chunks: i64 = conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM embeddings e
            JOIN chunks c ON c.id = e.chunk_id
            WHERE c.collection = ?1
            "#,
            params![collection],
            |row| row.get(0),
        )?;

        Ok(IndexStats {
            total_documents,
            total_chunks,
            embedded_chunks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bscforge_core::{Chunk, Document, SourceFormat};

    #[test]
    fn test_stats() {
        let index = Index::open_in_memory().unwrap();

        let doc = Document::new("/docs/a.txt", SourceFormat::Text, "hash");
        index.create_document(&doc).unwrap();

        let chunks: Vec<Chunk> = (0..2).map(|i| Chunk::new("kb", i, format!("c{}", i))).collect();
        index.create_chunks(&chunks).unwrap();
        index.store_embedding(&chunks[0].id, &[1.0], "m").unwrap();

        let stats = index.get_stats("kb").unwrap();
        assert_eq!(stats.total_documents, 1);
        assert_eq!(stats.total_chunks, 2);
        assert_eq!(stats.embedded_chunks, 1);
    }
}
