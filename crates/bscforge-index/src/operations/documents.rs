//! Document provenance operations.

use crate::database::Index;
use crate::error::{IndexError, IndexResult};
use bscforge_core::{Document, SourceFormat};
use chrono::{DateTime, Utc};
use rusqlite::params;

impl Index {
    /// Record an ingested source document.
    pub fn create_document(&self, doc: &Document) -> IndexResult<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO documents (id, path, format, content_hash, ingested_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                doc.id,
                doc.path,
                doc.format.as_str(),
                doc.content_hash,
                doc.ingested_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// List all recorded documents, most recent first.
    pub fn list_documents(&self) -> IndexResult<Vec<Document>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, path, format, content_hash, ingested_at
             FROM documents ORDER BY ingested_at DESC",
        )?;

        let docs = stmt.query_map([], |row| {
            let format_str: String = row.get(2)?;
            let ingested_str: String = row.get(4)?;
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                format_str,
                row.get::<_, String>(3)?,
                ingested_str,
            ))
        })?;

        let mut results = Vec::new();
        for row in docs {
            let (id, path, format_str, content_hash, ingested_str) = row?;
            let format = SourceFormat::from_str(&format_str)
                .ok_or_else(|| IndexError::Other(format!("Unknown format: {}", format_str)))?;
            let ingested_at = DateTime::parse_from_rfc3339(&ingested_str)
                .map_err(|e| IndexError::Other(e.to_string()))?
                .with_timezone(&Utc);
            results.push(Document {
                id,
                path,
                format,
                content_hash,
                ingested_at,
            });
        }

        Ok(results)
    }

    /// Delete all document records.
    pub fn clear_documents(&self) -> IndexResult<i64> {
        let conn = self.conn()?;
        let count = conn.execute("DELETE FROM documents", [])?;
        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_roundtrip() {
        let index = Index::open_in_memory().unwrap();

        let doc = Document::new("/docs/quic_v1.pdf", SourceFormat::Pdf, "abc123");
        index.create_document(&doc).unwrap();

        let docs = index.list_documents().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].path, "/docs/quic_v1.pdf");
        assert_eq!(docs[0].format, SourceFormat::Pdf);

        let deleted = index.clear_documents().unwrap();
        assert_eq!(deleted, 1);
        assert!(index.list_documents().unwrap().is_empty());
    }
}
