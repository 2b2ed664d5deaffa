//! Knowledge-base build pipeline.
//!
//! Scans a flat directory of source documents, extracts and concatenates
//! their text, chunks it, and stores the chunks under the fixed collection
//! name. Rebuilding replaces the collection: existing chunks, embeddings,
//! and document records are cleared first, so re-running never accumulates
//! duplicates.

use crate::chunker::Chunker;
use crate::error::IngestResult;
use crate::extract;
use bscforge_core::{Chunk, Document, SourceFormat};
use bscforge_index::Index;
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Extracted text of a docs directory, with per-file provenance.
#[derive(Debug)]
pub struct SourceText {
    /// One record per successfully extracted file.
    pub documents: Vec<Document>,
    /// All extracted text, concatenated in directory order.
    pub text: String,
}

impl SourceText {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Extract and concatenate all supported files in a flat docs directory.
///
/// Unsupported files are skipped; extraction failures are logged and the
/// remaining files still contribute.
pub fn collect_source_text(docs_dir: &Path) -> IngestResult<SourceText> {
    let mut documents = Vec::new();
    let mut text = String::new();

    let mut entries: Vec<_> = WalkDir::new(docs_dir)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .collect();
    entries.sort_by_key(|e| e.path().to_path_buf());

    for entry in entries {
        let path = entry.path();

        // Skip hidden files
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false)
        {
            continue;
        }

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(SourceFormat::from_extension);

        let Some(format) = format else {
            debug!("Skipping unsupported file: {:?}", path);
            continue;
        };

        info!("Extracting text from {:?}", path);
        match extract::extract_source(path, format) {
            Ok(content) => {
                let hash = hash_content(content.as_bytes());
                documents.push(Document::new(path.to_string_lossy(), format, hash));
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(&content);
            }
            Err(e) => {
                warn!("Failed to extract {:?}: {}", path, e);
            }
        }
    }

    Ok(SourceText { documents, text })
}

/// Build the named collection from a docs directory: extract, chunk, and
/// store. Returns the stored chunks, ready for embedding.
///
/// An empty docs directory is a no-op: nothing is cleared, nothing is
/// written, and no chunks are returned.
pub fn build_collection(
    index: &Index,
    chunker: &Chunker,
    collection: &str,
    docs_dir: &Path,
) -> IngestResult<Vec<Chunk>> {
    let source = collect_source_text(docs_dir)?;

    if source.is_empty() {
        info!("No documents found in {:?}; knowledge base unchanged", docs_dir);
        return Ok(vec![]);
    }

    let pieces = chunker.split(&source.text);
    let chunks: Vec<Chunk> = pieces
        .into_iter()
        .enumerate()
        .map(|(i, content)| Chunk::new(collection, i as i32, content))
        .collect();

    info!(
        "Rebuilding collection '{}': {} documents, {} chunks",
        collection,
        source.documents.len(),
        chunks.len()
    );

    // Replace the previous build
    index.clear_collection(collection)?;
    index.clear_documents()?;

    for doc in &source.documents {
        index.create_document(doc)?;
    }
    index.create_chunks(&chunks)?;

    Ok(chunks)
}

/// SHA256 hash of file content, hex-encoded.
fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
