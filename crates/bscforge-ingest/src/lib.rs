//! bscforge Ingest - Knowledge-base construction and query-time retrieval.
//!
//! This crate provides:
//! - Text extraction for the supported source formats (PDF, text, Scala)
//! - Recursive-separator chunking for RAG
//! - The knowledge-base build pipeline
//! - Upload dispatch (PDF extraction, image OCR, verbatim source read)
//! - The retriever used at generation time

mod chunker;
mod error;
mod extract;
mod pipeline;
mod retriever;
mod upload;

pub use chunker::{ChunkConfig, Chunker};
pub use error::{IngestError, IngestResult};
pub use extract::extract_source;
pub use pipeline::{build_collection, collect_source_text, SourceText};
pub use retriever::{Retriever, MAX_K, MIN_K};
pub use upload::extract_upload;
