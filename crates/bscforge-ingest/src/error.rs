//! Error types for the ingestion pipeline and upload handling.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Errors that can occur during ingestion, retrieval, and upload handling.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Knowledge base error: {0}")]
    Index(#[from] bscforge_index::IndexError),

    #[error("API error: {0}")]
    Api(#[from] bscforge_nvidia::ApiError),

    #[error("{0}")]
    Process(#[from] bscforge_process::ProcessError),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Parse error for {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Unsupported upload type: {0}. Supported: PDF, PNG, JPG, JPEG, BMP, TIFF, TXT, SCALA")]
    UnsupportedUpload(String),

    #[error("File size ({size} bytes) exceeds maximum allowed size ({max} bytes)")]
    FileTooLarge { size: u64, max: u64 },
}
