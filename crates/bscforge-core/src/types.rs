//! Core domain types for bscforge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for ingested documents.
pub type DocumentId = String;

/// Unique identifier for chunks.
pub type ChunkId = String;

/// Generate a new unique ID.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Source file format accepted by the knowledge-base pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Pdf,
    Text,
    Scala,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Pdf => "pdf",
            SourceFormat::Text => "text",
            SourceFormat::Scala => "scala",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pdf" => Some(SourceFormat::Pdf),
            "text" => Some(SourceFormat::Text),
            "scala" => Some(SourceFormat::Scala),
            _ => None,
        }
    }

    /// Detect the source format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(SourceFormat::Pdf),
            "txt" => Some(SourceFormat::Text),
            "scala" => Some(SourceFormat::Scala),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of an uploaded draft file, decided from its declared MIME type
/// and file name. The set of supported kinds is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// PDF document, handled by text extraction.
    Pdf,
    /// Raster image, handled by OCR.
    Image,
    /// Plain-text or Scala source, read verbatim.
    Source,
}

impl UploadKind {
    /// Classify an upload from its declared MIME type, falling back to the
    /// file name for `.scala` sources that browsers report as `text/plain`
    /// or `application/octet-stream`. Returns `None` for unsupported types.
    pub fn from_mime(mime: &str, file_name: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(UploadKind::Pdf),
            "image/png" | "image/jpeg" | "image/jpg" | "image/bmp" | "image/tiff" => {
                Some(UploadKind::Image)
            }
            "text/plain" | "application/octet-stream" => {
                let name = file_name.to_lowercase();
                if name.ends_with(".scala") || name.ends_with(".txt") {
                    Some(UploadKind::Source)
                } else {
                    None
                }
            }
            _ => {
                if file_name.to_lowercase().ends_with(".scala") {
                    Some(UploadKind::Source)
                } else {
                    None
                }
            }
        }
    }

    /// Classify an upload from its file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(UploadKind::Pdf),
            "png" | "jpg" | "jpeg" | "bmp" | "tiff" => Some(UploadKind::Image),
            "txt" | "scala" => Some(UploadKind::Source),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadKind::Pdf => "pdf",
            UploadKind::Image => "image",
            UploadKind::Source => "source",
        }
    }
}

impl std::fmt::Display for UploadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A source file ingested into the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub path: String,
    pub format: SourceFormat,
    pub content_hash: String,
    pub ingested_at: DateTime<Utc>,
}

impl Document {
    pub fn new(path: impl Into<String>, format: SourceFormat, content_hash: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            path: path.into(),
            format,
            content_hash: content_hash.into(),
            ingested_at: Utc::now(),
        }
    }
}

/// A chunk of knowledge-base text, member of a named collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub collection: String,
    pub chunk_index: i32,
    pub content: String,
}

impl Chunk {
    pub fn new(collection: impl Into<String>, chunk_index: i32, content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            collection: collection.into(),
            chunk_index,
            content: content.into(),
        }
    }
}

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Number of characters of a user turn shown before abbreviation.
pub const TURN_DISPLAY_LIMIT: usize = 200;

/// One turn of the in-memory conversation history. Lives only for the
/// duration of a single interactive session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Content abbreviated for display. Long user turns are cut at
    /// [`TURN_DISPLAY_LIMIT`] characters; assistant turns are never cut.
    /// The full text stays in `content`.
    pub fn display_content(&self) -> String {
        if self.role == Role::User && self.content.chars().count() > TURN_DISPLAY_LIMIT {
            let shown: String = self.content.chars().take(TURN_DISPLAY_LIMIT).collect();
            format!("{}...", shown)
        } else {
            self.content.clone()
        }
    }
}
