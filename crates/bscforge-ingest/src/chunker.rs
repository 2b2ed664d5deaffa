//! Recursive-separator text chunking for RAG retrieval.
//!
//! Splits text on the highest-priority separator that still occurs in it,
//! recursing into oversized pieces with the remaining separators, then
//! merges pieces into chunks of a bounded target length with a bounded
//! overlap between neighbors.

use bscforge_config::ChunkingConfig;

/// Configuration for chunking.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Target size of each chunk in characters.
    pub chunk_size: usize,
    /// Number of characters carried over between neighboring chunks.
    pub chunk_overlap: usize,
    /// Split boundaries, tried in order.
    pub separators: Vec<String>,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self::from_chunking_config(&ChunkingConfig::default())
    }
}

impl ChunkConfig {
    /// Create config from the configured chunking settings.
    pub fn from_chunking_config(config: &ChunkingConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            separators: config.separators.clone(),
        }
    }
}

/// Text chunker.
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    /// Create a new chunker with the given configuration.
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// Split text into chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return vec![];
        }

        if trimmed.chars().count() <= self.config.chunk_size {
            return vec![trimmed.to_string()];
        }

        let pieces = self.split_recursive(trimmed, &self.config.separators);
        self.merge_pieces(pieces)
    }

    /// Split text into pieces no larger than the chunk size, preferring
    /// the earliest separator that occurs in the text.
    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        if text.chars().count() <= self.config.chunk_size {
            return vec![text.to_string()];
        }

        // Find the first separator present in this text
        let sep_index = separators
            .iter()
            .position(|sep| !sep.is_empty() && text.contains(sep.as_str()));

        let Some(sep_index) = sep_index else {
            // No separator applies; fall back to a character split
            return self.split_by_chars(text);
        };

        let sep = &separators[sep_index];
        let remaining = &separators[sep_index + 1..];

        let mut pieces = Vec::new();
        for part in text.split_inclusive(sep.as_str()) {
            if part.chars().count() <= self.config.chunk_size {
                pieces.push(part.to_string());
            } else {
                pieces.extend(self.split_recursive(part, remaining));
            }
        }

        pieces
    }

    /// Merge pieces into chunks near the target size, carrying the overlap
    /// tail of each emitted chunk into the next.
    fn merge_pieces(&self, pieces: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for piece in pieces {
            let current_len = current.chars().count();
            let piece_len = piece.chars().count();

            if current_len > 0 && current_len + piece_len > self.config.chunk_size {
                let chunk = current.trim().to_string();
                if !chunk.is_empty() {
                    chunks.push(chunk);
                }

                // Start the next chunk with the overlap tail
                current = if self.config.chunk_overlap > 0 {
                    let chars: Vec<char> = current.chars().collect();
                    let skip = chars.len().saturating_sub(self.config.chunk_overlap);
                    chars[skip..].iter().collect()
                } else {
                    String::new()
                };
            }

            current.push_str(&piece);
        }

        let last = current.trim();
        if !last.is_empty() {
            chunks.push(last.to_string());
        }

        chunks
    }

    /// Force split by character limit, for text with no usable separators.
    fn split_by_chars(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut result = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = std::cmp::min(start + self.config.chunk_size, chars.len());
            result.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            // Step forward keeping the overlap
            start = end.saturating_sub(self.config.chunk_overlap).max(start + 1);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(size: usize, overlap: usize) -> Chunker {
        Chunker::new(ChunkConfig {
            chunk_size: size,
            chunk_overlap: overlap,
            separators: vec![
                "\n\n".to_string(),
                "\n".to_string(),
                ";".to_string(),
                ".".to_string(),
                " ".to_string(),
            ],
        })
    }

    #[test]
    fn test_small_text_single_chunk() {
        let chunks = chunker(1000, 200).split("This is a small piece of text.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], "This is a small piece of text.");
    }

    #[test]
    fn test_empty_text() {
        assert!(chunker(1000, 200).split("").is_empty());
        assert!(chunker(1000, 200).split("   ").is_empty());
    }

    #[test]
    fn test_large_text_multiple_chunks() {
        let text = "This is sentence one. This is sentence two. This is sentence three. \
                    This is sentence four. This is sentence five. This is sentence six. \
                    This is sentence seven. This is sentence eight. This is sentence nine.";

        let chunks = chunker(100, 20).split(text);

        assert!(chunks.len() > 1, "Should create multiple chunks, got {}", chunks.len());
        for chunk in &chunks {
            assert!(!chunk.is_empty());
            // Target size plus at most the carried overlap
            assert!(chunk.chars().count() <= 100 + 20, "chunk too large: {}", chunk.len());
        }
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let text = format!("{}\n\n{}", "a".repeat(60), "b".repeat(60));
        let chunks = chunker(80, 0).split(&text);

        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].starts_with('a'));
        assert!(chunks[1].starts_with('b'));
    }

    #[test]
    fn test_overlap_carries_between_chunks() {
        let text = format!("{} {}", "a".repeat(50), "b".repeat(50));
        let chunks = chunker(60, 10).split(&text);

        assert_eq!(chunks.len(), 2);
        // The tail of the first chunk reappears at the start of the second
        let tail: String = chunks[0].chars().rev().take(5).collect::<String>().chars().rev().collect();
        assert!(chunks[1].starts_with(&tail));
    }

    #[test]
    fn test_unbroken_text_falls_back_to_char_split() {
        let text = "x".repeat(250);
        let chunks = chunker(100, 10).split(&text);

        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100 + 10);
        }
    }

    #[test]
    fn test_utf8_text() {
        let text = "Hello ─── World! This has unicode: 日本語 and more ─ content here. ".repeat(5);
        let chunks = chunker(50, 10).split(&text);

        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(!chunk.is_empty());
        }
    }
}
