//! Text extraction for the supported source formats.

use crate::error::{IngestError, IngestResult};
use bscforge_core::SourceFormat;
use std::path::Path;
use tracing::debug;

/// Extract the raw text of a source file according to its format.
pub fn extract_source(path: &Path, format: SourceFormat) -> IngestResult<String> {
    if !path.exists() {
        return Err(IngestError::FileNotFound(path.to_path_buf()));
    }

    match format {
        SourceFormat::Pdf => extract_pdf(path),
        SourceFormat::Text | SourceFormat::Scala => {
            let content = std::fs::read_to_string(path)?;
            Ok(content)
        }
    }
}

/// Extract text from a PDF file.
pub(crate) fn extract_pdf(path: &Path) -> IngestResult<String> {
    debug!("Extracting text from PDF: {:?}", path);

    let content = pdf_extract::extract_text(path).map_err(|e| IngestError::ParseError {
        path: path.to_path_buf(),
        message: format!("Failed to extract text from PDF: {}", e),
    })?;

    let content = clean_pdf_text(&content);
    debug!("Extracted {} characters from PDF", content.len());

    Ok(content)
}

/// Clean up extracted PDF text.
fn clean_pdf_text(text: &str) -> String {
    text.lines()
        // Remove excessive whitespace
        .map(|line| line.trim())
        // Collapse runs of empty lines
        .fold(Vec::new(), |mut acc, line| {
            let last_was_empty = acc.last().map(|s: &String| s.is_empty()).unwrap_or(false);
            if !(line.is_empty() && last_was_empty) {
                acc.push(line.to_string());
            }
            acc
        })
        .join("\n")
        // Form feed characters mark page breaks
        .replace('\x0C', "\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_clean_pdf_text() {
        let messy = "  Hello  \n\n\n\nWorld  \n\nTest";
        let cleaned = clean_pdf_text(messy);
        assert!(!cleaned.contains("\n\n\n"));
        assert!(cleaned.contains("Hello"));
    }

    #[test]
    fn test_extract_text_file() {
        let mut file = NamedTempFile::with_suffix(".txt").unwrap();
        writeln!(file, "Title: Needham-Schroeder\nAgents: Alice, Bob").unwrap();

        let text = extract_source(file.path(), SourceFormat::Text).unwrap();
        assert!(text.contains("Needham-Schroeder"));
    }

    #[test]
    fn test_extract_scala_file() {
        let mut file = NamedTempFile::with_suffix(".scala").unwrap();
        writeln!(file, "object BSC_modelling_Demo extends App {{}}").unwrap();

        let text = extract_source(file.path(), SourceFormat::Scala).unwrap();
        assert!(text.contains("BSC_modelling_Demo"));
    }

    #[test]
    fn test_missing_file() {
        let err = extract_source(Path::new("/nonexistent/draft.txt"), SourceFormat::Text).unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound(_)));
    }
}
