//! OCR processing using Tesseract.

use crate::error::{ProcessError, ProcessResult};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Result of OCR processing.
#[derive(Debug, Clone)]
pub struct OcrResult {
    /// The extracted text.
    pub text: String,
}

/// Perform OCR on an image file.
///
/// A missing Tesseract installation and an image with no detectable text
/// are reported as distinct errors, never as empty output.
pub fn ocr_image(image_path: &Path) -> ProcessResult<OcrResult> {
    if !image_path.exists() {
        return Err(ProcessError::FileNotFound(image_path.to_path_buf()));
    }

    if which::which("tesseract").is_err() {
        return Err(ProcessError::ToolNotFound {
            tool: "tesseract".to_string(),
        });
    }

    debug!("Running OCR on {:?}", image_path);

    let output = Command::new("tesseract")
        .arg(image_path)
        .arg("stdout")
        .args(["--oem", "3"]) // LSTM + legacy engine
        .args(["--psm", "1"]) // Automatic page segmentation with OSD
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        // Tesseract sometimes outputs warnings to stderr but still works
        if !output.stdout.is_empty() {
            debug!("Tesseract warning: {}", stderr);
        } else {
            return Err(ProcessError::OcrError(stderr.to_string()));
        }
    }

    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();

    if text.is_empty() {
        return Err(ProcessError::NoTextDetected);
    }

    Ok(OcrResult { text })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_distinct_error() {
        let err = ocr_image(Path::new("/nonexistent/image.png")).unwrap_err();
        assert!(matches!(err, ProcessError::FileNotFound(_)));
    }

    #[test]
    fn test_tool_check() {
        let _ = which::which("tesseract");
    }
}
