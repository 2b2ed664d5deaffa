//! bscforge Process - OCR for uploaded images.
//!
//! Image text extraction relies on the Tesseract CLI being installed on
//! the system.

mod error;
mod ocr;

pub use error::{ProcessError, ProcessResult};
pub use ocr::{ocr_image, OcrResult};

/// Check if required external tools are available.
pub fn check_dependencies() -> Vec<(&'static str, bool)> {
    vec![("tesseract", which::which("tesseract").is_ok())]
}
