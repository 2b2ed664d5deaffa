//! Upload dispatch: extract text from an uploaded draft file.

use crate::error::{IngestError, IngestResult};
use crate::extract;
use bscforge_core::UploadKind;
use bscforge_process::ocr_image;
use std::path::Path;
use tracing::info;

/// Extract the text of an uploaded file.
///
/// The size cap is enforced on file metadata before the file is opened or
/// any extraction strategy runs; unsupported types are likewise rejected
/// up front. Dispatch is a closed match over [`UploadKind`]: PDF text
/// extraction, image OCR, or a verbatim source read.
///
/// `declared_mime` is the type declared by the uploader, when known; the
/// file name decides otherwise.
pub fn extract_upload(
    path: &Path,
    declared_mime: Option<&str>,
    max_bytes: u64,
) -> IngestResult<String> {
    let metadata = std::fs::metadata(path)
        .map_err(|_| IngestError::FileNotFound(path.to_path_buf()))?;

    let size = metadata.len();
    if size > max_bytes {
        return Err(IngestError::FileTooLarge {
            size,
            max: max_bytes,
        });
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let kind = match declared_mime {
        Some(mime) => UploadKind::from_mime(mime, file_name),
        None => path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(UploadKind::from_extension),
    };

    let Some(kind) = kind else {
        let described = declared_mime
            .map(str::to_string)
            .unwrap_or_else(|| file_name.to_string());
        return Err(IngestError::UnsupportedUpload(described));
    };

    info!("Processing {} upload: {}", kind, file_name);

    match kind {
        UploadKind::Pdf => extract::extract_pdf(path),
        UploadKind::Image => {
            let result = ocr_image(path)?;
            Ok(result.text)
        }
        UploadKind::Source => {
            let content = std::fs::read_to_string(path)?;
            Ok(content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CAP: u64 = 1024;

    #[test]
    fn test_oversized_upload_rejected_before_extraction() {
        let dir = tempdir().unwrap();
        // A "PDF" of garbage bytes: if extraction ran, it would fail with a
        // parse error; the size check must win first.
        let path = dir.path().join("big.pdf");
        std::fs::write(&path, vec![0u8; (CAP + 1) as usize]).unwrap();

        let err = extract_upload(&path, Some("application/pdf"), CAP).unwrap_err();
        match err {
            IngestError::FileTooLarge { size, max } => {
                assert_eq!(size, CAP + 1);
                assert_eq!(max, CAP);
            }
            other => panic!("expected FileTooLarge, got {}", other),
        }
    }

    #[test]
    fn test_unsupported_mime_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("archive.zip");
        std::fs::write(&path, b"PK\x03\x04").unwrap();

        let err = extract_upload(&path, Some("application/zip"), CAP).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedUpload(_)));
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, b"binary").unwrap();

        let err = extract_upload(&path, None, CAP).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedUpload(_)));
    }

    #[test]
    fn test_source_upload_read_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("draft.txt");
        std::fs::write(&path, "Title: TLS Handshake\nAgents: Client, Server").unwrap();

        let text = extract_upload(&path, Some("text/plain"), CAP).unwrap();
        assert_eq!(text, "Title: TLS Handshake\nAgents: Client, Server");
    }

    #[test]
    fn test_scala_upload_with_octet_stream_mime() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Handshake.scala");
        std::fs::write(&path, "object BSC_modelling_Handshake extends App {}").unwrap();

        let text = extract_upload(&path, Some("application/octet-stream"), CAP).unwrap();
        assert!(text.contains("BSC_modelling_Handshake"));
    }

    #[test]
    fn test_missing_upload() {
        let err = extract_upload(Path::new("/nonexistent/x.pdf"), None, CAP).unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound(_)));
    }
}
