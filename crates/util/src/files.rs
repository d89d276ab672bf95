//! Upload file loading and local validation.
//!
//! The backend enforces its own extension and size limits; validating here as
//! well means an invalid upload never leaves the machine.

use std::fs;
use std::path::Path;

use cvlift_types::{FileKind, MAX_UPLOAD_BYTES, UploadFile};
use thiserror::Error;
use tracing::debug;

/// Failure to turn a path into an acceptable [`UploadFile`].
#[derive(Debug, Error)]
pub enum FileError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported file type '{path}'; accepted: pdf, doc, docx, txt")]
    UnsupportedType { path: String },
    #[error("'{path}' is {size} bytes; uploads are capped at {limit} bytes")]
    TooLarge { path: String, size: u64, limit: u64 },
}

/// Read and validate a CV file for upload.
///
/// Checks the extension against the accepted set and the on-disk size against
/// [`MAX_UPLOAD_BYTES`] before reading the contents into memory.
pub fn read_upload(path: &Path) -> Result<UploadFile, FileError> {
    let path_str = path.display().to_string();
    let kind = FileKind::from_path(path).ok_or_else(|| FileError::UnsupportedType { path: path_str.clone() })?;

    let metadata = fs::metadata(path).map_err(|source| FileError::Io {
        path: path_str.clone(),
        source,
    })?;
    if metadata.len() > MAX_UPLOAD_BYTES {
        return Err(FileError::TooLarge {
            path: path_str,
            size: metadata.len(),
            limit: MAX_UPLOAD_BYTES,
        });
    }

    let bytes = fs::read(path).map_err(|source| FileError::Io {
        path: path_str.clone(),
        source,
    })?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("cv")
        .to_string();
    debug!(file = %path_str, kind = %kind, size = bytes.len(), "loaded upload");

    Ok(UploadFile { file_name, kind, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn reads_supported_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("resume.txt");
        let mut file = fs::File::create(&path).expect("create file");
        file.write_all(b"Experienced developer...").expect("write");

        let upload = read_upload(&path).expect("read upload");
        assert_eq!(upload.file_name, "resume.txt");
        assert_eq!(upload.kind, FileKind::Txt);
        assert_eq!(upload.bytes, b"Experienced developer...");
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("resume.odt");
        fs::write(&path, b"data").expect("write");

        let err = read_upload(&path).expect_err("should reject odt");
        assert!(matches!(err, FileError::UnsupportedType { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_upload(Path::new("/nonexistent/cv.pdf")).expect_err("missing file");
        assert!(matches!(err, FileError::Io { .. }));
    }
}
