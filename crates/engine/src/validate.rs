//! Local input resolution, performed before any network call.

use std::path::Path;

use cvlift_types::{AnalysisError, AnalysisInput};
use cvlift_util::read_upload;

/// Resolve the authoritative input for a run.
///
/// A file path wins over pasted text when both are present; the extraction
/// step's output then replaces the text. With neither supplied this returns
/// [`AnalysisError::InputMissing`] without touching the network. Upload
/// validation failures (unsupported type, oversize, unreadable) map to
/// [`AnalysisError::Rejected`].
pub fn resolve_input(file: Option<&Path>, text: &str) -> Result<AnalysisInput, AnalysisError> {
    if let Some(path) = file {
        let upload = read_upload(path).map_err(|error| AnalysisError::Rejected(error.to_string()))?;
        return Ok(AnalysisInput::File(upload));
    }
    if text.trim().is_empty() {
        return Err(AnalysisError::InputMissing);
    }
    Ok(AnalysisInput::Text(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn neither_file_nor_text_is_input_missing() {
        assert_eq!(resolve_input(None, ""), Err(AnalysisError::InputMissing));
        assert_eq!(resolve_input(None, "   \n\t"), Err(AnalysisError::InputMissing));
    }

    #[test]
    fn text_alone_resolves_to_text_input() {
        let input = resolve_input(None, "Experienced developer...").expect("text input");
        assert_eq!(input, AnalysisInput::Text("Experienced developer...".into()));
    }

    #[test]
    fn file_wins_over_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cv.txt");
        fs::write(&path, "file contents").expect("write");

        let input = resolve_input(Some(&path), "pasted text").expect("file input");
        match input {
            AnalysisInput::File(upload) => assert_eq!(upload.bytes, b"file contents"),
            AnalysisInput::Text(_) => panic!("file should take precedence"),
        }
    }

    #[test]
    fn bad_upload_is_rejected_locally() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cv.odt");
        fs::write(&path, "data").expect("write");

        let err = resolve_input(Some(&path), "").expect_err("unsupported type");
        assert!(matches!(err, AnalysisError::Rejected(_)));
    }
}
