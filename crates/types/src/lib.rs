//! Shared type definitions for the CV Lift workspace.
//!
//! Everything that crosses a crate boundary lives here: the wire payloads
//! exchanged with the enhancement backend, the aggregated [`AnalysisReport`],
//! the error taxonomy, and the `Msg`/`Effect` vocabulary the TUI runtime uses
//! to route state changes and side effects.

pub mod error;
pub mod report;

use std::fmt;
use std::path::Path;

pub use error::{AnalysisError, BackendError};
pub use report::{
    AnalysisReport, ExtractResponse, OptimizeRequest, OptimizeResponse, Priority, ScoreBand, ServiceHealth, SkillGap,
    SkillGapRequest, SkillGapResponse,
};

/// Maximum accepted upload size in bytes (10 MB, matching the backend cap).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Document formats the extraction endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Doc,
    Docx,
    Txt,
}

impl FileKind {
    /// Infer the kind from a path's extension (case-insensitive).
    /// Returns `None` for anything the backend does not extract.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    /// Canonical lowercase extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Doc => "doc",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }

    /// MIME type declared on the multipart upload part.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Doc => "application/msword",
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Txt => "text/plain",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A CV file loaded from disk and validated for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Original file name, sent as the multipart part's file name.
    pub file_name: String,
    /// Detected document format.
    pub kind: FileKind,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// The single authoritative input of an analysis run.
///
/// When the user supplies both a file and pasted text, the file wins and the
/// extraction step's output replaces the pasted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisInput {
    File(UploadFile),
    Text(String),
}

/// The three sequential backend steps of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Extract,
    Optimize,
    SkillGaps,
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Extract => "extracting text",
            Self::Optimize => "optimizing CV",
            Self::SkillGaps => "analyzing skill gaps",
        };
        f.write_str(label)
    }
}

/// Result of a background analysis run, tagged with its generation.
///
/// The `request_id` is compared against the UI's current generation counter
/// before the outcome is applied; a completion from a superseded run is
/// discarded so stale state can never overwrite newer state.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Generation counter value assigned when the run was started.
    pub request_id: u64,
    /// Aggregated report, or the error that terminated the run.
    pub result: Result<AnalysisReport, AnalysisError>,
}

/// Top-level views the application can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    /// Input view: file picker, CV text area, JD text area.
    #[default]
    Editor,
    /// Results view; only reachable once a report exists.
    Results,
}

/// Messages that update application state.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic UI tick (throbber animation).
    Tick,
    /// Terminal resized.
    Resize(u16, u16),
    /// A pipeline stage started for the given run.
    StageStarted { request_id: u64, stage: AnalysisStage },
    /// Background analysis run completed with an outcome.
    RunCompleted(Box<RunOutcome>),
}

/// Side effects requested by state changes, executed by the imperative shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start an analysis run from the currently held input.
    RunRequested,
    /// Cancel the in-flight run, if any.
    CancelRequested,
    /// Write text into the system clipboard.
    CopyToClipboardRequested(String),
    /// Switch the primary view.
    SwitchTo(Route),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn file_kind_from_path_accepts_known_extensions() {
        assert_eq!(FileKind::from_path(&PathBuf::from("cv.PDF")), Some(FileKind::Pdf));
        assert_eq!(FileKind::from_path(&PathBuf::from("cv.docx")), Some(FileKind::Docx));
        assert_eq!(FileKind::from_path(&PathBuf::from("notes/cv.txt")), Some(FileKind::Txt));
        assert_eq!(FileKind::from_path(&PathBuf::from("cv.odt")), None);
        assert_eq!(FileKind::from_path(&PathBuf::from("cv")), None);
    }

    #[test]
    fn stage_labels_are_user_facing() {
        assert_eq!(AnalysisStage::Extract.to_string(), "extracting text");
        assert_eq!(AnalysisStage::SkillGaps.to_string(), "analyzing skill gaps");
    }
}
