//! Error taxonomy for the analysis workflow.
//!
//! Every failure is terminal for the run that produced it: the UI shows one
//! human-readable line and returns to a resubmittable state. Variants carry
//! plain strings rather than transport errors so outcomes stay `Clone` and
//! can travel through the message channel.

use thiserror::Error;

/// A failure reported by (or on the way to) the enhancement backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Non-2xx response. `detail` holds a short body snippet, already redacted.
    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },
    /// Transport failure: connection refused, DNS, timeout. The layer cannot
    /// distinguish these further.
    #[error("network error: {0}")]
    Network(String),
    /// 2xx response whose body did not match the expected payload shape.
    #[error("malformed response: {0}")]
    Payload(String),
}

/// Terminal outcome of an analysis run that did not produce a report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Neither a file nor pasted text was supplied. Detected locally; no
    /// network request is issued.
    #[error("upload a CV file or paste the CV text before analyzing")]
    InputMissing,
    /// The upload failed local validation (unsupported type or oversize).
    #[error("{0}")]
    Rejected(String),
    /// The extraction step failed.
    #[error("text extraction failed: {0}")]
    Extraction(BackendError),
    /// The optimization step failed.
    #[error("CV optimization failed: {0}")]
    Optimization(BackendError),
    /// The skill-gap step failed.
    #[error("skill gap analysis failed: {0}")]
    SkillGaps(BackendError),
    /// The run was cancelled before completing.
    #[error("analysis cancelled")]
    Cancelled,
}

impl AnalysisError {
    /// True when the failure happened before any network call.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::InputMissing | Self::Rejected(_) | Self::Cancelled)
    }
}
