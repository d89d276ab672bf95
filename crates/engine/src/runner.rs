//! Sequential analysis pipeline.
//!
//! Steps are strictly ordered and each consumes the prior step's typed
//! output. The first failure aborts the remaining steps; a report is only
//! assembled once all steps have succeeded, so no partial result can escape.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use cvlift_types::{AnalysisError, AnalysisInput, AnalysisReport, AnalysisStage};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::backend::EnhancerBackend;

/// Cooperative cancellation flag shared between the UI and a running
/// pipeline. Checked before each step; once set, the run terminates with
/// [`AnalysisError::Cancelled`] instead of issuing further requests.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Drives the extract → optimize → skill-gaps sequence over a backend.
#[derive(Debug, Clone)]
pub struct AnalysisRunner<B> {
    backend: B,
}

impl<B: EnhancerBackend> AnalysisRunner<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run the full pipeline for one input.
    ///
    /// `jd_text` may be empty; it is forwarded to the skill-gap step, where
    /// the backend uses it to compute a match score. `progress` receives the
    /// stage about to start and may be dropped by the receiver at any time.
    pub async fn run(
        &self,
        input: AnalysisInput,
        jd_text: &str,
        cancel: &CancelFlag,
        progress: Option<&UnboundedSender<AnalysisStage>>,
    ) -> Result<AnalysisReport, AnalysisError> {
        ensure_active(cancel)?;

        let cv_text = match &input {
            AnalysisInput::File(upload) => {
                notify(progress, AnalysisStage::Extract);
                let extracted = self.backend.extract(upload).await.map_err(AnalysisError::Extraction)?;
                debug!(file_type = %extracted.file_type, words = extracted.word_count, "extraction complete");
                extracted.cv_text
            }
            AnalysisInput::Text(text) => text.clone(),
        };

        ensure_active(cancel)?;
        notify(progress, AnalysisStage::Optimize);
        let optimized = self
            .backend
            .optimize(&cv_text)
            .await
            .map_err(AnalysisError::Optimization)?;

        ensure_active(cancel)?;
        notify(progress, AnalysisStage::SkillGaps);
        let gaps = self
            .backend
            .skill_gaps(&cv_text, jd_text)
            .await
            .map_err(AnalysisError::SkillGaps)?;

        info!(
            original = optimized.original_cv_score,
            optimized = optimized.optimized_cv_score,
            gaps = gaps.skill_gaps.len(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            original_score: optimized.original_cv_score,
            optimized_score: optimized.optimized_cv_score,
            optimized_cv_text: optimized.optimized_cv_text,
            skill_gaps: gaps.skill_gaps,
            improvements: optimized.improvements,
            ats_keywords: optimized.ats_keywords,
            match_score: gaps.match_score,
            completed_at: Utc::now(),
        })
    }
}

fn ensure_active(cancel: &CancelFlag) -> Result<(), AnalysisError> {
    if cancel.is_cancelled() {
        return Err(AnalysisError::Cancelled);
    }
    Ok(())
}

fn notify(progress: Option<&UnboundedSender<AnalysisStage>>, stage: AnalysisStage) {
    if let Some(sender) = progress {
        // The receiver may already be gone (e.g., headless mode); that is fine.
        let _ = sender.send(stage);
    }
}
