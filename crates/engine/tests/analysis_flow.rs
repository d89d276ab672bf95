//! Pipeline behavior against a mocked backend: call ordering, short-circuit
//! on failure, report merging, cancellation.

use std::sync::Mutex;

use async_trait::async_trait;
use cvlift_engine::{AnalysisRunner, CancelFlag, EnhancerBackend, resolve_input};
use cvlift_types::{
    AnalysisError, AnalysisInput, AnalysisStage, BackendError, ExtractResponse, FileKind, OptimizeResponse,
    Priority, ServiceHealth, SkillGap, SkillGapResponse, UploadFile,
};

/// Records every backend call and can be told to fail a given step.
#[derive(Default)]
struct MockBackend {
    calls: Mutex<Vec<String>>,
    fail_extract: bool,
    fail_optimize: bool,
    fail_skill_gaps: bool,
    cancel_after_optimize: Option<CancelFlag>,
}

impl MockBackend {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn status_error() -> BackendError {
        BackendError::Status {
            status: 500,
            detail: "boom".into(),
        }
    }
}

#[async_trait]
impl EnhancerBackend for MockBackend {
    async fn extract(&self, upload: &UploadFile) -> Result<ExtractResponse, BackendError> {
        self.record(format!("extract:{}", upload.file_name));
        if self.fail_extract {
            return Err(Self::status_error());
        }
        Ok(ExtractResponse {
            cv_text: "EXTRACTED TEXT".into(),
            jd_text: String::new(),
            file_type: format!(".{}", upload.kind.extension()),
            word_count: 2,
        })
    }

    async fn optimize(&self, cv_text: &str) -> Result<OptimizeResponse, BackendError> {
        self.record(format!("optimize:{cv_text}"));
        if self.fail_optimize {
            return Err(Self::status_error());
        }
        if let Some(cancel) = &self.cancel_after_optimize {
            cancel.cancel();
        }
        Ok(OptimizeResponse {
            original_cv_score: 55,
            optimized_cv_score: 78,
            optimized_cv_text: "OPTIMIZED CV".into(),
            improvements: vec!["Quantified achievements".into()],
            ats_keywords: vec!["Rust".into()],
        })
    }

    async fn skill_gaps(&self, cv_text: &str, jd_text: &str) -> Result<SkillGapResponse, BackendError> {
        self.record(format!("skill_gaps:{cv_text}|{jd_text}"));
        if self.fail_skill_gaps {
            return Err(Self::status_error());
        }
        Ok(SkillGapResponse {
            skill_gaps: vec![SkillGap {
                skill: "Kubernetes".into(),
                suggestion: "Add a project demonstrating container orchestration.".into(),
                priority: Priority::High,
            }],
            match_score: if jd_text.is_empty() { None } else { Some(70) },
        })
    }

    async fn health(&self) -> Result<ServiceHealth, BackendError> {
        self.record("health".into());
        Ok(ServiceHealth {
            status: "healthy".into(),
            ai_provider: None,
            timestamp: None,
        })
    }
}

fn upload() -> UploadFile {
    UploadFile {
        file_name: "cv.pdf".into(),
        kind: FileKind::Pdf,
        bytes: vec![1, 2, 3],
    }
}

#[test]
fn missing_input_fails_before_any_backend_call() {
    let backend = MockBackend::default();
    let err = resolve_input(None, "  \n ").expect_err("no input");
    assert_eq!(err, AnalysisError::InputMissing);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn text_input_skips_extraction() {
    let runner = AnalysisRunner::new(MockBackend::default());
    let report = runner
        .run(AnalysisInput::Text("Experienced developer...".into()), "", &CancelFlag::new(), None)
        .await
        .expect("run succeeds");

    let calls = runner.backend().calls();
    assert_eq!(
        calls,
        vec![
            "optimize:Experienced developer...".to_string(),
            "skill_gaps:Experienced developer...|".to_string(),
        ]
    );
    assert_eq!(report.original_score, 55);
    assert_eq!(report.optimized_score, 78);
    assert_eq!(report.delta_label(), "+23");
    assert_eq!(report.skill_gaps.len(), 1);
    assert_eq!(report.skill_gaps[0].skill, "Kubernetes");
}

#[tokio::test]
async fn file_input_extracts_first_and_downstream_steps_use_extracted_text() {
    let runner = AnalysisRunner::new(MockBackend::default());
    runner
        .run(AnalysisInput::File(upload()), "", &CancelFlag::new(), None)
        .await
        .expect("run succeeds");

    assert_eq!(
        runner.backend().calls(),
        vec![
            "extract:cv.pdf".to_string(),
            "optimize:EXTRACTED TEXT".to_string(),
            "skill_gaps:EXTRACTED TEXT|".to_string(),
        ]
    );
}

#[tokio::test]
async fn extraction_failure_aborts_remaining_steps() {
    let runner = AnalysisRunner::new(MockBackend {
        fail_extract: true,
        ..MockBackend::default()
    });
    let err = runner
        .run(AnalysisInput::File(upload()), "", &CancelFlag::new(), None)
        .await
        .expect_err("extraction fails");

    assert!(matches!(err, AnalysisError::Extraction(_)));
    assert_eq!(runner.backend().calls(), vec!["extract:cv.pdf".to_string()]);
}

#[tokio::test]
async fn optimization_failure_skips_skill_gap_call() {
    let runner = AnalysisRunner::new(MockBackend {
        fail_optimize: true,
        ..MockBackend::default()
    });
    let err = runner
        .run(AnalysisInput::Text("text".into()), "", &CancelFlag::new(), None)
        .await
        .expect_err("optimization fails");

    assert!(matches!(err, AnalysisError::Optimization(_)));
    assert_eq!(runner.backend().calls(), vec!["optimize:text".to_string()]);
}

#[tokio::test]
async fn skill_gap_failure_surfaces_after_optimization() {
    let runner = AnalysisRunner::new(MockBackend {
        fail_skill_gaps: true,
        ..MockBackend::default()
    });
    let err = runner
        .run(AnalysisInput::Text("text".into()), "", &CancelFlag::new(), None)
        .await
        .expect_err("skill gap step fails");

    assert!(matches!(err, AnalysisError::SkillGaps(_)));
    assert_eq!(runner.backend().calls().len(), 2);
}

#[tokio::test]
async fn jd_text_is_forwarded_and_scored() {
    let runner = AnalysisRunner::new(MockBackend::default());
    let report = runner
        .run(AnalysisInput::Text("text".into()), "Rust engineer JD", &CancelFlag::new(), None)
        .await
        .expect("run succeeds");

    assert_eq!(report.match_score, Some(70));
    assert!(
        runner
            .backend()
            .calls()
            .contains(&"skill_gaps:text|Rust engineer JD".to_string())
    );
}

#[tokio::test]
async fn cancellation_between_steps_stops_the_pipeline() {
    let cancel = CancelFlag::new();
    let runner = AnalysisRunner::new(MockBackend {
        cancel_after_optimize: Some(cancel.clone()),
        ..MockBackend::default()
    });
    let err = runner
        .run(AnalysisInput::Text("text".into()), "", &cancel, None)
        .await
        .expect_err("cancelled");

    assert_eq!(err, AnalysisError::Cancelled);
    assert_eq!(runner.backend().calls(), vec!["optimize:text".to_string()]);
}

#[tokio::test]
async fn pre_cancelled_run_issues_no_calls() {
    let cancel = CancelFlag::new();
    cancel.cancel();
    let runner = AnalysisRunner::new(MockBackend::default());
    let err = runner
        .run(AnalysisInput::Text("text".into()), "", &cancel, None)
        .await
        .expect_err("cancelled before start");

    assert_eq!(err, AnalysisError::Cancelled);
    assert!(runner.backend().calls().is_empty());
}

#[tokio::test]
async fn progress_reports_each_stage_in_order() {
    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
    let runner = AnalysisRunner::new(MockBackend::default());
    runner
        .run(AnalysisInput::File(upload()), "", &CancelFlag::new(), Some(&sender))
        .await
        .expect("run succeeds");

    let mut stages = Vec::new();
    while let Ok(stage) = receiver.try_recv() {
        stages.push(stage);
    }
    assert_eq!(
        stages,
        vec![AnalysisStage::Extract, AnalysisStage::Optimize, AnalysisStage::SkillGaps]
    );
}
