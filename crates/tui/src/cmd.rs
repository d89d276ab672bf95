//! Command execution layer.
//!
//! Translates high-level application effects (`Effect`) into imperative
//! commands (`Cmd`) and executes them: clipboard writes and spawning the
//! background analysis run. State updates stay pure in `App`; this module is
//! the boundary where side effects happen.

use std::path::PathBuf;
use std::sync::Arc;

use cvlift_engine::{CancelFlag, resolve_input};
use cvlift_types::{AnalysisError, Effect, RunOutcome};
use futures_util::stream::FuturesUnordered;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::app::{App, StageEventReceiver};

/// Everything a spawned run needs, captured at submit time so later edits to
/// the editor cannot leak into an in-flight run.
#[derive(Debug)]
pub struct RunSpec {
    pub request_id: u64,
    pub file: Option<PathBuf>,
    pub text: String,
    pub jd: String,
    pub cancel: CancelFlag,
}

/// Side-effectful commands executed outside of pure state updates.
pub enum Cmd {
    /// Write text into the system clipboard.
    ClipboardSet(String),
    /// Spawn the analysis pipeline for the captured input.
    StartAnalysis(Box<RunSpec>),
}

/// Convert application [`Effect`]s into [`Cmd`]s, applying state transitions
/// that need no I/O (navigation, cancellation, the input-missing guard)
/// directly.
pub fn from_effects(app: &mut App, effects: Vec<Effect>) -> Vec<Cmd> {
    let mut commands = Vec::new();
    for effect in effects {
        match effect {
            Effect::SwitchTo(route) => app.switch_to(route),
            Effect::CancelRequested => app.cancel_run(),
            Effect::CopyToClipboardRequested(text) => commands.push(Cmd::ClipboardSet(text)),
            Effect::RunRequested => {
                if app.run.executing {
                    continue;
                }
                let file_raw = app.editor.file_path.text().trim().to_string();
                let text = app.editor.cv_text.text();
                if file_raw.is_empty() && text.trim().is_empty() {
                    // Detected locally; no run is spawned and nothing goes out.
                    app.error = Some(AnalysisError::InputMissing.to_string());
                    continue;
                }
                let (request_id, cancel) = app.begin_run();
                commands.push(Cmd::StartAnalysis(Box::new(RunSpec {
                    request_id,
                    file: (!file_raw.is_empty()).then(|| PathBuf::from(file_raw)),
                    text,
                    jd: app.editor.jd_text.text(),
                    cancel,
                })));
            }
        }
    }
    commands
}

/// Execute commands, pushing spawned runs into the runtime's pending set.
pub fn run_cmds(app: &mut App, commands: Vec<Cmd>, pending: &mut FuturesUnordered<JoinHandle<RunOutcome>>) {
    for command in commands {
        match command {
            Cmd::ClipboardSet(text) => clipboard_set(&text),
            Cmd::StartAnalysis(spec) => {
                let runner = Arc::clone(&app.ctx.runner);
                let (progress_tx, progress_rx) = mpsc::unbounded_channel();
                app.pending_stage_events = Some(StageEventReceiver {
                    request_id: spec.request_id,
                    receiver: progress_rx,
                });
                pending.push(tokio::spawn(async move {
                    let RunSpec {
                        request_id,
                        file,
                        text,
                        jd,
                        cancel,
                    } = *spec;
                    let result = match resolve_input(file.as_deref(), &text) {
                        Err(error) => Err(error),
                        Ok(input) => runner.run(input, &jd, &cancel, Some(&progress_tx)).await,
                    };
                    RunOutcome { request_id, result }
                }));
            }
        }
    }
}

fn clipboard_set(text: &str) {
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(error) = clipboard.set_text(text.to_string()) {
                warn!(%error, "failed to write clipboard");
            }
        }
        Err(error) => warn!(%error, "clipboard unavailable"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SharedCtx;
    use cvlift_api::EnhancerClient;
    use cvlift_engine::{AnalysisRunner, HttpBackend};

    fn test_app() -> App {
        let client = temp_env::with_vars(
            [("CVLIFT_API_BASE", Some("http://localhost:8000")), ("CVLIFT_API_TOKEN", Some("test"))],
            || EnhancerClient::new_from_env().expect("build client"),
        );
        let runner = Arc::new(AnalysisRunner::new(HttpBackend::new(client)));
        App::new(SharedCtx::new(runner))
    }

    #[test]
    fn run_request_without_input_sets_error_and_spawns_nothing() {
        let mut app = test_app();
        let commands = from_effects(&mut app, vec![Effect::RunRequested]);

        assert!(commands.is_empty());
        assert!(!app.run.executing);
        assert!(app.error.as_deref().unwrap_or("").contains("paste the CV text"));
    }

    #[test]
    fn run_request_with_text_produces_a_start_command() {
        let mut app = test_app();
        app.editor.cv_text.insert_str("Experienced developer...");
        let commands = from_effects(&mut app, vec![Effect::RunRequested]);

        assert_eq!(commands.len(), 1);
        assert!(app.run.executing);
        match &commands[0] {
            Cmd::StartAnalysis(spec) => {
                assert_eq!(spec.request_id, app.run.request_counter);
                assert!(spec.file.is_none());
                assert_eq!(spec.text, "Experienced developer...");
            }
            Cmd::ClipboardSet(_) => panic!("unexpected command"),
        }
    }

    #[test]
    fn file_path_is_captured_when_present() {
        let mut app = test_app();
        app.editor.file_path.insert_str("  /tmp/cv.pdf  ");
        app.editor.cv_text.insert_str("pasted text is superseded");
        let commands = from_effects(&mut app, vec![Effect::RunRequested]);

        match &commands[0] {
            Cmd::StartAnalysis(spec) => assert_eq!(spec.file.as_deref(), Some(std::path::Path::new("/tmp/cv.pdf"))),
            Cmd::ClipboardSet(_) => panic!("unexpected command"),
        }
    }

    #[test]
    fn second_run_request_is_ignored_while_executing() {
        let mut app = test_app();
        app.editor.cv_text.insert_str("text");
        let first = from_effects(&mut app, vec![Effect::RunRequested]);
        assert_eq!(first.len(), 1);

        let second = from_effects(&mut app, vec![Effect::RunRequested]);
        assert!(second.is_empty());
    }
}
