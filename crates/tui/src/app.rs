//! Application state and logic for the CV Lift TUI.
//!
//! The `App` is the single writer of all UI state. Input events and runtime
//! messages flow through [`App::handle_key`] / [`App::update`], which mutate
//! state and report side effects as [`Effect`]s for the imperative shell to
//! execute.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use cvlift_engine::{AnalysisRunner, CancelFlag, HttpBackend};
use cvlift_types::{AnalysisError, AnalysisReport, AnalysisStage, Effect, Msg, Route, RunOutcome};
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::buffer::EditBuffer;

/// Cross-cutting shared context owned by the App.
pub struct SharedCtx {
    /// The analysis pipeline, shared with spawned runs.
    pub runner: Arc<AnalysisRunner<HttpBackend>>,
    /// Global debug flag (from env).
    pub debug_enabled: bool,
}

impl SharedCtx {
    pub fn new(runner: Arc<AnalysisRunner<HttpBackend>>) -> Self {
        let debug_enabled = std::env::var("DEBUG")
            .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
            .unwrap_or(false);
        Self { runner, debug_enabled }
    }
}

/// Which editor field currently receives typed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Path of the CV file to upload.
    FilePath,
    /// Pasted CV text.
    #[default]
    CvText,
    /// Optional job-description text.
    JdText,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Self::FilePath => Self::CvText,
            Self::CvText => Self::JdText,
            Self::JdText => Self::FilePath,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::FilePath => Self::JdText,
            Self::CvText => Self::FilePath,
            Self::JdText => Self::CvText,
        }
    }
}

/// Input view state: the three entry fields and their focus.
pub struct EditorState {
    pub file_path: EditBuffer,
    pub cv_text: EditBuffer,
    pub jd_text: EditBuffer,
    pub focus: Focus,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            file_path: EditBuffer::single_line(),
            cv_text: EditBuffer::multi_line(),
            jd_text: EditBuffer::multi_line(),
            focus: Focus::default(),
        }
    }
}

/// Which results pane receives scroll keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultsFocus {
    #[default]
    OptimizedText,
    SkillGaps,
}

/// Results view state: scroll offsets and gap selection.
#[derive(Default)]
pub struct ResultsState {
    pub cv_scroll: u16,
    pub focus: ResultsFocus,
    pub gap_list: ListState,
}

/// Bookkeeping for the in-flight analysis run, if any.
///
/// `request_counter` is the generation counter: it is bumped when a run
/// starts and again when one is cancelled, so any outcome tagged with a
/// superseded id is discarded on arrival.
#[derive(Debug, Default)]
pub struct RunState {
    pub executing: bool,
    pub stage: Option<AnalysisStage>,
    pub throbber_idx: usize,
    pub request_counter: u64,
    pub cancel: Option<CancelFlag>,
}

/// Stage progress events of a spawned run, tagged with its generation.
pub struct StageEventReceiver {
    pub request_id: u64,
    pub receiver: UnboundedReceiver<AnalysisStage>,
}

/// The main application state.
pub struct App {
    pub route: Route,
    pub ctx: SharedCtx,
    pub editor: EditorState,
    pub results: ResultsState,
    pub run: RunState,
    /// Last fully successful analysis; gates the Results route.
    pub report: Option<AnalysisReport>,
    /// One-line, already-redacted error shown in the editor banner.
    pub error: Option<String>,
    /// Stage receiver handed to the runtime after a run is spawned.
    pub pending_stage_events: Option<StageEventReceiver>,
    pub dirty: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(ctx: SharedCtx) -> Self {
        Self {
            route: Route::Editor,
            ctx,
            editor: EditorState::default(),
            results: ResultsState::default(),
            run: RunState::default(),
            report: None,
            error: None,
            pending_stage_events: None,
            dirty: true,
            should_quit: false,
        }
    }

    /// Apply a runtime message.
    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                if self.run.executing {
                    self.run.throbber_idx = self.run.throbber_idx.wrapping_add(1);
                    self.dirty = true;
                }
            }
            Msg::Resize(_, _) => self.dirty = true,
            Msg::StageStarted { request_id, stage } => {
                if *request_id == self.run.request_counter && self.run.executing {
                    self.run.stage = Some(*stage);
                    self.dirty = true;
                }
            }
            Msg::RunCompleted(outcome) => self.apply_run_outcome(outcome),
        }
        Vec::new()
    }

    /// Route-aware key handling. Returns effects for the shell to execute.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        self.dirty = true;
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('a') => return self.request_run(),
                KeyCode::Char('e') => return vec![Effect::SwitchTo(Route::Editor)],
                KeyCode::Char('r') => return vec![Effect::SwitchTo(Route::Results)],
                KeyCode::Char('y') => return self.copy_optimized(),
                _ => return Vec::new(),
            }
        }
        if key.code == KeyCode::Esc {
            if self.run.executing {
                return vec![Effect::CancelRequested];
            }
            self.error = None;
            return Vec::new();
        }
        match self.route {
            Route::Editor => self.handle_editor_key(key),
            Route::Results => self.handle_results_key(key),
        }
    }

    /// Bracketed paste goes into the focused editor field.
    pub fn handle_paste(&mut self, text: &str) {
        if self.route != Route::Editor {
            return;
        }
        self.dirty = true;
        self.focused_buffer().insert_str(text);
    }

    /// Switch the primary view. The Results route is refused until a report
    /// exists, regardless of how the switch was requested.
    pub fn switch_to(&mut self, route: Route) {
        if route == Route::Results && self.report.is_none() {
            return;
        }
        self.route = route;
        self.dirty = true;
    }

    /// Start bookkeeping for a new run and hand out its generation + flag.
    pub fn begin_run(&mut self) -> (u64, CancelFlag) {
        self.run.request_counter += 1;
        let cancel = CancelFlag::new();
        self.run.cancel = Some(cancel.clone());
        self.run.executing = true;
        self.run.stage = None;
        self.run.throbber_idx = 0;
        self.error = None;
        (self.run.request_counter, cancel)
    }

    /// Cancel the in-flight run and invalidate its generation so a late
    /// completion cannot apply.
    pub fn cancel_run(&mut self) {
        if let Some(cancel) = self.run.cancel.take() {
            cancel.cancel();
        }
        self.run.request_counter += 1;
        self.run.executing = false;
        self.run.stage = None;
        self.dirty = true;
    }

    /// Discard the current report and all held input, returning to an empty
    /// editor.
    pub fn reset_for_new_analysis(&mut self) {
        self.editor.file_path.clear();
        self.editor.cv_text.clear();
        self.editor.jd_text.clear();
        self.editor.focus = Focus::default();
        self.report = None;
        self.error = None;
        self.results = ResultsState::default();
        self.route = Route::Editor;
        self.dirty = true;
    }

    pub fn take_pending_stage_events(&mut self) -> Option<StageEventReceiver> {
        self.pending_stage_events.take()
    }

    pub fn focused_buffer(&mut self) -> &mut EditBuffer {
        match self.editor.focus {
            Focus::FilePath => &mut self.editor.file_path,
            Focus::CvText => &mut self.editor.cv_text,
            Focus::JdText => &mut self.editor.jd_text,
        }
    }

    fn apply_run_outcome(&mut self, outcome: &RunOutcome) {
        // Single-flight guard: a completion from a superseded generation is
        // dropped so it can never overwrite newer state.
        if outcome.request_id != self.run.request_counter {
            return;
        }
        self.run.executing = false;
        self.run.stage = None;
        self.run.cancel = None;
        self.dirty = true;
        match &outcome.result {
            Ok(report) => {
                self.report = Some(report.clone());
                self.error = None;
                self.results = ResultsState::default();
                self.results.gap_list.select(if report.skill_gaps.is_empty() { None } else { Some(0) });
                self.route = Route::Results;
            }
            Err(AnalysisError::Cancelled) => {
                // User-initiated; nothing to report.
            }
            Err(error) => {
                self.error = Some(cvlift_util::redact_sensitive(&error.to_string()));
                self.route = Route::Editor;
            }
        }
    }

    fn request_run(&mut self) -> Vec<Effect> {
        if self.run.executing {
            return Vec::new();
        }
        vec![Effect::RunRequested]
    }

    fn copy_optimized(&mut self) -> Vec<Effect> {
        match &self.report {
            Some(report) => vec![Effect::CopyToClipboardRequested(report.optimized_cv_text.clone())],
            None => Vec::new(),
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Tab => {
                self.editor.focus = self.editor.focus.next();
                Vec::new()
            }
            KeyCode::BackTab => {
                self.editor.focus = self.editor.focus.prev();
                Vec::new()
            }
            KeyCode::Enter if self.editor.focus == Focus::FilePath => self.request_run(),
            KeyCode::Enter => {
                self.focused_buffer().newline();
                Vec::new()
            }
            KeyCode::Char(ch) => {
                self.focused_buffer().insert_char(ch);
                Vec::new()
            }
            KeyCode::Backspace => {
                self.focused_buffer().backspace();
                Vec::new()
            }
            KeyCode::Left => {
                self.focused_buffer().move_left();
                Vec::new()
            }
            KeyCode::Right => {
                self.focused_buffer().move_right();
                Vec::new()
            }
            KeyCode::Up => {
                self.focused_buffer().move_up();
                Vec::new()
            }
            KeyCode::Down => {
                self.focused_buffer().move_down();
                Vec::new()
            }
            KeyCode::Home => {
                self.focused_buffer().move_home();
                Vec::new()
            }
            KeyCode::End => {
                self.focused_buffer().move_end();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let gap_count = self.report.as_ref().map(|r| r.skill_gaps.len()).unwrap_or(0);
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                Vec::new()
            }
            KeyCode::Char('n') => {
                self.reset_for_new_analysis();
                Vec::new()
            }
            KeyCode::Char('c') => self.copy_optimized(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.results.focus = match self.results.focus {
                    ResultsFocus::OptimizedText => ResultsFocus::SkillGaps,
                    ResultsFocus::SkillGaps => ResultsFocus::OptimizedText,
                };
                Vec::new()
            }
            KeyCode::Up => {
                match self.results.focus {
                    ResultsFocus::OptimizedText => self.results.cv_scroll = self.results.cv_scroll.saturating_sub(1),
                    ResultsFocus::SkillGaps => {
                        let selected = self.results.gap_list.selected().unwrap_or(0);
                        self.results.gap_list.select(Some(selected.saturating_sub(1)));
                    }
                }
                Vec::new()
            }
            KeyCode::Down => {
                match self.results.focus {
                    ResultsFocus::OptimizedText => self.results.cv_scroll = self.results.cv_scroll.saturating_add(1),
                    ResultsFocus::SkillGaps => {
                        if gap_count > 0 {
                            let selected = self.results.gap_list.selected().unwrap_or(0);
                            self.results.gap_list.select(Some((selected + 1).min(gap_count - 1)));
                        }
                    }
                }
                Vec::new()
            }
            KeyCode::PageUp => {
                self.results.cv_scroll = self.results.cv_scroll.saturating_sub(10);
                Vec::new()
            }
            KeyCode::PageDown => {
                self.results.cv_scroll = self.results.cv_scroll.saturating_add(10);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}
