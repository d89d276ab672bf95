//! # CV Lift TUI Library
//!
//! Terminal user interface for the CV Lift client. Two views, driven by a
//! single event loop: the input editor (file path, pasted CV text, optional
//! job description) and the results view (score gauges, optimized CV, skill
//! gaps).
//!
//! ## Architecture
//!
//! State lives in `app::App`, the sole writer. Input and runtime events
//! become `Msg`s; state transitions report `Effect`s; the `cmd` module is
//! the imperative shell that executes them (clipboard, spawning analysis
//! runs). Rendering is a pure function of state in `ui`.

mod app;
mod buffer;
mod cmd;
mod runtime;
mod theme;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use cvlift_engine::{AnalysisRunner, HttpBackend};

/// Runs the main TUI application loop.
///
/// Initializes the terminal, drives the event loop until the user quits,
/// and restores the terminal on exit.
///
/// # Errors
///
/// Returns an error for terminal setup failures or event-loop runtime
/// issues; analysis failures are shown in the UI and do not end the loop.
pub async fn run(runner: Arc<AnalysisRunner<HttpBackend>>) -> Result<()> {
    runtime::run_app(runner).await
}
