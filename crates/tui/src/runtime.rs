//! Runtime: unified event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode,
//!   bracketed paste).
//! - Drive a single event loop over input, animation ticks, stage progress,
//!   and completed analysis runs.
//! - Route keys to `App`, translate returned `Effect`s into commands, and
//!   execute them.
//! - Render via `ui::draw` only when `App` marks itself dirty.
//!
//! Ticking is adaptive: a fast interval (100 ms) only while a run is
//! animating the throbber, a long interval when idle.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use cvlift_engine::{AnalysisRunner, HttpBackend};
use cvlift_types::{AnalysisError, Effect, Msg, RunOutcome};
use futures_util::{StreamExt, stream::FuturesUnordered};
use ratatui::{Terminal, prelude::*};
use tokio::task::JoinHandle;
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::warn;

use crate::app::{App, SharedCtx, StageEventReceiver};
use crate::{cmd, ui};

/// Spawn a dedicated task that blocks on terminal input and forwards
/// `crossterm` events over a channel.
///
/// Keeping `poll()` and `read()` together avoids lost or delayed events in
/// some terminals; the blocking behavior is isolated to this task.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    tokio::spawn(async move {
        let sixteen_ms = Duration::from_millis(16);
        loop {
            if event::poll(sixteen_ms).unwrap_or(false) {
                match event::read() {
                    Ok(event) => {
                        if let Err(e) = sender.send(event).await {
                            warn!("failed to send event: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("failed to read event: {}", e);
                        break;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableBracketedPaste)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App) -> Result<()> {
    terminal.draw(|frame| ui::draw(frame, app))?;
    Ok(())
}

/// Entry point for the TUI runtime: sets up the terminal, runs the async
/// event loop, and performs cleanup on exit.
pub async fn run_app(runner: Arc<AnalysisRunner<HttpBackend>>) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let mut app = App::new(SharedCtx::new(runner));
    let mut terminal = setup_terminal()?;

    let mut pending_runs: FuturesUnordered<JoinHandle<RunOutcome>> = FuturesUnordered::new();
    let mut stage_events: Option<StageEventReceiver> = None;
    let mut effects: Vec<Effect> = Vec::new();

    // Fast while the throbber animates, very slow when idle.
    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app)?;
    app.dirty = false;

    // Track the last known terminal size to synthesize Resize messages when
    // a terminal fails to emit them reliably.
    let mut last_size: Option<(u16, u16)> = crossterm::terminal::size().ok();

    loop {
        let needs_animation = app.run.executing;
        let target_interval = if needs_animation { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        tokio::select! {
            maybe_event = input_receiver.recv() => {
                match maybe_event {
                    Some(Event::Key(key))
                        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) =>
                    {
                        break;
                    }
                    Some(Event::Key(key)) => effects.extend(app.handle_key(key)),
                    Some(Event::Paste(text)) => app.handle_paste(&text),
                    Some(Event::Resize(width, height)) => {
                        effects.extend(app.update(&Msg::Resize(width, height)));
                    }
                    Some(_) => {}
                    // Input channel closed; shut down cleanly.
                    None => break,
                }
            }

            _ = ticker.tick() => {
                effects.extend(app.update(&Msg::Tick));
            }

            Some(joined) = pending_runs.next(), if !pending_runs.is_empty() => {
                let outcome = joined.unwrap_or_else(|error| RunOutcome {
                    request_id: app.run.request_counter,
                    result: Err(AnalysisError::Rejected(format!("analysis task failed: {error}"))),
                });
                effects.extend(app.update(&Msg::RunCompleted(Box::new(outcome))));
            }

            maybe_stage = async {
                match stage_events.as_mut() {
                    Some(events) => events.receiver.recv().await.map(|stage| (events.request_id, stage)),
                    None => None,
                }
            }, if stage_events.is_some() => {
                match maybe_stage {
                    Some((request_id, stage)) => {
                        effects.extend(app.update(&Msg::StageStarted { request_id, stage }));
                    }
                    None => stage_events = None,
                }
            }

            _ = signal::ctrl_c() => break,
        }

        if !effects.is_empty() {
            // Move effects out so newly produced ones wait for the next pass.
            let batch: Vec<Effect> = effects.drain(..).collect();
            let commands = cmd::from_effects(&mut app, batch);
            cmd::run_cmds(&mut app, commands, &mut pending_runs);
        }
        if let Some(receiver) = app.take_pending_stage_events() {
            stage_events = Some(receiver);
        }

        if let Ok((width, height)) = crossterm::terminal::size()
            && last_size != Some((width, height))
        {
            last_size = Some((width, height));
            let _ = app.update(&Msg::Resize(width, height));
        }

        if app.should_quit {
            break;
        }
        if app.dirty {
            render(&mut terminal, &mut app)?;
            app.dirty = false;
        }
    }

    cleanup_terminal(&mut terminal)?;
    Ok(())
}
