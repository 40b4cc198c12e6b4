//! Reflow CLI - binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The binary bridges [`reflow_tui`] (the model, rendering and input) and the
//! host side of the effect loop, providing RAII-based terminal management
//! with guaranteed cleanup.
//!
//! ```text
//! main() -> App::new(settings) -> TerminalSession::new() -> run_app()
//!                 |                                             |
//!                 v                                             v
//!           Effects<AppEffect>  ------------------------>  Runtime::execute
//! ```
//!
//! # Event Loop
//!
//! A fixed frame cadence (`FRAMES_PER_SECOND`):
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`reflow_tui::InputPump`])
//! 3. Drain messages fed back by the runtime (timer ticks)
//! 4. Feed `Msg::Frame`
//! 5. Execute each update's effects
//! 6. Render frame
//! 7. Stop once the runtime saw `AppEffect::Quit`

mod runtime;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, File, OpenOptions},
    io::{Stdout, stdout},
    iter,
    path::PathBuf,
    sync::Mutex,
};
use tokio::time::{self, MissedTickBehavior};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use reflow_config::{ReflowConfig, Settings};
use reflow_tui::{App, InputPump, Msg, draw, frame_duration, handle_events, palette};

use crate::runtime::Runtime;

fn init_tracing(filter: &str) -> Vec<String> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, warnings) = open_reflow_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in &warnings {
            tracing::warn!("{warning}");
        }
        return Vec::new();
    }

    // No log file: stay silent rather than write over the TUI.
    tracing_subscriber::registry().with(env_filter).init();
    warnings
}

fn open_reflow_log_file() -> (Option<(PathBuf, File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in reflow_log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn reflow_log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.reflow/logs/reflow.log
    if let Some(config_path) = ReflowConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("reflow.log"));
    }

    // Fallback: ./.reflow/logs/reflow.log
    candidates.push(PathBuf::from(".reflow").join("logs").join("reflow.log"));

    candidates
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Enables raw mode and the alternate screen; on drop both are restored so
/// the terminal stays usable after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, config_error) = match ReflowConfig::load() {
        Ok(config) => (config, None),
        Err(err) => (None, Some(err)),
    };
    let settings = config.unwrap_or_default().settings();

    let log_warnings = init_tracing(&settings.log_filter);
    if let Some(err) = config_error {
        tracing::warn!(path = %err.path().display(), "{err}; using defaults");
    }
    tracing::info!(?settings, "starting");

    let (app, effects) = App::new(&settings);
    let mut runtime = Runtime::new();
    runtime.execute(effects);

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, app, &mut runtime, &settings).await
    };
    runtime.shutdown();

    for warning in log_warnings {
        eprintln!("{warning}");
    }
    result
}

async fn run_app<B>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: &mut Runtime,
    settings: &Settings,
) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let palette = palette(settings.high_contrast);
    let mut input = InputPump::new();
    let mut frames = time::interval(frame_duration());
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        let msgs = match handle_events(&mut input) {
            Ok(msgs) => msgs,
            Err(e) => break Err(e),
        };

        let fed_back = runtime.drain();
        for msg in msgs.into_iter().chain(fed_back).chain(iter::once(Msg::Frame)) {
            let (next, effects) = app.update(msg);
            app = next;
            runtime.execute(effects);
        }

        if let Err(e) = terminal.draw(|frame| draw(frame, &app, &palette)) {
            break Err(e.into());
        }

        if runtime.quit_requested() {
            break Ok(());
        }
    };

    input.shutdown().await;
    result
}
