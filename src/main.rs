//! Brick Breaker entry point
//!
//! Sets up logging and the terminal, then runs the frame loop:
//! poll input -> tick -> drain events -> render.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use crossterm::{
    cursor, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};

use brick_breaker::platform::{
    Clock, Event, EventHandler, InputState, KeyAction, SystemClock, map_key,
};
use brick_breaker::sim::{GameEvent, GameState, RenderSnapshot, tick};
use brick_breaker::ui::{self, UiOptions};
use brick_breaker::{HighScores, Settings};

/// Environment variable naming the log file
const LOG_ENV: &str = "BRICK_BREAKER_LOG";

fn main() -> Result<()> {
    init_logging()?;
    log::info!("Brick Breaker starting...");

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("Game initialized with seed: {}", seed);

    // Put the terminal back on panic too
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode().context("failed to enable raw mode")?;
    let result = with_restore(
        || {
            let mut terminal = open_terminal()?;
            run(&mut terminal, &settings, seed)
        },
        restore_terminal,
    );

    if let Err(e) = &result {
        log::error!("Exited with error: {:#}", e);
    }
    result
}

fn open_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

/// Undo raw mode and the alternate screen; safe to call more than once
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

/// Run `body`, then `restore` whether it succeeded or not
fn with_restore<T>(body: impl FnOnce() -> Result<T>, restore: impl FnOnce()) -> Result<T> {
    let result = body();
    restore();
    result
}

/// Logs go to a file; the terminal belongs to the renderer
fn init_logging() -> Result<()> {
    let path = std::env::var_os(LOG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("brick-breaker.log"));
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run<B: Backend>(terminal: &mut Terminal<B>, settings: &Settings, seed: u64) -> Result<()> {
    let clock = SystemClock::new();
    let mut state = GameState::new(seed);
    let mut input = InputState::new(settings.key_hold_ticks);
    let mut high_scores = HighScores::new();
    let events = EventHandler::new(settings.tick_interval());

    loop {
        let options = UiOptions {
            show_help: settings.show_help,
            best_score: high_scores
                .top_score()
                .filter(|_| settings.show_high_scores),
        };
        let snapshot = RenderSnapshot::capture(&state);
        terminal.draw(|frame| ui::render(frame, &snapshot, &options))?;

        match events.next()? {
            Event::Tick => {
                let now_ms = clock.now_ms();
                tick(&mut state, &input.next_tick(now_ms));
                for event in state.drain_events() {
                    log_event(&event);
                    if let GameEvent::GameOver { score, level } = event {
                        high_scores.add_score(score, level, now_ms);
                    }
                }
            }
            Event::Key(key) => match map_key(&key) {
                Some(KeyAction::Quit) => break,
                Some(action) => input.press(action),
                None => {}
            },
        }
    }

    log::info!("Quit at level {} with score {}", state.level, state.score);
    Ok(())
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::BrickDamaged { .. } | GameEvent::BrickDestroyed { .. } => {
            log::trace!("{:?}", event)
        }
        GameEvent::PowerUpSpawned { kind } => log::debug!("Power-up dropped: {}", kind.as_str()),
        GameEvent::BallsLaunched { count } => log::debug!("Launched {} stuck ball(s)", count),
        GameEvent::LevelStarted { level } => log::info!("Level {} started", level),
        GameEvent::Paused => log::info!("Paused"),
        GameEvent::Resumed => log::info!("Resumed"),
        // Already logged by the simulation
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_restore_runs_when_setup_fails() {
        let restored = Cell::new(false);
        let result: Result<()> = with_restore(
            || Err(anyhow::anyhow!("no terminal")),
            || restored.set(true),
        );
        assert!(result.is_err());
        assert!(restored.get());
    }

    #[test]
    fn test_restore_runs_after_success() {
        let restored = Cell::new(false);
        let result = with_restore(|| Ok(7), || restored.set(true));
        assert_eq!(result.unwrap(), 7);
        assert!(restored.get());
    }
}
