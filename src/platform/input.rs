//! Terminal key mapping
//!
//! Terminals deliver key presses (and auto-repeats) but no releases, so a
//! move key keeps its direction held for a short window of ticks after each
//! press. Everything else is a one-shot consumed by the next tick.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::sim::TickInput;

/// What a key means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Left,
    Right,
    Pause,
    Launch,
    Restart,
    Advance,
    Quit,
}

/// Map a key press to a game action
pub fn map_key(key: &KeyEvent) -> Option<KeyAction> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(KeyAction::Quit);
    }
    match key.code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(KeyAction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(KeyAction::Right),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(KeyAction::Pause),
        KeyCode::Char(' ') | KeyCode::Up => Some(KeyAction::Launch),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(KeyAction::Restart),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(KeyAction::Advance),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(KeyAction::Quit),
        _ => None,
    }
}

/// Accumulates key presses between ticks
#[derive(Debug, Clone)]
pub struct InputState {
    hold_ticks: u32,
    left_ticks: u32,
    right_ticks: u32,
    pause: bool,
    launch: bool,
    restart: bool,
    advance: bool,
}

impl InputState {
    pub fn new(hold_ticks: u32) -> Self {
        Self {
            hold_ticks,
            left_ticks: 0,
            right_ticks: 0,
            pause: false,
            launch: false,
            restart: false,
            advance: false,
        }
    }

    /// Record a press. `Quit` is handled by the caller and ignored here.
    pub fn press(&mut self, action: KeyAction) {
        match action {
            KeyAction::Left => {
                self.left_ticks = self.hold_ticks;
                self.right_ticks = 0;
            }
            KeyAction::Right => {
                self.right_ticks = self.hold_ticks;
                self.left_ticks = 0;
            }
            // Two presses in one frame cancel out
            KeyAction::Pause => self.pause = !self.pause,
            KeyAction::Launch => self.launch = true,
            KeyAction::Restart => self.restart = true,
            KeyAction::Advance => self.advance = true,
            KeyAction::Quit => {}
        }
    }

    /// Signals for the next tick; one-shots are consumed, holds decay
    pub fn next_tick(&mut self, now_ms: u64) -> TickInput {
        let input = TickInput {
            left: self.left_ticks > 0,
            right: self.right_ticks > 0,
            pause: std::mem::take(&mut self.pause),
            restart: std::mem::take(&mut self.restart),
            advance: std::mem::take(&mut self.advance),
            launch: std::mem::take(&mut self.launch),
            now_ms,
        };
        self.left_ticks = self.left_ticks.saturating_sub(1);
        self.right_ticks = self.right_ticks.saturating_sub(1);
        input
    }
}
