//! Brick Breaker - a paddle-and-ball arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state)
//! - `platform`: Clock, input mapping and event pump
//! - `ui`: Terminal rendering of simulation snapshots
//! - `settings`: Runtime configuration
//! - `highscores`: In-memory leaderboard

pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod ui;

pub use highscores::HighScores;
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Default simulation rate; velocities are expressed in pixels per tick
    pub const TICK_RATE_HZ: u32 = 60;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    /// Gap between the paddle bottom and the screen bottom
    pub const PADDLE_BOTTOM_MARGIN: f32 = 10.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    pub const PADDLE_MIN_WIDTH: f32 = 50.0;
    pub const PADDLE_MAX_WIDTH: f32 = 150.0;
    pub const PADDLE_WIDTH_STEP: f32 = 20.0;
    /// Max horizontal speed imparted by an edge hit
    pub const PADDLE_DEFLECTION: f32 = 5.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_SPEED: f32 = 4.0;

    /// Brick grid layout
    pub const BRICK_WIDTH: f32 = 75.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_GAP: f32 = 5.0;
    pub const BRICK_ORIGIN_X: f32 = 5.0;
    pub const BRICK_ORIGIN_Y: f32 = 50.0;
    pub const BRICK_MAX_ROWS: u32 = 8;
    pub const BRICK_PLACE_CHANCE: f64 = 0.8;
    pub const POINTS_PER_HIT: u64 = 10;

    /// Power-ups
    pub const POWERUP_SIZE: f32 = 20.0;
    pub const POWERUP_SPEED: f32 = 3.0;
    pub const POWERUP_DROP_CHANCE: f64 = 0.2;
    pub const STICKY_DURATION_MS: u64 = 5000;
    pub const FAST_FACTOR: f32 = 1.5;
    pub const SLOW_FACTOR: f32 = 0.75;

    pub const INITIAL_LIVES: u32 = 3;
}
