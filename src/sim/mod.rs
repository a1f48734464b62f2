//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, velocities in pixels per tick
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - Time only through `TickInput::now_ms`
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod rect;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{HitSide, ball_rect_side, reflect_off_side};
pub use level::generate_level;
pub use rect::Rect;
pub use snapshot::{BallView, BrickView, Hud, PaddleView, PowerUpView, RenderSnapshot};
pub use state::{
    Ball, Brick, BrickHit, GameEvent, GamePhase, GameState, Paddle, PowerUp, PowerUpKind, Rgb,
    BRICK_PALETTE, MAX_PENDING_EVENTS,
};
pub use tick::{TickInput, apply_powerup, launch_stuck_balls, resolve_collisions, tick};
