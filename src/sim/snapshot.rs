//! Immutable per-frame view of the session for renderers

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{GamePhase, GameState, PowerUpKind, Rgb};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaddleView {
    pub rect: Rect,
    pub sticky: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickView {
    pub rect: Rect,
    pub color: Rgb,
    pub hits: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub center: Vec2,
    pub radius: f32,
    pub stuck: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpView {
    pub rect: Rect,
    pub color: Rgb,
    pub kind: PowerUpKind,
}

/// HUD scalars and phase flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub playing: bool,
    pub paused: bool,
    pub level_complete: bool,
    pub game_over: bool,
}

/// Everything a frontend needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub paddle: PaddleView,
    /// Active bricks only
    pub bricks: Vec<BrickView>,
    pub balls: Vec<BallView>,
    pub powerups: Vec<PowerUpView>,
    pub hud: Hud,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            paddle: PaddleView {
                rect: state.paddle.rect,
                sticky: state.paddle.sticky,
            },
            bricks: state
                .bricks
                .iter()
                .filter(|b| b.active)
                .map(|b| BrickView {
                    rect: b.rect,
                    color: b.color,
                    hits: b.hits,
                })
                .collect(),
            balls: state
                .balls
                .iter()
                .filter(|b| b.active)
                .map(|b| BallView {
                    center: b.pos,
                    radius: b.radius,
                    stuck: b.is_stuck(),
                })
                .collect(),
            powerups: state
                .powerups
                .iter()
                .filter(|p| p.active)
                .map(|p| PowerUpView {
                    rect: p.rect,
                    color: p.kind.color(),
                    kind: p.kind,
                })
                .collect(),
            hud: Hud {
                score: state.score,
                lives: state.lives,
                level: state.level,
                playing: state.phase == GamePhase::Playing,
                paused: state.phase == GamePhase::Paused,
                level_complete: state.phase == GamePhase::LevelComplete,
                game_over: state.phase == GamePhase::GameOver,
            },
        }
    }

    /// JSON dump for debugging
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
