//! Game state and core simulation types
//!
//! The session (`GameState`) exclusively owns every entity collection.
//! Entities are plain records with their own per-tick update rules and no
//! references back to the session.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{ball_below_field, ball_wall_collision, reflect_off_walls};
use super::level::generate_level;
use super::rect::Rect;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation frozen until the pause toggle is pressed again
    Paused,
    /// Every brick destroyed, waiting for the advance input
    LevelComplete,
    /// Out of lives, waiting for the restart input
    GameOver,
}

/// An RGB color (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
    pub const PURPLE: Rgb = Rgb(128, 0, 128);
    pub const CYAN: Rgb = Rgb(0, 255, 255);
    pub const ORANGE: Rgb = Rgb(255, 165, 0);
}

/// Brick colors, picked by `(row + level) % len`
pub const BRICK_PALETTE: [Rgb; 7] = [
    Rgb::RED,
    Rgb::GREEN,
    Rgb::BLUE,
    Rgb::YELLOW,
    Rgb::PURPLE,
    Rgb::CYAN,
    Rgb::ORANGE,
];

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    /// Horizontal speed in pixels per tick
    pub speed: f32,
    /// Next ball that touches the paddle gets caught
    pub sticky: bool,
    /// Clock time (ms) after which `sticky` lapses
    pub sticky_until_ms: u64,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            rect: Rect::new(
                (SCREEN_WIDTH - PADDLE_WIDTH) / 2.0,
                SCREEN_HEIGHT - PADDLE_HEIGHT - PADDLE_BOTTOM_MARGIN,
                PADDLE_WIDTH,
                PADDLE_HEIGHT,
            ),
            speed: PADDLE_SPEED,
            sticky: false,
            sticky_until_ms: 0,
        }
    }
}

impl Paddle {
    #[inline]
    pub fn width(&self) -> f32 {
        self.rect.w
    }

    /// Resize within `[PADDLE_MIN_WIDTH, PADDLE_MAX_WIDTH]`, keeping the left
    /// edge unless that would push the paddle off screen
    pub fn set_width(&mut self, width: f32) {
        self.rect.w = width.clamp(PADDLE_MIN_WIDTH, PADDLE_MAX_WIDTH);
        self.clamp_to_field(SCREEN_WIDTH);
    }

    /// Point where a resting ball's bottom touches the paddle
    pub fn top_center(&self) -> Vec2 {
        Vec2::new(self.rect.center_x(), self.rect.top())
    }

    /// Move from the held direction inputs and expire the sticky effect
    pub fn update(&mut self, left: bool, right: bool, now_ms: u64, field_width: f32) {
        if left {
            self.rect.x -= self.speed;
        }
        if right {
            self.rect.x += self.speed;
        }
        self.clamp_to_field(field_width);

        if self.sticky && now_ms > self.sticky_until_ms {
            self.sticky = false;
        }
    }

    /// Enable catching for `STICKY_DURATION_MS` from `now_ms`
    pub fn make_sticky(&mut self, now_ms: u64) {
        self.sticky = true;
        self.sticky_until_ms = now_ms + STICKY_DURATION_MS;
    }

    fn clamp_to_field(&mut self, field_width: f32) {
        self.rect.x = self.rect.x.clamp(0.0, (field_width - self.rect.w).max(0.0));
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Center position
    pub pos: Vec2,
    /// Velocity in pixels per tick
    pub vel: Vec2,
    pub radius: f32,
    pub active: bool,
    /// Caught by a sticky paddle; held in place until launched
    pub stuck: bool,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: BALL_RADIUS,
            active: true,
            stuck: false,
        }
    }

    /// A fresh ball heading up at a random diagonal
    pub fn serve(pos: Vec2, rng: &mut impl Rng) -> Self {
        Self::new(pos, Vec2::new(random_serve_dx(rng), -BALL_SPEED))
    }

    /// Bounding square
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.radius * 2.0, self.radius * 2.0)
    }

    /// Whether this ball is waiting on the paddle for a launch
    #[inline]
    pub fn is_stuck(&self) -> bool {
        self.stuck && self.vel.x == 0.0
    }

    /// Integrate one tick, bounce off walls and drop out through the bottom
    pub fn update(&mut self, field_width: f32, field_height: f32) {
        if !self.active || self.stuck {
            return;
        }
        self.pos += self.vel;

        let rect = self.rect();
        let contact = ball_wall_collision(&rect, field_width);
        if contact.any() {
            self.vel = reflect_off_walls(self.vel, contact);
        }

        if ball_below_field(&rect, field_height) {
            self.active = false;
        }
    }

    /// Catch on the paddle top with no horizontal motion
    pub fn stick_to(&mut self, paddle: &Paddle) {
        self.stuck = true;
        self.vel = Vec2::new(0.0, -BALL_SPEED);
        self.follow(paddle);
    }

    /// Keep a stuck ball resting on the paddle as it moves
    pub fn follow(&mut self, paddle: &Paddle) {
        let top = paddle.top_center();
        self.pos = Vec2::new(top.x, top.y - self.radius);
    }

    /// Release a stuck ball with the given horizontal speed
    pub fn launch(&mut self, dx: f32) {
        self.stuck = false;
        self.vel.x = dx;
        if self.vel.y >= 0.0 {
            self.vel.y = -BALL_SPEED;
        }
    }
}

/// `±BALL_SPEED` with a fair coin
pub fn random_serve_dx(rng: &mut impl Rng) -> f32 {
    if rng.random_bool(0.5) {
        BALL_SPEED
    } else {
        -BALL_SPEED
    }
}

/// Outcome of a single brick hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickHit {
    Damaged,
    Destroyed,
}

/// A brick entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub color: Rgb,
    /// Hits left before destruction
    pub hits: u32,
    /// Durability at creation; drives scoring
    pub original_hits: u32,
    pub active: bool,
}

impl Brick {
    pub fn new(x: f32, y: f32, color: Rgb, hits: u32) -> Self {
        Self {
            rect: Rect::new(x, y, BRICK_WIDTH, BRICK_HEIGHT),
            color,
            hits,
            original_hits: hits,
            active: true,
        }
    }

    /// Take one hit. Callers must only hit active bricks.
    pub fn hit(&mut self) -> BrickHit {
        debug_assert!(self.active, "hit applied to a destroyed brick");
        self.hits = self.hits.saturating_sub(1);
        if self.hits == 0 {
            self.active = false;
            BrickHit::Destroyed
        } else {
            BrickHit::Damaged
        }
    }

    /// Score awarded for destroying this brick
    pub fn points(&self) -> u64 {
        POINTS_PER_HIT * u64::from(self.original_hits)
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Extend,
    Shrink,
    Multiball,
    Fast,
    Slow,
    Sticky,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::Extend,
        PowerUpKind::Shrink,
        PowerUpKind::Multiball,
        PowerUpKind::Fast,
        PowerUpKind::Slow,
        PowerUpKind::Sticky,
    ];

    /// Uniformly random kind
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn color(&self) -> Rgb {
        match self {
            PowerUpKind::Extend => Rgb::GREEN,
            PowerUpKind::Shrink => Rgb::RED,
            PowerUpKind::Multiball => Rgb::CYAN,
            PowerUpKind::Fast => Rgb::YELLOW,
            PowerUpKind::Slow => Rgb::BLUE,
            PowerUpKind::Sticky => Rgb::PURPLE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Extend => "extend",
            PowerUpKind::Shrink => "shrink",
            PowerUpKind::Multiball => "multiball",
            PowerUpKind::Fast => "fast",
            PowerUpKind::Slow => "slow",
            PowerUpKind::Sticky => "sticky",
        }
    }
}

/// A falling power-up capsule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub rect: Rect,
    pub kind: PowerUpKind,
    /// Fall speed in pixels per tick
    pub speed: f32,
    pub active: bool,
}

impl PowerUp {
    /// Capsule centered on `center`
    pub fn spawn_at(center: Vec2, kind: PowerUpKind) -> Self {
        Self {
            rect: Rect::from_center(center, POWERUP_SIZE, POWERUP_SIZE),
            kind,
            speed: POWERUP_SPEED,
            active: true,
        }
    }

    pub fn update(&mut self, field_height: f32) {
        self.rect.y += self.speed;
        if self.rect.top() > field_height {
            self.active = false;
        }
    }
}

/// Undrained events kept before the oldest are discarded
pub const MAX_PENDING_EVENTS: usize = 1024;

/// Things that happened during a tick, drained by the frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    BrickDamaged { hits_left: u32 },
    BrickDestroyed { points: u64 },
    PowerUpSpawned { kind: PowerUpKind },
    PowerUpCollected { kind: PowerUpKind },
    BallsLaunched { count: usize },
    LifeLost { lives_left: u32 },
    LevelComplete { level: u32 },
    GameOver { score: u64, level: u32 },
    Paused,
    Resumed,
    Restarted,
}

/// The game session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Source of all gameplay randomness
    pub rng: Pcg32,
    /// Current level (1-based)
    pub level: u32,
    pub lives: u32,
    pub score: u64,
    pub phase: GamePhase,
    /// Simulation tick counter (only advances while playing)
    pub time_ticks: u64,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub powerups: Vec<PowerUp>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session at level 1 with the given seed
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level: 1,
            lives: INITIAL_LIVES,
            score: 0,
            phase: GamePhase::Playing,
            time_ticks: 0,
            paddle: Paddle::default(),
            balls: Vec::new(),
            bricks: Vec::new(),
            powerups: Vec::new(),
            events: Vec::new(),
        };
        state.start_session();
        state
    }

    /// Reinitialize to the starting configuration
    ///
    /// The RNG keeps running, so the new layout differs from the last one.
    pub fn reset(&mut self) {
        self.level = 1;
        self.lives = INITIAL_LIVES;
        self.score = 0;
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        self.powerups.clear();
        self.events.clear();
        self.start_session();
        self.push_event(GameEvent::Restarted);
    }

    fn start_session(&mut self) {
        self.paddle = Paddle::default();
        let center = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0);
        self.balls = vec![Ball::serve(center, &mut self.rng)];
        generate_level(self);
        self.push_event(GameEvent::LevelStarted { level: self.level });
    }

    /// Fresh paddle plus a single ball served from its top
    pub fn reset_paddle_and_ball(&mut self) {
        self.paddle = Paddle::default();
        self.balls.clear();
        self.spawn_ball_on_paddle();
    }

    /// Serve a new ball from the paddle top center
    pub fn spawn_ball_on_paddle(&mut self) {
        let top = self.paddle.top_center();
        let pos = Vec2::new(top.x, top.y - BALL_RADIUS);
        let ball = Ball::serve(pos, &mut self.rng);
        self.balls.push(ball);
    }

    /// True when no brick is left standing
    pub fn all_bricks_cleared(&self) -> bool {
        self.bricks.iter().all(|b| !b.active)
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_level_complete(&self) -> bool {
        self.phase == GamePhase::LevelComplete
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Queue an event; the oldest half is dropped once the queue is full
    pub fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.drain(..MAX_PENDING_EVENTS / 2);
            log::debug!("Event queue full, dropped {} oldest", MAX_PENDING_EVENTS / 2);
        }
        self.events.push(event);
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
