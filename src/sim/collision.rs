//! Collision detection and response for axis-aligned geometry
//!
//! Balls collide as their bounding squares. Responses are axis reflections,
//! never full vector reflections, so speed magnitudes are preserved exactly.

use glam::Vec2;

use super::rect::Rect;

/// Which face of a rectangle a ball struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSide {
    /// Left or right face: horizontal velocity flips
    Side,
    /// Top or bottom face: vertical velocity flips
    TopBottom,
}

/// Classify a ball/rect contact by the ball's horizontal center
///
/// A center outside the rect's horizontal span means the ball came in from
/// the side; anything else is a top/bottom hit.
pub fn ball_rect_side(ball_center_x: f32, rect: &Rect) -> HitSide {
    if rect.spans_x(ball_center_x) {
        HitSide::TopBottom
    } else {
        HitSide::Side
    }
}

/// Reflect velocity off a face
#[inline]
pub fn reflect_off_side(vel: Vec2, side: HitSide) -> Vec2 {
    match side {
        HitSide::Side => Vec2::new(-vel.x, vel.y),
        HitSide::TopBottom => Vec2::new(vel.x, -vel.y),
    }
}

/// Result of a wall check against the playfield boundary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub left: bool,
    pub right: bool,
    pub top: bool,
}

impl WallContact {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top
    }
}

/// Check a ball's bounding rect against the left, right and top walls
pub fn ball_wall_collision(ball_rect: &Rect, field_width: f32) -> WallContact {
    WallContact {
        left: ball_rect.left() <= 0.0,
        right: ball_rect.right() >= field_width,
        top: ball_rect.top() <= 0.0,
    }
}

/// Apply wall contacts to a velocity
///
/// Signs are forced away from the wall rather than toggled, so a ball that
/// overlaps a wall for several ticks leaves it instead of oscillating.
pub fn reflect_off_walls(vel: Vec2, contact: WallContact) -> Vec2 {
    let mut vel = vel;
    if contact.left {
        vel.x = vel.x.abs();
    } else if contact.right {
        vel.x = -vel.x.abs();
    }
    if contact.top {
        vel.y = vel.y.abs();
    }
    vel
}

/// Check whether a ball has left the playfield through the bottom edge
#[inline]
pub fn ball_below_field(ball_rect: &Rect, field_height: f32) -> bool {
    ball_rect.top() > field_height
}

/// Horizontal speed after a paddle hit, from the impact offset
///
/// Hitting the paddle center sends the ball straight up; hitting an edge
/// gives up to `max_speed` sideways.
pub fn paddle_deflection(ball_center_x: f32, paddle: &Rect, max_speed: f32) -> f32 {
    let half = paddle.w / 2.0;
    if half <= 0.0 {
        return 0.0;
    }
    (ball_center_x - paddle.center_x()) / half * max_speed
}
