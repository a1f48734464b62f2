//! Procedural brick layouts
//!
//! Density and durability scale with the level number. All rolls come from
//! the session RNG, so a seed fixes the layout sequence.

use rand::Rng;

use super::state::{BRICK_PALETTE, Brick, GameState};
use crate::consts::*;

/// Rows of bricks for a level (grows by one per level, capped)
pub fn rows_for_level(level: u32) -> u32 {
    (3 + level).min(BRICK_MAX_ROWS)
}

/// Columns that fit across the playfield
pub fn columns() -> u32 {
    (SCREEN_WIDTH / (BRICK_WIDTH + BRICK_GAP)).floor() as u32
}

/// Hit count for a newly placed brick
///
/// Level 3+ rolls 30% for two hits; level 5+ then independently rolls 10%
/// for three hits, which overrides the first roll when both succeed.
pub fn roll_hits(level: u32, rng: &mut impl Rng) -> u32 {
    let mut hits = 1;
    if level >= 3 && rng.random::<f64>() < 0.3 {
        hits = 2;
    }
    if level >= 5 && rng.random::<f64>() < 0.1 {
        hits = 3;
    }
    hits
}

/// Replace the session's bricks with a fresh layout for `state.level`
pub fn generate_level(state: &mut GameState) {
    let level = state.level;
    let rows = rows_for_level(level);
    let cols = columns();

    state.bricks.clear();
    for row in 0..rows {
        for col in 0..cols {
            if state.rng.random::<f64>() >= BRICK_PLACE_CHANCE {
                continue;
            }
            let x = BRICK_ORIGIN_X + col as f32 * (BRICK_WIDTH + BRICK_GAP);
            let y = BRICK_ORIGIN_Y + row as f32 * (BRICK_HEIGHT + BRICK_GAP);
            let hits = roll_hits(level, &mut state.rng);
            let color = BRICK_PALETTE[((row + level) as usize) % BRICK_PALETTE.len()];
            state.bricks.push(Brick::new(x, y, color, hits));
        }
    }

    log::info!(
        "Level {}: {}x{} grid, {} bricks placed",
        level,
        rows,
        cols,
        state.bricks.len()
    );
}
