//! Wave generation
//!
//! A wave is a centered grid of enemies whose size and speed grow with the
//! level. Spacing is fixed, so from level 12 the outer columns start past
//! the walls and bounce their way down quickly.

use crate::consts::*;
use crate::difficulty;

use super::entity::Enemy;
use super::state::GameState;

/// Grid layout for one wave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveLayout {
    pub rows: u32,
    pub cols: u32,
    /// Horizontal gap between neighbouring enemies
    pub gap_x: f32,
    /// Vertical distance between row tops
    pub row_pitch: f32,
    /// Top-left corner of the grid
    pub origin_x: f32,
    pub origin_y: f32,
    /// Horizontal speed of every enemy in the wave
    pub enemy_speed: f32,
}

impl WaveLayout {
    /// Compute the layout for a level (1-based)
    pub fn for_level(level: u32) -> Self {
        let rows = (3 + level / 2).min(WAVE_MAX_ROWS);
        let cols = (5 + level / 3).min(WAVE_MAX_COLS);

        let grid_width = cols as f32 * ENEMY_WIDTH + (cols - 1) as f32 * WAVE_SPACING;

        Self {
            rows,
            cols,
            gap_x: WAVE_SPACING,
            row_pitch: ENEMY_HEIGHT + WAVE_SPACING / 2.0,
            origin_x: (GAME_WIDTH - grid_width) / 2.0,
            origin_y: WAVE_TOP,
            enemy_speed: ENEMY_SPEED * difficulty(level),
        }
    }

    pub fn enemy_count(&self) -> usize {
        (self.rows * self.cols) as usize
    }

    /// Build the enemies row by row, left to right
    pub fn spawn(&self) -> Vec<Enemy> {
        let mut enemies = Vec::with_capacity(self.enemy_count());
        for row in 0..self.rows {
            for col in 0..self.cols {
                let x = self.origin_x + col as f32 * (ENEMY_WIDTH + self.gap_x);
                let y = self.origin_y + row as f32 * self.row_pitch;
                enemies.push(Enemy::new(x, y, self.enemy_speed));
            }
        }
        enemies
    }
}

/// Spawn the wave for the state's current level
pub fn generate_wave(state: &mut GameState) {
    let layout = WaveLayout::for_level(state.level);
    log::info!(
        "Level {} wave: {}x{} enemies, speed {:.2}",
        state.level,
        layout.rows,
        layout.cols,
        layout.enemy_speed
    );
    state.enemies.extend(layout.spawn());
}
