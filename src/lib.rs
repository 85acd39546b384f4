//! Star Strike - a single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, waves, session state)
//! - `game`: Screen state machine and frame driver
//! - `renderer`: Render commands and sinks
//! - `audio`: Sound effect sink
//! - `settings`: Runtime preferences

pub mod audio;
pub mod game;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use audio::{AudioManager, AudioSink, NullAudio, SoundEffect};
pub use game::{Game, Screen};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels, top-left origin, y grows downward)
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    /// Gap between the ship's bottom edge and the bottom of the playfield
    pub const PLAYER_BOTTOM_MARGIN: f32 = 20.0;
    /// Minimum time between two shots (milliseconds)
    pub const SHOOT_COOLDOWN_MS: f64 = 300.0;

    /// Bullets
    pub const BULLET_SPEED: f32 = 7.0;
    pub const BULLET_WIDTH: f32 = 3.0;
    pub const BULLET_HEIGHT: f32 = 15.0;
    pub const ENEMY_BULLET_SPEED: f32 = 4.0;

    /// Enemies
    pub const ENEMY_WIDTH: f32 = 40.0;
    pub const ENEMY_HEIGHT: f32 = 40.0;
    pub const ENEMY_SPEED: f32 = 2.0;
    /// Chance per enemy per frame of firing (before difficulty scaling)
    pub const ENEMY_FIRE_RATE: f64 = 0.005;

    /// Wave grid layout
    pub const WAVE_SPACING: f32 = 60.0;
    pub const WAVE_TOP: f32 = 50.0;
    pub const WAVE_MAX_ROWS: u32 = 5;
    pub const WAVE_MAX_COLS: u32 = 10;

    /// Session
    pub const STARTING_LIVES: u8 = 3;
    /// Points per enemy, multiplied by the current level
    pub const SCORE_PER_LEVEL: u64 = 10;
}

/// Linear difficulty factor shared by enemy speed and fire rate
#[inline]
pub fn difficulty(level: u32) -> f32 {
    1.0 + level as f32 * 0.1
}
