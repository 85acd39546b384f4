//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per rendered frame, fixed per-step velocities
//! - Seeded RNG only
//! - Side effects are returned as events, never performed
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod rect;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{first_overlap, overlaps};
pub use entity::{Bullet, BulletKind, Enemy, Entity, EntityMut, Player};
pub use rect::Rect;
pub use state::{GameEvent, GameState, Hud};
pub use tick::{InputEvent, TickInput, tick};
pub use wave::{WaveLayout, generate_wave};
