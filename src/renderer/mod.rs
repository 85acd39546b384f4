//! Rendering interface
//!
//! The simulation never draws. After each step the host asks the session for
//! `RenderCommand`s and hands them to a `RenderSink`. A sink that has no
//! sprite for a kind falls back to a solid rectangle in the kind's color.

pub mod batch;
pub mod shapes;
pub mod vertex;

pub use batch::QuadBatch;
pub use vertex::Vertex;

use rand::Rng;

use crate::consts::{GAME_HEIGHT, GAME_WIDTH};
use crate::sim::Rect;

/// Stars scattered over the fallback background
pub const STAR_COUNT: usize = 100;

/// What to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    Player,
    Enemy,
    Bullet,
    EnemyBullet,
    Background,
}

impl SpriteKind {
    pub const ALL: [SpriteKind; 5] = [
        SpriteKind::Player,
        SpriteKind::Enemy,
        SpriteKind::Bullet,
        SpriteKind::EnemyBullet,
        SpriteKind::Background,
    ];

    /// Asset file stem (`assets/<name>.svg`)
    pub fn asset_name(&self) -> &'static str {
        match self {
            SpriteKind::Player => "player",
            SpriteKind::Enemy => "enemy",
            SpriteKind::Bullet => "bullet",
            SpriteKind::EnemyBullet => "enemyBullet",
            SpriteKind::Background => "background",
        }
    }

    /// Solid color used when no sprite is available (linear RGBA)
    pub fn fallback_color(&self) -> [f32; 4] {
        match self {
            SpriteKind::Player | SpriteKind::Bullet => vertex::colors::FRIENDLY,
            SpriteKind::Enemy | SpriteKind::EnemyBullet => vertex::colors::HOSTILE,
            SpriteKind::Background => vertex::colors::BACKGROUND,
        }
    }

    /// Same fallback color as a CSS color string, for 2D canvas hosts
    pub fn fallback_css(&self) -> &'static str {
        match self {
            SpriteKind::Player | SpriteKind::Bullet => "#5ff",
            SpriteKind::Enemy | SpriteKind::EnemyBullet => "#f55",
            SpriteKind::Background => "black",
        }
    }
}

/// One draw request in playfield coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCommand {
    pub kind: SpriteKind,
    pub rect: Rect,
}

/// Random star squares (1 to 3 px) for a sink drawing the background
/// without its sprite. Redrawn every frame, so the field twinkles.
pub fn starfield<R: Rng + ?Sized>(rng: &mut R) -> Vec<Rect> {
    (0..STAR_COUNT)
        .map(|_| {
            let size = rng.random_range(1.0..3.0);
            Rect::new(
                rng.random_range(0.0..GAME_WIDTH),
                rng.random_range(0.0..GAME_HEIGHT),
                size,
                size,
            )
        })
        .collect()
}

/// Receives draw requests
///
/// Drawing is fire-and-forget: a sink that cannot draw (no context, lost
/// surface) must swallow the request. The simulation runs the same whether
/// or not a frame is shown.
pub trait RenderSink {
    fn draw(&mut self, command: &RenderCommand);

    /// Called once before the commands of a frame
    fn begin_frame(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_names_are_unique() {
        let mut names: Vec<_> = SpriteKind::ALL.iter().map(|k| k.asset_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SpriteKind::ALL.len());
    }

    #[test]
    fn test_fallback_palette() {
        assert_eq!(SpriteKind::Player.fallback_color(), SpriteKind::Bullet.fallback_color());
        assert_eq!(SpriteKind::Enemy.fallback_color(), SpriteKind::EnemyBullet.fallback_color());
        assert_ne!(SpriteKind::Player.fallback_color(), SpriteKind::Enemy.fallback_color());
        assert_eq!(SpriteKind::Background.fallback_css(), "black");
    }

    #[test]
    fn test_starfield_covers_playfield() {
        use rand::SeedableRng;

        let mut rng = rand_pcg::Pcg32::seed_from_u64(9);
        let stars = starfield(&mut rng);
        assert_eq!(stars.len(), STAR_COUNT);
        for star in &stars {
            assert!(star.x() >= 0.0 && star.x() < GAME_WIDTH);
            assert!(star.y() >= 0.0 && star.y() < GAME_HEIGHT);
            assert!(star.width() >= 1.0 && star.width() < 3.0);
            assert_eq!(star.width(), star.height());
        }

        // A new frame scatters them differently
        assert_ne!(starfield(&mut rng), stars);
    }
}
