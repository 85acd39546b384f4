//! Entity models: the player ship, bullets and enemies
//!
//! Each model owns its footprint and a per-frame `advance` rule. Velocities
//! are fixed per step; nothing here is scaled by elapsed time.

use crate::consts::*;
use crate::renderer::{RenderCommand, SpriteKind};

use super::rect::Rect;

/// The player's ship
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub rect: Rect,
    /// Horizontal velocity per step: one of -PLAYER_SPEED, 0, +PLAYER_SPEED
    pub speed_x: f32,
    /// Timestamp (ms) of the last accepted shot
    pub last_shot_ms: Option<f64>,
    pub shoot_cooldown_ms: f64,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Ship centered at the bottom of the playfield
    pub fn new() -> Self {
        Self {
            rect: Rect::new(
                GAME_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
                GAME_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN,
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
            ),
            speed_x: 0.0,
            last_shot_ms: None,
            shoot_cooldown_ms: SHOOT_COOLDOWN_MS,
        }
    }

    /// Apply velocity, then clamp into the playfield
    pub fn advance(&mut self) {
        let max_x = GAME_WIDTH - self.rect.width();
        self.rect.pos.x = (self.rect.pos.x + self.speed_x).clamp(0.0, max_x);
    }

    pub fn move_left(&mut self) {
        self.speed_x = -PLAYER_SPEED;
    }

    pub fn move_right(&mut self) {
        self.speed_x = PLAYER_SPEED;
    }

    pub fn stop_moving(&mut self) {
        self.speed_x = 0.0;
    }

    /// Left key released: stop only if still heading left
    pub fn release_left(&mut self) {
        if self.speed_x < 0.0 {
            self.stop_moving();
        }
    }

    /// Right key released: stop only if still heading right
    pub fn release_right(&mut self) {
        if self.speed_x > 0.0 {
            self.stop_moving();
        }
    }

    /// Fire a bullet from the top-center of the ship
    ///
    /// Returns `None` while the cooldown is running. Presses during the
    /// cooldown are dropped, not queued.
    pub fn shoot(&mut self, now_ms: f64) -> Option<Bullet> {
        if let Some(last) = self.last_shot_ms {
            if now_ms - last < self.shoot_cooldown_ms {
                return None;
            }
        }
        self.last_shot_ms = Some(now_ms);
        Some(Bullet::player_shot(self.rect.center_x(), self.rect.y()))
    }
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletKind {
    Player,
    Enemy,
}

/// A projectile moving straight up or down
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub rect: Rect,
    /// Vertical velocity per step (negative = upward)
    pub speed: f32,
    pub kind: BulletKind,
}

impl Bullet {
    /// Upward bullet centered on `muzzle_x` with its top at `y`
    pub fn player_shot(muzzle_x: f32, y: f32) -> Self {
        Self {
            rect: Rect::new(muzzle_x - BULLET_WIDTH / 2.0, y, BULLET_WIDTH, BULLET_HEIGHT),
            speed: -BULLET_SPEED,
            kind: BulletKind::Player,
        }
    }

    /// Downward bullet centered under the enemy's bottom edge
    pub fn enemy_shot(enemy: &Enemy) -> Self {
        Self {
            rect: Rect::new(
                enemy.rect.center_x() - BULLET_WIDTH / 2.0,
                enemy.rect.bottom(),
                BULLET_WIDTH,
                BULLET_HEIGHT,
            ),
            speed: ENEMY_BULLET_SPEED,
            kind: BulletKind::Enemy,
        }
    }

    pub fn advance(&mut self) {
        self.rect.pos.y += self.speed;
    }

    /// True once the bullet has left the vertical span of the playfield
    pub fn out_of_bounds(&self) -> bool {
        self.rect.y() < 0.0 || self.rect.y() > GAME_HEIGHT
    }
}

/// A member of an enemy wave
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub rect: Rect,
    /// Horizontal speed magnitude per step
    pub speed: f32,
    /// +1 = moving right, -1 = moving left
    pub direction: f32,
}

impl Enemy {
    pub fn new(x: f32, y: f32, speed: f32) -> Self {
        Self {
            rect: Rect::new(x, y, ENEMY_WIDTH, ENEMY_HEIGHT),
            speed,
            direction: 1.0,
        }
    }

    /// Side-step, and on touching either wall turn around and drop half a
    /// body height
    pub fn advance(&mut self) {
        self.rect.pos.x += self.speed * self.direction;
        if self.rect.left() <= 0.0 || self.rect.right() >= GAME_WIDTH {
            self.direction = -self.direction;
            self.rect.pos.y += self.rect.height() / 2.0;
        }
    }

    /// True once the bottom edge has passed the bottom of the playfield
    pub fn reached_bottom(&self) -> bool {
        self.rect.bottom() > GAME_HEIGHT
    }
}

/// Borrowed view over any live entity
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Player(&'a Player),
    Bullet(&'a Bullet),
    Enemy(&'a Enemy),
}

impl Entity<'_> {
    pub fn rect(&self) -> Rect {
        match self {
            Entity::Player(p) => p.rect,
            Entity::Bullet(b) => b.rect,
            Entity::Enemy(e) => e.rect,
        }
    }

    pub fn sprite(&self) -> SpriteKind {
        match self {
            Entity::Player(_) => SpriteKind::Player,
            Entity::Bullet(b) => match b.kind {
                BulletKind::Player => SpriteKind::Bullet,
                BulletKind::Enemy => SpriteKind::EnemyBullet,
            },
            Entity::Enemy(_) => SpriteKind::Enemy,
        }
    }

    pub fn render_command(&self) -> RenderCommand {
        RenderCommand {
            kind: self.sprite(),
            rect: self.rect(),
        }
    }
}

/// Mutable handle over any live entity, used by the step to move them
#[derive(Debug)]
pub enum EntityMut<'a> {
    Player(&'a mut Player),
    Bullet(&'a mut Bullet),
    Enemy(&'a mut Enemy),
}

impl EntityMut<'_> {
    /// Move one step and report where the entity ended up
    pub fn advance(&mut self) -> RenderCommand {
        match self {
            EntityMut::Player(p) => p.advance(),
            EntityMut::Bullet(b) => b.advance(),
            EntityMut::Enemy(e) => e.advance(),
        }
        self.view().render_command()
    }

    /// True once the entity has left the playfield and must be culled.
    /// The player is clamped and never leaves.
    pub fn left_playfield(&self) -> bool {
        match self {
            EntityMut::Player(_) => false,
            EntityMut::Bullet(b) => b.out_of_bounds(),
            EntityMut::Enemy(e) => e.reached_bottom(),
        }
    }

    pub fn view(&self) -> Entity<'_> {
        match self {
            EntityMut::Player(p) => Entity::Player(&**p),
            EntityMut::Bullet(b) => Entity::Bullet(&**b),
            EntityMut::Enemy(e) => Entity::Enemy(&**e),
        }
    }
}
