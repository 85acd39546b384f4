//! Game session state and the events a step emits
//!
//! A session owns everything the simulation mutates: the player, the three
//! entity populations, score/lives/level and the seeded RNG.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Bullet, Enemy, Entity, Player};
use super::rect::Rect;
use super::wave::generate_wave;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::renderer::{RenderCommand, SpriteKind};

/// Something that happened during a step, for the host to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The player fired
    Shot,
    /// A player bullet destroyed an enemy
    EnemyDestroyed { points: u64 },
    /// The player lost a life; `lives` is what remains
    LifeLost { lives: u8 },
    /// Every enemy is gone; `level` is the new level
    WaveCleared { level: u32 },
    /// Lives ran out
    GameOver { score: u64 },
}

impl GameEvent {
    /// Sound effect the host should play for this event, if any
    pub fn sound(&self) -> Option<SoundEffect> {
        match self {
            GameEvent::Shot => Some(SoundEffect::Shoot),
            GameEvent::EnemyDestroyed { .. } => Some(SoundEffect::Explosion),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::LifeLost { .. } | GameEvent::WaveCleared { .. } => None,
        }
    }
}

/// Values shown in the heads-up display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub score: u64,
    pub lives: u8,
    pub level: u32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub score: u64,
    pub lives: u8,
    /// Current level (1-based)
    pub level: u32,
    /// Set once lives reach zero; the session never ticks again
    pub game_over: bool,
    /// Simulation step counter
    pub frame: u64,
    pub player: Player,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
}

impl GameState {
    /// Fresh session with the first wave already spawned
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            game_over: false,
            frame: 0,
            player: Player::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
        };
        generate_wave(&mut state);
        state
    }

    /// Take one life. Returns true if that ended the session.
    pub fn lose_life(&mut self, events: &mut Vec<GameEvent>) -> bool {
        self.lives = self.lives.saturating_sub(1);
        log::debug!("Life lost, {} remaining", self.lives);
        events.push(GameEvent::LifeLost { lives: self.lives });

        if self.lives == 0 {
            self.game_over = true;
            log::info!("Game over at level {} with score {}", self.level, self.score);
            events.push(GameEvent::GameOver { score: self.score });
        }
        self.game_over
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            lives: self.lives,
            level: self.level,
        }
    }

    /// Every live entity, in draw order
    pub fn entities(&self) -> impl Iterator<Item = Entity<'_>> {
        std::iter::once(Entity::Player(&self.player))
            .chain(self.player_bullets.iter().map(Entity::Bullet))
            .chain(self.enemies.iter().map(Entity::Enemy))
            .chain(self.enemy_bullets.iter().map(Entity::Bullet))
    }

    /// Background first, then every entity
    pub fn render_commands(&self) -> impl Iterator<Item = RenderCommand> + '_ {
        let background = RenderCommand {
            kind: SpriteKind::Background,
            rect: Rect::new(0.0, 0.0, GAME_WIDTH, GAME_HEIGHT),
        };
        std::iter::once(background).chain(self.entities().map(|e| e.render_command()))
    }
}
