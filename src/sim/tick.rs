//! Per-frame simulation step
//!
//! Core game loop that advances the session by exactly one rendered frame.

use rand::Rng;

use super::collision::{first_overlap, overlaps};
use super::entity::{Bullet, EntityMut};
use super::state::{GameEvent, GameState};
use super::wave::generate_wave;
use crate::consts::*;
use crate::difficulty;

/// Discrete player input, already mapped from raw keys by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MoveLeftPressed,
    MoveLeftReleased,
    MoveRightPressed,
    MoveRightReleased,
    Fire,
}

/// Input for a single step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Host timestamp in milliseconds (monotonic)
    pub now_ms: f64,
    /// Input received since the previous step, oldest first
    pub events: Vec<InputEvent>,
}

/// Advance the session by one frame and return what happened
///
/// Order: input, player, player bullets, enemies (movement, fire, bottom
/// line), enemy bullets, collisions, wave clear. If the player runs out of
/// lives the rest of the step is skipped.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.game_over {
        return events;
    }

    state.frame += 1;

    apply_input(state, input, &mut events);
    EntityMut::Player(&mut state.player).advance();

    advance_bullets(&mut state.player_bullets);
    if advance_enemies(state, &mut events) {
        return events;
    }
    advance_bullets(&mut state.enemy_bullets);

    if detect_collisions(state, &mut events) {
        return events;
    }

    if state.enemies.is_empty() {
        state.level += 1;
        events.push(GameEvent::WaveCleared { level: state.level });
        generate_wave(state);
    }

    events
}

fn apply_input(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    for event in &input.events {
        match event {
            InputEvent::MoveLeftPressed => state.player.move_left(),
            InputEvent::MoveRightPressed => state.player.move_right(),
            InputEvent::MoveLeftReleased => state.player.release_left(),
            InputEvent::MoveRightReleased => state.player.release_right(),
            InputEvent::Fire => {
                if let Some(bullet) = state.player.shoot(input.now_ms) {
                    state.player_bullets.push(bullet);
                    events.push(GameEvent::Shot);
                }
            }
        }
    }
}

/// Move every bullet and cull the ones that left the playfield
fn advance_bullets(bullets: &mut Vec<Bullet>) {
    bullets.retain_mut(|bullet| {
        let mut entity = EntityMut::Bullet(bullet);
        entity.advance();
        !entity.left_playfield()
    });
}

/// Move, fire and bottom-line check for every enemy.
/// Returns true if the session ended.
fn advance_enemies(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    let fire_chance = ENEMY_FIRE_RATE * difficulty(state.level) as f64;

    let mut i = 0;
    while i < state.enemies.len() {
        let reached_bottom = {
            let mut enemy = EntityMut::Enemy(&mut state.enemies[i]);
            enemy.advance();
            enemy.left_playfield()
        };

        if state.rng.random::<f64>() < fire_chance {
            let bullet = Bullet::enemy_shot(&state.enemies[i]);
            state.enemy_bullets.push(bullet);
        }

        if reached_bottom {
            state.enemies.remove(i);
            if state.lose_life(events) {
                return true;
            }
            continue;
        }
        i += 1;
    }
    false
}

/// Run the three pairwise checks in order:
/// player bullets vs enemies, enemy bullets vs player, enemies vs player.
/// Returns true if the session ended.
pub fn detect_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    // A bullet kills at most one enemy
    for i in (0..state.player_bullets.len()).rev() {
        let bullet = state.player_bullets[i].rect;
        if let Some(j) = first_overlap(&bullet, &state.enemies, |e| e.rect) {
            state.player_bullets.remove(i);
            state.enemies.remove(j);

            let points = SCORE_PER_LEVEL * state.level as u64;
            state.score += points;
            events.push(GameEvent::EnemyDestroyed { points });
        }
    }

    // At most one enemy bullet connects per frame
    if let Some(i) = first_overlap(&state.player.rect, &state.enemy_bullets, |b| b.rect) {
        state.enemy_bullets.remove(i);
        if state.lose_life(events) {
            return true;
        }
    }

    // Every ramming enemy costs a life
    for j in (0..state.enemies.len()).rev() {
        if overlaps(&state.enemies[j].rect, &state.player.rect) {
            state.enemies.remove(j);
            if state.lose_life(events) {
                return true;
            }
        }
    }

    false
}
