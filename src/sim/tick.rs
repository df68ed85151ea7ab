//! Fixed timestep simulation tick
//!
//! Session state machine that advances the world one step. Within a playing
//! tick the order is fixed: player, projectiles, enemies, particles,
//! collisions, then the wave director.

use glam::Vec2;

use super::collision;
use super::particles;
use super::state::{GameEvent, GameState, Projectile, SessionPhase};
use super::wave::WaveStep;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Pointer position in playfield coordinates
    pub pointer: Vec2,
    /// Fire a projectile (Playing only, subject to cooldown)
    pub fire: bool,
    /// Begin a session from the title menu
    pub confirm: bool,
    /// Restart after game over
    pub restart: bool,
}

impl TickInput {
    /// Input with only a pointer position set
    pub fn aim(pointer: Vec2) -> Self {
        Self {
            pointer,
            ..Default::default()
        }
    }

    /// Drop one-shot actions, keeping the pointer
    pub fn clear_actions(&mut self) {
        self.fire = false;
        self.confirm = false;
        self.restart = false;
    }

    /// Fold newer input into this one; actions accumulate until consumed
    pub fn merge(&mut self, newer: &TickInput) {
        self.pointer = newer.pointer;
        self.fire |= newer.fire;
        self.confirm |= newer.confirm;
        self.restart |= newer.restart;
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    match state.phase {
        SessionPhase::Start => {
            if input.confirm {
                begin(state);
            }
        }
        SessionPhase::GameOver => {
            if input.restart {
                begin(state);
            }
        }
        SessionPhase::Playing => step_playing(state, input),
    }
}

/// Reset the world and enter Playing
fn begin(state: &mut GameState) {
    state.reset();
    state.phase = SessionPhase::Playing;
    state.events.push(GameEvent::SessionStarted);
    log::info!("Session started (seed {})", state.seed);
}

fn step_playing(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    state.player.aim_at(input.pointer);
    state.player.update();

    if input.fire && state.player.can_fire(state.time_ticks) {
        let id = state.next_entity_id();
        let projectile = Projectile::new(id, state.player.gun_tip(), state.player.aim);
        state.projectiles.push(projectile);
        state.player.last_fire_tick = Some(state.time_ticks);
        state.events.push(GameEvent::Fired { projectile: id });
    }

    let field = GameState::playfield();
    for projectile in &mut state.projectiles {
        projectile.update();
    }
    state.projectiles.retain(|p| p.bounds().intersects(&field));

    for enemy in &mut state.enemies {
        enemy.update();
    }

    particles::update_all(&mut state.particles);

    let resolution = collision::resolve(state);
    if resolution.player_died {
        return;
    }

    match state.wave.step(state.enemies.len()) {
        WaveStep::Idle => {}
        WaveStep::Spawn => {
            let id = state.spawn_enemy();
            state.events.push(GameEvent::EnemySpawned { enemy: id });
        }
        WaveStep::BreakStarted => {
            state.player.heal(BREAK_HEAL);
            state.events.push(GameEvent::WaveCleared {
                wave: state.wave.wave,
            });
            log::info!(
                "Wave {} cleared, score {}, health {}",
                state.wave.wave,
                state.score,
                state.player.health
            );
        }
        WaveStep::WaveStarted(wave) => {
            state.events.push(GameEvent::WaveStarted { wave });
            log::info!("Wave {} started, quota {}", wave, state.wave.quota);
        }
    }
}
