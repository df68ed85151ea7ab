//! Collision detection and combat resolution
//!
//! All shapes are axis-aligned boxes. Resolution runs once per tick after
//! movement and walks entities in creation order, so simultaneous hits
//! always resolve the same way.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::particles::{BurstKind, burst};
use super::state::{GameEvent, GameState, SessionPhase};
use crate::consts::*;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box of the given size centred on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap test: boxes that only share an edge do not intersect
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Summary of one resolution pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Projectile hits that landed (one per consumed projectile)
    pub hits: u32,
    /// Enemies destroyed
    pub kills: u32,
    /// Contact damage actually applied to the player
    pub player_damage: u32,
    /// The player died during this pass
    pub player_died: bool,
}

/// Resolve projectile/enemy and player/enemy contacts for one tick
///
/// Ends the session the moment the player's health reaches zero.
pub fn resolve(state: &mut GameState) -> Resolution {
    let mut result = Resolution::default();
    resolve_projectiles(state, &mut result);
    resolve_player_contacts(state, &mut result);
    result
}

fn resolve_projectiles(state: &mut GameState, result: &mut Resolution) {
    let GameState {
        projectiles,
        enemies,
        particles,
        rng,
        score,
        events,
        max_particles,
        ..
    } = state;

    projectiles.retain(|projectile| {
        let bounds = projectile.bounds();
        // First live enemy in creation order wins
        let Some(enemy) = enemies
            .iter_mut()
            .find(|e| !e.is_dead() && e.bounds().intersects(&bounds))
        else {
            return true;
        };

        result.hits += 1;
        let killed = enemy.take_hit(1);
        events.push(GameEvent::EnemyHit { enemy: enemy.id });
        burst(particles, rng, enemy.pos, BurstKind::EnemyHit, *max_particles);

        if killed {
            result.kills += 1;
            *score += KILL_SCORE;
            events.push(GameEvent::EnemyKilled { enemy: enemy.id });
            burst(particles, rng, enemy.pos, BurstKind::EnemyKilled, *max_particles);
            log::debug!("Enemy {} destroyed, score {}", enemy.id, score);
        }
        false
    });

    enemies.retain(|e| !e.is_dead());
}

fn resolve_player_contacts(state: &mut GameState, result: &mut Resolution) {
    let player_bounds = state.player.bounds();

    for i in 0..state.enemies.len() {
        if !state.enemies[i].bounds().intersects(&player_bounds) {
            continue;
        }
        if !state.player.take_damage(CONTACT_DAMAGE) {
            continue;
        }

        result.player_damage += CONTACT_DAMAGE;
        let pos = state.player.pos;
        let cap = state.max_particles;
        burst(&mut state.particles, &mut state.rng, pos, BurstKind::PlayerHit, cap);
        state.events.push(GameEvent::PlayerHit {
            health: state.player.health,
        });

        if state.player.is_dead() {
            result.player_died = true;
            state.phase = SessionPhase::GameOver;
            state.events.push(GameEvent::GameOver {
                score: state.score,
                wave: state.wave.wave,
            });
            log::info!(
                "Game over: score {}, wave {}",
                state.score,
                state.wave.wave
            );
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, Projectile};

    fn playing_state() -> GameState {
        let mut state = GameState::new(42);
        state.phase = SessionPhase::Playing;
        state
    }

    fn add_enemy(state: &mut GameState, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, pos, pos, 3.0));
        id
    }

    fn add_projectile(state: &mut GameState, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile::new(id, pos, 0.0));
        id
    }

    #[test]
    fn test_aabb_intersection() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::from_center(Vec2::new(8.0, 0.0), Vec2::splat(10.0));
        let touching = Aabb::from_center(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let far = Aabb::from_center(Vec2::new(50.0, 50.0), Vec2::splat(10.0));

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&touching));
        assert!(!a.intersects(&far));
    }

    #[test]
    fn test_projectile_hits_only_first_enemy() {
        let mut state = playing_state();
        let first = add_enemy(&mut state, Vec2::new(100.0, 100.0));
        let second = add_enemy(&mut state, Vec2::new(102.0, 100.0));
        add_projectile(&mut state, Vec2::new(101.0, 100.0));

        let result = resolve(&mut state);

        assert_eq!(result.hits, 1);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.enemies[0].id, first);
        assert_eq!(state.enemies[0].health, ENEMY_MAX_HEALTH - 1);
        assert_eq!(state.enemies[0].hit_flash, HIT_FLASH_TICKS);
        assert_eq!(state.enemies[1].id, second);
        assert_eq!(state.enemies[1].health, ENEMY_MAX_HEALTH);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_kill_awards_score_and_bursts() {
        let mut state = playing_state();
        let id = add_enemy(&mut state, Vec2::new(100.0, 100.0));
        state.enemies[0].health = 1;
        add_projectile(&mut state, Vec2::new(100.0, 100.0));

        let result = resolve(&mut state);

        assert_eq!(result.kills, 1);
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, KILL_SCORE);
        assert_eq!(
            state.particles.len(),
            BurstKind::EnemyHit.count() + BurstKind::EnemyKilled.count()
        );
        assert!(state.events.contains(&GameEvent::EnemyKilled { enemy: id }));
    }

    #[test]
    fn test_two_projectiles_one_enemy_never_double_removes() {
        let mut state = playing_state();
        add_enemy(&mut state, Vec2::new(100.0, 100.0));
        state.enemies[0].health = 1;
        add_projectile(&mut state, Vec2::new(100.0, 100.0));
        add_projectile(&mut state, Vec2::new(100.0, 101.0));

        let result = resolve(&mut state);

        // Second projectile finds no live enemy and keeps flying
        assert_eq!(result.hits, 1);
        assert_eq!(result.kills, 1);
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, KILL_SCORE);
    }

    #[test]
    fn test_contact_damage_respects_invulnerability() {
        let mut state = playing_state();
        let pos = state.player.pos;
        add_enemy(&mut state, pos);
        add_enemy(&mut state, pos);

        let result = resolve(&mut state);

        // Second overlapping enemy is absorbed by the fresh invulnerability window
        assert_eq!(result.player_damage, CONTACT_DAMAGE);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH - CONTACT_DAMAGE);
        assert_eq!(state.player.invulnerable_ticks, INVULNERABILITY_TICKS);
        assert_eq!(state.particles.len(), BurstKind::PlayerHit.count());
        assert_eq!(state.phase, SessionPhase::Playing);
    }

    #[test]
    fn test_lethal_contact_ends_session_immediately() {
        let mut state = playing_state();
        state.player.health = CONTACT_DAMAGE;
        let pos = state.player.pos;
        add_enemy(&mut state, pos);

        let result = resolve(&mut state);

        assert!(result.player_died);
        assert_eq!(state.player.health, 0);
        assert_eq!(state.phase, SessionPhase::GameOver);
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::GameOver { .. })
        ));
    }

    #[test]
    fn test_no_particles_when_disabled() {
        let mut state = playing_state().with_max_particles(0);
        add_enemy(&mut state, Vec2::new(100.0, 100.0));
        add_projectile(&mut state, Vec2::new(100.0, 100.0));
        resolve(&mut state);
        assert!(state.particles.is_empty());
    }
}
