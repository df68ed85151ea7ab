//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in `GameState`, owned by the
//! session and passed into each tick.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::particles::Particle;
use super::wave::WaveDirector;
use crate::consts::*;
use crate::{angle_between, heading, playfield_center};

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Title menu, waiting for the begin action
    Start,
    /// Active gameplay
    Playing,
    /// Run ended, simulation frozen until restart
    GameOver,
}

/// Something noteworthy that happened during the last tick
///
/// Front-ends drain these for sound and HUD feedback; the simulation never
/// reads them back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted,
    Fired { projectile: u32 },
    EnemySpawned { enemy: u32 },
    EnemyHit { enemy: u32 },
    EnemyKilled { enemy: u32 },
    PlayerHit { health: u32 },
    WaveCleared { wave: u32 },
    WaveStarted { wave: u32 },
    GameOver { score: u64, wave: u32 },
}

/// The stationary player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Gun direction in radians, recomputed from the pointer every tick
    pub aim: f32,
    /// Last pointer position the player aimed at
    pub pointer: Vec2,
    pub health: u32,
    pub max_health: u32,
    /// Tick of the last shot (None until the first shot)
    pub last_fire_tick: Option<u64>,
    /// Ticks of damage immunity left
    pub invulnerable_ticks: u32,
}

impl Default for Player {
    fn default() -> Self {
        let pos = playfield_center();
        Self {
            pos,
            aim: 0.0,
            pointer: pos,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            last_fire_tick: None,
            invulnerable_ticks: 0,
        }
    }
}

impl Player {
    /// Point the gun at `pointer`
    pub fn aim_at(&mut self, pointer: Vec2) {
        self.pointer = pointer;
        if pointer != self.pos {
            self.aim = angle_between(self.pos, pointer);
        }
    }

    /// Per-tick bookkeeping (the player never moves)
    pub fn update(&mut self) {
        self.invulnerable_ticks = self.invulnerable_ticks.saturating_sub(1);
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT))
    }

    /// End of the gun barrel, where projectiles appear
    pub fn gun_tip(&self) -> Vec2 {
        self.pos + heading(self.aim) * GUN_LENGTH
    }

    pub fn can_fire(&self, now: u64) -> bool {
        self.last_fire_tick
            .is_none_or(|last| now.saturating_sub(last) >= FIRE_COOLDOWN_TICKS)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ticks > 0
    }

    /// Apply contact damage unless invulnerable. Returns true if applied.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.invulnerable_ticks = INVULNERABILITY_TICKS;
        true
    }

    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

/// An enemy walking toward where the player stood when it spawned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    /// Captured once at spawn, never re-tracked
    pub target: Vec2,
    pub speed: f32,
    pub health: u32,
    pub max_health: u32,
    /// Ticks of "just hit" visual state left
    pub hit_flash: u32,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, target: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos,
            target,
            speed,
            health: ENEMY_MAX_HEALTH,
            max_health: ENEMY_MAX_HEALTH,
            hit_flash: 0,
        }
    }

    /// Spawn just outside a random playfield edge
    pub fn spawn<R: Rng>(id: u32, rng: &mut R, target: Vec2) -> Self {
        let across_x = rng.random_range(SPAWN_MARGIN..=PLAYFIELD_WIDTH - SPAWN_MARGIN);
        let across_y = rng.random_range(SPAWN_MARGIN..=PLAYFIELD_HEIGHT - SPAWN_MARGIN);
        let pos = match rng.random_range(0..4u8) {
            0 => Vec2::new(across_x, -SPAWN_OFFSET),
            1 => Vec2::new(across_x, PLAYFIELD_HEIGHT + SPAWN_OFFSET),
            2 => Vec2::new(-SPAWN_OFFSET, across_y),
            _ => Vec2::new(PLAYFIELD_WIDTH + SPAWN_OFFSET, across_y),
        };
        let speed = rng.random_range(ENEMY_MIN_SPEED..ENEMY_MAX_SPEED);
        Self::new(id, pos, target, speed)
    }

    /// Walk toward the target, stopping once within `ARRIVAL_EPSILON`.
    /// The final step lands on the target instead of overshooting it.
    pub fn update(&mut self) {
        let to_target = self.target - self.pos;
        let distance = to_target.length();
        if distance > ARRIVAL_EPSILON {
            self.pos += to_target / distance * self.speed.min(distance);
        }
        self.hit_flash = self.hit_flash.saturating_sub(1);
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT))
    }

    /// Apply projectile damage. Returns true if this killed the enemy.
    pub fn take_hit(&mut self, damage: u32) -> bool {
        self.health = self.health.saturating_sub(damage);
        self.hit_flash = HIT_FLASH_TICKS;
        self.is_dead()
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

/// A projectile fired from the gun tip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Most recent positions, oldest first
    pub trail: VecDeque<Vec2>,
}

impl Projectile {
    pub fn new(id: u32, origin: Vec2, angle: f32) -> Self {
        let mut trail = VecDeque::with_capacity(TRAIL_LENGTH + 1);
        trail.push_back(origin);
        Self {
            id,
            pos: origin,
            vel: heading(angle) * PROJECTILE_SPEED,
            trail,
        }
    }

    /// Move one tick and record the trail
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.trail.push_back(self.pos);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(PROJECTILE_RADIUS * 2.0))
    }
}

/// Borrowed view of any world entity, in draw order
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Player(&'a Player),
    Enemy(&'a Enemy),
    Projectile(&'a Projectile),
    Particle(&'a Particle),
}

/// Default particle cap (overridden by settings)
pub const DEFAULT_MAX_PARTICLES: usize = 256;

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG stream, continues across resets
    pub rng: Pcg32,
    pub phase: SessionPhase,
    pub score: u64,
    /// Ticks simulated since the session began playing
    pub time_ticks: u64,
    pub player: Player,
    /// Live enemies in creation order
    pub enemies: Vec<Enemy>,
    /// Live projectiles in creation order
    pub projectiles: Vec<Projectile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub wave: WaveDirector,
    /// Particle cap, 0 disables particles
    pub max_particles: usize,
    /// Events raised during the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session on the title menu
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: SessionPhase::Start,
            score: 0,
            time_ticks: 0,
            player: Player::default(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            wave: WaveDirector::new(),
            max_particles: DEFAULT_MAX_PARTICLES,
            events: Vec::new(),
            next_id: 1,
        }
    }

    pub fn with_max_particles(mut self, max_particles: usize) -> Self {
        self.max_particles = max_particles;
        self
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Return every session counter and collection to its initial value.
    ///
    /// Phase, seed, RNG stream and the particle cap are left alone.
    pub fn reset(&mut self) {
        self.score = 0;
        self.time_ticks = 0;
        self.player = Player::default();
        self.enemies.clear();
        self.projectiles.clear();
        self.particles.clear();
        self.wave = WaveDirector::new();
        self.events.clear();
        self.next_id = 1;
    }

    /// Spawn an enemy aimed at the player's current position
    pub fn spawn_enemy(&mut self) -> u32 {
        let id = self.next_entity_id();
        let enemy = Enemy::spawn(id, &mut self.rng, self.player.pos);
        log::debug!("Spawned enemy {} at ({:.0}, {:.0})", id, enemy.pos.x, enemy.pos.y);
        self.enemies.push(enemy);
        id
    }

    /// Enemies still to defeat this wave (live plus not yet spawned)
    pub fn enemies_remaining(&self) -> u32 {
        self.wave.enemies_remaining(self.enemies.len())
    }

    /// All entities in draw order
    pub fn entities(&self) -> impl Iterator<Item = Entity<'_>> {
        std::iter::once(Entity::Player(&self.player))
            .chain(self.enemies.iter().map(Entity::Enemy))
            .chain(self.projectiles.iter().map(Entity::Projectile))
            .chain(self.particles.iter().map(Entity::Particle))
    }

    /// Playfield rectangle projectiles must stay inside
    pub fn playfield() -> Aabb {
        Aabb::new(Vec2::ZERO, Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT))
    }
}
