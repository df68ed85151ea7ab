//! Decorative particles
//!
//! Particles have no gameplay effect. They only exist to give visual
//! feedback for hits and kills.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// What emitted a burst (drives particle count and render colour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstKind {
    /// Enemy contact damaged the player
    PlayerHit,
    /// Projectile struck an enemy
    EnemyHit,
    /// Enemy destroyed
    EnemyKilled,
}

impl BurstKind {
    /// Number of particles emitted per burst
    pub fn count(self) -> usize {
        match self {
            BurstKind::PlayerHit => 5,
            BurstKind::EnemyHit => 3,
            BurstKind::EnemyKilled => 8,
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Ticks left before expiry
    pub lifetime: u32,
    /// Lifetime at creation, for the fade ratio
    pub max_lifetime: u32,
    pub kind: BurstKind,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, size: f32, lifetime: u32, kind: BurstKind) -> Self {
        Self {
            pos,
            vel,
            size,
            lifetime,
            max_lifetime: lifetime,
            kind,
        }
    }

    /// Advance one tick. Returns `false` once the particle has expired.
    ///
    /// A particle created with lifetime `L` survives exactly `L` calls.
    pub fn update(&mut self) -> bool {
        if self.lifetime == 0 {
            return false;
        }
        self.pos += self.vel;
        self.vel.y += PARTICLE_GRAVITY;
        self.lifetime -= 1;
        true
    }

    /// Opacity in [0, 1], remaining / original lifetime
    pub fn fade(&self) -> f32 {
        if self.max_lifetime == 0 {
            return 0.0;
        }
        (self.lifetime as f32 / self.max_lifetime as f32).clamp(0.0, 1.0)
    }
}

/// Update every particle and drop the expired ones
pub fn update_all(particles: &mut Vec<Particle>) {
    particles.retain_mut(Particle::update);
}

/// Emit a burst of particles at `pos`
///
/// When the collection is full the oldest particles make room. A `cap` of 0
/// disables emission entirely.
pub fn burst<R: Rng>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    pos: Vec2,
    kind: BurstKind,
    cap: usize,
) {
    if cap == 0 {
        return;
    }
    for _ in 0..kind.count() {
        if particles.len() >= cap {
            particles.remove(0);
        }
        let vel = Vec2::new(
            rng.random_range(-PARTICLE_MAX_SPEED..=PARTICLE_MAX_SPEED),
            rng.random_range(-PARTICLE_MAX_SPEED..=PARTICLE_MAX_SPEED),
        );
        let lifetime = rng.random_range(PARTICLE_MIN_LIFETIME..=PARTICLE_MAX_LIFETIME);
        let size = rng.random_range(PARTICLE_MIN_SIZE..=PARTICLE_MAX_SIZE) as f32;
        particles.push(Particle::new(pos, vel, size, lifetime, kind));
    }
}
