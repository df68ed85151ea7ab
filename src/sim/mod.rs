//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (durations are tick counts)
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod particles;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{Aabb, Resolution, resolve};
pub use particles::{BurstKind, Particle, burst};
pub use state::{
    Enemy, Entity, GameEvent, GameState, Player, Projectile, SessionPhase, DEFAULT_MAX_PARTICLES,
};
pub use tick::{TickInput, tick};
pub use wave::{WaveDirector, WavePhase, WaveStep, quota_for_wave};
