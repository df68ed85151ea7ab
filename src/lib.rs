//! Wave Siege - a wave-survival arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, waves, collisions, session state)
//! - `frame`: Fixed-tick frame loop and the input/render boundary
//! - `renderer`: Procedural shape generation for render sinks
//! - `settings`: Display and quality preferences

pub mod frame;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use frame::{FrameLoop, FrameStats, InputSample, InputSource, RenderSink};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
///
/// Durations are counts of simulation ticks at `SIM_HZ`, speeds are
/// playfield units per tick.
pub mod consts {
    /// Fixed simulation rate
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 1000.0;
    pub const PLAYFIELD_HEIGHT: f32 = 700.0;

    /// Player defaults (stationary at the playfield centre)
    pub const PLAYER_WIDTH: f32 = 25.0;
    pub const PLAYER_HEIGHT: f32 = 70.0;
    pub const GUN_LENGTH: f32 = 35.0;
    pub const PLAYER_MAX_HEALTH: u32 = 100;
    pub const FIRE_COOLDOWN_TICKS: u64 = 15;
    pub const INVULNERABILITY_TICKS: u32 = 60;
    pub const CONTACT_DAMAGE: u32 = 20;
    pub const BREAK_HEAL: u32 = 30;

    /// Enemy defaults
    pub const ENEMY_WIDTH: f32 = 18.0;
    pub const ENEMY_HEIGHT: f32 = 55.0;
    pub const ENEMY_MAX_HEALTH: u32 = 2;
    pub const ENEMY_MIN_SPEED: f32 = 2.5;
    pub const ENEMY_MAX_SPEED: f32 = 4.5;
    pub const HIT_FLASH_TICKS: u32 = 10;
    /// Enemies never spawn closer than this to a corner
    pub const SPAWN_MARGIN: f32 = 80.0;
    /// Distance outside the playfield edge where enemies appear
    pub const SPAWN_OFFSET: f32 = 50.0;
    /// Below this distance an enemy is considered to have arrived
    pub const ARRIVAL_EPSILON: f32 = 1.0;
    pub const KILL_SCORE: u64 = 10;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 12.0;
    pub const PROJECTILE_RADIUS: f32 = 6.0;
    pub const TRAIL_LENGTH: usize = 5;

    /// Particle defaults
    pub const PARTICLE_GRAVITY: f32 = 0.1;
    pub const PARTICLE_MAX_SPEED: f32 = 3.0;
    pub const PARTICLE_MIN_LIFETIME: u32 = 30;
    pub const PARTICLE_MAX_LIFETIME: u32 = 60;
    pub const PARTICLE_MIN_SIZE: u32 = 2;
    pub const PARTICLE_MAX_SIZE: u32 = 5;

    /// Wave pacing
    pub const SPAWN_DELAY_TICKS: u32 = 30;
    pub const BREAK_DURATION_TICKS: u32 = 3 * SIM_HZ;
    pub const QUOTA_CAP: u32 = 25;
}

/// Centre of the playfield, where the player stands
#[inline]
pub fn playfield_center() -> Vec2 {
    Vec2::new(consts::PLAYFIELD_WIDTH / 2.0, consts::PLAYFIELD_HEIGHT / 2.0)
}

/// Angle (radians) of the vector from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector pointing along `angle`
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_between_axes() {
        let origin = Vec2::ZERO;
        assert!((angle_between(origin, Vec2::new(1.0, 0.0))).abs() < 1e-6);
        let down = angle_between(origin, Vec2::new(0.0, 5.0));
        assert!((down - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_heading_is_unit() {
        for i in 0..8 {
            let h = heading(i as f32 * 0.7);
            assert!((h.length() - 1.0).abs() < 1e-5);
        }
    }
}
