//! Wave director
//!
//! Decides when enemies spawn and when the inter-wave break starts and
//! ends. The director only counts; `tick` applies the spawns and healing
//! it asks for.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of the wave cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Enemies are being released for the current wave
    Spawning,
    /// Rest period between waves (`BREAK_DURATION_TICKS`)
    Break,
}

/// What the director wants the session to do this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveStep {
    Idle,
    /// Spawn one enemy now
    Spawn,
    /// Wave cleared, the break has begun (heal the player)
    BreakStarted,
    /// Break over, the given wave has begun
    WaveStarted(u32),
}

/// Number of enemies spawned in wave `wave` (1-based)
pub fn quota_for_wave(wave: u32) -> u32 {
    wave.saturating_mul(3).saturating_add(2).min(QUOTA_CAP)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveDirector {
    pub wave: u32,
    pub phase: WavePhase,
    pub quota: u32,
    pub spawned: u32,
    /// Ticks since the last spawn
    pub spawn_timer: u32,
    /// Ticks left in the break
    pub break_timer: u32,
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveDirector {
    pub fn new() -> Self {
        Self {
            wave: 1,
            phase: WavePhase::Spawning,
            quota: quota_for_wave(1),
            spawned: 0,
            spawn_timer: 0,
            break_timer: 0,
        }
    }

    /// Advance one tick given the number of live enemies
    ///
    /// Must run after collisions so enemies killed this tick are already
    /// gone from `live`.
    pub fn step(&mut self, live: usize) -> WaveStep {
        let live = u32::try_from(live).unwrap_or(u32::MAX);
        match self.phase {
            WavePhase::Spawning => {
                if live.saturating_add(self.spawned) < self.quota {
                    self.spawn_timer += 1;
                    if self.spawn_timer >= SPAWN_DELAY_TICKS {
                        self.spawn_timer = 0;
                        self.spawned += 1;
                        return WaveStep::Spawn;
                    }
                }

                // Fully spawned AND fully cleared
                if self.spawned >= self.quota && live == 0 {
                    self.phase = WavePhase::Break;
                    self.break_timer = BREAK_DURATION_TICKS;
                    return WaveStep::BreakStarted;
                }
                WaveStep::Idle
            }
            WavePhase::Break => {
                self.break_timer = self.break_timer.saturating_sub(1);
                if self.break_timer > 0 {
                    return WaveStep::Idle;
                }
                self.wave += 1;
                self.quota = quota_for_wave(self.wave);
                self.spawned = 0;
                self.spawn_timer = 0;
                self.phase = WavePhase::Spawning;
                WaveStep::WaveStarted(self.wave)
            }
        }
    }

    /// Enemies still to defeat this wave (0 during the break)
    pub fn enemies_remaining(&self, live: usize) -> u32 {
        match self.phase {
            WavePhase::Spawning => {
                let live = u32::try_from(live).unwrap_or(u32::MAX);
                live.saturating_add(self.quota.saturating_sub(self.spawned))
            }
            WavePhase::Break => 0,
        }
    }

    /// Whole seconds until the next wave, rounded up (0 while spawning)
    pub fn break_seconds_remaining(&self) -> u32 {
        match self.phase {
            WavePhase::Spawning => 0,
            WavePhase::Break => self.break_timer.div_ceil(SIM_HZ),
        }
    }

    /// Waves fully cleared so far
    pub fn waves_survived(&self) -> u32 {
        match self.phase {
            WavePhase::Spawning => self.wave - 1,
            WavePhase::Break => self.wave,
        }
    }
}
