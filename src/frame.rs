//! Fixed-tick frame loop
//!
//! Every frame samples input, advances the simulation by whole ticks and
//! hands the resulting state to a render sink. Rendering never mutates the
//! simulation.

use std::collections::VecDeque;
use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{GameState, SessionPhase, TickInput, tick};

/// Longest frame gap fed into the accumulator
const MAX_FRAME_TIME: Duration = Duration::from_millis(100);
/// Frames averaged for the FPS counter
const FPS_WINDOW: usize = 60;

/// One sample from the input boundary
#[derive(Debug, Clone, Default)]
pub struct InputSample {
    pub input: TickInput,
    /// Leave the loop immediately
    pub quit: bool,
}

/// Anything that can deliver pointer position and discrete actions
pub trait InputSource {
    /// Collect everything that happened since the last poll. `phase` lets the
    /// source map ambiguous gestures (a click) to the action that phase accepts.
    fn poll(&mut self, phase: SessionPhase) -> io::Result<InputSample>;
}

/// Anything that can draw a read-only snapshot of the world
pub trait RenderSink {
    fn render(&mut self, state: &GameState, stats: &FrameStats) -> io::Result<()>;
}

/// Per-frame timing info for the HUD
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub fps: u32,
    /// Simulation ticks run during this frame
    pub ticks: u32,
}

/// Drives `GameState` at the fixed simulation rate
pub struct FrameLoop {
    pub state: GameState,
    accumulator: Duration,
    /// Input waiting for the next tick (actions stay set until consumed)
    pending: TickInput,
    frame_times: VecDeque<Instant>,
    stats: FrameStats,
}

impl FrameLoop {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            accumulator: Duration::ZERO,
            pending: TickInput::default(),
            frame_times: VecDeque::with_capacity(FPS_WINDOW),
            stats: FrameStats::default(),
        }
    }

    fn tick_duration() -> Duration {
        Duration::from_secs_f32(SIM_DT)
    }

    /// Run as many fixed ticks as `elapsed` covers, returning how many ran.
    ///
    /// One-shot actions are applied to the first tick only; if no tick runs
    /// they carry over to the next frame.
    pub fn advance(&mut self, elapsed: Duration, input: &TickInput) -> u32 {
        self.pending.merge(input);
        self.accumulator += elapsed.min(MAX_FRAME_TIME);

        let step = Self::tick_duration();
        let mut substeps = 0;
        while self.accumulator >= step && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.pending);
            self.pending.clear_actions();
            self.accumulator -= step;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= step {
            log::debug!("Dropping {:?} of simulation backlog", self.accumulator);
            self.accumulator = Duration::ZERO;
        }
        self.stats.ticks = substeps;
        substeps
    }

    /// Record a presented frame for the FPS counter
    pub fn record_frame(&mut self, at: Instant) {
        if self.frame_times.len() == FPS_WINDOW {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(at);

        if let (Some(first), Some(last)) = (self.frame_times.front(), self.frame_times.back()) {
            let elapsed = last.duration_since(*first).as_secs_f64();
            if elapsed > 0.0 {
                self.stats.fps = ((self.frame_times.len() - 1) as f64 / elapsed).round() as u32;
            }
        }
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Sample, simulate and render until the input source asks to quit
    pub fn run<I, R>(&mut self, input: &mut I, sink: &mut R) -> io::Result<()>
    where
        I: InputSource,
        R: RenderSink,
    {
        let frame_budget = Self::tick_duration();
        let mut last = Instant::now();
        log::info!("Frame loop running at {:.0} Hz", 1.0 / SIM_DT);

        loop {
            let frame_start = Instant::now();
            let sample = input.poll(self.state.phase)?;
            if sample.quit {
                log::info!("Quit requested");
                return Ok(());
            }

            let elapsed = frame_start.duration_since(last);
            last = frame_start;
            self.advance(elapsed, &sample.input);
            self.record_frame(frame_start);
            sink.render(&self.state, &self.stats)?;

            let spent = frame_start.elapsed();
            if spent < frame_budget {
                thread::sleep(frame_budget - spent);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn frames(n: u32) -> Duration {
        FrameLoop::tick_duration() * n
    }

    #[test]
    fn test_advance_runs_whole_ticks() {
        let mut frame_loop = FrameLoop::new(GameState::new(1));
        let confirm = TickInput {
            confirm: true,
            ..Default::default()
        };
        assert_eq!(frame_loop.advance(frames(1), &confirm), 1);
        assert_eq!(frame_loop.state.phase, SessionPhase::Playing);

        assert_eq!(frame_loop.advance(frames(3), &TickInput::default()), 3);
        assert_eq!(frame_loop.state.time_ticks, 3);
    }

    #[test]
    fn test_actions_carry_over_until_a_tick_runs() {
        let mut frame_loop = FrameLoop::new(GameState::new(1));
        let confirm = TickInput {
            confirm: true,
            ..Default::default()
        };
        assert_eq!(frame_loop.advance(Duration::ZERO, &confirm), 0);
        assert_eq!(frame_loop.state.phase, SessionPhase::Start);

        frame_loop.advance(frames(1), &TickInput::default());
        assert_eq!(frame_loop.state.phase, SessionPhase::Playing);
    }

    #[test]
    fn test_action_applies_to_one_tick_only() {
        let mut frame_loop = FrameLoop::new(GameState::new(1));
        frame_loop.advance(
            frames(1),
            &TickInput {
                confirm: true,
                ..Default::default()
            },
        );
        let fire = TickInput {
            pointer: Vec2::new(900.0, 350.0),
            fire: true,
            ..Default::default()
        };
        // Several ticks in one frame, but only one shot
        assert_eq!(frame_loop.advance(frames(3), &fire), 3);
        assert_eq!(frame_loop.state.projectiles.len(), 1);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut frame_loop = FrameLoop::new(GameState::new(1));
        let ran = frame_loop.advance(Duration::from_secs(5), &TickInput::default());
        assert_eq!(ran, MAX_SUBSTEPS);
        // Backlog dropped, next empty frame runs nothing
        assert_eq!(frame_loop.advance(Duration::ZERO, &TickInput::default()), 0);
    }

    #[test]
    fn test_fps_measurement() {
        let mut frame_loop = FrameLoop::new(GameState::new(1));
        let start = Instant::now();
        for i in 0..30u32 {
            frame_loop.record_frame(start + Duration::from_millis(20) * i);
        }
        assert_eq!(frame_loop.stats().fps, 50);
    }

    struct Scripted {
        frames: VecDeque<InputSample>,
    }

    impl InputSource for Scripted {
        fn poll(&mut self, _phase: SessionPhase) -> io::Result<InputSample> {
            Ok(self.frames.pop_front().unwrap_or(InputSample {
                quit: true,
                ..Default::default()
            }))
        }
    }

    #[derive(Default)]
    struct Recorder {
        phases: Vec<SessionPhase>,
    }

    impl RenderSink for Recorder {
        fn render(&mut self, state: &GameState, _stats: &FrameStats) -> io::Result<()> {
            self.phases.push(state.phase);
            Ok(())
        }
    }

    #[test]
    fn test_run_renders_each_frame_and_quits() {
        let mut frame_loop = FrameLoop::new(GameState::new(1));
        let mut input = Scripted {
            frames: (0..5)
                .map(|_| InputSample {
                    input: TickInput {
                        confirm: true,
                        ..Default::default()
                    },
                    quit: false,
                })
                .collect(),
        };
        let mut sink = Recorder::default();

        frame_loop.run(&mut input, &mut sink).expect("loop exits cleanly");

        assert_eq!(sink.phases.len(), 5);
        assert_eq!(sink.phases.last(), Some(&SessionPhase::Playing));
    }
}
