//! Wave Siege entry point
//!
//! Parses command-line options, loads settings and runs the frame loop in
//! the terminal.

mod display;

use std::io;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use wave_siege::sim::GameState;
use wave_siege::{FrameLoop, QualityPreset, Settings};

use display::{TerminalGuard, TerminalInput, TerminalRenderer};

/// Survive endless waves of enemies in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Options {
    /// Seed for the simulation RNG (defaults to the clock)
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// JSON settings file
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
    /// Quality preset, overriding the settings file
    #[arg(long, value_name = "LEVEL", value_enum, ignore_case = true)]
    quality: Option<QualityPreset>,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn run(options: Options) -> io::Result<()> {
    let mut settings = options
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();
    if let Some(preset) = options.quality {
        settings.apply_preset(preset);
    }

    let seed = options.seed.unwrap_or_else(clock_seed);
    log::info!(
        "Wave Siege starting (seed {}, quality {})",
        seed,
        settings.quality.as_str()
    );

    let state = GameState::new(seed).with_max_particles(settings.max_particles());
    let mut frame_loop = FrameLoop::new(state);

    let _terminal = TerminalGuard::enter()?;
    let mut input = TerminalInput::default();
    let mut sink = TerminalRenderer::new(io::stdout(), settings);
    frame_loop.run(&mut input, &mut sink)?;

    log::info!(
        "Session ended: score {}, wave {}",
        frame_loop.state.score,
        frame_loop.state.wave.wave
    );
    Ok(())
}

fn main() -> io::Result<()> {
    env_logger::init();
    let options = Options::parse();
    run(options).inspect_err(|e| log::error!("Terminal error: {}", e))
}
