//! Capy Dash headless runner
//!
//! Drives one session on a simulated clock at a fixed frame rate, optionally
//! letting the autopilot press jump, and reports the outcome.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use capy_dash::autopilot::Autopilot;
use capy_dash::platform::{Clock, Intent, ManualClock};
use capy_dash::session::Session;
use capy_dash::sim::GameEvent;
use capy_dash::{Engine, Settings};

#[derive(Parser, Debug)]
#[command(name = "capy-dash")]
#[command(about = "Run a headless Capy Dash session")]
struct Cli {
    /// Simulated seconds to run before stopping
    #[arg(long, default_value_t = 60)]
    seconds: u64,
    /// Frames per simulated second
    #[arg(long, default_value_t = 60)]
    fps: u64,
    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Seed for reproducible spawns
    #[arg(long)]
    seed: Option<u64>,
    /// Start at this difficulty rung
    #[arg(long)]
    difficulty: Option<usize>,
    /// Obstacles never end the run
    #[arg(long)]
    invincible: bool,
    /// Never press jump
    #[arg(long)]
    no_autopilot: bool,
    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    ensure!(cli.fps > 0 && cli.fps <= 1000, "--fps must be between 1 and 1000");

    let settings = match &cli.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let rng = match cli.seed {
        Some(seed) => {
            log::info!("Using seed {}", seed);
            Pcg32::seed_from_u64(seed)
        }
        None => Pcg32::from_os_rng(),
    };

    let clock = ManualClock::new(0);
    let mut session = Session::new(Engine::with_rng(settings, rng), &clock);
    let input = session.sender();

    input.send(Intent::Start);
    if cli.invincible {
        input.send(Intent::SetInvincible(true));
    }
    if let Some(index) = cli.difficulty {
        input.send(Intent::SetDifficulty(index));
    }

    let pilot = (!cli.no_autopilot).then(Autopilot::default);
    let frame_ms = 1000 / cli.fps;
    let end_ms = cli.seconds.saturating_mul(1000);
    let mut jumps = 0u32;

    let mut running = session.pump();
    while running && clock.now_ms() < end_ms {
        clock.advance(frame_ms);
        if pilot.is_some_and(|p| p.wants_jump(session.engine().state())) {
            input.send(Intent::Jump);
            input.send(Intent::ReleaseJump);
        }
        running = session.pump();

        for event in session.engine_mut().drain_events() {
            match event {
                GameEvent::Jumped { .. } => jumps += 1,
                GameEvent::DifficultyChanged { index } => {
                    log::info!(
                        "Difficulty {} at {}ms",
                        capy_dash::sim::difficulty::level(index).name,
                        clock.now_ms()
                    );
                }
                other => log::debug!("{:?}", other),
            }
        }
    }

    let snapshot = session.engine().snapshot();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!(
            "{} after {:.1}s: score {}, difficulty {} ({}x), {} jumps, {} frames",
            if snapshot.game_over { "Game over" } else { "Stopped" },
            clock.now_ms() as f64 / 1000.0,
            snapshot.score,
            snapshot.difficulty.name,
            snapshot.difficulty.speed_multiplier,
            jumps,
            snapshot.frame_count
        );
    }
    Ok(())
}
