//! Breakout headless runner
//!
//! Usage: `breakout [ball_speed] [frame_rate]`, optionally with
//! `BREAKOUT_SETTINGS=<file.json>`. Plays a session on autopilot, logs progress
//! and prints the final snapshot as JSON.

use std::thread;
use std::time::{Duration, Instant};

use breakout::sim::GameState;
use breakout::{Scheduler, Settings};

/// Longest headless session before the runner gives up
const MAX_SESSION: Duration = Duration::from_secs(120);

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?.with_args(std::env::args().skip(1))?;
    log::info!(
        "Breakout (headless) starting: ball_speed={} frame_rate={} seed={}",
        settings.ball_speed,
        settings.frame_rate,
        settings.seed
    );

    let mut scheduler = Scheduler::new(GameState::new(&settings), &settings);
    scheduler.set_idle_mode(true);
    scheduler.start();

    let started = Instant::now();
    while scheduler.is_running() && started.elapsed() < MAX_SESSION {
        thread::sleep(Duration::from_secs(1));

        let snap = scheduler.snapshot();
        log::info!(
            "tick={} score={} lives={} blocks={}",
            snap.time_ticks,
            snap.score,
            snap.lives,
            snap.blocks.len()
        );
        if scheduler.with_state(|s| s.is_cleared()) {
            log::info!("Field cleared");
            break;
        }
    }

    scheduler.stop();
    let snap = scheduler.snapshot();
    if snap.game_over {
        log::info!("Nice try, but game over. Score: {}", snap.score);
    }
    println!("{}", serde_json::to_string_pretty(&snap)?);
    Ok(())
}
