#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Debugger session.

mod autopilot;
mod config;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use debugger_core::{ArchetypeId, BugId, GameConfig, RunState, UnlockSet};
use debugger_session::{Session, SessionObserver};
use debugger_world::query;
use glam::Vec2;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use autopilot::Autopilot;

/// Runs a seeded Debugger session without a display.
#[derive(Debug, Parser)]
#[command(name = "debugger", about = "Run a headless Debugger session")]
struct Args {
    /// TOML file overriding the built-in tuning.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed replacing the configured one.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated play time in seconds.
    #[arg(long, default_value_t = 120)]
    seconds: u64,
    /// Length of a simulated frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Let bugs roam without a player.
    #[arg(long)]
    idle: bool,
}

/// Mirrors noteworthy session events into the log.
struct LogObserver;

impl SessionObserver for LogObserver {
    fn bug_died(&mut self, bug_id: BugId, archetype: ArchetypeId, center: Vec2) {
        debug!(bug = bug_id.get(), ?archetype, x = center.x, y = center.y, "squish");
    }

    fn level_changed(&mut self, level: u32, unlocks: &UnlockSet) {
        info!(level, weapons = ?unlocks.weapons, abilities = ?unlocks.abilities, "level reached");
    }
}

/// Entry point for the Debugger command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => config::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut session = Session::new(config).context("invalid game configuration")?;
    session.set_observer(Box::new(LogObserver));
    println!("{}", query::welcome_banner(session.world()));

    let frame = Duration::from_millis(args.frame_ms.max(1));
    let frames = args.seconds.saturating_mul(1_000) / args.frame_ms.max(1);
    let pilot = (!args.idle).then_some(Autopilot);

    for _ in 0..frames {
        let _ = session.advance(frame);
        if let Some(pilot) = &pilot {
            for command in pilot.plan(session.world()) {
                let _ = session.submit(command);
            }
        }
        if query::run_state(session.world()) == RunState::Overrun {
            break;
        }
    }

    let summary = query::run_summary(session.world());
    println!(
        "level {} | money {:.2} | bugs squished {} | score {} | {:?} after {:.1}s",
        summary.level,
        summary.money,
        summary.bugs_killed,
        summary.score_total,
        summary.state,
        query::clock(session.world()).as_secs_f64(),
    );
    Ok(())
}
