//! Headless match simulator.
//!
//! Spawns players on a flat floor, scripts the turn holder through walking,
//! aiming and firing, and removes a random opponent on each hit until one
//! player is left or the frame limit is reached.
//!
//! ```bash
//! cargo run -p simulator -- --players 4 --seed 42 --json
//! RUST_LOG=runtime=debug cargo run -p simulator
//! ```
mod logging;
mod script;

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use game_core::{EntityHandle, GameEvent, GroundContact, InputIntent, Topic};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use runtime::{MatchOutcome, MatchRuntime, RuntimeConfig};
use serde::Serialize;

use script::TurnScript;

/// Runs a scripted turn-based match without rendering
#[derive(Parser, Debug)]
#[command(name = "simulator")]
#[command(version)]
struct Cli {
    /// Number of players in the match
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=16))]
    players: u32,

    /// Frames to simulate before giving up
    #[arg(long, default_value_t = 36_000)]
    frames: u32,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_secs: f32,

    /// RNG seed for headings and hit rolls
    #[arg(long, env = "SIMULATOR_SEED", default_value_t = 0)]
    seed: u64,

    /// Probability that a shot removes an opponent
    #[arg(long, default_value_t = 0.5)]
    hit_chance: f64,

    /// Runtime config in RON
    #[arg(long, env = "SIMULATOR_CONFIG")]
    config: Option<PathBuf>,

    /// Also write logs to this directory
    #[arg(long, env = "SIMULATOR_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    players: u32,
    seed: u64,
    frames: u32,
    simulated_secs: f32,
    turns: u32,
    shots: u32,
    hits: u32,
    outcome: &'static str,
    winner: Option<String>,
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = logging::setup_logging(cli.log_dir.as_deref())?;

    let config = match &cli.config {
        Some(path) => RuntimeConfig::load(path)
            .with_context(|| format!("loading runtime config from {}", path.display()))?,
        None => RuntimeConfig::default(),
    };

    let summary = simulate(&cli, config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let result = match &summary.winner {
            Some(winner) => format!("winner {winner}"),
            None => summary.outcome.to_string(),
        };
        println!(
            "{} after {} frames ({:.1}s): {} turns, {} shots, {} hits",
            result,
            summary.frames,
            summary.simulated_secs,
            summary.turns,
            summary.shots,
            summary.hits,
        );
    }
    Ok(())
}

fn simulate(cli: &Cli, config: RuntimeConfig) -> Result<Summary> {
    let mut rng = StdRng::seed_from_u64(cli.seed);

    let turns = Rc::new(Cell::new(0u32));
    let mut game = MatchRuntime::builder().config(config).build()?;
    {
        let turns = Rc::clone(&turns);
        game.subscribe_topic(Topic::Authority, move |event| {
            if matches!(event, GameEvent::AuthorityGained(_)) {
                turns.set(turns.get() + 1);
            }
        });
    }

    let mut roster: Vec<EntityHandle> = Vec::new();
    for i in 0..cli.players {
        let x = i as f32 * 8.0;
        let entity = game.spawn_player(Vec3::new(x, 1.0, 0.0), flat_floor)?;
        roster.push(entity);
    }
    let first = rng.gen_range(0..roster.len());
    game.start(first)?;

    let mut script = TurnScript::default();
    let mut holder = None;
    let mut frames = 0;
    let mut shots = 0;
    let mut hits = 0;

    while frames < cli.frames && !game.outcome().is_over() {
        let current = game.current_holder();
        if current != holder {
            if let Some(previous) = holder
                && roster.contains(&previous)
            {
                game.set_input(previous, InputIntent::idle())?;
            }
            holder = current;
            script.restart(&mut rng);
        }
        if let Some(entity) = holder {
            game.set_input(entity, script.next_input(cli.frame_secs))?;
        }

        let report = game.frame(cli.frame_secs)?;
        frames += 1;

        for shot in report.shots {
            shots += 1;
            let targets: Vec<EntityHandle> = roster
                .iter()
                .copied()
                .filter(|entity| *entity != shot.shooter)
                .collect();
            let Some(&target) = targets.choose(&mut rng) else {
                continue;
            };
            if rng.gen_bool(cli.hit_chance.clamp(0.0, 1.0)) {
                hits += 1;
                tracing::info!(shooter = %shot.shooter, %target, "hit");
                game.kill(target)?;
                roster.retain(|entity| *entity != target);
            } else {
                tracing::info!(shooter = %shot.shooter, %target, "missed");
            }
        }
    }

    for entry in game.debug_view() {
        tracing::debug!(entity = %entry.entity, state = %entry.label(), "final state");
    }

    let outcome = game.outcome();
    Ok(Summary {
        players: cli.players,
        seed: cli.seed,
        frames,
        simulated_secs: frames as f32 * cli.frame_secs,
        turns: turns.get(),
        shots,
        hits,
        outcome: match outcome {
            MatchOutcome::InProgress => "in progress",
            MatchOutcome::Winner(_) => "winner",
            MatchOutcome::NoWinner => "no winner",
        },
        winner: match outcome {
            MatchOutcome::Winner(entity) => Some(entity.to_string()),
            _ => None,
        },
    })
}

fn flat_floor(position: Vec3) -> GroundContact {
    if position.y <= 0.0 {
        GroundContact::FLAT
    } else {
        GroundContact::AIRBORNE
    }
}
