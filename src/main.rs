//! Wildmarch - Entry Point
//!
//! Headless simulation runner: builds (or loads) a population, runs the
//! engine for a bounded duration, prints the survivors, and optionally
//! saves the final population.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use wildmarch::core::config::SimConfig;
use wildmarch::core::error::Result;
use wildmarch::creature::arena::Arena;
use wildmarch::engine::runtime::{random_population, SimulationEngine};
use wildmarch::observers::{ConsoleObserver, FileObserver};
use wildmarch::persist;

/// Concurrent creature simulation on a bounded 2D map
#[derive(Parser, Debug)]
#[command(name = "wildmarch")]
#[command(about = "Run a bounded-duration creature simulation")]
struct Args {
    /// Number of creatures in the starting population
    #[arg(long, default_value_t = 50)]
    count: usize,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// How long to run, in seconds
    #[arg(long, default_value_t = 30)]
    duration_secs: u64,

    /// Optional TOML configuration file (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Load the starting population from a save file instead of generating it
    #[arg(long)]
    load: Option<PathBuf>,

    /// Save the final population to this file on exit
    #[arg(long)]
    save: Option<PathBuf>,

    /// Append interaction rows to this log file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Suppress per-interaction console output
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimConfig::from_toml_file(path)?,
        None => SimConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "wildmarch starting");

    let population = match &args.load {
        Some(path) => {
            let specs = persist::load_from_file(path)?;
            tracing::info!(count = specs.len(), path = %path.display(), "population loaded");
            specs
        }
        None => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            random_population(args.count, &config, &mut rng)
        }
    };

    let engine = SimulationEngine::new(config, population, seed)?;
    if !args.quiet {
        engine.subscribe_all(ConsoleObserver::new());
    }
    if let Some(path) = &args.log_file {
        engine.subscribe_all(FileObserver::create(path)?);
    }

    print_roster(engine.arena());

    let handle = engine.start()?;
    let deadline = Instant::now() + Duration::from_secs(args.duration_secs);
    while Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(100));
    }
    engine.stop();
    handle.join();
    tracing::info!(discarded = engine.queue_len(), "simulation stopped");

    print_survivors(engine.arena());

    if let Some(path) = &args.save {
        persist::save_to_file(engine.arena(), path)?;
        tracing::info!(path = %path.display(), "population saved");
    }

    Ok(())
}

fn print_roster(arena: &Arena) {
    println!("\n=== Creatures ({}) ===", arena.len());
    println!("{:<18}{:<10}{:<6}{:<6}", "Name", "Kind", "X", "Y");
    println!("{}", "-".repeat(40));
    for creature in arena.iter() {
        let (x, y) = creature.position();
        println!("{:<18}{:<10}{:<6}{:<6}", creature.name, creature.kind.as_str(), x, y);
    }
    println!("{}\n", "=".repeat(40));
}

fn print_survivors(arena: &Arena) {
    println!("\n=== Survivors ({}/{}) ===", arena.living_count(), arena.len());
    for creature in arena.iter() {
        let snap = creature.snapshot();
        if snap.alive {
            println!(
                "{} [{}] at ({},{}) hp {}",
                creature.name, creature.kind, snap.x, snap.y, snap.health
            );
        }
    }
}
