//! Engine assembly: threads, tick cadence, and shutdown
//!
//! The engine is an explicitly constructed value; no global instance
//! exists. `start` spawns one movement+detection loop and one resolver
//! loop, each holding `Arc` clones of the shared pieces. A single atomic
//! running flag is checked cooperatively by both loops: clearing it stops
//! event production and lets each loop exit after its current iteration.
//! Queued events are discarded on shutdown; a resolution already in flight
//! runs to completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimConfig;
use crate::core::error::Result;
use crate::core::types::{CreatureId, Tick};
use crate::creature::arena::Arena;
use crate::creature::kind::CreatureKind;
use crate::creature::state::CreatureSpec;
use crate::engine::detector;
use crate::engine::observer::{InteractionObserver, ObserverRegistry};
use crate::engine::queue::EventQueue;
use crate::engine::resolver;

pub struct SimulationEngine {
    config: SimConfig,
    seed: u64,
    arena: Arc<Arena>,
    queue: Arc<EventQueue>,
    observers: Arc<ObserverRegistry>,
    running: Arc<AtomicBool>,
}

/// Join handles for the engine's worker threads
pub struct EngineHandle {
    threads: Vec<JoinHandle<()>>,
}

impl EngineHandle {
    /// Wait for every worker loop to exit. Call after `stop`.
    pub fn join(self) {
        for handle in self.threads {
            let _ = handle.join();
        }
    }
}

impl SimulationEngine {
    pub fn new(config: SimConfig, population: Vec<CreatureSpec>, seed: u64) -> Result<Self> {
        config.validate()?;
        let arena = Arena::from_specs(&population);
        tracing::info!(
            creatures = arena.len(),
            width = config.map_width,
            height = config.map_height,
            seed,
            "engine constructed"
        );
        Ok(Self {
            config,
            seed,
            arena: Arc::new(arena),
            queue: Arc::new(EventQueue::new()),
            observers: Arc::new(ObserverRegistry::new()),
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn arena(&self) -> &Arc<Arena> {
        &self.arena
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self, id: CreatureId, observer: Arc<dyn InteractionObserver>) {
        self.observers.subscribe(id, observer);
    }

    /// Subscribe one observer to every creature in the arena.
    pub fn subscribe_all(&self, observer: Arc<dyn InteractionObserver>) {
        for creature in self.arena.iter() {
            self.observers.subscribe(creature.id, Arc::clone(&observer));
        }
    }

    /// Spawn the movement+detection and resolver loops.
    pub fn start(&self) -> Result<EngineHandle> {
        self.running.store(true, Ordering::SeqCst);

        let mover = {
            let arena = Arc::clone(&self.arena);
            let queue = Arc::clone(&self.queue);
            let running = Arc::clone(&self.running);
            let config = self.config.clone();
            let rng = ChaCha8Rng::seed_from_u64(self.seed);
            thread::Builder::new()
                .name("movement".into())
                .spawn(move || movement_loop(arena, queue, config, running, rng))?
        };

        let resolver = {
            let arena = Arc::clone(&self.arena);
            let queue = Arc::clone(&self.queue);
            let observers = Arc::clone(&self.observers);
            let running = Arc::clone(&self.running);
            let config = self.config.clone();
            let rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(1));
            thread::Builder::new()
                .name("resolver".into())
                .spawn(move || resolver_loop(arena, queue, observers, config, running, rng))?
        };

        tracing::info!("engine started");
        Ok(EngineHandle {
            threads: vec![mover, resolver],
        })
    }

    /// Clear the running flag; both loops exit after their current
    /// iteration.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        tracing::info!("engine stopping");
    }
}

fn movement_loop(
    arena: Arc<Arena>,
    queue: Arc<EventQueue>,
    config: SimConfig,
    running: Arc<AtomicBool>,
    mut rng: ChaCha8Rng,
) {
    let mut tick: Tick = 0;
    while running.load(Ordering::SeqCst) {
        for creature in arena.iter() {
            let d = creature.kind.move_range();
            let dx = rng.gen_range(-d..=d);
            let dy = rng.gen_range(-d..=d);
            creature.wander(dx, dy, config.map_width, config.map_height);
        }

        let snapshots = arena.snapshots();
        let emitted = detector::detect_into(&queue, config.cell_size, &snapshots);
        tick += 1;
        tracing::debug!(tick, emitted, queued = queue.len(), "detection pass complete");

        thread::sleep(config.tick_interval());
    }
    tracing::debug!("movement loop exited");
}

fn resolver_loop(
    arena: Arc<Arena>,
    queue: Arc<EventQueue>,
    observers: Arc<ObserverRegistry>,
    config: SimConfig,
    running: Arc<AtomicBool>,
    mut rng: ChaCha8Rng,
) {
    while running.load(Ordering::SeqCst) {
        let Some(event) = queue.pop() else {
            thread::sleep(config.resolver_idle());
            continue;
        };
        for resolution in resolver::resolve_event(&arena, event, &mut rng) {
            let (Some(actor), Some(target)) =
                (arena.get(resolution.actor), arena.get(resolution.target))
            else {
                continue;
            };
            tracing::debug!(
                actor = %actor.name,
                target = %target.name,
                outcome = ?resolution.outcome,
                "interaction resolved"
            );
            observers.notify(actor, target, resolution.outcome);
        }
    }
    tracing::debug!("resolver loop exited");
}

/// Build a random starting population: uniform kinds with at most one
/// Dragon (other kinds are re-rolled once the cap is hit), names
/// `<Kind>_<n>`, uniform positions within the map bounds.
pub fn random_population(
    count: usize,
    config: &SimConfig,
    rng: &mut ChaCha8Rng,
) -> Vec<CreatureSpec> {
    const MAX_DRAGONS: usize = 1;

    let mut dragons = 0;
    (0..count)
        .map(|i| {
            let mut kind = random_kind(rng);
            while kind == CreatureKind::Dragon && dragons >= MAX_DRAGONS {
                kind = random_kind(rng);
            }
            if kind == CreatureKind::Dragon {
                dragons += 1;
            }
            CreatureSpec {
                kind,
                name: format!("{}_{}", kind.as_str(), i + 1),
                x: rng.gen_range(0..=config.map_width),
                y: rng.gen_range(0..=config.map_height),
            }
        })
        .collect()
}

fn random_kind(rng: &mut ChaCha8Rng) -> CreatureKind {
    CreatureKind::ALL[rng.gen_range(0..CreatureKind::ALL.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_is_rejected_at_construction() {
        let config = SimConfig {
            cell_size: 5,
            ..SimConfig::default()
        };
        assert!(SimulationEngine::new(config, Vec::new(), 0).is_err());
    }

    #[test]
    fn test_random_population_respects_dragon_cap_and_bounds() {
        let config = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let population = random_population(200, &config, &mut rng);

        assert_eq!(population.len(), 200);
        let dragons = population
            .iter()
            .filter(|s| s.kind == CreatureKind::Dragon)
            .count();
        assert!(dragons <= 1);

        for spec in &population {
            assert!((0..=config.map_width).contains(&spec.x));
            assert!((0..=config.map_height).contains(&spec.y));
            assert!(spec.name.starts_with(spec.kind.as_str()));
        }
    }

    #[test]
    fn test_random_population_is_deterministic_per_seed() {
        let config = SimConfig::default();
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(
            random_population(50, &config, &mut a),
            random_population(50, &config, &mut b)
        );
    }
}
