#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting bug spawn commands.
//!
//! Spawns follow a fixed cadence that shortens with the run's level. Each
//! spawn rolls once against the level's boss threshold: rolls above it draw
//! uniformly from the boss pool, the rest draw from the weighted regular pool.

use std::{collections::BTreeMap, time::Duration};

use debugger_core::{
    config::{SpawnConfig, SpawnWeight},
    ArchetypeId, ArenaBounds, Command, Compass, Event, GameConfig, RunState,
};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SPAWNING_STREAM: u64 = 0x73_70_61_77_6e;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug)]
pub struct Config {
    spawning: SpawnConfig,
    arena: ArenaBounds,
    sizes: BTreeMap<ArchetypeId, f32>,
    rng_seed: u64,
}

impl Config {
    /// Extracts the spawning tables from a game configuration.
    #[must_use]
    pub fn new(game: &GameConfig) -> Self {
        Self {
            spawning: game.spawning.clone(),
            arena: game.arena,
            sizes: game
                .archetypes
                .iter()
                .map(|profile| (profile.id, profile.size))
                .collect(),
            rng_seed: game.seed ^ SPAWNING_STREAM,
        }
    }
}

/// Pure system that deterministically emits spawn commands while the run is live.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    accumulator: Duration,
    level: u32,
    run_state: RunState,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
            accumulator: Duration::ZERO,
            level: 1,
            run_state: RunState::Running,
        }
    }

    /// Interval between spawns at the level the system last observed.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.config.spawning.interval_for_level(self.level)
    }

    /// Consumes events to emit spawn commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                Event::LevelChanged { level, .. } => {
                    self.level = *level;
                    self.accumulator = Duration::ZERO;
                }
                Event::RunStateChanged { state } => self.run_state = *state,
                Event::RunReset => {
                    self.level = 1;
                    self.run_state = RunState::Running;
                    self.accumulator = Duration::ZERO;
                }
                _ => {}
            }
        }

        if self.run_state != RunState::Running || accumulated.is_zero() {
            return;
        }

        let interval = self.interval();
        if interval.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        while self.accumulator >= interval {
            self.accumulator -= interval;
            let archetype = self.roll_archetype();
            let (position, heading) = self.place(archetype);
            out.push(Command::SpawnBug {
                archetype,
                position,
                heading,
            });
        }
    }

    fn roll_archetype(&mut self) -> ArchetypeId {
        let threshold = self.config.spawning.boss_threshold_for_level(self.level);
        let roll: f64 = self.rng.gen();

        let bosses = &self.config.spawning.boss_pool;
        if roll > threshold && !bosses.is_empty() {
            return bosses[self.rng.gen_range(0..bosses.len())];
        }

        pick_weighted(&self.config.spawning.regular_pool, &mut self.rng)
    }

    fn place(&mut self, archetype: ArchetypeId) -> (Vec2, Compass) {
        let size = self.config.sizes.get(&archetype).copied().unwrap_or(0.0);
        let max = self.config.arena.max_origin(size);
        let position = Vec2::new(
            self.rng.gen::<f32>() * max.x,
            self.rng.gen::<f32>() * max.y,
        );
        let heading = Compass::ALL[self.rng.gen_range(0..Compass::ALL.len())];
        (position, heading)
    }
}

fn pick_weighted<R: Rng>(pool: &[SpawnWeight], rng: &mut R) -> ArchetypeId {
    let total: f32 = pool.iter().map(|entry| entry.weight).sum();
    let roll = rng.gen::<f32>() * total;

    let mut accumulated = 0.0;
    for entry in pool {
        accumulated += entry.weight;
        if entry.weight > 0.0 && roll < accumulated {
            return entry.archetype;
        }
    }

    pool.iter()
        .rev()
        .find(|entry| entry.weight > 0.0)
        .map_or(ArchetypeId::Ant, |entry| entry.archetype)
}
