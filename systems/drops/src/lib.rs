#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Drop system that turns melee kills into powerup pickups.
//!
//! Every resolved attack that killed at least one bug directly rolls once
//! against the drop chance. A successful roll places a single pickup of a
//! weighted kind on one of the killed bugs, chosen uniformly.

use debugger_core::{config::PowerupConfig, Command, Event, PowerupKind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DROPS_STREAM: u64 = 0x64_72_6f_70;

/// Pure system that rolls pickup drops for melee attacks that killed bugs.
#[derive(Debug)]
pub struct Drops {
    drop_chance: f64,
    table: Vec<(PowerupKind, f32)>,
    rng: ChaCha8Rng,
}

impl Drops {
    /// Creates a drop system from the powerup tuning and the session seed.
    #[must_use]
    pub fn new(config: &PowerupConfig, seed: u64) -> Self {
        Self {
            drop_chance: config.drop_chance,
            table: config
                .entries
                .iter()
                .filter(|entry| entry.weight > 0.0)
                .map(|entry| (entry.kind, entry.weight))
                .collect(),
            rng: ChaCha8Rng::seed_from_u64(seed ^ DROPS_STREAM),
        }
    }

    /// Consumes world events to emit pickup drops.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        if self.table.is_empty() {
            return;
        }

        for event in events {
            let Event::AttackResolved { killed_centers, .. } = event else {
                continue;
            };
            if killed_centers.is_empty() || self.rng.gen::<f64>() >= self.drop_chance {
                continue;
            }
            let kind = self.pick();
            let at = killed_centers[self.rng.gen_range(0..killed_centers.len())];
            out.push(Command::DropPickup { kind, at });
        }
    }

    fn pick(&mut self) -> PowerupKind {
        let total: f32 = self.table.iter().map(|(_, weight)| weight).sum();
        let mut roll = self.rng.gen::<f32>() * total;
        for (kind, weight) in &self.table {
            if roll < *weight {
                return *kind;
            }
            roll -= weight;
        }
        self.table
            .last()
            .map_or(PowerupKind::BigBugBomb, |(kind, _)| *kind)
    }
}
