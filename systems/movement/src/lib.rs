#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Steering system that picks new headings for wandering bugs.
//!
//! The world moves every bug one step per tick and flags bugs that touched
//! the arena edge. After each tick this system steers flagged bugs, and rolls
//! each remaining bug's path change chance to decide whether it turns anyway.

use debugger_core::{
    BugView, Command, Compass, DirectionBias, DirectionWeights, Event, RunState,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const STEERING_STREAM: u64 = 0x73_74_65_65_72;

/// Draws a heading proportionally to the provided weights.
///
/// Weights are validated on construction, so the total is always positive
/// and zero-weight headings are never returned.
pub fn pick_weighted_direction<R: Rng + ?Sized>(weights: &DirectionWeights, rng: &mut R) -> Compass {
    let raw = weights.get();
    let roll = rng.gen::<f32>() * weights.total();

    let mut accumulated = 0.0;
    for (index, weight) in raw.iter().copied().enumerate() {
        accumulated += weight;
        if weight > 0.0 && roll < accumulated {
            return Compass::ALL[index];
        }
    }

    // Rounding can leave the roll a hair above the accumulated total.
    let last = raw
        .iter()
        .rposition(|weight| *weight > 0.0)
        .unwrap_or(Compass::ALL.len() - 1);
    Compass::ALL[last]
}

/// Draws a heading according to an archetype's bias.
pub fn choose_heading<R: Rng + ?Sized>(bias: &DirectionBias, rng: &mut R) -> Compass {
    match bias {
        DirectionBias::Uniform => Compass::ALL[rng.gen_range(0..Compass::ALL.len())],
        DirectionBias::Weighted(weights) => pick_weighted_direction(weights, rng),
    }
}

/// Pure system that reacts to ticks and emits steering commands.
#[derive(Debug)]
pub struct Steering {
    rng: ChaCha8Rng,
    run_state: RunState,
}

impl Steering {
    /// Creates a steering system whose random stream derives from the seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed ^ STEERING_STREAM),
            run_state: RunState::Running,
        }
    }

    /// Consumes world events and the bug view to emit steering commands.
    pub fn handle(&mut self, events: &[Event], bug_view: &BugView, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::RunStateChanged { state } => self.run_state = *state,
                Event::RunReset => self.run_state = RunState::Running,
                _ => {}
            }
        }

        if self.run_state != RunState::Running {
            return;
        }

        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for bug in bug_view.iter() {
            let turn = bug.bounced || self.rng.gen::<f32>() < bug.path_change_chance;
            if !turn {
                continue;
            }
            out.push(Command::SteerBug {
                bug_id: bug.id,
                heading: choose_heading(&bug.bias, &mut self.rng),
            });
        }
    }
}
