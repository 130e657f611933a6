#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick driver that couples the Debugger world with its pure systems.
//!
//! A [`Session`] owns the world and every system. Adapters hand it either
//! explicit commands or raw frame durations; the session slices frames into
//! fixed ticks, applies each command, and keeps feeding the resulting events
//! through steering, spawning and drops until no system has anything left to
//! say. Every event that leaves the session is also offered to an optional
//! [`SessionObserver`].

use std::time::Duration;

use debugger_core::{ArchetypeId, BugId, Command, ConfigError, Event, GameConfig, UnlockSet};
use debugger_system_drops::Drops;
use debugger_system_movement::Steering;
use debugger_system_spawning::{Config as SpawningConfig, Spawning};
use debugger_world::{self as world, query, World};
use glam::Vec2;
use tracing::{info, trace};

/// Upper bound on system rounds triggered by a single command.
const MAX_PUMP_ROUNDS: usize = 64;

/// Hooks notified of the events a session produces.
///
/// Every method has an empty default so observers implement only what they
/// present. [`SessionObserver::event`] sees every event, including those that
/// also reach a typed callback.
pub trait SessionObserver {
    /// A bug died at the provided centre.
    fn bug_died(&mut self, _bug_id: BugId, _archetype: ArchetypeId, _center: Vec2) {}

    /// The infestation meter changed.
    fn meter_changed(&mut self, _value: f64, _max: f64) {}

    /// The run advanced to a new level.
    fn level_changed(&mut self, _level: u32, _unlocks: &UnlockSet) {}

    /// Any event, in emission order.
    fn event(&mut self, _event: &Event) {}
}

/// Owns a world together with the systems that drive it.
pub struct Session {
    world: World,
    steering: Steering,
    spawning: Spawning,
    drops: Drops,
    tick: Duration,
    accumulator: Duration,
    observer: Option<Box<dyn SessionObserver>>,
}

impl Session {
    /// Creates a session for the provided configuration.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let steering = Steering::new(config.seed);
        let spawning = Spawning::new(SpawningConfig::new(&config));
        let drops = Drops::new(&config.powerups, config.seed);
        let tick = config.tick();
        let world = World::new(config)?;
        info!(banner = query::welcome_banner(&world), "session ready");

        Ok(Self {
            world,
            steering,
            spawning,
            drops,
            tick,
            accumulator: Duration::ZERO,
            observer: None,
        })
    }

    /// Installs the observer that receives every event from now on.
    pub fn set_observer(&mut self, observer: Box<dyn SessionObserver>) {
        self.observer = Some(observer);
    }

    /// Read-only access to the world, for use with [`debugger_world::query`].
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Duration of a single fixed tick.
    #[must_use]
    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Applies an adapter command and lets the systems react to it.
    ///
    /// Returns every event produced, in order.
    pub fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut log = Vec::new();
        self.pump(command, &mut log);
        self.notify(&log);
        log
    }

    /// Feeds a frame's worth of wall time into the session.
    ///
    /// Time is consumed in whole ticks; the remainder carries over to the next
    /// frame.
    pub fn advance(&mut self, frame: Duration) -> Vec<Event> {
        self.accumulator = self.accumulator.saturating_add(frame);

        let mut log = Vec::new();
        while self.accumulator >= self.tick {
            self.accumulator -= self.tick;
            self.pump(Command::Tick { dt: self.tick }, &mut log);
        }
        self.notify(&log);
        log
    }

    fn pump(&mut self, command: Command, log: &mut Vec<Event>) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        for round in 0..MAX_PUMP_ROUNDS {
            if events.is_empty() {
                return;
            }

            let mut commands = Vec::new();
            let bug_view = query::bug_view(&self.world);
            self.steering.handle(&events, &bug_view, &mut commands);
            self.spawning.handle(&events, &mut commands);
            self.drops.handle(&events, &mut commands);
            log.append(&mut events);

            if commands.is_empty() {
                return;
            }

            trace!(round, commands = commands.len(), "pumping system commands");
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }

        log.append(&mut events);
    }

    fn notify(&mut self, log: &[Event]) {
        let Some(observer) = self.observer.as_mut() else {
            return;
        };

        for event in log {
            match event {
                Event::BugDied {
                    bug_id,
                    archetype,
                    center,
                    ..
                } => observer.bug_died(*bug_id, *archetype, *center),
                Event::MeterChanged { value, max } => observer.meter_changed(*value, *max),
                Event::LevelChanged { level, unlocks } => observer.level_changed(*level, unlocks),
                _ => {}
            }
            observer.event(event);
        }
    }
}
