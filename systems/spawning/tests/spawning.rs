use std::time::Duration;

use debugger_core::{ArchetypeId, Command, Event, GameConfig, RunState, UnlockSet};
use debugger_system_spawning::{Config, Spawning};
use debugger_world::{self as world, query, World};

fn advanced(millis: u64) -> Event {
    Event::TimeAdvanced {
        dt: Duration::from_millis(millis),
    }
}

fn archetypes(commands: &[Command]) -> Vec<ArchetypeId> {
    commands
        .iter()
        .map(|command| match command {
            Command::SpawnBug { archetype, .. } => *archetype,
            other => panic!("unexpected command emitted: {other:?}"),
        })
        .collect()
}

#[test]
fn emits_one_spawn_per_elapsed_interval() {
    let mut spawning = Spawning::new(Config::new(&GameConfig::default()));
    let mut commands = Vec::new();

    spawning.handle(&[advanced(2_999)], &mut commands);
    assert!(commands.is_empty(), "no spawn before full interval");

    spawning.handle(&[advanced(1)], &mut commands);
    assert_eq!(commands.len(), 1);

    spawning.handle(&[advanced(9_000)], &mut commands);
    assert_eq!(commands.len(), 4);
}

#[test]
fn paused_and_overrun_runs_do_not_accumulate() {
    let mut spawning = Spawning::new(Config::new(&GameConfig::default()));
    let mut commands = Vec::new();

    spawning.handle(&[advanced(2_000)], &mut commands);
    spawning.handle(
        &[
            Event::RunStateChanged {
                state: RunState::Paused,
            },
            advanced(60_000),
        ],
        &mut commands,
    );
    assert!(commands.is_empty());

    spawning.handle(
        &[Event::RunStateChanged {
            state: RunState::Running,
        }],
        &mut commands,
    );
    spawning.handle(&[advanced(1_000)], &mut commands);
    assert_eq!(commands.len(), 1);

    spawning.handle(
        &[Event::RunStateChanged {
            state: RunState::Overrun,
        }],
        &mut commands,
    );
    spawning.handle(&[advanced(60_000)], &mut commands);
    assert_eq!(commands.len(), 1);
}

#[test]
fn reset_restores_level_one_cadence() {
    let mut spawning = Spawning::new(Config::new(&GameConfig::default()));
    let mut commands = Vec::new();

    spawning.handle(
        &[Event::LevelChanged {
            level: 9,
            unlocks: UnlockSet::default(),
        }],
        &mut commands,
    );
    assert_eq!(spawning.interval(), Duration::from_millis(1_000));

    spawning.handle(&[advanced(900)], &mut commands);
    spawning.handle(&[Event::RunReset], &mut commands);
    assert_eq!(spawning.interval(), Duration::from_millis(3_000));

    spawning.handle(&[advanced(2_000)], &mut commands);
    assert!(commands.is_empty(), "accumulator cleared by reset");
}

#[test]
fn boss_share_matches_level_threshold() {
    let config = GameConfig::default();
    let mut spawning = Spawning::new(Config::new(&config));
    let mut commands = Vec::new();
    let spawns = 40_000_u64;

    spawning.handle(&[advanced(3_000 * spawns)], &mut commands);
    let rolled = archetypes(&commands);
    assert_eq!(rolled.len() as u64, spawns);

    let bosses = rolled
        .iter()
        .filter(|archetype| **archetype == ArchetypeId::Spider)
        .count();
    let share = bosses as f64 / spawns as f64;
    assert!((share - 0.05).abs() < 0.01, "boss share {share:.4}");

    let ants = rolled
        .iter()
        .filter(|archetype| **archetype == ArchetypeId::Ant)
        .count();
    let ant_share = ants as f64 / spawns as f64;
    assert!((ant_share - 0.95 * 0.5).abs() < 0.015, "ant share {ant_share:.4}");
}

#[test]
fn spawn_commands_land_inside_the_arena() {
    let config = GameConfig::default();
    let mut world = World::new(config.clone()).expect("valid config");
    let mut spawning = Spawning::new(Config::new(&config));
    let mut commands = Vec::new();

    spawning.handle(&[advanced(3_000 * 15)], &mut commands);
    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command.clone(), &mut events);
        if let Command::SpawnBug { position, .. } = command {
            let spawned = events.iter().find_map(|event| match event {
                Event::BugSpawned { position, .. } => Some(*position),
                _ => None,
            });
            assert_eq!(spawned, Some(position), "position needed no clamping");
        }
    }

    assert_eq!(query::bug_count(&world), 15);
}

#[test]
fn identical_seeds_spawn_identically() {
    let config = GameConfig::default();
    let mut first = Spawning::new(Config::new(&config));
    let mut second = Spawning::new(Config::new(&config));
    let (mut left, mut right) = (Vec::new(), Vec::new());

    first.handle(&[advanced(30_000)], &mut left);
    second.handle(&[advanced(30_000)], &mut right);
    assert_eq!(left, right);
}
