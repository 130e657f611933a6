use std::{
    cell::RefCell,
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    rc::Rc,
    time::Duration,
};

use debugger_core::{
    ArchetypeId, BugId, Command, Compass, Event, GameConfig, PowerupKind, RunState, UnlockSet,
    UpgradeId,
};
use debugger_session::{Session, SessionObserver};
use debugger_world::query;
use glam::Vec2;

fn session() -> Session {
    Session::new(GameConfig::default()).expect("valid config")
}

fn spawn_ant(session: &mut Session, position: Vec2) -> Vec<Event> {
    session.submit(Command::SpawnBug {
        archetype: ArchetypeId::Ant,
        position,
        heading: Compass::North,
    })
}

fn count(events: &[Event], matcher: impl Fn(&Event) -> bool) -> usize {
    events.iter().filter(|event| matcher(event)).count()
}

#[test]
fn spawning_runs_on_the_session_clock() {
    let mut session = session();

    let events = session.advance(Duration::from_millis(2_970));
    assert_eq!(count(&events, |e| matches!(e, Event::BugSpawned { .. })), 0);

    let events = session.advance(Duration::from_millis(30));
    assert_eq!(count(&events, |e| matches!(e, Event::BugSpawned { .. })), 1);
    assert_eq!(query::bug_count(session.world()), 1);
}

#[test]
fn paused_sessions_spawn_nothing() {
    let mut session = session();
    let _ = session.submit(Command::SetPaused { paused: true });

    let events = session.advance(Duration::from_secs(30));
    assert_eq!(count(&events, |e| matches!(e, Event::BugSpawned { .. })), 0);
    assert_eq!(query::run_state(session.world()), RunState::Paused);
}

#[test]
fn melee_kills_drop_pickups_within_the_same_submit() {
    let mut config = GameConfig::default();
    config.powerups.drop_chance = 1.0;
    for profile in &mut config.archetypes {
        profile.hp = 1;
    }
    let mut session = Session::new(config).expect("valid config");
    let _ = spawn_ant(&mut session, Vec2::new(100.0, 100.0));
    let center = query::bug_view(session.world())
        .iter()
        .next()
        .map(|bug| bug.center())
        .expect("spawned bug");

    let events = session.submit(Command::Attack { point: center });

    assert_eq!(count(&events, |e| matches!(e, Event::BugDied { .. })), 1);
    let dropped = events.iter().find_map(|event| match event {
        Event::PickupDropped { at, .. } => Some(*at),
        _ => None,
    });
    assert_eq!(dropped, Some(center));
    assert_eq!(query::pickups(session.world()).len(), 1);
}

#[test]
fn bugs_never_leave_the_arena() {
    let mut config = GameConfig::default();
    config.meter.base_max = 1_000_000.0;
    for profile in &mut config.archetypes {
        profile.path_change_chance = 0.2;
    }
    let mut session = Session::new(config).expect("valid config");
    let arena = query::arena(session.world());

    let corners = [
        Vec2::ZERO,
        Vec2::new(arena.width(), 0.0),
        Vec2::new(0.0, arena.height()),
        Vec2::new(arena.width(), arena.height()),
        Vec2::new(arena.width() / 2.0, 0.0),
        Vec2::new(0.0, arena.height() / 2.0),
    ];
    for archetype in ArchetypeId::ALL {
        for (index, corner) in corners.iter().enumerate() {
            let _ = session.submit(Command::SpawnBug {
                archetype,
                position: *corner,
                heading: Compass::ALL[index % Compass::ALL.len()],
            });
        }
    }

    let tick = session.tick();
    for _ in 0..3_000 {
        let _ = session.advance(tick);
        for bug in query::bug_view(session.world()).iter() {
            let max = arena.max_origin(bug.size);
            assert!(
                bug.position.x >= 0.0
                    && bug.position.y >= 0.0
                    && bug.position.x <= max.x
                    && bug.position.y <= max.y,
                "bug {:?} escaped to {:?}",
                bug.id,
                bug.position
            );
        }
    }

    assert_eq!(query::run_state(session.world()), RunState::Running);
    assert!(query::bug_count(session.world()) > ArchetypeId::ALL.len() * corners.len());
}

#[derive(Default)]
struct Recorded {
    deaths: Vec<BugId>,
    meters: Vec<(f64, f64)>,
    levels: Vec<u32>,
    events: usize,
}

struct Recorder(Rc<RefCell<Recorded>>);

impl SessionObserver for Recorder {
    fn bug_died(&mut self, bug_id: BugId, _archetype: ArchetypeId, _center: Vec2) {
        self.0.borrow_mut().deaths.push(bug_id);
    }

    fn meter_changed(&mut self, value: f64, max: f64) {
        self.0.borrow_mut().meters.push((value, max));
    }

    fn level_changed(&mut self, level: u32, _unlocks: &UnlockSet) {
        self.0.borrow_mut().levels.push(level);
    }

    fn event(&mut self, _event: &Event) {
        self.0.borrow_mut().events += 1;
    }
}

#[test]
fn observer_receives_deaths_meter_and_levels() {
    let recorded = Rc::new(RefCell::new(Recorded::default()));
    let mut session = session();
    session.set_observer(Box::new(Recorder(Rc::clone(&recorded))));

    let mut total = 0;
    total += spawn_ant(&mut session, Vec2::new(50.0, 50.0)).len();
    total += spawn_ant(&mut session, Vec2::new(300.0, 300.0)).len();
    total += session
        .submit(Command::ActivatePowerup {
            kind: PowerupKind::BigBugBomb,
        })
        .len();
    total += session
        .submit(Command::PurchaseUpgrade {
            upgrade: UpgradeId::LevelUp,
        })
        .len();

    let recorded = recorded.borrow();
    assert_eq!(recorded.deaths.len(), 2);
    assert_eq!(recorded.meters.last(), Some(&(0.0, 100.0)));
    assert!(recorded.levels.is_empty(), "level up needs funds");
    assert_eq!(recorded.events, total);
}

fn scripted_run(seed: u64) -> (Vec<String>, u64) {
    let mut config = GameConfig::default();
    config.seed = seed;
    let mut session = Session::new(config).expect("valid config");
    let mut log = Vec::new();

    for frame in 0..600 {
        log.extend(session.advance(Duration::from_millis(16 + frame % 7)));
        if frame % 20 == 0 {
            let target = query::bug_view(session.world())
                .iter()
                .next()
                .map(|bug| bug.center());
            if let Some(point) = target {
                log.extend(session.submit(Command::Attack { point }));
            }
        }
        if frame == 300 {
            log.extend(session.submit(Command::PurchaseUpgrade {
                upgrade: UpgradeId::IncreaseAttack,
            }));
        }
    }

    let rendered: Vec<String> = log.iter().map(|event| format!("{event:?}")).collect();
    let mut hasher = DefaultHasher::new();
    rendered.hash(&mut hasher);
    format!("{:?}", query::bug_view(session.world()).into_vec()).hash(&mut hasher);
    format!("{:?}", query::run_summary(session.world())).hash(&mut hasher);
    (rendered, hasher.finish())
}

#[test]
fn identical_seeds_replay_identically() {
    let (first_log, first_fingerprint) = scripted_run(0x0D0E_BD06);
    let (second_log, second_fingerprint) = scripted_run(0x0D0E_BD06);

    assert!(!first_log.is_empty());
    assert_eq!(first_log, second_log);
    assert_eq!(first_fingerprint, second_fingerprint);
}

#[test]
fn different_seeds_diverge() {
    let (_, first) = scripted_run(1);
    let (_, second) = scripted_run(2);
    assert_ne!(first, second);
}
