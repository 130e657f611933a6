//! Simple scripted player used to exercise headless runs.

use std::cmp::Ordering;

use debugger_core::{BugSnapshot, Command, RunState, UpgradeId, UpgradeQuote};
use debugger_world::{query, World};
use glam::Vec2;

/// Greedy player: grabs every pickup, keeps the strongest unlocked weapon
/// equipped, swings at the most dangerous bug whenever the weapon is ready and
/// spends money as soon as anything is affordable, preferring level ups.
#[derive(Debug)]
pub(crate) struct Autopilot;

impl Autopilot {
    /// Commands the player would issue given the current world.
    pub(crate) fn plan(&self, world: &World) -> Vec<Command> {
        let mut commands = Vec::new();
        if query::run_state(world) != RunState::Running {
            return commands;
        }

        commands.extend(
            query::pickups(world)
                .into_iter()
                .map(|pickup| Command::CollectPickup { pickup: pickup.id }),
        );

        let equipped = query::equipped_weapon(world);
        let strongest = query::unlocks(world).weapons.into_iter().max_by_key(|kind| {
            query::config(world)
                .weapon(*kind)
                .map_or(0, |profile| profile.unlock_level)
        });
        if let Some(weapon) = strongest.filter(|weapon| *weapon != equipped) {
            commands.push(Command::EquipWeapon { weapon });
        }

        let ready =
            query::weapon(world, equipped).is_some_and(|weapon| weapon.ready_in.is_zero());
        if ready {
            if let Some(target) = most_dangerous(world) {
                commands.push(Command::Attack {
                    point: target.center(),
                });
            }
        }

        if let Some(upgrade) = affordable_upgrade(world) {
            commands.push(Command::PurchaseUpgrade { upgrade });
        }

        commands
    }
}

fn most_dangerous(world: &World) -> Option<BugSnapshot> {
    let config = query::config(world);
    let arena = query::arena(world);
    let middle = Vec2::new(arena.width(), arena.height()) / 2.0;
    let score = |bug: &BugSnapshot| config.archetype(bug.archetype).map_or(0, |p| p.score);

    query::bug_view(world).into_vec().into_iter().max_by(|a, b| {
        score(a).cmp(&score(b)).then_with(|| {
            let from_a = a.center().distance_squared(middle);
            let from_b = b.center().distance_squared(middle);
            from_b.partial_cmp(&from_a).unwrap_or(Ordering::Equal)
        })
    })
}

fn affordable_upgrade(world: &World) -> Option<UpgradeId> {
    let quotes = query::upgrade_quotes(world);
    let open = |quote: &&UpgradeQuote| quote.blocked_by.is_none();

    if quotes
        .iter()
        .filter(open)
        .any(|quote| quote.upgrade == UpgradeId::LevelUp)
    {
        return Some(UpgradeId::LevelUp);
    }

    quotes
        .iter()
        .filter(open)
        .min_by_key(|quote| quote.cost.unwrap_or(u32::MAX))
        .map(|quote| quote.upgrade)
}

#[cfg(test)]
mod tests {
    use debugger_core::{ArchetypeId, Compass, GameConfig, WeaponKind};
    use debugger_world as world;

    use super::*;

    fn spawn(world: &mut World, archetype: ArchetypeId, position: Vec2) {
        let mut events = Vec::new();
        world::apply(
            world,
            Command::SpawnBug {
                archetype,
                position,
                heading: Compass::North,
            },
            &mut events,
        );
    }

    #[test]
    fn idle_world_needs_no_commands() {
        let world = World::new(GameConfig::default()).expect("valid config");
        assert!(Autopilot.plan(&world).is_empty());
    }

    #[test]
    fn swings_at_the_highest_scoring_bug() {
        let mut world = World::new(GameConfig::default()).expect("valid config");
        spawn(&mut world, ArchetypeId::Ant, Vec2::new(380.0, 280.0));
        spawn(&mut world, ArchetypeId::Spider, Vec2::new(10.0, 10.0));

        let commands = Autopilot.plan(&world);

        assert_eq!(
            commands,
            vec![Command::Attack {
                point: Vec2::new(42.0, 42.0)
            }]
        );
    }

    #[test]
    fn paused_runs_are_left_alone() {
        let mut world = World::new(GameConfig::default()).expect("valid config");
        spawn(&mut world, ArchetypeId::Ant, Vec2::new(100.0, 100.0));
        let mut events = Vec::new();
        world::apply(&mut world, Command::SetPaused { paused: true }, &mut events);

        assert!(Autopilot.plan(&world).is_empty());
    }

    #[test]
    fn equips_the_strongest_unlocked_weapon() {
        let mut config = GameConfig::default();
        for weapon in &mut config.weapons {
            weapon.unlock_level = 1;
        }
        let world = World::new(config).expect("valid config");

        let commands = Autopilot.plan(&world);

        assert_eq!(
            commands.first(),
            Some(&Command::EquipWeapon {
                weapon: WeaponKind::Zapper
            })
        );
    }
}
