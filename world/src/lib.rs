#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Debugger.
//!
//! The world owns every bug, weapon, and counter of a run. It mutates only in
//! response to [`Command`] values passed to [`apply`], and reports what
//! happened through [`Event`] values. Systems observe the world exclusively
//! through the read-only functions in [`query`].

mod arsenal;
mod bugs;
mod combat;
mod effects;
mod powerups;
mod progression;
mod upgrades;

use std::{collections::BTreeMap, time::Duration};

use debugger_core::{
    ArchetypeId, Command, Compass, ConfigError, Event, GameConfig, PickupId, PowerupKind,
    PurchaseError, RunState, UpgradeId, VisualEffect, WeaponKind, WELCOME_BANNER,
};
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace, warn};

use arsenal::{AttackOutcome, AttackStrategy, Weapon};
use bugs::{BugRegistry, DeathNotice};
use combat::BeamGeometry;
use effects::EffectTimeline;
use powerups::{PickupField, PowerupLedger};
use progression::Progression;
use upgrades::{PurchaseContext, ShopLedger};

/// Mixed into the configured seed so the world's stream differs from the systems'.
const WORLD_STREAM: u64 = 0x5eed_0f_b0_67_u64;

/// Represents the authoritative Debugger world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    clock: Duration,
    run_state: RunState,
    bugs: BugRegistry,
    weapons: BTreeMap<WeaponKind, Weapon>,
    equipped: WeaponKind,
    progression: Progression,
    shop: ShopLedger,
    powerups: PowerupLedger,
    pickups: PickupField,
    effects: EffectTimeline,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a new world for the provided configuration.
    ///
    /// The configuration is validated first; the world never runs with
    /// incomplete tables.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            banner: WELCOME_BANNER,
            clock: Duration::ZERO,
            run_state: RunState::Running,
            bugs: BugRegistry::new(),
            weapons: arm(&config),
            equipped: starting_weapon(&config),
            progression: Progression::new(),
            shop: ShopLedger::new(),
            powerups: PowerupLedger::new(),
            pickups: PickupField::new(),
            effects: EffectTimeline::new(&config.effects),
            rng: ChaCha8Rng::seed_from_u64(config.seed ^ WORLD_STREAM),
            config,
        })
    }

    fn money_multiplier(&self) -> f64 {
        self.progression.money_multiplier() * self.powerups.money_factor()
    }

    fn meter_max(&self) -> f64 {
        self.config.meter.max_for_level(self.progression.level())
    }

    fn push_meter(&self, out_events: &mut Vec<Event>) {
        out_events.push(Event::MeterChanged {
            value: self.progression.meter(),
            max: self.meter_max(),
        });
    }

    fn push_funds(&self, out_events: &mut Vec<Event>) {
        out_events.push(Event::FundsChanged {
            money: self.progression.money(),
        });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        if self.run_state == RunState::Running {
            let arena = self.config.arena;
            for bug in self.bugs.iter_mut() {
                bug.step(&arena);
            }
        }

        self.effects.advance(dt);

        for pickup in self.pickups.advance(dt) {
            debug!(pickup = pickup.get(), "pickup despawned");
            out_events.push(Event::PickupExpired { pickup });
        }

        for expired in self.powerups.advance(dt) {
            if let Some(weapon) = expired.weapon.and_then(|kind| self.weapons.get_mut(&kind)) {
                weapon.revoke(expired.token);
            }
            debug!(kind = ?expired.kind, "powerup expired");
            out_events.push(Event::PowerupExpired {
                kind: expired.kind,
                token: expired.token,
            });
        }
    }

    fn spawn_bug(
        &mut self,
        archetype: ArchetypeId,
        position: Vec2,
        heading: Compass,
        out_events: &mut Vec<Event>,
    ) {
        if self.run_state != RunState::Running {
            return;
        }

        let Some(profile) = self.config.archetype(archetype) else {
            warn!(?archetype, "spawn requested for unconfigured archetype");
            return;
        };

        let (position, _) = self.config.arena.clamp_origin(position, profile.size);
        let bug_id = self.bugs.spawn(profile, position, heading);
        let score = profile.score;
        debug!(bug = bug_id.get(), ?archetype, "bug spawned");
        out_events.push(Event::BugSpawned {
            bug_id,
            archetype,
            position,
        });

        let overrun = self.progression.record_spawn(score, &self.config.meter);
        self.push_meter(out_events);

        if overrun {
            self.run_state = RunState::Overrun;
            info!(
                level = self.progression.level(),
                killed = self.progression.bugs_killed(),
                "infestation meter filled"
            );
            out_events.push(Event::RunStateChanged {
                state: RunState::Overrun,
            });
        }
    }

    fn attack(&mut self, point: Vec2, out_events: &mut Vec<Event>) {
        if self.run_state == RunState::Overrun {
            return;
        }

        let geometry = BeamGeometry {
            hit_radius: self.config.effects.beam_hit_radius,
            min_length: self.config.effects.min_beam_length,
        };
        let Some(weapon) = self.weapons.get_mut(&self.equipped) else {
            return;
        };

        let AttackOutcome {
            did_attack,
            killed_centers,
            deaths,
            beams,
        } = weapon.try_attack(
            point,
            &mut self.bugs,
            &self.config.arena,
            &geometry,
            &mut self.rng,
            self.clock,
        );
        if !did_attack {
            trace!(weapon = ?self.equipped, "attack ignored while cooling down");
            return;
        }

        if let AttackStrategy::Melee { hit_radius } = weapon.strategy() {
            self.effects.push(VisualEffect::Impact {
                point,
                radius: *hit_radius,
            });
        }
        for trace in beams {
            self.effects.push(VisualEffect::Beam(trace));
            out_events.push(Event::BeamCast { trace });
        }

        out_events.push(Event::AttackResolved {
            weapon: self.equipped,
            point,
            killed_centers,
        });
        self.credit_deaths(deaths, out_events);
    }

    fn credit_deaths(&mut self, deaths: Vec<DeathNotice>, out_events: &mut Vec<Event>) {
        let multiplier = self.money_multiplier();
        for notice in deaths {
            self.progression
                .record_kill(notice.reward, notice.score, multiplier);
            self.bugs.release(notice.bug_id);
            self.effects.push(VisualEffect::Splat {
                center: notice.center,
                archetype: notice.archetype,
            });
            debug!(bug = notice.bug_id.get(), archetype = ?notice.archetype, "bug died");

            out_events.push(Event::BugDied {
                bug_id: notice.bug_id,
                archetype: notice.archetype,
                center: notice.center,
                reward: notice.reward,
                score: notice.score,
            });
            self.push_meter(out_events);
            self.push_funds(out_events);
        }
    }

    fn equip(&mut self, weapon: WeaponKind, out_events: &mut Vec<Event>) {
        let Some(profile) = self.config.weapon(weapon) else {
            return;
        };

        if profile.unlock_level > self.progression.level() {
            out_events.push(Event::EquipRejected {
                weapon,
                required_level: profile.unlock_level,
            });
            return;
        }

        if self.equipped != weapon {
            self.equipped = weapon;
            out_events.push(Event::WeaponEquipped { weapon });
        }
    }

    fn purchase_context(&self, upgrade: UpgradeId) -> PurchaseContext {
        PurchaseContext {
            run_state: self.run_state,
            level: self.progression.level(),
            money: self.progression.money(),
            weapon: self.equipped,
            weapon_purchases: self
                .weapons
                .get(&self.equipped)
                .map_or(0, |weapon| weapon.purchases(upgrade)),
        }
    }

    fn purchase(&mut self, upgrade: UpgradeId, out_events: &mut Vec<Event>) {
        let context = self.purchase_context(upgrade);
        let cost = match self.shop.check(&self.config.upgrades, upgrade, &context) {
            Ok(cost) => cost,
            Err(reason) => {
                debug!(?upgrade, %reason, "upgrade rejected");
                out_events.push(Event::UpgradeRejected { upgrade, reason });
                return;
            }
        };

        if !self.progression.spend(cost) {
            out_events.push(Event::UpgradeRejected {
                upgrade,
                reason: PurchaseError::InsufficientFunds {
                    cost,
                    available: self.progression.money(),
                },
            });
            return;
        }

        self.shop.record(upgrade, &context);
        self.apply_upgrade(upgrade);

        let next_cost = self.shop.cost(
            &self.config.upgrades,
            upgrade,
            &self.purchase_context(upgrade),
        );
        info!(?upgrade, cost, "upgrade purchased");
        out_events.push(Event::UpgradePurchased {
            upgrade,
            weapon: upgrade.is_weapon_specific().then_some(self.equipped),
            cost,
            next_cost,
        });
        self.push_funds(out_events);

        if upgrade == UpgradeId::LevelUp {
            self.shop.start_level();
            let level = self.progression.level();
            info!(level, "level up");
            out_events.push(Event::LevelChanged {
                level,
                unlocks: self.config.unlocks_at(level),
            });
            self.push_meter(out_events);
        }
    }

    fn apply_upgrade(&mut self, upgrade: UpgradeId) {
        let tuning = &self.config.upgrades;

        if upgrade.is_weapon_specific() {
            let Some(weapon) = self.weapons.get_mut(&self.equipped) else {
                return;
            };
            weapon.record_purchase(upgrade);
            match upgrade {
                UpgradeId::IncreaseAttack => weapon.add_damage(tuning.attack_step),
                UpgradeId::IncreaseRadius => weapon.grow_reach(),
                _ => weapon.shorten_cooldown(
                    Duration::from_millis(tuning.cooldown_step_ms),
                    Duration::from_millis(tuning.cooldown_floor_ms),
                ),
            }
            return;
        }

        match upgrade {
            UpgradeId::DecreaseAbilityCooldown => self
                .progression
                .reduce_ability_cooldowns(Duration::from_millis(tuning.ability_cooldown_step_ms)),
            UpgradeId::IncreaseMoney => self.progression.scale_money_multiplier(tuning.money_factor),
            _ => self.progression.level_up(),
        }
    }

    fn drop_pickup(&mut self, kind: PowerupKind, at: Vec2, out_events: &mut Vec<Event>) {
        if self.run_state == RunState::Overrun {
            return;
        }

        let pickup = self
            .pickups
            .drop_at(kind, at, self.config.powerups.pickup_lifetime());
        debug!(pickup = pickup.get(), ?kind, "pickup dropped");
        out_events.push(Event::PickupDropped { pickup, kind, at });
    }

    fn collect_pickup(&mut self, pickup: PickupId, out_events: &mut Vec<Event>) {
        if self.run_state == RunState::Overrun {
            return;
        }

        let Some(kind) = self.pickups.collect(pickup) else {
            return;
        };
        out_events.push(Event::PickupCollected { pickup, kind });
        self.activate_powerup(kind, out_events);
    }

    fn activate_powerup(&mut self, kind: PowerupKind, out_events: &mut Vec<Event>) {
        if self.run_state == RunState::Overrun {
            return;
        }

        let tuning = &self.config.powerups;

        if kind == PowerupKind::BigBugBomb {
            let damage = tuning.bomb_damage;
            let deaths: Vec<DeathNotice> = self
                .bugs
                .iter_mut()
                .filter_map(|bug| bug.take_damage(damage))
                .collect();
            info!(killed = deaths.len(), "big bug bomb detonated");
            out_events.push(Event::PowerupActivated { kind, token: None });
            self.credit_deaths(deaths, out_events);
            return;
        }

        let Some(profile) = tuning.profile(kind) else {
            return;
        };
        let weapon_kind = matches!(
            kind,
            PowerupKind::DecreaseCooldown | PowerupKind::IncreaseAttack
        )
        .then_some(self.equipped);
        let token = self.powerups.activate(kind, weapon_kind, profile.duration());

        match kind {
            PowerupKind::DecreaseCooldown => {
                if let Some(weapon) = self.weapons.get_mut(&self.equipped) {
                    weapon.push_cooldown_factor(token, tuning.cooldown_factor);
                }
            }
            PowerupKind::IncreaseAttack => {
                if let Some(weapon) = self.weapons.get_mut(&self.equipped) {
                    weapon.push_damage_bonus(token, tuning.attack_bonus);
                }
            }
            PowerupKind::IncreaseMoney => self.powerups.push_money_factor(token, tuning.money_factor),
            PowerupKind::BigBugBomb => {}
        }

        debug!(?kind, "powerup activated");
        out_events.push(Event::PowerupActivated {
            kind,
            token: Some(token),
        });
    }

    fn set_paused(&mut self, paused: bool, out_events: &mut Vec<Event>) {
        let next = match (self.run_state, paused) {
            (RunState::Running, true) => RunState::Paused,
            (RunState::Paused, false) => RunState::Running,
            _ => return,
        };
        self.run_state = next;
        out_events.push(Event::RunStateChanged { state: next });
    }

    fn reset_run(&mut self, out_events: &mut Vec<Event>) {
        self.bugs.clear();
        self.weapons = arm(&self.config);
        self.equipped = starting_weapon(&self.config);
        self.progression = Progression::new();
        self.shop = ShopLedger::new();
        self.powerups.reset();
        self.pickups.clear();
        self.effects.clear();

        let previous = self.run_state;
        self.run_state = RunState::Running;
        info!("run reset");

        out_events.push(Event::RunReset);
        if previous != RunState::Running {
            out_events.push(Event::RunStateChanged {
                state: RunState::Running,
            });
        }
        let level = self.progression.level();
        out_events.push(Event::LevelChanged {
            level,
            unlocks: self.config.unlocks_at(level),
        });
        self.push_meter(out_events);
        self.push_funds(out_events);
    }
}

fn arm(config: &GameConfig) -> BTreeMap<WeaponKind, Weapon> {
    config
        .weapons
        .iter()
        .map(|profile| (profile.kind, Weapon::from_profile(profile)))
        .collect()
}

fn starting_weapon(config: &GameConfig) -> WeaponKind {
    config
        .weapons
        .iter()
        .min_by_key(|profile| (profile.unlock_level, profile.kind))
        .map_or(WeaponKind::Swatter, |profile| profile.kind)
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SpawnBug {
            archetype,
            position,
            heading,
        } => world.spawn_bug(archetype, position, heading, out_events),
        Command::SteerBug { bug_id, heading } => {
            if let Some(bug) = world.bugs.get_mut(bug_id) {
                bug.steer(heading);
            }
        }
        Command::Attack { point } => world.attack(point, out_events),
        Command::EquipWeapon { weapon } => world.equip(weapon, out_events),
        Command::PurchaseUpgrade { upgrade } => world.purchase(upgrade, out_events),
        Command::DropPickup { kind, at } => world.drop_pickup(kind, at, out_events),
        Command::CollectPickup { pickup } => world.collect_pickup(pickup, out_events),
        Command::ActivatePowerup { kind } => world.activate_powerup(kind, out_events),
        Command::SetPaused { paused } => world.set_paused(paused, out_events),
        Command::ResetRun => world.reset_run(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use debugger_core::{
        ArenaBounds, BugSnapshot, BugView, EffectSnapshot, GameConfig, PickupSnapshot,
        PowerupSnapshot, ProgressionSnapshot, RunState, RunSummary, UnlockSet, UpgradeId,
        UpgradeQuote, WeaponKind, WeaponSnapshot,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Dimensions of the arena.
    #[must_use]
    pub fn arena(world: &World) -> ArenaBounds {
        world.config.arena
    }

    /// Total simulated time since the world was created.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Lifecycle state of the current run.
    #[must_use]
    pub fn run_state(world: &World) -> RunState {
        world.run_state
    }

    /// Captures a read-only view of the living bugs.
    #[must_use]
    pub fn bug_view(world: &World) -> BugView {
        let snapshots: Vec<BugSnapshot> = world.bugs.iter().map(|bug| bug.snapshot()).collect();
        BugView::from_snapshots(snapshots)
    }

    /// Number of bugs in the arena.
    #[must_use]
    pub fn bug_count(world: &World) -> usize {
        world.bugs.len()
    }

    /// Weapon currently equipped.
    #[must_use]
    pub fn equipped_weapon(world: &World) -> WeaponKind {
        world.equipped
    }

    /// Snapshot of a weapon's current stats.
    #[must_use]
    pub fn weapon(world: &World, kind: WeaponKind) -> Option<WeaponSnapshot> {
        world
            .weapons
            .get(&kind)
            .map(|weapon| weapon.snapshot(world.clock))
    }

    /// Snapshots of every weapon in [`WeaponKind`] order.
    #[must_use]
    pub fn weapons(world: &World) -> Vec<WeaponSnapshot> {
        world
            .weapons
            .values()
            .map(|weapon| weapon.snapshot(world.clock))
            .collect()
    }

    /// Snapshot of the progression and economy counters.
    #[must_use]
    pub fn progression(world: &World) -> ProgressionSnapshot {
        let level = world.progression.level();
        ProgressionSnapshot {
            level,
            money: world.progression.money(),
            bugs_killed: world.progression.bugs_killed(),
            score_total: world.progression.score_total(),
            meter_value: world.progression.meter(),
            meter_max: world.meter_max(),
            spawn_interval: world.config.spawning.interval_for_level(level),
            boss_threshold: world.config.spawning.boss_threshold_for_level(level),
            money_multiplier: world.money_multiplier(),
            ability_cooldown_reduction: world.progression.ability_cooldown_reduction(),
        }
    }

    /// Content unlocked at the current level.
    #[must_use]
    pub fn unlocks(world: &World) -> UnlockSet {
        world.config.unlocks_at(world.progression.level())
    }

    /// Price and availability of every upgrade for the equipped weapon.
    #[must_use]
    pub fn upgrade_quotes(world: &World) -> Vec<UpgradeQuote> {
        UpgradeId::ALL
            .into_iter()
            .map(|upgrade| {
                let context = world.purchase_context(upgrade);
                UpgradeQuote {
                    upgrade,
                    cost: world.shop.cost(&world.config.upgrades, upgrade, &context),
                    blocked_by: world
                        .shop
                        .check(&world.config.upgrades, upgrade, &context)
                        .err(),
                }
            })
            .collect()
    }

    /// Pickups waiting to be collected, ordered by identifier.
    #[must_use]
    pub fn pickups(world: &World) -> Vec<PickupSnapshot> {
        world.pickups.snapshots()
    }

    /// Timed powerups in effect, in activation order.
    #[must_use]
    pub fn active_powerups(world: &World) -> Vec<PowerupSnapshot> {
        world.powerups.snapshots()
    }

    /// Visual effects still on display.
    #[must_use]
    pub fn effects(world: &World) -> Vec<EffectSnapshot> {
        world.effects.snapshots()
    }

    /// Final figures of the current run.
    #[must_use]
    pub fn run_summary(world: &World) -> RunSummary {
        RunSummary {
            level: world.progression.level(),
            money: world.progression.money(),
            bugs_killed: world.progression.bugs_killed(),
            score_total: world.progression.score_total(),
            state: world.run_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(GameConfig::default()).expect("default config is valid")
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut config = GameConfig::default();
        config.weapons.clear();
        assert!(World::new(config).is_err());
    }

    #[test]
    fn new_world_starts_with_the_swatter_at_level_one() {
        let world = world();
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
        assert_eq!(query::equipped_weapon(&world), WeaponKind::Swatter);
        assert_eq!(query::progression(&world).level, 1);
        assert_eq!(query::run_state(&world), RunState::Running);
        assert_eq!(query::bug_count(&world), 0);
    }

    #[test]
    fn tick_reports_time_before_other_events() {
        let mut world = world();
        let mut events = Vec::new();
        let dt = Duration::from_millis(30);

        apply(&mut world, Command::Tick { dt }, &mut events);

        assert_eq!(events, vec![Event::TimeAdvanced { dt }]);
        assert_eq!(query::clock(&world), dt);
    }

    #[test]
    fn spawn_clamps_requested_position_into_arena() {
        let mut world = world();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SpawnBug {
                archetype: ArchetypeId::Ant,
                position: Vec2::new(-50.0, 900.0),
                heading: Compass::East,
            },
            &mut events,
        );

        let view = query::bug_view(&world);
        let bug = view.iter().next().expect("bug spawned");
        assert_eq!(bug.position, Vec2::new(0.0, 568.0));
        assert!(matches!(events[0], Event::BugSpawned { .. }));
    }

    #[test]
    fn steering_clears_bounce_flag() {
        let mut world = world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnBug {
                archetype: ArchetypeId::Ant,
                position: Vec2::new(0.5, 100.0),
                heading: Compass::West,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(30),
            },
            &mut events,
        );
        let bug = query::bug_view(&world).into_vec().remove(0);
        assert!(bug.bounced);

        apply(
            &mut world,
            Command::SteerBug {
                bug_id: bug.id,
                heading: Compass::East,
            },
            &mut events,
        );
        let bug = query::bug_view(&world).into_vec().remove(0);
        assert!(!bug.bounced);
        assert_eq!(bug.heading, Compass::East);
    }
}
