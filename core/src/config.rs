//! Tuning tables consumed by the world and systems.
//!
//! Every section carries `#[serde(default)]` so a configuration file only
//! needs to name the values it overrides. [`GameConfig::validate`] must pass
//! before a configuration is handed to the world.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    Ability, ArchetypeId, ArenaBounds, DirectionBias, DirectionWeights, PowerupKind, UnlockSet,
    UpgradeId, WeaponKind,
};

/// Errors raised while validating a [`GameConfig`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A direction weight was negative or not finite.
    #[error("direction weight {index} must be finite and non-negative, got {weight}")]
    InvalidWeight {
        /// Position of the offending weight.
        index: usize,
        /// Offending value.
        weight: f32,
    },
    /// Direction weights summed to zero.
    #[error("direction weights must sum to a positive total")]
    ZeroWeightSum,
    /// A table is missing an entry.
    #[error("{table} has no entry for `{entry}`")]
    MissingEntry {
        /// Table that is incomplete.
        table: &'static str,
        /// Entry that is missing.
        entry: String,
    },
    /// A table lists the same entry more than once.
    #[error("{table} lists `{entry}` more than once")]
    DuplicateEntry {
        /// Table containing the duplicate.
        table: &'static str,
        /// Entry that is duplicated.
        entry: String,
    },
    /// A probability fell outside `[0, 1]`.
    #[error("{field} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange {
        /// Field holding the probability.
        field: String,
        /// Offending value.
        value: f64,
    },
    /// A value that must be positive was zero, negative, or not finite.
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Field holding the value.
        field: String,
        /// Offending value.
        value: f64,
    },
    /// A spawn pool cannot produce an archetype.
    #[error("spawn pool `{0}` is empty or has no positive weight")]
    EmptyPool(&'static str),
    /// An archetype does not fit inside the arena.
    #[error("archetype `{archetype:?}` of size {size} does not fit the arena")]
    ArchetypeTooLarge {
        /// Archetype that is too large.
        archetype: ArchetypeId,
        /// Size of the archetype.
        size: f32,
    },
}

/// Complete tuning for a Debugger session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed shared by the world and every system random stream.
    pub seed: u64,
    /// Fixed simulation step in milliseconds.
    pub tick_ms: u64,
    /// Dimensions of the arena.
    pub arena: ArenaBounds,
    /// Infestation meter capacity curve.
    pub meter: MeterConfig,
    /// Spawn cadence and archetype pools.
    pub spawning: SpawnConfig,
    /// Stats for every archetype.
    pub archetypes: Vec<ArchetypeProfile>,
    /// Stats for every weapon.
    pub weapons: Vec<WeaponProfile>,
    /// Prices and magnitudes of upgrades.
    pub upgrades: UpgradeConfig,
    /// Drop rates and magnitudes of powerups.
    pub powerups: PowerupConfig,
    /// Levels at which abilities unlock.
    pub abilities: Vec<AbilityUnlock>,
    /// Display durations of visual effects and beam geometry.
    pub effects: EffectConfig,
}

impl GameConfig {
    /// Fixed simulation step.
    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Looks up the profile of an archetype.
    #[must_use]
    pub fn archetype(&self, id: ArchetypeId) -> Option<&ArchetypeProfile> {
        self.archetypes.iter().find(|profile| profile.id == id)
    }

    /// Looks up the profile of a weapon.
    #[must_use]
    pub fn weapon(&self, kind: WeaponKind) -> Option<&WeaponProfile> {
        self.weapons.iter().find(|profile| profile.kind == kind)
    }

    /// Content available at the provided level.
    #[must_use]
    pub fn unlocks_at(&self, level: u32) -> UnlockSet {
        UnlockSet {
            weapons: self
                .weapons
                .iter()
                .filter(|profile| profile.unlock_level <= level)
                .map(|profile| profile.kind)
                .collect(),
            abilities: self
                .abilities
                .iter()
                .filter(|unlock| unlock.level <= level)
                .map(|unlock| unlock.ability)
                .collect(),
            upgrades: self
                .upgrades
                .entries
                .iter()
                .filter(|profile| profile.required_level <= level)
                .map(|profile| profile.id)
                .collect(),
        }
    }

    /// Checks every table for completeness and every value for range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tick_ms", self.tick_ms as f64)?;
        positive("arena.width", f64::from(self.arena.width()))?;
        positive("arena.height", f64::from(self.arena.height()))?;
        positive("meter.base_max", self.meter.base_max)?;

        complete("archetypes", &ArchetypeId::ALL, self.archetypes.iter().map(|p| p.id))?;
        for profile in &self.archetypes {
            profile.validate(&self.arena)?;
        }

        complete("weapons", &WeaponKind::ALL, self.weapons.iter().map(|p| p.kind))?;
        for profile in &self.weapons {
            profile.validate()?;
        }

        complete("upgrades", &UpgradeId::ALL, self.upgrades.entries.iter().map(|p| p.id))?;
        self.upgrades.validate()?;

        complete("powerups", &PowerupKind::ALL, self.powerups.entries.iter().map(|p| p.kind))?;
        self.powerups.validate()?;

        self.spawning.validate()?;
        self.effects.validate()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0x0D0E_BD06,
            tick_ms: 30,
            arena: ArenaBounds::default(),
            meter: MeterConfig::default(),
            spawning: SpawnConfig::default(),
            archetypes: default_archetypes(),
            weapons: default_weapons(),
            upgrades: UpgradeConfig::default(),
            powerups: PowerupConfig::default(),
            abilities: default_abilities(),
            effects: EffectConfig::default(),
        }
    }
}

/// Infestation meter capacity curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    /// Capacity at level one.
    pub base_max: f64,
    /// Capacity added by each level beyond the first.
    pub max_step: f64,
}

impl MeterConfig {
    /// Meter capacity at the provided level.
    #[must_use]
    pub fn max_for_level(&self, level: u32) -> f64 {
        self.base_max + self.max_step * f64::from(level.saturating_sub(1))
    }
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            base_max: 100.0,
            max_step: 25.0,
        }
    }
}

/// Weighted entry of the regular spawn pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnWeight {
    /// Archetype that may be drawn.
    pub archetype: ArchetypeId,
    /// Relative likelihood of the archetype.
    pub weight: f32,
}

/// Spawn cadence and archetype pools.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Interval between spawns at level one.
    pub base_interval_ms: u64,
    /// Interval removed by each level beyond the first.
    pub interval_step_ms: u64,
    /// Shortest interval regardless of level.
    pub min_interval_ms: u64,
    /// Boss threshold at level one.
    pub base_boss_threshold: f64,
    /// Threshold removed by each level beyond the first.
    pub boss_threshold_step: f64,
    /// Lowest threshold regardless of level.
    pub min_boss_threshold: f64,
    /// Weighted pool drawn from when the roll is at or below the threshold.
    pub regular_pool: Vec<SpawnWeight>,
    /// Uniform pool drawn from when the roll exceeds the threshold.
    pub boss_pool: Vec<ArchetypeId>,
}

impl SpawnConfig {
    /// Interval between spawns at the provided level.
    #[must_use]
    pub fn interval_for_level(&self, level: u32) -> Duration {
        let reduction = self
            .interval_step_ms
            .saturating_mul(u64::from(level.saturating_sub(1)));
        let millis = self
            .base_interval_ms
            .saturating_sub(reduction)
            .max(self.min_interval_ms);
        Duration::from_millis(millis)
    }

    /// Roll above which spawns are drawn from the boss pool.
    #[must_use]
    pub fn boss_threshold_for_level(&self, level: u32) -> f64 {
        let reduction = self.boss_threshold_step * f64::from(level.saturating_sub(1));
        (self.base_boss_threshold - reduction).max(self.min_boss_threshold)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("spawning.min_interval_ms", self.min_interval_ms as f64)?;
        probability("spawning.base_boss_threshold", self.base_boss_threshold)?;
        probability("spawning.min_boss_threshold", self.min_boss_threshold)?;

        let mut regular_total = 0.0_f32;
        for (index, entry) in self.regular_pool.iter().enumerate() {
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    index,
                    weight: entry.weight,
                });
            }
            regular_total += entry.weight;
        }
        if regular_total <= 0.0 {
            return Err(ConfigError::EmptyPool("regular_pool"));
        }
        if self.boss_pool.is_empty() {
            return Err(ConfigError::EmptyPool("boss_pool"));
        }
        Ok(())
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: 3_000,
            interval_step_ms: 250,
            min_interval_ms: 600,
            base_boss_threshold: 0.95,
            boss_threshold_step: 0.02,
            min_boss_threshold: 0.75,
            regular_pool: vec![
                SpawnWeight {
                    archetype: ArchetypeId::Ant,
                    weight: 5.0,
                },
                SpawnWeight {
                    archetype: ArchetypeId::Fly,
                    weight: 3.0,
                },
                SpawnWeight {
                    archetype: ArchetypeId::Roach,
                    weight: 2.0,
                },
            ],
            boss_pool: vec![ArchetypeId::Spider],
        }
    }
}

/// Stats and movement bias of a bug archetype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeProfile {
    /// Archetype the profile describes.
    pub id: ArchetypeId,
    /// Health at spawn.
    pub hp: u32,
    /// Distance travelled per tick in pixels.
    pub speed: f32,
    /// Edge length of the square footprint in pixels.
    pub size: f32,
    /// Money credited on death before multipliers.
    pub reward: u32,
    /// Meter weight added on spawn and removed on death.
    pub score: u32,
    /// Chance per tick to pick a new heading without bouncing.
    pub path_change_chance: f32,
    /// Strategy used to pick new headings.
    pub bias: DirectionBias,
}

impl ArchetypeProfile {
    fn validate(&self, arena: &ArenaBounds) -> Result<(), ConfigError> {
        let name = format!("{:?}", self.id).to_lowercase();
        positive(&format!("archetypes.{name}.hp"), f64::from(self.hp))?;
        positive(&format!("archetypes.{name}.size"), f64::from(self.size))?;
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(ConfigError::NonPositive {
                field: format!("archetypes.{name}.speed"),
                value: f64::from(self.speed),
            });
        }
        probability(
            &format!("archetypes.{name}.path_change_chance"),
            f64::from(self.path_change_chance),
        )?;
        if self.size > arena.width() || self.size > arena.height() {
            return Err(ConfigError::ArchetypeTooLarge {
                archetype: self.id,
                size: self.size,
            });
        }
        Ok(())
    }
}

/// How a weapon strikes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttackProfile {
    /// Damages every bug whose centre lies within the radius of the point.
    Melee {
        /// Radius of the strike in pixels.
        hit_radius: f32,
    },
    /// Casts a beam from the arena emitter toward the point.
    Beam {
        /// Maximum beam length in pixels.
        max_distance: f32,
        /// Chance that killing a bug spawns a chained beam.
        chain_probability: f64,
        /// Maximum number of chained beams per attack.
        max_chain_depth: u32,
        /// Search radius for chain targets around the killed bug.
        chain_radius: f32,
    },
}

/// How radius upgrades grow a weapon's reach.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReachGrowth {
    /// Adds a fixed amount per upgrade.
    Add {
        /// Pixels added per upgrade.
        amount: f32,
    },
    /// Multiplies the reach per upgrade.
    Scale {
        /// Factor applied per upgrade.
        factor: f32,
    },
}

impl ReachGrowth {
    /// Applies one upgrade to the provided reach.
    #[must_use]
    pub fn apply(self, reach: f32) -> f32 {
        match self {
            Self::Add { amount } => reach + amount,
            Self::Scale { factor } => reach * factor,
        }
    }
}

/// Stats of a weapon archetype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    /// Weapon the profile describes.
    pub kind: WeaponKind,
    /// Display name.
    pub name: String,
    /// Damage per hit before upgrades.
    pub damage: u32,
    /// Cooldown between attacks before upgrades.
    pub cooldown_ms: u64,
    /// Level at which the weapon may be equipped.
    pub unlock_level: u32,
    /// How the weapon strikes.
    pub attack: AttackProfile,
    /// How radius upgrades grow the weapon's reach.
    pub reach_growth: ReachGrowth,
}

impl WeaponProfile {
    fn validate(&self) -> Result<(), ConfigError> {
        let name = format!("{:?}", self.kind).to_lowercase();
        positive(&format!("weapons.{name}.unlock_level"), f64::from(self.unlock_level))?;
        match &self.attack {
            AttackProfile::Melee { hit_radius } => {
                positive(&format!("weapons.{name}.hit_radius"), f64::from(*hit_radius))
            }
            AttackProfile::Beam {
                max_distance,
                chain_probability,
                chain_radius,
                ..
            } => {
                positive(&format!("weapons.{name}.max_distance"), f64::from(*max_distance))?;
                positive(&format!("weapons.{name}.chain_radius"), f64::from(*chain_radius))?;
                probability(&format!("weapons.{name}.chain_probability"), *chain_probability)
            }
        }
    }
}

/// Price curve and unlock level of an upgrade.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeProfile {
    /// Upgrade the profile describes.
    pub id: UpgradeId,
    /// Price of the first purchase.
    pub base_cost: u32,
    /// Factor applied to the price after each purchase.
    pub cost_multiplier: f64,
    /// Level at which the upgrade may be purchased.
    pub required_level: u32,
}

impl UpgradeProfile {
    /// Price of the purchase following `purchases` earlier ones.
    ///
    /// Each purchase multiplies the previous price and rounds it, so rounding
    /// compounds along the track.
    #[must_use]
    pub fn cost_after(&self, purchases: u32) -> u32 {
        let cap = f64::from(u32::MAX);
        let cost = (0..purchases).fold(f64::from(self.base_cost), |cost, _| {
            (cost * self.cost_multiplier).round().min(cap)
        });
        cost as u32
    }
}

/// Prices and magnitudes of upgrades.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeConfig {
    /// Price curve of every upgrade.
    pub entries: Vec<UpgradeProfile>,
    /// Purchases allowed per weapon for weapon-specific upgrades.
    pub weapon_purchase_cap: u32,
    /// Damage added by each attack upgrade.
    pub attack_step: u32,
    /// Cooldown removed by each cooldown upgrade.
    pub cooldown_step_ms: u64,
    /// Shortest base cooldown reachable through upgrades.
    pub cooldown_floor_ms: u64,
    /// Factor applied to the permanent money multiplier per purchase.
    pub money_factor: f64,
    /// Ability cooldown removed per purchase.
    pub ability_cooldown_step_ms: u64,
}

impl UpgradeConfig {
    /// Looks up the price curve of an upgrade.
    #[must_use]
    pub fn profile(&self, id: UpgradeId) -> Option<&UpgradeProfile> {
        self.entries.iter().find(|profile| profile.id == id)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for profile in &self.entries {
            positive(
                &format!("upgrades.{:?}.cost_multiplier", profile.id).to_lowercase(),
                profile.cost_multiplier,
            )?;
        }
        positive("upgrades.money_factor", self.money_factor)
    }
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        let entry = |id, base_cost, cost_multiplier, required_level| UpgradeProfile {
            id,
            base_cost,
            cost_multiplier,
            required_level,
        };
        Self {
            entries: vec![
                entry(UpgradeId::IncreaseAttack, 10, 1.5, 1),
                entry(UpgradeId::IncreaseRadius, 10, 1.5, 1),
                entry(UpgradeId::DecreaseCooldown, 15, 1.5, 2),
                entry(UpgradeId::DecreaseAbilityCooldown, 20, 1.6, 3),
                entry(UpgradeId::IncreaseMoney, 25, 1.75, 2),
                entry(UpgradeId::LevelUp, 30, 1.4, 1),
            ],
            weapon_purchase_cap: 5,
            attack_step: 1,
            cooldown_step_ms: 100,
            cooldown_floor_ms: 100,
            money_factor: 1.10,
            ability_cooldown_step_ms: 500,
        }
    }
}

/// Drop weight and duration of a powerup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowerupProfile {
    /// Powerup the profile describes.
    pub kind: PowerupKind,
    /// Relative likelihood of the powerup dropping.
    pub weight: f32,
    /// How long the effect lasts. Zero marks an instant powerup.
    pub duration_ms: u64,
}

impl PowerupProfile {
    /// Duration of the effect.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Drop rates and magnitudes of powerups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupConfig {
    /// Chance that a melee kill drops a pickup.
    pub drop_chance: f64,
    /// How long a pickup waits to be collected.
    pub pickup_lifetime_ms: u64,
    /// Drop weight and duration of every powerup.
    pub entries: Vec<PowerupProfile>,
    /// Cooldown multiplier applied by the cooldown powerup.
    pub cooldown_factor: f64,
    /// Damage bonus applied by the attack powerup.
    pub attack_bonus: u32,
    /// Money multiplier applied by the money powerup.
    pub money_factor: f64,
    /// Damage the bomb deals to every living bug.
    pub bomb_damage: u32,
}

impl PowerupConfig {
    /// Looks up the profile of a powerup.
    #[must_use]
    pub fn profile(&self, kind: PowerupKind) -> Option<&PowerupProfile> {
        self.entries.iter().find(|profile| profile.kind == kind)
    }

    /// How long a pickup waits to be collected.
    #[must_use]
    pub fn pickup_lifetime(&self) -> Duration {
        Duration::from_millis(self.pickup_lifetime_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        probability("powerups.drop_chance", self.drop_chance)?;
        positive("powerups.cooldown_factor", self.cooldown_factor)?;
        positive("powerups.money_factor", self.money_factor)?;

        let mut total = 0.0_f32;
        for (index, entry) in self.entries.iter().enumerate() {
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    index,
                    weight: entry.weight,
                });
            }
            total += entry.weight;
        }
        if total <= 0.0 {
            return Err(ConfigError::EmptyPool("powerups"));
        }
        Ok(())
    }
}

impl Default for PowerupConfig {
    fn default() -> Self {
        let entry = |kind, weight, duration_ms| PowerupProfile {
            kind,
            weight,
            duration_ms,
        };
        Self {
            drop_chance: 0.1,
            pickup_lifetime_ms: 10_000,
            entries: vec![
                entry(PowerupKind::DecreaseCooldown, 3.0, 8_000),
                entry(PowerupKind::IncreaseAttack, 3.0, 8_000),
                entry(PowerupKind::IncreaseMoney, 3.0, 10_000),
                entry(PowerupKind::BigBugBomb, 1.0, 0),
            ],
            cooldown_factor: 0.5,
            attack_bonus: 2,
            money_factor: 2.0,
            bomb_damage: 1_000,
        }
    }
}

/// Level at which an ability unlocks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbilityUnlock {
    /// Ability being unlocked.
    pub ability: Ability,
    /// Level at which it unlocks.
    pub level: u32,
}

/// Display durations of visual effects and beam geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Perpendicular distance within which a beam strikes a bug centre.
    pub beam_hit_radius: f32,
    /// Shortest visible beam when a bug is struck.
    pub min_beam_length: f32,
    /// How long a beam stays visible.
    pub beam_ms: u64,
    /// How long a melee impact marker stays visible.
    pub impact_ms: u64,
    /// How long a splat stays visible.
    pub splat_ms: u64,
}

impl EffectConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("effects.beam_hit_radius", f64::from(self.beam_hit_radius))?;
        if !self.min_beam_length.is_finite() || self.min_beam_length < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "effects.min_beam_length".to_owned(),
                value: f64::from(self.min_beam_length),
            });
        }
        Ok(())
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            beam_hit_radius: 18.0,
            min_beam_length: 12.0,
            beam_ms: 150,
            impact_ms: 280,
            splat_ms: 800,
        }
    }
}

fn default_archetypes() -> Vec<ArchetypeProfile> {
    let weighted = |weights: [f32; 8]| {
        DirectionWeights::new(weights)
            .map(DirectionBias::Weighted)
            .unwrap_or(DirectionBias::Uniform)
    };
    vec![
        ArchetypeProfile {
            id: ArchetypeId::Ant,
            hp: 3,
            speed: 1.0,
            size: 32.0,
            reward: 1,
            score: 1,
            path_change_chance: 0.15,
            bias: DirectionBias::Uniform,
        },
        ArchetypeProfile {
            id: ArchetypeId::Fly,
            hp: 2,
            speed: 3.0,
            size: 24.0,
            reward: 2,
            score: 1,
            path_change_chance: 0.03,
            bias: DirectionBias::Uniform,
        },
        ArchetypeProfile {
            id: ArchetypeId::Roach,
            hp: 10,
            speed: 2.0,
            size: 48.0,
            reward: 5,
            score: 2,
            path_change_chance: 0.1,
            bias: weighted([1.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0, 1.0]),
        },
        ArchetypeProfile {
            id: ArchetypeId::Spider,
            hp: 60,
            speed: 1.5,
            size: 64.0,
            reward: 25,
            score: 5,
            path_change_chance: 0.05,
            bias: weighted([1.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0, 1.0]),
        },
    ]
}

fn default_weapons() -> Vec<WeaponProfile> {
    vec![
        WeaponProfile {
            kind: WeaponKind::Swatter,
            name: "Fly Swatter".to_owned(),
            damage: 1,
            cooldown_ms: 500,
            unlock_level: 1,
            attack: AttackProfile::Melee { hit_radius: 30.0 },
            reach_growth: ReachGrowth::Add { amount: 1.0 },
        },
        WeaponProfile {
            kind: WeaponKind::Hammer,
            name: "Hammer".to_owned(),
            damage: 10,
            cooldown_ms: 1_500,
            unlock_level: 2,
            attack: AttackProfile::Melee { hit_radius: 70.0 },
            reach_growth: ReachGrowth::Scale { factor: 1.3 },
        },
        WeaponProfile {
            kind: WeaponKind::Zapper,
            name: "Bug Zapper".to_owned(),
            damage: 2,
            cooldown_ms: 900,
            unlock_level: 3,
            attack: AttackProfile::Beam {
                max_distance: 600.0,
                chain_probability: 0.5,
                max_chain_depth: 3,
                chain_radius: 120.0,
            },
            reach_growth: ReachGrowth::Scale { factor: 1.1 },
        },
    ]
}

fn default_abilities() -> Vec<AbilityUnlock> {
    [
        (Ability::Bugserk, 2),
        (Ability::BugTape, 3),
        (Ability::BugDrone, 4),
        (Ability::ImmortalSnail, 5),
        (Ability::Singularity, 6),
        (Ability::Slapshot, 7),
    ]
    .into_iter()
    .map(|(ability, level)| AbilityUnlock { ability, level })
    .collect()
}

fn positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            field: field.to_owned(),
            value,
        })
    }
}

fn probability(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange {
            field: field.to_owned(),
            value,
        })
    }
}

fn complete<T>(
    table: &'static str,
    expected: &[T],
    present: impl Iterator<Item = T>,
) -> Result<(), ConfigError>
where
    T: Copy + PartialEq + std::fmt::Debug,
{
    let present: Vec<T> = present.collect();
    for (index, entry) in present.iter().enumerate() {
        if present[..index].contains(entry) {
            return Err(ConfigError::DuplicateEntry {
                table,
                entry: format!("{entry:?}"),
            });
        }
    }
    for entry in expected {
        if !present.contains(entry) {
            return Err(ConfigError::MissingEntry {
                table,
                entry: format!("{entry:?}"),
            });
        }
    }
    Ok(())
}
