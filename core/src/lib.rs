#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Debugger engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that systems and observers react to. Read-only views such as [`BugView`]
//! are the only way state leaves the world.

pub mod config;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{ConfigError, GameConfig};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "COMMENCE DEBUGGING!";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock and steps every living bug once.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a bug of the provided archetype enters the arena.
    SpawnBug {
        /// Archetype describing the bug's stats and movement bias.
        archetype: ArchetypeId,
        /// Requested top-left corner; the world clamps it into the arena.
        position: Vec2,
        /// Initial heading of the bug.
        heading: Compass,
    },
    /// Replaces the heading of a living bug.
    SteerBug {
        /// Identifier of the bug to steer.
        bug_id: BugId,
        /// Heading the bug should follow from the next step onward.
        heading: Compass,
    },
    /// Asks the equipped weapon to attack the provided arena-local point.
    Attack {
        /// Point selected by the player's cursor.
        point: Vec2,
    },
    /// Requests that the provided weapon becomes the equipped weapon.
    EquipWeapon {
        /// Weapon to equip.
        weapon: WeaponKind,
    },
    /// Requests the purchase of an upgrade.
    PurchaseUpgrade {
        /// Upgrade being purchased. Weapon upgrades target the equipped weapon.
        upgrade: UpgradeId,
    },
    /// Places a collectible powerup pickup into the arena.
    DropPickup {
        /// Powerup granted when the pickup is collected.
        kind: PowerupKind,
        /// Arena-local point the pickup is centred on.
        at: Vec2,
    },
    /// Collects a pickup, activating its powerup.
    CollectPickup {
        /// Identifier of the pickup being collected.
        pickup: PickupId,
    },
    /// Activates a powerup directly, bypassing pickups.
    ActivatePowerup {
        /// Powerup to activate.
        kind: PowerupKind,
    },
    /// Pauses or resumes the run.
    SetPaused {
        /// Whether the run should be paused.
        paused: bool,
    },
    /// Discards the current run and restores every default.
    ResetRun,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a bug entered the arena.
    BugSpawned {
        /// Identifier assigned to the bug.
        bug_id: BugId,
        /// Archetype of the bug.
        archetype: ArchetypeId,
        /// Top-left corner the bug occupies after clamping.
        position: Vec2,
    },
    /// Announces that a bug died. Emitted exactly once per bug.
    BugDied {
        /// Identifier of the bug that died.
        bug_id: BugId,
        /// Archetype of the bug.
        archetype: ArchetypeId,
        /// Centre of the bug at the moment of death.
        center: Vec2,
        /// Money reward credited for the kill before multipliers.
        reward: u32,
        /// Meter weight removed by the kill.
        score: u32,
    },
    /// Reports that the equipped weapon executed an attack.
    AttackResolved {
        /// Weapon that attacked.
        weapon: WeaponKind,
        /// Point the attack was aimed at.
        point: Vec2,
        /// Centres of bugs killed directly by a melee strike.
        killed_centers: Vec<Vec2>,
    },
    /// Reports a resolved beam segment for presentation.
    BeamCast {
        /// Geometry and outcome of the beam.
        trace: BeamTrace,
    },
    /// Reports the infestation meter after a change.
    MeterChanged {
        /// Current meter value.
        value: f64,
        /// Current meter capacity.
        max: f64,
    },
    /// Reports the player's funds after a change.
    FundsChanged {
        /// Money available, rounded to cents.
        money: f64,
    },
    /// Announces that the run advanced to a new level.
    LevelChanged {
        /// Level that became active.
        level: u32,
        /// Content unlocked at the new level.
        unlocks: UnlockSet,
    },
    /// Confirms that an upgrade was purchased.
    UpgradePurchased {
        /// Upgrade that was purchased.
        upgrade: UpgradeId,
        /// Weapon the upgrade applied to, for weapon-specific upgrades.
        weapon: Option<WeaponKind>,
        /// Price that was paid.
        cost: u32,
        /// Price of the next purchase, or `None` once maxed.
        next_cost: Option<u32>,
    },
    /// Reports that an upgrade purchase was rejected. State is unchanged.
    UpgradeRejected {
        /// Upgrade that was requested.
        upgrade: UpgradeId,
        /// Reason the purchase failed.
        reason: PurchaseError,
    },
    /// Confirms that a weapon became the equipped weapon.
    WeaponEquipped {
        /// Weapon now equipped.
        weapon: WeaponKind,
    },
    /// Reports that equipping a weapon was rejected because it is locked.
    EquipRejected {
        /// Weapon that was requested.
        weapon: WeaponKind,
        /// Level required to equip the weapon.
        required_level: u32,
    },
    /// Confirms that a pickup was placed in the arena.
    PickupDropped {
        /// Identifier assigned to the pickup.
        pickup: PickupId,
        /// Powerup granted by the pickup.
        kind: PowerupKind,
        /// Point the pickup is centred on.
        at: Vec2,
    },
    /// Confirms that a pickup was collected.
    PickupCollected {
        /// Identifier of the collected pickup.
        pickup: PickupId,
        /// Powerup granted by the pickup.
        kind: PowerupKind,
    },
    /// Reports that a pickup despawned without being collected.
    PickupExpired {
        /// Identifier of the pickup.
        pickup: PickupId,
    },
    /// Confirms that a powerup took effect.
    PowerupActivated {
        /// Powerup that was activated.
        kind: PowerupKind,
        /// Token identifying the activation, or `None` for instant powerups.
        token: Option<PowerupToken>,
    },
    /// Reports that a timed powerup expired and its effect was reverted.
    PowerupExpired {
        /// Powerup that expired.
        kind: PowerupKind,
        /// Token identifying the activation.
        token: PowerupToken,
    },
    /// Announces that the run entered a new state.
    RunStateChanged {
        /// State that became active.
        state: RunState,
    },
    /// Confirms that the run was reset to its defaults.
    RunReset,
}

/// Lifecycle state of a single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Bugs move, spawn, and input is accepted.
    Running,
    /// Movement and spawning are suspended until the run resumes.
    Paused,
    /// The infestation meter filled. Spawning and input are suppressed until reset.
    Overrun,
}

/// Eight compass headings in the order used by direction weight tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compass {
    /// Toward decreasing `y`.
    North,
    /// Diagonal between north and east.
    NorthEast,
    /// Toward increasing `x`.
    East,
    /// Diagonal between south and east.
    SouthEast,
    /// Toward increasing `y`.
    South,
    /// Diagonal between south and west.
    SouthWest,
    /// Toward decreasing `x`.
    West,
    /// Diagonal between north and west.
    NorthWest,
}

impl Compass {
    /// Every heading in weight-table order `[N, NE, E, SE, S, SW, W, NW]`.
    pub const ALL: [Compass; 8] = [
        Compass::North,
        Compass::NorthEast,
        Compass::East,
        Compass::SouthEast,
        Compass::South,
        Compass::SouthWest,
        Compass::West,
        Compass::NorthWest,
    ];

    /// Position of the heading within [`Compass::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Resolves a weight-table index back into a heading.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Unit vector of the heading in arena space, where `y` grows downward.
    #[must_use]
    pub fn unit_vector(self) -> Vec2 {
        let diagonal = std::f32::consts::FRAC_1_SQRT_2;
        match self {
            Self::North => Vec2::new(0.0, -1.0),
            Self::NorthEast => Vec2::new(diagonal, -diagonal),
            Self::East => Vec2::new(1.0, 0.0),
            Self::SouthEast => Vec2::new(diagonal, diagonal),
            Self::South => Vec2::new(0.0, 1.0),
            Self::SouthWest => Vec2::new(-diagonal, diagonal),
            Self::West => Vec2::new(-1.0, 0.0),
            Self::NorthWest => Vec2::new(-diagonal, -diagonal),
        }
    }

    /// Sprite facing angle in degrees for renderers whose art points north.
    #[must_use]
    pub fn facing_degrees(self) -> f32 {
        let vector = self.unit_vector();
        vector.y.atan2(vector.x).to_degrees() + 90.0
    }
}

/// Non-negative weights aligned with [`Compass::ALL`] whose total is positive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f32; 8]", into = "[f32; 8]")]
pub struct DirectionWeights([f32; 8]);

impl DirectionWeights {
    /// Validates the provided weights.
    ///
    /// Every weight must be finite and non-negative, and the weights must sum
    /// to a positive total so that a heading can always be drawn.
    pub fn new(weights: [f32; 8]) -> Result<Self, ConfigError> {
        for (index, weight) in weights.iter().copied().enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight { index, weight });
            }
        }

        if weights.iter().sum::<f32>() <= 0.0 {
            return Err(ConfigError::ZeroWeightSum);
        }

        Ok(Self(weights))
    }

    /// Equal weight for every heading.
    #[must_use]
    pub const fn uniform() -> Self {
        Self([1.0; 8])
    }

    /// Raw weights in [`Compass::ALL`] order.
    #[must_use]
    pub const fn get(&self) -> &[f32; 8] {
        &self.0
    }

    /// Sum of all weights. Always positive.
    #[must_use]
    pub fn total(&self) -> f32 {
        self.0.iter().sum()
    }
}

impl TryFrom<[f32; 8]> for DirectionWeights {
    type Error = ConfigError;

    fn try_from(weights: [f32; 8]) -> Result<Self, Self::Error> {
        Self::new(weights)
    }
}

impl From<DirectionWeights> for [f32; 8] {
    fn from(weights: DirectionWeights) -> Self {
        weights.0
    }
}

/// Strategy an archetype uses to pick a new heading.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionBias {
    /// Every heading is equally likely.
    Uniform,
    /// Headings are drawn proportionally to the provided weights.
    Weighted(DirectionWeights),
}

/// Bounded rectangle bugs move within, anchored at the origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    width: f32,
    height: f32,
}

impl ArenaBounds {
    /// Creates arena bounds with the provided dimensions in pixels.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width of the arena in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the arena in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Largest top-left corner an entity of the provided size may occupy.
    #[must_use]
    pub fn max_origin(&self, size: f32) -> Vec2 {
        Vec2::new((self.width - size).max(0.0), (self.height - size).max(0.0))
    }

    /// Clamps a top-left corner into `[0, width - size] x [0, height - size]`.
    ///
    /// The returned flag reports whether the corner touched or crossed an
    /// edge on either axis, which forces the entity to pick a new heading.
    #[must_use]
    pub fn clamp_origin(&self, origin: Vec2, size: f32) -> (Vec2, bool) {
        let max = self.max_origin(size);
        let mut clamped = origin;
        let mut touched = false;

        if clamped.x <= 0.0 {
            clamped.x = 0.0;
            touched = true;
        } else if clamped.x >= max.x {
            clamped.x = max.x;
            touched = true;
        }

        if clamped.y <= 0.0 {
            clamped.y = 0.0;
            touched = true;
        } else if clamped.y >= max.y {
            clamped.y = max.y;
            touched = true;
        }

        (clamped, touched)
    }

    /// Fixed emitter point for ranged weapons: the bottom-centre of the arena.
    #[must_use]
    pub fn emitter(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height)
    }
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Named configuration of bug stats and movement bias.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeId {
    /// Small, weak, jittery ground bug.
    Ant,
    /// Small, fast, erratic flyer.
    Fly,
    /// Large, tanky bug that drifts downward.
    Roach,
    /// High-tier bug drawn from the boss pool.
    Spider,
}

impl ArchetypeId {
    /// Every archetype known to the engine.
    pub const ALL: [ArchetypeId; 4] = [
        ArchetypeId::Ant,
        ArchetypeId::Fly,
        ArchetypeId::Roach,
        ArchetypeId::Spider,
    ];
}

/// Weapon archetypes available during a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Light melee weapon with a small radius.
    Swatter,
    /// Heavy melee weapon with a wide radius and long cooldown.
    Hammer,
    /// Ranged weapon casting chaining beams from the arena emitter.
    Zapper,
}

impl WeaponKind {
    /// Every weapon known to the engine.
    pub const ALL: [WeaponKind; 3] = [WeaponKind::Swatter, WeaponKind::Hammer, WeaponKind::Zapper];
}

/// Purchasable upgrades.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeId {
    /// Raises the equipped weapon's base damage.
    IncreaseAttack,
    /// Widens the equipped weapon's hit radius or beam reach.
    IncreaseRadius,
    /// Shortens the equipped weapon's base cooldown.
    DecreaseCooldown,
    /// Shortens ability cooldowns.
    DecreaseAbilityCooldown,
    /// Raises the permanent money multiplier.
    IncreaseMoney,
    /// Advances the run to the next level.
    LevelUp,
}

impl UpgradeId {
    /// Every upgrade known to the engine.
    pub const ALL: [UpgradeId; 6] = [
        UpgradeId::IncreaseAttack,
        UpgradeId::IncreaseRadius,
        UpgradeId::DecreaseCooldown,
        UpgradeId::DecreaseAbilityCooldown,
        UpgradeId::IncreaseMoney,
        UpgradeId::LevelUp,
    ];

    /// Reports whether the upgrade is tracked per weapon with a purchase cap.
    #[must_use]
    pub const fn is_weapon_specific(self) -> bool {
        matches!(
            self,
            Self::IncreaseAttack | Self::IncreaseRadius | Self::DecreaseCooldown
        )
    }

    /// Reports whether the upgrade may be bought only once per level.
    ///
    /// Levelling up is exempt so it can be chained within a single level.
    #[must_use]
    pub const fn is_locked_per_level(self) -> bool {
        !matches!(self, Self::LevelUp)
    }
}

/// Temporary powerups that drop from kills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerupKind {
    /// Multiplies the equipped weapon's cooldown by a factor below one.
    DecreaseCooldown,
    /// Adds a flat damage bonus to the equipped weapon.
    IncreaseAttack,
    /// Multiplies money earned from kills.
    IncreaseMoney,
    /// Deals massive damage to every living bug at once.
    BigBugBomb,
}

impl PowerupKind {
    /// Every powerup known to the engine.
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::DecreaseCooldown,
        PowerupKind::IncreaseAttack,
        PowerupKind::IncreaseMoney,
        PowerupKind::BigBugBomb,
    ];
}

/// Player abilities gated by level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    /// Sets the equipped weapon ablaze for double damage.
    Bugserk,
    /// Drops sticky sheets that slow bugs.
    BugTape,
    /// Deploys drones that occasionally strike.
    BugDrone,
    /// Summons a snail that slows time.
    ImmortalSnail,
    /// Pulls bugs toward a single point.
    Singularity,
    /// Forked finishing strike.
    Slapshot,
}

/// Unique identifier assigned to a bug.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BugId(u32);

impl BugId {
    /// Creates a new bug identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a powerup pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PickupId(u32);

impl PickupId {
    /// Creates a new pickup identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifies a single timed powerup activation.
///
/// The generation changes whenever the run resets, so tokens minted before a
/// reset never match state created after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PowerupToken {
    generation: u32,
    serial: u32,
}

impl PowerupToken {
    /// Creates a token from its generation and serial number.
    #[must_use]
    pub const fn new(generation: u32, serial: u32) -> Self {
        Self { generation, serial }
    }

    /// Run generation the token was minted in.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Serial number of the activation within its generation.
    #[must_use]
    pub const fn serial(&self) -> u32 {
        self.serial
    }
}

/// Reasons an upgrade purchase may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum PurchaseError {
    /// The run is overrun and awaits a reset.
    #[error("the run is over")]
    RunOver,
    /// The upgrade unlocks at a later level.
    #[error("requires level {required_level}")]
    Locked {
        /// Level at which the upgrade unlocks.
        required_level: u32,
    },
    /// The upgrade was already bought during the current level.
    #[error("already purchased during this level")]
    AlreadyPurchasedThisLevel,
    /// The weapon reached its purchase cap for this upgrade.
    #[error("upgrade is maxed for this weapon")]
    Maxed,
    /// The player cannot afford the upgrade.
    #[error("costs {cost} but only {available:.2} is available")]
    InsufficientFunds {
        /// Current price of the upgrade.
        cost: u32,
        /// Money available at the time of the request.
        available: f64,
    },
}

/// Resolved geometry of a single beam segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamTrace {
    /// Point the beam was cast from.
    pub origin: Vec2,
    /// Visible end point of the beam.
    pub end: Vec2,
    /// Chain depth; the original cast has depth zero.
    pub depth: u32,
    /// Bug struck by the beam, if any.
    pub struck: Option<BugId>,
}

impl BeamTrace {
    /// Visible length of the beam.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.origin.distance(self.end)
    }
}

/// Content unlocked at a given level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnlockSet {
    /// Weapons that may be equipped.
    pub weapons: Vec<WeaponKind>,
    /// Abilities available to the player.
    pub abilities: Vec<Ability>,
    /// Upgrades offered for purchase.
    pub upgrades: Vec<UpgradeId>,
}

impl UnlockSet {
    /// Reports whether the weapon is unlocked.
    #[must_use]
    pub fn has_weapon(&self, weapon: WeaponKind) -> bool {
        self.weapons.contains(&weapon)
    }

    /// Reports whether the upgrade is unlocked.
    #[must_use]
    pub fn has_upgrade(&self, upgrade: UpgradeId) -> bool {
        self.upgrades.contains(&upgrade)
    }
}

/// Immutable representation of a single bug's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct BugSnapshot {
    /// Unique identifier assigned to the bug.
    pub id: BugId,
    /// Archetype of the bug.
    pub archetype: ArchetypeId,
    /// Top-left corner of the bug in arena space.
    pub position: Vec2,
    /// Edge length of the bug's square footprint.
    pub size: f32,
    /// Current heading.
    pub heading: Compass,
    /// Distance travelled per tick.
    pub speed: f32,
    /// Remaining health.
    pub hp: i64,
    /// Health the bug spawned with.
    pub max_hp: i64,
    /// Chance per tick to pick a new heading without bouncing.
    pub path_change_chance: f32,
    /// Strategy used to pick new headings.
    pub bias: DirectionBias,
    /// Whether the bug touched the arena edge on its latest step.
    pub bounced: bool,
}

impl BugSnapshot {
    /// Canonical point used for hit-testing and chain targeting.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::splat(self.size / 2.0)
    }
}

/// Read-only snapshot describing all living bugs.
#[derive(Clone, Debug, Default)]
pub struct BugView {
    snapshots: Vec<BugSnapshot>,
}

impl BugView {
    /// Creates a new bug view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BugSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured bug snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &BugSnapshot> {
        self.snapshots.iter()
    }

    /// Retrieves the snapshot of the provided bug.
    #[must_use]
    pub fn get(&self, bug_id: BugId) -> Option<&BugSnapshot> {
        self.snapshots
            .binary_search_by_key(&bug_id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of bugs captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BugSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a weapon's stats used for display.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponSnapshot {
    /// Weapon archetype.
    pub kind: WeaponKind,
    /// Display name.
    pub name: String,
    /// Whether the weapon casts beams instead of striking a radius.
    pub ranged: bool,
    /// Base damage including permanent upgrades.
    pub damage: u32,
    /// Damage dealt right now, including temporary bonuses.
    pub effective_damage: u32,
    /// Hit radius for melee weapons or maximum beam distance for ranged ones.
    pub reach: f32,
    /// Base cooldown including permanent upgrades.
    pub cooldown: Duration,
    /// Cooldown applied right now, including temporary multipliers.
    pub effective_cooldown: Duration,
    /// Time until the next attack is accepted.
    pub ready_in: Duration,
}

/// Snapshot of the progression and economy counters.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressionSnapshot {
    /// Current level, starting at one.
    pub level: u32,
    /// Money available, rounded to cents.
    pub money: f64,
    /// Bugs killed during the run.
    pub bugs_killed: u32,
    /// Sum of the scores of every killed bug.
    pub score_total: u64,
    /// Current infestation meter value.
    pub meter_value: f64,
    /// Infestation meter capacity.
    pub meter_max: f64,
    /// Interval between spawns at the current level.
    pub spawn_interval: Duration,
    /// Roll above which spawns come from the boss pool.
    pub boss_threshold: f64,
    /// Combined permanent and temporary money multiplier.
    pub money_multiplier: f64,
    /// Accumulated ability cooldown reduction.
    pub ability_cooldown_reduction: Duration,
}

/// Price and availability of an upgrade for the equipped weapon.
#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeQuote {
    /// Upgrade being quoted.
    pub upgrade: UpgradeId,
    /// Current price, or `None` once the upgrade is maxed.
    pub cost: Option<u32>,
    /// Reason a purchase would be rejected right now, if any.
    pub blocked_by: Option<PurchaseError>,
}

/// Immutable representation of a pickup waiting to be collected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupSnapshot {
    /// Identifier of the pickup.
    pub id: PickupId,
    /// Powerup granted on collection.
    pub kind: PowerupKind,
    /// Point the pickup is centred on.
    pub at: Vec2,
    /// Time left before the pickup despawns.
    pub expires_in: Duration,
}

/// Timed powerup currently in effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerupSnapshot {
    /// Powerup in effect.
    pub kind: PowerupKind,
    /// Token identifying the activation.
    pub token: PowerupToken,
    /// Time left before the effect is reverted.
    pub remaining: Duration,
}

/// Transient visual produced by combat. Not authoritative state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VisualEffect {
    /// Melee hit marker sized to the weapon's radius.
    Impact {
        /// Point that was struck.
        point: Vec2,
        /// Radius of the strike.
        radius: f32,
    },
    /// Beam segment.
    Beam(BeamTrace),
    /// Squashed bug left where a bug died.
    Splat {
        /// Centre of the dead bug.
        center: Vec2,
        /// Archetype of the dead bug.
        archetype: ArchetypeId,
    },
}

/// Visual effect together with its remaining display time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectSnapshot {
    /// Effect being displayed.
    pub effect: VisualEffect,
    /// Time left before the effect is torn down.
    pub remaining: Duration,
}

/// Final figures of a run, suitable for leaderboard submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Level reached.
    pub level: u32,
    /// Money held at the end of the run.
    pub money: f64,
    /// Bugs killed.
    pub bugs_killed: u32,
    /// Total score of killed bugs.
    pub score_total: u64,
    /// State the run ended in.
    pub state: RunState,
}
