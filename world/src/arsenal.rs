//! Weapon state, permanent upgrades and temporary powerup modifiers.

use std::{collections::BTreeMap, time::Duration};

use debugger_core::{
    config::{AttackProfile, ReachGrowth, WeaponProfile},
    ArenaBounds, BeamTrace, PowerupToken, UpgradeId, WeaponKind, WeaponSnapshot,
};
use glam::Vec2;
use rand::Rng;

use crate::{
    bugs::{BugRegistry, DeathNotice},
    combat::{self, BeamGeometry, BeamSettings},
};

/// Shortest cooldown a weapon can reach through temporary multipliers.
const MIN_EFFECTIVE_COOLDOWN: Duration = Duration::from_millis(50);

/// How a weapon resolves an attack.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum AttackStrategy {
    Melee { hit_radius: f32 },
    Beam(BeamSettings),
}

impl AttackStrategy {
    fn from_profile(profile: &AttackProfile) -> Self {
        match *profile {
            AttackProfile::Melee { hit_radius } => Self::Melee { hit_radius },
            AttackProfile::Beam {
                max_distance,
                chain_probability,
                max_chain_depth,
                chain_radius,
            } => Self::Beam(BeamSettings {
                max_distance,
                chain_probability,
                max_chain_depth,
                chain_radius,
            }),
        }
    }

    fn reach(&self) -> f32 {
        match self {
            Self::Melee { hit_radius } => *hit_radius,
            Self::Beam(settings) => settings.max_distance,
        }
    }

    fn grow(&mut self, growth: ReachGrowth) {
        match self {
            Self::Melee { hit_radius } => *hit_radius = growth.apply(*hit_radius),
            Self::Beam(settings) => settings.max_distance = growth.apply(settings.max_distance),
        }
    }
}

/// Result of a single attack request.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct AttackOutcome {
    /// Whether the weapon was ready and consumed its cooldown.
    pub(crate) did_attack: bool,
    /// Centres of bugs killed directly by a melee strike.
    pub(crate) killed_centers: Vec<Vec2>,
    /// Every death caused by the attack, including chained beams.
    pub(crate) deaths: Vec<DeathNotice>,
    /// Beam segments cast by the attack in cast order.
    pub(crate) beams: Vec<BeamTrace>,
}

/// Weapon owned by the player for the duration of a run.
#[derive(Clone, Debug)]
pub(crate) struct Weapon {
    kind: WeaponKind,
    name: String,
    damage: u32,
    cooldown: Duration,
    strategy: AttackStrategy,
    reach_growth: ReachGrowth,
    last_attack: Option<Duration>,
    damage_bonuses: Vec<(PowerupToken, u32)>,
    cooldown_factors: Vec<(PowerupToken, f64)>,
    purchases: BTreeMap<UpgradeId, u32>,
}

impl Weapon {
    pub(crate) fn from_profile(profile: &WeaponProfile) -> Self {
        Self {
            kind: profile.kind,
            name: profile.name.clone(),
            damage: profile.damage,
            cooldown: Duration::from_millis(profile.cooldown_ms),
            strategy: AttackStrategy::from_profile(&profile.attack),
            reach_growth: profile.reach_growth,
            last_attack: None,
            damage_bonuses: Vec::new(),
            cooldown_factors: Vec::new(),
            purchases: BTreeMap::new(),
        }
    }

    pub(crate) fn strategy(&self) -> &AttackStrategy {
        &self.strategy
    }

    /// Base damage plus every active temporary bonus.
    pub(crate) fn effective_damage(&self) -> u32 {
        self.damage_bonuses
            .iter()
            .fold(self.damage, |damage, (_, bonus)| damage.saturating_add(*bonus))
    }

    /// Base cooldown scaled by every active multiplier, never below 50ms.
    pub(crate) fn effective_cooldown(&self) -> Duration {
        let factor: f64 = self.cooldown_factors.iter().map(|(_, factor)| factor).product();
        let millis = (self.cooldown.as_millis() as f64 * factor).round();
        Duration::from_millis(millis.max(0.0) as u64).max(MIN_EFFECTIVE_COOLDOWN)
    }

    pub(crate) fn ready_in(&self, now: Duration) -> Duration {
        match self.last_attack {
            None => Duration::ZERO,
            Some(last) => (last + self.effective_cooldown()).saturating_sub(now),
        }
    }

    /// Attacks the provided point if the cooldown has elapsed.
    ///
    /// A ready weapon always consumes its cooldown, even when the attack
    /// resolves to nothing.
    pub(crate) fn try_attack<R: Rng>(
        &mut self,
        point: Vec2,
        bugs: &mut BugRegistry,
        arena: &ArenaBounds,
        geometry: &BeamGeometry,
        rng: &mut R,
        now: Duration,
    ) -> AttackOutcome {
        if !self.ready_in(now).is_zero() {
            return AttackOutcome::default();
        }
        self.last_attack = Some(now);

        let damage = self.effective_damage();
        match &self.strategy {
            AttackStrategy::Melee { hit_radius } => {
                let (killed_centers, deaths) = combat::melee_strike(bugs, point, *hit_radius, damage);
                AttackOutcome {
                    did_attack: true,
                    killed_centers,
                    deaths,
                    beams: Vec::new(),
                }
            }
            AttackStrategy::Beam(settings) => {
                let (beams, deaths) =
                    combat::cast_beam(bugs, arena.emitter(), point, settings, geometry, damage, rng);
                AttackOutcome {
                    did_attack: true,
                    killed_centers: Vec::new(),
                    deaths,
                    beams,
                }
            }
        }
    }

    pub(crate) fn purchases(&self, upgrade: UpgradeId) -> u32 {
        self.purchases.get(&upgrade).copied().unwrap_or(0)
    }

    pub(crate) fn record_purchase(&mut self, upgrade: UpgradeId) {
        *self.purchases.entry(upgrade).or_insert(0) += 1;
    }

    pub(crate) fn add_damage(&mut self, amount: u32) {
        self.damage = self.damage.saturating_add(amount);
    }

    pub(crate) fn grow_reach(&mut self) {
        self.strategy.grow(self.reach_growth);
    }

    pub(crate) fn shorten_cooldown(&mut self, step: Duration, floor: Duration) {
        self.cooldown = self.cooldown.saturating_sub(step).max(floor);
    }

    pub(crate) fn push_damage_bonus(&mut self, token: PowerupToken, bonus: u32) {
        self.damage_bonuses.push((token, bonus));
    }

    pub(crate) fn push_cooldown_factor(&mut self, token: PowerupToken, factor: f64) {
        self.cooldown_factors.push((token, factor));
    }

    /// Removes every modifier installed under the token.
    pub(crate) fn revoke(&mut self, token: PowerupToken) {
        self.damage_bonuses.retain(|(owner, _)| *owner != token);
        self.cooldown_factors.retain(|(owner, _)| *owner != token);
    }

    pub(crate) fn snapshot(&self, now: Duration) -> WeaponSnapshot {
        WeaponSnapshot {
            kind: self.kind,
            name: self.name.clone(),
            ranged: matches!(self.strategy, AttackStrategy::Beam(_)),
            damage: self.damage,
            effective_damage: self.effective_damage(),
            reach: self.strategy.reach(),
            cooldown: self.cooldown,
            effective_cooldown: self.effective_cooldown(),
            ready_in: self.ready_in(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debugger_core::{ArchetypeId, Compass, GameConfig};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn weapon(kind: WeaponKind) -> Weapon {
        Weapon::from_profile(GameConfig::default().weapon(kind).expect("weapon profile"))
    }

    fn geometry() -> BeamGeometry {
        BeamGeometry {
            hit_radius: 18.0,
            min_length: 12.0,
        }
    }

    #[test]
    fn unused_weapon_is_ready_immediately() {
        let swatter = weapon(WeaponKind::Swatter);
        assert_eq!(swatter.ready_in(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn cooldown_gates_follow_up_attacks() {
        let mut swatter = weapon(WeaponKind::Swatter);
        let mut bugs = BugRegistry::new();
        let arena = ArenaBounds::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let point = Vec2::new(100.0, 100.0);

        let first = swatter.try_attack(point, &mut bugs, &arena, &geometry(), &mut rng, Duration::ZERO);
        assert!(first.did_attack);

        let early = swatter.try_attack(
            point,
            &mut bugs,
            &arena,
            &geometry(),
            &mut rng,
            Duration::from_millis(499),
        );
        assert!(!early.did_attack);

        let ready = swatter.try_attack(
            point,
            &mut bugs,
            &arena,
            &geometry(),
            &mut rng,
            Duration::from_millis(500),
        );
        assert!(ready.did_attack);
    }

    #[test]
    fn melee_attack_reports_kill_centres() {
        let config = GameConfig::default();
        let ant = config.archetype(ArchetypeId::Ant).expect("ant");
        let mut hammer = weapon(WeaponKind::Hammer);
        let mut bugs = BugRegistry::new();
        let near = bugs.spawn(ant, Vec2::new(100.0, 100.0), Compass::North);
        let _far = bugs.spawn(ant, Vec2::new(400.0, 400.0), Compass::North);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = hammer.try_attack(
            Vec2::new(116.0, 116.0),
            &mut bugs,
            &ArenaBounds::default(),
            &geometry(),
            &mut rng,
            Duration::ZERO,
        );

        assert!(outcome.did_attack);
        assert_eq!(outcome.killed_centers, vec![Vec2::new(116.0, 116.0)]);
        assert_eq!(outcome.deaths.len(), 1);
        assert_eq!(outcome.deaths[0].bug_id, near);
        assert!(outcome.beams.is_empty());
    }

    #[test]
    fn temporary_modifiers_revert_exactly() {
        let mut swatter = weapon(WeaponKind::Swatter);
        let first = PowerupToken::new(0, 0);
        let second = PowerupToken::new(0, 1);

        swatter.push_cooldown_factor(first, 0.5);
        swatter.push_damage_bonus(first, 2);
        swatter.push_cooldown_factor(second, 0.5);
        assert_eq!(swatter.effective_cooldown(), Duration::from_millis(125));
        assert_eq!(swatter.effective_damage(), 3);

        swatter.revoke(first);
        assert_eq!(swatter.effective_cooldown(), Duration::from_millis(250));
        assert_eq!(swatter.effective_damage(), 1);

        swatter.revoke(second);
        assert_eq!(swatter.effective_cooldown(), Duration::from_millis(500));
    }

    #[test]
    fn effective_cooldown_never_drops_below_floor() {
        let mut swatter = weapon(WeaponKind::Swatter);
        for serial in 0..8 {
            swatter.push_cooldown_factor(PowerupToken::new(0, serial), 0.5);
        }
        assert_eq!(swatter.effective_cooldown(), MIN_EFFECTIVE_COOLDOWN);
    }

    #[test]
    fn radius_growth_depends_on_weapon() {
        let mut swatter = weapon(WeaponKind::Swatter);
        swatter.grow_reach();
        assert_eq!(swatter.strategy().reach(), 31.0);

        let mut hammer = weapon(WeaponKind::Hammer);
        hammer.grow_reach();
        assert!((hammer.strategy().reach() - 91.0).abs() < 1e-3);
    }

    #[test]
    fn permanent_cooldown_upgrades_respect_floor() {
        let mut swatter = weapon(WeaponKind::Swatter);
        for _ in 0..10 {
            swatter.shorten_cooldown(Duration::from_millis(100), Duration::from_millis(100));
        }
        assert_eq!(swatter.snapshot(Duration::ZERO).cooldown, Duration::from_millis(100));
    }
}
