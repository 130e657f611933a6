//! Authoritative bug state and identifier allocation.

use std::collections::BTreeMap;

use debugger_core::{
    config::ArchetypeProfile, ArchetypeId, ArenaBounds, BugId, BugSnapshot, Compass,
    DirectionBias,
};
use glam::Vec2;

/// Notice produced the single time a bug's health drops to zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DeathNotice {
    pub(crate) bug_id: BugId,
    pub(crate) archetype: ArchetypeId,
    pub(crate) center: Vec2,
    pub(crate) reward: u32,
    pub(crate) score: u32,
}

/// Bug living inside the arena.
#[derive(Clone, Debug)]
pub(crate) struct Bug {
    id: BugId,
    archetype: ArchetypeId,
    position: Vec2,
    size: f32,
    heading: Compass,
    speed: f32,
    hp: i64,
    max_hp: i64,
    reward: u32,
    score: u32,
    path_change_chance: f32,
    bias: DirectionBias,
    bounced: bool,
    alive: bool,
}

impl Bug {
    fn spawn(id: BugId, profile: &ArchetypeProfile, position: Vec2, heading: Compass) -> Self {
        let hp = i64::from(profile.hp);
        Self {
            id,
            archetype: profile.id,
            position,
            size: profile.size,
            heading,
            speed: profile.speed,
            hp,
            max_hp: hp,
            reward: profile.reward,
            score: profile.score,
            path_change_chance: profile.path_change_chance,
            bias: profile.bias,
            bounced: false,
            alive: true,
        }
    }

    pub(crate) fn id(&self) -> BugId {
        self.id
    }

    pub(crate) fn center(&self) -> Vec2 {
        self.position + Vec2::splat(self.size / 2.0)
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive
    }

    /// Moves the bug one step along its heading and clamps it into the arena.
    pub(crate) fn step(&mut self, arena: &ArenaBounds) {
        let target = self.position + self.heading.unit_vector() * self.speed;
        let (clamped, touched) = arena.clamp_origin(target, self.size);
        self.position = clamped;
        self.bounced = touched;
    }

    pub(crate) fn steer(&mut self, heading: Compass) {
        self.heading = heading;
        self.bounced = false;
    }

    /// Subtracts health and reports the death exactly once.
    pub(crate) fn take_damage(&mut self, amount: u32) -> Option<DeathNotice> {
        if !self.alive {
            return None;
        }

        self.hp = self.hp.saturating_sub(i64::from(amount));
        if self.hp > 0 {
            return None;
        }

        self.alive = false;
        Some(DeathNotice {
            bug_id: self.id,
            archetype: self.archetype,
            center: self.center(),
            reward: self.reward,
            score: self.score,
        })
    }

    pub(crate) fn snapshot(&self) -> BugSnapshot {
        BugSnapshot {
            id: self.id,
            archetype: self.archetype,
            position: self.position,
            size: self.size,
            heading: self.heading,
            speed: self.speed,
            hp: self.hp,
            max_hp: self.max_hp,
            path_change_chance: self.path_change_chance,
            bias: self.bias,
            bounced: self.bounced,
        }
    }
}

/// Registry that stores bugs and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct BugRegistry {
    entries: BTreeMap<BugId, Bug>,
    next_bug_id: BugId,
}

impl BugRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_bug_id: BugId::new(0),
        }
    }

    /// Inserts a bug at an already clamped position and returns its identifier.
    pub(crate) fn spawn(
        &mut self,
        profile: &ArchetypeProfile,
        position: Vec2,
        heading: Compass,
    ) -> BugId {
        let id = self.next_bug_id;
        self.next_bug_id = BugId::new(id.get().wrapping_add(1));
        let _ = self
            .entries
            .insert(id, Bug::spawn(id, profile, position, heading));
        id
    }

    pub(crate) fn get_mut(&mut self, bug_id: BugId) -> Option<&mut Bug> {
        self.entries.get_mut(&bug_id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Bug> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Bug> {
        self.entries.values_mut()
    }

    /// Nearest living bug whose centre lies within `radius` of `point`.
    ///
    /// Ties resolve to the lowest identifier.
    pub(crate) fn nearest_living_within(&self, point: Vec2, radius: f32) -> Option<(BugId, Vec2)> {
        let limit = radius * radius;
        let mut best: Option<(f32, BugId, Vec2)> = None;
        for bug in self.entries.values().filter(|bug| bug.alive) {
            let center = bug.center();
            let distance = center.distance_squared(point);
            if distance > limit {
                continue;
            }
            match best {
                Some((closest, _, _)) if closest <= distance => {}
                _ => best = Some((distance, bug.id, center)),
            }
        }
        best.map(|(_, id, center)| (id, center))
    }

    pub(crate) fn release(&mut self, bug_id: BugId) {
        let _ = self.entries.remove(&bug_id);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_bug_id = BugId::new(0);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
