//! Timed powerup activations and collectible pickups.

use std::{collections::BTreeMap, time::Duration};

use debugger_core::{
    PickupId, PickupSnapshot, PowerupKind, PowerupSnapshot, PowerupToken, WeaponKind,
};
use glam::Vec2;

/// Timed powerup currently in effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ActivePowerup {
    pub(crate) token: PowerupToken,
    pub(crate) kind: PowerupKind,
    /// Weapon that received the modifier, for weapon powerups.
    pub(crate) weapon: Option<WeaponKind>,
    remaining: Duration,
}

/// Every timed powerup in effect, keyed by activation token.
#[derive(Debug, Default)]
pub(crate) struct PowerupLedger {
    generation: u32,
    next_serial: u32,
    active: Vec<ActivePowerup>,
    money_factors: Vec<(PowerupToken, f64)>,
}

impl PowerupLedger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a timed activation and returns its token.
    pub(crate) fn activate(
        &mut self,
        kind: PowerupKind,
        weapon: Option<WeaponKind>,
        duration: Duration,
    ) -> PowerupToken {
        let token = PowerupToken::new(self.generation, self.next_serial);
        self.next_serial = self.next_serial.wrapping_add(1);
        self.active.push(ActivePowerup {
            token,
            kind,
            weapon,
            remaining: duration,
        });
        token
    }

    pub(crate) fn push_money_factor(&mut self, token: PowerupToken, factor: f64) {
        self.money_factors.push((token, factor));
    }

    /// Product of every temporary money factor.
    pub(crate) fn money_factor(&self) -> f64 {
        self.money_factors.iter().map(|(_, factor)| factor).product()
    }

    /// Ages every activation and returns the ones that ran out.
    ///
    /// Money factors owned by expired activations are removed here. Weapon
    /// modifiers are left for the caller to revoke.
    pub(crate) fn advance(&mut self, dt: Duration) -> Vec<ActivePowerup> {
        let mut expired = Vec::new();
        self.active.retain_mut(|powerup| {
            powerup.remaining = powerup.remaining.saturating_sub(dt);
            if powerup.remaining.is_zero() {
                expired.push(*powerup);
                false
            } else {
                true
            }
        });

        for powerup in &expired {
            self.revoke_money_factor(powerup.token);
        }
        expired
    }

    fn revoke_money_factor(&mut self, token: PowerupToken) {
        if token.generation() != self.generation {
            return;
        }
        self.money_factors.retain(|(owner, _)| *owner != token);
    }

    /// Forgets every activation and invalidates outstanding tokens.
    pub(crate) fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.next_serial = 0;
        self.active.clear();
        self.money_factors.clear();
    }

    pub(crate) fn snapshots(&self) -> Vec<PowerupSnapshot> {
        self.active
            .iter()
            .map(|powerup| PowerupSnapshot {
                kind: powerup.kind,
                token: powerup.token,
                remaining: powerup.remaining,
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
struct Pickup {
    kind: PowerupKind,
    at: Vec2,
    remaining: Duration,
}

/// Pickups lying in the arena waiting to be collected.
#[derive(Debug)]
pub(crate) struct PickupField {
    entries: BTreeMap<PickupId, Pickup>,
    next_pickup_id: PickupId,
}

impl PickupField {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_pickup_id: PickupId::new(0),
        }
    }

    pub(crate) fn drop_at(&mut self, kind: PowerupKind, at: Vec2, lifetime: Duration) -> PickupId {
        let id = self.next_pickup_id;
        self.next_pickup_id = PickupId::new(id.get().wrapping_add(1));
        let _ = self.entries.insert(
            id,
            Pickup {
                kind,
                at,
                remaining: lifetime,
            },
        );
        id
    }

    /// Removes a pickup, returning the powerup it grants.
    pub(crate) fn collect(&mut self, pickup: PickupId) -> Option<PowerupKind> {
        self.entries.remove(&pickup).map(|entry| entry.kind)
    }

    /// Ages every pickup and returns the identifiers of those that despawned.
    pub(crate) fn advance(&mut self, dt: Duration) -> Vec<PickupId> {
        let mut expired = Vec::new();
        for (id, pickup) in &mut self.entries {
            pickup.remaining = pickup.remaining.saturating_sub(dt);
            if pickup.remaining.is_zero() {
                expired.push(*id);
            }
        }
        for id in &expired {
            let _ = self.entries.remove(id);
        }
        expired
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn snapshots(&self) -> Vec<PickupSnapshot> {
        self.entries
            .iter()
            .map(|(id, pickup)| PickupSnapshot {
                id: *id,
                kind: pickup.kind,
                at: pickup.at,
                expires_in: pickup.remaining,
            })
            .collect()
    }
}
