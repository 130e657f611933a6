//! Upgrade shop bookkeeping shared across weapons.

use std::collections::{BTreeMap, BTreeSet};

use debugger_core::{config::UpgradeConfig, PurchaseError, RunState, UpgradeId, WeaponKind};

/// Key of the once-per-level lock. Weapon upgrades lock per weapon.
type LevelLock = (UpgradeId, Option<WeaponKind>);

/// Purchase history that is not tracked per weapon.
#[derive(Debug, Default)]
pub(crate) struct ShopLedger {
    bought_this_level: BTreeSet<LevelLock>,
    global_purchases: BTreeMap<UpgradeId, u32>,
}

/// Everything needed to judge a purchase request.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PurchaseContext {
    pub(crate) run_state: RunState,
    pub(crate) level: u32,
    pub(crate) money: f64,
    /// Weapon that weapon-specific upgrades apply to.
    pub(crate) weapon: WeaponKind,
    /// Purchases already made on the equipped weapon for this upgrade.
    pub(crate) weapon_purchases: u32,
}

impl ShopLedger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(upgrade: UpgradeId, context: &PurchaseContext) -> LevelLock {
        (upgrade, upgrade.is_weapon_specific().then_some(context.weapon))
    }

    fn purchases(&self, upgrade: UpgradeId, context: &PurchaseContext) -> u32 {
        if upgrade.is_weapon_specific() {
            context.weapon_purchases
        } else {
            self.global_purchases.get(&upgrade).copied().unwrap_or(0)
        }
    }

    /// Price of the next purchase, or `None` once the weapon is maxed.
    pub(crate) fn cost(
        &self,
        config: &UpgradeConfig,
        upgrade: UpgradeId,
        context: &PurchaseContext,
    ) -> Option<u32> {
        let purchases = self.purchases(upgrade, context);
        if upgrade.is_weapon_specific() && purchases >= config.weapon_purchase_cap {
            return None;
        }
        config
            .profile(upgrade)
            .map(|profile| profile.cost_after(purchases))
    }

    /// Judges a purchase without mutating anything. Returns the price on success.
    pub(crate) fn check(
        &self,
        config: &UpgradeConfig,
        upgrade: UpgradeId,
        context: &PurchaseContext,
    ) -> Result<u32, PurchaseError> {
        if context.run_state == RunState::Overrun {
            return Err(PurchaseError::RunOver);
        }

        let required_level = config
            .profile(upgrade)
            .map_or(u32::MAX, |profile| profile.required_level);
        if context.level < required_level {
            return Err(PurchaseError::Locked { required_level });
        }

        if upgrade.is_locked_per_level() && self
                .bought_this_level
                .contains(&Self::lock(upgrade, context)) {
            return Err(PurchaseError::AlreadyPurchasedThisLevel);
        }

        let cost = self
            .cost(config, upgrade, context)
            .ok_or(PurchaseError::Maxed)?;
        if context.money < f64::from(cost) {
            return Err(PurchaseError::InsufficientFunds {
                cost,
                available: context.money,
            });
        }

        Ok(cost)
    }

    /// Records a successful purchase.
    pub(crate) fn record(&mut self, upgrade: UpgradeId, context: &PurchaseContext) {
        if !upgrade.is_weapon_specific() {
            *self.global_purchases.entry(upgrade).or_insert(0) += 1;
        }
        if upgrade.is_locked_per_level() {
            let _ = self.bought_this_level.insert(Self::lock(upgrade, context));
        }
    }

    /// Lifts the once-per-level restriction.
    pub(crate) fn start_level(&mut self) {
        self.bought_this_level.clear();
    }
}
