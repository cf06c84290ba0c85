//! Gacha economy: escalating summon costs, the upgrade track, and the wallet.
//!
//! The summon cost climbs linearly with every completed draw and snaps back
//! on session reset. The upgrade track converts spent currency into permanent
//! base-rate deltas; its level is injected at construction from whatever the
//! save collaborator persisted.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::constants::{
    BASE_SUMMON_COST, BASE_UPGRADE_COST, MAX_UPGRADE_LEVEL, SUMMON_COST_INCREASE,
    UPGRADE_COST_PER_LEVEL,
};
use crate::rarity::Rarity;
use crate::rates::RateAdjustments;

/// Errors surfaced by upgrade purchases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpgradeError {
    #[error("upgrade costs {needed} but only {available} is available")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error("already at max upgrade level {0}")]
    MaxLevel(u8),
}

/// Simple currency ledger for one side.
///
/// The persisted balance is injected at construction; the core never touches
/// storage itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wallet {
    balance: u64,
}

impl Wallet {
    /// Wallet seeded with a persisted balance.
    pub fn new(balance: u64) -> Self {
        Self { balance }
    }

    /// Current balance.
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Add earned currency.
    pub fn earn(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Deduct `amount` if affordable; false leaves the balance untouched.
    pub fn try_spend(&mut self, amount: u64) -> bool {
        if self.balance >= amount {
            self.balance -= amount;
            true
        } else {
            false
        }
    }
}

/// Escalating per-draw summon price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummonCost {
    base_cost: u64,
    increase_per_draw: u64,
    draws_since_reset: u64,
}

impl Default for SummonCost {
    fn default() -> Self {
        Self::new(BASE_SUMMON_COST, SUMMON_COST_INCREASE)
    }
}

impl SummonCost {
    /// Cost schedule starting at `base_cost`, climbing by `increase_per_draw`.
    pub fn new(base_cost: u64, increase_per_draw: u64) -> Self {
        Self {
            base_cost,
            increase_per_draw,
            draws_since_reset: 0,
        }
    }

    /// Price of the next draw.
    pub fn current_cost(&self) -> u64 {
        self.base_cost + self.draws_since_reset * self.increase_per_draw
    }

    /// Draws completed since the last reset.
    pub fn draws_since_reset(&self) -> u64 {
        self.draws_since_reset
    }

    /// Bump the counter after a completed draw.
    ///
    /// Deducting the price itself is the wallet's job; this only defines what
    /// the next draw will charge.
    pub fn record_draw(&mut self) {
        self.draws_since_reset += 1;
    }

    /// Snap the price back to base (level restart / new session).
    pub fn reset(&mut self) {
        self.draws_since_reset = 0;
    }
}

/// Per-rarity base-rate deltas for upgrade levels 0 through 10.
///
/// Columns are Common, Rare, Epic, Legendary, Mythic; Boss is never modified
/// by upgrades. Each row sums to zero so upgrades reshape odds rather than
/// inflate them.
pub const DEFAULT_UPGRADE_DELTAS: [[f32; 5]; 11] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [-2.0, 1.0, 0.6, 0.3, 0.1],
    [-4.0, 2.0, 1.2, 0.6, 0.2],
    [-6.0, 3.0, 1.8, 0.9, 0.3],
    [-8.0, 4.0, 2.4, 1.2, 0.4],
    [-10.0, 5.0, 3.0, 1.5, 0.5],
    [-12.0, 6.0, 3.6, 1.8, 0.6],
    [-14.0, 7.0, 4.2, 2.1, 0.7],
    [-16.0, 8.0, 4.8, 2.4, 0.8],
    [-18.0, 9.0, 5.4, 2.7, 0.9],
    [-20.0, 10.0, 6.0, 3.0, 1.0],
];

/// Upgrade level and its cost schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeTrack {
    level: u8,
    base_cost: u64,
    per_level_increment: u64,
    max_level: u8,
    deltas: Vec<[f32; 5]>,
}

impl Default for UpgradeTrack {
    fn default() -> Self {
        Self::new(0)
    }
}

impl UpgradeTrack {
    /// Track resumed at a persisted `level` with the default schedule.
    pub fn new(level: u8) -> Self {
        Self::with_schedule(
            level,
            BASE_UPGRADE_COST,
            UPGRADE_COST_PER_LEVEL,
            DEFAULT_UPGRADE_DELTAS.to_vec(),
        )
    }

    /// Track with a custom cost schedule and delta table.
    ///
    /// The table holds one row per level from 0 to its max; the max level is
    /// `rows - 1`, capped at [`MAX_UPGRADE_LEVEL`]. An empty table (rejected
    /// at config load, but reachable through direct construction) degrades to
    /// a single all-zero row: no upgrades purchasable, no deltas applied.
    pub fn with_schedule(
        level: u8,
        base_cost: u64,
        per_level_increment: u64,
        mut deltas: Vec<[f32; 5]>,
    ) -> Self {
        if deltas.is_empty() {
            warn!("empty upgrade delta table, upgrades disabled");
            deltas.push([0.0; 5]);
        }
        let max_level = ((deltas.len() - 1) as u8).min(MAX_UPGRADE_LEVEL);
        Self {
            level: level.min(max_level),
            base_cost,
            per_level_increment,
            max_level,
            deltas,
        }
    }

    /// Current upgrade level.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Highest purchasable level.
    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    /// Price of the next upgrade; `None` once maxed (treated as infinite).
    pub fn next_cost(&self) -> Option<u64> {
        if self.level >= self.max_level {
            None
        } else {
            Some(self.base_cost + u64::from(self.level) * self.per_level_increment)
        }
    }

    /// Buy the next level out of `wallet`.
    pub fn purchase(&mut self, wallet: &mut Wallet) -> Result<u8, UpgradeError> {
        let cost = self.next_cost().ok_or(UpgradeError::MaxLevel(self.max_level))?;
        if !wallet.try_spend(cost) {
            return Err(UpgradeError::InsufficientFunds {
                needed: cost,
                available: wallet.balance(),
            });
        }
        self.level += 1;
        Ok(self.level)
    }

    /// Base-rate deltas for the current level.
    pub fn rate_deltas(&self) -> RateAdjustments {
        let row = &self.deltas[usize::from(self.level)];
        let mut adjustments = RateAdjustments::none();
        adjustments.add(Rarity::Common, row[0]);
        adjustments.add(Rarity::Rare, row[1]);
        adjustments.add(Rarity::Epic, row[2]);
        adjustments.add(Rarity::Legendary, row[3]);
        adjustments.add(Rarity::Mythic, row[4]);
        adjustments
    }

    /// Explicit reset back to level 0.
    pub fn reset(&mut self) {
        self.level = 0;
    }
}
