//! Drop-rate computation and rarity selection.
//!
//! A rate set maps each rarity tier to a percentage. Every evaluation rebuilds
//! the set from the configured base rates, applies the upgrade-level deltas,
//! then the history and reactive adjustments, and renormalizes back to 100.
//! Nothing is compounded across evaluations.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{RATE_SUM_TOLERANCE, RATE_TOTAL};
use crate::rarity::Rarity;

/// Signed per-rarity percentage deltas produced by the balancing mechanisms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RateAdjustments {
    deltas: [f32; Rarity::COUNT],
}

impl RateAdjustments {
    /// An all-zero adjustment.
    pub fn none() -> Self {
        Self::default()
    }

    /// Delta for one tier.
    pub fn get(&self, rarity: Rarity) -> f32 {
        self.deltas[rarity.index()]
    }

    /// Add to one tier's delta.
    pub fn add(&mut self, rarity: Rarity, delta: f32) {
        self.deltas[rarity.index()] += delta;
    }

    /// Move `amount` points from `from` to the tier above it.
    ///
    /// No-op for the top tier; there is nothing above Boss to boost.
    pub fn shift_up(&mut self, from: Rarity, amount: f32) {
        if let Some(next) = from.next_tier() {
            self.add(from, -amount);
            self.add(next, amount);
        }
    }

    /// Sum both adjustment sets tier by tier.
    pub fn combined(mut self, other: &RateAdjustments) -> Self {
        for (d, o) in self.deltas.iter_mut().zip(other.deltas.iter()) {
            *d += o;
        }
        self
    }

    /// True when every delta is zero.
    pub fn is_zero(&self) -> bool {
        self.deltas.iter().all(|d| *d == 0.0)
    }
}

/// Normalized mapping of rarity tier to drop percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropRateSet {
    rates: [f32; Rarity::COUNT],
}

impl DropRateSet {
    /// Build a rate set from raw percentages in tier order.
    ///
    /// Values are clamped to be non-negative but not normalized; call
    /// [`DropRateSet::normalized`] before selecting from it.
    pub fn from_raw(rates: [f32; Rarity::COUNT]) -> Self {
        let mut set = Self { rates };
        for r in &mut set.rates {
            *r = r.max(0.0);
        }
        set
    }

    /// All-zero rate set (degenerate).
    pub fn zero() -> Self {
        Self {
            rates: [0.0; Rarity::COUNT],
        }
    }

    /// Percentage for one tier.
    pub fn get(&self, rarity: Rarity) -> f32 {
        self.rates[rarity.index()]
    }

    /// Sum of all tier percentages.
    pub fn total(&self) -> f32 {
        self.rates.iter().sum()
    }

    /// True when every tier sits at zero; selection must fall back to Common.
    pub fn is_degenerate(&self) -> bool {
        self.total() <= 0.0
    }

    /// Whether the set sums to the normalization target within tolerance.
    pub fn is_normalized(&self) -> bool {
        (self.total() - RATE_TOTAL).abs() <= RATE_SUM_TOLERANCE
    }

    /// Apply signed adjustments, flooring every tier at zero.
    pub fn adjusted(mut self, adjustments: &RateAdjustments) -> Self {
        for rarity in Rarity::ALL {
            let i = rarity.index();
            self.rates[i] = (self.rates[i] + adjustments.get(rarity)).max(0.0);
        }
        self
    }

    /// Clamp every tier into `[0, 100]`.
    pub fn clamped(mut self) -> Self {
        for r in &mut self.rates {
            *r = r.clamp(0.0, RATE_TOTAL);
        }
        self
    }

    /// Scale all tiers so they sum to exactly 100.
    ///
    /// A degenerate all-zero set is returned unchanged; the caller treats it
    /// as a guaranteed-Common fallback.
    pub fn normalized(mut self) -> Self {
        let total = self.total();
        if total <= 0.0 {
            return self;
        }
        let scale = RATE_TOTAL / total;
        for r in &mut self.rates {
            *r *= scale;
        }
        self
    }

    /// Select a rarity via a cumulative walk over the tier order.
    ///
    /// Draws a uniform roll in `[0, total)` and returns the first tier whose
    /// running total exceeds it. Falls back to Common both for degenerate
    /// sets and for the floating-point edge where no tier matched.
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> Rarity {
        let total = self.total();
        if total <= 0.0 {
            return Rarity::Common;
        }
        let roll: f32 = rng.gen_range(0.0..total);
        let mut accumulated = 0.0;
        for rarity in Rarity::ALL {
            accumulated += self.get(rarity);
            if roll < accumulated {
                return rarity;
            }
        }
        Rarity::Common
    }
}

/// Rebuild the effective rate set for one draw evaluation.
///
/// Pipeline: base rates, plus upgrade deltas, clamped to `[0, 100]`, plus
/// draw-history, time-history, and reactive adjustments in that order, then
/// renormalized. Returns the degenerate set untouched when everything
/// cancels to zero.
pub fn compute_rates(
    base: &DropRateSet,
    upgrade_deltas: &RateAdjustments,
    draw_adjustments: &RateAdjustments,
    time_adjustments: &RateAdjustments,
    reactive_adjustments: &RateAdjustments,
) -> DropRateSet {
    let history = draw_adjustments
        .combined(time_adjustments)
        .combined(reactive_adjustments);
    base.adjusted(upgrade_deltas)
        .clamped()
        .adjusted(&history)
        .normalized()
}
