//! Reactive boost counter-balance.
//!
//! When the opposing side lands a high-rarity spawn, the affected side gets a
//! temporary skew toward that tier: each of its next N draws is computed with
//! the boosted tier raised and Common/Rare suppressed. A fresh activation
//! while a boost is running overwrites the target and restarts the counter;
//! boosts never stack.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{BOOST_AMOUNT, BOOST_DURATION_DRAWS, BOOST_PENALTY};
use crate::rarity::Rarity;
use crate::rates::RateAdjustments;

/// Transient rate skew triggered by opponent high-rarity spawns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactiveBoost {
    boosted: Option<Rarity>,
    remaining_draws: u32,
    boost_amount: f32,
    penalty_amount: f32,
    duration_draws: u32,
}

impl Default for ReactiveBoost {
    fn default() -> Self {
        Self::new(BOOST_AMOUNT, BOOST_PENALTY, BOOST_DURATION_DRAWS)
    }
}

impl ReactiveBoost {
    /// Inactive boost with the given strength and per-activation duration.
    pub fn new(boost_amount: f32, penalty_amount: f32, duration_draws: u32) -> Self {
        Self {
            boosted: None,
            remaining_draws: 0,
            boost_amount,
            penalty_amount,
            duration_draws,
        }
    }

    /// Whether a boost is currently running.
    pub fn is_active(&self) -> bool {
        self.boosted.is_some()
    }

    /// Tier currently boosted, if any.
    pub fn boosted_rarity(&self) -> Option<Rarity> {
        self.boosted
    }

    /// Draws left before the boost expires.
    pub fn remaining_draws(&self) -> u32 {
        self.remaining_draws
    }

    /// Start (or restart) a boost targeting `rarity`.
    ///
    /// Only Epic, Legendary and Boss qualify; any other tier is a caller
    /// contract violation and is ignored after a warning.
    pub fn activate(&mut self, rarity: Rarity) {
        if !rarity.is_boostable() {
            warn!(tier = %rarity, "reactive boost requested for non-boostable tier, ignoring");
            return;
        }
        debug!(tier = %rarity, duration = self.duration_draws, "reactive boost activated");
        self.boosted = Some(rarity);
        self.remaining_draws = self.duration_draws;
    }

    /// Adjustments the boost would apply to the next draw, without consuming.
    pub fn pending_adjustments(&self) -> RateAdjustments {
        let mut adjustments = RateAdjustments::none();
        if let Some(rarity) = self.boosted {
            adjustments.add(rarity, self.boost_amount);
            adjustments.add(Rarity::Common, -self.penalty_amount);
            adjustments.add(Rarity::Rare, -self.penalty_amount);
        }
        adjustments
    }

    /// Consume one draw's worth of boost, returning its adjustments.
    ///
    /// Returns `None` once inactive. The charge that brings the counter to
    /// zero still contributes; the following draw does not.
    pub fn consume_one_draw(&mut self) -> Option<RateAdjustments> {
        self.boosted?;
        let adjustments = self.pending_adjustments();
        self.remaining_draws = self.remaining_draws.saturating_sub(1);
        if self.remaining_draws == 0 {
            debug!("reactive boost expired");
            self.boosted = None;
        }
        Some(adjustments)
    }

    /// Cancel any running boost.
    pub fn clear(&mut self) {
        self.boosted = None;
        self.remaining_draws = 0;
    }
}
