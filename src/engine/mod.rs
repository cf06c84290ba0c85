//! Per-side gacha engine.
//!
//! One [`GachaEngine`] instance exists per side (player and AI each own one);
//! there is no global state. The host loop drives it synchronously, passing a
//! monotonic time into every evaluation. A draw request flows cost check →
//! rate recompute → rarity selection → unit pick, and a completed draw feeds
//! both balancing histories and the cost escalator.

pub mod config;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::boost::ReactiveBoost;
use crate::crafting::{self, CraftError, Inventory, Recipe, RecipeId};
use crate::economy::{SummonCost, UpgradeError, UpgradeTrack, Wallet};
use crate::history::{DrawHistoryWindow, TimeWindowHistory};
use crate::rarity::Rarity;
use crate::rates::{compute_rates, DropRateSet};
use crate::units::{TroopId, UnitCatalog};

pub use config::{EngineConfig, PersistedProfile};

/// Errors surfaced by draw requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("draw costs {needed} but only {available} is available")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error("no drawable units configured for any tier")]
    EmptyCatalog,
}

/// Result of one successful draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawOutcome {
    pub rarity: Rarity,
    pub troop: TroopId,
    pub cost_paid: u64,
}

/// Balancing and economy state for one side of the match.
#[derive(Debug)]
pub struct GachaEngine {
    base_rates: DropRateSet,
    rng: Xoshiro256StarStar,
    wallet: Wallet,
    summon_cost: SummonCost,
    upgrades: UpgradeTrack,
    draw_window: DrawHistoryWindow,
    time_history: TimeWindowHistory,
    boost: ReactiveBoost,
    catalog: UnitCatalog,
    recipes: Vec<Recipe>,
    inventory: Inventory,
}

impl GachaEngine {
    /// Build an engine from config plus the profile the save collaborator
    /// restored (upgrade level and currency are persisted externally).
    pub fn new(config: &EngineConfig, profile: PersistedProfile) -> Self {
        Self {
            base_rates: config.base_rates(),
            rng: Xoshiro256StarStar::seed_from_u64(config.rng_seed),
            wallet: Wallet::new(profile.currency),
            summon_cost: SummonCost::new(config.base_summon_cost, config.summon_cost_increase),
            upgrades: UpgradeTrack::with_schedule(
                profile.upgrade_level,
                config.base_upgrade_cost,
                config.upgrade_cost_per_level,
                config.upgrade_deltas.clone(),
            ),
            draw_window: DrawHistoryWindow::new(
                config.draw_window_size,
                config.draw_window_threshold,
                config.draw_window_adjustment,
            ),
            time_history: TimeWindowHistory::new(
                config.time_window_secs,
                config.time_window_threshold,
                config.time_window_adjustment,
            ),
            boost: ReactiveBoost::new(
                config.boost_amount,
                config.boost_penalty,
                config.boost_duration_draws,
            ),
            catalog: config.catalog.clone(),
            recipes: config.recipes.clone(),
            inventory: Inventory::new(config.inventory_capacity),
        }
    }

    /// Price the next draw will charge.
    pub fn draw_cost(&self) -> u64 {
        self.summon_cost.current_cost()
    }

    /// Perform one draw at the given monotonic time.
    ///
    /// On `InsufficientFunds` (or an empty catalog) nothing is mutated: no
    /// currency leaves the wallet, no boost charge is consumed, no history
    /// entry is recorded.
    pub fn request_draw(&mut self, current_time: f64) -> Result<DrawOutcome, DrawError> {
        let cost = self.summon_cost.current_cost();
        if self.wallet.balance() < cost {
            return Err(DrawError::InsufficientFunds {
                needed: cost,
                available: self.wallet.balance(),
            });
        }

        let rates = self.effective_rates(current_time);
        let rarity = if rates.is_degenerate() {
            warn!("rate set degenerated to zero, falling back to Common");
            Rarity::Common
        } else {
            rates.select(&mut self.rng)
        };

        let troop = match self.pick_unit(rarity) {
            Some(troop) => troop,
            None => return Err(DrawError::EmptyCatalog),
        };

        // Commit: everything below must not fail.
        let spent = self.wallet.try_spend(cost);
        debug_assert!(spent, "balance checked above");
        let _ = self.boost.consume_one_draw();
        self.draw_window.record_draw(rarity);
        self.time_history.record_draw(rarity, current_time);
        self.summon_cost.record_draw();

        info!(%rarity, troop = %troop, cost, "draw completed");
        Ok(DrawOutcome {
            rarity,
            troop,
            cost_paid: cost,
        })
    }

    /// Feed an opposing-side spawn into the reactive boost.
    ///
    /// Non-boostable tiers are ignored (logged inside the boost).
    pub fn notify_opponent_spawn(&mut self, rarity: Rarity) {
        self.boost.activate(rarity);
    }

    /// Read-only snapshot of the rates the next draw would use.
    ///
    /// Includes any pending boost contribution without consuming a charge.
    pub fn current_rates(&mut self, current_time: f64) -> DropRateSet {
        self.effective_rates(current_time)
    }

    /// Execute a configured recipe against this side's inventory.
    pub fn craft(&mut self, recipe_id: &RecipeId) -> Result<TroopId, CraftError> {
        let recipe = self
            .recipes
            .iter()
            .find(|r| &r.id == recipe_id)
            .cloned()
            .ok_or_else(|| CraftError::UnknownRecipe(recipe_id.0.clone()))?;
        crafting::craft(&recipe, &mut self.inventory)
    }

    /// Collapse a full stack of `troop` into its next-tier unit.
    pub fn auto_merge(&mut self, troop: &TroopId) -> Result<TroopId, CraftError> {
        crafting::auto_merge(troop, &self.catalog, &mut self.inventory)
    }

    /// Price of the next upgrade; `None` once maxed.
    pub fn upgrade_cost(&self) -> Option<u64> {
        self.upgrades.next_cost()
    }

    /// Buy the next upgrade level from this side's wallet.
    pub fn apply_upgrade(&mut self) -> Result<u8, UpgradeError> {
        let level = self.upgrades.purchase(&mut self.wallet)?;
        info!(level, "upgrade purchased");
        Ok(level)
    }

    /// Current upgrade level.
    pub fn upgrade_level(&self) -> u8 {
        self.upgrades.level()
    }

    /// Reset per-session state: summon cost, histories, and any running
    /// boost. Upgrade level, wallet, and inventory survive restarts.
    pub fn reset_session(&mut self) {
        self.summon_cost.reset();
        self.draw_window.clear();
        self.time_history.clear();
        self.boost.clear();
        debug!("session state reset");
    }

    /// This side's wallet.
    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Mutable wallet access for the currency collaborator (kill rewards,
    /// wave bonuses).
    pub fn wallet_mut(&mut self) -> &mut Wallet {
        &mut self.wallet
    }

    /// This side's inventory.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Mutable inventory access for the spawn collaborator (deposit drawn
    /// or recycled units).
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Whether a reactive boost is currently running.
    pub fn boost_active(&self) -> bool {
        self.boost.is_active()
    }

    fn effective_rates(&mut self, current_time: f64) -> DropRateSet {
        let draw_adj = self.draw_window.adjustments();
        let time_adj = self.time_history.adjustments(current_time);
        let reactive = self.boost.pending_adjustments();
        compute_rates(
            &self.base_rates,
            &self.upgrades.rate_deltas(),
            &draw_adj,
            &time_adj,
            &reactive,
        )
    }

    fn pick_unit(&mut self, rarity: Rarity) -> Option<TroopId> {
        // Walk down tiers when the selected one has nothing drawable; a
        // catalog without a single drawable unit is a config error.
        let mut tier = Some(rarity);
        while let Some(r) = tier {
            if let Some(unit) = self.catalog.pick_drawable(&mut self.rng, r) {
                return Some(unit.id.clone());
            }
            tier = match r.index() {
                0 => None,
                i => Some(Rarity::ALL[i - 1]),
            };
        }
        None
    }
}
