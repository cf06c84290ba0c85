//! Engine configuration.
//!
//! Everything tunable lives here and is injected once at construction. The
//! host loads one config per session (RON file or defaults); the core never
//! re-reads configuration at runtime.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::constants::{
    BASE_SUMMON_COST, BASE_UPGRADE_COST, BOOST_AMOUNT, BOOST_DURATION_DRAWS, BOOST_PENALTY,
    DRAW_WINDOW_ADJUSTMENT, DRAW_WINDOW_SIZE, DRAW_WINDOW_THRESHOLD, INVENTORY_CAPACITY,
    SUMMON_COST_INCREASE, TIME_WINDOW_ADJUSTMENT, TIME_WINDOW_SECS, TIME_WINDOW_THRESHOLD,
    UPGRADE_COST_PER_LEVEL,
};
use crate::crafting::{default_recipes, Recipe};
use crate::economy::DEFAULT_UPGRADE_DELTAS;
use crate::rarity::Rarity;
use crate::rates::DropRateSet;
use crate::units::{default_catalog, UnitCatalog};

/// Base drop percentages per difficulty tier, in rarity order.
///
/// Tier 0 is the early game; higher tiers open the top rarities up.
pub const DEFAULT_BASE_RATES: [[f32; Rarity::COUNT]; 3] = [
    [80.0, 15.0, 4.0, 1.0, 0.0, 0.0],
    [70.0, 18.0, 7.0, 3.0, 1.5, 0.5],
    [60.0, 20.0, 10.0, 6.0, 3.0, 1.0],
];

/// Full tunable surface of one engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seed for the per-instance draw RNG.
    pub rng_seed: u64,
    /// Index into `base_rate_tiers`.
    pub difficulty_tier: usize,
    /// Base drop percentages, one row per difficulty tier.
    pub base_rate_tiers: Vec<[f32; Rarity::COUNT]>,

    pub draw_window_size: usize,
    pub draw_window_threshold: usize,
    pub draw_window_adjustment: f32,

    pub time_window_secs: f64,
    pub time_window_threshold: usize,
    pub time_window_adjustment: f32,

    pub boost_amount: f32,
    pub boost_penalty: f32,
    pub boost_duration_draws: u32,

    pub base_summon_cost: u64,
    pub summon_cost_increase: u64,
    pub base_upgrade_cost: u64,
    pub upgrade_cost_per_level: u64,
    /// Per-level upgrade deltas for Common..Mythic (Boss is untouchable).
    pub upgrade_deltas: Vec<[f32; 5]>,

    pub inventory_capacity: usize,
    pub catalog: UnitCatalog,
    pub recipes: Vec<Recipe>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rng_seed: 42,
            difficulty_tier: 0,
            base_rate_tiers: DEFAULT_BASE_RATES.to_vec(),
            draw_window_size: DRAW_WINDOW_SIZE,
            draw_window_threshold: DRAW_WINDOW_THRESHOLD,
            draw_window_adjustment: DRAW_WINDOW_ADJUSTMENT,
            time_window_secs: TIME_WINDOW_SECS,
            time_window_threshold: TIME_WINDOW_THRESHOLD,
            time_window_adjustment: TIME_WINDOW_ADJUSTMENT,
            boost_amount: BOOST_AMOUNT,
            boost_penalty: BOOST_PENALTY,
            boost_duration_draws: BOOST_DURATION_DRAWS,
            base_summon_cost: BASE_SUMMON_COST,
            summon_cost_increase: SUMMON_COST_INCREASE,
            base_upgrade_cost: BASE_UPGRADE_COST,
            upgrade_cost_per_level: UPGRADE_COST_PER_LEVEL,
            upgrade_deltas: DEFAULT_UPGRADE_DELTAS.to_vec(),
            inventory_capacity: INVENTORY_CAPACITY,
            catalog: default_catalog(),
            recipes: default_recipes(),
        }
    }
}

impl EngineConfig {
    /// Base rate set for the configured difficulty tier.
    ///
    /// An out-of-range tier clamps to the last configured row.
    pub fn base_rates(&self) -> DropRateSet {
        let tier = self.difficulty_tier.min(self.base_rate_tiers.len().saturating_sub(1));
        self.base_rate_tiers
            .get(tier)
            .map(|row| DropRateSet::from_raw(*row))
            .unwrap_or_else(DropRateSet::zero)
    }

    /// Load a config from a RON file.
    pub fn load_ron(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading engine config {}", path.display()))?;
        let config: Self = ron::from_str(&raw)
            .with_context(|| format!("parsing engine config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("validating engine config {}", path.display()))?;
        Ok(config)
    }

    /// Reject configs an engine cannot run on.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.upgrade_deltas.is_empty(),
            "upgrade_deltas needs at least a level-0 row"
        );
        anyhow::ensure!(
            !self.base_rate_tiers.is_empty(),
            "base_rate_tiers needs at least one tier"
        );
        Ok(())
    }

    /// Serialize to RON (pretty, for tooling and fixtures).
    pub fn to_ron(&self) -> anyhow::Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("serializing engine config")
    }
}

/// Values restored from the save collaborator at construction time.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PersistedProfile {
    pub upgrade_level: u8,
    pub currency: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_tiers_normalizable() {
        for tier in 0..DEFAULT_BASE_RATES.len() {
            let config = EngineConfig {
                difficulty_tier: tier,
                ..Default::default()
            };
            let rates = config.base_rates().normalized();
            assert!(rates.is_normalized(), "tier {tier} sum {}", rates.total());
        }
    }

    #[test]
    fn test_out_of_range_tier_clamps() {
        let config = EngineConfig {
            difficulty_tier: 99,
            ..Default::default()
        };
        let expected = DropRateSet::from_raw(DEFAULT_BASE_RATES[2]);
        assert_eq!(config.base_rates(), expected);
    }

    #[test]
    fn test_ron_roundtrip_via_file() {
        let config = EngineConfig::default();
        let ron_text = config.to_ron().unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ron_text.as_bytes()).unwrap();

        let loaded = EngineConfig::load_ron(file.path()).unwrap();
        assert_eq!(loaded.rng_seed, config.rng_seed);
        assert_eq!(loaded.base_rate_tiers, config.base_rate_tiers);
        assert_eq!(loaded.catalog.len(), config.catalog.len());
        assert_eq!(loaded.recipes.len(), config.recipes.len());
    }

    #[test]
    fn test_load_rejects_empty_upgrade_deltas() {
        let config = EngineConfig {
            upgrade_deltas: vec![],
            ..Default::default()
        };
        let ron_text = config.to_ron().unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ron_text.as_bytes()).unwrap();

        let err = EngineConfig::load_ron(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("upgrade_deltas"));
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = EngineConfig::load_ron(Path::new("/nonexistent/engine.ron")).unwrap_err();
        assert!(err.to_string().contains("reading engine config"));
    }
}
