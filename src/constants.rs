//! Centralized balancing constants for the gacha core.
//!
//! Eliminates magic numbers duplicated across the engine and its tests.
//! Per-module data tables (base rate sets, upgrade deltas, recipes) remain in
//! their respective modules as the single source of truth.

// =====================================================
// Draw-history balancing (short horizon)
// =====================================================

/// Number of recent draws kept in the sliding window
pub const DRAW_WINDOW_SIZE: usize = 10;

/// Same-rarity count within the window that triggers a correction
pub const DRAW_WINDOW_THRESHOLD: usize = 5;

/// Percentage points shifted from a triggered tier to the next tier up
pub const DRAW_WINDOW_ADJUSTMENT: f32 = 5.0;

// =====================================================
// Time-window balancing (long horizon)
// =====================================================

/// Age in seconds beyond which a draw record is pruned
pub const TIME_WINDOW_SECS: f64 = 60.0;

/// Same-rarity count within the time window that triggers a correction
pub const TIME_WINDOW_THRESHOLD: usize = 8;

/// Percentage points shifted per time-window trigger (gentler than draw-based)
pub const TIME_WINDOW_ADJUSTMENT: f32 = 1.0;

// =====================================================
// Reactive boost
// =====================================================

/// Percentage points added to the boosted tier per affected draw
pub const BOOST_AMOUNT: f32 = 10.0;

/// Percentage points removed from each of Common and Rare per affected draw
pub const BOOST_PENALTY: f32 = 5.0;

/// Number of draws a boost stays active after activation
pub const BOOST_DURATION_DRAWS: u32 = 5;

// =====================================================
// Summon economy
// =====================================================

/// Cost of the first draw in a session
pub const BASE_SUMMON_COST: u64 = 50;

/// Cost increase applied per completed draw
pub const SUMMON_COST_INCREASE: u64 = 10;

/// Flat cost of the level-0 upgrade
pub const BASE_UPGRADE_COST: u64 = 200;

/// Additional upgrade cost per level already owned
pub const UPGRADE_COST_PER_LEVEL: u64 = 150;

/// Highest reachable upgrade level; upgrades are unaffordable beyond it
pub const MAX_UPGRADE_LEVEL: u8 = 10;

// =====================================================
// Crafting
// =====================================================

/// Identical base-tier units consumed by one auto-merge
pub const MERGE_STACK_THRESHOLD: u32 = 3;

/// Maximum number of distinct troop entries an inventory holds
pub const INVENTORY_CAPACITY: usize = 40;

// =====================================================
// Rate normalization
// =====================================================

/// Target sum of a normalized rate set, in percent
pub const RATE_TOTAL: f32 = 100.0;

/// Tolerance accepted when checking a normalized sum
pub const RATE_SUM_TOLERANCE: f32 = 0.01;
