//! Gacha Defence - Balancing & Economy Core
//!
//! This crate provides the deterministic balancing and economy logic for a
//! tower-defense/gacha hybrid:
//! - Rarity tier table and ordered next-tier lookups
//! - Drop-rate computation (base rates + upgrade deltas + adaptive
//!   adjustments, renormalized every draw)
//! - Draw-count and elapsed-time balancing histories
//! - Reactive boost counter-balance against opponent lucky spawns
//! - Escalating summon costs and the upgrade track
//! - Recipe crafting and stacked-unit auto-merge
//! - Per-side engine orchestration with injected config and persisted state
//! - Monte-Carlo draw-distribution verification
//!
//! Rendering, physics, UI, audio, and save I/O live in the host engine; this
//! core is driven synchronously from its update loop with time passed in.

pub mod boost;
pub mod constants;
pub mod crafting;
pub mod economy;
pub mod engine;
pub mod history;
pub mod logging;
pub mod rarity;
pub mod rates;
pub mod simulation;
pub mod units;
