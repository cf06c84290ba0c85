//! Rarity tier table.
//!
//! The six tiers are strictly ordered; that ordering drives next-tier lookups
//! in the balancing cascade and the auto-merge path in crafting.

use serde::{Deserialize, Serialize};

/// Unit rarity tiers, ordered from most to least frequent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
    Mythic,
    Boss,
}

impl Rarity {
    /// All tiers in fixed ascending order.
    pub const ALL: [Rarity; 6] = [
        Rarity::Common,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
        Rarity::Boss,
    ];

    /// Number of tiers.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this tier in the fixed order.
    pub fn index(self) -> usize {
        match self {
            Rarity::Common => 0,
            Rarity::Rare => 1,
            Rarity::Epic => 2,
            Rarity::Legendary => 3,
            Rarity::Mythic => 4,
            Rarity::Boss => 5,
        }
    }

    /// The tier one step above this one, if any.
    pub fn next_tier(self) -> Option<Rarity> {
        match self {
            Rarity::Common => Some(Rarity::Rare),
            Rarity::Rare => Some(Rarity::Epic),
            Rarity::Epic => Some(Rarity::Legendary),
            Rarity::Legendary => Some(Rarity::Mythic),
            Rarity::Mythic => Some(Rarity::Boss),
            Rarity::Boss => None,
        }
    }

    /// Whether an opponent spawn of this tier triggers a reactive boost.
    pub fn is_boostable(self) -> bool {
        matches!(self, Rarity::Epic | Rarity::Legendary | Rarity::Boss)
    }

    /// Result tier of auto-merging a full stack of this tier.
    ///
    /// Merging stops at Legendary; Mythic and Boss units only come from
    /// draws or explicit recipes.
    pub fn merge_target(self) -> Option<Rarity> {
        match self {
            Rarity::Common => Some(Rarity::Rare),
            Rarity::Rare => Some(Rarity::Epic),
            Rarity::Epic => Some(Rarity::Legendary),
            _ => None,
        }
    }

    /// Display name for UI
    pub fn display_name(self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythic => "Mythic",
            Rarity::Boss => "Boss",
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
