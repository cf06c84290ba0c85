//! Troop catalog.
//!
//! Draw resolution ends with a concrete unit: once a rarity is selected, one
//! unit of that tier is picked uniformly, skipping ids flagged craft-only
//! (those are reachable only through recipes).

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::rarity::Rarity;

/// Identifier of a troop template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TroopId(pub String);

impl TroopId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TroopId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TroopId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One troop template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitDef {
    pub id: TroopId,
    pub display_name: String,
    pub rarity: Rarity,
    /// Only obtainable via crafting, never from draws.
    #[serde(default)]
    pub craft_only: bool,
    /// Unit produced when a full stack of this one auto-merges.
    #[serde(default)]
    pub merges_into: Option<TroopId>,
}

/// All troop templates known to one engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCatalog {
    units: Vec<UnitDef>,
}

impl UnitCatalog {
    pub fn new(units: Vec<UnitDef>) -> Self {
        Self { units }
    }

    /// Look up a unit by id.
    pub fn get(&self, id: &TroopId) -> Option<&UnitDef> {
        self.units.iter().find(|u| &u.id == id)
    }

    /// All units of one tier, craft-only included.
    pub fn units_of(&self, rarity: Rarity) -> impl Iterator<Item = &UnitDef> {
        self.units.iter().filter(move |u| u.rarity == rarity)
    }

    /// Pick a drawable unit of `rarity` uniformly at random.
    ///
    /// Craft-only units are excluded. `None` when the tier has no drawable
    /// units configured.
    pub fn pick_drawable<R: Rng + ?Sized>(&self, rng: &mut R, rarity: Rarity) -> Option<&UnitDef> {
        let drawable: Vec<&UnitDef> = self
            .units
            .iter()
            .filter(|u| u.rarity == rarity && !u.craft_only)
            .collect();
        drawable.choose(rng).copied()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl Default for UnitCatalog {
    fn default() -> Self {
        default_catalog()
    }
}

fn unit(id: &str, name: &str, rarity: Rarity, craft_only: bool) -> UnitDef {
    UnitDef {
        id: TroopId::new(id),
        display_name: name.to_string(),
        rarity,
        craft_only,
        merges_into: None,
    }
}

fn merging(id: &str, name: &str, rarity: Rarity, craft_only: bool, target: &str) -> UnitDef {
    UnitDef {
        merges_into: Some(TroopId::new(target)),
        ..unit(id, name, rarity, craft_only)
    }
}

/// Built-in troop roster.
pub fn default_catalog() -> UnitCatalog {
    UnitCatalog::new(vec![
        merging("militia_spear", "Spear Militia", Rarity::Common, false, "ember_archer"),
        merging("militia_bow", "Bow Militia", Rarity::Common, false, "frost_warden"),
        merging("stone_thrower", "Stone Thrower", Rarity::Common, false, "gale_rider"),
        merging("ember_archer", "Ember Archer", Rarity::Rare, false, "void_adept"),
        merging("frost_warden", "Frost Warden", Rarity::Rare, false, "storm_cannon"),
        merging("gale_rider", "Gale Rider", Rarity::Rare, false, "shadow_blade"),
        merging("void_adept", "Void Adept", Rarity::Epic, false, "dragon_knight"),
        merging("storm_cannon", "Storm Cannon", Rarity::Epic, false, "dragon_knight"),
        merging("shadow_blade", "Shadow Blade", Rarity::Epic, true, "verdant_colossus"),
        unit("dragon_knight", "Dragon Knight", Rarity::Legendary, false),
        unit("verdant_colossus", "Verdant Colossus", Rarity::Legendary, true),
        unit("eclipse_titan", "Eclipse Titan", Rarity::Mythic, false),
        unit("tower_heart", "Heart of the Tower", Rarity::Boss, false),
    ])
}
