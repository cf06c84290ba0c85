//! Recipe crafting and unit merging.
//!
//! Recipes consume a fixed multiset of ingredient units and produce one
//! result unit. Crafting is all-or-nothing: validation runs immediately
//! before mutation, and a craft that cannot place its result consumes
//! nothing. Auto-merge is the degenerate single-ingredient recipe: a full
//! stack of identical base-tier units collapses into one unit of the next
//! tier.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::constants::{INVENTORY_CAPACITY, MERGE_STACK_THRESHOLD};
use crate::units::{TroopId, UnitCatalog};

/// Errors surfaced by crafting operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftError {
    #[error("need {needed}x {troop}, only {available} in stock")]
    InsufficientIngredients {
        troop: TroopId,
        needed: u32,
        available: u32,
    },
    #[error("inventory cannot hold the crafted result")]
    InventoryFull,
    #[error("unknown recipe `{0}`")]
    UnknownRecipe(String),
    #[error("`{0}` has no merge path")]
    NotMergeable(TroopId),
}

/// Identifier of a configured recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeId(pub String);

impl RecipeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl From<&str> for RecipeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Fixed mapping from ingredient units to one result unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub result: TroopId,
    pub ingredients: Vec<(TroopId, u32)>,
}

/// Owned troop counts for one side.
///
/// Capacity bounds the number of distinct troop entries; entries whose count
/// reaches zero are removed and free their slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    counts: HashMap<TroopId, u32>,
    capacity: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(INVENTORY_CAPACITY)
    }
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            counts: HashMap::new(),
            capacity,
        }
    }

    /// Units held of one troop.
    pub fn count(&self, id: &TroopId) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    /// Distinct troop entries held.
    pub fn distinct_entries(&self) -> usize {
        self.counts.len()
    }

    /// Total units across all entries.
    pub fn total_units(&self) -> u64 {
        self.counts.values().map(|c| u64::from(*c)).sum()
    }

    /// Add `qty` units of `id`, rejecting new entries beyond capacity.
    pub fn add(&mut self, id: TroopId, qty: u32) -> Result<(), CraftError> {
        if qty == 0 {
            return Ok(());
        }
        if !self.counts.contains_key(&id) && self.counts.len() >= self.capacity {
            return Err(CraftError::InventoryFull);
        }
        *self.counts.entry(id).or_insert(0) += qty;
        Ok(())
    }

    /// Remove `qty` units of `id`, dropping the entry at zero.
    ///
    /// Fails without mutation when the stock is short.
    pub fn consume(&mut self, id: &TroopId, qty: u32) -> Result<(), CraftError> {
        let available = self.count(id);
        if available < qty {
            return Err(CraftError::InsufficientIngredients {
                troop: id.clone(),
                needed: qty,
                available,
            });
        }
        if available == qty {
            let _ = self.counts.remove(id);
        } else if let Some(count) = self.counts.get_mut(id) {
            *count -= qty;
        }
        Ok(())
    }

    /// Iterate over held (troop, count) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&TroopId, u32)> {
        self.counts.iter().map(|(id, c)| (id, *c))
    }
}

/// Total required quantity per troop id.
///
/// A recipe may list the same troop on several ingredient lines; stock checks
/// and consumption always work on the per-id totals. Zero-quantity lines are
/// dropped.
fn required_counts(recipe: &Recipe) -> HashMap<&TroopId, u32> {
    let mut needed: HashMap<&TroopId, u32> = HashMap::new();
    for (id, qty) in &recipe.ingredients {
        if *qty > 0 {
            *needed.entry(id).or_insert(0) += qty;
        }
    }
    needed
}

/// True iff every ingredient is in stock at the required total quantity.
pub fn can_craft(recipe: &Recipe, inventory: &Inventory) -> bool {
    required_counts(recipe)
        .iter()
        .all(|(id, qty)| inventory.count(id) >= *qty)
}

/// Whether the result can be placed once the ingredients are gone.
///
/// Consuming an ingredient down to zero frees its slot, so placement is
/// checked against the post-consumption entry count. `needed` holds only
/// positive totals, so every freed id is a live entry.
fn result_placeable(
    recipe: &Recipe,
    needed: &HashMap<&TroopId, u32>,
    inventory: &Inventory,
) -> bool {
    if inventory.count(&recipe.result) > 0 {
        return true;
    }
    let freed = needed
        .iter()
        .filter(|(id, qty)| ***id != recipe.result && inventory.count(id) == **qty)
        .count();
    inventory.distinct_entries() - freed < inventory.capacity
}

/// Execute a recipe against the inventory.
///
/// Re-validates stock and result placement before touching anything; on any
/// failure the inventory is left exactly as it was.
pub fn craft(recipe: &Recipe, inventory: &mut Inventory) -> Result<TroopId, CraftError> {
    let needed = required_counts(recipe);
    for (id, qty) in &needed {
        let available = inventory.count(id);
        if available < *qty {
            return Err(CraftError::InsufficientIngredients {
                troop: (*id).clone(),
                needed: *qty,
                available,
            });
        }
    }
    if !result_placeable(recipe, &needed, inventory) {
        return Err(CraftError::InventoryFull);
    }

    for (id, qty) in &needed {
        inventory
            .consume(id, *qty)
            .expect("stock validated immediately above");
    }
    inventory
        .add(recipe.result.clone(), 1)
        .expect("placement validated immediately above");

    debug!(recipe = %recipe.id.0, result = %recipe.result, "craft completed");
    Ok(recipe.result.clone())
}

/// Collapse a full stack of one troop into its next-tier merge target.
///
/// The implicit recipe consumes exactly [`MERGE_STACK_THRESHOLD`] units.
/// Units above Epic have no merge path.
pub fn auto_merge(
    troop: &TroopId,
    catalog: &UnitCatalog,
    inventory: &mut Inventory,
) -> Result<TroopId, CraftError> {
    let def = catalog
        .get(troop)
        .ok_or_else(|| CraftError::NotMergeable(troop.clone()))?;
    let target = match (&def.merges_into, def.rarity.merge_target()) {
        (Some(target), Some(_)) => target.clone(),
        _ => return Err(CraftError::NotMergeable(troop.clone())),
    };
    debug_assert_eq!(
        catalog.get(&target).map(|u| u.rarity),
        def.rarity.merge_target(),
        "merge target must sit one tier above"
    );

    let implicit = Recipe {
        id: RecipeId::new(format!("merge:{}", troop.0)),
        result: target,
        ingredients: vec![(troop.clone(), MERGE_STACK_THRESHOLD)],
    };
    craft(&implicit, inventory)
}

/// Whether a stack is full enough to merge.
pub fn can_merge(troop: &TroopId, catalog: &UnitCatalog, inventory: &Inventory) -> bool {
    catalog
        .get(troop)
        .is_some_and(|def| def.merges_into.is_some() && def.rarity.merge_target().is_some())
        && inventory.count(troop) >= MERGE_STACK_THRESHOLD
}

/// Built-in recipe list.
pub fn default_recipes() -> Vec<Recipe> {
    vec![
        Recipe {
            id: RecipeId::from("forge_shadow_blade"),
            result: TroopId::from("shadow_blade"),
            ingredients: vec![
                (TroopId::from("ember_archer"), 2),
                (TroopId::from("gale_rider"), 1),
            ],
        },
        Recipe {
            id: RecipeId::from("awaken_colossus"),
            result: TroopId::from("verdant_colossus"),
            ingredients: vec![
                (TroopId::from("void_adept"), 2),
                (TroopId::from("storm_cannon"), 2),
                (TroopId::from("frost_warden"), 3),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::default_catalog;

    fn blade_recipe() -> Recipe {
        default_recipes()
            .into_iter()
            .find(|r| r.id == RecipeId::from("forge_shadow_blade"))
            .unwrap()
    }

    #[test]
    fn test_can_craft_short_by_one() {
        let recipe = blade_recipe();
        let mut inventory = Inventory::default();
        inventory.add(TroopId::from("ember_archer"), 1).unwrap();
        inventory.add(TroopId::from("gale_rider"), 1).unwrap();
        assert!(!can_craft(&recipe, &inventory), "one archer short");

        inventory.add(TroopId::from("ember_archer"), 1).unwrap();
        assert!(can_craft(&recipe, &inventory));
    }

    #[test]
    fn test_craft_consumes_and_places() {
        let recipe = blade_recipe();
        let mut inventory = Inventory::default();
        inventory.add(TroopId::from("ember_archer"), 3).unwrap();
        inventory.add(TroopId::from("gale_rider"), 2).unwrap();
        let before = inventory.total_units();

        let result = craft(&recipe, &mut inventory).unwrap();
        assert_eq!(result, TroopId::from("shadow_blade"));
        assert_eq!(inventory.count(&TroopId::from("ember_archer")), 1);
        assert_eq!(inventory.count(&TroopId::from("gale_rider")), 1);
        assert_eq!(inventory.count(&TroopId::from("shadow_blade")), 1);
        // Net change: 3 ingredients gone, 1 result added.
        assert_eq!(inventory.total_units(), before - 2);
    }

    #[test]
    fn test_failed_craft_mutates_nothing() {
        let recipe = blade_recipe();
        let mut inventory = Inventory::default();
        inventory.add(TroopId::from("ember_archer"), 2).unwrap();
        // Missing the gale rider entirely.
        let err = craft(&recipe, &mut inventory).unwrap_err();
        assert!(matches!(err, CraftError::InsufficientIngredients { .. }));
        assert_eq!(inventory.count(&TroopId::from("ember_archer")), 2);
        assert_eq!(inventory.count(&TroopId::from("shadow_blade")), 0);
    }

    #[test]
    fn test_craft_rejected_when_result_unplaceable() {
        let recipe = blade_recipe();
        // Two slots: both stay occupied after crafting (1 archer, 1 rider
        // left over), so the result has nowhere to go.
        let mut inventory = Inventory::new(2);
        inventory.add(TroopId::from("ember_archer"), 3).unwrap();
        inventory.add(TroopId::from("gale_rider"), 2).unwrap();

        let err = craft(&recipe, &mut inventory).unwrap_err();
        assert_eq!(err, CraftError::InventoryFull);
        assert_eq!(inventory.count(&TroopId::from("ember_archer")), 3);
        assert_eq!(inventory.count(&TroopId::from("gale_rider")), 2);
    }

    #[test]
    fn test_craft_uses_freed_slot() {
        let recipe = blade_recipe();
        // Same two slots, but exact ingredient counts: both entries drain to
        // zero and free room for the result.
        let mut inventory = Inventory::new(2);
        inventory.add(TroopId::from("ember_archer"), 2).unwrap();
        inventory.add(TroopId::from("gale_rider"), 1).unwrap();

        craft(&recipe, &mut inventory).unwrap();
        assert_eq!(inventory.count(&TroopId::from("shadow_blade")), 1);
        assert_eq!(inventory.distinct_entries(), 1);
    }

    #[test]
    fn test_duplicate_ingredient_lines_aggregate() {
        // The same troop split across two lines needs the summed quantity.
        let recipe = Recipe {
            id: RecipeId::from("split_lines"),
            result: TroopId::from("out"),
            ingredients: vec![(TroopId::from("a"), 2), (TroopId::from("a"), 2)],
        };
        let mut inventory = Inventory::default();
        inventory.add(TroopId::from("a"), 3).unwrap();

        assert!(!can_craft(&recipe, &inventory), "3 in stock, 4 required");
        let err = craft(&recipe, &mut inventory).unwrap_err();
        assert_eq!(
            err,
            CraftError::InsufficientIngredients {
                troop: TroopId::from("a"),
                needed: 4,
                available: 3,
            }
        );
        assert_eq!(inventory.count(&TroopId::from("a")), 3, "nothing consumed");

        inventory.add(TroopId::from("a"), 1).unwrap();
        assert!(can_craft(&recipe, &inventory));
        craft(&recipe, &mut inventory).unwrap();
        assert_eq!(inventory.count(&TroopId::from("a")), 0);
        assert_eq!(inventory.count(&TroopId::from("out")), 1);
    }

    #[test]
    fn test_zero_quantity_ingredients_ignored() {
        // A zero-quantity line for a troop nobody owns must neither block
        // the craft nor count as a freed slot.
        let recipe = Recipe {
            id: RecipeId::from("ghost_line"),
            result: TroopId::from("out"),
            ingredients: vec![(TroopId::from("ghost"), 0)],
        };
        let mut inventory = Inventory::default();
        assert!(can_craft(&recipe, &inventory));
        let result = craft(&recipe, &mut inventory).unwrap();
        assert_eq!(result, TroopId::from("out"));
        assert_eq!(inventory.count(&TroopId::from("ghost")), 0);

        // Same line in a full inventory: no slot is freed, so the craft is
        // rejected rather than miscounted.
        let mut full = Inventory::new(1);
        full.add(TroopId::from("filler"), 1).unwrap();
        assert_eq!(craft(&recipe, &mut full), Err(CraftError::InventoryFull));
        assert_eq!(full.count(&TroopId::from("filler")), 1);
    }

    #[test]
    fn test_auto_merge_full_stack() {
        let catalog = default_catalog();
        let mut inventory = Inventory::default();
        let spear = TroopId::from("militia_spear");
        inventory.add(spear.clone(), 4).unwrap();
        assert!(can_merge(&spear, &catalog, &inventory));

        let result = auto_merge(&spear, &catalog, &mut inventory).unwrap();
        assert_eq!(result, TroopId::from("ember_archer"));
        assert_eq!(inventory.count(&spear), 1, "merge eats exactly the threshold");
        assert_eq!(inventory.count(&result), 1);
    }

    #[test]
    fn test_auto_merge_under_threshold() {
        let catalog = default_catalog();
        let mut inventory = Inventory::default();
        let spear = TroopId::from("militia_spear");
        inventory.add(spear.clone(), 2).unwrap();
        assert!(!can_merge(&spear, &catalog, &inventory));
        let err = auto_merge(&spear, &catalog, &mut inventory).unwrap_err();
        assert!(matches!(err, CraftError::InsufficientIngredients { .. }));
        assert_eq!(inventory.count(&spear), 2);
    }

    #[test]
    fn test_no_merge_above_epic() {
        let catalog = default_catalog();
        let mut inventory = Inventory::default();
        let knight = TroopId::from("dragon_knight");
        inventory.add(knight.clone(), 5).unwrap();
        let err = auto_merge(&knight, &catalog, &mut inventory).unwrap_err();
        assert_eq!(err, CraftError::NotMergeable(knight.clone()));
        assert_eq!(inventory.count(&knight), 5);
    }

    #[test]
    fn test_inventory_capacity() {
        let mut inventory = Inventory::new(2);
        inventory.add(TroopId::from("a"), 1).unwrap();
        inventory.add(TroopId::from("b"), 1).unwrap();
        assert_eq!(
            inventory.add(TroopId::from("c"), 1),
            Err(CraftError::InventoryFull)
        );
        // Stacking onto an existing entry is always fine.
        inventory.add(TroopId::from("a"), 10).unwrap();
        assert_eq!(inventory.count(&TroopId::from("a")), 11);
    }
}
