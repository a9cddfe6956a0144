//! Validated recipe transactions against an inventory store.
use std::fmt;

use crate::content::Ingredient;

use super::{components::InventoryStore, recipe::CraftingRecipe};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CraftingError {
    InsufficientIngredients {
        item_id: String,
        required: u64,
        available: u32,
    },
    UnknownRecipe {
        recipe_id: String,
    },
    EmptyRecipe {
        recipe_id: String,
    },
}

impl fmt::Display for CraftingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientIngredients {
                item_id,
                required,
                available,
            } => write!(
                f,
                "needs {} {} but only {} available",
                required, item_id, available
            ),
            Self::UnknownRecipe { recipe_id } => write!(f, "unknown recipe '{}'", recipe_id),
            Self::EmptyRecipe { recipe_id } => {
                write!(f, "recipe '{}' produces nothing", recipe_id)
            }
        }
    }
}

impl std::error::Error for CraftingError {}

/// What a successful craft moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftReceipt {
    pub recipe_id: String,
    pub consumed: Vec<Ingredient>,
    pub produced: Ingredient,
}

/// Stateless; recipes and inventories are supplied per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct CraftingEngine;

impl CraftingEngine {
    /// True iff the store holds every ingredient. Repeated ingredient lines
    /// are checked against their summed quantity.
    pub fn can_craft(recipe: &CraftingRecipe, inventory: &impl InventoryStore) -> bool {
        Self::validate(recipe, inventory).is_none()
    }

    fn validate(recipe: &CraftingRecipe, inventory: &impl InventoryStore) -> Option<CraftingError> {
        if recipe.result_quantity == 0 || recipe.result_item_id.trim().is_empty() {
            return Some(CraftingError::EmptyRecipe {
                recipe_id: recipe.recipe_id.clone(),
            });
        }

        recipe
            .required_totals()
            .into_iter()
            .find_map(|(item_id, required)| {
                let available = inventory.item_count(item_id);
                (u64::from(available) < required).then(|| CraftingError::InsufficientIngredients {
                    item_id: item_id.to_string(),
                    required,
                    available,
                })
            })
    }

    /// Validates and applies `recipe` under one exclusive borrow of the
    /// store: ingredients are removed in list order, then the result is
    /// added. On error the store is untouched.
    pub fn try_craft(
        recipe: &CraftingRecipe,
        inventory: &mut impl InventoryStore,
    ) -> Result<CraftReceipt, CraftingError> {
        if let Some(error) = Self::validate(recipe, inventory) {
            return Err(error);
        }

        for ingredient in &recipe.ingredients {
            let removed = inventory.remove_item(&ingredient.item_id, ingredient.quantity);
            debug_assert!(
                removed,
                "validated ingredient {} must be removable",
                ingredient.item_id
            );
        }
        inventory.add_item(&recipe.result_item_id, recipe.result_quantity);

        Ok(CraftReceipt {
            recipe_id: recipe.recipe_id.clone(),
            consumed: recipe.ingredients.clone(),
            produced: Ingredient::new(recipe.result_item_id.clone(), recipe.result_quantity),
        })
    }

    /// Boolean form of [`Self::try_craft`].
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn perform_craft(recipe: &CraftingRecipe, inventory: &mut impl InventoryStore) -> bool {
        Self::try_craft(recipe, inventory).is_ok()
    }
}
