//! Runtime recipe form consumed by the crafting engine.
use std::collections::BTreeMap;

use crate::content::{DefinitionRecord, Ingredient, RecipeDefinition};

#[derive(Debug, Clone, PartialEq)]
pub struct CraftingRecipe {
    pub recipe_id: String,
    pub ingredients: Vec<Ingredient>,
    pub result_item_id: String,
    pub result_quantity: u32,
    /// Simulation seconds a crafter spends before the transaction runs.
    pub crafting_time_seconds: f32,
}

impl CraftingRecipe {
    pub fn new(
        recipe_id: impl Into<String>,
        ingredients: Vec<Ingredient>,
        result_item_id: impl Into<String>,
        result_quantity: u32,
    ) -> Self {
        Self {
            recipe_id: recipe_id.into(),
            ingredients,
            result_item_id: result_item_id.into(),
            result_quantity,
            crafting_time_seconds: 0.0,
        }
    }

    pub fn with_crafting_time(mut self, seconds: f32) -> Self {
        self.crafting_time_seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        self
    }

    /// `None` unless `record` is a recipe definition.
    pub fn from_record(record: &DefinitionRecord) -> Option<Self> {
        record
            .as_definition::<RecipeDefinition>()
            .map(|definition| Self::from_definition(record.id(), definition))
    }

    pub fn from_definition(recipe_id: &str, definition: &RecipeDefinition) -> Self {
        Self::new(
            recipe_id,
            definition.ingredients.clone(),
            definition.output_item.clone(),
            definition.output_quantity,
        )
        .with_crafting_time(definition.crafting_time_seconds)
    }

    /// Total quantity needed per item id, summing repeated lines. Widened to
    /// `u64` so no sum of `u32` lines can wrap or clamp.
    pub fn required_totals(&self) -> BTreeMap<&str, u64> {
        let mut totals = BTreeMap::new();
        for ingredient in &self.ingredients {
            *totals.entry(ingredient.item_id.as_str()).or_insert(0u64) +=
                u64::from(ingredient.quantity);
        }
        totals
    }
}
