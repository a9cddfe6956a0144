//! Inventory and crafter components.
use std::collections::BTreeMap;

use bevy::prelude::*;

use super::recipe::CraftingRecipe;

/// Item-quantity ledger the crafting engine debits and credits.
pub trait InventoryStore {
    fn item_count(&self, item_id: &str) -> u32;

    /// Removes `quantity` if that many are held. Returns false and leaves the
    /// store untouched otherwise.
    fn remove_item(&mut self, item_id: &str, quantity: u32) -> bool;

    fn add_item(&mut self, item_id: &str, quantity: u32);
}

/// Per-agent stacks keyed by item id. Iteration is ordered by id.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: AsRef<str>,
    {
        let mut inventory = Self::default();
        for (item_id, quantity) in counts {
            inventory.add_item(item_id.as_ref(), quantity);
        }
        inventory
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.items
            .iter()
            .map(|(item_id, quantity)| (item_id.as_str(), *quantity))
    }

    #[allow(dead_code)]
    pub fn total_items(&self) -> u64 {
        self.items.values().map(|quantity| u64::from(*quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl InventoryStore for Inventory {
    fn item_count(&self, item_id: &str) -> u32 {
        self.items.get(item_id).copied().unwrap_or(0)
    }

    fn remove_item(&mut self, item_id: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return true;
        }
        match self.items.get_mut(item_id) {
            Some(held) if *held >= quantity => {
                *held -= quantity;
                if *held == 0 {
                    self.items.remove(item_id);
                }
                true
            }
            _ => false,
        }
    }

    fn add_item(&mut self, item_id: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let held = self.items.entry(item_id.to_string()).or_insert(0);
        *held = held.saturating_add(quantity);
    }
}

/// A craft in progress. Ingredients are only debited when it completes.
#[derive(Debug, Clone, PartialEq)]
pub struct CraftingJob {
    pub recipe_id: String,
    pub elapsed_seconds: f32,
    pub duration_seconds: f32,
}

impl CraftingJob {
    pub fn is_complete(&self) -> bool {
        self.elapsed_seconds >= self.duration_seconds
    }
}

/// Recipes an agent knows plus its current job.
#[derive(Component, Debug, Clone, Default)]
pub struct Crafter {
    known: Vec<CraftingRecipe>,
    job: Option<CraftingJob>,
}

impl Crafter {
    pub fn new(known: Vec<CraftingRecipe>) -> Self {
        Self { known, job: None }
    }

    pub fn known_recipes(&self) -> &[CraftingRecipe] {
        &self.known
    }

    pub fn recipe(&self, recipe_id: &str) -> Option<&CraftingRecipe> {
        self.known.iter().find(|recipe| recipe.recipe_id == recipe_id)
    }

    pub fn job(&self) -> Option<&CraftingJob> {
        self.job.as_ref()
    }

    pub fn start_job(&mut self, recipe: &CraftingRecipe) {
        self.job = Some(CraftingJob {
            recipe_id: recipe.recipe_id.clone(),
            elapsed_seconds: 0.0,
            duration_seconds: recipe.crafting_time_seconds,
        });
    }

    /// Advances the current job; returns the recipe id once it has finished
    /// and clears the job.
    pub fn advance_job(&mut self, delta_seconds: f32) -> Option<String> {
        let job = self.job.as_mut()?;
        job.elapsed_seconds += delta_seconds.max(0.0);
        if job.is_complete() {
            self.job.take().map(|job| job.recipe_id)
        } else {
            None
        }
    }

    pub fn cancel_job(&mut self) -> Option<CraftingJob> {
        self.job.take()
    }
}
