//! Recipe-based inventory transactions and the jobs that drive them.
pub mod components;
pub mod engine;
pub mod events;
pub mod plugin;
pub mod recipe;
pub mod resources;
pub mod systems;

pub use components::{Crafter, Inventory, InventoryStore};
pub use engine::{CraftingEngine, CraftingError};
pub use plugin::CraftingPlugin;
pub use recipe::CraftingRecipe;
pub use resources::CraftingLedger;
