//! Systems related to settler spawning and behavior selection.
use bevy::prelude::*;

use crate::{
    agent::{
        behavior::{choose_behavior, BehaviorContext, BehaviorState},
        components::{AgentIdGenerator, Identity},
    },
    content::{ContentRegistry, EntityDefinition, TagRef},
    core::SimulationClock,
    crafting::{Crafter, CraftingEngine, Inventory},
    needs::{NeedsConfig, NeedsState, NeedsStatus},
    settlement::{ResourcePool, SettlementConfig, SettlementStockpile},
};

pub const SETTLER_TAG: &str = "settler";

/// Spawns `settlers_per_definition` agents for every entity definition
/// tagged `settler`.
pub fn spawn_settlers(
    mut commands: Commands,
    registry: Res<ContentRegistry>,
    needs_config: Res<NeedsConfig>,
    settlement_config: Res<SettlementConfig>,
    mut id_generator: ResMut<AgentIdGenerator>,
) {
    let prototypes = registry.with_tag::<EntityDefinition>(&TagRef::from(SETTLER_TAG));
    if prototypes.is_empty() {
        warn!("No entity definitions tagged #{}; no settlers spawned", SETTLER_TAG);
        return;
    }

    let recipes = registry.recipes();
    let starting_items = settlement_config
        .starting_items
        .iter()
        .map(|(item_id, quantity)| (item_id.as_str(), *quantity));
    let inventory = Inventory::from_counts(starting_items);

    for prototype in prototypes {
        for index in 1..=settlement_config.settlers_per_definition {
            let id = id_generator.next_id();
            let name = format!("{} {}", prototype.display_name(), index);
            info!("Spawned {} ({}) from {}", name, id, prototype.id());

            commands.spawn((
                id,
                Identity::new(id, name.clone(), prototype.id()),
                NeedsState::new(&needs_config),
                NeedsStatus::default(),
                inventory.clone(),
                Crafter::new(recipes.clone()),
                BehaviorState::default(),
                Name::new(format!("{} ({})", name, id)),
            ));
        }
    }
}

/// Re-evaluates every agent's behavior from its needs and the stockpile.
pub fn update_agent_behavior(
    stockpile: Res<SettlementStockpile>,
    needs_config: Res<NeedsConfig>,
    settlement_config: Res<SettlementConfig>,
    mut agents: Query<(&Identity, &NeedsState, &Inventory, &Crafter, &mut BehaviorState)>,
) {
    let population = agents.iter().count();
    if population == 0 {
        return;
    }
    let food_low = stockpile.current_food() < settlement_config.food_reserve_target(population);

    for (identity, needs, inventory, crafter, mut behavior) in agents.iter_mut() {
        let can_craft = crafter.job().is_some()
            || crafter
                .known_recipes()
                .iter()
                .any(|recipe| CraftingEngine::can_craft(recipe, inventory));
        let context = BehaviorContext {
            food_low,
            can_craft,
            recovered_level: needs_config.recovery.recovered_level,
        };

        let next = choose_behavior(*behavior, needs, &needs_config.thresholds, &context);
        if next != *behavior {
            debug!(
                "{} ({}) transitions to behavior: {} -> {}",
                identity.display_name, identity.id, *behavior, next
            );
            *behavior = next;
        }
    }
}

/// Resting restores rest and energy; drinking restores thirst.
pub fn apply_behavior_recovery(
    clock: Res<SimulationClock>,
    needs_config: Res<NeedsConfig>,
    mut agents: Query<(&BehaviorState, &mut NeedsState)>,
) {
    let delta = clock.delta_seconds();
    if delta <= 0.0 {
        return;
    }
    let recovery = &needs_config.recovery;

    for (behavior, mut needs) in agents.iter_mut() {
        match behavior {
            BehaviorState::Resting => {
                needs.satisfy_rest(recovery.rest_per_second * delta);
                needs.satisfy_energy(recovery.energy_per_second * delta);
            }
            BehaviorState::Drinking => {
                needs.satisfy_thirst(recovery.thirst_per_second * delta);
            }
            _ => {}
        }
    }
}
