use bevy::prelude::*;

use crate::{
    agent::{BehaviorState, Identity},
    core::SimulationClock,
};

use super::{
    components::{Crafter, Inventory},
    engine::{CraftingEngine, CraftingError},
    events::CraftRequested,
    resources::{CraftOutcome, CraftRecord, CraftingLedger},
};

/// Starts, advances or abandons each crafter's job. Finished jobs become
/// `CraftRequested` messages; ingredients are not touched here.
pub fn advance_crafting_jobs(
    clock: Res<SimulationClock>,
    mut requests: MessageWriter<CraftRequested>,
    mut crafters: Query<(Entity, &Identity, &BehaviorState, &Inventory, &mut Crafter)>,
) {
    let delta = clock.delta_seconds();

    let mut agents: Vec<_> = crafters.iter_mut().collect();
    agents.sort_by_key(|(_, identity, ..)| identity.id);

    for (entity, identity, behavior, inventory, mut crafter) in agents {
        if *behavior != BehaviorState::Crafting {
            if let Some(job) = crafter.cancel_job() {
                debug!(
                    "{} ({}) abandons {} after {:.1}s",
                    identity.display_name, identity.id, job.recipe_id, job.elapsed_seconds
                );
            }
            continue;
        }

        if crafter.job().is_none() {
            let Some(recipe) = crafter
                .known_recipes()
                .iter()
                .find(|recipe| CraftingEngine::can_craft(recipe, inventory))
                .cloned()
            else {
                continue;
            };
            debug!(
                "{} ({}) starts crafting {}",
                identity.display_name, identity.id, recipe.recipe_id
            );
            crafter.start_job(&recipe);
        }

        if let Some(recipe_id) = crafter.advance_job(delta) {
            requests.write(CraftRequested {
                entity,
                agent: identity.id,
                recipe_id,
            });
        }
    }
}

/// Applies queued craft requests in agent id order and records each result.
pub fn process_craft_requests(
    clock: Res<SimulationClock>,
    mut requests: MessageReader<CraftRequested>,
    mut ledger: ResMut<CraftingLedger>,
    mut crafters: Query<(&Identity, &Crafter, &mut Inventory)>,
) {
    let mut pending: Vec<CraftRequested> = requests.read().cloned().collect();
    if pending.is_empty() {
        return;
    }
    pending.sort_by_key(|request| request.agent);

    for request in pending {
        let Ok((identity, crafter, mut inventory)) = crafters.get_mut(request.entity) else {
            warn!(
                "Dropping craft request for {} from {}: crafter no longer exists",
                request.recipe_id, request.agent
            );
            continue;
        };

        let result = crafter
            .recipe(&request.recipe_id)
            .ok_or_else(|| CraftingError::UnknownRecipe {
                recipe_id: request.recipe_id.clone(),
            })
            .and_then(|recipe| CraftingEngine::try_craft(recipe, &mut *inventory));

        let outcome = match result {
            Ok(receipt) => {
                debug!(
                    "{} ({}) crafted {} x{}",
                    identity.display_name,
                    identity.id,
                    receipt.produced.item_id,
                    receipt.produced.quantity
                );
                CraftOutcome::Completed {
                    item_id: receipt.produced.item_id,
                    quantity: receipt.produced.quantity,
                }
            }
            Err(error) => {
                warn!(
                    "{} ({}) could not craft {}: {}",
                    identity.display_name, identity.id, request.recipe_id, error
                );
                CraftOutcome::Rejected(error)
            }
        };

        ledger.record(CraftRecord {
            tick: clock.tick_index(),
            agent: request.agent,
            recipe_id: request.recipe_id,
            outcome,
        });
    }
}
