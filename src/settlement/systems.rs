//! Systems that feed the shared stockpile.
use bevy::prelude::*;

use crate::{
    agent::BehaviorState,
    core::{read_json_lines, SaveRequested, SimulationClock},
    crafting::CraftingLedger,
    needs::{NeedsConfig, NeedsState},
};

use super::{
    config::SettlementConfig,
    miracles::{perform_miracle, Miracle, MiracleRequested},
    save::{SettlementSaveLog, SettlementSaveRecord},
    stockpile::{ResourcePool, SettlementStockpile},
};

const STATUS_LOG_INTERVAL_SECONDS: f32 = 30.0;

#[derive(Resource)]
pub struct SettlementStatusTimer {
    timer: Timer,
}

impl Default for SettlementStatusTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(STATUS_LOG_INTERVAL_SECONDS, TimerMode::Repeating),
        }
    }
}

/// Each gathering agent adds `gather_rate * delta` food, scaled once
/// Efficient Gathering has been granted.
pub fn gather_food(
    clock: Res<SimulationClock>,
    config: Res<SettlementConfig>,
    mut stockpile: ResMut<SettlementStockpile>,
    agents: Query<&BehaviorState>,
) {
    let delta = clock.delta_seconds();
    if delta <= 0.0 {
        return;
    }

    let gatherers = agents
        .iter()
        .filter(|behavior| **behavior == BehaviorState::Gathering)
        .count();
    if gatherers > 0 {
        let multiplier = if stockpile.has_efficient_gathering() {
            config.miracles.efficient_gathering_multiplier
        } else {
            1.0
        };
        stockpile.add_food(config.gather_rate * multiplier * delta * gatherers as f32);
    }
}

/// Each agent whose basic needs are met adds `faith_generation_rate * delta`.
pub fn generate_faith(
    clock: Res<SimulationClock>,
    config: Res<SettlementConfig>,
    needs_config: Res<NeedsConfig>,
    mut stockpile: ResMut<SettlementStockpile>,
    agents: Query<&NeedsState>,
) {
    let delta = clock.delta_seconds();
    if delta <= 0.0 {
        return;
    }

    let content = agents
        .iter()
        .filter(|needs| needs.are_basic_needs_met(&needs_config.thresholds))
        .count();
    if content > 0 {
        stockpile.add_faith(config.faith_generation_rate * delta * content as f32);
    }
}

/// Asks for at most one miracle per tick: a gift while food is below the
/// reserve target, otherwise the gathering upgrade once it is affordable.
pub fn invoke_miracles(
    config: Res<SettlementConfig>,
    stockpile: Res<SettlementStockpile>,
    agents: Query<&BehaviorState>,
    mut requests: MessageWriter<MiracleRequested>,
) {
    let miracles = &config.miracles;
    if !miracles.auto_invoke {
        return;
    }

    let population = agents.iter().count();
    let food_low = stockpile.current_food() < config.food_reserve_target(population);
    let faith = stockpile.faith();

    let miracle = if food_low && faith >= miracles.gift_faith_cost {
        Some(Miracle::GiftOfSustenance)
    } else if !stockpile.has_efficient_gathering()
        && faith >= miracles.efficient_gathering_faith_cost
    {
        Some(Miracle::EfficientGathering)
    } else {
        None
    };
    if let Some(miracle) = miracle {
        requests.write(MiracleRequested { miracle });
    }
}

/// Performs requested miracles in arrival order.
pub fn apply_miracles(
    config: Res<SettlementConfig>,
    mut stockpile: ResMut<SettlementStockpile>,
    mut requests: MessageReader<MiracleRequested>,
) {
    for request in requests.read() {
        match perform_miracle(request.miracle, &config.miracles, &mut stockpile) {
            Ok(()) => info!(
                "{} performed; food {:.1} | faith {:.1}",
                request.miracle,
                stockpile.current_food(),
                stockpile.faith()
            ),
            Err(err) => warn!("{} not performed: {}", request.miracle, err),
        }
    }
}

/// Queues one stockpile record for each save request received this tick.
pub fn queue_settlement_snapshot(
    mut requests: MessageReader<SaveRequested>,
    clock: Res<SimulationClock>,
    stockpile: Res<SettlementStockpile>,
    mut log: ResMut<SettlementSaveLog>,
) {
    if requests.read().count() == 0 {
        return;
    }
    log.push(SettlementSaveRecord::capture(
        clock.tick_index(),
        clock.elapsed().as_secs_f64(),
        &stockpile,
    ));
}

pub fn flush_settlement_save_log(mut log: ResMut<SettlementSaveLog>) {
    match log.flush() {
        Ok(0) => {}
        Ok(_) => debug!("Saved settlement stockpile to {:?}", log.path()),
        Err(err) => warn!("Failed to persist settlement to {:?}: {}", log.path(), err),
    }
}

/// Restores the stockpile from the most recent save record when enabled.
pub fn restore_settlement_from_save(
    config: Res<SettlementConfig>,
    log: Res<SettlementSaveLog>,
    mut stockpile: ResMut<SettlementStockpile>,
) {
    if !config.restore_on_start || !log.path().exists() {
        return;
    }

    let records: Vec<SettlementSaveRecord> = match read_json_lines(log.path()) {
        Ok(records) => records,
        Err(err) => {
            warn!("Failed to read settlement save {:?}: {}", log.path(), err);
            return;
        }
    };
    let Some(latest) = records.last() else {
        return;
    };

    latest.apply_to(&mut stockpile);
    info!(
        "Restored settlement from {:?}: food {:.1} | faith {:.1}",
        log.path(),
        stockpile.current_food(),
        stockpile.faith()
    );
}

/// Periodic one-line summary of the settlement.
pub fn log_settlement_status(
    clock: Res<SimulationClock>,
    mut status_timer: ResMut<SettlementStatusTimer>,
    stockpile: Res<SettlementStockpile>,
    ledger: Option<Res<CraftingLedger>>,
    agents: Query<&BehaviorState>,
) {
    if !status_timer
        .timer
        .tick(clock.last_scaled_delta())
        .just_finished()
    {
        return;
    }

    let (completed, rejected) = ledger
        .map(|ledger| (ledger.completed(), ledger.rejected()))
        .unwrap_or_default();
    info!(
        "Settlement at {:.0}s: {} agents | food {:.1} | faith {:.1} | crafts {} ok, {} rejected",
        clock.elapsed().as_secs_f32(),
        agents.iter().count(),
        stockpile.current_food(),
        stockpile.faith(),
        completed,
        rejected
    );
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn settlement_app() -> App {
        let mut clock = SimulationClock::new(1.0);
        clock.tick(Duration::from_secs(2));

        let mut app = App::new();
        app.insert_resource(clock)
            .insert_resource(SettlementConfig::default())
            .insert_resource(NeedsConfig::default())
            .insert_resource(SettlementStockpile::new(0.0, 0.1, 0.0))
            .add_systems(Update, (gather_food, generate_faith).chain());
        app
    }

    #[test]
    fn gatherers_add_food() {
        let mut app = settlement_app();
        app.world_mut()
            .spawn((BehaviorState::Gathering, NeedsState::from_levels(10.0, 90.0, 90.0, 90.0)));
        app.world_mut()
            .spawn((BehaviorState::Gathering, NeedsState::from_levels(10.0, 90.0, 90.0, 90.0)));
        app.world_mut()
            .spawn((BehaviorState::Idle, NeedsState::from_levels(10.0, 90.0, 90.0, 90.0)));

        app.update();

        let stockpile = app.world().resource::<SettlementStockpile>();
        assert_eq!(stockpile.current_food(), 2.0);
        assert_eq!(stockpile.faith(), 0.0);
    }

    #[test]
    fn agents_with_met_needs_generate_faith() {
        let mut app = settlement_app();
        app.world_mut()
            .spawn((BehaviorState::Idle, NeedsState::default()));
        app.world_mut()
            .spawn((BehaviorState::Idle, NeedsState::from_levels(90.0, 20.0, 90.0, 90.0)));

        app.update();

        let stockpile = app.world().resource::<SettlementStockpile>();
        assert!((stockpile.faith() - 0.1).abs() < 1e-6);
        assert_eq!(stockpile.current_food(), 0.0);
    }

    #[test]
    fn efficient_gathering_scales_gathered_food() {
        let mut app = settlement_app();
        app.world_mut()
            .resource_mut::<SettlementStockpile>()
            .grant_efficient_gathering();
        app.world_mut()
            .spawn((BehaviorState::Gathering, NeedsState::from_levels(10.0, 90.0, 90.0, 90.0)));

        app.update();

        let stockpile = app.world().resource::<SettlementStockpile>();
        assert!((stockpile.current_food() - 1.5).abs() < 1e-6);
    }

    fn miracle_app(stockpile: SettlementStockpile) -> App {
        let mut app = App::new();
        app.add_message::<MiracleRequested>()
            .insert_resource(SettlementConfig::default())
            .insert_resource(stockpile)
            .add_systems(Update, (invoke_miracles, apply_miracles).chain());
        app
    }

    #[test]
    fn short_food_spends_faith_on_a_gift() {
        let mut app = miracle_app(SettlementStockpile::new(4.0, 0.1, 6.0));
        app.world_mut().spawn(BehaviorState::Gathering);

        app.update();

        let stockpile = app.world().resource::<SettlementStockpile>();
        assert_eq!(stockpile.current_food(), 24.0);
        assert_eq!(stockpile.faith(), 1.0);
        assert!(!stockpile.has_efficient_gathering());

        app.update();
        assert_eq!(app.world().resource::<SettlementStockpile>().faith(), 1.0);
    }

    #[test]
    fn spare_faith_buys_the_gathering_upgrade_once() {
        let mut app = miracle_app(SettlementStockpile::new(100.0, 0.1, 35.0));
        app.world_mut().spawn(BehaviorState::Idle);

        app.update();
        app.update();

        let stockpile = app.world().resource::<SettlementStockpile>();
        assert!(stockpile.has_efficient_gathering());
        assert_eq!(stockpile.faith(), 20.0);
        assert_eq!(stockpile.current_food(), 100.0);
    }

    #[test]
    fn stockpile_survives_a_save_and_restore() {
        let path = std::env::temp_dir()
            .join(format!(
                "hearthlands_settlement_save_{}",
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|elapsed| elapsed.as_nanos())
                    .unwrap_or_default()
            ))
            .join("settlement.jsonl");

        let mut saved = SettlementStockpile::new(17.25, 0.1, 9.5);
        saved.grant_efficient_gathering();
        let mut app = App::new();
        app.add_message::<SaveRequested>()
            .insert_resource(SimulationClock::new(1.0))
            .insert_resource(saved.clone())
            .insert_resource(SettlementSaveLog::new(&path))
            .add_systems(
                Update,
                (queue_settlement_snapshot, flush_settlement_save_log).chain(),
            );
        app.world_mut().write_message(SaveRequested);
        app.update();
        assert!(path.exists());

        let mut restored = App::new();
        restored
            .insert_resource(SettlementConfig {
                restore_on_start: true,
                ..SettlementConfig::default()
            })
            .insert_resource(SettlementStockpile::new(60.0, 0.1, 0.0))
            .insert_resource(SettlementSaveLog::new(&path))
            .add_systems(Startup, restore_settlement_from_save);
        restored.update();

        assert_eq!(restored.world().resource::<SettlementStockpile>(), &saved);

        if let Some(parent) = path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }
}
