//! Settlement plugin owning the shared stockpile, its miracles and its save.
use bevy::prelude::*;

use crate::core::SimulationSet;

use super::{
    config::SettlementConfig,
    miracles::MiracleRequested,
    save::{SettlementSaveLog, SETTLEMENT_SAVE_PATH},
    systems::{
        apply_miracles, flush_settlement_save_log, gather_food, generate_faith, invoke_miracles,
        log_settlement_status, queue_settlement_snapshot, restore_settlement_from_save,
        SettlementStatusTimer,
    },
};

pub struct SettlementPlugin;

impl Plugin for SettlementPlugin {
    fn build(&self, app: &mut App) {
        let config = SettlementConfig::load_or_default();
        app.insert_resource(config.stockpile())
            .insert_resource(config)
            .insert_resource(SettlementSaveLog::new(SETTLEMENT_SAVE_PATH))
            .init_resource::<SettlementStatusTimer>()
            .add_message::<MiracleRequested>()
            .add_systems(Startup, restore_settlement_from_save)
            .add_systems(
                Update,
                (
                    gather_food,
                    generate_faith,
                    invoke_miracles,
                    apply_miracles,
                    queue_settlement_snapshot,
                    flush_settlement_save_log,
                    log_settlement_status,
                )
                    .chain()
                    .in_set(SimulationSet::Settlement),
            );
    }
}
