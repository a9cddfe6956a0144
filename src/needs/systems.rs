use std::collections::HashMap;

use bevy::prelude::*;

use crate::{
    agent::Identity,
    core::{read_json_lines, SaveRequested, SimulationClock},
    settlement::SettlementStockpile,
};

use super::{
    config::NeedsConfig,
    snapshot::{NeedsSaveLog, NeedsSaveRecord},
    state::{NeedsState, NEED_MIN},
};

/// Last observed flags, kept so only changes are logged.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeedsStatus {
    pub starving: bool,
    pub basic_needs_met: bool,
}

impl Default for NeedsStatus {
    fn default() -> Self {
        Self {
            starving: false,
            basic_needs_met: true,
        }
    }
}

/// Advances every agent's needs against the shared stockpile in agent id
/// order.
pub fn tick_agent_needs(
    clock: Res<SimulationClock>,
    config: Res<NeedsConfig>,
    mut stockpile: ResMut<SettlementStockpile>,
    mut query: Query<(&Identity, &mut NeedsState, &mut NeedsStatus)>,
) {
    let delta = clock.delta_seconds();
    if delta <= 0.0 {
        return;
    }

    let mut agents: Vec<_> = query.iter_mut().collect();
    agents.sort_by_key(|(identity, ..)| identity.id);

    for (identity, mut needs, mut status) in agents {
        let outcome = needs.update_needs(delta, &config, &mut *stockpile);

        if outcome.starving != status.starving {
            if outcome.starving {
                warn!(
                    "{} ({}) is starving; hunger at {:.1}",
                    identity.display_name,
                    identity.id,
                    needs.hunger()
                );
            } else {
                info!(
                    "{} ({}) is eating again",
                    identity.display_name, identity.id
                );
            }
            status.starving = outcome.starving;
        }

        let met = needs.are_basic_needs_met(&config.thresholds);
        if met != status.basic_needs_met {
            info!(
                "{} ({}) basic needs {}",
                identity.display_name,
                identity.id,
                if met { "met" } else { "unmet" }
            );
            status.basic_needs_met = met;
        }
    }
}

/// Despawns every agent whose hunger has run out.
pub fn remove_starved_agents(
    mut commands: Commands,
    agents: Query<(Entity, &Identity, &NeedsState)>,
) {
    let mut starved: Vec<_> = agents
        .iter()
        .filter(|(_, _, needs)| needs.hunger() <= NEED_MIN)
        .collect();
    if starved.is_empty() {
        return;
    }
    starved.sort_by_key(|(_, identity, _)| identity.id);

    for (entity, identity, _) in &starved {
        warn!(
            "{} ({}) died of starvation",
            identity.display_name, identity.id
        );
        commands.entity(*entity).despawn();
    }
    info!(
        "Population down to {} after starvation",
        agents.iter().count() - starved.len()
    );
}

/// Fires `SaveRequested` every autosave interval of simulation time.
#[derive(Resource, Debug)]
pub struct NeedsAutosave {
    timer: Option<Timer>,
}

impl NeedsAutosave {
    pub fn new(interval_seconds: Option<f32>) -> Self {
        Self {
            timer: interval_seconds
                .map(|seconds| Timer::from_seconds(seconds, TimerMode::Repeating)),
        }
    }
}

pub fn request_needs_autosave(
    clock: Res<SimulationClock>,
    mut autosave: ResMut<NeedsAutosave>,
    mut requests: MessageWriter<SaveRequested>,
) {
    let Some(timer) = autosave.timer.as_mut() else {
        return;
    };
    if timer.tick(clock.last_scaled_delta()).just_finished() {
        requests.write(SaveRequested);
    }
}

/// Queues one save record per agent for each request received this tick.
pub fn queue_needs_snapshots(
    mut requests: MessageReader<SaveRequested>,
    clock: Res<SimulationClock>,
    mut log: ResMut<NeedsSaveLog>,
    query: Query<(&Identity, &NeedsState)>,
) {
    if requests.read().count() == 0 {
        return;
    }

    let mut agents: Vec<_> = query.iter().collect();
    agents.sort_by_key(|(identity, _)| identity.id);

    for (identity, needs) in agents {
        log.push(NeedsSaveRecord {
            tick: clock.tick_index(),
            elapsed_seconds: clock.elapsed().as_secs_f64(),
            agent_id: identity.id.to_string(),
            display_name: identity.display_name.clone(),
            needs: needs.snapshot(),
        });
    }
}

/// Restores each agent from its most recent save record when enabled.
pub fn restore_needs_from_save(
    config: Res<NeedsConfig>,
    log: Res<NeedsSaveLog>,
    mut query: Query<(&Identity, &mut NeedsState)>,
) {
    if !config.restore_on_start || !log.path().exists() {
        return;
    }

    let records: Vec<NeedsSaveRecord> = match read_json_lines(log.path()) {
        Ok(records) => records,
        Err(err) => {
            warn!("Failed to read needs save {:?}: {}", log.path(), err);
            return;
        }
    };

    let latest: HashMap<String, NeedsSaveRecord> = records
        .into_iter()
        .map(|record| (record.agent_id.clone(), record))
        .collect();

    let mut restored = 0;
    for (identity, mut needs) in query.iter_mut() {
        if let Some(record) = latest.get(&identity.id.to_string()) {
            *needs = NeedsState::restore(&record.needs);
            restored += 1;
        }
    }
    info!("Restored needs of {} agents from {:?}", restored, log.path());
}

/// Flushes queued save records to disk, logging a warning if persistence fails.
pub fn flush_needs_save_log(mut log: ResMut<NeedsSaveLog>) {
    match log.flush() {
        Ok(0) => {}
        Ok(written) => info!("Saved needs of {} agents to {:?}", written, log.path()),
        Err(err) => warn!("Failed to persist needs to {:?}: {}", log.path(), err),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::ecs::message::Messages;

    use super::*;
    use crate::{agent::AgentId, needs::snapshot::NeedsSnapshot, settlement::ResourcePool};

    fn ticked_clock(seconds: u64) -> SimulationClock {
        let mut clock = SimulationClock::new(1.0);
        clock.tick(Duration::from_secs(seconds));
        clock
    }

    fn spawn_agent(app: &mut App, value: u64, needs: NeedsState) -> Entity {
        let id = AgentId::new(value);
        app.world_mut()
            .spawn((
                id,
                Identity::new(id, format!("Settler {value}"), "entity_settler"),
                needs,
                NeedsStatus::default(),
            ))
            .id()
    }

    #[test]
    fn lower_agent_ids_eat_first_from_scarce_food() {
        let mut app = App::new();
        app.insert_resource(ticked_clock(1))
            .insert_resource(NeedsConfig::default())
            .insert_resource(SettlementStockpile::new(1.0, 1.0, 0.0))
            .add_systems(Update, tick_agent_needs);

        let late = spawn_agent(&mut app, 2, NeedsState::from_levels(50.0, 90.0, 90.0, 90.0));
        let early = spawn_agent(&mut app, 1, NeedsState::from_levels(50.0, 90.0, 90.0, 90.0));

        app.update();

        let world = app.world();
        assert_eq!(world.resource::<SettlementStockpile>().current_food(), 0.0);
        let fed = world.get::<NeedsState>(early).expect("early needs");
        let hungry = world.get::<NeedsState>(late).expect("late needs");
        assert_eq!(fed.hunger(), 60.0);
        assert_eq!(hungry.hunger(), 48.0);
        assert!(world.get::<NeedsStatus>(late).expect("late status").starving);
        assert!(!world.get::<NeedsStatus>(early).expect("early status").starving);
    }

    #[test]
    fn basic_needs_status_tracks_thresholds() {
        let mut app = App::new();
        app.insert_resource(ticked_clock(2))
            .insert_resource(NeedsConfig::default())
            .insert_resource(SettlementStockpile::new(100.0, 0.1, 0.0))
            .add_systems(Update, tick_agent_needs);

        let agent = spawn_agent(&mut app, 1, NeedsState::from_levels(90.0, 31.0, 90.0, 90.0));

        app.update();

        let status = app.world().get::<NeedsStatus>(agent).expect("status");
        assert!(!status.basic_needs_met);
        assert!(!status.starving);
    }

    #[test]
    fn agents_whose_hunger_runs_out_are_removed() {
        let mut app = App::new();
        app.insert_resource(ticked_clock(1))
            .insert_resource(NeedsConfig::default())
            .insert_resource(SettlementStockpile::new(0.0, 1.0, 0.0))
            .add_systems(Update, (tick_agent_needs, remove_starved_agents).chain());

        let doomed = spawn_agent(&mut app, 1, NeedsState::from_levels(1.5, 90.0, 90.0, 90.0));
        let survivor = spawn_agent(&mut app, 2, NeedsState::from_levels(50.0, 90.0, 90.0, 90.0));

        app.update();

        let world = app.world();
        assert!(world.get_entity(doomed).is_err());
        let needs = world.get::<NeedsState>(survivor).expect("survivor needs");
        assert_eq!(needs.hunger(), 48.0);
    }

    #[test]
    fn save_requests_write_every_agent() {
        let path = std::env::temp_dir()
            .join(format!(
                "hearthlands_needs_systems_{}",
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|elapsed| elapsed.as_nanos())
                    .unwrap_or_default()
            ))
            .join("needs.jsonl");

        let mut app = App::new();
        app.add_message::<SaveRequested>()
            .insert_resource(ticked_clock(1))
            .insert_resource(NeedsSaveLog::new(&path))
            .add_systems(Update, (queue_needs_snapshots, flush_needs_save_log).chain());

        spawn_agent(&mut app, 2, NeedsState::default());
        spawn_agent(&mut app, 1, NeedsState::from_levels(40.0, 50.0, 60.0, 70.0));

        app.update();
        assert!(!path.exists());

        app.world_mut().write_message(SaveRequested);
        app.update();

        let records: Vec<NeedsSaveRecord> = read_json_lines(&path).expect("save file");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].agent_id, "AGENT-0001");
        assert_eq!(records[0].needs.hunger, 40.0);
        assert_eq!(records[1].agent_id, "AGENT-0002");

        if let Some(parent) = path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn restore_uses_the_latest_record_per_agent() {
        let path = std::env::temp_dir()
            .join(format!(
                "hearthlands_needs_restore_{}",
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|elapsed| elapsed.as_nanos())
                    .unwrap_or_default()
            ))
            .join("needs.jsonl");
        let mut log = NeedsSaveLog::new(&path);
        for (tick, hunger) in [(1, 70.0), (2, 150.0)] {
            log.push(NeedsSaveRecord {
                tick,
                elapsed_seconds: tick as f64,
                agent_id: "AGENT-0001".into(),
                display_name: "Settler 1".into(),
                needs: NeedsSnapshot {
                    hunger,
                    thirst: 40.0,
                    rest: 30.0,
                    energy: 20.0,
                },
            });
        }
        log.flush().expect("seed save file");

        let mut app = App::new();
        app.insert_resource(NeedsConfig {
            restore_on_start: true,
            ..NeedsConfig::default()
        })
            .insert_resource(NeedsSaveLog::new(&path))
            .add_systems(Startup, restore_needs_from_save);
        let saved = spawn_agent(&mut app, 1, NeedsState::default());
        let fresh = spawn_agent(&mut app, 2, NeedsState::default());

        app.update();

        let world = app.world();
        let restored = world.get::<NeedsState>(saved).expect("restored needs");
        assert_eq!(restored.hunger(), 100.0);
        assert_eq!(restored.thirst(), 40.0);
        assert_eq!(restored.energy(), 20.0);
        assert_eq!(world.get::<NeedsState>(fresh), Some(&NeedsState::default()));

        if let Some(parent) = path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn autosave_fires_on_the_simulation_interval() {
        let mut app = App::new();
        app.add_message::<SaveRequested>()
            .insert_resource(ticked_clock(1))
            .insert_resource(NeedsAutosave::new(Some(2.0)))
            .add_systems(Update, request_needs_autosave);

        app.update();
        assert!(app.world().resource::<Messages<SaveRequested>>().is_empty());

        app.update();
        assert_eq!(
            app.world().resource::<Messages<SaveRequested>>().len(),
            1
        );
    }
}
