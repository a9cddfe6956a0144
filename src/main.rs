use std::{env, path::Path, time::Duration};

use bevy::{app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*};

mod agent;
mod content;
mod core;
mod crafting;
mod needs;
mod settlement;

use crate::{
    agent::AgentPlugin,
    content::ContentPlugin,
    core::{plugin::DEFAULT_TIME_SCALE, CorePlugin},
    crafting::CraftingPlugin,
    needs::NeedsPlugin,
    settlement::SettlementPlugin,
};

const TICKS_PER_SECOND: f64 = 20.0;

fn main() {
    load_settings_env();

    let content = match env::var("HEARTHLANDS_CONTENT_PATH") {
        Ok(path) if !path.trim().is_empty() => ContentPlugin::from_path(path.trim()),
        _ => ContentPlugin::default(),
    };

    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / TICKS_PER_SECOND,
            ))),
            LogPlugin::default(),
            CorePlugin::with_time_scale(time_scale_from_env()),
            content,
            SettlementPlugin,
            NeedsPlugin,
            AgentPlugin, // After the config-owning plugins; spawning reads their resources
            CraftingPlugin,
        ))
        .run();
}

fn load_settings_env() {
    const SETTINGS_FILE: &str = "settings.env";

    let path = Path::new(SETTINGS_FILE);
    if !path.exists() {
        return;
    }

    if let Err(err) = dotenvy::from_filename(path) {
        eprintln!("Failed to load {}: {}", SETTINGS_FILE, err);
    }
}

fn time_scale_from_env() -> f32 {
    match env::var("HEARTHLANDS_TIME_SCALE") {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            eprintln!(
                "Ignoring HEARTHLANDS_TIME_SCALE={:?}; using {}",
                raw, DEFAULT_TIME_SCALE
            );
            DEFAULT_TIME_SCALE
        }),
        Err(_) => DEFAULT_TIME_SCALE,
    }
}
