use std::{fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

use super::state::{DecayRates, NEED_MAX, NEED_MIN};

const CONFIG_PATH: &str = "config/needs.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawNeedsConfig {
    #[serde(default)]
    start: RawStart,
    #[serde(default)]
    decay: RawDecay,
    #[serde(default)]
    feeding: RawFeeding,
    #[serde(default)]
    thresholds: RawThresholds,
    #[serde(default)]
    recovery: RawRecovery,
    #[serde(default)]
    save: RawSave,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawStart {
    hunger: f32,
    thirst: f32,
    rest: f32,
    energy: f32,
}

impl Default for RawStart {
    fn default() -> Self {
        Self {
            hunger: NEED_MAX,
            thirst: NEED_MAX,
            rest: NEED_MAX,
            energy: NEED_MAX,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawDecay {
    hunger_per_second: f32,
    thirst_per_second: f32,
    rest_per_second: f32,
    energy_per_second: f32,
}

impl Default for RawDecay {
    fn default() -> Self {
        Self {
            hunger_per_second: 1.0,
            thirst_per_second: 1.2,
            rest_per_second: 0.5,
            energy_per_second: 0.8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawFeeding {
    hunger_per_food: f32,
    starvation_multiplier: f32,
}

impl Default for RawFeeding {
    fn default() -> Self {
        Self {
            hunger_per_food: 10.0,
            starvation_multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawThresholds {
    hunger: f32,
    thirst: f32,
    energy: f32,
    rest: f32,
}

impl Default for RawThresholds {
    fn default() -> Self {
        Self {
            hunger: 30.0,
            thirst: 30.0,
            energy: 20.0,
            rest: 20.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawRecovery {
    rest_per_second: f32,
    energy_per_second: f32,
    thirst_per_second: f32,
    recovered_level: f32,
}

impl Default for RawRecovery {
    fn default() -> Self {
        Self {
            rest_per_second: 6.0,
            energy_per_second: 4.0,
            thirst_per_second: 10.0,
            recovered_level: 80.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawSave {
    autosave_interval_seconds: f32,
    restore_on_start: bool,
}

impl Default for RawSave {
    fn default() -> Self {
        Self {
            autosave_interval_seconds: 120.0,
            restore_on_start: false,
        }
    }
}

/// Runtime configuration derived from `config/needs.toml`.
#[derive(Resource, Debug, Clone)]
pub struct NeedsConfig {
    pub start: NeedLevels,
    pub decay: DecayRates,
    pub feeding: FeedingConfig,
    pub thresholds: NeedThresholds,
    pub recovery: RecoveryConfig,
    /// Simulation seconds between automatic needs saves; `None` disables them.
    pub autosave_interval_seconds: Option<f32>,
    /// Seed agent needs from the latest save records at start-up.
    pub restore_on_start: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeedLevels {
    pub hunger: f32,
    pub thirst: f32,
    pub rest: f32,
    pub energy: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedingConfig {
    /// Hunger restored per unit of food withdrawn.
    pub hunger_per_food: f32,
    /// Hunger decay multiplier while no food could be withdrawn.
    pub starvation_multiplier: f32,
}

/// A need counts as met only when strictly above its threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeedThresholds {
    pub hunger: f32,
    pub thirst: f32,
    pub energy: f32,
    /// Used for behavior selection only; basic-needs checks ignore rest.
    pub rest: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecoveryConfig {
    pub rest_per_second: f32,
    pub energy_per_second: f32,
    pub thirst_per_second: f32,
    /// Level a resting or drinking agent must reach before doing anything else.
    pub recovered_level: f32,
}

impl NeedsConfig {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<RawNeedsConfig>(&raw) {
                Ok(parsed) => parsed.into(),
                Err(err) => {
                    warn!(
                        "Failed to parse {} ({}). Falling back to defaults.",
                        CONFIG_PATH, err
                    );
                    RawNeedsConfig::default().into()
                }
            },
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawNeedsConfig::default().into()
            }
        }
    }
}

impl Default for NeedsConfig {
    fn default() -> Self {
        RawNeedsConfig::default().into()
    }
}

impl From<RawNeedsConfig> for NeedsConfig {
    fn from(value: RawNeedsConfig) -> Self {
        let start = NeedLevels {
            hunger: clamp_level(value.start.hunger),
            thirst: clamp_level(value.start.thirst),
            rest: clamp_level(value.start.rest),
            energy: clamp_level(value.start.energy),
        };

        let decay = DecayRates {
            hunger: non_negative(value.decay.hunger_per_second),
            thirst: non_negative(value.decay.thirst_per_second),
            rest: non_negative(value.decay.rest_per_second),
            energy: non_negative(value.decay.energy_per_second),
        };

        let feeding = FeedingConfig {
            hunger_per_food: non_negative(value.feeding.hunger_per_food),
            starvation_multiplier: value.feeding.starvation_multiplier.max(1.0),
        };

        let thresholds = NeedThresholds {
            hunger: clamp_level(value.thresholds.hunger),
            thirst: clamp_level(value.thresholds.thirst),
            energy: clamp_level(value.thresholds.energy),
            rest: clamp_level(value.thresholds.rest),
        };

        let mut recovery = RecoveryConfig {
            rest_per_second: non_negative(value.recovery.rest_per_second),
            energy_per_second: non_negative(value.recovery.energy_per_second),
            thirst_per_second: non_negative(value.recovery.thirst_per_second),
            recovered_level: clamp_level(value.recovery.recovered_level),
        };
        let highest_threshold = thresholds
            .thirst
            .max(thresholds.energy)
            .max(thresholds.rest);
        if recovery.recovered_level < highest_threshold {
            recovery.recovered_level = highest_threshold;
        }

        let interval = value.save.autosave_interval_seconds;
        let autosave_interval_seconds = (interval.is_finite() && interval > 0.0).then_some(interval);

        Self {
            start,
            decay,
            feeding,
            thresholds,
            recovery,
            autosave_interval_seconds,
            restore_on_start: value.save.restore_on_start,
        }
    }
}

fn clamp_level(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(NEED_MIN, NEED_MAX)
    } else {
        NEED_MAX
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
