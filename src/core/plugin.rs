//! CorePlugin owns the scaled simulation clock every tick-driven system reads.
use bevy::prelude::*;
#[cfg(feature = "core_debug")]
use bevy::time::TimerMode;
use std::time::Duration;

use super::save::SaveRequested;

pub const DEFAULT_TIME_SCALE: f32 = 1.0;
const MIN_TIME_SCALE: f32 = 0.001;

#[cfg(feature = "core_debug")]
#[derive(Resource)]
struct DebugTickTimer {
    timer: Timer,
}

#[cfg(feature = "core_debug")]
impl Default for DebugTickTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(5.0, TimerMode::Repeating),
        }
    }
}

/// Scaled simulation time. Systems take their delta from here, never from
/// Bevy's frame timer directly, so a tick can be replayed by feeding the same
/// deltas.
#[derive(Resource, Debug)]
pub struct SimulationClock {
    time_scale: f32,
    last_scaled_delta: Duration,
    elapsed: Duration,
    tick: u64,
}

impl SimulationClock {
    pub fn new(time_scale: f32) -> Self {
        Self {
            time_scale: sanitise_scale(time_scale),
            last_scaled_delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            tick: 0,
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = sanitise_scale(scale);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn last_scaled_delta(&self) -> Duration {
        self.last_scaled_delta
    }

    /// Scaled delta of the current tick in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.last_scaled_delta.as_secs_f32()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of ticks applied since start-up.
    pub fn tick_index(&self) -> u64 {
        self.tick
    }

    /// Applies one real frame delta.
    pub fn tick(&mut self, real_delta: Duration) {
        self.last_scaled_delta = real_delta.mul_f32(self.time_scale);
        self.elapsed += self.last_scaled_delta;
        self.tick = self.tick.saturating_add(1);
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

fn sanitise_scale(scale: f32) -> f32 {
    if scale.is_finite() {
        scale.max(MIN_TIME_SCALE)
    } else {
        DEFAULT_TIME_SCALE
    }
}

/// Orders the per-tick work of every simulation plugin.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Clock,
    Behavior,
    Needs,
    Settlement,
    Crafting,
}

/// Registers the simulation clock and the tick ordering.
#[derive(Debug, Clone, Copy)]
pub struct CorePlugin {
    time_scale: f32,
}

impl CorePlugin {
    pub const fn with_time_scale(time_scale: f32) -> Self {
        Self { time_scale }
    }
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self::with_time_scale(DEFAULT_TIME_SCALE)
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimulationClock::new(self.time_scale))
            .add_message::<SaveRequested>()
            .configure_sets(
                Update,
                (
                    SimulationSet::Clock,
                    SimulationSet::Behavior,
                    SimulationSet::Needs,
                    SimulationSet::Settlement,
                    SimulationSet::Crafting,
                )
                    .chain(),
            )
            .add_systems(Startup, log_startup_time_scale)
            .add_systems(Update, update_simulation_clock.in_set(SimulationSet::Clock));

        #[cfg(feature = "core_debug")]
        {
            app.insert_resource(DebugTickTimer::default())
                .add_systems(Update, log_scaled_ticks.after(SimulationSet::Crafting));
        }
    }
}

fn update_simulation_clock(mut clock: ResMut<SimulationClock>, time: Res<Time>) {
    clock.tick(time.delta());
}

fn log_startup_time_scale(clock: Res<SimulationClock>) {
    info!("Simulation clock running at time scale {:.3}", clock.time_scale());
}

#[cfg(feature = "core_debug")]
fn log_scaled_ticks(mut timer: ResMut<DebugTickTimer>, clock: Res<SimulationClock>) {
    if timer.timer.tick(clock.last_scaled_delta()).just_finished() {
        info!(
            target: "core_debug",
            "tick {} | sim elapsed {:.2}s | scale {:.3} | dt {:.4}s",
            clock.tick_index(),
            clock.elapsed().as_secs_f32(),
            clock.time_scale(),
            clock.delta_seconds(),
        );
    }
}
