//! Tick bookkeeping and config initialization.

use bevy::prelude::*;

use crate::game::config::InitialConfig;
use crate::profile_log;

use super::resources::*;

/// Converts the float config layer into the fixed-point [`SimConfig`],
/// seeds the simulation RNG and aligns the fixed timestep. Runs once at
/// startup, after the initial config loads.
pub fn init_sim_config_from_initial(mut commands: Commands, initial: Option<Res<InitialConfig>>) {
    let Some(initial) = initial else {
        warn!("No InitialConfig loaded; simulation keeps default parameters");
        return;
    };
    commands.insert_resource(SimConfig::from_initial(&initial));
    commands.insert_resource(SimRng::seeded(initial.rng_seed));
    commands.insert_resource(Time::<Fixed>::from_seconds(1.0 / initial.tick_rate));
    info!(
        "Simulation configured: {} Hz, seed {}",
        initial.tick_rate, initial.rng_seed
    );
}

/// First system of every tick.
pub fn increment_sim_tick(mut tick: ResMut<SimTick>) {
    tick.0 += 1;
}

pub fn sim_start(mut perf: ResMut<SimPerformance>) {
    perf.start_time = Some(std::time::Instant::now());
}

pub fn sim_end(
    mut perf: ResMut<SimPerformance>,
    #[allow(unused_variables)] tick: Res<SimTick>,
) {
    if let Some(start) = perf.start_time.take() {
        perf.last_duration = start.elapsed();
    }
    profile_log!(tick, "[SIM_TICK] {} took {:?}", tick.0, perf.last_duration);
}
