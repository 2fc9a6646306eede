//! Simulation layer — the deterministic per-tick core.
//!
//! This module is organized into:
//! - **components**: actor components (position, body, health, pursuit, ...)
//! - **resources**: fixed-point config, RNG, collision tree, tick counters
//! - **events**: commands and events crossing subsystem boundaries
//! - **status**: frozen/paralyzed/controlled clocks and gating
//! - **pursuit**: target acquisition and chase/flee movement
//! - **separation**: solid-body overlap push-apart
//! - **collision**: broadphase rebuild and hit resolution
//! - **lifecycle**: damage, death, lifetimes, ephemeral spawners

use bevy::prelude::*;

use crate::game::GameState;

pub mod collision;
pub mod components;
pub mod events;
pub mod lifecycle;
pub mod pursuit;
pub mod resources;
pub mod separation;
pub mod status;
pub mod systems;

pub use components::*;
pub use events::*;
pub use resources::*;
pub use status::{StatusEffects, StatusTimer};

pub use collision::{decay_hit_cooldowns, enemy_contact_attacks, rebuild_collision_tree, resolve_projectile_hits};
pub use lifecycle::{apply_damage, rift_spawners, tick_lifetimes};
pub use pursuit::{apply_player_movement, pursue_targets, sync_target_positions};
pub use separation::separate_overlapping_bodies;

/// System sets running in this exact order every tick: status clocks first,
/// then movement, overlap separation, the broadphase rebuild, collision
/// resolution, trigger scheduling and finally lifecycle/death.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SimSet {
    Status,
    Movement,
    Separation,
    Broadphase,
    Collision,
    Scheduling,
    Lifecycle,
}

/// Main simulation plugin.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Overridden from InitialConfig once it loads; this keeps headless
        // test apps at a sane timestep.
        app.insert_resource(Time::<Fixed>::from_seconds(1.0 / 60.0));

        app.init_resource::<SimConfig>();
        app.init_resource::<SimRng>();
        app.init_resource::<SimTick>();
        app.init_resource::<SimPerformance>();
        app.init_resource::<CollisionTree>();

        app.add_message::<PlayerMoveCommand>();
        app.add_message::<SpawnWaveCommand>();
        app.add_message::<EliteSpawnCommand>();
        app.add_message::<DamageEvent>();
        app.add_message::<DeathEvent>();
        app.add_message::<DamageNumberEvent>();
        app.add_message::<AudioCueEvent>();

        app.configure_sets(
            FixedUpdate,
            (
                SimSet::Status,
                SimSet::Movement,
                SimSet::Separation,
                SimSet::Broadphase,
                SimSet::Collision,
                SimSet::Scheduling,
                SimSet::Lifecycle,
            )
                .chain()
                .run_if(in_state(GameState::InGame)),
        );

        app.add_systems(
            Startup,
            systems::init_sim_config_from_initial
                .after(crate::game::config::load_initial_config),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::increment_sim_tick.before(systems::sim_start),
                systems::sim_start.before(SimSet::Status),
                systems::sim_end.after(SimSet::Lifecycle),
            ),
        );

        app.add_systems(
            FixedUpdate,
            (
                (status::advance_actor_timers, status::tick_status_effects)
                    .chain()
                    .in_set(SimSet::Status),
                (sync_target_positions, apply_player_movement, pursue_targets)
                    .chain()
                    .in_set(SimSet::Movement),
                separate_overlapping_bodies.in_set(SimSet::Separation),
                rebuild_collision_tree.in_set(SimSet::Broadphase),
                (resolve_projectile_hits, enemy_contact_attacks, decay_hit_cooldowns)
                    .chain()
                    .in_set(SimSet::Collision),
                (apply_damage, tick_lifetimes).chain().in_set(SimSet::Lifecycle),
            ),
        );
    }
}
