#![allow(dead_code)]

//! Shared harness: a headless app running the full simulation stack, driven
//! tick by tick through the FixedUpdate schedule.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use duskfall::game::ability::AbilityPlugin;
use duskfall::game::config::GameConfigPlugin;
use duskfall::game::content::ContentLibrary;
use duskfall::game::director::DirectorPlugin;
use duskfall::game::fixed_math::{FixedNum, FixedVec2};
use duskfall::game::simulation::{
    ActorKind, Body, Enemy, Health, MoveSpeed, Player, SimConfig, SimPosition, SimulationPlugin,
    StatusEffects, Target, TargetPosition,
};
use duskfall::game::GameState;

pub fn sim_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.add_plugins(AssetPlugin::default());
    app.add_plugins(GameConfigPlugin);
    app.add_plugins(SimulationPlugin);
    app.add_plugins(AbilityPlugin);
    app.add_plugins(DirectorPlugin);
    app.init_state::<GameState>();
    app.insert_resource(ContentLibrary::load().expect("content database loads"));
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::InGame);

    // Run Startup and apply the state transition.
    app.update();
    app
}

/// Overrides the tick rate so tests can advance in exact, coarse steps.
pub fn set_tick_rate(app: &mut App, hz: f64) {
    app.world_mut().resource_mut::<SimConfig>().tick_rate = hz;
}

pub fn run_ticks(app: &mut App, count: usize) {
    for _ in 0..count {
        app.world_mut().run_schedule(FixedUpdate);
    }
}

pub fn fx(v: f32) -> FixedNum {
    FixedNum::from_num(v)
}

pub fn spawn_player_at(app: &mut App, x: f32, y: f32) -> Entity {
    app.world_mut()
        .spawn((
            Player,
            ActorKind::Player,
            SimPosition(FixedVec2::from_f32(x, y)),
            Body::new(fx(48.0), fx(48.0)),
            MoveSpeed(fx(220.0)),
            Health::new(fx(100.0)),
            StatusEffects::default(),
        ))
        .id()
}

pub fn spawn_enemy_at(app: &mut App, x: f32, y: f32, health: f32) -> Entity {
    app.world_mut()
        .spawn((
            Enemy,
            ActorKind::Enemy,
            SimPosition(FixedVec2::from_f32(x, y)),
            Body::new(fx(40.0), fx(40.0)),
            MoveSpeed(fx(90.0)),
            Health::new(fx(health)),
            StatusEffects::default(),
            Target(None),
            TargetPosition(None),
        ))
        .id()
}
