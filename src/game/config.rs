use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use serde::{Deserialize, Serialize};

/// Static configuration loaded once at startup. These values define the
/// simulation's fundamental parameters; changing them mid-run would change
/// tick-for-tick behavior, so they are never hot-reloaded.
#[derive(Resource, Deserialize, Serialize, Clone, Debug)]
pub struct InitialConfig {
    // Simulation (deterministic, must not change mid-game)
    pub tick_rate: f64,
    pub rng_seed: u64,
    pub epsilon: f32,

    // Camera-space extents that the director and broadphase reason in.
    pub screen_width: f32,
    pub screen_height: f32,

    // Broadphase
    pub quadtree_capacity: usize,

    // Player stat block
    pub player_speed: f32,
    pub player_max_health: f32,
    pub player_size: (f32, f32),
    pub starting_abilities: Vec<String>,

    // Director / wave spawning
    pub spawn_interval: f32,
    pub max_enemy_count: usize,
    pub wave_enemy_count: u32,
    pub off_screen_distance: f32,
    pub reposition_margin: f32,
    pub wave_health_scale: f32,
    pub wave_damage_scale: f32,
    pub line_spacing: f32,
    pub line_jitter: f32,
    pub herd_radius: f32,
    pub herd_jitter: f32,

    // Abilities
    pub default_stagger_rate: f32,
    pub zoom_arrival_epsilon: f32,
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            rng_seed: 0xD05C_FA11,
            epsilon: 0.0001,
            screen_width: 1920.0,
            screen_height: 1080.0,
            quadtree_capacity: 4,
            player_speed: 220.0,
            player_max_health: 100.0,
            player_size: (48.0, 48.0),
            starting_abilities: vec!["ember_lance".to_string()],
            spawn_interval: 10.0,
            max_enemy_count: 150,
            wave_enemy_count: 15,
            off_screen_distance: 100.0,
            reposition_margin: 300.0,
            wave_health_scale: 0.8,
            wave_damage_scale: 0.8,
            line_spacing: 50.0,
            line_jitter: 30.0,
            herd_radius: 100.0,
            herd_jitter: 10.0,
            default_stagger_rate: 0.5,
            zoom_arrival_epsilon: 5.0,
        }
    }
}

/// Runtime configuration that can be hot-reloaded during gameplay. Nothing
/// in here may influence the simulation outcome — controls and debug
/// visibility only.
#[derive(Deserialize, Serialize, Asset, TypePath, Clone, Debug)]
pub struct GameConfig {
    pub key_move_up: KeyCode,
    pub key_move_down: KeyCode,
    pub key_move_left: KeyCode,
    pub key_move_right: KeyCode,
    pub key_pause: KeyCode,

    pub debug_log_broadphase: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            key_move_up: KeyCode::KeyW,
            key_move_down: KeyCode::KeyS,
            key_move_left: KeyCode::KeyA,
            key_move_right: KeyCode::KeyD,
            key_pause: KeyCode::Escape,
            debug_log_broadphase: false,
        }
    }
}

#[derive(Resource)]
pub struct GameConfigHandle(pub Handle<GameConfig>);

pub struct GameConfigPlugin;

impl Plugin for GameConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<GameConfig>::new(&["game_config.ron"]))
            .add_systems(Startup, (load_initial_config, setup_runtime_config).chain());
    }
}

/// Load static initial configuration synchronously at startup. This must
/// complete before any state that depends on these values.
pub fn load_initial_config(mut commands: Commands) {
    let initial_config_path = "assets/initial_config.ron";

    match std::fs::read_to_string(initial_config_path) {
        Ok(contents) => match ron::from_str::<InitialConfig>(&contents) {
            Ok(config) => {
                info!("Loaded initial config from {}", initial_config_path);
                commands.insert_resource(config);
            }
            Err(e) => {
                error!("Failed to parse initial config: {}", e);
                error!("Using default InitialConfig");
                commands.insert_resource(InitialConfig::default());
            }
        },
        Err(e) => {
            error!("Failed to read {}: {}", initial_config_path, e);
            error!("Using default InitialConfig");
            commands.insert_resource(InitialConfig::default());
        }
    }
}

/// Load runtime configuration asynchronously (can be hot-reloaded).
fn setup_runtime_config(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle = asset_server.load("game_config.ron");
    commands.insert_resource(GameConfigHandle(handle));
}
