use bevy::prelude::*;

pub mod ability;
pub mod config;
pub mod content;
pub mod director;
pub mod fixed_math;
pub mod movement;
pub mod quadtree;
pub mod simulation;
pub mod visuals;
pub mod waves;

use ability::{AbilityInstance, AbilityOwner, AbilityPlugin, AbilityStats, PendingTriggers};
use config::{GameConfig, GameConfigHandle, GameConfigPlugin, InitialConfig};
use content::ContentLibrary;
use director::DirectorPlugin;
use fixed_math::FixedVec2;
use simulation::{
    ActorKind, Body, Health, MoveSpeed, Player, PlayerMoveCommand, SimConfig, SimPosition,
    SimulationPlugin, StatusEffects, VisualFrame,
};

#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    Boot,
    InGame,
    Paused,
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>();

        app.add_plugins((
            GameConfigPlugin,
            SimulationPlugin,
            AbilityPlugin,
            DirectorPlugin,
        ));

        app.add_systems(
            Startup,
            (
                setup_presentation,
                (load_content, finish_boot)
                    .chain()
                    .after(config::load_initial_config),
            ),
        );
        app.add_systems(OnEnter(GameState::InGame), spawn_player);
        app.add_systems(
            Update,
            (
                player_input.run_if(in_state(GameState::InGame)),
                toggle_pause.run_if(in_state(GameState::InGame).or(in_state(GameState::Paused))),
                visuals::sync_transforms,
                visuals::advance_visual_frames,
                visuals::log_broadphase_stats,
            ),
        );
    }
}

fn setup_presentation(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Loads the typed content database. A broken or incomplete database is the
/// one error allowed to abort startup.
fn load_content(mut commands: Commands, initial: Option<Res<InitialConfig>>) {
    let library = match ContentLibrary::load() {
        Ok(library) => library,
        Err(e) => {
            error!("Content configuration error: {e}");
            panic!("content configuration error: {e}");
        }
    };

    // Surface dangling loadout references now, not mid-run.
    if let Some(initial) = initial {
        for id in &initial.starting_abilities {
            if let Err(e) = library.ability(id) {
                error!("Content configuration error: {e}");
                panic!("content configuration error: {e}");
            }
        }
    }

    commands.insert_resource(library);
}

fn finish_boot(mut next_state: ResMut<NextState<GameState>>) {
    info!("Boot complete");
    next_state.set(GameState::InGame);
}

/// Spawns the player actor and its starting ability loadout.
fn spawn_player(
    mut commands: Commands,
    sim_config: Res<SimConfig>,
    initial: Option<Res<InitialConfig>>,
    content: Res<ContentLibrary>,
) {
    let player = commands
        .spawn((
            Player,
            ActorKind::Player,
            SimPosition(FixedVec2::ZERO),
            Body { size: sim_config.player_size },
            MoveSpeed(sim_config.player_speed),
            Health::new(sim_config.player_max_health),
            StatusEffects::default(),
            VisualFrame::default(),
            Transform::default(),
        ))
        .id();

    let loadout: Vec<String> = initial
        .map(|i| i.starting_abilities.clone())
        .unwrap_or_else(|| InitialConfig::default().starting_abilities);

    for id in loadout {
        match content.ability(&id) {
            Ok(spec) => {
                commands.spawn((
                    AbilityInstance::new(id),
                    AbilityStats::from_spec(spec, sim_config.default_stagger_rate),
                    PendingTriggers::default(),
                    AbilityOwner(player),
                ));
            }
            Err(e) => {
                // Checked at boot; unreachable unless content changed on disk.
                error!("Skipping ability: {e}");
            }
        }
    }

    info!("Player spawned");
}

/// Thin input layer: keyboard state becomes one movement command per frame.
fn player_input(
    keys: Res<ButtonInput<KeyCode>>,
    handle: Option<Res<GameConfigHandle>>,
    configs: Res<Assets<GameConfig>>,
    mut moves: MessageWriter<PlayerMoveCommand>,
) {
    let default_config = GameConfig::default();
    let config = handle
        .and_then(|h| configs.get(&h.0))
        .unwrap_or(&default_config);

    let mut direction = Vec2::ZERO;
    if keys.pressed(config.key_move_up) {
        direction.y += 1.0;
    }
    if keys.pressed(config.key_move_down) {
        direction.y -= 1.0;
    }
    if keys.pressed(config.key_move_left) {
        direction.x -= 1.0;
    }
    if keys.pressed(config.key_move_right) {
        direction.x += 1.0;
    }

    if direction != Vec2::ZERO {
        moves.write(PlayerMoveCommand {
            direction: FixedVec2::from_f32(direction.x, direction.y),
        });
    }
}

fn toggle_pause(
    keys: Res<ButtonInput<KeyCode>>,
    handle: Option<Res<GameConfigHandle>>,
    configs: Res<Assets<GameConfig>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let default_config = GameConfig::default();
    let config = handle
        .and_then(|h| configs.get(&h.0))
        .unwrap_or(&default_config);

    if keys.just_pressed(config.key_pause) {
        match state.get() {
            GameState::InGame => next_state.set(GameState::Paused),
            GameState::Paused => next_state.set(GameState::InGame),
            GameState::Boot => {}
        }
    }
}
