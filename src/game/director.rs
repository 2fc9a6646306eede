//! The enemy director: periodic wave spawning, the global actor cap,
//! wave-scaled stats and off-screen repositioning of runaway enemies.

use bevy::prelude::*;
use rand::Rng;

use crate::game::ability::{AbilityInstance, AbilityOwner, AbilityStats, PendingTriggers};
use crate::game::content::{ContentLibrary, NpcKind, NpcSpec};
use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::game::simulation::{
    ActorKind, AttackTimer, Body, ContactDamage, EliteSpawnCommand, Enemy, FriendlyNpc, Health,
    Lifetime, MoveSpeed, NeutralNpc, NpcId, Player, RiftSpawner, SimConfig, SimPosition, SimRng,
    SimSet, SolidBody, SpawnWaveCommand, StatusEffects, Target, TargetPosition, VisualFrame,
    DeathEvent,
};
use crate::game::waves::{self, ScreenExtents, WaveParams, WavePattern};

// ============================================================================
// Resources
// ============================================================================

#[derive(Resource, Default)]
pub struct DirectorState {
    pub time_since_last_spawn_attempt: FixedNum,
    pub wave_number: u32,
    pub enemies_defeated: u64,
}

// ============================================================================
// Plugin
// ============================================================================

pub struct DirectorPlugin;

impl Plugin for DirectorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DirectorState>();
        app.add_systems(
            FixedUpdate,
            (
                spawn_director,
                crate::game::simulation::rift_spawners,
                handle_wave_commands,
                handle_elite_spawns,
                track_defeats,
            )
                .chain()
                .in_set(SimSet::Scheduling)
                .after(crate::game::ability::handle_upgrade_commands),
        );
    }
}

// ============================================================================
// Systems
// ============================================================================

/// Requests a default wave whenever the spawn interval elapses.
pub fn spawn_director(
    mut state: ResMut<DirectorState>,
    sim_config: Res<SimConfig>,
    mut waves_out: MessageWriter<SpawnWaveCommand>,
) {
    state.time_since_last_spawn_attempt += sim_config.delta();
    if state.time_since_last_spawn_attempt > sim_config.spawn_interval {
        waves_out.write(SpawnWaveCommand::director_default());
        state.time_since_last_spawn_attempt = FixedNum::ZERO;
    }
}

/// Fulfills wave requests: repositions runaway enemies, enforces the global
/// cap, picks enemy and formation, and spawns the wave targeting the player.
pub fn handle_wave_commands(
    mut commands: Commands,
    mut requests: MessageReader<SpawnWaveCommand>,
    mut state: ResMut<DirectorState>,
    sim_config: Res<SimConfig>,
    content: Res<ContentLibrary>,
    mut rng: ResMut<SimRng>,
    player: Query<(Entity, &SimPosition), With<Player>>,
    mut enemies: Query<&mut SimPosition, (With<Enemy>, Without<Player>)>,
) {
    if requests.is_empty() {
        return;
    }
    let Ok((player_entity, player_pos)) = player.single() else {
        requests.clear();
        return;
    };

    for request in requests.read() {
        let origin = request.origin.unwrap_or(player_pos.0);

        reposition_far_enemies(&mut enemies, player_pos.0, &sim_config);

        let enemy_count = enemies.iter().count();
        if enemy_count > sim_config.max_enemy_count {
            // Capacity exhausted: the request is dropped, never queued.
            warn!(
                "[DIRECTOR] Enemy cap reached ({}/{}), dropping wave request",
                enemy_count, sim_config.max_enemy_count
            );
            continue;
        }

        let npc_id = match &request.npc {
            Some(id) => id.clone(),
            None => {
                let pool = content.spawnable_enemies();
                if pool.is_empty() {
                    warn!("[DIRECTOR] No spawnable enemies in content");
                    continue;
                }
                pool[rng.0.random_range(0..pool.len())].clone()
            }
        };
        let Ok(spec) = content.npc(&npc_id) else {
            warn!("[DIRECTOR] Wave requested unknown npc `{}`", npc_id);
            continue;
        };

        let pattern = request.pattern.unwrap_or_else(|| {
            match rng.0.random_range(0..4u8) {
                0 => WavePattern::LineVertical,
                1 => WavePattern::LineHorizontal,
                2 => WavePattern::Herd,
                _ => WavePattern::RandomScatter,
            }
        });
        let count = request.count.unwrap_or(sim_config.wave_enemy_count);

        state.wave_number += 1;
        let params = WaveParams {
            count,
            spacing: sim_config.line_spacing,
            radius: sim_config.herd_radius,
            jitter: if pattern == WavePattern::Herd {
                sim_config.herd_jitter
            } else {
                sim_config.line_jitter
            },
        };
        let screen = ScreenExtents {
            half_width: sim_config.screen_half_width(),
            half_height: sim_config.screen_half_height(),
        };

        let positions = waves::generate(pattern, origin, &params, screen, &mut rng.0);
        let spawned = positions.len();
        for position in positions {
            spawn_npc(
                &mut commands,
                &npc_id,
                spec,
                position,
                state.wave_number,
                &sim_config,
                Some(player_entity),
                &content,
            );
        }
        info!(
            "[DIRECTOR] Wave {}: {} x {:?} ({} spawned)",
            state.wave_number, npc_id, pattern, spawned
        );
    }
}

/// Spawns one elite enemy per rift request.
pub fn handle_elite_spawns(
    mut commands: Commands,
    mut requests: MessageReader<EliteSpawnCommand>,
    state: Res<DirectorState>,
    sim_config: Res<SimConfig>,
    content: Res<ContentLibrary>,
    mut rng: ResMut<SimRng>,
    player: Query<Entity, With<Player>>,
    enemies: Query<(), With<Enemy>>,
) {
    for request in requests.read() {
        if enemies.iter().count() > sim_config.max_enemy_count {
            warn!("[DIRECTOR] Enemy cap reached, dropping elite spawn");
            continue;
        }
        let pool = content.spawnable_enemies();
        if pool.is_empty() {
            continue;
        }
        let npc_id = &pool[rng.0.random_range(0..pool.len())];
        let Ok(spec) = content.npc(npc_id) else { continue };
        spawn_npc(
            &mut commands,
            npc_id,
            spec,
            request.position,
            state.wave_number,
            &sim_config,
            player.single().ok(),
            &content,
        );
    }
}

/// Tallies defeated enemies for the external progression layer.
pub fn track_defeats(mut deaths: MessageReader<DeathEvent>, mut state: ResMut<DirectorState>) {
    for death in deaths.read() {
        if death.kind == ActorKind::Enemy {
            state.enemies_defeated += 1;
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Mirrors enemies that drifted beyond the view margin back to just
/// off-screen on the opposite side, preserving identity and count.
fn reposition_far_enemies(
    enemies: &mut Query<&mut SimPosition, (With<Enemy>, Without<Player>)>,
    reference: FixedVec2,
    sim_config: &SimConfig,
) {
    for mut pos in enemies.iter_mut() {
        if let Some(moved) = waves::reposition_far_position(
            pos.0,
            reference,
            sim_config.screen_half_width(),
            sim_config.reposition_margin,
            sim_config.off_screen_distance,
        ) {
            pos.0 = moved;
        }
    }
}

/// Builds one NPC entity from its spec, with wave-scaled stats, pursuit of
/// the given target, and any spawner/caster attachments.
#[allow(clippy::too_many_arguments)]
pub fn spawn_npc(
    commands: &mut Commands,
    npc_id: &str,
    spec: &NpcSpec,
    position: FixedVec2,
    wave_number: u32,
    sim_config: &SimConfig,
    target: Option<Entity>,
    content: &ContentLibrary,
) -> Entity {
    let wave = FixedNum::from_num(wave_number.max(1));
    let health = FixedNum::from_num(spec.base_health)
        + (wave - FixedNum::ONE) * sim_config.wave_health_scale;
    let damage = FixedNum::from_num(spec.base_damage) + wave * sim_config.wave_damage_scale;

    let mut builder = commands.spawn((
        SimPosition(position),
        Body::from_f32(spec.size),
        MoveSpeed(FixedNum::from_num(spec.speed)),
        Health::new(health),
        ContactDamage(damage),
        AttackTimer::new(FixedNum::from_num(spec.attack_cooldown)),
        StatusEffects::default(),
        NpcId(npc_id.to_string()),
        VisualFrame::default(),
        Transform::default(),
    ));

    match spec.kind {
        NpcKind::Enemy => {
            builder.insert((Enemy, ActorKind::Enemy, Target(target), TargetPosition(None)));
        }
        NpcKind::Neutral => {
            builder.insert((NeutralNpc, ActorKind::Neutral, Target(None), TargetPosition(None)));
        }
        NpcKind::Friendly => {
            builder.insert((FriendlyNpc, ActorKind::Friendly, Target(None), TargetPosition(None)));
        }
    }

    if spec.solid_body {
        builder.insert(SolidBody);
    }
    if let Some(spawner) = &spec.spawner {
        builder.insert((
            RiftSpawner {
                since_last: FixedNum::ZERO,
                interval: FixedNum::from_num(spawner.interval),
            },
            Lifetime(FixedNum::from_num(spawner.duration)),
        ));
    }

    let npc_entity = builder.id();

    // Caster NPCs get their abilities as owned entities, same as the player.
    for ability_id in &spec.abilities {
        if let Ok(ability_spec) = content.ability(ability_id) {
            commands.spawn((
                AbilityInstance::new(ability_id.clone()),
                AbilityStats::from_spec(ability_spec, sim_config.default_stagger_rate),
                PendingTriggers::default(),
                AbilityOwner(npc_entity),
            ));
        }
    }

    npc_entity
}
