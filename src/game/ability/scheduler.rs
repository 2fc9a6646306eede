//! Ability cast clocks and the staggered-trigger scheduler.

use bevy::prelude::*;

use crate::game::content::{CastSpec, ContentLibrary};
use crate::game::fixed_math::FixedVec2;
use crate::game::simulation::{SimConfig, SimPosition, SimTick, SpawnWaveCommand, StatusEffects};
use crate::game::waves::WavePattern;
use crate::profile_log;

use super::components::*;
use super::ProjectileSpawnEvent;

/// The two four-direction volley sets, alternated between casts.
const VOLLEY_CARDINAL: [(f32, f32); 4] = [(0.0, -1.0), (0.0, 1.0), (-1.0, 0.0), (1.0, 0.0)];
const VOLLEY_DIAGONAL: [(f32, f32); 4] = [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)];

/// Advances each ability's cast clock and casts it when the cooldown
/// elapses. Casting either queues a staggered burst, fires an immediate
/// volley, or requests a summon wave.
pub fn auto_cast_abilities(
    mut abilities: Query<(
        Entity,
        &mut AbilityInstance,
        &AbilityStats,
        &mut PendingTriggers,
        &AbilityOwner,
    )>,
    owners: Query<&SimPosition>,
    owner_statuses: Query<&StatusEffects>,
    content: Res<ContentLibrary>,
    sim_config: Res<SimConfig>,
    mut projectile_spawns: MessageWriter<ProjectileSpawnEvent>,
    mut wave_commands: MessageWriter<SpawnWaveCommand>,
    #[allow(unused_variables)] tick: Res<SimTick>,
) {
    let dt = sim_config.delta();
    let mut casts = 0;

    for (entity, mut instance, stats, mut pending, owner) in abilities.iter_mut() {
        instance.time_since_last_use += dt;
        if instance.time_since_last_use < stats.cooldown {
            continue;
        }
        let Ok(spec) = content.ability(&instance.id) else {
            // Validated at load; a dangling instance degrades to inert.
            continue;
        };
        if owners.get(owner.0).is_err() {
            // Caster died; the ability dies with it.
            continue;
        }
        if let Ok(status) = owner_statuses.get(owner.0) {
            // Frozen or paralyzed casters cannot act; the cast waits.
            if !status.can_act() {
                continue;
            }
        }

        match &spec.cast {
            CastSpec::Burst { .. } => {
                pending.queue_burst(stats.projectiles, stats.stagger_rate);
            }
            CastSpec::Volley => {
                let set = if instance.volley_cycle == 0 {
                    &VOLLEY_CARDINAL
                } else {
                    &VOLLEY_DIAGONAL
                };
                for (x, y) in set {
                    projectile_spawns.write(ProjectileSpawnEvent {
                        ability: entity,
                        direction: Some(FixedVec2::from_f32(*x, *y).normalize()),
                        position: None,
                    });
                }
                instance.volley_cycle = (instance.volley_cycle + 1) % 2;
            }
            CastSpec::Summon { npc, count } => {
                let origin = owners.get(owner.0).map(|pos| pos.0).ok();
                wave_commands.write(SpawnWaveCommand {
                    origin,
                    npc: Some(npc.clone()),
                    count: Some(*count),
                    pattern: Some(WavePattern::RandomScatter),
                });
            }
        }

        instance.time_since_last_use = crate::game::fixed_math::FixedNum::ZERO;
        casts += 1;
    }

    profile_log!(tick, "[ABILITY_CAST] Casts this tick: {}", casts);
}

/// Counts every pending trigger down by the tick delta and fires the ones
/// whose countdown ran out, preserving enqueue order.
pub fn tick_pending_triggers(
    mut abilities: Query<(Entity, &mut PendingTriggers)>,
    sim_config: Res<SimConfig>,
    mut projectile_spawns: MessageWriter<ProjectileSpawnEvent>,
) {
    let dt = sim_config.delta();
    for (entity, mut pending) in abilities.iter_mut() {
        if pending.is_empty() {
            continue;
        }
        let fired = pending.tick(dt);
        for _ in 0..fired {
            projectile_spawns.write(ProjectileSpawnEvent {
                ability: entity,
                direction: None,
                position: None,
            });
        }
    }
}

/// Applies externally-granted stat upgrades (level-up UI lives outside the
/// core).
pub fn handle_upgrade_commands(
    mut upgrades: MessageReader<super::AbilityUpgradeCommand>,
    mut abilities: Query<(&mut AbilityInstance, &mut AbilityStats)>,
    content: Res<ContentLibrary>,
) {
    for upgrade in upgrades.read() {
        let Ok((mut instance, mut stats)) = abilities.get_mut(upgrade.ability) else {
            warn!("Upgrade for unknown ability entity {:?}", upgrade.ability);
            continue;
        };
        let max_level = content
            .ability(&instance.id)
            .map(|spec| spec.max_level)
            .unwrap_or(0);
        if max_level > 0 && instance.level >= max_level {
            warn!(
                "{} is already at max level {}",
                instance.id, max_level
            );
            continue;
        }
        stats.upgrade_stat(&upgrade.stat, upgrade.value);
        instance.level += 1;
        info!("{} upgraded to level {}", instance.id, instance.level);
    }
}
