//! Actor lifecycle: damage application, the single death transition,
//! lifetime expiry and ephemeral spawners.

use bevy::prelude::*;

use crate::game::fixed_math::FixedNum;
use crate::profile_log;

use super::components::*;
use super::events::*;
use super::resources::*;

/// Applies buffered damage in arrival order. Health is clamped to zero and
/// the zero-crossing emits exactly one [`DeathEvent`]; further damage to an
/// already-dead actor is ignored.
pub fn apply_damage(
    mut commands: Commands,
    mut damage_events: MessageReader<DamageEvent>,
    mut victims: Query<(&mut Health, &ActorKind)>,
    mut deaths: MessageWriter<DeathEvent>,
    #[allow(unused_variables)] tick: Res<SimTick>,
) {
    let mut applied = 0;

    for event in damage_events.read() {
        let Ok((mut health, kind)) = victims.get_mut(event.target) else {
            continue;
        };
        if health.is_dead() {
            continue;
        }

        health.current = (health.current - event.amount).max(FixedNum::ZERO);
        applied += 1;

        if health.is_dead() {
            deaths.write(DeathEvent {
                entity: event.target,
                kind: *kind,
            });
            commands.entity(event.target).try_despawn();
        }
    }

    profile_log!(tick, "[DAMAGE] Events applied: {}", applied);
}

/// Expires actors whose lifetime ran out (projectiles, rifts, ephemeral
/// NPCs). Expiry is removal, not death: no death event fires.
pub fn tick_lifetimes(
    mut commands: Commands,
    mut carriers: Query<(Entity, &mut Lifetime)>,
    sim_config: Res<SimConfig>,
) {
    let dt = sim_config.delta();
    for (entity, mut lifetime) in carriers.iter_mut() {
        lifetime.0 -= dt;
        if lifetime.0 <= FixedNum::ZERO {
            commands.entity(entity).try_despawn();
        }
    }
}

/// Rift spawners request an elite enemy at their position on an interval.
pub fn rift_spawners(
    mut rifts: Query<(&SimPosition, &mut RiftSpawner)>,
    sim_config: Res<SimConfig>,
    mut elite_spawns: MessageWriter<EliteSpawnCommand>,
) {
    let dt = sim_config.delta();
    for (pos, mut rift) in rifts.iter_mut() {
        rift.since_last += dt;
        if rift.since_last > rift.interval {
            elite_spawns.write(EliteSpawnCommand { position: pos.0 });
            rift.since_last = FixedNum::ZERO;
        }
    }
}
