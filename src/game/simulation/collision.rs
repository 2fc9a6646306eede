//! Broadphase rebuild and collision resolution.
//!
//! The collision tree is rebuilt every tick over a screen-sized boundary
//! centered on the player. Projectiles query it for targets; enemies query
//! it (indirectly, via the player's box) for contact attacks.

use bevy::prelude::*;

use crate::game::ability::{HitPolicy, HitTracker};
use crate::game::content::TargetGroup;
use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::game::quadtree::QuadTree;
use crate::profile_log;

use super::components::*;
use super::events::*;
use super::resources::*;
use super::status::StatusEffects;

/// Rebuilds the collision tree from current enemy and neutral positions.
/// With no player to center the boundary on, the tree is cleared and every
/// collision check degrades to a no-op for the tick.
pub fn rebuild_collision_tree(
    mut tree: ResMut<CollisionTree>,
    sim_config: Res<SimConfig>,
    player: Query<&SimPosition, With<Player>>,
    targets: Query<(Entity, &SimPosition, &Body), Or<(With<Enemy>, With<NeutralNpc>)>>,
    #[allow(unused_variables)] tick: Res<SimTick>,
) {
    let Ok(center) = player.single() else {
        tree.clear();
        return;
    };

    let boundary = crate::game::fixed_math::FixedRect::from_center(
        center.0,
        FixedVec2::new(sim_config.screen_width, sim_config.screen_height),
    );
    let mut rebuilt = QuadTree::new(boundary, sim_config.quadtree_capacity);

    let mut indexed = 0;
    let mut out_of_view = 0;
    for (entity, pos, body) in targets.iter() {
        if rebuilt.insert(entity, body.aabb(pos.0)) {
            indexed += 1;
        } else {
            out_of_view += 1;
        }
    }
    tree.replace(rebuilt);

    profile_log!(
        tick,
        "[BROADPHASE] Indexed: {} | Out of view: {}",
        indexed,
        out_of_view
    );
}

/// Resolves projectile-versus-target overlaps: cooldown-gated hits that
/// apply damage and status, emit floating text, and enforce the hit cap.
pub fn resolve_projectile_hits(
    mut commands: Commands,
    tree: Res<CollisionTree>,
    mut projectiles: Query<
        (Entity, &SimPosition, &Body, &HitPolicy, &mut HitTracker),
        With<Projectile>,
    >,
    target_bodies: Query<
        (&SimPosition, &Body),
        (Or<(With<Enemy>, With<NeutralNpc>)>, Without<Projectile>),
    >,
    mut statuses: Query<&mut StatusEffects, Without<Projectile>>,
    player: Query<(Entity, &SimPosition, &Body), (With<Player>, Without<Projectile>)>,
    mut damage_events: MessageWriter<DamageEvent>,
    mut damage_numbers: MessageWriter<DamageNumberEvent>,
    #[allow(unused_variables)] tick: Res<SimTick>,
) {
    let mut hits_this_tick = 0;

    for (projectile, pos, body, policy, mut tracker) in projectiles.iter_mut() {
        if !policy.triggers_on_collision {
            continue;
        }
        let projectile_rect = body.aabb(pos.0);

        // Target-group partitioning: player-cast projectiles only ever test
        // the enemy/neutral index, enemy-cast ones only the player.
        let candidates: Vec<(Entity, FixedVec2)> = match policy.targets {
            TargetGroup::Enemies => tree
                .query(&projectile_rect)
                .into_iter()
                .filter_map(|entity| {
                    target_bodies.get(entity).ok().map(|(p, _)| (entity, p.0))
                })
                .collect(),
            TargetGroup::Player => match player.single() {
                Ok((entity, p, b)) if projectile_rect.intersects(&b.aabb(p.0)) => {
                    vec![(entity, p.0)]
                }
                _ => Vec::new(),
            },
        };

        for (target, target_pos) in candidates {
            if !tracker.can_collide(target) {
                continue;
            }
            tracker.record_hit(target, policy.damage_rate);
            hits_this_tick += 1;

            if policy.damage > FixedNum::ZERO {
                damage_events.write(DamageEvent {
                    target,
                    amount: policy.damage,
                });
            }
            if let Some((kind, duration)) = policy.on_hit_status {
                if let Ok(mut status) = statuses.get_mut(target) {
                    status.apply(kind, duration);
                }
            }
            damage_numbers.write(DamageNumberEvent {
                text: policy.hit_text.clone(),
                position: target_pos,
            });

            if let Some(max_hits) = policy.max_hit_count {
                if tracker.hits >= max_hits {
                    commands.entity(projectile).try_despawn();
                    break;
                }
            }
        }
    }

    profile_log!(tick, "[COLLISION] Hits: {}", hits_this_tick);
}

/// Enemies overlapping the player's box attack it, gated by their attack
/// cooldown and their status clock.
pub fn enemy_contact_attacks(
    tree: Res<CollisionTree>,
    player: Query<(Entity, &SimPosition, &Body), With<Player>>,
    mut enemies: Query<(&mut AttackTimer, &ContactDamage, &StatusEffects), With<Enemy>>,
    mut damage_events: MessageWriter<DamageEvent>,
) {
    let Ok((player_entity, pos, body)) = player.single() else {
        return;
    };

    for entity in tree.query(&body.aabb(pos.0)) {
        let Ok((mut timer, contact_damage, status)) = enemies.get_mut(entity) else {
            continue;
        };
        if !timer.ready() || !status.can_act() {
            continue;
        }
        damage_events.write(DamageEvent {
            target: player_entity,
            amount: contact_damage.0,
        });
        timer.since_last = FixedNum::ZERO;
    }
}

/// Counts every per-target hit cooldown down and purges the expired
/// entries, whether or not the pair collided again.
pub fn decay_hit_cooldowns(mut trackers: Query<&mut HitTracker>, sim_config: Res<SimConfig>) {
    let dt = sim_config.delta();
    for mut tracker in trackers.iter_mut() {
        if !tracker.cooldowns.is_empty() {
            tracker.decay(dt);
        }
    }
}
