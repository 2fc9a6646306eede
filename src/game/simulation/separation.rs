//! Solid-body overlap separation for crowding enemies.
//!
//! One symmetric pass per tick: every overlapping pair is pushed apart by
//! half the penetration depth each, along the center-to-center axis. Dense
//! clusters settle over several frames rather than in one — intended
//! arcade behavior, not a converged solver.

use bevy::prelude::*;
use rustc_hash::FxHashMap;

use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::profile_log;

use super::components::*;
use super::resources::*;

/// Pushes overlapping solid enemies apart. O(N²) over the solid set, which
/// stays acceptable under the global enemy cap; larger actor counts should
/// route candidate pairs through the collision tree first.
pub fn separate_overlapping_bodies(
    mut bodies: Query<(Entity, &mut SimPosition, &Body), (With<Enemy>, With<SolidBody>)>,
    #[allow(unused_variables)] tick: Res<SimTick>,
) {
    let snapshot: Vec<(Entity, FixedVec2, Body)> = bodies
        .iter()
        .map(|(entity, pos, body)| (entity, pos.0, *body))
        .collect();

    if snapshot.len() < 2 {
        return;
    }

    let two = FixedNum::from_num(2.0);
    let mut pushes: FxHashMap<Entity, FixedVec2> = FxHashMap::default();
    let mut overlapping_pairs = 0;

    for i in 0..snapshot.len() {
        for j in (i + 1)..snapshot.len() {
            let (a, a_pos, a_body) = snapshot[i];
            let (b, b_pos, b_body) = snapshot[j];

            if !a_body.aabb(a_pos).intersects(&b_body.aabb(b_pos)) {
                continue;
            }

            let delta = a_pos - b_pos;
            let mut distance = delta.length();
            let mut axis = delta;
            if distance == FixedNum::ZERO {
                // Perfectly stacked bodies get a fixed axis to part along.
                distance = FixedNum::ONE;
                axis = FixedVec2::new(FixedNum::ONE, FixedNum::ZERO);
            }

            let min_distance = a_body.half_width() + b_body.half_width();
            if distance >= min_distance {
                continue;
            }

            overlapping_pairs += 1;
            let overlap = min_distance - distance;
            let push = (axis / distance) * (overlap / two);

            let a_push = pushes.entry(a).or_insert(FixedVec2::ZERO);
            *a_push = *a_push + push;
            let b_push = pushes.entry(b).or_insert(FixedVec2::ZERO);
            *b_push = *b_push - push;
        }
    }

    for (entity, push) in &pushes {
        if let Ok((_, mut pos, _)) = bodies.get_mut(*entity) {
            pos.0 = pos.0 + *push;
        }
    }

    profile_log!(
        tick,
        "[SEPARATION] Solid bodies: {} | Overlapping pairs: {}",
        snapshot.len(),
        overlapping_pairs
    );
}
