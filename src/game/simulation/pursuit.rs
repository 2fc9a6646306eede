//! Target acquisition and chase/flee movement for NPCs, plus the player's
//! command-driven movement.

use bevy::prelude::*;

use crate::game::movement::{self, Heading};
use crate::profile_log;

use super::components::*;
use super::events::*;
use super::resources::*;
use super::status::StatusEffects;

/// Refreshes each pursuer's target point from its live target entity.
/// A despawned target clears the pursuit instead of dangling.
pub fn sync_target_positions(
    mut pursuers: Query<(&mut Target, &mut TargetPosition)>,
    positions: Query<&SimPosition>,
) {
    for (mut target, mut target_pos) in pursuers.iter_mut() {
        let Some(entity) = target.0 else { continue };
        match positions.get(entity) {
            Ok(pos) => target_pos.0 = Some(pos.0),
            Err(_) => {
                target.0 = None;
                target_pos.0 = None;
            }
        }
    }
}

/// Moves NPCs toward their target point — or directly away from it while
/// mind-controlled. Frozen and paralyzed actors hold still.
pub fn pursue_targets(
    mut movers: Query<
        (&mut SimPosition, &TargetPosition, &MoveSpeed, &StatusEffects),
        (Without<Player>, Without<Projectile>),
    >,
    sim_config: Res<SimConfig>,
    #[allow(unused_variables)] tick: Res<SimTick>,
) {
    let dt = sim_config.delta();
    let mut moved = 0;

    for (mut pos, target_pos, speed, status) in movers.iter_mut() {
        let Some(goal) = target_pos.0 else { continue };
        if !status.can_act() {
            continue;
        }

        pos.0 = if status.is_controlled() {
            movement::step_away(pos.0, speed.0, dt, Heading::Point(goal))
        } else {
            movement::step_towards(pos.0, speed.0, dt, Heading::Point(goal))
        };
        moved += 1;
    }

    profile_log!(tick, "[PURSUIT] Moved: {}", moved);
}

/// Applies buffered movement commands to the player. The input layer writes
/// one command per frame; paralysis and freeze gate the player too.
pub fn apply_player_movement(
    mut commands: MessageReader<PlayerMoveCommand>,
    mut player: Query<(&mut SimPosition, &MoveSpeed, &StatusEffects), With<Player>>,
    sim_config: Res<SimConfig>,
) {
    let Ok((mut pos, speed, status)) = player.single_mut() else {
        commands.clear();
        return;
    };
    if !status.can_act() {
        commands.clear();
        return;
    }

    let dt = sim_config.delta();
    for command in commands.read() {
        let dir = command.direction.normalize();
        if dir == crate::game::fixed_math::FixedVec2::ZERO {
            continue;
        }
        pos.0 = movement::step_towards(pos.0, speed.0, dt, Heading::Along(dir));
    }
}
