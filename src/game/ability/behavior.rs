//! Per-tick projectile flight: one system driving every motion capability.

use bevy::prelude::*;
use rand::Rng;

use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::game::movement::{self, Heading};
use crate::game::simulation::{Enemy, Projectile, SimConfig, SimPosition, SimRng, SimTick};
use crate::profile_log;

use super::components::*;
use super::{nearest_of, AreaSpawnEvent};

/// Advances every projectile along its motion capability and evaluates the
/// state-machine transition guards.
pub fn drive_projectiles(
    mut commands: Commands,
    mut projectiles: Query<
        (
            Entity,
            &mut SimPosition,
            &mut ProjectileMotion,
            &FlightSpeed,
            &HitPolicy,
            &AbilityOwner,
        ),
        With<Projectile>,
    >,
    owners: Query<&SimPosition, Without<Projectile>>,
    enemies: Query<(Entity, &SimPosition), (With<Enemy>, Without<Projectile>)>,
    sim_config: Res<SimConfig>,
    mut rng: ResMut<SimRng>,
    mut area_spawns: MessageWriter<AreaSpawnEvent>,
    #[allow(unused_variables)] tick: Res<SimTick>,
) {
    let dt = sim_config.delta();
    let arrival_eps = sim_config.zoom_arrival_epsilon;

    for (entity, mut pos, mut motion, speed, policy, owner) in projectiles.iter_mut() {
        match &mut *motion {
            ProjectileMotion::Stationary => {}

            ProjectileMotion::FixedDirection { direction } => {
                pos.0 = pos.0 + *direction * (speed.0 * dt);
            }

            ProjectileMotion::SeekNearest => {
                // No enemy means hold position this tick, not a crash.
                if let Some((_, target)) =
                    nearest_of(pos.0, enemies.iter().map(|(e, p)| (e, p.0)))
                {
                    pos.0 = movement::step_towards(pos.0, speed.0, dt, Heading::Point(target));
                }
            }

            ProjectileMotion::Orbit { radius, angular_speed, angle } => {
                let Ok(center) = owners.get(owner.0) else { continue };
                let (next, next_angle) =
                    movement::orbit_step(center.0, *radius, *angle, *angular_speed, dt);
                pos.0 = next;
                *angle = next_angle;
            }

            ProjectileMotion::Curve { start, end, control, t, on_end } => {
                *t += speed.0 * dt;
                if *t >= FixedNum::ONE {
                    pos.0 = *end;
                    area_spawns.write(AreaSpawnEvent {
                        spec_id: on_end.clone(),
                        position: *end,
                        owner: owner.0,
                        damage_override: None,
                    });
                    commands.entity(entity).try_despawn();
                } else if let Ok(next) = movement::curve_point(*start, *end, *control, *t) {
                    pos.0 = next;
                }
            }

            ProjectileMotion::Zoom { rest_time, state } => match state {
                ZoomState::Resting { since } => {
                    *since += dt;
                    if *since > *rest_time {
                        let candidates: Vec<FixedVec2> =
                            enemies.iter().map(|(_, p)| p.0).collect();
                        if !candidates.is_empty() {
                            let target = candidates[rng.0.random_range(0..candidates.len())];
                            *state = ZoomState::Zooming { target };
                        }
                        // No enemy: keep resting and retry next tick.
                    }
                }
                ZoomState::Zooming { target } => {
                    pos.0 = movement::step_towards(pos.0, speed.0, dt, Heading::Point(*target));
                    if (pos.0.x - target.x).abs() <= arrival_eps
                        && (pos.0.y - target.y).abs() <= arrival_eps
                    {
                        *state = ZoomState::Resting { since: FixedNum::ZERO };
                    }
                }
            },

            ProjectileMotion::Guardian(guardian) => {
                guardian.since_dash += dt;
                guardian.since_pulse += dt;

                match guardian.state {
                    GuardianState::Hunting => {
                        if let Some((_, target)) =
                            nearest_of(pos.0, enemies.iter().map(|(e, p)| (e, p.0)))
                        {
                            pos.0 =
                                movement::step_towards(pos.0, speed.0, dt, Heading::Point(target));
                        }
                    }
                    GuardianState::Dashing { target, start } => {
                        pos.0 = movement::step_towards(
                            pos.0,
                            speed.0 * guardian.dash_speed_mult,
                            dt,
                            Heading::Point(target),
                        );
                        if pos.0.distance(start) >= guardian.dash_range {
                            guardian.state = GuardianState::Hunting;
                        }
                    }
                }

                if guardian.since_dash > guardian.next_dash {
                    if let Some((_, enemy_pos)) =
                        nearest_of(pos.0, enemies.iter().map(|(e, p)| (e, p.0)))
                    {
                        let dir = movement::direction(pos.0, Heading::Point(enemy_pos));
                        guardian.state = GuardianState::Dashing {
                            target: pos.0 + dir * guardian.dash_range,
                            start: pos.0,
                        };
                        guardian.since_dash = FixedNum::ZERO;
                        // Random smear keeps a flock of guardians out of lockstep.
                        guardian.next_dash = guardian.dash_interval
                            + FixedNum::from_num(rng.0.random_range(0.0..1.0f32));
                    }
                }

                if guardian.since_pulse > guardian.pulse_interval {
                    area_spawns.write(AreaSpawnEvent {
                        spec_id: guardian.pulse_id.clone(),
                        position: pos.0,
                        owner: owner.0,
                        damage_override: Some(policy.damage),
                    });
                    guardian.since_pulse = FixedNum::ZERO;
                }
            }
        }
    }

    profile_log!(tick, "[PROJECTILES] Driven: {}", projectiles.iter().len());
}
