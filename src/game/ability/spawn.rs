//! Projectile and area-effect entity construction from content specs.

use bevy::prelude::*;
use rand::Rng;

use crate::game::content::{AimSpec, CastSpec, ContentLibrary, MotionSpec};
use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::game::movement::{self, Heading};
use crate::game::simulation::{
    ActorKind, AudioCueEvent, Body, Enemy, Lifetime, Player, Projectile, SimConfig, SimPosition,
    SimRng, VisualFrame,
};

use super::components::*;
use super::{nearest_of, AreaSpawnEvent, ProjectileSpawnEvent};

/// Spawns one projectile entity per spawn event, resolving the aim and
/// motion capability from the owning ability's spec.
pub fn spawn_projectiles(
    mut commands: Commands,
    mut events: MessageReader<ProjectileSpawnEvent>,
    abilities: Query<(&AbilityInstance, &AbilityStats, &AbilityOwner)>,
    positions: Query<&SimPosition>,
    enemies: Query<(Entity, &SimPosition), With<Enemy>>,
    player: Query<&SimPosition, With<Player>>,
    content: Res<ContentLibrary>,
    mut rng: ResMut<SimRng>,
    mut cues: MessageWriter<AudioCueEvent>,
) {
    for event in events.read() {
        let Ok((instance, stats, owner)) = abilities.get(event.ability) else {
            continue;
        };
        let Ok(spec) = content.ability(&instance.id) else {
            continue;
        };
        let Ok(owner_pos) = positions.get(owner.0) else {
            continue;
        };
        let origin = event.position.unwrap_or(owner_pos.0);

        let motion = match &spec.cast {
            CastSpec::Burst { motion } => build_motion(
                motion,
                origin,
                event.direction,
                &enemies,
                &player,
                &mut rng.0,
            ),
            CastSpec::Volley => ProjectileMotion::FixedDirection {
                direction: event
                    .direction
                    .unwrap_or_else(|| movement::random_direction(&mut rng.0)),
            },
            // Summons request enemy waves, they have no carrier of their own.
            CastSpec::Summon { .. } => continue,
        };

        commands.spawn((
            Projectile,
            ActorKind::Projectile,
            SimPosition(origin),
            Body::from_f32(spec.size),
            FlightSpeed(stats.speed),
            motion,
            HitPolicy {
                damage: stats.damage,
                damage_rate: stats.damage_rate,
                max_hit_count: stats.max_hit_count,
                targets: spec.targets,
                triggers_on_collision: spec.triggers_on_collision,
                on_hit_status: spec
                    .on_hit_status
                    .map(|status| (status.kind, FixedNum::from_num(status.duration))),
                hit_text: spec
                    .hit_text
                    .clone()
                    .unwrap_or_else(|| stats.damage.to_string()),
            },
            HitTracker::default(),
            Lifetime(stats.duration),
            AbilityOwner(owner.0),
            VisualFrame::default(),
            Transform::default(),
        ));

        cues.write(AudioCueEvent {
            cue: format!("{}_cast", instance.id),
        });
    }
}

/// Spawns stationary area effects requested mid-flight: thrown-flask
/// detonations and guardian pulses.
pub fn spawn_area_effects(
    mut commands: Commands,
    mut events: MessageReader<AreaSpawnEvent>,
    content: Res<ContentLibrary>,
    sim_config: Res<SimConfig>,
    mut cues: MessageWriter<AudioCueEvent>,
) {
    for event in events.read() {
        let Ok(spec) = content.ability(&event.spec_id) else {
            warn!("Area effect `{}` has no content record", event.spec_id);
            continue;
        };
        let stats = AbilityStats::from_spec(spec, sim_config.default_stagger_rate);
        let damage = event.damage_override.unwrap_or(stats.damage);

        commands.spawn((
            Projectile,
            ActorKind::Projectile,
            SimPosition(event.position),
            Body::from_f32(spec.size),
            FlightSpeed(stats.speed),
            ProjectileMotion::Stationary,
            HitPolicy {
                damage,
                damage_rate: stats.damage_rate,
                max_hit_count: stats.max_hit_count,
                targets: spec.targets,
                triggers_on_collision: spec.triggers_on_collision,
                on_hit_status: spec
                    .on_hit_status
                    .map(|status| (status.kind, FixedNum::from_num(status.duration))),
                hit_text: spec.hit_text.clone().unwrap_or_else(|| damage.to_string()),
            },
            HitTracker::default(),
            Lifetime(stats.duration),
            AbilityOwner(event.owner),
            VisualFrame::default(),
            Transform::default(),
        ));

        cues.write(AudioCueEvent {
            cue: format!("{}_cast", event.spec_id),
        });
    }
}

/// Resolves a motion spec into live projectile state at `origin`.
fn build_motion(
    motion: &MotionSpec,
    origin: FixedVec2,
    explicit_direction: Option<FixedVec2>,
    enemies: &Query<(Entity, &SimPosition), With<Enemy>>,
    player: &Query<&SimPosition, With<Player>>,
    rng: &mut impl Rng,
) -> ProjectileMotion {
    match motion {
        MotionSpec::Stationary => ProjectileMotion::Stationary,

        MotionSpec::FixedDirection { aim } => {
            let direction = explicit_direction.unwrap_or_else(|| match aim {
                AimSpec::NearestEnemy => {
                    // No enemy on the field: fly in a random direction.
                    match nearest_of(origin, enemies.iter().map(|(e, p)| (e, p.0))) {
                        Some((_, target)) => movement::direction(origin, Heading::Point(target)),
                        None => movement::random_direction(rng),
                    }
                }
                AimSpec::AtPlayer => match player.single() {
                    Ok(pos) => movement::direction(origin, Heading::Point(pos.0)),
                    Err(_) => movement::random_direction(rng),
                },
                AimSpec::Random => movement::random_direction(rng),
            });
            ProjectileMotion::FixedDirection { direction }
        }

        MotionSpec::SeekNearest => ProjectileMotion::SeekNearest,

        MotionSpec::Orbit { radius, angular_speed } => ProjectileMotion::Orbit {
            radius: FixedNum::from_num(*radius),
            angular_speed: FixedNum::from_num(*angular_speed),
            angle: FixedNum::ZERO,
        },

        MotionSpec::Curve { radius, curve_height, on_end } => {
            let end =
                movement::random_point_on_circle(origin, FixedNum::from_num(*radius), rng);
            ProjectileMotion::Curve {
                start: origin,
                end,
                control: movement::control_point(origin, end, FixedNum::from_num(*curve_height)),
                t: FixedNum::ZERO,
                on_end: on_end.clone(),
            }
        }

        MotionSpec::Zoom { rest_time } => ProjectileMotion::Zoom {
            rest_time: FixedNum::from_num(*rest_time),
            state: ZoomState::Resting { since: FixedNum::ZERO },
        },

        MotionSpec::Guardian {
            dash_speed_mult,
            dash_range,
            dash_interval,
            pulse_id,
            pulse_interval,
        } => ProjectileMotion::Guardian(GuardianMotion {
            dash_speed_mult: FixedNum::from_num(*dash_speed_mult),
            dash_range: FixedNum::from_num(*dash_range),
            dash_interval: FixedNum::from_num(*dash_interval),
            pulse_id: pulse_id.clone(),
            pulse_interval: FixedNum::from_num(*pulse_interval),
            state: GuardianState::Hunting,
            since_dash: FixedNum::ZERO,
            next_dash: FixedNum::from_num(*dash_interval),
            since_pulse: FixedNum::ZERO,
        }),
    }
}
