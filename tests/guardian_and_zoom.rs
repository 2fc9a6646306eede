//! Multi-state projectile behavior: the guardian's hunt/dash cycle with
//! periodic pulses, and the zoom projectile's rest/dash loop.

mod common;

use bevy::prelude::*;

use common::*;
use duskfall::game::ability::{
    AbilityOwner, FlightSpeed, GuardianMotion, GuardianState, HitPolicy, HitTracker,
    ProjectileMotion, ZoomState,
};
use duskfall::game::content::TargetGroup;
use duskfall::game::fixed_math::FixedVec2;
use duskfall::game::simulation::{Body, Lifetime, Projectile, SimPosition};

fn policy() -> HitPolicy {
    HitPolicy {
        damage: fx(8.0),
        damage_rate: fx(0.6),
        max_hit_count: None,
        targets: TargetGroup::Enemies,
        triggers_on_collision: true,
        on_hit_status: None,
        hit_text: "8".to_string(),
    }
}

fn spawn_carrier(app: &mut App, owner: Entity, motion: ProjectileMotion, speed: f32) -> Entity {
    app.world_mut()
        .spawn((
            Projectile,
            SimPosition(FixedVec2::from_f32(0.0, 0.0)),
            Body::new(fx(32.0), fx(32.0)),
            FlightSpeed(fx(speed)),
            motion,
            policy(),
            HitTracker::default(),
            Lifetime(fx(1000.0)),
            AbilityOwner(owner),
        ))
        .id()
}

#[test]
fn guardian_hunts_then_dashes_then_reverts() {
    let mut app = sim_app();
    set_tick_rate(&mut app, 2.0); // dt = 0.5 s

    let player = spawn_player_at(&mut app, -900.0, -400.0);
    let enemy = spawn_enemy_at(&mut app, 1000.0, 0.0, 1000.0);

    let guardian = spawn_carrier(
        &mut app,
        player,
        ProjectileMotion::Guardian(GuardianMotion {
            dash_speed_mult: fx(3.0),
            dash_range: fx(120.0),
            dash_interval: fx(0.4),
            pulse_id: "sentinel_pulse".to_string(),
            pulse_interval: fx(10_000.0),
            state: GuardianState::Hunting,
            since_dash: fx(0.0),
            next_dash: fx(0.4),
            since_pulse: fx(0.0),
        }),
        40.0,
    );

    // Tick 1: hunts toward the enemy at base speed, then the dash guard
    // trips (0.5 s > 0.4 s) and captures a point 120 units ahead.
    run_ticks(&mut app, 1);
    let after_hunt = app.world().get::<SimPosition>(guardian).unwrap().0;
    assert_eq!(after_hunt, FixedVec2::from_f32(20.0, 0.0));
    assert!(matches!(
        app.world().get::<ProjectileMotion>(guardian).unwrap(),
        ProjectileMotion::Guardian(g) if matches!(g.state, GuardianState::Dashing { .. })
    ), "dash trigger captured a target after the first tick");

    // Remove the prey so no further dash can be captured; the in-flight
    // dash keeps its already-captured point.
    app.world_mut().despawn(enemy);

    // Dashing covers ground at the multiplied speed (60 units per tick)
    // until the 120-unit range is exceeded, then reverts to hunting.
    run_ticks(&mut app, 2);
    let after_dash = app.world().get::<SimPosition>(guardian).unwrap().0;
    assert_eq!(after_dash, FixedVec2::from_f32(140.0, 0.0));
    assert!(matches!(
        app.world().get::<ProjectileMotion>(guardian).unwrap(),
        ProjectileMotion::Guardian(g) if matches!(g.state, GuardianState::Hunting)
    ), "dash range exceeded, back to hunting");
}

#[test]
fn guardian_pulses_spawn_area_effects_on_their_own_clock() {
    let mut app = sim_app();
    set_tick_rate(&mut app, 4.0); // dt = 0.25 s

    let player = spawn_player_at(&mut app, -900.0, -400.0);
    spawn_enemy_at(&mut app, 1000.0, 0.0, 1000.0);

    let guardian = {
        let motion = GuardianMotion {
            dash_speed_mult: fx(1.0),
            dash_range: fx(10_000.0),
            dash_interval: fx(10_000.0),
            pulse_id: "sentinel_pulse".to_string(),
            pulse_interval: fx(0.9),
            state: GuardianState::Hunting,
            since_dash: fx(0.0),
            next_dash: fx(10_000.0),
            since_pulse: fx(0.0),
        };
        spawn_carrier(&mut app, player, ProjectileMotion::Guardian(motion), 0.0)
    };
    // The guardian's own damage differs from the pulse spec's so the
    // inheritance is observable.
    app.world_mut().get_mut::<HitPolicy>(guardian).unwrap().damage = fx(11.0);

    run_ticks(&mut app, 4); // 1.0 s > 0.9 s: one pulse requested and spawned

    let mut projectiles = app
        .world_mut()
        .query_filtered::<(Entity, &ProjectileMotion, &HitPolicy), With<Projectile>>();
    let pulses: Vec<_> = projectiles
        .iter(app.world())
        .filter(|(entity, motion, _)| {
            *entity != guardian && matches!(motion, ProjectileMotion::Stationary)
        })
        .collect();
    assert_eq!(pulses.len(), 1, "one pulse area effect spawned");
    assert_eq!(pulses[0].2.damage, fx(11.0), "pulse inherits the guardian's damage");
}

#[test]
fn zoom_rests_then_dashes_to_an_enemy_position() {
    let mut app = sim_app();
    set_tick_rate(&mut app, 2.0);

    let player = spawn_player_at(&mut app, -900.0, -400.0);
    spawn_enemy_at(&mut app, 300.0, 0.0, 1000.0);

    let dart = spawn_carrier(
        &mut app,
        player,
        ProjectileMotion::Zoom {
            rest_time: fx(0.4),
            state: ZoomState::Resting { since: fx(0.0) },
        },
        600.0,
    );

    // Tick 1 arms the dash (0.5 > 0.4); the projectile has not moved.
    run_ticks(&mut app, 1);
    assert_eq!(
        app.world().get::<SimPosition>(dart).unwrap().0,
        FixedVec2::from_f32(0.0, 0.0)
    );
    assert!(matches!(
        app.world().get::<ProjectileMotion>(dart).unwrap(),
        ProjectileMotion::Zoom { state: ZoomState::Zooming { .. }, .. }
    ));

    // 600 units/s covers the 300-unit gap in one tick; arrival flips the
    // state back to resting.
    run_ticks(&mut app, 1);
    let arrived = app.world().get::<SimPosition>(dart).unwrap().0;
    assert!(
        (arrived.x - fx(300.0)).abs() <= fx(5.0) && arrived.y.abs() <= fx(5.0),
        "dart arrived at the captured enemy position, got {:?}",
        arrived
    );
    assert!(matches!(
        app.world().get::<ProjectileMotion>(dart).unwrap(),
        ProjectileMotion::Zoom { state: ZoomState::Resting { .. }, .. }
    ));
}
