//! Staggered-burst scheduling: one spawn per stagger interval, enqueue
//! order preserved, leftovers stay queued.

mod common;

use bevy::prelude::*;

use common::*;
use duskfall::game::ability::{
    AbilityInstance, AbilityOwner, AbilityStats, AbilityUpgradeCommand, PendingTriggers,
    ProjectileSpawnEvent,
};
use duskfall::game::content::ContentLibrary;
use duskfall::game::simulation::{AudioCueEvent, Projectile, SimSet};

#[derive(Resource, Default)]
struct SpawnLog(Vec<ProjectileSpawnEvent>);

fn record_spawns(mut reader: MessageReader<ProjectileSpawnEvent>, mut log: ResMut<SpawnLog>) {
    for event in reader.read() {
        log.0.push(event.clone());
    }
}

#[derive(Resource, Default)]
struct CueLog(Vec<String>);

fn record_cues(mut reader: MessageReader<AudioCueEvent>, mut log: ResMut<CueLog>) {
    for event in reader.read() {
        log.0.push(event.cue.clone());
    }
}

#[test]
fn burst_of_four_fires_three_spawns_in_three_half_second_ticks() {
    let mut app = sim_app();
    set_tick_rate(&mut app, 2.0); // dt = 0.5 s
    app.init_resource::<SpawnLog>();
    app.init_resource::<CueLog>();
    app.add_systems(FixedUpdate, (record_spawns, record_cues).after(SimSet::Scheduling));

    let player = spawn_player_at(&mut app, 0.0, 0.0);

    let ability = {
        let world = app.world_mut();
        let spec = world
            .resource::<ContentLibrary>()
            .ability("ember_lance")
            .expect("content has ember_lance")
            .clone();
        let mut stats = AbilityStats::from_spec(&spec, fx(0.5));
        stats.cooldown = fx(10_000.0); // keep the auto-caster out of the way
        world
            .spawn((
                AbilityInstance::new("ember_lance"),
                stats,
                PendingTriggers::default(),
                AbilityOwner(player),
            ))
            .id()
    };

    app.world_mut()
        .get_mut::<PendingTriggers>(ability)
        .unwrap()
        .queue_burst(4, fx(0.5));

    run_ticks(&mut app, 3); // 1.5 s total

    assert_eq!(
        app.world().resource::<SpawnLog>().0.len(),
        3,
        "exactly three staggered spawns fired"
    );
    let pending = app.world().get::<PendingTriggers>(ability).unwrap();
    assert_eq!(pending.len(), 1, "one trigger remains queued");

    // The spawn events materialized into projectile entities.
    let mut projectiles = app.world_mut().query_filtered::<(), With<Projectile>>();
    assert_eq!(projectiles.iter(app.world()).count(), 3);

    // Every spawned projectile announced its cast cue.
    let cues = &app.world().resource::<CueLog>().0;
    assert_eq!(cues.len(), 3, "one audio cue per spawned projectile");
    assert!(cues.iter().all(|cue| cue == "ember_lance_cast"));

    // The last trigger fires on the next tick.
    run_ticks(&mut app, 1);
    assert_eq!(app.world().resource::<SpawnLog>().0.len(), 4);
    let pending = app.world().get::<PendingTriggers>(ability).unwrap();
    assert!(pending.is_empty());
}

/// Externally-granted upgrades raise the level and mutate the runtime stat
/// block, never the content spec.
#[test]
fn upgrade_commands_raise_level_and_stats() {
    let mut app = sim_app();
    let player = spawn_player_at(&mut app, 0.0, 0.0);

    let ability = {
        let world = app.world_mut();
        let spec = world
            .resource::<ContentLibrary>()
            .ability("ember_lance")
            .unwrap()
            .clone();
        let mut stats = AbilityStats::from_spec(&spec, fx(0.5));
        stats.cooldown = fx(10_000.0);
        world
            .spawn((
                AbilityInstance::new("ember_lance"),
                stats,
                PendingTriggers::default(),
                AbilityOwner(player),
            ))
            .id()
    };

    app.world_mut()
        .resource_mut::<Messages<AbilityUpgradeCommand>>()
        .write(AbilityUpgradeCommand {
            ability,
            stat: "damage".to_string(),
            value: 2.0,
        });
    run_ticks(&mut app, 1);

    let stats = app.world().get::<AbilityStats>(ability).unwrap();
    assert_eq!(stats.damage, fx(8.0), "spec damage 6 plus the granted 2");
    assert_eq!(
        app.world().get::<AbilityInstance>(ability).unwrap().level,
        2
    );
}
