//! Abilities: capability-driven casting, staggered projectile bursts and
//! the projectiles themselves.
//!
//! An ability is an entity (`AbilityInstance` + `AbilityStats` +
//! `PendingTriggers`) owned by a caster. Casting queues staggered spawns,
//! fires a directional volley, or requests a summon wave; projectiles are
//! separate entities whose behavior is a data-selected motion capability
//! rather than a subclass.

use bevy::prelude::*;

use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::game::simulation::SimSet;

mod behavior;
mod components;
mod scheduler;
mod spawn;

pub use behavior::drive_projectiles;
pub use components::{
    AbilityInstance, AbilityOwner, AbilityStats, FlightSpeed, GuardianMotion, GuardianState,
    HitPolicy, HitTracker, PendingTriggers, ProjectileMotion, ZoomState,
};
pub use scheduler::{auto_cast_abilities, handle_upgrade_commands, tick_pending_triggers};
pub use spawn::{spawn_area_effects, spawn_projectiles};

// Re-exported so call sites read `ability::Projectile` or the simulation
// path interchangeably.
pub use crate::game::simulation::Projectile;

// ============================================================================
// Events
// ============================================================================

/// A pending trigger ran out (or a volley fired): build one projectile.
#[derive(Event, Message, Debug, Clone)]
pub struct ProjectileSpawnEvent {
    pub ability: Entity,
    /// Explicit flight direction (volleys); resolved from the spec's aim
    /// when absent.
    pub direction: Option<FixedVec2>,
    /// Spawn point override; the owner's position when absent.
    pub position: Option<FixedVec2>,
}

/// A stationary area effect requested mid-flight (detonations, pulses).
#[derive(Event, Message, Debug, Clone)]
pub struct AreaSpawnEvent {
    pub spec_id: String,
    pub position: FixedVec2,
    pub owner: Entity,
    pub damage_override: Option<FixedNum>,
}

/// Externally-granted stat upgrade for a learned ability.
#[derive(Event, Message, Debug, Clone)]
pub struct AbilityUpgradeCommand {
    pub ability: Entity,
    pub stat: String,
    pub value: f32,
}

// ============================================================================
// Helpers
// ============================================================================

/// Closest candidate to `from`, or `None` when the set is empty.
pub fn nearest_of(
    from: FixedVec2,
    candidates: impl Iterator<Item = (Entity, FixedVec2)>,
) -> Option<(Entity, FixedVec2)> {
    candidates.min_by_key(|(_, pos)| (*pos - from).length_squared())
}

// ============================================================================
// Plugin
// ============================================================================

pub struct AbilityPlugin;

impl Plugin for AbilityPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ProjectileSpawnEvent>();
        app.add_message::<AreaSpawnEvent>();
        app.add_message::<AbilityUpgradeCommand>();

        app.add_systems(
            FixedUpdate,
            drive_projectiles
                .in_set(SimSet::Movement)
                .after(crate::game::simulation::pursue_targets),
        );

        app.add_systems(
            FixedUpdate,
            (
                auto_cast_abilities,
                tick_pending_triggers,
                spawn_projectiles,
                spawn_area_effects,
                handle_upgrade_commands,
            )
                .chain()
                .in_set(SimSet::Scheduling),
        );
    }
}
