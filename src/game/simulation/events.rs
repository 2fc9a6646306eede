//! Messages and commands flowing between simulation subsystems and the
//! external layers (input, presentation, audio).

use bevy::prelude::*;

use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::game::simulation::components::ActorKind;
use crate::game::waves::WavePattern;

// ============================================================================
// External-layer commands
// ============================================================================

/// Movement intent for the player, produced by the input layer.
#[derive(Event, Message, Debug, Clone)]
pub struct PlayerMoveCommand {
    pub direction: FixedVec2,
}

/// Request for an enemy wave. Fields left `None` are filled by the director
/// (player-centered origin, random enemy, configured count, random pattern).
#[derive(Event, Message, Debug, Clone)]
pub struct SpawnWaveCommand {
    pub origin: Option<FixedVec2>,
    pub npc: Option<String>,
    pub count: Option<u32>,
    pub pattern: Option<WavePattern>,
}

impl SpawnWaveCommand {
    pub fn director_default() -> Self {
        Self { origin: None, npc: None, count: None, pattern: None }
    }
}

/// Request for a single elite enemy (rift spawners).
#[derive(Event, Message, Debug, Clone)]
pub struct EliteSpawnCommand {
    pub position: FixedVec2,
}

// ============================================================================
// Combat events
// ============================================================================

#[derive(Event, Message, Debug, Clone)]
pub struct DamageEvent {
    pub target: Entity,
    pub amount: FixedNum,
}

/// Fired exactly once when an actor's health reaches zero.
#[derive(Event, Message, Debug, Clone)]
pub struct DeathEvent {
    pub entity: Entity,
    pub kind: ActorKind,
}

// ============================================================================
// Presentation contracts
// ============================================================================

/// Floating combat text at a world position; display is external.
#[derive(Event, Message, Debug, Clone)]
pub struct DamageNumberEvent {
    pub text: String,
    pub position: FixedVec2,
}

/// Named audio cue (e.g. `ember_lance_cast`); playback is external.
#[derive(Event, Message, Debug, Clone)]
pub struct AudioCueEvent {
    pub cue: String,
}
