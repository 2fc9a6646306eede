//! Component definitions for the simulation layer.
//!
//! Everything an actor carries through a tick lives here: position, body,
//! health, pursuit state, status timers and lifetime bookkeeping.

use bevy::prelude::*;

use crate::game::fixed_math::{FixedNum, FixedRect, FixedVec2};

// ============================================================================
// Position & Body
// ============================================================================

/// Logical position of an entity in the simulation world (box center).
/// FixedVec2 keeps ticks deterministic.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SimPosition(pub FixedVec2);

/// Collision box extents, centered on [`SimPosition`].
#[derive(Component, Debug, Clone, Copy)]
pub struct Body {
    pub size: FixedVec2,
}

impl Body {
    pub fn new(w: FixedNum, h: FixedNum) -> Self {
        Self { size: FixedVec2::new(w, h) }
    }

    pub fn from_f32(size: (f32, f32)) -> Self {
        Self { size: FixedVec2::from_f32(size.0, size.1) }
    }

    pub fn aabb(&self, center: FixedVec2) -> FixedRect {
        FixedRect::from_center(center, self.size)
    }

    pub fn half_width(&self) -> FixedNum {
        self.size.x / FixedNum::from_num(2.0)
    }
}

/// Participates in same-group overlap separation.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SolidBody;

/// Movement speed in world units per second.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MoveSpeed(pub FixedNum);

// ============================================================================
// Faction markers
// ============================================================================

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Enemy;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct NeutralNpc;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FriendlyNpc;

/// Marks an ability's collision carrier (projectiles and area effects).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Projectile;

/// Coarse classification carried on every actor; death events report it so
/// external reward/UI systems can react without extra lookups.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Player,
    Enemy,
    Neutral,
    Friendly,
    Projectile,
}

/// Content id the actor was built from.
#[derive(Component, Debug, Clone)]
pub struct NpcId(pub String);

// ============================================================================
// Health & combat
// ============================================================================

/// Health pool. `current` never leaves `[0, max]`; the transition to zero
/// happens exactly once per actor.
#[derive(Component, Debug, Clone, Copy)]
pub struct Health {
    pub current: FixedNum,
    pub max: FixedNum,
}

impl Health {
    pub fn new(max: FixedNum) -> Self {
        Self { current: max, max }
    }

    pub fn is_dead(&self) -> bool {
        self.current == FixedNum::ZERO
    }
}

/// Damage dealt by a contact attack.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ContactDamage(pub FixedNum);

/// Cooldown gate for contact attacks.
#[derive(Component, Debug, Clone, Copy)]
pub struct AttackTimer {
    pub since_last: FixedNum,
    pub cooldown: FixedNum,
}

impl AttackTimer {
    pub fn new(cooldown: FixedNum) -> Self {
        Self { since_last: FixedNum::ZERO, cooldown }
    }

    pub fn ready(&self) -> bool {
        self.since_last > self.cooldown
    }
}

// ============================================================================
// Pursuit
// ============================================================================

/// Entity this actor chases, usually the player.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Target(pub Option<Entity>);

/// World point this actor moves toward; refreshed from [`Target`] while the
/// target is alive.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct TargetPosition(pub Option<FixedVec2>);

// ============================================================================
// Lifetime & spawners
// ============================================================================

/// Seconds of life remaining; the actor despawns when it runs out.
#[derive(Component, Debug, Clone, Copy)]
pub struct Lifetime(pub FixedNum);

/// Ephemeral spawner (rifts): requests an elite enemy on an interval for as
/// long as its [`Lifetime`] lasts.
#[derive(Component, Debug, Clone, Copy)]
pub struct RiftSpawner {
    pub since_last: FixedNum,
    pub interval: FixedNum,
}

// ============================================================================
// Presentation contract
// ============================================================================

/// Current visual frame index, advanced by the presentation clock. The
/// renderer reads this and the synced `Transform`; the simulation never
/// touches pixels.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct VisualFrame {
    pub index: u32,
    pub timer: f32,
}
