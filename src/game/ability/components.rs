//! Components for ability instances and their projectiles.

use bevy::prelude::*;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::game::content::{AbilitySpec, StatusKind, TargetGroup};
use crate::game::fixed_math::{FixedNum, FixedVec2};

// ============================================================================
// Ability instances
// ============================================================================

/// One learned ability. Lives on its own entity, owned by a caster; casts
/// itself whenever its cooldown elapses.
#[derive(Component, Debug, Clone)]
pub struct AbilityInstance {
    pub id: String,
    pub level: u32,
    pub time_since_last_use: FixedNum,
    /// Alternates volley direction sets between casts.
    pub volley_cycle: u8,
}

impl AbilityInstance {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level: 1,
            time_since_last_use: FixedNum::ZERO,
            volley_cycle: 0,
        }
    }
}

/// Runtime stat block, copied out of the spec at learn time so upgrades can
/// mutate it without touching content.
#[derive(Component, Debug, Clone)]
pub struct AbilityStats {
    pub cooldown: FixedNum,
    pub damage: FixedNum,
    pub damage_rate: FixedNum,
    pub duration: FixedNum,
    pub speed: FixedNum,
    pub projectiles: u32,
    pub stagger_rate: FixedNum,
    pub max_hit_count: Option<u32>,
}

impl AbilityStats {
    pub fn from_spec(spec: &AbilitySpec, default_stagger: FixedNum) -> Self {
        Self {
            cooldown: FixedNum::from_num(spec.cooldown),
            damage: FixedNum::from_num(spec.damage),
            damage_rate: FixedNum::from_num(spec.damage_rate),
            duration: FixedNum::from_num(spec.duration),
            speed: FixedNum::from_num(spec.speed),
            projectiles: spec.projectiles,
            stagger_rate: spec
                .stagger_rate
                .map(FixedNum::from_num)
                .unwrap_or(default_stagger),
            max_hit_count: spec.max_hit_count,
        }
    }

    /// Flat stat increase by name, the shape upgrade tables use. Unknown
    /// stats are reported and ignored.
    pub fn upgrade_stat(&mut self, stat: &str, value: f32) {
        let fixed = FixedNum::from_num(value);
        match stat {
            "damage" => self.damage += fixed,
            "cooldown" => self.cooldown = (self.cooldown + fixed).max(FixedNum::ZERO),
            "damage_rate" => self.damage_rate = (self.damage_rate + fixed).max(FixedNum::ZERO),
            "duration" => self.duration += fixed,
            "speed" => self.speed += fixed,
            "projectiles" => {
                let next = self.projectiles as i64 + value as i64;
                self.projectiles = next.max(0) as u32;
            }
            _ => warn!("Ignoring upgrade for unknown stat `{}`", stat),
        }
    }
}

/// Caster that owns this ability (and the orbit center of its projectiles).
#[derive(Component, Debug, Clone, Copy)]
pub struct AbilityOwner(pub Entity);

/// Countdown queue of staggered projectile spawns. Countdowns are enqueued
/// as `0, s, 2s, …`; a countdown fires once it drops below zero, in enqueue
/// order. Ties keep their relative order; nothing is coalesced.
#[derive(Component, Debug, Clone, Default)]
pub struct PendingTriggers(pub SmallVec<[FixedNum; 8]>);

impl PendingTriggers {
    pub fn queue_burst(&mut self, count: u32, stagger: FixedNum) {
        for index in 0..count {
            self.0.push(stagger * FixedNum::from_num(index));
        }
    }

    /// Advances every countdown by `dt` and returns how many fired.
    pub fn tick(&mut self, dt: FixedNum) -> u32 {
        let mut fired = 0;
        self.0.retain(|countdown| {
            *countdown -= dt;
            if *countdown < FixedNum::ZERO {
                fired += 1;
                false
            } else {
                true
            }
        });
        fired
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// Projectiles
// ============================================================================

/// Flight speed in world units per second (curve flight: parameter units).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FlightSpeed(pub FixedNum);

/// Everything the collision resolver needs to know about a projectile.
#[derive(Component, Debug, Clone)]
pub struct HitPolicy {
    pub damage: FixedNum,
    /// Per-target re-hit cooldown in seconds.
    pub damage_rate: FixedNum,
    pub max_hit_count: Option<u32>,
    pub targets: TargetGroup,
    /// Disabled for visual-only flight stages (arcing throws).
    pub triggers_on_collision: bool,
    pub on_hit_status: Option<(StatusKind, FixedNum)>,
    pub hit_text: String,
}

/// Per-target cooldown entries and the running hit count.
#[derive(Component, Debug, Clone, Default)]
pub struct HitTracker {
    pub cooldowns: FxHashMap<Entity, FixedNum>,
    pub hits: u32,
}

impl HitTracker {
    /// A target can be hit unless it has a live cooldown entry; expired
    /// entries are purged by the decay pass.
    pub fn can_collide(&self, target: Entity) -> bool {
        !self.cooldowns.contains_key(&target)
    }

    pub fn record_hit(&mut self, target: Entity, damage_rate: FixedNum) {
        self.cooldowns.insert(target, damage_rate);
        self.hits += 1;
    }

    pub fn decay(&mut self, dt: FixedNum) {
        self.cooldowns.retain(|_, remaining| {
            *remaining -= dt;
            *remaining > FixedNum::ZERO
        });
    }
}

/// Movement capability of a live projectile, instantiated from the spec's
/// [`crate::game::content::MotionSpec`] at spawn.
#[derive(Component, Debug, Clone)]
pub enum ProjectileMotion {
    Stationary,
    FixedDirection {
        direction: FixedVec2,
    },
    SeekNearest,
    Orbit {
        radius: FixedNum,
        angular_speed: FixedNum,
        angle: FixedNum,
    },
    Curve {
        start: FixedVec2,
        end: FixedVec2,
        control: FixedVec2,
        t: FixedNum,
        on_end: String,
    },
    Zoom {
        rest_time: FixedNum,
        state: ZoomState,
    },
    Guardian(GuardianMotion),
}

#[derive(Debug, Clone, Copy)]
pub enum ZoomState {
    Resting { since: FixedNum },
    Zooming { target: FixedVec2 },
}

/// Guardian projectiles alternate hunting and dashing, and pulse on their
/// own clock.
#[derive(Debug, Clone)]
pub struct GuardianMotion {
    pub dash_speed_mult: FixedNum,
    pub dash_range: FixedNum,
    pub dash_interval: FixedNum,
    pub pulse_id: String,
    pub pulse_interval: FixedNum,
    pub state: GuardianState,
    pub since_dash: FixedNum,
    pub next_dash: FixedNum,
    pub since_pulse: FixedNum,
}

#[derive(Debug, Clone, Copy)]
pub enum GuardianState {
    Hunting,
    Dashing { target: FixedVec2, start: FixedVec2 },
}
