//! Typed content database for abilities and NPCs.
//!
//! Content rides in RON files as explicit records; every field an entity
//! needs exists on its spec struct, and unresolved references fail the load.
//! This is the hard boundary of spec-data errors: a missing record aborts
//! startup, nothing else in the game is allowed to.

use bevy::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ABILITIES_PATH: &str = "assets/abilities.ron";
pub const NPCS_PATH: &str = "assets/npcs.ron";

/// Fatal content-configuration failures. Surfaced at boot, never recovered.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("unable to read content file {path}: {message}")]
    Io { path: String, message: String },
    #[error("malformed content file {path}: {message}")]
    Parse { path: String, message: String },
    #[error("ability `{0}` has no content record")]
    UnknownAbility(String),
    #[error("npc `{0}` has no content record")]
    UnknownNpc(String),
}

/// How a projectile aims when its direction is captured at spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum AimSpec {
    /// Toward the nearest enemy at cast time; random when none exists.
    NearestEnemy,
    /// Toward the player at cast time (enemy-cast projectiles).
    AtPlayer,
    /// Uniformly random.
    Random,
}

/// Movement capability of a projectile, selected per ability via content
/// rather than subclassing.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum MotionSpec {
    /// Area effect that never moves (explosions, pulses).
    Stationary,
    /// Straight flight along a direction captured at spawn.
    FixedDirection { aim: AimSpec },
    /// Re-acquires the nearest enemy every tick; holds position when none.
    SeekNearest,
    /// Circles the ability owner.
    Orbit { radius: f32, angular_speed: f32 },
    /// Arcing throw: no collision in flight, detonates into `on_end` at the
    /// end of the curve.
    Curve { radius: f32, curve_height: f32, on_end: String },
    /// Rests in place, then dashes to a random enemy's captured position.
    Zoom { rest_time: f32 },
    /// Hunts the nearest enemy, periodically dashing past it, and emits a
    /// pulse area effect on its own timer.
    Guardian {
        dash_speed_mult: f32,
        dash_range: f32,
        dash_interval: f32,
        pulse_id: String,
        pulse_interval: f32,
    },
}

/// What casting an ability actually does.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum CastSpec {
    /// Queue `projectiles` staggered spawns of a projectile with `motion`.
    Burst { motion: MotionSpec },
    /// Spawn one projectile per compass direction immediately, alternating
    /// cardinal and diagonal sets between casts.
    Volley,
    /// Request an enemy wave at the owner's position.
    Summon { npc: String, count: u32 },
}

/// Which collection a projectile tests against. Partitioning by group is
/// what rules out self-collision: player-cast projectiles never test the
/// player group and vice versa.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum TargetGroup {
    #[default]
    Enemies,
    Player,
}

/// Status condition a hit can inflict.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub enum StatusKind {
    Freeze,
    Paralyze,
    Control,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct StatusOnHit {
    pub kind: StatusKind,
    pub duration: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct UpgradeSpec {
    pub stat: String,
    pub value: f32,
}

/// Flat per-rarity stat-increase tables, straight data.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct UpgradeTable {
    #[serde(default)]
    pub common: Vec<UpgradeSpec>,
    #[serde(default)]
    pub rare: Vec<UpgradeSpec>,
    #[serde(default)]
    pub epic: Vec<UpgradeSpec>,
}

fn default_true() -> bool {
    true
}

fn default_projectile_size() -> (f32, f32) {
    (24.0, 24.0)
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AbilitySpec {
    pub name: String,
    pub cooldown: f32,
    pub damage: f32,
    /// Per-target re-hit cooldown in seconds.
    pub damage_rate: f32,
    /// Projectile lifetime in seconds.
    pub duration: f32,
    pub speed: f32,
    /// Number of projectiles per burst.
    #[serde(default)]
    pub projectiles: u32,
    /// Seconds between staggered spawns; the global default applies when
    /// absent.
    #[serde(default)]
    pub stagger_rate: Option<f32>,
    #[serde(default)]
    pub max_hit_count: Option<u32>,
    #[serde(default = "default_projectile_size")]
    pub size: (f32, f32),
    pub cast: CastSpec,
    #[serde(default)]
    pub targets: TargetGroup,
    #[serde(default = "default_true")]
    pub triggers_on_collision: bool,
    #[serde(default)]
    pub on_hit_status: Option<StatusOnHit>,
    /// Floating text on hit; the damage value is shown when absent.
    #[serde(default)]
    pub hit_text: Option<String>,
    #[serde(default)]
    pub max_level: u32,
    #[serde(default)]
    pub upgrades: UpgradeTable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum NpcKind {
    Enemy,
    Neutral,
    Friendly,
}

/// Ephemeral spawner behavior (rifts): emits elite-enemy spawn requests on
/// an interval until its lifetime runs out.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct SpawnerSpec {
    pub interval: f32,
    pub duration: f32,
}

fn default_attack_cooldown() -> f32 {
    1.0
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NpcSpec {
    pub name: String,
    pub kind: NpcKind,
    pub base_health: f32,
    pub base_damage: f32,
    pub speed: f32,
    pub size: (f32, f32),
    #[serde(default = "default_true")]
    pub solid_body: bool,
    #[serde(default = "default_attack_cooldown")]
    pub attack_cooldown: f32,
    /// Excluded from the director's random wave pool; only spawned by
    /// events and abilities.
    #[serde(default)]
    pub event_only: bool,
    #[serde(default)]
    pub spawner: Option<SpawnerSpec>,
    /// Abilities this NPC casts on cooldown (boss volleys, webbing).
    #[serde(default)]
    pub abilities: Vec<String>,
}

/// All loaded content, keyed by id.
#[derive(Resource, Debug, Default)]
pub struct ContentLibrary {
    abilities: FxHashMap<String, AbilitySpec>,
    npcs: FxHashMap<String, NpcSpec>,
}

impl ContentLibrary {
    pub fn ability(&self, id: &str) -> Result<&AbilitySpec, ContentError> {
        self.abilities
            .get(id)
            .ok_or_else(|| ContentError::UnknownAbility(id.to_string()))
    }

    pub fn npc(&self, id: &str) -> Result<&NpcSpec, ContentError> {
        self.npcs
            .get(id)
            .ok_or_else(|| ContentError::UnknownNpc(id.to_string()))
    }

    /// Ids of every NPC the director may pick for a random wave.
    pub fn spawnable_enemies(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .npcs
            .iter()
            .filter(|(_, spec)| spec.kind == NpcKind::Enemy && !spec.event_only)
            .map(|(id, _)| id.clone())
            .collect();
        // Iteration order of the map is unstable; the RNG stream must not be.
        ids.sort();
        ids
    }

    pub fn load() -> Result<Self, ContentError> {
        let abilities = read_ron::<FxHashMap<String, AbilitySpec>>(ABILITIES_PATH)?;
        let npcs = read_ron::<FxHashMap<String, NpcSpec>>(NPCS_PATH)?;
        let library = Self { abilities, npcs };
        library.validate()?;
        Ok(library)
    }

    pub fn from_parts(
        abilities: FxHashMap<String, AbilitySpec>,
        npcs: FxHashMap<String, NpcSpec>,
    ) -> Result<Self, ContentError> {
        let library = Self { abilities, npcs };
        library.validate()?;
        Ok(library)
    }

    /// Cross-reference check: every id a record mentions must resolve.
    fn validate(&self) -> Result<(), ContentError> {
        for spec in self.abilities.values() {
            match &spec.cast {
                CastSpec::Burst { motion } => match motion {
                    MotionSpec::Curve { on_end, .. } => {
                        self.ability(on_end)?;
                    }
                    MotionSpec::Guardian { pulse_id, .. } => {
                        self.ability(pulse_id)?;
                    }
                    _ => {}
                },
                CastSpec::Summon { npc, .. } => {
                    self.npc(npc)?;
                }
                CastSpec::Volley => {}
            }
        }
        for spec in self.npcs.values() {
            for ability in &spec.abilities {
                self.ability(ability)?;
            }
        }
        Ok(())
    }
}

fn read_ron<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, ContentError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ContentError::Io {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    ron::from_str(&contents).map_err(|e| ContentError::Parse {
        path: path.to_string(),
        message: e.to_string(),
    })
}
