//! Resource definitions for the simulation: configuration converted to
//! fixed-point, the shared RNG, the per-tick collision tree and performance
//! bookkeeping.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

use crate::game::config::InitialConfig;
use crate::game::fixed_math::{FixedNum, FixedRect, FixedVec2};
use crate::game::quadtree::QuadTree;

// ============================================================================
// Simulation Configuration
// ============================================================================

/// Runtime simulation configuration with fixed-point values.
///
/// Converted once from [`InitialConfig`] (floats, RON-friendly) at startup.
/// The config layer stays in floats for human-readable files; the simulation
/// layer is fixed-point so every tick is reproducible. One conversion point,
/// not scattered casts.
#[derive(Resource)]
pub struct SimConfig {
    pub tick_rate: f64,
    pub epsilon: FixedNum,

    pub screen_width: FixedNum,
    pub screen_height: FixedNum,

    pub quadtree_capacity: usize,

    pub player_speed: FixedNum,
    pub player_max_health: FixedNum,
    pub player_size: FixedVec2,

    pub spawn_interval: FixedNum,
    pub max_enemy_count: usize,
    pub wave_enemy_count: u32,
    pub off_screen_distance: FixedNum,
    pub reposition_margin: FixedNum,
    pub wave_health_scale: FixedNum,
    pub wave_damage_scale: FixedNum,
    pub line_spacing: FixedNum,
    pub line_jitter: FixedNum,
    pub herd_radius: FixedNum,
    pub herd_jitter: FixedNum,

    pub default_stagger_rate: FixedNum,
    pub zoom_arrival_epsilon: FixedNum,
}

impl SimConfig {
    /// Seconds advanced by one tick.
    pub fn delta(&self) -> FixedNum {
        FixedNum::from_num(1.0) / FixedNum::from_num(self.tick_rate)
    }

    pub fn screen_half_width(&self) -> FixedNum {
        self.screen_width / FixedNum::from_num(2.0)
    }

    pub fn screen_half_height(&self) -> FixedNum {
        self.screen_height / FixedNum::from_num(2.0)
    }

    pub fn from_initial(initial: &InitialConfig) -> Self {
        Self {
            tick_rate: initial.tick_rate,
            epsilon: FixedNum::from_num(initial.epsilon),
            screen_width: FixedNum::from_num(initial.screen_width),
            screen_height: FixedNum::from_num(initial.screen_height),
            quadtree_capacity: initial.quadtree_capacity,
            player_speed: FixedNum::from_num(initial.player_speed),
            player_max_health: FixedNum::from_num(initial.player_max_health),
            player_size: FixedVec2::from_f32(initial.player_size.0, initial.player_size.1),
            spawn_interval: FixedNum::from_num(initial.spawn_interval),
            max_enemy_count: initial.max_enemy_count,
            wave_enemy_count: initial.wave_enemy_count,
            off_screen_distance: FixedNum::from_num(initial.off_screen_distance),
            reposition_margin: FixedNum::from_num(initial.reposition_margin),
            wave_health_scale: FixedNum::from_num(initial.wave_health_scale),
            wave_damage_scale: FixedNum::from_num(initial.wave_damage_scale),
            line_spacing: FixedNum::from_num(initial.line_spacing),
            line_jitter: FixedNum::from_num(initial.line_jitter),
            herd_radius: FixedNum::from_num(initial.herd_radius),
            herd_jitter: FixedNum::from_num(initial.herd_jitter),
            default_stagger_rate: FixedNum::from_num(initial.default_stagger_rate),
            zoom_arrival_epsilon: FixedNum::from_num(initial.zoom_arrival_epsilon),
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::from_initial(&InitialConfig::default())
    }
}

// ============================================================================
// Randomness
// ============================================================================

/// The only random source the simulation draws from. Seeded from config so
/// runs (and tests) replay identically.
#[derive(Resource)]
pub struct SimRng(pub StdRng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self::seeded(InitialConfig::default().rng_seed)
    }
}

// ============================================================================
// Broadphase
// ============================================================================

/// The per-tick collision tree. Rebuilt from scratch every tick; empty until
/// the first rebuild (or when no player exists to center it on).
#[derive(Resource, Default)]
pub struct CollisionTree {
    tree: Option<QuadTree>,
}

impl CollisionTree {
    pub fn replace(&mut self, tree: QuadTree) {
        self.tree = Some(tree);
    }

    pub fn clear(&mut self) {
        self.tree = None;
    }

    pub fn query(&self, range: &FixedRect) -> Vec<Entity> {
        let mut found = Vec::new();
        if let Some(tree) = &self.tree {
            tree.query(range, &mut found);
        }
        found
    }

    pub fn indexed_count(&self) -> usize {
        self.tree.as_ref().map_or(0, QuadTree::len)
    }
}

// ============================================================================
// Tick bookkeeping
// ============================================================================

/// Monotonic tick counter, incremented before anything else runs.
#[derive(Resource, Default)]
pub struct SimTick(pub u64);

/// Performance tracking for simulation ticks.
#[derive(Resource)]
pub struct SimPerformance {
    pub start_time: Option<Instant>,
    pub last_duration: Duration,
}

impl Default for SimPerformance {
    fn default() -> Self {
        Self {
            start_time: None,
            last_duration: Duration::from_secs(0),
        }
    }
}
