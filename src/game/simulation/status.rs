//! Per-actor status-effect timers: frozen, paralyzed, controlled.
//!
//! Each condition is an independent countdown. Re-applying a condition
//! refreshes the remaining time, it never stacks. Frozen and paralyzed gate
//! movement and contact attacks; controlled inverts pursuit into flight.

use bevy::prelude::*;

use crate::game::content::StatusKind;
use crate::game::fixed_math::FixedNum;
use crate::profile_log;

use super::components::*;
use super::resources::*;

/// One timed condition.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusTimer {
    pub active: bool,
    pub elapsed: FixedNum,
    pub duration: FixedNum,
}

impl StatusTimer {
    /// Starts (or refreshes) the condition for `duration` seconds.
    pub fn apply(&mut self, duration: FixedNum) {
        self.active = true;
        self.elapsed = FixedNum::ZERO;
        self.duration = duration;
    }

    pub fn tick(&mut self, dt: FixedNum) {
        if !self.active {
            return;
        }
        self.elapsed += dt;
        if self.elapsed > self.duration {
            self.active = false;
        }
    }

    pub fn remaining(&self) -> FixedNum {
        if self.active {
            (self.duration - self.elapsed).max(FixedNum::ZERO)
        } else {
            FixedNum::ZERO
        }
    }
}

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct StatusEffects {
    pub frozen: StatusTimer,
    pub paralyzed: StatusTimer,
    pub controlled: StatusTimer,
}

impl StatusEffects {
    pub fn apply(&mut self, kind: StatusKind, duration: FixedNum) {
        match kind {
            StatusKind::Freeze => self.frozen.apply(duration),
            StatusKind::Paralyze => self.paralyzed.apply(duration),
            StatusKind::Control => self.controlled.apply(duration),
        }
    }

    pub fn tick(&mut self, dt: FixedNum) {
        self.frozen.tick(dt);
        self.paralyzed.tick(dt);
        self.controlled.tick(dt);
    }

    /// Whether the actor may move or attack this tick.
    pub fn can_act(&self) -> bool {
        !self.frozen.active && !self.paralyzed.active
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled.active
    }
}

// ============================================================================
// Systems
// ============================================================================

/// Advances every status clock by the tick delta.
pub fn tick_status_effects(
    mut query: Query<&mut StatusEffects>,
    sim_config: Res<SimConfig>,
    #[allow(unused_variables)] tick: Res<SimTick>,
) {
    let dt = sim_config.delta();
    for mut status in query.iter_mut() {
        status.tick(dt);
    }
    profile_log!(tick, "[STATUS] Actors: {}", query.iter().len());
}

/// Advances contact-attack cooldown timers.
pub fn advance_actor_timers(mut query: Query<&mut AttackTimer>, sim_config: Res<SimConfig>) {
    let dt = sim_config.delta();
    for mut timer in query.iter_mut() {
        timer.since_last += dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(v: f32) -> FixedNum {
        FixedNum::from_num(v)
    }

    #[test]
    fn applying_a_condition_activates_it() {
        let mut status = StatusEffects::default();
        status.apply(StatusKind::Freeze, fx(2.0));
        assert!(!status.can_act());
        assert!(status.frozen.active);
        assert!(!status.paralyzed.active);
    }

    #[test]
    fn conditions_expire_after_their_duration() {
        let mut status = StatusEffects::default();
        status.apply(StatusKind::Paralyze, fx(1.0));
        for _ in 0..10 {
            status.tick(fx(0.1));
        }
        // elapsed == duration: still held, expires on the next tick.
        assert!(status.paralyzed.active);
        status.tick(fx(0.1));
        assert!(!status.paralyzed.active);
        assert!(status.can_act());
    }

    #[test]
    fn reapplying_refreshes_instead_of_stacking() {
        let mut status = StatusEffects::default();
        status.apply(StatusKind::Paralyze, fx(3.0));
        status.tick(fx(1.0));
        status.apply(StatusKind::Paralyze, fx(5.0));

        assert_eq!(status.paralyzed.remaining(), fx(5.0));

        // 5 seconds from the second application, not 7 (3-1 + 5).
        for _ in 0..50 {
            status.tick(fx(0.1));
        }
        assert!(status.paralyzed.active, "still paralyzed at exactly 5s elapsed");
        status.tick(fx(0.1));
        assert!(!status.paralyzed.active, "expired just past 5s");
    }

    #[test]
    fn controlled_does_not_block_acting() {
        let mut status = StatusEffects::default();
        status.apply(StatusKind::Control, fx(4.0));
        assert!(status.can_act());
        assert!(status.is_controlled());
    }
}
