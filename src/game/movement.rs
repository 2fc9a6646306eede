//! Stateless movement math shared by actors and projectiles.
//!
//! Every function is a pure transformation over fixed-point vectors; the only
//! nondeterminism is the caller-supplied RNG, which the simulation owns as a
//! seeded resource so tests replay identical trajectories.

use rand::Rng;
use thiserror::Error;

use crate::game::fixed_math::{tau, FixedNum, FixedVec2};

/// Where a moving body is headed: at a world point, or along a vector.
#[derive(Clone, Copy, Debug)]
pub enum Heading {
    Point(FixedVec2),
    Along(FixedVec2),
}

/// Bézier interpolation parameter outside `[0, 1]`. Rejected rather than
/// clamped so integration bugs surface at the call site.
#[derive(Debug, Error, PartialEq)]
#[error("curve parameter {0} outside [0, 1]")]
pub struct CurveParamError(pub FixedNum);

/// Normalized direction from `source` toward a heading. Degenerate input
/// (target on top of source, zero vector) yields the zero vector.
pub fn direction(source: FixedVec2, heading: Heading) -> FixedVec2 {
    match heading {
        Heading::Point(target) => (target - source).normalize(),
        Heading::Along(dir) => dir.normalize(),
    }
}

/// Uniformly random unit direction.
pub fn random_direction(rng: &mut impl Rng) -> FixedVec2 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    FixedVec2::from_angle(angle)
}

/// Direction toward a heading when one exists, otherwise a random one.
pub fn direction_or_random(
    source: FixedVec2,
    heading: Option<Heading>,
    rng: &mut impl Rng,
) -> FixedVec2 {
    match heading {
        Some(h) => direction(source, h),
        None => random_direction(rng),
    }
}

/// One movement step toward a heading.
pub fn step_towards(
    source: FixedVec2,
    speed: FixedNum,
    dt: FixedNum,
    heading: Heading,
) -> FixedVec2 {
    source + direction(source, heading) * speed * dt
}

/// One movement step directly away from a heading.
pub fn step_away(
    source: FixedVec2,
    speed: FixedNum,
    dt: FixedNum,
    heading: Heading,
) -> FixedVec2 {
    source - direction(source, heading) * speed * dt
}

/// Advances an orbit around `center` and returns the new position and angle.
/// The angle wraps into `[0, 2π)`.
pub fn orbit_step(
    center: FixedVec2,
    radius: FixedNum,
    angle: FixedNum,
    angular_speed: FixedNum,
    dt: FixedNum,
) -> (FixedVec2, FixedNum) {
    let new_angle = (angle + angular_speed * dt) % tau();
    let offset = FixedVec2::from_angle(new_angle.to_num::<f32>()) * radius;
    (center + offset, new_angle)
}

/// Quadratic Bézier evaluation. Exact at the endpoints: `t = 0` yields
/// `start`, `t = 1` yields `end`.
pub fn curve_point(
    start: FixedVec2,
    end: FixedVec2,
    control: FixedVec2,
    t: FixedNum,
) -> Result<FixedVec2, CurveParamError> {
    if t < FixedNum::ZERO || t > FixedNum::ONE {
        return Err(CurveParamError(t));
    }
    let u = FixedNum::ONE - t;
    let two = FixedNum::from_num(2.0);
    Ok(start * (u * u) + control * (two * u * t) + end * (t * t))
}

/// Control point for an arcing throw: the midpoint lifted by `curve_height`.
pub fn control_point(start: FixedVec2, end: FixedVec2, curve_height: FixedNum) -> FixedVec2 {
    let two = FixedNum::from_num(2.0);
    let mid = (start + end) / two;
    FixedVec2::new(mid.x, mid.y - curve_height)
}

/// Uniformly random point on the circle of `radius` around `center`.
pub fn random_point_on_circle(
    center: FixedVec2,
    radius: FixedNum,
    rng: &mut impl Rng,
) -> FixedVec2 {
    center + random_direction(rng) * radius
}
