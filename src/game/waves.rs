//! Wave formation generation: where a spawn wave's actors appear.
//!
//! Pure functions over the shared RNG — the director decides *when* to call
//! these, they only compute positions.

use rand::Rng;

use crate::game::fixed_math::{FixedNum, FixedVec2};

/// Named spawn-formation algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavePattern {
    LineHorizontal,
    LineVertical,
    Herd,
    RandomScatter,
}

#[derive(Clone, Copy, Debug)]
pub struct WaveParams {
    pub count: u32,
    pub spacing: FixedNum,
    pub radius: FixedNum,
    pub jitter: FixedNum,
}

/// Half extents of the camera view the director keeps spawns outside of.
#[derive(Clone, Copy, Debug)]
pub struct ScreenExtents {
    pub half_width: FixedNum,
    pub half_height: FixedNum,
}

/// Spawn positions for a wave around `origin`. Total over all valid inputs;
/// `count = 0` yields an empty list. Line patterns produce two rows, so
/// `2 * count` positions.
pub fn generate(
    pattern: WavePattern,
    origin: FixedVec2,
    params: &WaveParams,
    screen: ScreenExtents,
    rng: &mut impl Rng,
) -> Vec<FixedVec2> {
    match pattern {
        WavePattern::LineHorizontal => line(origin, params, screen.half_height, Axis::X, rng),
        WavePattern::LineVertical => line(origin, params, screen.half_width, Axis::Y, rng),
        WavePattern::Herd => herd(origin, params, screen, rng),
        WavePattern::RandomScatter => scatter(origin, params.count, screen, rng),
    }
}

enum Axis {
    X,
    Y,
}

/// Two parallel rows of evenly spaced, jittered positions, centered on the
/// origin along the line axis and offset a half screen to either side on
/// the other axis.
fn line(
    origin: FixedVec2,
    params: &WaveParams,
    row_offset: FixedNum,
    axis: Axis,
    rng: &mut impl Rng,
) -> Vec<FixedVec2> {
    let mut positions = Vec::with_capacity(params.count as usize * 2);
    let overall_length = params.spacing * FixedNum::from_num(params.count);
    let offset = -overall_length / FixedNum::from_num(2.0);

    for index in 0..params.count {
        let along = params.spacing * FixedNum::from_num(index) + offset
            + jitter(params.jitter, rng);
        let near = -row_offset + jitter(params.jitter, rng);
        let far = row_offset + jitter(params.jitter, rng);

        match axis {
            Axis::X => {
                positions.push(FixedVec2::new(origin.x + along, origin.y + near));
                positions.push(FixedVec2::new(origin.x + along, origin.y + far));
            }
            Axis::Y => {
                positions.push(FixedVec2::new(origin.x + near, origin.y + along));
                positions.push(FixedVec2::new(origin.x + far, origin.y + along));
            }
        }
    }

    positions
}

/// Polar ring samples around the origin, pushed a half screen further out
/// in the sign-matching direction so the herd arrives from off-screen.
fn herd(
    origin: FixedVec2,
    params: &WaveParams,
    screen: ScreenExtents,
    rng: &mut impl Rng,
) -> Vec<FixedVec2> {
    let mut positions = Vec::with_capacity(params.count as usize);
    let radius = params.radius.to_num::<f32>();

    for _ in 0..params.count {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let distance = rng.random_range(radius / 2.0..=radius);
        let dx = FixedNum::from_num(distance * angle.cos()) + jitter(params.jitter, rng);
        let dy = FixedNum::from_num(distance * angle.sin()) + jitter(params.jitter, rng);

        let push_x = if dx < FixedNum::ZERO { -screen.half_width } else { screen.half_width };
        let push_y = if dy < FixedNum::ZERO { -screen.half_height } else { screen.half_height };

        positions.push(FixedVec2::new(origin.x + dx + push_x, origin.y + dy + push_y));
    }

    positions
}

/// Uniform positions inside a screen-sized box centered on the origin.
fn scatter(
    origin: FixedVec2,
    count: u32,
    screen: ScreenExtents,
    rng: &mut impl Rng,
) -> Vec<FixedVec2> {
    let half_w = screen.half_width.to_num::<f32>();
    let half_h = screen.half_height.to_num::<f32>();
    (0..count)
        .map(|_| {
            origin
                + FixedVec2::from_f32(
                    rng.random_range(-half_w..=half_w),
                    rng.random_range(-half_h..=half_h),
                )
        })
        .collect()
}

fn jitter(amount: FixedNum, rng: &mut impl Rng) -> FixedNum {
    let amount = amount.to_num::<f32>();
    if amount <= 0.0 {
        return FixedNum::ZERO;
    }
    FixedNum::from_num(rng.random_range(-amount..=amount))
}

/// Teleports a runaway actor to just-off-screen on the opposite side of the
/// reference point. Returns `None` while the actor is within
/// `half_width + margin` of the reference; otherwise the new position sits
/// exactly `half_width + off_screen_distance` along the mirrored ray,
/// preserving the actor rather than despawning it.
pub fn reposition_far_position(
    actor: FixedVec2,
    reference: FixedVec2,
    half_width: FixedNum,
    margin: FixedNum,
    off_screen_distance: FixedNum,
) -> Option<FixedVec2> {
    let delta = actor - reference;
    if delta.length() <= half_width + margin {
        return None;
    }
    let mirrored_dir = (reference - actor).normalize();
    Some(reference + mirrored_dir * (half_width + off_screen_distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fx(v: f32) -> FixedNum {
        FixedNum::from_num(v)
    }

    fn screen() -> ScreenExtents {
        ScreenExtents { half_width: fx(960.0), half_height: fx(540.0) }
    }

    fn params(count: u32) -> WaveParams {
        WaveParams { count, spacing: fx(50.0), radius: fx(100.0), jitter: fx(0.0) }
    }

    #[test]
    fn zero_count_yields_no_positions() {
        let mut rng = StdRng::seed_from_u64(1);
        for pattern in [
            WavePattern::LineHorizontal,
            WavePattern::LineVertical,
            WavePattern::Herd,
            WavePattern::RandomScatter,
        ] {
            let positions = generate(pattern, FixedVec2::ZERO, &params(0), screen(), &mut rng);
            assert!(positions.is_empty());
        }
    }

    #[test]
    fn horizontal_line_builds_two_rows_at_half_screen_height() {
        let mut rng = StdRng::seed_from_u64(2);
        let origin = FixedVec2::from_f32(100.0, 200.0);
        let positions =
            generate(WavePattern::LineHorizontal, origin, &params(5), screen(), &mut rng);

        assert_eq!(positions.len(), 10, "two rows of `count` each");
        let near_row = positions.iter().filter(|p| p.y == origin.y - fx(540.0)).count();
        let far_row = positions.iter().filter(|p| p.y == origin.y + fx(540.0)).count();
        assert_eq!(near_row, 5);
        assert_eq!(far_row, 5);

        // Positions are centered on the origin along the line axis.
        let min_x = positions.iter().map(|p| p.x).min().unwrap();
        let max_x = positions.iter().map(|p| p.x).max().unwrap();
        assert!(min_x < origin.x && origin.x < max_x);
    }

    #[test]
    fn vertical_line_builds_two_columns_at_half_screen_width() {
        let mut rng = StdRng::seed_from_u64(3);
        let origin = FixedVec2::ZERO;
        let positions =
            generate(WavePattern::LineVertical, origin, &params(4), screen(), &mut rng);

        assert_eq!(positions.len(), 8);
        assert!(positions.iter().all(|p| p.x == fx(-960.0) || p.x == fx(960.0)));
    }

    #[test]
    fn herd_positions_land_off_screen() {
        let mut rng = StdRng::seed_from_u64(4);
        let origin = FixedVec2::ZERO;
        let positions = generate(WavePattern::Herd, origin, &params(32), screen(), &mut rng);

        assert_eq!(positions.len(), 32);
        for p in &positions {
            let outside_x = p.x.abs() >= fx(960.0) - fx(100.0);
            let outside_y = p.y.abs() >= fx(540.0) - fx(100.0);
            assert!(
                outside_x || outside_y,
                "herd position {:?} landed fully inside the view",
                p
            );
        }
    }

    #[test]
    fn scatter_stays_inside_the_screen_box() {
        let mut rng = StdRng::seed_from_u64(5);
        let origin = FixedVec2::from_f32(-500.0, 300.0);
        let positions =
            generate(WavePattern::RandomScatter, origin, &params(20), screen(), &mut rng);

        assert_eq!(positions.len(), 20);
        for p in &positions {
            assert!((p.x - origin.x).abs() <= fx(960.0));
            assert!((p.y - origin.y).abs() <= fx(540.0));
        }
    }

    #[test]
    fn nearby_actors_are_not_repositioned() {
        let moved = reposition_far_position(
            FixedVec2::from_f32(1000.0, 0.0),
            FixedVec2::ZERO,
            fx(960.0),
            fx(300.0),
            fx(100.0),
        );
        assert_eq!(moved, None);
    }

    #[test]
    fn far_actors_teleport_to_just_off_screen_on_the_mirrored_side() {
        let half_width = fx(960.0);
        let reference = FixedVec2::from_f32(200.0, -50.0);
        // 1261 units out along +x: past the 960 + 300 margin.
        let actor = reference + FixedVec2::from_f32(1261.0, 0.0);

        let moved = reposition_far_position(actor, reference, half_width, fx(300.0), fx(100.0))
            .expect("actor beyond the margin must be repositioned");

        let expected = reference - FixedVec2::from_f32(1060.0, 0.0);
        assert!((moved.x - expected.x).abs() < fx(0.05), "moved to {:?}", moved);
        assert!((moved.y - expected.y).abs() < fx(0.05));

        let new_distance = moved.distance(reference);
        assert!(
            (new_distance - fx(1060.0)).abs() < fx(0.05),
            "distance {} should be half_width + off_screen_distance",
            new_distance
        );
    }
}
