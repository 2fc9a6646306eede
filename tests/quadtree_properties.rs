//! Property test: quadtree queries agree with a brute-force overlap scan.

use bevy::prelude::*;

use duskfall::game::fixed_math::{FixedNum, FixedRect};
use duskfall::game::quadtree::QuadTree;

fn rect(x: f32, y: f32, w: f32, h: f32) -> FixedRect {
    FixedRect::new(
        FixedNum::from_num(x),
        FixedNum::from_num(y),
        FixedNum::from_num(w),
        FixedNum::from_num(h),
    )
}

fn boundary() -> FixedRect {
    rect(0.0, 0.0, 1024.0, 1024.0)
}

fn sorted_bits(mut entities: Vec<Entity>) -> Vec<u64> {
    entities.sort();
    entities.into_iter().map(|e| e.to_bits()).collect()
}

/// Randomized actor placements on an 8-unit lattice (one box per cell, so
/// no box ever spans a subdivision line) checked against brute force over
/// hundreds of random query rectangles.
#[test]
fn queries_return_exactly_the_overlapping_set() {
    let mut rng = fastrand::Rng::with_seed(0x5EED);
    let mut world = World::new();

    // 150 unique lattice cells, each holding one small box in its interior.
    let mut cells = std::collections::HashSet::new();
    while cells.len() < 150 {
        cells.insert((rng.u32(0..128), rng.u32(0..128)));
    }
    let mut cells: Vec<_> = cells.into_iter().collect();
    cells.sort();

    let mut actors: Vec<(Entity, FixedRect)> = Vec::new();
    let mut tree = QuadTree::new(boundary(), 4);
    for (cx, cy) in cells {
        let w = 2.0 + rng.f32() * 4.0;
        let h = 2.0 + rng.f32() * 4.0;
        let x = cx as f32 * 8.0 + 1.0;
        let y = cy as f32 * 8.0 + 1.0;
        let entity = world.spawn_empty().id();
        let aabb = rect(x, y, w, h);
        assert!(tree.insert(entity, aabb));
        actors.push((entity, aabb));
    }
    assert_eq!(tree.len(), actors.len());

    for _ in 0..300 {
        let qw = 1.0 + rng.f32() * 400.0;
        let qh = 1.0 + rng.f32() * 400.0;
        let qx = rng.f32() * 1024.0 - qw / 2.0;
        let qy = rng.f32() * 1024.0 - qh / 2.0;
        let query_rect = rect(qx, qy, qw, qh);

        let mut found = Vec::new();
        tree.query(&query_rect, &mut found);

        let expected: Vec<Entity> = actors
            .iter()
            .filter(|(_, aabb)| query_rect.intersects(aabb))
            .map(|(entity, _)| *entity)
            .collect();

        assert_eq!(
            sorted_bits(found),
            sorted_bits(expected),
            "mismatch for query {:?}",
            query_rect
        );
    }
}

/// Arbitrary (possibly line-spanning) boxes: every result truly overlaps
/// the query, nothing is returned twice, and nothing outside the brute
/// force set appears.
#[test]
fn queries_are_sound_and_duplicate_free_for_arbitrary_boxes() {
    let mut rng = fastrand::Rng::with_seed(0xACE5);
    let mut world = World::new();

    let mut actors: Vec<(Entity, FixedRect)> = Vec::new();
    let mut tree = QuadTree::new(boundary(), 4);
    for _ in 0..120 {
        let w = 8.0 + rng.f32() * 120.0;
        let h = 8.0 + rng.f32() * 120.0;
        let x = rng.f32() * (1024.0 - w);
        let y = rng.f32() * (1024.0 - h);
        let entity = world.spawn_empty().id();
        let aabb = rect(x, y, w, h);
        assert!(tree.insert(entity, aabb));
        actors.push((entity, aabb));
    }

    for _ in 0..200 {
        let qw = 10.0 + rng.f32() * 500.0;
        let qh = 10.0 + rng.f32() * 500.0;
        let qx = rng.f32() * 1024.0 - qw / 2.0;
        let qy = rng.f32() * 1024.0 - qh / 2.0;
        let query_rect = rect(qx, qy, qw, qh);

        let mut found = Vec::new();
        tree.query(&query_rect, &mut found);

        let mut unique = found.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), found.len(), "duplicates in query result");

        for entity in &found {
            let (_, aabb) = actors.iter().find(|(e, _)| e == entity).unwrap();
            assert!(
                query_rect.intersects(aabb),
                "query {:?} returned non-overlapping {:?}",
                query_rect,
                aabb
            );
        }
    }
}
