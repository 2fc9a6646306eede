use super::*;
use crate::game::fixed_math::FixedNum;

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

#[test]
fn test_insert_rejects_boxes_outside_boundary() {
    let mut tree = QuadTree::new(boundary(), 4);
    assert!(!tree.insert(Entity::from_bits(1), rect(2000.0, 2000.0, 10.0, 10.0)));
    assert!(tree.is_empty());
}

#[test]
fn test_query_finds_overlapping_entries() {
    let mut tree = QuadTree::new(boundary(), 4);
    let near = Entity::from_bits(1);
    let far = Entity::from_bits(2);
    assert!(tree.insert(near, rect(100.0, 100.0, 20.0, 20.0)));
    assert!(tree.insert(far, rect(900.0, 900.0, 20.0, 20.0)));

    let mut found = Vec::new();
    tree.query(&rect(90.0, 90.0, 50.0, 50.0), &mut found);

    assert_eq!(found, vec![near], "Should find only the overlapping entry");
}

#[test]
fn test_query_on_empty_tree_returns_nothing() {
    let tree = QuadTree::new(boundary(), 4);
    let mut found = Vec::new();
    tree.query(&rect(0.0, 0.0, 1024.0, 1024.0), &mut found);
    assert!(found.is_empty());
}

#[test]
fn test_overflow_subdivides_without_losing_entries() {
    let mut tree = QuadTree::new(boundary(), 4);
    // 12 boxes clustered inside the NW quadrant, enough to force two levels
    // of subdivision.
    for i in 0..12u64 {
        let offset = (i as f32) * 6.0;
        assert!(tree.insert(
            Entity::from_bits(i + 1),
            rect(10.0 + offset, 10.0, 4.0, 4.0)
        ));
    }
    assert_eq!(tree.len(), 12);

    let mut found = Vec::new();
    tree.query(&rect(0.0, 0.0, 512.0, 512.0), &mut found);
    assert_eq!(found.len(), 12, "All clustered entries should be found");
}

#[test]
fn test_query_never_returns_duplicates() {
    let mut tree = QuadTree::new(boundary(), 4);
    for i in 0..10u64 {
        assert!(tree.insert(Entity::from_bits(i + 1), rect(200.0, 200.0, 8.0, 8.0)));
    }

    let mut found = Vec::new();
    tree.query(&rect(0.0, 0.0, 1024.0, 1024.0), &mut found);

    assert_eq!(found.len(), 10);
    let mut unique = found.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), found.len(), "Entries must appear exactly once");
}

#[test]
fn test_capacity_keeps_small_sets_in_the_root() {
    let mut tree = QuadTree::new(boundary(), 4);
    for i in 0..4u64 {
        assert!(tree.insert(
            Entity::from_bits(i + 1),
            rect(100.0 * (i as f32 + 1.0), 100.0, 10.0, 10.0)
        ));
    }
    assert_eq!(tree.len(), 4);

    // A query far from every entry still returns nothing.
    let mut found = Vec::new();
    tree.query(&rect(800.0, 800.0, 10.0, 10.0), &mut found);
    assert!(found.is_empty());
}
