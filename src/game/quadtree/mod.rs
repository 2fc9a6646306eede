//! Region-subdivision tree used to prune collision candidates.
//!
//! The tree is rebuilt from scratch every tick over a screen-sized boundary
//! centered on the player — no incremental updates, no state carried across
//! frames. Rebuild is O(N) for the actor counts this game runs at.
//!
//! # Use Cases
//!
//! - **Projectile hits:** find targets overlapping a projectile's box
//! - **Contact attacks:** find enemies overlapping the player's box
//! - **Area effects:** find everything inside a blast rectangle

use bevy::prelude::*;

use crate::game::fixed_math::FixedRect;

#[cfg(test)]
mod tests;

/// A quadtree node over `(Entity, FixedRect)` entries.
///
/// Nodes hold entries directly until `capacity` is reached, then subdivide
/// into four equal quadrants and delegate overflow to the first child
/// (NW → NE → SW → SE) whose boundary intersects the entry's box. An entry
/// therefore lives in exactly one node and queries can never return
/// duplicates.
pub struct QuadTree {
    boundary: FixedRect,
    capacity: usize,
    entries: Vec<(Entity, FixedRect)>,
    children: Option<Box<[QuadTree; 4]>>,
}

impl QuadTree {
    pub fn new(boundary: FixedRect, capacity: usize) -> Self {
        Self {
            boundary,
            capacity: capacity.max(1),
            entries: Vec::new(),
            children: None,
        }
    }

    pub fn boundary(&self) -> FixedRect {
        self.boundary
    }

    /// Inserts an entry. Returns `false` when the box does not intersect this
    /// node's boundary (the entry is simply not indexed this tick).
    pub fn insert(&mut self, entity: Entity, rect: FixedRect) -> bool {
        if !self.boundary.intersects(&rect) {
            return false;
        }

        if self.entries.len() < self.capacity {
            self.entries.push((entity, rect));
            return true;
        }

        if self.children.is_none() {
            self.subdivide();
        }

        // Children tile the boundary exactly, so one of them intersects.
        let children = self.children.as_mut().unwrap();
        for child in children.iter_mut() {
            if child.insert(entity, rect) {
                return true;
            }
        }

        false
    }

    fn subdivide(&mut self) {
        let [nw, ne, sw, se] = self.boundary.quadrants();
        self.children = Some(Box::new([
            QuadTree::new(nw, self.capacity),
            QuadTree::new(ne, self.capacity),
            QuadTree::new(sw, self.capacity),
            QuadTree::new(se, self.capacity),
        ]));
    }

    /// Collects every indexed entity whose box intersects `range` into
    /// `found`. Only subtrees whose boundary intersects the range are
    /// visited; the node's direct list is always scanned first.
    pub fn query(&self, range: &FixedRect, found: &mut Vec<Entity>) {
        if !self.boundary.intersects(range) {
            return;
        }

        for (entity, rect) in &self.entries {
            if range.intersects(rect) {
                found.push(*entity);
            }
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query(range, found);
            }
        }
    }

    /// Total number of indexed entries. Useful for diagnostics.
    pub fn len(&self) -> usize {
        let own = self.entries.len();
        match &self.children {
            Some(children) => own + children.iter().map(QuadTree::len).sum::<usize>(),
            None => own,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
