use serde::{Deserialize, Serialize};

use super::{FixedNum, FixedVec2};

/// Axis-aligned rectangle: top-left corner plus extents.
///
/// Overlap uses strict inequalities, so rectangles that merely share an edge
/// do not intersect and zero-sized rectangles intersect nothing. Collision
/// shapes in this game always have real extents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedRect {
    pub x: FixedNum,
    pub y: FixedNum,
    pub w: FixedNum,
    pub h: FixedNum,
}

impl FixedRect {
    pub fn new(x: FixedNum, y: FixedNum, w: FixedNum, h: FixedNum) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_center(center: FixedVec2, size: FixedVec2) -> Self {
        let two = FixedNum::from_num(2.0);
        Self {
            x: center.x - size.x / two,
            y: center.y - size.y / two,
            w: size.x,
            h: size.y,
        }
    }

    pub fn center(&self) -> FixedVec2 {
        let two = FixedNum::from_num(2.0);
        FixedVec2::new(self.x + self.w / two, self.y + self.h / two)
    }

    pub fn intersects(&self, other: &FixedRect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    /// The four equal quadrants in NW, NE, SW, SE order.
    pub fn quadrants(&self) -> [FixedRect; 4] {
        let two = FixedNum::from_num(2.0);
        let hw = self.w / two;
        let hh = self.h / two;
        [
            FixedRect::new(self.x, self.y, hw, hh),
            FixedRect::new(self.x + hw, self.y, hw, hh),
            FixedRect::new(self.x, self.y + hh, hw, hh),
            FixedRect::new(self.x + hw, self.y + hh, hw, hh),
        ]
    }
}
