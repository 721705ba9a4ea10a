//! Collision detection between vehicles
//!
//! Everything on the road is an axis-aligned rectangle. Hits are forgiving:
//! two boxes only collide once they overlap by more than the inset on both
//! axes, so grazing a bumper doesn't cost a life.

use glam::Vec2;

/// Axis-aligned bounding box in canvas pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box from top-left corner and size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Strict overlap test, shrinking the overlap by `inset` on each axis
    pub fn overlaps_inset(&self, other: &Aabb, inset: f32) -> bool {
        self.min.x < other.max.x - inset
            && self.max.x - inset > other.min.x
            && self.min.y < other.max.y - inset
            && self.max.y - inset > other.min.y
    }

    /// Plain strict overlap (touching edges don't count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_inset(other, 0.0)
    }
}
