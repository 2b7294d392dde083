//! Axis-aligned overlap boxes.
//!
//! Physics bodies handle landing on platforms. Gameplay overlaps
//! (projectile hits, contact damage, pickups, the exit door) are plain
//! rectangle tests against these boxes so they resolve in the same frame
//! and in a known order.

use bevy::prelude::*;

/// Overlap box centred on the entity, optionally offset.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub half_size: Vec2,
    pub offset: Vec2,
}

impl Hitbox {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            half_size: Vec2::new(width, height) / 2.0,
            offset: Vec2::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// World-space rectangle for an entity at `position`.
    pub fn rect(&self, position: Vec2) -> Rect {
        Rect::from_center_half_size(position + self.offset, self.half_size)
    }

    /// Touching edges do not count as an overlap.
    pub fn overlaps(&self, position: Vec2, other: &Hitbox, other_position: Vec2) -> bool {
        !self.rect(position).intersect(other.rect(other_position)).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_boxes() {
        let a = Hitbox::new(32.0, 48.0);
        let b = Hitbox::new(10.0, 10.0);
        assert!(a.overlaps(Vec2::ZERO, &b, Vec2::new(18.0, 0.0)));
        assert!(!a.overlaps(Vec2::ZERO, &b, Vec2::new(30.0, 0.0)));
    }

    #[test]
    fn offset_moves_the_box() {
        let crouched = Hitbox::new(40.0, 30.0).with_offset(Vec2::new(0.0, -15.0));
        let bullet = Hitbox::new(4.0, 4.0);
        assert!(!crouched.overlaps(Vec2::ZERO, &bullet, Vec2::new(0.0, 10.0)));
        assert!(crouched.overlaps(Vec2::ZERO, &bullet, Vec2::new(0.0, -10.0)));
    }
}
