//! Ray hit data shared by every geometry backend.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Information about a single ray hit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionData {
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// Outward normal of the surface at the hit point.
    pub normal: Vec2,
    /// World position of the hit point.
    pub point: Vec2,
    /// Entity that was hit, when the backend knows it.
    pub entity: Option<Entity>,
}

impl CollisionData {
    /// Create a collision result.
    pub fn new(distance: f32, normal: Vec2, point: Vec2, entity: Option<Entity>) -> Self {
        Self {
            distance,
            normal,
            point,
            entity,
        }
    }

    /// Whether the surface faces against a ray travelling in `direction`.
    ///
    /// Only such surfaces block movement.
    #[inline]
    pub fn opposes(&self, direction: Vec2) -> bool {
        self.normal.dot(direction) < 0.0
    }
}

/// Set of geometry layers, one bit per layer.
///
/// A ray cast with a mask only reports surfaces sharing at least one layer bit.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollisionMask(pub u32);

impl CollisionMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);
    /// Layer 0, the default blocking layer.
    pub const DEFAULT: Self = Self(1);

    /// Mask with a single layer set.
    pub const fn layer(index: u32) -> Self {
        Self(1 << index)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for CollisionMask {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_data_new() {
        let hit = CollisionData::new(5.0, Vec2::Y, Vec2::new(10.0, 0.0), None);

        assert_eq!(hit.distance, 5.0);
        assert_eq!(hit.normal, Vec2::Y);
        assert_eq!(hit.point, Vec2::new(10.0, 0.0));
        assert!(hit.entity.is_none());
    }

    #[test]
    fn collision_data_with_entity() {
        let entity = Entity::from_raw(42);
        let hit = CollisionData::new(3.0, Vec2::X, Vec2::ZERO, Some(entity));

        assert_eq!(hit.entity, Some(entity));
    }

    #[test]
    fn floor_opposes_falling_but_not_rising() {
        let floor = CollisionData::new(1.0, Vec2::Y, Vec2::ZERO, None);
        assert!(floor.opposes(Vec2::NEG_Y));
        assert!(floor.opposes(Vec2::new(1.0, -1.0).normalize()));
        assert!(!floor.opposes(Vec2::Y));
        // Grazing motion along the surface is not blocked
        assert!(!floor.opposes(Vec2::X));
    }

    #[test]
    fn mask_intersection() {
        let ground = CollisionMask::layer(0);
        let water = CollisionMask::layer(3);

        assert_eq!(ground, CollisionMask::DEFAULT);
        assert!(ground.intersects(CollisionMask::ALL));
        assert!(!ground.intersects(water));
        assert!(ground.union(water).intersects(water));
        assert!(!CollisionMask::NONE.intersects(CollisionMask::ALL));
    }
}
