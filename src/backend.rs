//! Physics backend abstraction.
//!
//! The controller never talks to a physics engine directly. It needs exactly
//! one query, "what is the nearest surface along this ray", expressed by
//! [`GeometryQuery`]. ECS integrations additionally implement
//! [`BoxPhysicsBackend`] to install the system that steps bodies against
//! their engine.

use bevy::prelude::*;

use crate::collision::{CollisionData, CollisionMask};

/// Synchronous ray-cast query against blocking geometry.
///
/// Implementations must answer within the call: there are no pending or
/// cross-frame queries.
///
/// # Example
///
/// Any closure with the right signature is a geometry query, which is
/// handy for one-off tests:
///
/// ```rust
/// use bevy::prelude::*;
/// use sweep_box_controller::prelude::*;
///
/// // A floor at y = 0 that blocks everything
/// let floor = |origin: Vec2, direction: Vec2, max_distance: f32, _mask: CollisionMask| {
///     if direction.y >= 0.0 {
///         return None;
///     }
///     let distance = origin.y / -direction.y;
///     (distance >= 0.0 && distance <= max_distance).then(|| {
///         CollisionData::new(distance, Vec2::Y, origin + direction * distance, None)
///     })
/// };
///
/// let hit = floor.raycast(Vec2::new(0.0, 2.0), Vec2::NEG_Y, 5.0, CollisionMask::ALL);
/// assert_eq!(hit.map(|h| h.distance), Some(2.0));
/// ```
pub trait GeometryQuery {
    /// Cast a ray and return the nearest hit, if any.
    ///
    /// # Arguments
    /// * `origin` - Ray origin in world space
    /// * `direction` - Ray direction (normalized)
    /// * `max_distance` - Maximum cast distance
    /// * `mask` - Only surfaces on these layers are reported
    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<CollisionData>;
}

impl<F> GeometryQuery for F
where
    F: Fn(Vec2, Vec2, f32, CollisionMask) -> Option<CollisionData>,
{
    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<CollisionData> {
        self(origin, direction, max_distance, mask)
    }
}

/// Trait for ECS physics backend implementations.
///
/// A backend contributes a plugin that adds a system to
/// [`BoxControllerSet::Step`](crate::BoxControllerSet::Step). That system
/// builds a [`GeometryQuery`] for each body (usually excluding the body's
/// own collider) and hands it to
/// [`systems::step_bodies`](crate::systems::step_bodies).
///
/// See [`StaticGeometryBackend`](crate::geometry::StaticGeometryBackend) for
/// the smallest possible implementation and `Rapier2dBackend` for a real
/// physics engine.
pub trait BoxPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;
}

/// Helper struct for building raycasts.
#[derive(Debug, Clone, Copy)]
pub struct RaycastRequest {
    /// Origin point of the ray.
    pub origin: Vec2,
    /// Direction of the ray (normalized on construction).
    pub direction: Vec2,
    /// Maximum distance to cast.
    pub max_distance: f32,
    /// Layers the ray may hit.
    pub mask: CollisionMask,
}

impl RaycastRequest {
    /// Create a new raycast request against all layers.
    pub fn new(origin: Vec2, direction: Vec2, max_distance: f32) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            max_distance,
            mask: CollisionMask::ALL,
        }
    }

    /// Restrict the raycast to the given layers.
    pub fn with_mask(mut self, mask: CollisionMask) -> Self {
        self.mask = mask;
        self
    }

    /// Run the request against a geometry query.
    pub fn cast(&self, geometry: &impl GeometryQuery) -> Option<CollisionData> {
        geometry.raycast(self.origin, self.direction, self.max_distance, self.mask)
    }
}
