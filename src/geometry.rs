//! In-memory static geometry.
//!
//! [`StaticGeometry`] is a flat list of one-sided line segments. It answers
//! ray casts without any physics engine, which makes it the backend of choice
//! for tests, tools and simple tile-free levels.

use bevy::prelude::*;

use crate::BoxControllerSet;
use crate::backend::{BoxPhysicsBackend, GeometryQuery};
use crate::collision::{CollisionData, CollisionMask};
use crate::systems::{BodyQuery, fixed_delta, step_bodies};

/// Parallel rays closer than this (in `perp_dot` terms) never hit a segment.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A one-sided blocking surface.
///
/// The `normal` is the side the surface faces. Rays report the surface from
/// either side; the resolver ignores hits whose normal does not oppose the
/// motion.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct StaticSurface {
    pub start: Vec2,
    pub end: Vec2,
    /// Outward unit normal.
    pub normal: Vec2,
    /// Layers this surface belongs to.
    pub layers: CollisionMask,
}

impl StaticSurface {
    /// Create a surface on the default layer.
    ///
    /// The normal is normalized; pass the side the surface should face. It
    /// must be non-zero and finite: a surface without a normal opposes no
    /// motion and would never block anything.
    pub fn new(start: Vec2, end: Vec2, normal: Vec2) -> Self {
        debug_assert!(
            normal.is_finite() && normal != Vec2::ZERO,
            "surface normal must be non-zero and finite, got {normal}"
        );
        Self {
            start,
            end,
            normal: normal.normalize_or_zero(),
            layers: CollisionMask::DEFAULT,
        }
    }

    /// Horizontal surface at height `y` spanning `x_min..=x_max`, facing up.
    pub fn floor(y: f32, x_min: f32, x_max: f32) -> Self {
        Self::new(Vec2::new(x_min, y), Vec2::new(x_max, y), Vec2::Y)
    }

    /// Horizontal surface at height `y` spanning `x_min..=x_max`, facing down.
    pub fn ceiling(y: f32, x_min: f32, x_max: f32) -> Self {
        Self::new(Vec2::new(x_min, y), Vec2::new(x_max, y), Vec2::NEG_Y)
    }

    /// Vertical surface at `x` spanning `y_min..=y_max`, facing +X.
    pub fn wall_facing_right(x: f32, y_min: f32, y_max: f32) -> Self {
        Self::new(Vec2::new(x, y_min), Vec2::new(x, y_max), Vec2::X)
    }

    /// Vertical surface at `x` spanning `y_min..=y_max`, facing -X.
    pub fn wall_facing_left(x: f32, y_min: f32, y_max: f32) -> Self {
        Self::new(Vec2::new(x, y_min), Vec2::new(x, y_max), Vec2::NEG_X)
    }

    /// Builder: move the surface to other layers.
    pub fn on_layers(mut self, layers: CollisionMask) -> Self {
        self.layers = layers;
        self
    }

    /// Intersect a ray with this segment.
    ///
    /// Returns the distance along the ray, or `None` when the ray is parallel
    /// to the segment, misses it, or would need more than `max_distance`.
    pub fn intersect(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<f32> {
        let segment = self.end - self.start;
        let denom = direction.perp_dot(segment);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let offset = self.start - origin;
        let distance = offset.perp_dot(segment) / denom;
        let along = offset.perp_dot(direction) / denom;

        if (0.0..=1.0).contains(&along) && (0.0..=max_distance).contains(&distance) {
            Some(distance)
        } else {
            None
        }
    }
}

/// A set of static surfaces that can be ray cast.
///
/// Also usable as an ECS resource together with [`StaticGeometryBackend`].
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use sweep_box_controller::prelude::*;
///
/// let geometry = StaticGeometry::new()
///     .with_surface(StaticSurface::floor(-1.0, -5.0, 5.0))
///     .with_solid_box(Vec2::new(3.0, 0.0), Vec2::splat(0.5));
///
/// let hit = geometry
///     .raycast(Vec2::ZERO, Vec2::NEG_Y, 10.0, CollisionMask::ALL)
///     .unwrap();
/// assert_eq!(hit.distance, 1.0);
/// assert_eq!(hit.normal, Vec2::Y);
/// ```
#[derive(Resource, Reflect, Debug, Clone, Default)]
#[reflect(Resource)]
pub struct StaticGeometry {
    surfaces: Vec<StaticSurface>,
}

impl StaticGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a surface.
    pub fn push(&mut self, surface: StaticSurface) {
        self.surfaces.push(surface);
    }

    /// Builder: add a surface.
    pub fn with_surface(mut self, surface: StaticSurface) -> Self {
        self.push(surface);
        self
    }

    /// Add the four outward-facing sides of a solid axis-aligned box.
    pub fn push_solid_box(&mut self, center: Vec2, half_extents: Vec2) {
        let min = center - half_extents;
        let max = center + half_extents;
        self.push(StaticSurface::floor(max.y, min.x, max.x));
        self.push(StaticSurface::ceiling(min.y, min.x, max.x));
        self.push(StaticSurface::wall_facing_left(min.x, min.y, max.y));
        self.push(StaticSurface::wall_facing_right(max.x, min.y, max.y));
    }

    /// Builder: add a solid axis-aligned box.
    pub fn with_solid_box(mut self, center: Vec2, half_extents: Vec2) -> Self {
        self.push_solid_box(center, half_extents);
        self
    }

    /// Remove all surfaces.
    pub fn clear(&mut self) {
        self.surfaces.clear();
    }

    pub fn surfaces(&self) -> &[StaticSurface] {
        &self.surfaces
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Borrow this geometry as a [`GeometryQuery`] value.
    pub fn as_query(&self) -> impl GeometryQuery + '_ {
        move |origin: Vec2, direction: Vec2, max_distance: f32, mask: CollisionMask| {
            self.raycast(origin, direction, max_distance, mask)
        }
    }
}

impl GeometryQuery for StaticGeometry {
    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<CollisionData> {
        let mut nearest: Option<CollisionData> = None;
        for surface in self.surfaces.iter().filter(|s| s.layers.intersects(mask)) {
            let Some(distance) = surface.intersect(origin, direction, max_distance) else {
                continue;
            };
            if nearest.is_none_or(|hit| distance < hit.distance) {
                nearest = Some(CollisionData::new(
                    distance,
                    surface.normal,
                    origin + direction * distance,
                    None,
                ));
            }
        }
        nearest
    }
}

/// Backend that steps bodies against the [`StaticGeometry`] resource.
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use sweep_box_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .insert_resource(StaticGeometry::new().with_surface(StaticSurface::floor(0.0, -10.0, 10.0)))
///     .add_plugins(BoxControllerPlugin::<StaticGeometryBackend>::default())
///     .run();
/// ```
pub struct StaticGeometryBackend;

impl BoxPhysicsBackend for StaticGeometryBackend {
    fn plugin() -> impl Plugin {
        StaticGeometryBackendPlugin
    }
}

/// Plugin that installs the static-geometry stepping system.
pub struct StaticGeometryBackendPlugin;

impl Plugin for StaticGeometryBackendPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StaticGeometry>();
        app.register_type::<StaticGeometry>();
        app.add_systems(
            FixedUpdate,
            step_against_static_geometry.in_set(BoxControllerSet::Step),
        );
    }
}

fn step_against_static_geometry(
    geometry: Res<StaticGeometry>,
    time: Res<Time<Fixed>>,
    mut q_bodies: BodyQuery,
) {
    let dt = fixed_delta(&time);
    step_bodies(|_| geometry.as_query(), dt, &mut q_bodies);
}
