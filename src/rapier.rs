//! Rapier2D physics backend implementation.
//!
//! Bodies sweep against every Rapier collider through ray casts. The box
//! itself is a kinematic position-based body: Rapier sees where it is, but
//! the controller alone decides where it goes. Enable with the `rapier2d`
//! feature.

use bevy::prelude::*;
use bevy_rapier2d::geometry::Group;
use bevy_rapier2d::prelude::*;

use crate::BoxControllerSet;
use crate::backend::{BoxPhysicsBackend, GeometryQuery};
use crate::collision::{CollisionData, CollisionMask};
use crate::config::BoxControllerConfig;
use crate::systems::{BodyQuery, fixed_delta, step_bodies};

/// Rapier2D physics backend for the box controller.
///
/// # Example
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use sweep_box_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(BoxControllerPlugin::<Rapier2dBackend>::default())
///     .run();
/// ```
pub struct Rapier2dBackend;

impl BoxPhysicsBackend for Rapier2dBackend {
    fn plugin() -> impl Plugin {
        Rapier2dBackendPlugin
    }
}

/// Plugin that sets up the Rapier2D stepping system.
pub struct Rapier2dBackendPlugin;

impl Plugin for Rapier2dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            rapier_step_bodies.in_set(BoxControllerSet::Step),
        );
    }
}

/// Collision groups for a query that only reports colliders on `mask`.
pub fn mask_to_groups(mask: CollisionMask) -> CollisionGroups {
    CollisionGroups::new(Group::ALL, Group::from_bits_truncate(mask.bits()))
}

/// [`GeometryQuery`] over a Rapier context that ignores one entity.
///
/// The ignored entity is normally the body being stepped, so its own
/// collider never blocks it.
pub struct RapierGeometry<'c, 'w> {
    context: &'c RapierContext<'w>,
    exclude: Entity,
}

impl<'c, 'w> RapierGeometry<'c, 'w> {
    pub fn new(context: &'c RapierContext<'w>, exclude: Entity) -> Self {
        Self { context, exclude }
    }
}

impl GeometryQuery for RapierGeometry<'_, '_> {
    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<CollisionData> {
        let filter = QueryFilter::default()
            .exclude_rigid_body(self.exclude)
            .exclude_collider(self.exclude)
            .exclude_sensors()
            .groups(mask_to_groups(mask));

        self.context
            .cast_ray_and_get_normal(origin, direction, max_distance, true, filter)
            .map(|(hit_entity, hit)| {
                CollisionData::new(hit.time_of_impact, hit.normal, hit.point, Some(hit_entity))
            })
    }
}

fn rapier_step_bodies(
    rapier_context: ReadRapierContext,
    time: Res<Time<Fixed>>,
    mut q_bodies: BodyQuery,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    let dt = fixed_delta(&time);
    step_bodies(
        |entity| RapierGeometry::new(&context, entity),
        dt,
        &mut q_bodies,
    );
}

/// Physics components for a box body.
///
/// A kinematic position-based rigid body with a cuboid collider matching the
/// configured half extents. Other dynamic bodies collide with it; it is
/// moved only by the controller.
///
/// # Example
///
/// ```ignore
/// let config = BoxControllerConfig::player();
/// commands.spawn((
///     Transform::from_xyz(0.0, 2.0, 0.0),
///     config,
///     BoxInput::default(),
///     Rapier2dBoxBundle::new(&config),
/// ));
/// ```
#[derive(Bundle)]
pub struct Rapier2dBoxBundle {
    /// Always [`RigidBody::KinematicPositionBased`].
    pub rigid_body: RigidBody,
    /// Cuboid with the box's half extents.
    pub collider: Collider,
}

impl Rapier2dBoxBundle {
    pub fn new(config: &BoxControllerConfig) -> Self {
        Self {
            rigid_body: RigidBody::KinematicPositionBased,
            collider: Collider::cuboid(config.half_extents.x, config.half_extents.y),
        }
    }
}
