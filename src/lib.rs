//! # `sweep_box_controller`
//!
//! A 2D axis-aligned box character controller that resolves collisions with
//! per-edge ray sweeps.
//!
//! This crate provides a deterministic, frame-stepped box mover that:
//! - Accumulates gravity, directional input, jumps and dashes into one
//!   desired displacement per frame
//! - Sweeps each edge of the box with parallel rays toward the desired
//!   position and pushes it back out of anything it would pass through
//! - Reports which sides are in contact (bottom contact gates jumping)
//! - Abstracts the ray-cast source, with an in-memory geometry set and a
//!   Rapier2D backend included
//!
//! ## Architecture
//!
//! Every frame runs the same fixed sequence:
//! 1. Facing is updated from the aim target
//! 2. The intent accumulator produces the desired displacement
//! 3. Edges are resolved in the order bottom, left, right, top; each
//!    correction moves the candidate position before the next edge sweeps
//! 4. The final position is committed and velocity becomes the committed
//!    displacement
//!
//! The core is plain data plus two functions, [`BoxBody::init`](body::BoxBody::init)
//! and [`step`](body::step), so it runs without an ECS. [`BoxControllerPlugin`]
//! wraps it for Bevy apps.
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use sweep_box_controller::prelude::*;
//!
//! let geometry = StaticGeometry::new().with_surface(StaticSurface::floor(-1.0, -5.0, 5.0));
//! let mut body = BoxBody::init(&BoxControllerConfig::player(), Vec2::ZERO).unwrap();
//!
//! for _ in 0..10 {
//!     body.advance(&FrameInput::holding(Actions::MOVE_RIGHT), 1.0 / 60.0, &geometry);
//! }
//! assert!(body.is_grounded());
//! assert!(body.position().x > 0.0);
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod body;
pub mod collision;
pub mod config;
pub mod debug;
pub mod edge;
pub mod error;
pub mod facing;
pub mod geometry;
pub mod intent;
pub mod state;
pub mod sweep;
pub mod systems;

#[cfg(feature = "rapier2d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::{BoxPhysicsBackend, GeometryQuery, RaycastRequest};
    pub use crate::body::{BoxBody, step};
    pub use crate::collision::{CollisionData, CollisionMask};
    pub use crate::config::BoxControllerConfig;
    pub use crate::debug::{BoxDebugGizmos, BoxDebugGizmosPlugin};
    pub use crate::edge::{Edge, EdgeSide, Edges};
    pub use crate::error::{ConfigError, ConfigLoadError};
    pub use crate::facing::Facing;
    pub use crate::geometry::{StaticGeometry, StaticGeometryBackend, StaticSurface};
    pub use crate::intent::{Actions, BoxInput, FrameInput};
    pub use crate::state::{Airborne, Grounded, TouchingCeiling, TouchingWall};
    pub use crate::systems::ConfigRejected;
    pub use crate::{BoxControllerPlugin, BoxControllerSet};

    #[cfg(feature = "rapier2d")]
    pub use crate::rapier::{Rapier2dBackend, Rapier2dBoxBundle};
}

/// System sets for the box controller, chained in `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxControllerSet {
    /// Bodies are created for newly configured entities.
    Preparation,
    /// The backend steps every body.
    Step,
    /// Marker components and input latches are updated.
    Finalization,
}

/// Main plugin for the box controller.
///
/// This plugin is generic over a physics backend `B` which supplies the
/// geometry every body sweeps against.
///
/// # Type Parameters
/// - `B`: The physics backend implementation (e.g., `Rapier2dBackend`)
///
/// # Examples
///
/// With the in-memory backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use sweep_box_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .insert_resource(StaticGeometry::new().with_solid_box(Vec2::new(0.0, -2.0), Vec2::new(10.0, 0.5)))
///     .add_plugins(BoxControllerPlugin::<StaticGeometryBackend>::default())
///     .add_systems(Startup, |mut commands: Commands| {
///         commands.spawn((
///             Transform::default(),
///             BoxControllerConfig::default(),
///             BoxInput::default(),
///         ));
///     })
///     .run();
/// ```
pub struct BoxControllerPlugin<B: backend::BoxPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::BoxPhysicsBackend> Default for BoxControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::BoxPhysicsBackend> Plugin for BoxControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::BoxControllerConfig>();
        app.register_type::<body::BoxBody>();
        app.register_type::<intent::BoxInput>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();
        app.register_type::<state::TouchingWall>();
        app.register_type::<state::TouchingCeiling>();
        app.register_type::<systems::ConfigRejected>();

        app.configure_sets(
            FixedUpdate,
            (
                BoxControllerSet::Preparation,
                BoxControllerSet::Step,
                BoxControllerSet::Finalization,
            )
                .chain(),
        );

        // The backend adds its stepping system to `BoxControllerSet::Step`
        app.add_plugins(B::plugin());

        app.add_systems(
            FixedUpdate,
            systems::init_box_bodies.in_set(BoxControllerSet::Preparation),
        );
        app.add_systems(
            FixedUpdate,
            (systems::sync_state_markers, systems::latch_inputs)
                .chain()
                .in_set(BoxControllerSet::Finalization),
        );
    }
}
