//! State marker components.
//!
//! These mirror a [`BoxBody`](crate::body::BoxBody)'s contact flags as ECS
//! components so game code can filter queries on them. They are added and
//! removed after every step by
//! [`sync_state_markers`](crate::systems::sync_state_markers).

use bevy::prelude::*;

use crate::edge::EdgeSide;

/// Marker component indicating the bottom edge is in contact.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use sweep_box_controller::prelude::*;
///
/// fn grounded_boxes(q: Query<&BoxBody, With<Grounded>>) -> usize {
///     q.iter().count()
/// }
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the bottom edge is free.
///
/// Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;

/// The left or right edge is in contact.
///
/// When both sides touch, the left side is reported.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct TouchingWall {
    /// Which side touches the wall ([`EdgeSide::Left`] or [`EdgeSide::Right`]).
    pub side: EdgeSide,
    /// Normal of the wall surface.
    pub normal: Vec2,
}

impl Default for TouchingWall {
    fn default() -> Self {
        Self {
            side: EdgeSide::Right,
            normal: Vec2::NEG_X,
        }
    }
}

impl TouchingWall {
    pub fn new(side: EdgeSide, normal: Vec2) -> Self {
        Self { side, normal }
    }

    pub fn is_left(&self) -> bool {
        self.side == EdgeSide::Left
    }

    pub fn is_right(&self) -> bool {
        self.side == EdgeSide::Right
    }
}

/// The top edge is in contact.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct TouchingCeiling {
    /// Normal of the ceiling surface.
    pub normal: Vec2,
}

impl Default for TouchingCeiling {
    fn default() -> Self {
        Self { normal: Vec2::NEG_Y }
    }
}

impl TouchingCeiling {
    pub fn new(normal: Vec2) -> Self {
        Self { normal }
    }
}
