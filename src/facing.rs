//! Eight-way facing derived from an aim target.
//!
//! Purely cosmetic: nothing in collision resolution reads it.

use std::f32::consts::FRAC_PI_4;

use bevy::prelude::*;

/// Direction the body faces, in 45° steps counter-clockwise from +X.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    #[default]
    Right,
    UpRight,
    Up,
    UpLeft,
    Left,
    DownLeft,
    Down,
    DownRight,
}

impl Facing {
    const OCTANTS: [Facing; 8] = [
        Facing::Right,
        Facing::UpRight,
        Facing::Up,
        Facing::UpLeft,
        Facing::Left,
        Facing::DownLeft,
        Facing::Down,
        Facing::DownRight,
    ];

    /// Octant nearest to the direction from `position` to `target`.
    ///
    /// Returns `None` when the target coincides with the position.
    pub fn from_aim(position: Vec2, target: Vec2) -> Option<Facing> {
        Self::from_direction(target - position)
    }

    /// Octant nearest to `direction`, or `None` for a zero vector.
    pub fn from_direction(direction: Vec2) -> Option<Facing> {
        if direction == Vec2::ZERO || !direction.is_finite() {
            return None;
        }
        let angle = direction.y.atan2(direction.x);
        let octant = (angle / FRAC_PI_4).round() as i32;
        Some(Self::OCTANTS[octant.rem_euclid(8) as usize])
    }

    /// Unit vector pointing the way this facing looks.
    pub fn direction(self) -> Vec2 {
        Vec2::from_angle(self as u8 as f32 * FRAC_PI_4)
    }

    /// Whether the facing has a leftward component.
    pub fn is_left(self) -> bool {
        matches!(self, Facing::UpLeft | Facing::Left | Facing::DownLeft)
    }

    /// Whether the facing has a rightward component.
    pub fn is_right(self) -> bool {
        matches!(self, Facing::UpRight | Facing::Right | Facing::DownRight)
    }
}
