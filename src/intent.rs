//! Movement intent.
//!
//! Input comes in as logical actions (held / pressed this frame). The intent
//! accumulator turns those, plus the jump and dash timers, into the
//! displacement the body wants to make this frame before collisions are
//! resolved.

use bevy::prelude::*;
use crate::config::BoxControllerConfig;

bitflags::bitflags! {
    /// Logical input actions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Actions: u8 {
        const MOVE_LEFT  = 1 << 0;
        const MOVE_RIGHT = 1 << 1;
        const MOVE_UP    = 1 << 2;
        const MOVE_DOWN  = 1 << 3;
        const JUMP       = 1 << 4;
        const DASH       = 1 << 5;
    }
}

/// Input for a single frame step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// Actions held this frame.
    pub held: Actions,
    /// Actions that went down this frame.
    pub pressed: Actions,
    /// World-space point the body should face, if any.
    pub aim_target: Option<Vec2>,
}

impl FrameInput {
    /// Input with nothing held.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Input holding `actions`, none of them newly pressed.
    pub fn holding(actions: Actions) -> Self {
        Self {
            held: actions,
            ..default()
        }
    }

    /// Input where `actions` went down this frame (and are therefore held).
    pub fn pressing(actions: Actions) -> Self {
        Self {
            held: actions,
            pressed: actions,
            aim_target: None,
        }
    }

    /// Builder: also hold `actions`.
    pub fn and_holding(mut self, actions: Actions) -> Self {
        self.held |= actions;
        self
    }

    /// Builder: aim at a world-space point.
    pub fn aiming_at(mut self, target: Vec2) -> Self {
        self.aim_target = Some(target);
        self
    }

    #[inline]
    pub fn is_held(&self, action: Actions) -> bool {
        self.held.contains(action)
    }

    #[inline]
    pub fn is_pressed(&self, action: Actions) -> bool {
        self.pressed.contains(action)
    }
}

/// Input component for ECS-driven bodies.
///
/// Your code only reports which actions are held; the controller detects
/// key-down edges by comparing with the previous step.
///
/// # Example
///
/// ```rust,ignore
/// // From keyboard:
/// input.set_held(Actions::JUMP, keyboard.pressed(KeyCode::Space));
///
/// // From AI:
/// input.set_held(Actions::MOVE_RIGHT, ai.wants_to_walk_right());
/// ```
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct BoxInput {
    #[reflect(ignore)]
    held: Actions,
    /// Held actions as of the last completed step.
    #[reflect(ignore)]
    pub(crate) previous: Actions,
    /// World-space aim target.
    pub aim_target: Option<Vec2>,
}

impl BoxInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether an action is held.
    pub fn set_held(&mut self, action: Actions, held: bool) {
        self.held.set(action, held);
    }

    /// Replace the whole held set.
    pub fn set_all_held(&mut self, actions: Actions) {
        self.held = actions;
    }

    /// Set the world-space aim target.
    pub fn set_aim_target(&mut self, target: Option<Vec2>) {
        self.aim_target = target;
    }

    /// Release everything.
    pub fn clear(&mut self) {
        self.held = Actions::empty();
    }

    pub fn held(&self) -> Actions {
        self.held
    }

    pub fn is_held(&self, action: Actions) -> bool {
        self.held.contains(action)
    }

    /// Snapshot for the next step, with key-down edges derived from the
    /// previous step.
    pub fn frame(&self) -> FrameInput {
        FrameInput {
            held: self.held,
            pressed: self.held.difference(self.previous),
            aim_target: self.aim_target,
        }
    }

    /// Remember the current held set; called once after each step.
    pub fn latch(&mut self) {
        self.previous = self.held;
    }
}

/// Jump and dash state carried across frames.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveTimers {
    pub jumping: bool,
    /// Seconds since the jump started.
    pub jump_elapsed: f32,
    pub dashing: bool,
    /// Seconds since the dash started.
    pub dash_elapsed: f32,
}

impl MoveTimers {
    /// Whether a special move currently overrides gravity.
    #[inline]
    pub fn overrides_gravity(&self) -> bool {
        self.jumping || self.dashing
    }
}

/// Jump speed factor after `elapsed` seconds of a jump lasting `duration`.
///
/// `(1 - elapsed / duration) ^ exponent`, clamped to `0..=1`: exactly 1 at
/// take-off and 0 once the duration has elapsed.
pub fn jump_curve(elapsed: f32, duration: f32, exponent: f32) -> f32 {
    let remaining = (1.0 - elapsed / duration).clamp(0.0, 1.0);
    remaining.powf(exponent)
}

/// Build this frame's desired displacement and advance the jump/dash timers.
///
/// Special moves are updated first so that gravity is suppressed on the very
/// frame a jump or dash starts. Contributions are summed in order gravity,
/// jump, dash, directional movement. Simultaneous direction keys add up,
/// so diagonal movement is faster than straight movement.
///
/// `grounded` is the bottom edge's contact flag from the previous step.
pub fn accumulate_intent(
    config: &BoxControllerConfig,
    input: &FrameInput,
    timers: &mut MoveTimers,
    grounded: bool,
    dt: f32,
) -> Vec2 {
    update_dash(config, input, timers, dt);
    update_jump(config, input, timers, grounded, dt);

    let mut displacement = Vec2::ZERO;

    // Gravity
    if !timers.overrides_gravity() {
        let floating = config.hold_to_float && input.is_held(Actions::JUMP);
        let direction = if floating { Vec2::Y } else { Vec2::NEG_Y };
        displacement += config.fall_speed * dt * direction;
    }

    // Jump
    if timers.jumping {
        let factor = jump_curve(
            timers.jump_elapsed,
            config.jump_duration,
            config.jump_speed_curve,
        );
        displacement += config.fall_speed * factor * dt * Vec2::Y;
    }

    // Dash
    if timers.dashing {
        displacement += config.dash_speed * dt * horizontal_direction(input);
    }

    // Directional movement
    displacement += config.move_speed * dt * held_direction(input);

    displacement
}

/// Start, advance or end the dash.
fn update_dash(config: &BoxControllerConfig, input: &FrameInput, timers: &mut MoveTimers, dt: f32) {
    if input.is_pressed(Actions::DASH) {
        timers.dashing = true;
        timers.dash_elapsed = 0.0;
        debug!("Dash started");
    } else if timers.dashing {
        timers.dash_elapsed += dt;
    }

    if timers.dash_elapsed > config.dash_duration {
        timers.dashing = false;
    }
}

/// Start, advance or end the jump.
fn update_jump(
    config: &BoxControllerConfig,
    input: &FrameInput,
    timers: &mut MoveTimers,
    grounded: bool,
    dt: f32,
) {
    if grounded && input.is_pressed(Actions::JUMP) {
        timers.jumping = true;
        timers.jump_elapsed = 0.0;
        debug!("Jump started");
    } else if timers.jumping {
        timers.jump_elapsed += dt;
    }

    if timers.jump_elapsed > config.jump_duration || !input.is_held(Actions::JUMP) {
        timers.jumping = false;
    }
}

/// Sum of the held horizontal directions (-1, 0 or 1 on X).
fn horizontal_direction(input: &FrameInput) -> Vec2 {
    let mut direction = Vec2::ZERO;
    if input.is_held(Actions::MOVE_LEFT) {
        direction += Vec2::NEG_X;
    }
    if input.is_held(Actions::MOVE_RIGHT) {
        direction += Vec2::X;
    }
    direction
}

/// Sum of all held direction keys, not normalized.
fn held_direction(input: &FrameInput) -> Vec2 {
    let mut direction = horizontal_direction(input);
    if input.is_held(Actions::MOVE_UP) {
        direction += Vec2::Y;
    }
    if input.is_held(Actions::MOVE_DOWN) {
        direction += Vec2::NEG_Y;
    }
    direction
}
