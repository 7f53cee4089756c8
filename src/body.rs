//! Body state and the frame stepper.
//!
//! [`BoxBody`] owns everything a box carries from one frame to the next. It
//! is a plain value: create it with [`BoxBody::init`] and advance it with
//! [`step`] (or [`BoxBody::advance`] in place). No engine is required; the
//! caller supplies the delta time and a [`GeometryQuery`].
//!
//! # Example
//!
//! ```rust
//! use bevy::prelude::*;
//! use sweep_box_controller::prelude::*;
//!
//! let geometry = StaticGeometry::new().with_surface(StaticSurface::floor(-1.0, -5.0, 5.0));
//! let body = BoxBody::init(&BoxControllerConfig::default(), Vec2::ZERO).unwrap();
//!
//! let body = step(&body, &FrameInput::idle(), 0.1, &geometry);
//! assert!(body.is_grounded());
//! assert!(body.position().y > -0.5);
//! ```

use bevy::prelude::*;

use crate::backend::GeometryQuery;
use crate::config::BoxControllerConfig;
use crate::edge::{Edge, EdgeSide, Edges};
use crate::error::ConfigError;
use crate::facing::Facing;
use crate::intent::{FrameInput, MoveTimers, accumulate_intent};
use crate::sweep::resolve_collisions;

/// Persistent per-body state.
///
/// Readers (camera, debug overlay, game logic) should only look at it
/// between steps.
#[derive(Component, Reflect, Debug, Clone, PartialEq)]
#[reflect(Component)]
pub struct BoxBody {
    config: BoxControllerConfig,
    position: Vec2,
    /// Displacement committed by the last step.
    velocity: Vec2,
    /// Displacement requested by the last step before collisions.
    intent: Vec2,
    edges: Edges,
    timers: MoveTimers,
    facing: Facing,
}

impl BoxBody {
    /// Create a body at rest at `position`.
    ///
    /// The config is validated and copied; later changes to the caller's
    /// config do not affect the body.
    pub fn init(config: &BoxControllerConfig, position: Vec2) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: *config,
            position,
            velocity: Vec2::ZERO,
            intent: Vec2::ZERO,
            edges: Edges::at(position, config.half_extents, config.sample_count),
            timers: MoveTimers::default(),
            facing: Facing::default(),
        })
    }

    /// Advance the body by one frame.
    ///
    /// Runs facing, intent, collision resolution and commit in that order.
    pub fn advance(&mut self, input: &FrameInput, dt: f32, geometry: &impl GeometryQuery) {
        if let Some(facing) = input
            .aim_target
            .and_then(|target| Facing::from_aim(self.position, target))
        {
            self.facing = facing;
        }

        let was_grounded = self.is_grounded();
        let intent = accumulate_intent(&self.config, input, &mut self.timers, was_grounded, dt);
        let candidate = self.position + intent;

        let resolution = resolve_collisions(
            self.position,
            candidate,
            &self.config,
            geometry,
            &EdgeSide::RESOLUTION_ORDER,
        );

        self.velocity = resolution.position - self.position;
        self.position = resolution.position;
        self.intent = intent;
        self.edges = resolution.edges;

        match (was_grounded, self.is_grounded()) {
            (false, true) => debug!("Box landed at {:?}", self.position),
            (true, false) => debug!("Box left the ground at {:?}", self.position),
            _ => {}
        }
    }

    /// Move the body without sweeping, dropping all contact state.
    ///
    /// Timers and facing are kept.
    pub fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.intent = Vec2::ZERO;
        self.edges = Edges::at(position, self.config.half_extents, self.config.sample_count);
    }

    pub fn config(&self) -> &BoxControllerConfig {
        &self.config
    }

    /// Center of the box.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.config.half_extents
    }

    /// Displacement of the last step, after collisions.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Displacement the last step asked for, before collisions.
    #[inline]
    pub fn intent(&self) -> Vec2 {
        self.intent
    }

    /// The four edges at the current position with their contact state.
    #[inline]
    pub fn edges(&self) -> &Edges {
        &self.edges
    }

    #[inline]
    pub fn edge(&self, side: EdgeSide) -> &Edge {
        self.edges.get(side)
    }

    /// Whether the last sweep of `side` was blocked.
    #[inline]
    pub fn is_colliding(&self, side: EdgeSide) -> bool {
        self.edges.get(side).colliding
    }

    /// Whether the bottom edge is in contact; gates jumping.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.edges.bottom.colliding
    }

    #[inline]
    pub fn timers(&self) -> &MoveTimers {
        &self.timers
    }

    pub fn is_jumping(&self) -> bool {
        self.timers.jumping
    }

    pub fn is_dashing(&self) -> bool {
        self.timers.dashing
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }
}

/// Advance a copy of `state` by one frame.
pub fn step(
    state: &BoxBody,
    input: &FrameInput,
    dt: f32,
    geometry: &impl GeometryQuery,
) -> BoxBody {
    let mut next = state.clone();
    next.advance(input, dt, geometry);
    next
}
