//! Core controller systems.
//!
//! Backend-independent ECS glue: creating bodies from configs, stepping them
//! with a per-entity geometry query, and mirroring their contact state into
//! marker components.

use bevy::prelude::*;

use crate::backend::GeometryQuery;
use crate::body::BoxBody;
use crate::config::BoxControllerConfig;
use crate::edge::EdgeSide;
use crate::error::ConfigError;
use crate::intent::BoxInput;
use crate::state::{Airborne, Grounded, TouchingCeiling, TouchingWall};

/// Fallback step length when the fixed clock has not ticked yet.
const DEFAULT_TIMESTEP: f32 = 1.0 / 60.0;

/// Query shape shared by every backend's stepping system.
pub type BodyQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static mut BoxBody,
        Option<&'static BoxInput>,
        &'static mut Transform,
    ),
>;

/// Marker for entities whose [`BoxControllerConfig`] failed validation.
///
/// Such entities never get a [`BoxBody`] and are never stepped. Remove the
/// marker after fixing the config to try again.
#[derive(Component, Reflect, Debug, Clone, PartialEq)]
#[reflect(Component)]
pub struct ConfigRejected {
    /// Human-readable validation failure.
    pub reason: String,
}

impl ConfigRejected {
    pub fn new(error: &ConfigError) -> Self {
        Self {
            reason: error.to_string(),
        }
    }
}

/// Length of the current fixed step in seconds.
pub fn fixed_delta(time: &Time<Fixed>) -> f32 {
    Some(time.delta_secs())
        .filter(|&dt| dt > 0.0)
        .unwrap_or(DEFAULT_TIMESTEP)
}

/// Create a [`BoxBody`] for every configured entity that lacks one.
///
/// The body starts at the entity's translation.
pub fn init_box_bodies(
    mut commands: Commands,
    q_new: Query<
        (Entity, &BoxControllerConfig, &Transform),
        (Without<BoxBody>, Without<ConfigRejected>),
    >,
) {
    for (entity, config, transform) in &q_new {
        match BoxBody::init(config, transform.translation.xy()) {
            Ok(body) => {
                commands.entity(entity).insert(body);
            }
            Err(err) => {
                error!("Box controller on {entity} not started: {err}");
                commands.entity(entity).insert(ConfigRejected::new(&err));
            }
        }
    }
}

/// Step every body once and write its position back into the `Transform`.
///
/// `geometry_for` builds the query each body sweeps against, which lets
/// backends exclude the body's own collider.
pub fn step_bodies<G: GeometryQuery>(
    mut geometry_for: impl FnMut(Entity) -> G,
    dt: f32,
    q_bodies: &mut BodyQuery,
) {
    for (entity, mut body, input, mut transform) in q_bodies.iter_mut() {
        let frame = input.map(BoxInput::frame).unwrap_or_default();
        let geometry = geometry_for(entity);
        body.advance(&frame, dt, &geometry);

        let position = body.position();
        transform.translation.x = position.x;
        transform.translation.y = position.y;
    }
}

/// Sync state marker components from the bodies' contact flags.
pub fn sync_state_markers(
    mut commands: Commands,
    q_bodies: Query<(
        Entity,
        &BoxBody,
        Has<Grounded>,
        Has<Airborne>,
        Has<TouchingWall>,
        Has<TouchingCeiling>,
    )>,
) {
    for (entity, body, has_grounded, has_airborne, has_wall, has_ceiling) in &q_bodies {
        let mut entity_commands = commands.entity(entity);

        // Grounded/Airborne
        if body.is_grounded() && !has_grounded {
            entity_commands.insert(Grounded).remove::<Airborne>();
        } else if !body.is_grounded() && !has_airborne {
            entity_commands.insert(Airborne).remove::<Grounded>();
        }

        // TouchingWall
        let wall = [EdgeSide::Left, EdgeSide::Right]
            .into_iter()
            .find(|&side| body.is_colliding(side));
        match wall {
            Some(side) => {
                let normal = body
                    .edge(side)
                    .contact
                    .map(|contact| contact.normal)
                    .unwrap_or(-side.outward());
                entity_commands.insert(TouchingWall::new(side, normal));
            }
            None if has_wall => {
                entity_commands.remove::<TouchingWall>();
            }
            None => {}
        }

        // TouchingCeiling
        match body.edges().top.contact {
            Some(contact) if body.is_colliding(EdgeSide::Top) => {
                entity_commands.insert(TouchingCeiling::new(contact.normal));
            }
            _ if has_ceiling => {
                entity_commands.remove::<TouchingCeiling>();
            }
            _ => {}
        }
    }
}

/// Remember held actions so the next step can detect key-down edges.
pub fn latch_inputs(mut q_inputs: Query<&mut BoxInput>) {
    for mut input in &mut q_inputs {
        input.latch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fixed_delta_falls_back_before_first_tick() {
        let time = Time::<Fixed>::from_hz(30.0);
        assert_eq!(fixed_delta(&time), DEFAULT_TIMESTEP);
    }

    #[test]
    fn fixed_delta_uses_elapsed_step() {
        let mut time = Time::<Fixed>::from_hz(30.0);
        time.advance_by(Duration::from_millis(50));
        assert!((fixed_delta(&time) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn rejected_marker_keeps_error_text() {
        let marker = ConfigRejected::new(&ConfigError::TooFewSamples(1));
        assert_eq!(marker.reason, ConfigError::TooFewSamples(1).to_string());
    }
}
