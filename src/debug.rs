//! Gizmo overlay for box edges.
//!
//! Reads committed [`BoxBody`] state after the fixed step; it never affects
//! movement.

use bevy::prelude::*;

use crate::body::BoxBody;

/// Colors and toggles for the edge overlay.
#[derive(Resource, Reflect, Debug, Clone, Copy)]
#[reflect(Resource)]
pub struct BoxDebugGizmos {
    pub enabled: bool,
    /// Color of edges whose last sweep was blocked.
    pub colliding_color: Color,
    /// Color of the remaining edges; `None` hides them.
    pub free_color: Option<Color>,
    /// Radius of the markers drawn at colliding edge endpoints.
    pub endpoint_radius: f32,
}

impl Default for BoxDebugGizmos {
    fn default() -> Self {
        Self {
            enabled: true,
            colliding_color: Color::srgb(0.0, 1.0, 0.0),
            free_color: None,
            endpoint_radius: 0.05,
        }
    }
}

/// Draws colliding edges (and optionally free ones) of every [`BoxBody`].
pub struct BoxDebugGizmosPlugin;

impl Plugin for BoxDebugGizmosPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BoxDebugGizmos>();
        app.register_type::<BoxDebugGizmos>();
        app.add_systems(Update, draw_box_edges);
    }
}

fn draw_box_edges(settings: Res<BoxDebugGizmos>, q_bodies: Query<&BoxBody>, mut gizmos: Gizmos) {
    if !settings.enabled {
        return;
    }

    for body in &q_bodies {
        for edge in body.edges().iter() {
            if edge.colliding {
                gizmos.line_2d(edge.start, edge.end, settings.colliding_color);
                gizmos.circle_2d(edge.start, settings.endpoint_radius, settings.colliding_color);
                gizmos.circle_2d(edge.end, settings.endpoint_radius, settings.colliding_color);
            } else if let Some(color) = settings.free_color {
                gizmos.line_2d(edge.start, edge.end, color);
            }
        }
    }
}
