//! Collision resolution by edge sweeps.
//!
//! Each edge of the box is swept from where it is now to where the candidate
//! position would put it. Rays are cast from evenly spaced points along the
//! current edge. The nearest surface that faces against both the motion and
//! the edge's own side blocks the edge and pushes the candidate back out along
//! the surface normal. A wall can therefore never block the bottom edge, so
//! bottom contact always means ground.

use bevy::prelude::*;

use crate::backend::GeometryQuery;
use crate::collision::CollisionData;
use crate::config::BoxControllerConfig;
use crate::edge::{Edge, EdgeSide, Edges};

/// Outcome of sweeping one edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeSweep {
    /// Nearest blocking hit, if any.
    pub hit: Option<CollisionData>,
    /// Displacement to add to the candidate position.
    pub correction: Vec2,
}

impl EdgeSweep {
    /// Whether the edge was blocked.
    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.hit.is_some()
    }
}

/// Outcome of resolving all four edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Candidate position after every correction.
    pub position: Vec2,
    /// Edges at the resolved position carrying this frame's contact state.
    pub edges: Edges,
}

/// Sweep one edge from `current` to `candidate`.
///
/// Both edges must be the same side of the same box. A zero-length sweep
/// never collides. Hits on surfaces that do not face `current.side` are
/// skipped, even when they oppose the motion.
pub fn sweep_edge(
    current: &Edge,
    candidate: &Edge,
    config: &BoxControllerConfig,
    geometry: &impl GeometryQuery,
) -> EdgeSweep {
    let motion = candidate.start - current.start;
    let ray_distance = motion.length();
    if ray_distance <= 0.0 || !ray_distance.is_finite() {
        return EdgeSweep::default();
    }
    let direction = motion / ray_distance;

    // Strict comparison keeps the earliest sample on exact ties
    let mut nearest: Option<CollisionData> = None;
    for origin in current.sample_points(config.sample_count) {
        let Some(hit) = geometry.raycast(origin, direction, ray_distance, config.collision_mask)
        else {
            continue;
        };
        // Only surfaces facing both the motion and this edge's side block it
        if !hit.opposes(direction) || !hit.opposes(current.side.outward()) {
            continue;
        }
        if nearest.is_none_or(|best| hit.distance < best.distance) {
            nearest = Some(hit);
        }
    }

    match nearest {
        Some(hit) => EdgeSweep {
            hit: Some(hit),
            correction: (ray_distance - hit.distance) * config.overshoot_factor * hit.normal,
        },
        None => EdgeSweep::default(),
    }
}

/// Resolve the move from `position` to `candidate` one edge at a time.
///
/// Edges are processed in `order`. Each correction is applied to the
/// candidate before the next edge is swept, so earlier edges change the
/// sweep of later ones. Bodies always use [`EdgeSide::RESOLUTION_ORDER`].
pub fn resolve_collisions(
    position: Vec2,
    candidate: Vec2,
    config: &BoxControllerConfig,
    geometry: &impl GeometryQuery,
    order: &[EdgeSide],
) -> Resolution {
    let half_extents = config.half_extents;
    let samples = config.sample_count;
    let current = Edges::at(position, half_extents, samples);

    let mut resolved = candidate;
    let mut contacts = current;
    for &side in order {
        let target = Edge::new(side, resolved, half_extents, samples);
        let sweep = sweep_edge(current.get(side), &target, config, geometry);
        resolved += sweep.correction;

        let edge = contacts.get_mut(side);
        edge.colliding = sweep.is_blocked();
        edge.contact = sweep.hit;
    }

    Resolution {
        position: resolved,
        edges: Edges::at(resolved, half_extents, samples).with_contacts_from(&contacts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::CollisionMask;
    use crate::geometry::{StaticGeometry, StaticSurface};

    const EPS: f32 = 1e-4;

    fn config() -> BoxControllerConfig {
        BoxControllerConfig::default()
            .with_half_extents(Vec2::splat(0.5))
            .with_sample_count(3)
            .with_overshoot_factor(1.001)
    }

    fn floor() -> StaticGeometry {
        StaticGeometry::new().with_surface(StaticSurface::floor(-1.0, -5.0, 5.0))
    }

    fn edge(side: EdgeSide, position: Vec2) -> Edge {
        Edge::new(side, position, Vec2::splat(0.5), 3)
    }

    #[test]
    fn bottom_sweep_is_pushed_out_of_floor() {
        let sweep = sweep_edge(
            &edge(EdgeSide::Bottom, Vec2::ZERO),
            &edge(EdgeSide::Bottom, Vec2::new(0.0, -2.0)),
            &config(),
            &floor(),
        );

        let hit = sweep.hit.unwrap();
        assert!((hit.distance - 0.5).abs() < EPS);
        assert_eq!(hit.normal, Vec2::Y);
        // (2.0 - 0.5) * 1.001 along +Y
        assert!((sweep.correction - Vec2::new(0.0, 1.5015)).length() < EPS);
    }

    #[test]
    fn corrected_edge_stays_above_surface() {
        let config = config();
        for drop in [0.6, 1.0, 3.0, 10.0] {
            let resolution = resolve_collisions(
                Vec2::ZERO,
                Vec2::new(0.0, -drop),
                &config,
                &floor(),
                &EdgeSide::RESOLUTION_ORDER,
            );
            let gap = resolution.edges.bottom.start.y + 1.0;
            assert!(gap > 0.0, "drop {drop} left the box {gap} below the floor");
            assert!(resolution.edges.bottom.colliding);
        }
    }

    #[test]
    fn zero_sweep_never_collides() {
        let wall = StaticGeometry::new().with_surface(StaticSurface::wall_facing_left(0.5, -5.0, 5.0));
        // Right edge already touching the wall but not moving
        let sweep = sweep_edge(
            &edge(EdgeSide::Right, Vec2::ZERO),
            &edge(EdgeSide::Right, Vec2::ZERO),
            &config(),
            &wall,
        );
        assert_eq!(sweep, EdgeSweep::default());
        assert!(!sweep.is_blocked());
    }

    #[test]
    fn surfaces_facing_along_the_motion_are_ignored() {
        // A ceiling seen from below while moving down: its normal points down too
        let geometry = StaticGeometry::new().with_surface(StaticSurface::ceiling(-1.0, -5.0, 5.0));
        let sweep = sweep_edge(
            &edge(EdgeSide::Bottom, Vec2::ZERO),
            &edge(EdgeSide::Bottom, Vec2::new(0.0, -2.0)),
            &config(),
            &geometry,
        );
        assert!(!sweep.is_blocked());
        assert_eq!(sweep.correction, Vec2::ZERO);
    }

    #[test]
    fn nearest_sample_hit_wins() {
        // A ledge under the right half only, higher than the main floor
        let geometry = floor().with_surface(StaticSurface::floor(-0.8, 0.25, 5.0));
        let sweep = sweep_edge(
            &edge(EdgeSide::Bottom, Vec2::ZERO),
            &edge(EdgeSide::Bottom, Vec2::new(0.0, -2.0)),
            &config(),
            &geometry,
        );
        assert!((sweep.hit.unwrap().distance - 0.3).abs() < EPS);
    }

    #[test]
    fn exact_ties_keep_the_first_sample() {
        // Every sample hits at 0.5; normals differ so the winner is visible
        let by_sample = |origin: Vec2, _direction: Vec2, _max: f32, _mask: CollisionMask| {
            let normal = Vec2::new(origin.x, 1.0).normalize();
            Some(CollisionData::new(0.5, normal, origin, None))
        };
        let sweep = sweep_edge(
            &edge(EdgeSide::Bottom, Vec2::ZERO),
            &edge(EdgeSide::Bottom, Vec2::new(0.0, -2.0)),
            &config(),
            &by_sample,
        );
        // First bottom sample is the bottom-left corner at x = -0.5
        assert_eq!(sweep.hit.unwrap().normal, Vec2::new(-0.5, 1.0).normalize());
    }

    #[test]
    fn mask_filters_surfaces() {
        let geometry = StaticGeometry::new()
            .with_surface(StaticSurface::floor(-1.0, -5.0, 5.0).on_layers(CollisionMask::layer(3)));
        let resolution = resolve_collisions(
            Vec2::ZERO,
            Vec2::new(0.0, -2.0),
            &config(),
            &geometry,
            &EdgeSide::RESOLUTION_ORDER,
        );
        assert_eq!(resolution.position, Vec2::new(0.0, -2.0));
        assert!(!resolution.edges.bottom.colliding);

        let config = config().with_collision_mask(CollisionMask::layer(3));
        let resolution = resolve_collisions(
            Vec2::ZERO,
            Vec2::new(0.0, -2.0),
            &config,
            &geometry,
            &EdgeSide::RESOLUTION_ORDER,
        );
        assert!(resolution.edges.bottom.colliding);
    }

    #[test]
    fn wall_blocks_horizontal_motion() {
        let geometry = StaticGeometry::new().with_surface(StaticSurface::wall_facing_left(2.0, -5.0, 5.0));
        let resolution = resolve_collisions(
            Vec2::ZERO,
            Vec2::new(3.0, 0.0),
            &config(),
            &geometry,
            &EdgeSide::RESOLUTION_ORDER,
        );
        // Right edge reaches the wall 1.5 units out and takes the correction
        let contact = resolution.edges.right.contact.unwrap();
        assert_eq!(contact.normal, Vec2::NEG_X);
        assert!((contact.distance - 1.5).abs() < EPS);
        assert!((resolution.position.x - 1.4985).abs() < EPS);
        assert!(resolution.edges.right.start.x < 2.0);
        assert!(!resolution.edges.bottom.colliding);
        assert!(!resolution.edges.left.colliding);
        assert!(!resolution.edges.top.colliding);
    }

    #[test]
    fn bottom_edge_ignores_walls() {
        // Falling diagonally into a wall: the bottom-right corner ray reaches
        // the wall, but a wall never faces the bottom side.
        let geometry = StaticGeometry::new().with_surface(StaticSurface::wall_facing_left(1.0, -5.0, 5.0));
        let sweep = sweep_edge(
            &edge(EdgeSide::Bottom, Vec2::ZERO),
            &edge(EdgeSide::Bottom, Vec2::new(1.0, -1.0)),
            &config(),
            &geometry,
        );
        assert!(!sweep.is_blocked());
        assert_eq!(sweep.correction, Vec2::ZERO);

        let resolution = resolve_collisions(
            Vec2::ZERO,
            Vec2::new(1.0, -1.0),
            &config(),
            &geometry,
            &EdgeSide::RESOLUTION_ORDER,
        );
        assert!(!resolution.edges.bottom.colliding);
        assert!(resolution.edges.right.colliding);
        assert!(resolution.edges.right.start.x < 1.0);
    }

    #[test]
    fn sloped_hit_corrects_along_surface_normal() {
        // 45 degree ramp rising to the right, facing up-left
        let ramp = StaticSurface::new(Vec2::new(-4.0, -5.0), Vec2::new(4.0, 3.0), Vec2::new(-1.0, 1.0));
        let geometry = StaticGeometry::new().with_surface(ramp);
        let sweep = sweep_edge(
            &edge(EdgeSide::Bottom, Vec2::new(0.0, 0.5)),
            &edge(EdgeSide::Bottom, Vec2::new(0.0, -1.5)),
            &config(),
            &geometry,
        );

        // Bottom-right corner is nearest, 0.5 above the ramp
        let hit = sweep.hit.unwrap();
        assert!((hit.distance - 0.5).abs() < EPS);
        assert!(sweep.correction.perp_dot(ramp.normal).abs() < EPS);
        assert!((sweep.correction.dot(ramp.normal) - 1.5015).abs() < EPS);
    }

    #[test]
    fn resolution_edges_sit_at_resolved_position() {
        let resolution = resolve_collisions(
            Vec2::ZERO,
            Vec2::new(0.0, -2.0),
            &config(),
            &floor(),
            &EdgeSide::RESOLUTION_ORDER,
        );
        assert!((resolution.position.y + 0.4985).abs() < EPS);
        assert_eq!(
            resolution.edges.bottom.start,
            resolution.position + Vec2::new(-0.5, -0.5)
        );
        assert!(resolution.edges.bottom.colliding);
        assert!(!resolution.edges.left.colliding);
        assert!(!resolution.edges.right.colliding);
        assert!(!resolution.edges.top.colliding);
    }
}
