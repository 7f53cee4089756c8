//! Edge model.
//!
//! The box is swept one side at a time. Each side is a segment between two
//! corners, sampled at evenly spaced points that become ray origins.

use bevy::prelude::*;

use crate::collision::CollisionData;

/// One of the four sides of the box.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeSide {
    Bottom,
    Left,
    Right,
    Top,
}

impl EdgeSide {
    /// Order in which edges are resolved every frame.
    ///
    /// Ground contact is settled first so that jump eligibility on the next
    /// frame sees the corrected ground state.
    pub const RESOLUTION_ORDER: [EdgeSide; 4] = [
        EdgeSide::Bottom,
        EdgeSide::Left,
        EdgeSide::Right,
        EdgeSide::Top,
    ];

    /// Outward direction of this side.
    pub fn outward(self) -> Vec2 {
        match self {
            EdgeSide::Bottom => Vec2::NEG_Y,
            EdgeSide::Left => Vec2::NEG_X,
            EdgeSide::Right => Vec2::X,
            EdgeSide::Top => Vec2::Y,
        }
    }

    /// Corner the edge starts at, as signed multiples of the half extents.
    fn start_corner(self) -> Vec2 {
        match self {
            EdgeSide::Bottom => Vec2::new(-1.0, -1.0),
            EdgeSide::Left => Vec2::new(-1.0, 1.0),
            EdgeSide::Right => Vec2::new(1.0, 1.0),
            EdgeSide::Top => Vec2::new(1.0, 1.0),
        }
    }

    /// Corner the edge ends at, as signed multiples of the half extents.
    fn end_corner(self) -> Vec2 {
        match self {
            EdgeSide::Bottom => Vec2::new(1.0, -1.0),
            EdgeSide::Left => Vec2::new(-1.0, -1.0),
            EdgeSide::Right => Vec2::new(1.0, -1.0),
            EdgeSide::Top => Vec2::new(-1.0, 1.0),
        }
    }
}

/// One side of the box at a given position.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub side: EdgeSide,
    pub start: Vec2,
    pub end: Vec2,
    /// Offset between consecutive ray origins along the edge.
    pub segment_step: Vec2,
    /// Whether the most recent sweep of this edge was blocked.
    pub colliding: bool,
    /// Nearest blocking hit of the most recent sweep.
    #[reflect(ignore)]
    pub contact: Option<CollisionData>,
}

impl Edge {
    /// Build one edge of a box centered at `position`.
    ///
    /// `sample_count` must be at least 2; the config validation guarantees it.
    pub fn new(side: EdgeSide, position: Vec2, half_extents: Vec2, sample_count: usize) -> Self {
        let start = position + side.start_corner() * half_extents;
        let end = position + side.end_corner() * half_extents;
        let intervals = sample_count.saturating_sub(1).max(1) as f32;
        Self {
            side,
            start,
            end,
            segment_step: (end - start) / intervals,
            colliding: false,
            contact: None,
        }
    }

    /// Evenly spaced points from `start` to `end`, both included.
    pub fn sample_points(&self, sample_count: usize) -> impl Iterator<Item = Vec2> + '_ {
        (0..sample_count).map(move |i| self.start + self.segment_step * i as f32)
    }

    /// The segment as a `(start, end)` pair.
    pub fn segment(&self) -> (Vec2, Vec2) {
        (self.start, self.end)
    }
}

/// The four edges of the box.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct Edges {
    pub bottom: Edge,
    pub left: Edge,
    pub right: Edge,
    pub top: Edge,
}

impl Edges {
    /// Derive all four edges of a box centered at `position`.
    ///
    /// Pure function of its inputs; contact state starts cleared.
    pub fn at(position: Vec2, half_extents: Vec2, sample_count: usize) -> Self {
        Self {
            bottom: Edge::new(EdgeSide::Bottom, position, half_extents, sample_count),
            left: Edge::new(EdgeSide::Left, position, half_extents, sample_count),
            right: Edge::new(EdgeSide::Right, position, half_extents, sample_count),
            top: Edge::new(EdgeSide::Top, position, half_extents, sample_count),
        }
    }

    pub fn get(&self, side: EdgeSide) -> &Edge {
        match side {
            EdgeSide::Bottom => &self.bottom,
            EdgeSide::Left => &self.left,
            EdgeSide::Right => &self.right,
            EdgeSide::Top => &self.top,
        }
    }

    pub fn get_mut(&mut self, side: EdgeSide) -> &mut Edge {
        match side {
            EdgeSide::Bottom => &mut self.bottom,
            EdgeSide::Left => &mut self.left,
            EdgeSide::Right => &mut self.right,
            EdgeSide::Top => &mut self.top,
        }
    }

    /// Iterate edges in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        [&self.bottom, &self.left, &self.right, &self.top].into_iter()
    }

    /// Copy contact state from another set of edges, keeping this set's
    /// geometry.
    pub fn with_contacts_from(mut self, other: &Edges) -> Self {
        for side in EdgeSide::RESOLUTION_ORDER {
            let source = other.get(side);
            let edge = self.get_mut(side);
            edge.colliding = source.colliding;
            edge.contact = source.contact;
        }
        self
    }

    /// Segments of the edges that are currently colliding.
    pub fn colliding_segments(&self) -> impl Iterator<Item = (EdgeSide, Vec2, Vec2)> + '_ {
        self.iter()
            .filter(|edge| edge.colliding)
            .map(|edge| (edge.side, edge.start, edge.end))
    }
}
