//! # Cut Faces
//!
//! Two-dimensional cross-section profiles swept along a stroke.
//!
//! A profile is a counter-clockwise loop of points in a unit-ish square
//! centered at the origin. Profiles come either from a named primitive or
//! from the node chain of another part that targets `CutFace`.

mod linked;


pub use linked::{profile_from_linked_nodes, ProfileNode};

use config::constants::LENGTH_EPSILON;
use glam::{DVec2, DVec3};

/// Named cross-section primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutFace {
    /// Square profile.
    #[default]
    Quad,
    /// Regular pentagon.
    Pentagon,
    /// Regular hexagon.
    Hexagon,
    /// Equilateral triangle.
    Triangle,
    /// Profile supplied elsewhere; falls back to the square.
    UserDefined,
}

impl CutFace {
    /// Parses a primitive name; unknown names are `Quad`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Pentagon" => Self::Pentagon,
            "Hexagon" => Self::Hexagon,
            "Triangle" => Self::Triangle,
            "UserDefined" => Self::UserDefined,
            _ => Self::Quad,
        }
    }

    /// Profile points of the primitive, counter-clockwise.
    pub fn points(&self) -> Vec<DVec2> {
        let raw: &[(f64, f64)] = match self {
            Self::Pentagon => &[
                (-0.6498, -0.8944),
                (0.6498, -0.8944),
                (1.05146, 0.34164),
                (0.0, 1.10557),
                (-1.05146, 0.34164),
            ],
            Self::Hexagon => &[
                (-0.577, -1.0),
                (0.577, -1.0),
                (1.1547, 0.0),
                (0.577, 1.0),
                (-0.577, 1.0),
                (-1.1547, 0.0),
            ],
            Self::Triangle => &[(-1.1527, -0.6655), (1.1527, -0.6655), (0.0, 1.33447)],
            Self::Quad | Self::UserDefined => &[(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)],
        };
        raw.iter().map(|&(x, y)| DVec2::new(x, y)).collect()
    }
}

/// Centers a profile, scales its longest side to 2 and makes it
/// counter-clockwise.
pub fn normalize_cut_face_points(points: &mut [DVec2]) {
    if points.is_empty() {
        return;
    }
    let (min, max) = points
        .iter()
        .fold((points[0], points[0]), |(min, max), p| (min.min(*p), max.max(*p)));
    let middle = (min + max) * 0.5;
    let size = max - min;
    let mut long_size = size.x.max(size.y);
    if long_size.abs() < LENGTH_EPSILON {
        long_size = 0.000_001;
    }
    for point in points.iter_mut() {
        *point = (*point - middle) * 2.0 / long_size;
    }
    correct_flipped_normal(points);
}

fn correct_flipped_normal(points: &mut [DVec2]) {
    if points.len() < 3 {
        return;
    }
    let mut normal = DVec3::ZERO;
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        let k = (j + 1) % points.len();
        let (a, b, c) = (points[i].extend(0.0), points[j].extend(0.0), points[k].extend(0.0));
        normal += (b - a).cross(c - a).normalize_or_zero();
    }
    if normal.normalize_or_zero().dot(DVec3::Z) > 0.0 {
        return;
    }
    points[1..].reverse();
}

/// Builds a profile from an ordered node chain `(radius, x, y)`.
///
/// A ring uses node positions directly and needs at least three nodes. An
/// open chain is thickened by each node's radius on both sides and needs at
/// least two nodes. Returns an empty profile when too few nodes are given.
pub fn cut_face_points_from_nodes(nodes: &[(f64, DVec2)], is_ring: bool) -> Vec<DVec2> {
    let mut points = Vec::new();
    if is_ring {
        if nodes.len() < 3 {
            return points;
        }
        points.extend(nodes.iter().map(|(_, position)| *position));
        normalize_cut_face_points(&mut points);
        return points;
    }
    if nodes.len() < 2 {
        return points;
    }
    let edges: Vec<DVec2> = nodes
        .windows(2)
        .map(|pair| (pair[1].1 - pair[0].1).normalize_or_zero())
        .collect();
    let mut directions = Vec::with_capacity(nodes.len());
    directions.push(edges[0]);
    for i in 1..nodes.len() - 1 {
        directions.push((edges[i - 1] + edges[i]).normalize_or_zero());
    }
    directions.push(edges[edges.len() - 1]);

    let mut downs = Vec::with_capacity(nodes.len());
    for ((radius, origin), direction) in nodes.iter().zip(&directions) {
        let u = direction.extend(0.0).cross(DVec3::Z).normalize_or_zero().truncate();
        points.push(*origin + u * *radius);
        downs.push(*origin - u * *radius);
    }
    points.extend(downs.into_iter().rev());
    normalize_cut_face_points(&mut points);
    points
}

/// Cuts every corner of a profile, doubling its point count.
pub fn chamfer_face(points: &mut Vec<DVec2>) {
    let mut chamfered = Vec::with_capacity(points.len() * 2);
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        chamfered.push(points[i] * 0.8 + points[j] * 0.2);
        chamfered.push(points[i] * 0.2 + points[j] * 0.8);
    }
    *points = chamfered;
}

/// One Catmull-Clark style smoothing step on a closed profile.
pub fn subdivide_face(points: &mut Vec<DVec2>) {
    let count = points.len();
    let mut subdivided = Vec::with_capacity(count * 2);
    for i in 0..count {
        let h = (i + count - 1) % count;
        let j = (i + 1) % count;
        subdivided.push(points[h] * 0.125 + points[i] * 0.75 + points[j] * 0.125);
        subdivided.push((points[i] + points[j]) * 0.5);
    }
    *points = subdivided;
}

/// Average length of a closed profile's edges.
pub fn average_edge_length(points: &[DVec2]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let total: f64 = (0..points.len())
        .map(|i| points[i].distance(points[(i + 1) % points.len()]))
        .sum();
    total / points.len() as f64
}
