//! # Planes and Convex Polygons
//!
//! Primitives of the BSP boolean: a plane with point classification and a
//! convex polygon that can be split by a plane.

use config::constants::PLANE_EPSILON;
use glam::DVec3;

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Classification of a point or polygon relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Front,
    Back,
    Coplanar,
    /// Polygon has vertices on both sides
    Spanning,
}

// =============================================================================
// PLANE
// =============================================================================

/// Plane `normal · p = w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: DVec3,
    pub w: f64,
}

impl Plane {
    /// Plane through three points, counter-clockwise seen from the front.
    ///
    /// Returns `None` for a degenerate triangle.
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        let normal = (b - a).cross(c - a);
        let length = normal.length();
        if length < PLANE_EPSILON * PLANE_EPSILON {
            return None;
        }
        let normal = normal / length;
        Some(Self {
            normal,
            w: normal.dot(a),
        })
    }

    pub fn flip(&self) -> Self {
        Self {
            normal: -self.normal,
            w: -self.w,
        }
    }

    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.w
    }

    pub fn classify_point(&self, point: DVec3) -> Classification {
        let distance = self.signed_distance(point);
        if distance > PLANE_EPSILON {
            Classification::Front
        } else if distance < -PLANE_EPSILON {
            Classification::Back
        } else {
            Classification::Coplanar
        }
    }
}

// =============================================================================
// POLYGON
// =============================================================================

/// Convex polygon with its supporting plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<DVec3>,
    pub plane: Plane,
}

/// Destination lists for [`Polygon::split`].
#[derive(Debug, Default)]
pub struct SplitResult {
    pub coplanar_front: Vec<Polygon>,
    pub coplanar_back: Vec<Polygon>,
    pub front: Vec<Polygon>,
    pub back: Vec<Polygon>,
}

impl Polygon {
    /// Creates a polygon, `None` when the first three vertices are degenerate.
    pub fn from_vertices(vertices: Vec<DVec3>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        Some(Self { vertices, plane })
    }

    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane = self.plane.flip();
    }

    pub fn classify(&self, plane: &Plane) -> Classification {
        let mut front = false;
        let mut back = false;
        for vertex in &self.vertices {
            match plane.classify_point(*vertex) {
                Classification::Front => front = true,
                Classification::Back => back = true,
                _ => {}
            }
        }
        match (front, back) {
            (true, true) => Classification::Spanning,
            (true, false) => Classification::Front,
            (false, true) => Classification::Back,
            (false, false) => Classification::Coplanar,
        }
    }

    /// Splits this polygon by `plane` into `result`.
    pub fn split(self, plane: &Plane, result: &mut SplitResult) {
        match self.classify(plane) {
            Classification::Coplanar => {
                if self.plane.normal.dot(plane.normal) > 0.0 {
                    result.coplanar_front.push(self);
                } else {
                    result.coplanar_back.push(self);
                }
            }
            Classification::Front => result.front.push(self),
            Classification::Back => result.back.push(self),
            Classification::Spanning => {
                let count = self.vertices.len();
                let mut front = Vec::with_capacity(count + 1);
                let mut back = Vec::with_capacity(count + 1);
                for i in 0..count {
                    let j = (i + 1) % count;
                    let (vi, vj) = (self.vertices[i], self.vertices[j]);
                    let ti = plane.classify_point(vi);
                    let tj = plane.classify_point(vj);
                    if ti != Classification::Back {
                        front.push(vi);
                    }
                    if ti != Classification::Front {
                        back.push(vi);
                    }
                    if (ti == Classification::Front && tj == Classification::Back)
                        || (ti == Classification::Back && tj == Classification::Front)
                    {
                        let di = plane.signed_distance(vi);
                        let dj = plane.signed_distance(vj);
                        let crossing = vi.lerp(vj, di / (di - dj));
                        front.push(crossing);
                        back.push(crossing);
                    }
                }
                if front.len() >= 3 {
                    result.front.push(Polygon {
                        vertices: front,
                        plane: self.plane,
                    });
                }
                if back.len() >= 3 {
                    result.back.push(Polygon {
                        vertices: back,
                        plane: self.plane,
                    });
                }
            }
        }
    }
}
