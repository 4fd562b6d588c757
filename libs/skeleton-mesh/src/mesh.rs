//! # Mesh Data Structure
//!
//! Closed triangle mesh handed between builders, the boolean combiner and
//! the generator cache.

use crate::topology;
use crate::triangulate::triangulate_faces;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A triangle mesh with vertices and indices.
///
/// Meshes are plain values: the cache hands out clones, never aliases.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use skeleton_mesh::Mesh;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions
    vertices: Vec<DVec3>,
    /// Triangle indices
    triangles: Vec<[usize; 3]>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh from vertices and triangles.
    pub fn from_triangles(vertices: Vec<DVec3>, triangles: Vec<[usize; 3]>) -> Self {
        Self { vertices, triangles }
    }

    /// Creates a mesh from mixed-arity faces, triangulating them.
    pub fn from_faces(vertices: Vec<DVec3>, faces: &[Vec<usize>]) -> Self {
        let triangles = triangulate_faces(&vertices, faces);
        Self { vertices, triangles }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> usize {
        self.vertices.push(position);
        self.vertices.len() - 1
    }

    /// Adds a triangle.
    pub fn add_triangle(&mut self, v0: usize, v1: usize, v2: usize) {
        self.triangles.push([v0, v1, v2]);
    }

    /// Vertex positions.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Triangle indices.
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Consumes the mesh, returning its buffers.
    pub fn into_parts(self) -> (Vec<DVec3>, Vec<[usize; 3]>) {
        (self.vertices, self.triangles)
    }

    /// Axis-aligned bounds, `None` for a mesh without vertices.
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), v| (min.min(*v), max.max(*v))),
        )
    }

    /// True when every directed edge has exactly one reverse partner.
    pub fn is_watertight(&self) -> bool {
        !self.is_empty() && topology::is_watertight(&self.triangles)
    }

    /// True when every index references an existing vertex.
    pub fn validate(&self) -> bool {
        let count = self.vertices.len();
        self.triangles
            .iter()
            .all(|t| t.iter().all(|&i| i < count))
    }

    /// Signed enclosed volume; negative for inside-out meshes.
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| {
                let (a, b, c) = (self.vertices[t[0]], self.vertices[t[1]], self.vertices[t[2]]);
                a.dot(b.cross(c)) / 6.0
            })
            .sum()
    }

    /// Appends another mesh without any boolean interaction.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);
        self.triangles.extend(
            other
                .triangles
                .iter()
                .map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]),
        );
    }
}
