//! # Stitch Mesh Builder
//!
//! Joins several splines into one closed surface. Splines are resampled to
//! a common even segment count and neighboring splines are connected with
//! quads. How the remaining boundary is closed depends on the input:
//!
//! | splines              | closing                                     |
//! |----------------------|---------------------------------------------|
//! | all circles          | tube, lids fanned to the closing point or a synthesized center |
//! | front and back point | sheet fanned to both points, thickened      |
//! | one end point        | sheet fanned to that point, thickened       |
//! | all open             | sheet thickened into a hollow wall          |
//!
//! Thickening pushes every vertex out and in along its averaged face
//! normal by its local radius and joins both layers along the boundary.

mod resample;

#[cfg(test)]
mod tests;

pub use resample::{polyline_length, split_polyline_to_segments};

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use crate::triangulate::polygon_normal;
use config::constants::{LENGTH_EPSILON, MIN_STITCH_SEGMENTS};
use glam::DVec3;
use std::collections::HashSet;
use tracing::debug;

/// Point of a spline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StitchNode {
    pub origin: DVec3,
    pub radius: f64,
}

/// Ordered chain of nodes taken from one stitching-line part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spline {
    pub nodes: Vec<StitchNode>,
    /// The chain closes on itself
    pub is_circle: bool,
    /// Single point the surface converges to
    pub is_closing: bool,
    /// Part the spline came from
    pub source_id: String,
}

impl Spline {
    /// Creates a spline, marking single node chains as closing points.
    pub fn new(source_id: impl Into<String>, nodes: Vec<StitchNode>, is_circle: bool) -> Self {
        let is_closing = nodes.len() <= 1;
        Self {
            nodes,
            is_circle: is_circle && !is_closing,
            is_closing,
            source_id: source_id.into(),
        }
    }
}

/// Output of [`StitchMeshBuilder::build`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StitchMesh {
    pub vertices: Vec<DVec3>,
    pub faces: Vec<Vec<usize>>,
    /// Index into the input splines for every vertex
    pub vertex_splines: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
struct StitchingPoint {
    vertex: usize,
    radius: f64,
}

/// Builds a closed mesh across splines.
#[derive(Debug, Clone)]
pub struct StitchMeshBuilder {
    splines: Vec<Spline>,
    vertices: Vec<DVec3>,
    radii: Vec<f64>,
    vertex_splines: Vec<usize>,
    faces: Vec<Vec<usize>>,
}

impl StitchMeshBuilder {
    pub fn new(splines: Vec<Spline>) -> Self {
        Self {
            splines,
            vertices: Vec::new(),
            radii: Vec::new(),
            vertex_splines: Vec::new(),
            faces: Vec::new(),
        }
    }

    pub fn splines(&self) -> &[Spline] {
        &self.splines
    }

    /// Segment count shared by every resampled spline: the longest input
    /// chain, at least the minimum, rounded up to even.
    pub fn target_segments(&self) -> usize {
        let longest = self
            .splines
            .iter()
            .filter(|spline| !spline.is_closing)
            .map(|spline| {
                if spline.is_circle {
                    spline.nodes.len()
                } else {
                    spline.nodes.len().saturating_sub(1)
                }
            })
            .max()
            .unwrap_or(0)
            .max(MIN_STITCH_SEGMENTS);
        longest + longest % 2
    }

    pub fn build(&mut self) -> MeshResult<StitchMesh> {
        self.vertices.clear();
        self.radii.clear();
        self.vertex_splines.clear();
        self.faces.clear();

        let lines: Vec<usize> = (0..self.splines.len())
            .filter(|&i| !self.splines[i].is_closing)
            .collect();
        if self.splines.len() < 2 || lines.is_empty() {
            return Err(MeshError::degenerate("stitching needs at least two splines"));
        }
        let first_line = lines[0];
        let last_line = lines[lines.len() - 1];
        let front = (first_line > 0 && !self.splines[0].nodes.is_empty()).then_some(0);
        let back_index = self.splines.len() - 1;
        let back = (last_line < back_index && !self.splines[back_index].nodes.is_empty()).then_some(back_index);
        let side_closed = lines.iter().all(|&i| self.splines[i].is_circle);
        let segments = self.target_segments();
        debug!(
            splines = self.splines.len(),
            segments,
            side_closed,
            front = front.is_some(),
            back = back.is_some(),
            "Stitching splines"
        );

        let rows: Vec<Vec<StitchingPoint>> = lines
            .iter()
            .map(|&i| self.resample_spline(i, segments, side_closed))
            .collect();
        let front_point = front.map(|i| self.closing_point(i));
        let back_point = back.map(|i| self.closing_point(i));

        for pair in rows.windows(2) {
            self.stitch_rows(&pair[0], &pair[1], side_closed);
        }

        if side_closed {
            let front_apex = front_point.unwrap_or_else(|| self.center_point(&rows[0], first_line));
            let back_apex = back_point.unwrap_or_else(|| self.center_point(&rows[rows.len() - 1], last_line));
            self.fan_front(front_apex, &rows[0], true);
            self.fan_back(&rows[rows.len() - 1], back_apex, true);
        } else {
            if let Some(apex) = front_point {
                self.fan_front(apex, &rows[0], false);
            }
            if let Some(apex) = back_point {
                self.fan_back(&rows[rows.len() - 1], apex, false);
            }
            if self.faces.is_empty() {
                return Err(MeshError::degenerate("stitching produced no faces"));
            }
            self.thicken();
        }

        let mesh = Mesh::from_faces(self.vertices.clone(), &self.faces);
        if mesh.signed_volume() < 0.0 {
            for face in &mut self.faces {
                face.reverse();
            }
        }
        Ok(StitchMesh {
            vertices: self.vertices.clone(),
            faces: self.faces.clone(),
            vertex_splines: self.vertex_splines.clone(),
        })
    }

    fn push_vertex(&mut self, position: DVec3, radius: f64, spline: usize) -> StitchingPoint {
        self.vertices.push(position);
        self.radii.push(radius);
        self.vertex_splines.push(spline);
        StitchingPoint {
            vertex: self.vertices.len() - 1,
            radius,
        }
    }

    fn resample_spline(&mut self, index: usize, segments: usize, closed: bool) -> Vec<StitchingPoint> {
        let spline = &self.splines[index];
        let mut points: Vec<DVec3> = spline.nodes.iter().map(|node| node.origin).collect();
        let mut radii: Vec<f64> = spline.nodes.iter().map(|node| node.radius).collect();
        if closed {
            points.push(points[0]);
            radii.push(radii[0]);
        }
        let (mut points, mut radii) = split_polyline_to_segments(&points, &radii, segments);
        if closed {
            points.pop();
            radii.pop();
        }
        points
            .into_iter()
            .zip(radii)
            .map(|(position, radius)| self.push_vertex(position, radius, index))
            .collect()
    }

    fn closing_point(&mut self, index: usize) -> StitchingPoint {
        let node = self.splines[index].nodes[0];
        self.push_vertex(node.origin, node.radius, index)
    }

    fn center_point(&mut self, row: &[StitchingPoint], spline: usize) -> StitchingPoint {
        let count = row.len().max(1) as f64;
        let center = row.iter().map(|p| self.vertices[p.vertex]).sum::<DVec3>() / count;
        let radius = row.iter().map(|p| p.radius).sum::<f64>() / count;
        self.push_vertex(center, radius, spline)
    }

    fn stitch_rows(&mut self, a: &[StitchingPoint], b: &[StitchingPoint], closed: bool) {
        if a.len() != b.len() || a.len() < 2 {
            debug!(a = a.len(), b = b.len(), "Unmatched stitching rows");
            return;
        }
        let count = a.len();
        let pairs = if closed { count } else { count - 1 };
        for i in 0..pairs {
            let j = (i + 1) % count;
            self.faces.push(vec![a[i].vertex, b[i].vertex, b[j].vertex, a[j].vertex]);
        }
    }

    fn fan_front(&mut self, apex: StitchingPoint, row: &[StitchingPoint], closed: bool) {
        let count = row.len();
        let pairs = if closed { count } else { count.saturating_sub(1) };
        for i in 0..pairs {
            let j = (i + 1) % count;
            self.faces.push(vec![apex.vertex, row[i].vertex, row[j].vertex]);
        }
    }

    fn fan_back(&mut self, row: &[StitchingPoint], apex: StitchingPoint, closed: bool) {
        let count = row.len();
        let pairs = if closed { count } else { count.saturating_sub(1) };
        for i in 0..pairs {
            let j = (i + 1) % count;
            self.faces.push(vec![row[i].vertex, apex.vertex, row[j].vertex]);
        }
    }

    /// Turns the one sided surface into a closed wall.
    fn thicken(&mut self) {
        let count = self.vertices.len();
        let mut normals = vec![DVec3::ZERO; count];
        for face in &self.faces {
            let normal = polygon_normal(&self.vertices, face).normalize_or_zero();
            for &v in face {
                normals[v] += normal;
            }
        }
        for normal in &mut normals {
            *normal = normal.normalize_or_zero();
            if normal.length_squared() < LENGTH_EPSILON {
                *normal = DVec3::Y;
            }
        }

        let half_edges: HashSet<(usize, usize)> = self
            .faces
            .iter()
            .flat_map(|face| (0..face.len()).map(move |i| (face[i], face[(i + 1) % face.len()])))
            .collect();
        let boundary: Vec<(usize, usize)> = self
            .faces
            .iter()
            .flat_map(|face| (0..face.len()).map(move |i| (face[i], face[(i + 1) % face.len()])))
            .filter(|&(from, to)| !half_edges.contains(&(to, from)))
            .collect();

        for i in 0..count {
            let offset = normals[i] * self.radii[i];
            let inner = self.vertices[i] - offset;
            self.vertices[i] += offset;
            self.vertices.push(inner);
            self.radii.push(self.radii[i]);
            self.vertex_splines.push(self.vertex_splines[i]);
        }
        let outer_count = self.faces.len();
        for f in 0..outer_count {
            let inner: Vec<usize> = self.faces[f].iter().rev().map(|&v| v + count).collect();
            self.faces.push(inner);
        }
        for (from, to) in boundary {
            self.faces.push(vec![to, from, from + count, to + count]);
        }
    }
}
