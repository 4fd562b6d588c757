//! # Mesh Combiner
//!
//! Boolean union and difference of closed meshes with per-vertex
//! provenance.
//!
//! ## Algorithm
//!
//! BSP clipping in the style of csg.js:
//! - Union: A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); combine
//! - Difference: A.invert(); A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); combine; invert
//!
//! Output polygons are welded by [`PositionKey`], T-junctions left by plane
//! splits are closed by inserting the vertices lying on polygon edges, and
//! the result is triangulated. A result vertex whose key exists in the first
//! input is [`Source::First`], in the second [`Source::Second`], otherwise it
//! was created by the intersection and is [`Source::None`].

mod bsp;
mod polygon;


use crate::mesh::Mesh;
use crate::position_key::PositionKey;
use crate::triangulate::triangulate_polygon;
use bsp::BspTree;
use config::constants::PLANE_EPSILON;
use glam::DVec3;
use polygon::Polygon;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Boolean operation applied by [`MeshCombiner::combine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombineMethod {
    Union,
    Diff,
}

/// Which input a result vertex came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Source {
    /// Created on the intersection seam
    #[default]
    None,
    First,
    Second,
}

/// Result of a boolean: the mesh and one [`Source`] per vertex.
pub type CombineOutput = (Mesh, Vec<Source>);

/// Boolean engine over closed triangle meshes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshCombiner;

impl MeshCombiner {
    pub fn new() -> Self {
        Self
    }

    /// Combines `a` with `b`.
    ///
    /// Returns `None` when the result is empty.
    pub fn combine(&self, a: &Mesh, b: &Mesh, method: CombineMethod) -> Option<CombineOutput> {
        if a.is_empty() {
            return match method {
                CombineMethod::Union if !b.is_empty() => Some(tagged(b.clone(), Source::Second)),
                _ => None,
            };
        }
        if b.is_empty() {
            return Some(tagged(a.clone(), Source::First));
        }
        if !bounding_boxes_touch(a, b) {
            debug!(?method, "Disjoint bounds, skipping boolean");
            return Some(match method {
                CombineMethod::Union => {
                    let mut merged = a.clone();
                    merged.merge(b);
                    let mut sources = vec![Source::First; a.vertex_count()];
                    sources.resize(merged.vertex_count(), Source::Second);
                    (merged, sources)
                }
                CombineMethod::Diff => tagged(a.clone(), Source::First),
            });
        }

        let mut tree_a = BspTree::new(mesh_to_polygons(a));
        let mut tree_b = BspTree::new(mesh_to_polygons(b));
        let polygons = match method {
            CombineMethod::Union => {
                tree_a.clip_to(&tree_b);
                tree_b.clip_to(&tree_a);
                tree_b.invert();
                tree_b.clip_to(&tree_a);
                tree_b.invert();
                let mut polygons = tree_a.all_polygons();
                polygons.extend(tree_b.all_polygons());
                polygons
            }
            CombineMethod::Diff => {
                tree_a.invert();
                tree_a.clip_to(&tree_b);
                tree_b.clip_to(&tree_a);
                tree_b.invert();
                tree_b.clip_to(&tree_a);
                tree_b.invert();
                let mut polygons = tree_a.all_polygons();
                polygons.extend(tree_b.all_polygons());
                for polygon in &mut polygons {
                    polygon.flip();
                }
                polygons
            }
        };

        let mesh = polygons_to_mesh(&polygons);
        if mesh.is_empty() {
            debug!(?method, "Boolean produced an empty mesh");
            return None;
        }
        let first: HashSet<PositionKey> = a.vertices().iter().map(|v| PositionKey::new(*v)).collect();
        let second: HashSet<PositionKey> = b.vertices().iter().map(|v| PositionKey::new(*v)).collect();
        let sources = mesh
            .vertices()
            .iter()
            .map(|v| {
                let key = PositionKey::new(*v);
                if first.contains(&key) {
                    Source::First
                } else if second.contains(&key) {
                    Source::Second
                } else {
                    Source::None
                }
            })
            .collect();
        Some((mesh, sources))
    }
}

fn tagged(mesh: Mesh, source: Source) -> CombineOutput {
    let sources = vec![source; mesh.vertex_count()];
    (mesh, sources)
}

/// True unless the boxes are separated along some axis.
fn bounding_boxes_touch(a: &Mesh, b: &Mesh) -> bool {
    let (Some((min_a, max_a)), Some((min_b, max_b))) = (a.bounding_box(), b.bounding_box()) else {
        return false;
    };
    let separated = (max_a + PLANE_EPSILON).cmplt(min_b).any() || (max_b + PLANE_EPSILON).cmplt(min_a).any();
    !separated
}

fn mesh_to_polygons(mesh: &Mesh) -> Vec<Polygon> {
    let vertices = mesh.vertices();
    mesh.triangles()
        .iter()
        .filter_map(|t| Polygon::from_vertices(vec![vertices[t[0]], vertices[t[1]], vertices[t[2]]]))
        .collect()
}

/// Welds polygon corners by position key, repairs T-junctions and
/// triangulates.
fn polygons_to_mesh(polygons: &[Polygon]) -> Mesh {
    let mut vertices: Vec<DVec3> = Vec::new();
    let mut index_of: HashMap<PositionKey, usize> = HashMap::new();
    let mut faces: Vec<Vec<usize>> = Vec::with_capacity(polygons.len());
    for polygon in polygons {
        let mut face: Vec<usize> = Vec::with_capacity(polygon.vertices.len());
        for position in &polygon.vertices {
            let index = *index_of.entry(PositionKey::new(*position)).or_insert_with(|| {
                vertices.push(*position);
                vertices.len() - 1
            });
            if face.last() != Some(&index) && face.first() != Some(&index) {
                face.push(index);
            }
        }
        if face.len() >= 3 {
            faces.push(face);
        }
    }

    let repaired: Vec<Vec<usize>> = faces
        .par_iter()
        .map(|face| insert_edge_vertices(&vertices, face))
        .collect();

    let triangles = repaired
        .iter()
        .flat_map(|face| triangulate_polygon(&vertices, face))
        .collect();
    Mesh::from_triangles(vertices, triangles)
}

/// Adds every vertex that lies strictly inside one of the face's edges.
fn insert_edge_vertices(vertices: &[DVec3], face: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(face.len());
    for i in 0..face.len() {
        let (from, to) = (face[i], face[(i + 1) % face.len()]);
        result.push(from);
        let start = vertices[from];
        let edge = vertices[to] - start;
        let length_squared = edge.length_squared();
        if length_squared < PLANE_EPSILON * PLANE_EPSILON {
            continue;
        }
        let low = start.min(vertices[to]) - DVec3::splat(PLANE_EPSILON);
        let high = start.max(vertices[to]) + DVec3::splat(PLANE_EPSILON);
        let mut on_edge: Vec<(f64, usize)> = vertices
            .iter()
            .enumerate()
            .filter(|&(index, p)| {
                index != from && index != to && p.cmpge(low).all() && p.cmple(high).all()
            })
            .filter_map(|(index, p)| {
                let t = (*p - start).dot(edge) / length_squared;
                if t <= 0.0 || t >= 1.0 {
                    return None;
                }
                let distance = (start + edge * t).distance(*p);
                (distance < PLANE_EPSILON).then_some((t, index))
            })
            .collect();
        on_edge.sort_by(|a, b| a.0.total_cmp(&b.0));
        result.extend(on_edge.into_iter().map(|(_, index)| index));
    }
    result
}
