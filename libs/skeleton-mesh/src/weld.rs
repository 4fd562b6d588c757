//! # Vertex Welding
//!
//! Collapses short edges left behind by boolean splitting. An edge shorter
//! than the threshold is collapsed toward the endpoint closer to the third
//! corner of its triangle, provided the edge is shared by two triangles and
//! the removed vertex has a small fan. Positions listed as excluded (the
//! vertices produced directly by part sweeps) never move.
//!
//! One call performs one pass; the caller repeats until nothing is welded.

use crate::mesh::Mesh;
use crate::position_key::PositionKey;
use crate::topology::triangle_edge_map;
use config::constants::{WELD_MAX_ADJACENT_FACES, WELD_MAX_FOLLOW};
use glam::DVec3;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One weld pass over a triangle soup.
///
/// Returns the rebuilt mesh and the number of triangles collapsed. Vertices
/// of the output are renumbered in order of first use, so unreferenced
/// vertices are dropped.
pub fn weld_vertices(
    vertices: &[DVec3],
    triangles: &[[usize; 3]],
    threshold: f64,
    excluded: &HashSet<PositionKey>,
) -> (Mesh, usize) {
    let movable: Vec<bool> = vertices
        .iter()
        .map(|position| !excluded.contains(&PositionKey::new(*position)))
        .collect();
    let edge_map = triangle_edge_map(triangles);
    let mut adjacent_faces = vec![0usize; vertices.len()];
    for triangle in triangles {
        for &index in triangle {
            adjacent_faces[index] += 1;
        }
    }

    let threshold_squared = threshold * threshold;
    let mut processed = vec![false; triangles.len()];
    let mut weld_map: HashMap<usize, usize> = HashMap::new();
    for (triangle_index, triangle) in triangles.iter().enumerate() {
        if processed[triangle_index] {
            continue;
        }
        for j in 0..3 {
            let first = triangle[j];
            let second = triangle[(j + 1) % 3];
            if !movable[first] || !movable[second] {
                continue;
            }
            if vertices[first].distance_squared(vertices[second]) >= threshold_squared {
                continue;
            }
            let Some(&(opposite_face, _)) = edge_map.get(&(second, first)) else {
                continue;
            };
            let third = triangle[(j + 2) % 3];
            let first_closer =
                vertices[first].distance_squared(vertices[third]) < vertices[second].distance_squared(vertices[third]);
            if first_closer && adjacent_faces[second] <= WELD_MAX_ADJACENT_FACES && !weld_map.contains_key(&second) {
                weld_map.insert(second, first);
            } else if adjacent_faces[first] <= WELD_MAX_ADJACENT_FACES && !weld_map.contains_key(&first) {
                weld_map.insert(first, second);
            }
            processed[triangle_index] = true;
            processed[opposite_face] = true;
            break;
        }
    }

    let resolve = |index: usize| -> Option<usize> {
        let mut current = index;
        for _ in 0..WELD_MAX_FOLLOW {
            match weld_map.get(&current) {
                Some(&next) => current = next,
                None => return Some(current),
            }
        }
        None
    };

    let mut new_index_of: HashMap<usize, usize> = HashMap::new();
    let mut welded_vertices = Vec::new();
    let mut welded_triangles = Vec::with_capacity(triangles.len());
    let mut welded_count = 0;
    for triangle in triangles {
        let mapped: Option<Vec<usize>> = triangle.iter().map(|&index| resolve(index)).collect();
        let Some(mapped) = mapped else {
            debug!("Weld chain did not terminate, dropping triangle");
            continue;
        };
        if mapped[0] == mapped[1] || mapped[1] == mapped[2] || mapped[2] == mapped[0] {
            welded_count += 1;
            continue;
        }
        let mut face = [0usize; 3];
        for (slot, old_index) in face.iter_mut().zip(mapped) {
            *slot = *new_index_of.entry(old_index).or_insert_with(|| {
                welded_vertices.push(vertices[old_index]);
                welded_vertices.len() - 1
            });
        }
        welded_triangles.push(face);
    }

    (Mesh::from_triangles(welded_vertices, welded_triangles), welded_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two triangles sharing a very short edge `1-2`, plus one triangle
    /// that only touches vertex 2.
    fn sliver_fixture() -> (Vec<DVec3>, Vec<[usize; 3]>) {
        let vertices = vec![
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0005, 0.0, 0.0),
            DVec3::new(0.0, -1.0, 0.0),
            DVec3::new(3.0, 1.0, 0.0),
            DVec3::new(3.0, -1.0, 0.0),
        ];
        let triangles = vec![[0, 1, 2], [2, 1, 3], [4, 2, 5]];
        (vertices, triangles)
    }

    #[test]
    fn test_weld_collapses_short_edge() {
        let (vertices, triangles) = sliver_fixture();
        let (mesh, welded) = weld_vertices(&vertices, &triangles, 0.001, &HashSet::new());
        assert_eq!(welded, 2);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex_count(), 3);
        // The far vertex moved onto the one closer to the sliver's apex.
        assert_eq!(mesh.vertices()[1], DVec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_weld_never_moves_excluded_positions() {
        let (vertices, triangles) = sliver_fixture();
        let excluded: HashSet<PositionKey> = [PositionKey::new(vertices[2])].into_iter().collect();
        let (mesh, welded) = weld_vertices(&vertices, &triangles, 0.001, &excluded);
        assert_eq!(welded, 0);
        assert_eq!(mesh.triangle_count(), 3);
    }

    #[test]
    fn test_weld_ignores_edges_above_threshold() {
        let (vertices, triangles) = sliver_fixture();
        let (mesh, welded) = weld_vertices(&vertices, &triangles, 0.0001, &HashSet::new());
        assert_eq!(welded, 0);
        assert_eq!(mesh.vertex_count(), 6);
    }

    #[test]
    fn test_weld_requires_opposite_edge() {
        let (vertices, _) = sliver_fixture();
        let (mesh, welded) = weld_vertices(&vertices, &[[0, 1, 2]], 0.001, &HashSet::new());
        assert_eq!(welded, 0);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_weld_drops_unreferenced_vertices() {
        let vertices = vec![
            DVec3::ZERO,
            DVec3::X,
            DVec3::Y,
            DVec3::splat(5.0),
        ];
        let (mesh, welded) = weld_vertices(&vertices, &[[0, 1, 2]], 0.001, &HashSet::new());
        assert_eq!(welded, 0);
        assert_eq!(mesh.vertex_count(), 3);
    }
}
