//! # Quad Recovery
//!
//! Part sweeps produce quads, but everything after the boolean stage is
//! triangles. The diagonals of the original quads are remembered by
//! position, and two triangles meeting along such a diagonal are joined
//! back into one quad for the mixed-arity output.

use crate::position_key::{PositionKey, PositionKeyPair};
use crate::topology::triangle_edge_map;
use glam::DVec3;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Records both diagonals of every quad face.
pub fn collect_shared_quad_edges(vertices: &[DVec3], faces: &[Vec<usize>], shared: &mut BTreeSet<PositionKeyPair>) {
    for face in faces.iter().filter(|face| face.len() == 4) {
        shared.insert((PositionKey::new(vertices[face[0]]), PositionKey::new(vertices[face[2]])));
        shared.insert((PositionKey::new(vertices[face[1]]), PositionKey::new(vertices[face[3]])));
    }
}

/// Joins triangle pairs along recorded quad diagonals.
///
/// Each triangle joins at most once. Quads come first in the result, in
/// directed edge order, followed by the remaining triangles in input order.
pub fn recover_quads(
    vertices: &[DVec3],
    triangles: &[[usize; 3]],
    shared: &BTreeSet<PositionKeyPair>,
) -> Vec<Vec<usize>> {
    let keys: Vec<PositionKey> = vertices.iter().map(|v| PositionKey::new(*v)).collect();
    let edge_map: BTreeMap<(usize, usize), (usize, usize)> = triangle_edge_map(triangles).into_iter().collect();

    let mut joined: HashSet<usize> = HashSet::new();
    let mut faces = Vec::with_capacity(triangles.len());
    for (&(from, to), &(triangle, opposite)) in &edge_map {
        if joined.contains(&triangle) {
            continue;
        }
        let pair = (keys[from], keys[to]);
        if !shared.contains(&pair) && !shared.contains(&(pair.1, pair.0)) {
            continue;
        }
        let Some(&(other_triangle, other_opposite)) = edge_map.get(&(to, from)) else {
            continue;
        };
        if other_triangle == triangle || joined.contains(&other_triangle) {
            continue;
        }
        joined.insert(triangle);
        joined.insert(other_triangle);
        faces.push(vec![opposite, from, other_opposite, to]);
    }
    faces.extend(
        triangles
            .iter()
            .enumerate()
            .filter(|(index, _)| !joined.contains(index))
            .map(|(_, triangle)| triangle.to_vec()),
    );
    faces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulate::triangulate_faces;

    fn square() -> (Vec<DVec3>, Vec<Vec<usize>>) {
        let vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ];
        (vertices, vec![vec![0, 1, 2, 3]])
    }

    #[test]
    fn test_collect_shared_quad_edges_records_diagonals() {
        let (vertices, faces) = square();
        let mut shared = BTreeSet::new();
        collect_shared_quad_edges(&vertices, &faces, &mut shared);
        assert_eq!(shared.len(), 2);
        assert!(shared.contains(&(PositionKey::new(vertices[0]), PositionKey::new(vertices[2]))));
    }

    #[test]
    fn test_collect_shared_quad_edges_skips_triangles() {
        let (vertices, _) = square();
        let mut shared = BTreeSet::new();
        collect_shared_quad_edges(&vertices, &[vec![0, 1, 2]], &mut shared);
        assert!(shared.is_empty());
    }

    #[test]
    fn test_recover_quads_rejoins_split_quad() {
        let (vertices, faces) = square();
        let mut shared = BTreeSet::new();
        collect_shared_quad_edges(&vertices, &faces, &mut shared);
        let triangles = triangulate_faces(&vertices, &faces);
        let recovered = recover_quads(&vertices, &triangles, &shared);
        assert_eq!(recovered.len(), 1);
        assert_eq!(recovered[0].len(), 4);
        let mut corners = recovered[0].clone();
        corners.sort_unstable();
        assert_eq!(corners, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_recover_quads_keeps_unmatched_triangles() {
        let (vertices, faces) = square();
        let triangles = triangulate_faces(&vertices, &faces);
        let recovered = recover_quads(&vertices, &triangles, &BTreeSet::new());
        assert_eq!(recovered, vec![vec![0, 1, 2], vec![2, 3, 0]]);
    }

    #[test]
    fn test_recover_quads_matches_moved_indices_by_position() {
        // Same square with its vertices listed in another order.
        let (vertices, faces) = square();
        let mut shared = BTreeSet::new();
        collect_shared_quad_edges(&vertices, &faces, &mut shared);
        let shuffled = vec![vertices[2], vertices[3], vertices[0], vertices[1]];
        let triangles = vec![[2, 3, 0], [0, 1, 2]];
        let recovered = recover_quads(&shuffled, &triangles, &shared);
        assert_eq!(recovered.len(), 1);
    }
}
