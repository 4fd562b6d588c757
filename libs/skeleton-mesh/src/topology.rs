//! # Topology Queries
//!
//! Half-edge level checks shared by the combiner, recombiner and the
//! generator.

use std::collections::{HashMap, HashSet};

/// Returns true when every directed edge is unique and has its reverse.
///
/// This is the watertightness condition every combined mesh must satisfy.
///
/// # Example
///
/// ```rust
/// use skeleton_mesh::topology::is_watertight;
///
/// let tetrahedron = vec![[0, 1, 2], [0, 3, 1], [1, 3, 2], [2, 3, 0]];
/// assert!(is_watertight(&tetrahedron));
/// assert!(!is_watertight(&tetrahedron[..3]));
/// ```
pub fn is_watertight<F: AsRef<[usize]>>(faces: &[F]) -> bool {
    let mut half_edges = HashSet::new();
    for face in faces {
        let face = face.as_ref();
        for i in 0..face.len() {
            let j = (i + 1) % face.len();
            if !half_edges.insert((face[i], face[j])) {
                return false;
            }
        }
    }
    half_edges
        .iter()
        .all(|&(from, to)| half_edges.contains(&(to, from)))
}

/// Maps every directed triangle edge to `(triangle index, opposite corner)`.
pub fn triangle_edge_map(triangles: &[[usize; 3]]) -> HashMap<(usize, usize), (usize, usize)> {
    let mut map = HashMap::with_capacity(triangles.len() * 3);
    for (index, triangle) in triangles.iter().enumerate() {
        for j in 0..3 {
            let next = (j + 1) % 3;
            let opposite = (j + 2) % 3;
            map.insert((triangle[j], triangle[next]), (index, triangle[opposite]));
        }
    }
    map
}

/// Maps every directed face edge to the face index owning it.
pub fn half_edge_to_face_map<F: AsRef<[usize]>>(faces: &[F]) -> HashMap<(usize, usize), usize> {
    let mut map = HashMap::new();
    for (index, face) in faces.iter().enumerate() {
        let face = face.as_ref();
        for i in 0..face.len() {
            let j = (i + 1) % face.len();
            map.insert((face[i], face[j]), index);
        }
    }
    map
}
