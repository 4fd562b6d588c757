//! # Face Triangulation
//!
//! Converts mixed-arity polygon faces into triangles. Triangles pass
//! through, quads split along their first diagonal, larger faces are ear
//! clipped in their best-fit plane with a fan as last resort.

use config::constants::LENGTH_EPSILON;
use glam::{DVec2, DVec3};

/// Triangulates every face and concatenates the result.
pub fn triangulate_faces(vertices: &[DVec3], faces: &[Vec<usize>]) -> Vec<[usize; 3]> {
    let mut triangles = Vec::with_capacity(faces.len() * 2);
    for face in faces {
        triangles.extend(triangulate_face(vertices, face));
    }
    triangles
}

/// Triangulates one face, keeping its winding.
pub fn triangulate_face(vertices: &[DVec3], face: &[usize]) -> Vec<[usize; 3]> {
    match face.len() {
        0..=2 => Vec::new(),
        3 => vec![[face[0], face[1], face[2]]],
        4 => vec![[face[0], face[1], face[2]], [face[2], face[3], face[0]]],
        _ => ear_clip(vertices, face),
    }
}

/// Triangulates a polygon that may carry collinear points along its edges,
/// never emitting zero-area triangles for them.
pub fn triangulate_polygon(vertices: &[DVec3], face: &[usize]) -> Vec<[usize; 3]> {
    match face.len() {
        0..=2 => Vec::new(),
        3 => vec![[face[0], face[1], face[2]]],
        _ => ear_clip(vertices, face),
    }
}

/// Newell normal of a polygon, not normalized.
pub fn polygon_normal(vertices: &[DVec3], face: &[usize]) -> DVec3 {
    let mut normal = DVec3::ZERO;
    for i in 0..face.len() {
        let current = vertices[face[i]];
        let next = vertices[face[(i + 1) % face.len()]];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal
}

fn ear_clip(vertices: &[DVec3], face: &[usize]) -> Vec<[usize; 3]> {
    let normal = polygon_normal(vertices, face);
    if normal.length() < LENGTH_EPSILON {
        return fan(face);
    }
    let normal = normal.normalize();
    let axis_u = normal.any_orthonormal_vector();
    let axis_v = normal.cross(axis_u);
    let projected: Vec<DVec2> = face
        .iter()
        .map(|&index| {
            let p = vertices[index];
            DVec2::new(p.dot(axis_u), p.dot(axis_v))
        })
        .collect();

    let mut remaining: Vec<usize> = (0..face.len()).collect();
    let mut triangles = Vec::with_capacity(face.len() - 2);
    while remaining.len() > 3 {
        let count = remaining.len();
        let ear = (0..count).find(|&i| {
            let a = remaining[(i + count - 1) % count];
            let b = remaining[i];
            let c = remaining[(i + 1) % count];
            is_ear(&projected, &remaining, a, b, c)
        });
        let Some(i) = ear else {
            break;
        };
        let a = remaining[(i + count - 1) % count];
        let b = remaining[i];
        let c = remaining[(i + 1) % count];
        triangles.push([face[a], face[b], face[c]]);
        remaining.remove(i);
    }
    if remaining.len() >= 3 {
        let rest: Vec<usize> = remaining.iter().map(|&i| face[i]).collect();
        triangles.extend(fan(&rest));
    }
    triangles
}

fn is_ear(projected: &[DVec2], remaining: &[usize], a: usize, b: usize, c: usize) -> bool {
    let (pa, pb, pc) = (projected[a], projected[b], projected[c]);
    if (pb - pa).perp_dot(pc - pb) <= 0.0 {
        return false;
    }
    !remaining
        .iter()
        .filter(|&&i| i != a && i != b && i != c)
        .any(|&i| point_in_triangle(projected[i], pa, pb, pc))
}

fn point_in_triangle(p: DVec2, a: DVec2, b: DVec2, c: DVec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0
}

fn fan(face: &[usize]) -> Vec<[usize; 3]> {
    (1..face.len().saturating_sub(1))
        .map(|i| [face[0], face[i], face[i + 1]])
        .collect()
}
