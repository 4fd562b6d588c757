//! # Normals
//!
//! Flat triangle normals and threshold-smoothed corner normals.
//!
//! Each corner starts from its triangle normal weighted by triangle area and
//! corner angle. Every other triangle sharing the corner's vertex whose
//! normal lies within the threshold angle adds its own weighted corner
//! normal. Sharp creases keep their flat shading.

use glam::DVec3;
use rayon::prelude::*;
use std::collections::HashMap;

/// Unit normal of every triangle, zero for degenerate ones.
pub fn triangle_normals(vertices: &[DVec3], triangles: &[[usize; 3]]) -> Vec<DVec3> {
    triangles
        .par_iter()
        .map(|t| {
            let (a, b, c) = (vertices[t[0]], vertices[t[1]], vertices[t[2]]);
            (b - a).cross(c - a).normalize_or_zero()
        })
        .collect()
}

/// Smoothed normal for each corner of each triangle.
pub fn smooth_normal(
    vertices: &[DVec3],
    triangles: &[[usize; 3]],
    triangle_normals: &[DVec3],
    threshold_degrees: f64,
) -> Vec<[DVec3; 3]> {
    let mut incident: Vec<Vec<(usize, usize)>> = vec![Vec::new(); vertices.len()];
    let mut weighted: Vec<[DVec3; 3]> = Vec::with_capacity(triangles.len());
    for (triangle_index, t) in triangles.iter().enumerate() {
        let (a, b, c) = (vertices[t[0]], vertices[t[1]], vertices[t[2]]);
        let area = (b - a).cross(c - a).length() * 0.5;
        let angles = [
            (b - a).angle_between(c - a).to_degrees(),
            (a - b).angle_between(c - b).to_degrees(),
            (a - c).angle_between(b - c).to_degrees(),
        ];
        let normal = triangle_normals[triangle_index];
        let mut corners = [DVec3::ZERO; 3];
        for corner in 0..3 {
            corners[corner] = finite_or_zero(normal * area * angles[corner]);
            incident[t[corner]].push((triangle_index, corner));
        }
        weighted.push(corners);
    }

    let mut result = weighted.clone();
    let mut degrees_between: HashMap<(usize, usize), f64> = HashMap::new();
    for around in &incident {
        for &(triangle, corner) in around {
            for &(other_triangle, other_corner) in around {
                if triangle == other_triangle {
                    continue;
                }
                let key = (triangle.min(other_triangle), triangle.max(other_triangle));
                let degrees = *degrees_between.entry(key).or_insert_with(|| {
                    triangle_normals[triangle]
                        .angle_between(triangle_normals[other_triangle])
                        .to_degrees()
                });
                if degrees > threshold_degrees {
                    continue;
                }
                result[triangle][corner] += weighted[other_triangle][other_corner];
            }
        }
    }
    for corners in &mut result {
        for normal in corners.iter_mut() {
            *normal = normal.normalize_or_zero();
        }
    }
    result
}

fn finite_or_zero(value: DVec3) -> DVec3 {
    if value.is_finite() {
        value
    } else {
        DVec3::ZERO
    }
}
