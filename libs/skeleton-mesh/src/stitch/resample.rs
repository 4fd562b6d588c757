//! Arc-length resampling of spline polylines.

use config::constants::LENGTH_EPSILON;
use glam::DVec3;

/// Total length of a polyline.
pub fn polyline_length(points: &[DVec3]) -> f64 {
    points.windows(2).map(|pair| pair[0].distance(pair[1])).sum()
}

/// Splits a polyline into `segments` pieces of equal arc length.
///
/// Returns `segments + 1` points with linearly interpolated radii. The
/// first and last points are the polyline's own endpoints. A polyline of
/// zero length collapses to its midpoint.
pub fn split_polyline_to_segments(points: &[DVec3], radii: &[f64], segments: usize) -> (Vec<DVec3>, Vec<f64>) {
    let mut target_points = Vec::with_capacity(segments + 1);
    let mut target_radii = Vec::with_capacity(segments + 1);
    if points.len() < 2 || radii.len() != points.len() || segments == 0 {
        return (target_points, target_radii);
    }

    let total_length = polyline_length(points);
    if total_length < LENGTH_EPSILON {
        let middle = (points[0] + points[points.len() - 1]) * 0.5;
        let radius = (radii[0] + radii[radii.len() - 1]) * 0.5;
        target_points.resize(segments + 1, middle);
        target_radii.resize(segments + 1, radius);
        return (target_points, target_radii);
    }

    let segment_length = total_length / segments as f64;
    let mut want_length = segment_length;
    target_points.push(points[0]);
    target_radii.push(radii[0]);
    for j in 1..points.len() {
        let i = j - 1;
        let mut line_length = points[i].distance(points[j]);
        let mut start = points[i];
        let mut start_radius = radii[i];
        while line_length >= want_length && line_length > LENGTH_EPSILON {
            let t = want_length / line_length;
            let position = start.lerp(points[j], t);
            let radius = start_radius + (radii[j] - start_radius) * t;
            target_points.push(position);
            target_radii.push(radius);
            line_length -= want_length;
            start = position;
            start_radius = radius;
            want_length = segment_length;
        }
        want_length -= line_length;
    }

    target_points.truncate(segments + 1);
    target_radii.truncate(segments + 1);
    let last = points[points.len() - 1];
    let last_radius = radii[radii.len() - 1];
    if target_points.len() < segments + 1 {
        target_points.push(last);
        target_radii.push(last_radius);
    } else if let (Some(point), Some(radius)) = (target_points.last_mut(), target_radii.last_mut()) {
        *point = last;
        *radius = last_radius;
    }
    (target_points, target_radii)
}
