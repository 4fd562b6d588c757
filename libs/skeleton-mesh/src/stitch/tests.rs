//! # Tests for Stitch Mesh Builder

use super::*;
use crate::topology::is_watertight;

fn line(source: &str, z: f64, count: usize, radius: f64) -> Spline {
    let nodes = (0..count)
        .map(|i| StitchNode {
            origin: DVec3::new(i as f64, 0.0, z),
            radius,
        })
        .collect();
    Spline::new(source, nodes, false)
}

fn circle(source: &str, z: f64, count: usize) -> Spline {
    let nodes = (0..count)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / count as f64;
            StitchNode {
                origin: DVec3::new(angle.cos(), angle.sin(), z),
                radius: 0.1,
            }
        })
        .collect();
    Spline::new(source, nodes, true)
}

fn point(source: &str, origin: DVec3) -> Spline {
    Spline::new(source, vec![StitchNode { origin, radius: 0.1 }], false)
}

// =============================================================================
// SEGMENT TESTS
// =============================================================================

#[test]
fn test_stitch_segments_rounded_to_even() {
    let builder = StitchMeshBuilder::new(vec![line("a", 0.0, 4, 0.1), line("b", 1.0, 2, 0.1)]);
    assert_eq!(builder.target_segments(), 4);
}

#[test]
fn test_stitch_segments_have_minimum() {
    let builder = StitchMeshBuilder::new(vec![line("a", 0.0, 2, 0.1), line("b", 1.0, 2, 0.1)]);
    assert_eq!(builder.target_segments(), MIN_STITCH_SEGMENTS);
}

#[test]
fn test_stitch_single_node_spline_is_closing() {
    let spline = point("a", DVec3::ZERO);
    assert!(spline.is_closing);
    assert!(!spline.is_circle);
}

// =============================================================================
// CLOSING STRATEGY TESTS
// =============================================================================

#[test]
fn test_stitch_open_splines_thicken_into_closed_wall() {
    let mut builder = StitchMeshBuilder::new(vec![line("a", 0.0, 3, 0.1), line("b", 1.0, 3, 0.1)]);
    let mesh = builder.build().unwrap();
    // Two rows of three points, doubled by thickening.
    assert_eq!(mesh.vertices.len(), 12);
    assert!(is_watertight(&mesh.faces));
    assert!(Mesh::from_faces(mesh.vertices.clone(), &mesh.faces).signed_volume() > 0.0);
}

#[test]
fn test_stitch_circles_close_with_center_lids() {
    let mut builder = StitchMeshBuilder::new(vec![circle("a", 0.0, 6), circle("b", 1.0, 6)]);
    let mesh = builder.build().unwrap();
    assert_eq!(mesh.vertices.len(), 6 + 6 + 2);
    assert!(is_watertight(&mesh.faces));
    assert!(Mesh::from_faces(mesh.vertices.clone(), &mesh.faces).signed_volume() > 0.0);
}

#[test]
fn test_stitch_circles_use_closing_points() {
    let splines = vec![
        point("front", DVec3::new(0.0, 0.0, -1.0)),
        circle("a", 0.0, 4),
        point("back", DVec3::new(0.0, 0.0, 1.0)),
    ];
    let mut builder = StitchMeshBuilder::new(splines);
    let mesh = builder.build().unwrap();
    assert_eq!(mesh.vertices.len(), 4 + 2);
    assert!(is_watertight(&mesh.faces));
    assert_eq!(mesh.vertex_splines.iter().filter(|&&s| s == 0).count(), 1);
}

#[test]
fn test_stitch_front_and_back_points_close() {
    let splines = vec![
        point("front", DVec3::new(1.0, 0.0, -1.0)),
        line("a", 0.0, 3, 0.1),
        line("b", 1.0, 3, 0.1),
        point("back", DVec3::new(1.0, 0.0, 2.0)),
    ];
    let mut builder = StitchMeshBuilder::new(splines);
    let mesh = builder.build().unwrap();
    assert!(is_watertight(&mesh.faces));
}

#[test]
fn test_stitch_one_end_point_closes() {
    let splines = vec![point("front", DVec3::new(1.0, 0.0, -1.0)), line("a", 0.0, 3, 0.1)];
    let mut builder = StitchMeshBuilder::new(splines);
    let mesh = builder.build().unwrap();
    assert!(is_watertight(&mesh.faces));
}

#[test]
fn test_stitch_records_quads() {
    let mut builder = StitchMeshBuilder::new(vec![line("a", 0.0, 3, 0.1), line("b", 1.0, 3, 0.1)]);
    let mesh = builder.build().unwrap();
    assert!(mesh.faces.iter().filter(|face| face.len() == 4).count() >= 4);
}

// =============================================================================
// FAILURE TESTS
// =============================================================================

#[test]
fn test_stitch_fails_with_single_spline() {
    let mut builder = StitchMeshBuilder::new(vec![line("a", 0.0, 3, 0.1)]);
    assert!(builder.build().is_err());
}

#[test]
fn test_stitch_fails_with_only_points() {
    let mut builder = StitchMeshBuilder::new(vec![point("a", DVec3::ZERO), point("b", DVec3::ONE)]);
    assert!(builder.build().is_err());
}
