//! # Tests for Mesh Generation
//!
//! Scenario tests over small snapshots of box-shaped tubes. A two-node
//! tube of radius 0.5 and length 1 along X sweeps the square profile into
//! an axis-aligned unit box, which keeps expected volumes exact.

use super::*;
use crate::position_key::PositionKey;
use crate::snapshot::PropertyBag;
use crate::topology::is_watertight;
use approx::assert_relative_eq;
use glam::DVec3;

fn bag(pairs: &[(&str, &str)]) -> PropertyBag {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Adds a node at a model space position (canvas Y and Z are flipped).
fn add_node(snapshot: &mut Snapshot, part_id: &str, node_id: &str, position: DVec3, radius: f64) {
    let (x, y, z, r) = (
        position.x.to_string(),
        (-position.y).to_string(),
        (-position.z).to_string(),
        radius.to_string(),
    );
    snapshot.nodes.insert(
        node_id.into(),
        bag(&[("id", node_id), ("partId", part_id), ("x", &x), ("y", &y), ("z", &z), ("radius", &r)]),
    );
}

fn add_leaf(snapshot: &mut Snapshot, part_id: &str) -> String {
    let component_id = format!("c-{part_id}");
    snapshot.components.insert(
        component_id.clone(),
        bag(&[("id", &component_id), ("linkDataType", "partId"), ("linkData", part_id)]),
    );
    component_id
}

/// Two-node tube part with its leaf component; returns the component id.
fn add_tube(snapshot: &mut Snapshot, part_id: &str, from: DVec3, to: DVec3, radius: f64) -> String {
    let (first, second) = (format!("{part_id}-a"), format!("{part_id}-b"));
    add_node(snapshot, part_id, &first, from, radius);
    add_node(snapshot, part_id, &second, to, radius);
    let edge_id = format!("{part_id}-e");
    snapshot.edges.insert(
        edge_id.clone(),
        bag(&[("id", &edge_id), ("partId", part_id), ("from", &first), ("to", &second)]),
    );
    snapshot.parts.insert(part_id.into(), bag(&[("id", part_id)]));
    add_leaf(snapshot, part_id)
}

fn set_part(snapshot: &mut Snapshot, part_id: &str, key: &str, value: &str) {
    if let Some(part) = snapshot.parts.get_mut(part_id) {
        part.insert(key.into(), value.into());
    }
}

fn set_children(snapshot: &mut Snapshot, children: &[&str]) {
    snapshot.root_component = bag(&[("children", &children.join(","))]);
}

fn set_mode(snapshot: &mut Snapshot, component_id: &str, mode: &str) {
    if let Some(component) = snapshot.components.get_mut(component_id) {
        component.insert("combineMode".into(), mode.into());
    }
}

/// Unit box on [0, 1] x [-0.5, 0.5]^2.
fn unit_box(snapshot: &mut Snapshot, part_id: &str) -> String {
    add_tube(snapshot, part_id, DVec3::ZERO, DVec3::X, 0.5)
}

/// Unit box shifted by (0.5, 0.25, 0.25), overlapping the unit box by
/// 0.5 * 0.75 * 0.75.
fn shifted_box(snapshot: &mut Snapshot, part_id: &str) -> String {
    add_tube(
        snapshot,
        part_id,
        DVec3::new(0.5, 0.25, 0.25),
        DVec3::new(1.5, 0.25, 0.25),
        0.5,
    )
}

const OVERLAP_VOLUME: f64 = 0.5 * 0.75 * 0.75;

fn volume(object: &Object) -> f64 {
    Mesh::from_triangles(object.vertices.clone(), object.triangles.clone())
        .signed_volume()
        .abs()
}

fn without_previews(mut object: Object) -> Object {
    object.preview_component_ids.clear();
    object.component_previews.clear();
    object
}

fn exact_generator() -> MeshGenerator {
    MeshGenerator::new(GeneratorOptions::default().with_recombine(false))
}

// =============================================================================
// OPTIONS TESTS
// =============================================================================

#[test]
fn test_options_defaults_from_constants() {
    let options = GeneratorOptions::default();
    assert!(options.weld_enabled);
    assert!(options.recombine);
    assert_relative_eq!(options.weld_distance, WELD_DISTANCE);
    assert_relative_eq!(options.smooth_threshold_degrees, DEFAULT_SMOOTH_THRESHOLD_DEGREES);
}

#[test]
fn test_options_builder_setters() {
    let options = GeneratorOptions::default()
        .with_weld(false)
        .with_weld_distance(0.01)
        .with_smooth_threshold(30.0)
        .with_default_part_color(Color::WHITE);
    assert!(!options.weld_enabled);
    assert_relative_eq!(options.weld_distance, 0.01);
    assert_relative_eq!(options.smooth_threshold_degrees, 30.0);
}

// =============================================================================
// ASSEMBLY TESTS
// =============================================================================

#[test]
fn test_generate_empty_snapshot() {
    let object = MeshGenerator::default().generate_uncached(&Snapshot::default());
    assert!(object.vertices.is_empty());
    assert!(object.triangles.is_empty());
    assert!(object.is_successful);
}

#[test]
fn test_generate_touching_tubes_share_one_ring() {
    let mut snapshot = Snapshot::default();
    let a = add_tube(&mut snapshot, "a", DVec3::ZERO, DVec3::X, 0.5);
    let b = add_tube(&mut snapshot, "b", DVec3::X, DVec3::new(2.0, 0.0, 0.0), 0.5);
    set_children(&mut snapshot, &[&a, &b]);

    let object = MeshGenerator::default().generate_uncached(&snapshot);
    assert!(object.is_successful);
    assert_eq!(object.vertices.len(), 8 + 8 - 4);
    assert!(is_watertight(&object.triangles));
    let ring = object
        .vertices
        .iter()
        .filter(|v| (v.x - 1.0).abs() < 1e-9)
        .count();
    assert_eq!(ring, 4);
    assert_relative_eq!(volume(&object), 2.0, epsilon = 1e-9);
}

#[test]
fn test_generate_output_arrays_align() {
    let mut snapshot = Snapshot::default();
    let a = unit_box(&mut snapshot, "a");
    set_children(&mut snapshot, &[&a]);

    let object = MeshGenerator::default().generate_uncached(&snapshot);
    let count = object.triangles.len();
    assert_eq!(object.triangle_normals.len(), count);
    assert_eq!(object.triangle_vertex_normals.len(), count);
    assert_eq!(object.triangle_colors.len(), count);
    assert_eq!(object.triangle_source_nodes.len(), count);
    assert_eq!(object.vertex_source_nodes.len(), object.vertices.len());
    // Side quads of the box come back as quads.
    assert!(object.triangle_and_quads.iter().any(|face| face.len() == 4));
    assert!(object.triangle_source_nodes.iter().all(|source| source.part_id == "a"));
}

#[test]
fn test_generate_part_color_reaches_triangles() {
    let mut snapshot = Snapshot::default();
    let a = unit_box(&mut snapshot, "a");
    set_part(&mut snapshot, "a", "color", "#ff0000");
    set_children(&mut snapshot, &[&a]);

    let object = MeshGenerator::default().generate_uncached(&snapshot);
    assert!(!object.triangle_colors.is_empty());
    for color in &object.triangle_colors {
        assert_eq!(color.r, 1.0);
        assert_eq!(color.g, 0.0);
    }
}

#[test]
fn test_generate_single_node_part_is_box() {
    let mut snapshot = Snapshot::default();
    add_node(&mut snapshot, "p", "n", DVec3::ZERO, 0.5);
    snapshot.parts.insert("p".into(), bag(&[("id", "p")]));
    let c = add_leaf(&mut snapshot, "p");
    set_children(&mut snapshot, &[&c]);

    let object = MeshGenerator::default().generate_uncached(&snapshot);
    assert_eq!(object.vertices.len(), 8);
    assert!(is_watertight(&object.triangles));
    assert_eq!(object.nodes.len(), 1);
}

// =============================================================================
// BOOLEAN TESTS
// =============================================================================

#[test]
fn test_generate_union_of_overlapping_tubes() {
    let mut snapshot = Snapshot::default();
    let a = unit_box(&mut snapshot, "a");
    let d = shifted_box(&mut snapshot, "d");
    set_children(&mut snapshot, &[&a, &d]);

    let object = exact_generator().generate_uncached(&snapshot);
    assert!(object.is_successful);
    assert!(is_watertight(&object.triangles));
    assert_relative_eq!(volume(&object), 2.0 - OVERLAP_VOLUME, epsilon = 1e-6);
}

#[test]
fn test_generate_recombined_union_is_closed() {
    let mut snapshot = Snapshot::default();
    let a = unit_box(&mut snapshot, "a");
    let d = shifted_box(&mut snapshot, "d");
    set_children(&mut snapshot, &[&a, &d]);

    let object = MeshGenerator::default().generate_uncached(&snapshot);
    assert!(object.is_successful);
    assert!(is_watertight(&object.triangles));
}

#[test]
fn test_generate_difference_of_overlapping_tubes() {
    let mut snapshot = Snapshot::default();
    let a = unit_box(&mut snapshot, "a");
    let d = shifted_box(&mut snapshot, "d");
    set_mode(&mut snapshot, &d, "Inversion");
    set_children(&mut snapshot, &[&a, &d]);

    let object = exact_generator().generate_uncached(&snapshot);
    assert!(object.is_successful);
    assert!(is_watertight(&object.triangles));
    assert_relative_eq!(volume(&object), 1.0 - OVERLAP_VOLUME, epsilon = 1e-6);
}

#[test]
fn test_generate_union_order_does_not_matter() {
    let mut forward = Snapshot::default();
    let a = unit_box(&mut forward, "a");
    let d = shifted_box(&mut forward, "d");
    let mut backward = forward.clone();
    set_children(&mut forward, &[&a, &d]);
    set_children(&mut backward, &[&d, &a]);

    let generator = exact_generator();
    let first = generator.generate_uncached(&forward);
    let second = generator.generate_uncached(&backward);
    assert_relative_eq!(volume(&first), volume(&second), epsilon = 1e-6);
    assert!(is_watertight(&second.triangles));
}

#[test]
fn test_generate_inversion_position_changes_result() {
    // Disjoint boxes a on [0, 1] and b on [2, 3]; c overlaps only b.
    let mut early = Snapshot::default();
    let a = unit_box(&mut early, "a");
    let b = add_tube(&mut early, "b", DVec3::new(2.0, 0.0, 0.0), DVec3::new(3.0, 0.0, 0.0), 0.5);
    let c = add_tube(
        &mut early,
        "c",
        DVec3::new(1.5, 0.25, 0.25),
        DVec3::new(2.5, 0.25, 0.25),
        0.5,
    );
    set_mode(&mut early, &c, "Inversion");
    let mut late = early.clone();
    set_children(&mut early, &[&a, &c, &b]);
    set_children(&mut late, &[&a, &b, &c]);

    let generator = exact_generator();
    // (a - c) + b: c misses a, so both boxes survive whole.
    assert_relative_eq!(volume(&generator.generate_uncached(&early)), 2.0, epsilon = 1e-6);
    // (a + b) - c: c carves a corner out of b.
    assert_relative_eq!(
        volume(&generator.generate_uncached(&late)),
        2.0 - OVERLAP_VOLUME,
        epsilon = 1e-6
    );
}

#[test]
fn test_generate_weld_converges() {
    let mut snapshot = Snapshot::default();
    let a = unit_box(&mut snapshot, "a");
    let d = shifted_box(&mut snapshot, "d");
    set_children(&mut snapshot, &[&a, &d]);

    let mut cache = GeneratedCacheContext::new();
    let object = MeshGenerator::default().generate(&snapshot, &mut cache);
    let root = &cache.components[ROOT_COMPONENT_ID];
    let (_, welded) = weld_vertices(&object.vertices, &object.triangles, WELD_DISTANCE, &root.none_seam_vertices);
    assert_eq!(welded, 0);
    // Sweep corners are never welded away.
    let keys: BTreeSet<PositionKey> = object.vertices.iter().map(|v| PositionKey::new(*v)).collect();
    assert!(keys.contains(&PositionKey::new(DVec3::new(0.0, -0.5, -0.5))));
    assert!(keys.contains(&PositionKey::new(DVec3::new(1.5, 0.75, 0.75))));
}

// =============================================================================
// FAILURE TESTS
// =============================================================================

#[test]
fn test_generate_failed_part_is_contained() {
    let mut snapshot = Snapshot::default();
    let a = unit_box(&mut snapshot, "a");
    // Two nodes and no edge cannot be swept.
    add_node(&mut snapshot, "m", "m-a", DVec3::new(1.5, 0.0, 0.0), 0.5);
    add_node(&mut snapshot, "m", "m-b", DVec3::new(2.5, 0.0, 0.0), 0.5);
    snapshot.parts.insert("m".into(), bag(&[("id", "m")]));
    let m = add_leaf(&mut snapshot, "m");
    let b = add_tube(&mut snapshot, "b", DVec3::new(3.0, 0.0, 0.0), DVec3::new(4.0, 0.0, 0.0), 0.5);
    set_children(&mut snapshot, &[&a, &m, &b]);

    let mut cache = GeneratedCacheContext::new();
    let object = MeshGenerator::default().generate(&snapshot, &mut cache);
    assert!(!object.is_successful);
    assert!(!cache.parts["m"].is_successful);
    assert!(object.vertices.iter().any(|v| v.x.abs() < 1e-9));
    assert!(object.vertices.iter().any(|v| (v.x - 4.0).abs() < 1e-9));
    assert_relative_eq!(volume(&object), 2.0, epsilon = 1e-6);
}

#[test]
fn test_generate_dangling_references_are_skipped() {
    let mut snapshot = Snapshot::default();
    let a = unit_box(&mut snapshot, "a");
    snapshot.edges.insert(
        "stray".into(),
        bag(&[("id", "stray"), ("partId", "a"), ("from", "a-a"), ("to", "missing")]),
    );
    let ghost = add_leaf(&mut snapshot, "ghost");
    set_children(&mut snapshot, &[&a, &ghost, "no-such-component"]);

    let object = MeshGenerator::default().generate_uncached(&snapshot);
    assert!(object.is_successful);
    assert_eq!(object.vertices.len(), 8);
}

#[test]
fn test_generate_disabled_part_keeps_attribution_only() {
    let mut snapshot = Snapshot::default();
    let a = unit_box(&mut snapshot, "a");
    let d = shifted_box(&mut snapshot, "d");
    set_part(&mut snapshot, "d", "disabled", "true");
    set_children(&mut snapshot, &[&a, &d]);

    let object = MeshGenerator::default().generate_uncached(&snapshot);
    assert!(object.is_successful);
    assert_eq!(object.vertices.len(), 8);
    let disabled: Vec<_> = object.nodes.iter().filter(|node| node.part_id == "d").collect();
    assert_eq!(disabled.len(), 2);
    assert!(disabled.iter().all(|node| !node.joined));
}

// =============================================================================
// UNCOMBINED AND STITCHING TESTS
// =============================================================================

#[test]
fn test_generate_uncombined_component_is_appended() {
    let mut snapshot = Snapshot::default();
    let a = unit_box(&mut snapshot, "a");
    let u = shifted_box(&mut snapshot, "u");
    set_mode(&mut snapshot, &u, "Uncombined");
    set_children(&mut snapshot, &[&a, &u]);

    let object = MeshGenerator::default().generate_uncached(&snapshot);
    assert!(object.is_successful);
    assert_eq!(object.vertices.len(), 16);
    assert_eq!(object.triangles.len(), 24);
    assert_relative_eq!(volume(&object), 2.0, epsilon = 1e-9);
    assert!(object.nodes.iter().any(|node| node.part_id == "u"));
}

/// Three-node stitching-line part along X at height `z`; returns its
/// component id.
fn add_stitching_line(snapshot: &mut Snapshot, part_id: &str, z: f64) -> String {
    let ids: Vec<String> = (0..3).map(|i| format!("{part_id}-{i}")).collect();
    for (i, id) in ids.iter().enumerate() {
        add_node(snapshot, part_id, id, DVec3::new(i as f64, 0.0, z), 0.1);
    }
    for (i, pair) in ids.windows(2).enumerate() {
        let edge_id = format!("{part_id}-e{i}");
        snapshot.edges.insert(
            edge_id.clone(),
            bag(&[("id", &edge_id), ("partId", part_id), ("from", &pair[0]), ("to", &pair[1])]),
        );
    }
    snapshot
        .parts
        .insert(part_id.into(), bag(&[("id", part_id), ("target", "StitchingLine")]));
    add_leaf(snapshot, part_id)
}

#[test]
fn test_generate_stitching_lines() {
    let mut snapshot = Snapshot::default();
    let s0 = add_stitching_line(&mut snapshot, "s0", 0.0);
    let s1 = add_stitching_line(&mut snapshot, "s1", 1.0);
    set_children(&mut snapshot, &[&s0, &s1]);

    let mut cache = GeneratedCacheContext::new();
    let object = MeshGenerator::default().generate(&snapshot, &mut cache);
    assert_eq!(cache.stats().stitch_builds, 1);
    assert_eq!(cache.stats().part_builds, 0);
    assert!(!object.vertices.is_empty());
    assert_eq!(object.nodes.len(), 6);
}

#[test]
fn test_generate_lone_stitching_line_is_skipped() {
    let mut snapshot = Snapshot::default();
    let s0 = add_stitching_line(&mut snapshot, "s0", 3.0);
    let a = unit_box(&mut snapshot, "a");
    set_children(&mut snapshot, &[&s0, &a]);

    let mut cache = GeneratedCacheContext::new();
    let object = MeshGenerator::default().generate(&snapshot, &mut cache);
    assert!(object.is_successful);
    assert_eq!(cache.stats().stitch_builds, 0);
    assert_eq!(object.vertices.len(), 8);
    assert_eq!(object.nodes.len(), 5);
}

// =============================================================================
// MIRROR TESTS
// =============================================================================

#[test]
fn test_generate_mirrored_part_lands_on_negative_x() {
    let mut snapshot = Snapshot::default();
    let e = add_tube(&mut snapshot, "e", DVec3::new(3.0, 0.0, 0.0), DVec3::new(4.0, 0.0, 0.0), 0.5);
    set_part(&mut snapshot, "e", "xMirrored", "true");
    set_children(&mut snapshot, &[&e]);

    let generator = MeshGenerator::default();
    let object = generator.generate_uncached(&snapshot);
    assert!(object.is_successful);
    assert_eq!(object.vertices.len(), 16);
    assert!(is_watertight(&object.triangles));
    assert_relative_eq!(volume(&object), 2.0, epsilon = 1e-9);
    assert!(object.vertices.iter().any(|v| (v.x + 4.0).abs() < 1e-9));

    let mirror_id = reverse_uuid("e");
    let mirrored: Vec<_> = object.nodes.iter().filter(|node| node.part_id == mirror_id).collect();
    assert_eq!(mirrored.len(), 2);
    assert!(mirrored.iter().all(|node| node.origin.x < 0.0));
    assert!(mirrored.iter().all(|node| node.mirror_from_part_id.as_deref() == Some("e")));

    // Same ids and geometry on every run.
    assert_eq!(without_previews(generator.generate_uncached(&snapshot)), without_previews(object));
}

// =============================================================================
// CACHE TESTS
// =============================================================================

fn cached_scene() -> Snapshot {
    let mut snapshot = Snapshot::default();
    let a = unit_box(&mut snapshot, "a");
    let d = shifted_box(&mut snapshot, "d");
    let e = add_tube(&mut snapshot, "e", DVec3::new(3.0, 0.0, 0.0), DVec3::new(4.0, 0.0, 0.0), 0.5);
    set_part(&mut snapshot, "e", "xMirrored", "true");
    set_children(&mut snapshot, &[&a, &d, &e]);
    snapshot
}

#[test]
fn test_generate_primed_cache_does_no_work() {
    let snapshot = cached_scene();
    let generator = MeshGenerator::default();
    let mut cache = GeneratedCacheContext::new();
    let first = generator.generate(&snapshot, &mut cache);
    assert!(cache.stats().work() > 0);

    cache.reset_stats();
    let second = generator.generate(&snapshot, &mut cache);
    assert_eq!(cache.stats().work(), 0);
    assert!(cache.stats().component_hits > 0);
    assert_eq!(without_previews(first), without_previews(second));
}

#[test]
fn test_generate_primed_cache_skips_stitching() {
    let mut snapshot = Snapshot::default();
    let mut children: Vec<String> = (0..3)
        .map(|i| add_stitching_line(&mut snapshot, &format!("s{i}"), i as f64))
        .collect();
    children.push(add_tube(
        &mut snapshot,
        "t",
        DVec3::new(5.0, 0.0, 0.0),
        DVec3::new(6.0, 0.0, 0.0),
        0.5,
    ));
    let refs: Vec<&str> = children.iter().map(String::as_str).collect();
    set_children(&mut snapshot, &refs);

    let generator = MeshGenerator::default();
    let mut cache = GeneratedCacheContext::new();
    let first = generator.generate(&snapshot, &mut cache);
    assert_eq!(cache.stats().stitch_builds, 1);

    cache.reset_stats();
    let second = generator.generate(&snapshot, &mut cache);
    assert_eq!(cache.stats().work(), 0);
    assert_eq!(cache.stats().stitch_hits, 1);
    assert_eq!(without_previews(first), without_previews(second));

    set_part(&mut snapshot, "s1", "__dirty", "true");
    cache.reset_stats();
    generator.generate(&snapshot, &mut cache);
    assert_eq!(cache.stats().stitch_builds, 1);
    assert_eq!(cache.stats().part_builds, 0);
}

#[test]
fn test_generate_cached_matches_uncached() {
    let snapshot = cached_scene();
    let generator = MeshGenerator::default();
    let mut cache = GeneratedCacheContext::new();
    generator.generate(&snapshot, &mut cache);
    let cached = generator.generate(&snapshot, &mut cache);
    let fresh = generator.generate_uncached(&snapshot);
    assert_eq!(without_previews(cached), without_previews(fresh));
}

#[test]
fn test_generate_dirty_part_rebuilds_only_itself() {
    let mut snapshot = cached_scene();
    let generator = MeshGenerator::default();
    let mut cache = GeneratedCacheContext::new();
    generator.generate(&snapshot, &mut cache);

    set_part(&mut snapshot, "a", "__dirty", "true");
    cache.reset_stats();
    let object = generator.generate(&snapshot, &mut cache);
    assert!(object.is_successful);
    assert_eq!(cache.stats().part_builds, 1);
    assert!(cache.stats().combines >= 1);
    assert!(object.preview_component_ids.contains("c-a"));
    assert!(!object.preview_component_ids.contains("c-d"));
}

#[test]
fn test_generate_dirty_cut_face_donor_rebuilds_borrower() {
    let mut snapshot = cached_scene();
    for (i, (x, y)) in [(0.0, 0.0), (1.0, 0.0), (0.5, 1.0)].into_iter().enumerate() {
        add_node(&mut snapshot, "f", &format!("f-{i}"), DVec3::new(x, y, 0.0), 0.1);
    }
    for (i, (from, to)) in [("f-0", "f-1"), ("f-1", "f-2"), ("f-2", "f-0")].into_iter().enumerate() {
        let edge_id = format!("f-e{i}");
        snapshot.edges.insert(
            edge_id.clone(),
            bag(&[("id", &edge_id), ("partId", "f"), ("from", from), ("to", to)]),
        );
    }
    snapshot.parts.insert("f".into(), bag(&[("id", "f"), ("target", "CutFace")]));
    let f = add_leaf(&mut snapshot, "f");
    snapshot.root_component = bag(&[("children", &format!("c-a,c-d,c-e,{f}"))]);
    set_part(&mut snapshot, "d", "cutFace", "f");

    let generator = MeshGenerator::default();
    let mut cache = GeneratedCacheContext::new();
    generator.generate(&snapshot, &mut cache);
    assert!(!cache.parts["d"].vertices.is_empty());

    set_part(&mut snapshot, "f", "__dirty", "true");
    cache.reset_stats();
    generator.generate(&snapshot, &mut cache);
    assert_eq!(cache.stats().part_builds, 1);
    assert!(cache.parts.contains_key("d"));
}

#[test]
fn test_generate_prunes_removed_parts() {
    let mut snapshot = cached_scene();
    let generator = MeshGenerator::default();
    let mut cache = GeneratedCacheContext::new();
    generator.generate(&snapshot, &mut cache);
    assert!(cache.parts.contains_key("d"));

    snapshot.parts.remove("d");
    snapshot.components.remove("c-d");
    snapshot.root_component = bag(&[("children", "c-a,c-e")]);
    let object = generator.generate(&snapshot, &mut cache);
    assert!(!cache.parts.contains_key("d"));
    assert!(!cache.components.contains_key("c-d"));
    assert!(cache.combinations.keys().all(|key| !key.contains("c-d")));
    assert!(object.nodes.iter().all(|node| node.part_id != "d"));
}
