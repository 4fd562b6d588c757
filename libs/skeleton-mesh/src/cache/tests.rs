//! # Tests for Generated Cache

use super::*;
use crate::snapshot::PropertyBag;

fn bag(pairs: &[(&str, &str)]) -> PropertyBag {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn snapshot_with(parts: &[&str], components: &[&str]) -> Snapshot {
    let mut snapshot = Snapshot::default();
    for id in parts {
        snapshot.parts.insert(id.to_string(), bag(&[("id", id)]));
    }
    for id in components {
        snapshot.components.insert(id.to_string(), bag(&[("id", id)]));
    }
    snapshot
}

// =============================================================================
// COMBINATION TESTS
// =============================================================================

#[test]
fn test_cache_erases_combinations_by_token() {
    let mut cache = GeneratedCacheContext::new();
    cache.combinations.insert("[a]|[b]+[c]!".into(), Some(Mesh::new()));
    cache.combinations.insert("[d]+[e]".into(), None);
    cache.erase_combinations_containing("b");
    assert!(!cache.combinations.contains_key("[a]|[b]+[c]!"));
    assert!(cache.combinations.contains_key("[d]+[e]"));
}

#[test]
fn test_cache_tokens_keep_dashed_ids_apart() {
    let first = format!("{}-{}", combination_token("x"), combination_token("y-z"));
    let second = format!("{}-{}", combination_token("x-y"), combination_token("z"));
    assert_ne!(first, second);

    let mut cache = GeneratedCacheContext::new();
    cache.combinations.insert(first.clone(), None);
    cache.combinations.insert(second.clone(), None);
    cache.erase_combinations_containing("y");
    assert_eq!(cache.combinations.len(), 2);
    cache.erase_combinations_containing("y-z");
    assert!(!cache.combinations.contains_key(&first));
    assert!(cache.combinations.contains_key(&second));
}

#[test]
fn test_cache_erases_stitches_of_dirty_component() {
    let mut cache = GeneratedCacheContext::new();
    cache.stitches.insert("[s0]:[s1]".into(), GeneratedStitch::default());
    cache.stitches.insert("[s2]:[s3]".into(), GeneratedStitch::default());
    cache.erase_combinations_containing("s1");
    assert!(!cache.stitches.contains_key("[s0]:[s1]"));
    assert!(cache.stitches.contains_key("[s2]:[s3]"));
}

// =============================================================================
// PRUNE TESTS
// =============================================================================

#[test]
fn test_cache_prune_drops_missing_parts() {
    let mut cache = GeneratedCacheContext::new();
    cache.parts.insert("p1".into(), GeneratedPart::default());
    cache.parts.insert("gone".into(), GeneratedPart::default());
    cache.prune(&snapshot_with(&["p1"], &[]));
    assert!(cache.parts.contains_key("p1"));
    assert!(!cache.parts.contains_key("gone"));
}

#[test]
fn test_cache_prune_keeps_mirror_of_present_source() {
    let mut cache = GeneratedCacheContext::new();
    cache.parts.insert("mirror".into(), GeneratedPart::default());
    cache.part_mirror_ids.insert("mirror".into(), "p1".into());
    cache.prune(&snapshot_with(&["p1"], &[]));
    assert!(cache.parts.contains_key("mirror"));

    cache.prune(&snapshot_with(&[], &[]));
    assert!(!cache.parts.contains_key("mirror"));
    assert!(cache.part_mirror_ids.is_empty());
}

#[test]
fn test_cache_prune_drops_components_and_their_combinations() {
    let mut cache = GeneratedCacheContext::new();
    cache.components.insert("c1".into(), GeneratedComponent::default());
    cache.components.insert("c2".into(), GeneratedComponent::default());
    cache.combinations.insert("[c1]+[c2]".into(), None);
    cache.combinations.insert("[c1]+[c3]".into(), None);
    cache.stitches.insert("[c2]:[c3]".into(), GeneratedStitch::default());
    cache.prune(&snapshot_with(&[], &["c1"]));
    assert!(cache.components.contains_key("c1"));
    assert!(!cache.components.contains_key("c2"));
    assert_eq!(cache.combinations.len(), 1);
    assert!(cache.combinations.contains_key("[c1]+[c3]"));
    assert!(cache.stitches.is_empty());
}

#[test]
fn test_cache_prune_drops_orphaned_mirror_ids() {
    let mut cache = GeneratedCacheContext::new();
    cache.part_mirror_ids.insert("mirror-kept".into(), "p1".into());
    cache.part_mirror_ids.insert("mirror-gone".into(), "p2".into());
    cache.prune(&snapshot_with(&["p1"], &[]));
    assert!(cache.part_mirror_ids.contains_key("mirror-kept"));
    assert!(!cache.part_mirror_ids.contains_key("mirror-gone"));
}

#[test]
fn test_cache_prune_keeps_root_component() {
    let mut cache = GeneratedCacheContext::new();
    cache
        .components
        .insert(crate::snapshot::ROOT_COMPONENT_ID.into(), GeneratedComponent::default());
    cache.prune(&Snapshot::default());
    assert_eq!(cache.components.len(), 1);
}

// =============================================================================
// COMPONENT AND STATS TESTS
// =============================================================================

#[test]
fn test_component_absorb_accumulates_sets() {
    let mut parent = GeneratedComponent::default();
    let mut child = GeneratedComponent::default();
    child.none_seam_vertices.insert(PositionKey::new(DVec3::X));
    child.edges.push(ObjectEdge {
        part_id: "p".into(),
        from_node_id: "a".into(),
        to_node_id: "b".into(),
    });
    parent.absorb(&child);
    parent.absorb(&child);
    assert_eq!(parent.none_seam_vertices.len(), 1);
    assert_eq!(parent.edges.len(), 2);
}

#[test]
fn test_cache_stats_hit_rate() {
    let stats = CacheStats {
        part_builds: 1,
        combines: 1,
        component_hits: 1,
        stitch_hits: 1,
        ..Default::default()
    };
    assert_eq!(stats.work(), 2);
    assert!((stats.hit_rate() - 0.5).abs() < 1e-12);
    assert_eq!(CacheStats::default().hit_rate(), 0.0);
}
