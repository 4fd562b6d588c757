//! # Generated Cache
//!
//! State that survives between generation passes. A caller keeps one
//! [`GeneratedCacheContext`] per document and hands it to every pass; the
//! pass reuses whatever is not dirty and evicts entries whose ids left the
//! snapshot.
//!
//! ## Contents
//!
//! - **parts**: raw sweep geometry and node attribution per part
//! - **components**: combined mesh per component plus the auxiliary sets
//!   needed by the final weld and quad recovery
//! - **combinations**: results of individual boolean steps, keyed by an
//!   operator annotated string of bracketed ids such as `[a]|[b]+[c]!`
//! - **stitches**: stitched meshes of stitching-line groups, keyed by the
//!   group's bracketed component ids joined with `:`
//! - **stats**: counters of the expensive work done, for tuning and tests
//!
//! Reads hand out clones; nothing in the cache is aliased by a pass result.

#[cfg(test)]
mod tests;

use crate::mesh::Mesh;
use crate::object::{Color, NodeVertex, ObjectEdge, ObjectNode};
use crate::position_key::{PositionKey, PositionKeyPair};
use crate::snapshot::Snapshot;
use glam::DVec3;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Geometry and attribution generated for one part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedPart {
    /// Sweep vertices, already mirrored for mirror clones
    pub vertices: Vec<DVec3>,
    /// Sweep faces, quads along the tube
    pub faces: Vec<Vec<usize>>,
    pub nodes: Vec<ObjectNode>,
    pub edges: Vec<ObjectEdge>,
    pub node_vertices: Vec<NodeVertex>,
    pub color: Color,
    /// Whether the sweep produced a closed mesh
    pub is_successful: bool,
    /// Whether the part takes part in boolean combination
    pub joined: bool,
}

/// Combined result of one component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedComponent {
    pub mesh: Option<Mesh>,
    /// Diagonals of the quads that produced this component's triangles
    pub shared_quad_edges: BTreeSet<PositionKeyPair>,
    /// Sweep positions the weld must not move
    pub none_seam_vertices: HashSet<PositionKey>,
    pub nodes: Vec<ObjectNode>,
    pub edges: Vec<ObjectEdge>,
    pub node_vertices: Vec<NodeVertex>,
}

impl GeneratedComponent {
    /// Clears everything derived during a previous pass.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Accumulates a child's auxiliary sets and attribution.
    pub fn absorb(&mut self, child: &GeneratedComponent) {
        self.none_seam_vertices.extend(child.none_seam_vertices.iter().copied());
        self.shared_quad_edges.extend(child.shared_quad_edges.iter().copied());
        self.nodes.extend(child.nodes.iter().cloned());
        self.edges.extend(child.edges.iter().cloned());
        self.node_vertices.extend(child.node_vertices.iter().cloned());
    }
}

/// Stitched mesh of one group of stitching-line components.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedStitch {
    /// `None` remembers a failed or empty stitch
    pub mesh: Option<Mesh>,
    pub shared_quad_edges: BTreeSet<PositionKeyPair>,
    /// Whether the stitch builder succeeded
    pub is_successful: bool,
}

/// Key fragment naming one id inside combination and stitch keys.
///
/// Brackets keep ids that contain operator characters apart, so `x` minus
/// `y-z` and `x-y` minus `z` get different keys.
pub fn combination_token(id: &str) -> String {
    format!("[{id}]")
}

/// Counters of work performed through a cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Part sweeps attempted
    pub part_builds: u64,
    /// Stitching meshes built
    pub stitch_builds: u64,
    /// Boolean operations run
    pub combines: u64,
    /// Components served from cache
    pub component_hits: u64,
    /// Boolean steps served from cache
    pub combination_hits: u64,
    /// Stitching groups served from cache
    pub stitch_hits: u64,
}

impl CacheStats {
    /// Builder and boolean work, excluding cache hits.
    pub fn work(&self) -> u64 {
        self.part_builds + self.stitch_builds + self.combines
    }

    /// Fraction of component and combination lookups served from cache.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.component_hits + self.combination_hits + self.stitch_hits;
        let total = hits + self.work();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

/// Cross-pass cache of generated geometry.
#[derive(Debug, Clone, Default)]
pub struct GeneratedCacheContext {
    pub parts: BTreeMap<String, GeneratedPart>,
    pub components: BTreeMap<String, GeneratedComponent>,
    /// Boolean step results; `None` remembers a failure
    pub combinations: BTreeMap<String, Option<Mesh>>,
    pub stitches: BTreeMap<String, GeneratedStitch>,
    /// Mirror clone part id to source part id
    pub part_mirror_ids: BTreeMap<String, String>,
    stats: CacheStats,
}

impl GeneratedCacheContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Work counters accumulated since creation or the last reset.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    pub(crate) fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }

    /// Drops every combination and stitch whose key mentions `id`.
    pub fn erase_combinations_containing(&mut self, id: &str) {
        let token = combination_token(id);
        let before = self.combinations.len() + self.stitches.len();
        self.combinations.retain(|key, _| !key.contains(&token));
        self.stitches.retain(|key, _| !key.contains(&token));
        let erased = before - self.combinations.len() - self.stitches.len();
        if erased > 0 {
            debug!(id, erased, "Erased cached combinations");
        }
    }

    /// Evicts entries whose ids are no longer in the snapshot.
    ///
    /// A mirror clone part survives while its source part exists, since the
    /// clone is recreated from the source every pass. Mirror tracking
    /// entries go once neither the clone nor its source is in the snapshot.
    pub fn prune(&mut self, snapshot: &Snapshot) {
        let mirror_ids = &mut self.part_mirror_ids;
        self.parts.retain(|id, _| {
            if snapshot.parts.contains_key(id) {
                return true;
            }
            if let Some(source) = mirror_ids.get(id) {
                if snapshot.parts.contains_key(source) {
                    return true;
                }
                mirror_ids.remove(id);
            }
            false
        });
        self.part_mirror_ids
            .retain(|clone, source| snapshot.parts.contains_key(clone) || snapshot.parts.contains_key(source));

        let removed: Vec<String> = self
            .components
            .keys()
            .filter(|id| snapshot.component(id).is_none())
            .cloned()
            .collect();
        for id in removed {
            self.erase_combinations_containing(&id);
            self.components.remove(&id);
        }
    }
}
