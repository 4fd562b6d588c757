//! # Mesh Generator
//!
//! Runs one generation pass over a [`Snapshot`] and assembles an
//! [`Object`].
//!
//! ## Pass Order
//!
//! ```text
//! mirror clones → prune cache → collect parts → dirty sets
//!   → combine root (post-order over the component tree)
//!   → weld → recover quads → uncombined + failed parts → postprocess
//! ```
//!
//! Failures never abort a pass. A part or boolean that fails logs a
//! warning, clears the success flag and contributes nothing (or its raw
//! geometry, for parts) to the combined mesh.
//!
//! ## Example
//!
//! ```rust
//! use skeleton_mesh::{GeneratedCacheContext, MeshGenerator, Snapshot};
//!
//! let snapshot = Snapshot::default();
//! let mut cache = GeneratedCacheContext::new();
//! let object = MeshGenerator::default().generate(&snapshot, &mut cache);
//! assert!(object.vertices.is_empty());
//! assert!(object.is_successful);
//! ```

mod component;
mod dirty;
mod mirror;
mod part;

#[cfg(test)]
mod tests;

pub use mirror::{preprocess_mirror, reverse_uuid};

use crate::cache::GeneratedCacheContext;
use crate::mesh::Mesh;
use crate::normals::{smooth_normal, triangle_normals};
use crate::object::{Color, ComponentPreview, Object, SourceNode};
use crate::quads::recover_quads;
use crate::snapshot::{component_children, CombineMode, Snapshot, ROOT_COMPONENT_ID};
use crate::source_node::resolve_triangle_source_node;
use crate::triangulate::triangulate_faces;
use crate::weld::weld_vertices;
use config::constants::{DEFAULT_PART_COLOR, DEFAULT_SMOOTH_THRESHOLD_DEGREES, WELD_DISTANCE, WELD_MAX_PASSES};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Runtime options of a [`MeshGenerator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorOptions {
    /// Collapse short seam edges after combination
    pub weld_enabled: bool,
    /// Edges shorter than this are welded
    pub weld_distance: f64,
    /// Corner normals within this angle are smoothed together
    pub smooth_threshold_degrees: f64,
    /// Run the seam recombiner after unions inside a combine run
    pub recombine: bool,
    /// Color of parts without a valid `color` attribute
    pub default_part_color: Color,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            weld_enabled: true,
            weld_distance: WELD_DISTANCE,
            smooth_threshold_degrees: DEFAULT_SMOOTH_THRESHOLD_DEGREES,
            recombine: true,
            default_part_color: Color::from(DEFAULT_PART_COLOR),
        }
    }
}

impl GeneratorOptions {
    pub fn with_weld(mut self, enabled: bool) -> Self {
        self.weld_enabled = enabled;
        self
    }

    pub fn with_weld_distance(mut self, distance: f64) -> Self {
        self.weld_distance = distance;
        self
    }

    pub fn with_smooth_threshold(mut self, degrees: f64) -> Self {
        self.smooth_threshold_degrees = degrees;
        self
    }

    pub fn with_recombine(mut self, recombine: bool) -> Self {
        self.recombine = recombine;
        self
    }

    pub fn with_default_part_color(mut self, color: Color) -> Self {
        self.default_part_color = color;
        self
    }
}

/// Entry point of mesh generation.
#[derive(Debug, Clone, Default)]
pub struct MeshGenerator {
    options: GeneratorOptions,
}

impl MeshGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generates an object, reusing and updating `cache`.
    ///
    /// Work counters accumulate in the cache's stats across calls.
    pub fn generate(&self, snapshot: &Snapshot, cache: &mut GeneratedCacheContext) -> Object {
        GenerationPass::new(&self.options, snapshot.clone(), cache, true).run()
    }

    /// Generates an object from scratch with a throwaway cache.
    pub fn generate_uncached(&self, snapshot: &Snapshot) -> Object {
        let mut cache = GeneratedCacheContext::new();
        GenerationPass::new(&self.options, snapshot.clone(), &mut cache, false).run()
    }
}

/// State of one pass. Split over the submodules by concern.
pub(crate) struct GenerationPass<'a> {
    options: &'a GeneratorOptions,
    snapshot: Snapshot,
    cache: &'a mut GeneratedCacheContext,
    cache_enabled: bool,
    part_node_ids: BTreeMap<String, BTreeSet<String>>,
    part_edge_ids: BTreeMap<String, BTreeSet<String>>,
    dirty_component_ids: BTreeSet<String>,
    is_successful: bool,
    previews: BTreeMap<String, ComponentPreview>,
}

impl<'a> GenerationPass<'a> {
    fn new(
        options: &'a GeneratorOptions,
        snapshot: Snapshot,
        cache: &'a mut GeneratedCacheContext,
        cache_enabled: bool,
    ) -> Self {
        Self {
            options,
            snapshot,
            cache,
            cache_enabled,
            part_node_ids: BTreeMap::new(),
            part_edge_ids: BTreeMap::new(),
            dirty_component_ids: BTreeSet::new(),
            is_successful: true,
            previews: BTreeMap::new(),
        }
    }

    fn run(mut self) -> Object {
        info!(
            parts = self.snapshot.parts.len(),
            components = self.snapshot.components.len(),
            "Generating mesh"
        );
        let mirrors = preprocess_mirror(&mut self.snapshot);
        self.cache.part_mirror_ids.extend(mirrors);
        if self.cache_enabled {
            self.cache.prune(&self.snapshot);
        }
        self.collect_parts();
        self.check_is_component_dirty(ROOT_COMPONENT_ID);
        for id in &self.dirty_component_ids {
            self.cache.erase_combinations_containing(id);
        }
        self.dirty_component_ids.insert(ROOT_COMPONENT_ID.to_string());

        let (combined, _) = self.combine_component_mesh(ROOT_COMPONENT_ID);
        let root = self.cache.components.get(ROOT_COMPONENT_ID).cloned().unwrap_or_default();

        let mut object = Object {
            nodes: root.nodes,
            edges: root.edges,
            node_vertices: root.node_vertices,
            ..Object::default()
        };
        if let Some(mesh) = combined {
            let (mut vertices, mut triangles) = mesh.into_parts();
            if self.options.weld_enabled {
                for pass in 0..WELD_MAX_PASSES {
                    let (welded, count) = weld_vertices(
                        &vertices,
                        &triangles,
                        self.options.weld_distance,
                        &root.none_seam_vertices,
                    );
                    (vertices, triangles) = welded.into_parts();
                    debug!(pass, welded = count, "Weld pass");
                    if count == 0 {
                        break;
                    }
                }
            }
            object.triangle_and_quads = recover_quads(&vertices, &triangles, &root.shared_quad_edges);
            object.vertices = vertices;
            object.triangles = triangles;
        }

        self.collect_uncombined_component(ROOT_COMPONENT_ID, &mut object);
        self.collect_errored_parts(&mut object);
        self.postprocess(&mut object);

        object.is_successful = self.is_successful;
        object.preview_component_ids = self.previews.keys().cloned().collect();
        object.component_previews = std::mem::take(&mut self.previews);
        info!(
            vertices = object.vertices.len(),
            triangles = object.triangles.len(),
            successful = object.is_successful,
            "Generated mesh"
        );
        object
    }

    /// Appends uncombined components' cached meshes next to the combined one.
    fn collect_uncombined_component(&self, component_id: &str, object: &mut Object) {
        let Some(component) = self.snapshot.component(component_id) else {
            return;
        };
        if CombineMode::of_component(component) != CombineMode::Uncombined {
            for child in component_children(component) {
                self.collect_uncombined_component(&child, object);
            }
            return;
        }
        let Some(cached) = self.cache.components.get(component_id) else {
            return;
        };
        let Some(mesh) = &cached.mesh else {
            return;
        };
        object.nodes.extend(cached.nodes.iter().cloned());
        object.edges.extend(cached.edges.iter().cloned());
        object.node_vertices.extend(cached.node_vertices.iter().cloned());
        append_mesh(object, mesh.vertices(), mesh.triangles(), |vertices, triangles| {
            recover_quads(vertices, triangles, &cached.shared_quad_edges)
        });
    }

    /// Appends the raw sweep geometry of joined parts that failed to close.
    fn collect_errored_parts(&self, object: &mut Object) {
        for (part_id, part) in &self.cache.parts {
            if part.is_successful || !part.joined || part.vertices.is_empty() {
                continue;
            }
            debug!(part_id = %part_id, "Appending raw geometry of failed part");
            let triangles = triangulate_faces(&part.vertices, &part.faces);
            append_mesh(object, &part.vertices, &triangles, |_, _| part.faces.clone());
        }
    }

    fn postprocess(&self, object: &mut Object) {
        object.triangle_normals = triangle_normals(&object.vertices, &object.triangles);
        let resolved = resolve_triangle_source_node(&object.vertices, &object.triangles, &object.node_vertices);

        let colors: BTreeMap<SourceNode, Color> = object
            .nodes
            .iter()
            .map(|node| (SourceNode::new(node.part_id.clone(), node.node_id.clone()), node.color))
            .collect();
        object.triangle_colors = resolved
            .triangle_sources
            .iter()
            .map(|source| colors.get(source).copied().unwrap_or(Color::WHITE))
            .collect();
        object.triangle_source_nodes = resolved.triangle_sources;
        object.vertex_source_nodes = resolved.vertex_sources;
        object.triangle_vertex_normals = smooth_normal(
            &object.vertices,
            &object.triangles,
            &object.triangle_normals,
            self.options.smooth_threshold_degrees,
        );
    }

    fn record_preview(&mut self, component_id: &str, mesh: &Mesh, color: Color) {
        self.previews.insert(
            component_id.to_string(),
            ComponentPreview {
                vertices: mesh.vertices().to_vec(),
                triangles: mesh.triangles().to_vec(),
                color,
            },
        );
    }
}

/// Appends geometry to the object with indices shifted past its vertices.
///
/// `faces` receives the appended vertices and triangles and returns the
/// mixed-arity faces to append.
fn append_mesh<F>(object: &mut Object, vertices: &[glam::DVec3], triangles: &[[usize; 3]], faces: F)
where
    F: FnOnce(&[glam::DVec3], &[[usize; 3]]) -> Vec<Vec<usize>>,
{
    let offset = object.vertices.len();
    object.vertices.extend_from_slice(vertices);
    object
        .triangles
        .extend(triangles.iter().map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]));
    object.triangle_and_quads.extend(
        faces(vertices, triangles)
            .into_iter()
            .map(|face| face.into_iter().map(|index| index + offset).collect()),
    );
}
