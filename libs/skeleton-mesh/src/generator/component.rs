//! Recursive component combination.
//!
//! A component's children are split into runs: consecutive children with
//! the same combine mode share a run, and every inverted child starts its
//! own. Each run folds into one mesh (with seam recombination), then the
//! runs fold into the component mesh. Stitching-line leaves are pulled out
//! of the runs and contribute one stitched mesh, unioned last.

use super::GenerationPass;
use crate::cache::{combination_token, GeneratedComponent, GeneratedStitch};
use crate::combiner::{CombineMethod, MeshCombiner};
use crate::mesh::Mesh;
use crate::position_key::PositionKey;
use crate::quads::collect_shared_quad_edges;
use crate::recombiner::MeshRecombiner;
use crate::snapshot::{
    bool_value, component_children, component_linked_part, value_or_empty, CombineMode, PartTarget,
};
use crate::stitch::StitchMeshBuilder;
use tracing::{debug, warn};

/// Mesh queued for a fold, with its mode and the id string naming it.
type FoldItem = (Mesh, CombineMode, String);

impl GenerationPass<'_> {
    /// Combined mesh of a component and its combine mode.
    ///
    /// Clean components with a cached mesh are served from the cache.
    pub(super) fn combine_component_mesh(&mut self, component_id: &str) -> (Option<Mesh>, CombineMode) {
        let Some(component) = self.snapshot.component(component_id) else {
            debug!(component_id, "Skipping missing component");
            return (None, CombineMode::Normal);
        };
        let mode = CombineMode::of_component(component);
        let linked_part = component_linked_part(component).map(str::to_string);
        let children = component_children(component);

        if self.cache_enabled && !self.dirty_component_ids.contains(component_id) {
            if let Some(mesh) = self.cache.components.get(component_id).and_then(|cached| cached.mesh.clone()) {
                self.cache.stats_mut().component_hits += 1;
                debug!(component_id, "Component cache hit");
                return (Some(mesh), mode);
            }
        }

        let mut generated = GeneratedComponent::default();
        let mesh = match linked_part {
            Some(part_id) => self.combine_leaf(component_id, &part_id, &mut generated),
            None => self.combine_group(component_id, &children, &mut generated),
        };
        generated.mesh = mesh.clone();
        self.cache.components.insert(component_id.to_string(), generated);
        (mesh, mode)
    }

    fn combine_leaf(&mut self, component_id: &str, part_id: &str, generated: &mut GeneratedComponent) -> Option<Mesh> {
        let (mut mesh, mut has_error) = self.combine_part_mesh(part_id, component_id, true);
        let fill_mesh = self
            .snapshot
            .parts
            .get(part_id)
            .is_some_and(|part| bool_value(part, "fillMesh"));
        if has_error && !fill_mesh {
            debug!(part_id, "Retrying part without intermediate nodes");
            (mesh, has_error) = self.combine_part_mesh(part_id, component_id, false);
        }
        if has_error {
            self.is_successful = false;
        }

        if let Some(part) = self.cache.parts.get(part_id) {
            generated
                .none_seam_vertices
                .extend(part.vertices.iter().map(|vertex| PositionKey::new(*vertex)));
            collect_shared_quad_edges(&part.vertices, &part.faces, &mut generated.shared_quad_edges);
            generated.nodes.extend(part.nodes.iter().cloned());
            generated.edges.extend(part.edges.iter().cloned());
            generated.node_vertices.extend(part.node_vertices.iter().cloned());
        }
        mesh
    }

    fn is_stitching_line(&self, component_id: &str) -> Option<String> {
        let part_id = component_linked_part(self.snapshot.component(component_id)?)?;
        let part = self.snapshot.parts.get(part_id)?;
        (PartTarget::from_name(value_or_empty(part, "target")) == PartTarget::StitchingLine).then(|| part_id.to_string())
    }

    fn combine_group(
        &mut self,
        component_id: &str,
        children: &[String],
        generated: &mut GeneratedComponent,
    ) -> Option<Mesh> {
        let mut stitching_parts: Vec<String> = Vec::new();
        let mut stitching_components: Vec<String> = Vec::new();
        let mut runs: Vec<(CombineMode, Vec<String>)> = Vec::new();
        for child in children {
            let Some(bag) = self.snapshot.component(child) else {
                debug!(component_id = %child, "Skipping missing child component");
                continue;
            };
            let mode = CombineMode::of_component(bag);
            if let Some(part_id) = self.is_stitching_line(child) {
                stitching_parts.push(part_id);
                stitching_components.push(child.clone());
                continue;
            }
            match runs.last_mut() {
                Some((last, ids)) if *last == mode && mode != CombineMode::Inversion => ids.push(child.clone()),
                _ => runs.push((mode, vec![child.clone()])),
            }
        }

        let mut run_meshes: Vec<FoldItem> = Vec::new();
        for (mode, ids) in &runs {
            if let Some(mesh) = self.combine_child_group(ids, generated) {
                run_meshes.push((mesh, *mode, joined_tokens(ids, "|")));
            }
        }
        if !stitching_parts.is_empty() {
            if let Some(mesh) = self.combine_stitching_mesh(&stitching_parts, &stitching_components, generated) {
                run_meshes.push((mesh, CombineMode::Normal, joined_tokens(&stitching_components, ":")));
            }
        }

        let combined = self.combine_multiple_meshes(run_meshes, false);
        if let Some(mesh) = &combined {
            self.record_preview(component_id, mesh, self.options.default_part_color);
        }
        combined
    }

    /// Folds one run of children, absorbing their auxiliary sets.
    fn combine_child_group(&mut self, ids: &[String], generated: &mut GeneratedComponent) -> Option<Mesh> {
        let mut meshes: Vec<FoldItem> = Vec::new();
        for id in ids {
            let (mesh, mode) = self.combine_component_mesh(id);
            if mode == CombineMode::Uncombined {
                continue;
            }
            if let Some(child) = self.cache.components.get(id) {
                generated.absorb(child);
            }
            if let Some(mesh) = mesh {
                meshes.push((mesh, mode, combination_token(id)));
            }
        }
        self.combine_multiple_meshes(meshes, self.options.recombine)
    }

    /// Stitches the splines of stitching-line parts into one mesh.
    ///
    /// The result is cached per group until one of its components turns
    /// dirty. A lone spline has nothing to stitch against and is skipped.
    fn combine_stitching_mesh(
        &mut self,
        part_ids: &[String],
        component_ids: &[String],
        generated: &mut GeneratedComponent,
    ) -> Option<Mesh> {
        for id in component_ids {
            self.combine_component_mesh(id);
            if let Some(child) = self.cache.components.get(id) {
                generated.absorb(child);
            }
        }
        let stitch_id = joined_tokens(component_ids, ":");
        if let Some(cached) = self.cache.stitches.get(&stitch_id).cloned() {
            self.cache.stats_mut().stitch_hits += 1;
            debug!(stitch = %stitch_id, "Stitch cache hit");
            if !cached.is_successful {
                self.is_successful = false;
            }
            generated.shared_quad_edges.extend(cached.shared_quad_edges);
            return cached.mesh;
        }

        let splines: Vec<_> = part_ids
            .iter()
            .zip(component_ids)
            .filter_map(|(part_id, component_id)| self.stitching_spline(part_id, component_id))
            .collect();
        if splines.len() < 2 {
            debug!(stitch = %stitch_id, splines = splines.len(), "Skipping stitching group without a pair of splines");
            return None;
        }

        self.cache.stats_mut().stitch_builds += 1;
        let mut builder = StitchMeshBuilder::new(splines);
        let mut stitched = GeneratedStitch::default();
        match builder.build() {
            Ok(stitch) => {
                stitched.is_successful = true;
                collect_shared_quad_edges(&stitch.vertices, &stitch.faces, &mut stitched.shared_quad_edges);
                let mesh = Mesh::from_faces(stitch.vertices, &stitch.faces);
                stitched.mesh = (!mesh.is_empty()).then_some(mesh);
            }
            Err(error) => {
                warn!(%error, splines = part_ids.len(), "Stitching failed");
                self.is_successful = false;
            }
        }
        generated.shared_quad_edges.extend(stitched.shared_quad_edges.iter().copied());
        if let Some(mesh) = &stitched.mesh {
            for id in component_ids {
                self.record_preview(id, mesh, self.options.default_part_color);
            }
        }
        let mesh = stitched.mesh.clone();
        self.cache.stitches.insert(stitch_id, stitched);
        mesh
    }

    /// Folds meshes left to right through the combination cache.
    ///
    /// The first mesh seeds the result whatever its mode. A failed step
    /// keeps the result accumulated so far and clears the success flag.
    pub(super) fn combine_multiple_meshes(&mut self, meshes: Vec<FoldItem>, recombine: bool) -> Option<Mesh> {
        let mut merged: Option<Mesh> = None;
        let mut merged_id = String::new();
        for (mesh, mode, sub_id) in meshes {
            let Some(current) = merged.take() else {
                merged = Some(mesh);
                merged_id = sub_id;
                continue;
            };
            let method = if mode == CombineMode::Inversion {
                CombineMethod::Diff
            } else {
                CombineMethod::Union
            };
            // Ids arrive bracketed, see `combination_token`.
            let combined_id = format!(
                "{merged_id}{}{sub_id}{}",
                if method == CombineMethod::Diff { "-" } else { "+" },
                if recombine { "!" } else { "" }
            );
            let result = match self.cache.combinations.get(&combined_id).cloned() {
                Some(cached) => {
                    self.cache.stats_mut().combination_hits += 1;
                    debug!(combination = %combined_id, "Combination cache hit");
                    cached
                }
                None => {
                    let result = self.combine_two_meshes(&current, &mesh, method, recombine);
                    self.cache.combinations.insert(combined_id.clone(), result.clone());
                    result
                }
            };
            merged = match result {
                Some(result) => Some(result),
                None => {
                    warn!(combination = %combined_id, "Boolean combination failed");
                    self.is_successful = false;
                    Some(current)
                }
            };
            merged_id = combined_id;
        }
        merged
    }

    /// One boolean step, optionally followed by seam recombination.
    ///
    /// The recombined mesh replaces the boolean result only when it is
    /// closed.
    fn combine_two_meshes(
        &mut self,
        first: &Mesh,
        second: &Mesh,
        method: CombineMethod,
        recombine: bool,
    ) -> Option<Mesh> {
        self.cache.stats_mut().combines += 1;
        let (mesh, sources) = MeshCombiner::new().combine(first, second, method)?;
        if recombine {
            let mut recombiner = MeshRecombiner::new(&mesh, &sources);
            if recombiner.recombine() {
                let recombined = recombiner.regenerated_mesh();
                if !recombined.is_empty() && recombined.is_watertight() {
                    return Some(recombined);
                }
                debug!("Recombined mesh is not closed, keeping boolean result");
            }
        }
        if mesh.is_empty() {
            None
        } else {
            Some(mesh)
        }
    }
}

/// Bracketed ids joined with `separator`.
fn joined_tokens(ids: &[String], separator: &str) -> String {
    ids.iter().map(|id| combination_token(id)).collect::<Vec<_>>().join(separator)
}
