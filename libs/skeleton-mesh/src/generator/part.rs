//! Part sweeping and stitching-line spline extraction.

use super::GenerationPass;
use crate::cache::GeneratedPart;
use crate::cut_face::{chamfer_face, profile_from_linked_nodes, CutFace, ProfileNode};
use crate::mesh::Mesh;
use crate::object::{Color, ObjectEdge, ObjectNode, SourceNode};
use crate::snapshot::{bool_value, float_value, optional_float, value_or_empty, PartBase, PartTarget, PropertyBag};
use crate::stitch::{Spline, StitchNode};
use crate::stroke::{BuildParameters, StrokeMeshBuilder, StrokeModifier};
use glam::{DVec2, DVec3};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Part attributes read once per build.
struct PartSettings {
    disabled: bool,
    target: PartTarget,
    mirror_from_part_id: Option<String>,
    mirrored_by_part_id: Option<String>,
    color: Color,
    material_id: Option<String>,
    countershaded: bool,
    chamfered: bool,
    parameters: BuildParameters,
}

impl PartSettings {
    fn read(part: &PropertyBag, default_color: Color) -> Self {
        let base = PartBase::from_name(value_or_empty(part, "base"));
        Self {
            disabled: bool_value(part, "disabled"),
            target: PartTarget::from_name(value_or_empty(part, "target")),
            mirror_from_part_id: non_empty(part, "__mirrorFromPartId"),
            mirrored_by_part_id: non_empty(part, "__mirroredByPartId"),
            color: Color::from_name(value_or_empty(part, "color")).unwrap_or(default_color),
            material_id: non_empty(part, "materialId"),
            countershaded: bool_value(part, "countershaded"),
            chamfered: bool_value(part, "chamfered"),
            parameters: BuildParameters {
                deform_thickness: optional_float(part, "deformThickness").unwrap_or(1.0),
                deform_width: optional_float(part, "deformWidth").unwrap_or(1.0),
                deform_unified: bool_value(part, "deformUnified"),
                hollow_thickness: optional_float(part, "hollowThickness").unwrap_or(0.0),
                base_normal_on_x: base != PartBase::Yz,
                base_normal_on_y: base != PartBase::Zx,
                base_normal_on_z: base != PartBase::Xy,
                base_normal_average: base == PartBase::Average,
            },
        }
    }

    fn joined(&self) -> bool {
        self.target == PartTarget::Model && !self.disabled
    }
}

fn non_empty(bag: &PropertyBag, key: &str) -> Option<String> {
    bag.get(key).filter(|value| !value.is_empty()).cloned()
}

impl GenerationPass<'_> {
    /// Sweeps one part and stores the result in the part cache.
    ///
    /// Returns the combinable mesh, `None` for failed, disabled or
    /// non-model parts, and whether the sweep failed for a joined part.
    pub(super) fn combine_part_mesh(
        &mut self,
        part_id: &str,
        component_id: &str,
        add_intermediate_nodes: bool,
    ) -> (Option<Mesh>, bool) {
        let Some(part) = self.snapshot.parts.get(part_id) else {
            debug!(part_id, "Skipping missing part");
            return (None, false);
        };
        let settings = PartSettings::read(part, self.options.default_part_color);
        let mut cut_template = self.cut_template(value_or_empty(part, "cutFace"));
        if settings.chamfered {
            chamfer_face(&mut cut_template);
        }
        let cut_rotation = float_value(part, "cutRotation");
        let subdived = bool_value(part, "subdived");
        let rounded = bool_value(part, "rounded");
        let is_mirror = settings.mirror_from_part_id.is_some();
        let search_part_id = settings.mirror_from_part_id.clone().unwrap_or_else(|| part_id.to_string());
        let joined = settings.joined();

        let mut modifier = StrokeModifier::new();
        if add_intermediate_nodes {
            modifier.enable_intermediate_addition();
        }
        let mut node_indices: BTreeMap<&str, usize> = BTreeMap::new();
        let mut indexed_node_ids: Vec<&str> = Vec::new();
        let mut generated = GeneratedPart {
            color: settings.color,
            joined,
            ..GeneratedPart::default()
        };
        for node_id in self.part_node_ids.get(&search_part_id).into_iter().flatten() {
            let Some(node) = self.snapshot.nodes.get(node_id) else {
                continue;
            };
            let radius = float_value(node, "radius");
            let position = self.snapshot.node_position(node);
            let (template, rotation) = match non_empty(node, "cutFace") {
                Some(name) => {
                    let mut template = self.cut_template(&name);
                    if settings.chamfered {
                        chamfer_face(&mut template);
                    }
                    (template, float_value(node, "cutRotation"))
                }
                None => (cut_template.clone(), cut_rotation),
            };
            let index = modifier.add_node(position, radius, template, rotation);
            node_indices.insert(node_id, index);
            indexed_node_ids.push(node_id);

            let mut origin = position;
            if is_mirror {
                origin.x = -origin.x;
            }
            generated.nodes.push(ObjectNode {
                part_id: part_id.to_string(),
                node_id: node_id.clone(),
                origin,
                radius,
                color: settings.color,
                material_id: settings.material_id.clone(),
                countershaded: settings.countershaded,
                mirror_from_part_id: settings.mirror_from_part_id.clone(),
                mirrored_by_part_id: settings.mirrored_by_part_id.clone(),
                joined,
            });
        }

        let mut linked: BTreeSet<(usize, usize)> = BTreeSet::new();
        for edge_id in self.part_edge_ids.get(&search_part_id).into_iter().flatten() {
            let Some(edge) = self.snapshot.edges.get(edge_id) else {
                continue;
            };
            let (from, to) = (value_or_empty(edge, "from"), value_or_empty(edge, "to"));
            let (Some(&first), Some(&second)) = (node_indices.get(from), node_indices.get(to)) else {
                debug!(part_id, edge_id = %edge_id, "Skipping dangling edge");
                continue;
            };
            if !linked.insert((first, second)) {
                continue;
            }
            modifier.add_edge(first, second);
            generated.edges.push(ObjectEdge {
                part_id: part_id.to_string(),
                from_node_id: from.to_string(),
                to_node_id: to.to_string(),
            });
        }

        if subdived {
            modifier.subdivide();
        }
        if rounded {
            modifier.round_end();
        }
        modifier.finalize();

        let mut has_mesh_error = false;
        let mut mesh = None;
        if settings.target == PartTarget::Model {
            self.cache.stats_mut().part_builds += 1;
            let mut builder = StrokeMeshBuilder::new(settings.parameters);
            for node in modifier.nodes() {
                let index = builder.add_node(node.position, node.radius, node.cut_template.clone(), node.cut_rotation);
                builder.set_node_origin_info(index, node.near_origin_node_index, node.far_origin_node_index);
            }
            for edge in modifier.edges() {
                builder.add_edge(edge.first, edge.second);
            }
            match builder.build() {
                Ok(stroke) => {
                    let mut vertices = stroke.vertices;
                    let mut faces = stroke.faces;
                    if is_mirror {
                        for vertex in &mut vertices {
                            vertex.x = -vertex.x;
                        }
                        for face in &mut faces {
                            face.reverse();
                        }
                    }
                    for (vertex, &source) in vertices.iter().zip(&stroke.source_node_indices) {
                        let node_id = modifier
                            .nodes()
                            .get(source)
                            .and_then(|node| indexed_node_ids.get(node.origin_node_index));
                        if let Some(node_id) = node_id {
                            generated
                                .node_vertices
                                .push((*vertex, SourceNode::new(part_id, *node_id)));
                        }
                    }
                    let built = Mesh::from_faces(vertices.clone(), &faces);
                    if built.is_empty() || !built.is_watertight() {
                        warn!(part_id, vertices = vertices.len(), "Part mesh is not closed");
                        has_mesh_error = true;
                    }
                    if !built.is_empty() {
                        self.record_preview(component_id, &built, settings.color);
                    }
                    if !has_mesh_error {
                        mesh = Some(built);
                    }
                    generated.vertices = vertices;
                    generated.faces = faces;
                }
                Err(error) => {
                    warn!(part_id, %error, "Part build failed");
                    has_mesh_error = true;
                }
            }
        }
        generated.is_successful = !has_mesh_error;

        if let Some(source) = &settings.mirror_from_part_id {
            self.cache.part_mirror_ids.insert(part_id.to_string(), source.clone());
        }
        self.cache.parts.insert(part_id.to_string(), generated);

        let has_error = has_mesh_error && joined;
        if has_mesh_error || !joined {
            return (None, has_error);
        }
        (mesh, false)
    }

    /// Cut profile named by `cut_face`.
    ///
    /// An existing part id borrows the profile traced from that part's
    /// nodes; anything else, or a donor with fewer than three profile
    /// points, resolves as a primitive name.
    pub(super) fn cut_template(&self, cut_face: &str) -> Vec<DVec2> {
        if self.snapshot.parts.contains_key(cut_face) {
            let mut nodes: BTreeMap<String, ProfileNode> = BTreeMap::new();
            for node_id in self.part_node_ids.get(cut_face).into_iter().flatten() {
                if let Some(node) = self.snapshot.nodes.get(node_id) {
                    nodes.insert(
                        node_id.clone(),
                        ProfileNode {
                            radius: float_value(node, "radius"),
                            position: self.snapshot.node_position(node).truncate(),
                        },
                    );
                }
            }
            let mut links: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for edge_id in self.part_edge_ids.get(cut_face).into_iter().flatten() {
                let Some(edge) = self.snapshot.edges.get(edge_id) else {
                    continue;
                };
                let (from, to) = (value_or_empty(edge, "from"), value_or_empty(edge, "to"));
                if !nodes.contains_key(from) || !nodes.contains_key(to) {
                    continue;
                }
                links.entry(from.to_string()).or_default().push(to.to_string());
                links.entry(to.to_string()).or_default().push(from.to_string());
            }
            let points = profile_from_linked_nodes(&nodes, &links);
            if points.len() >= 3 {
                return points;
            }
            debug!(cut_face, "Linked cut face too small, using primitive");
        }
        CutFace::from_name(cut_face).points()
    }

    /// Spline through a stitching-line part's nodes in link order.
    pub(super) fn stitching_spline(&self, part_id: &str, source_id: &str) -> Option<Spline> {
        let part = self.snapshot.parts.get(part_id)?;
        let mirror_from = non_empty(part, "__mirrorFromPartId");
        let search_part_id = mirror_from.as_deref().unwrap_or(part_id);

        let mut nodes: BTreeMap<&str, StitchNode> = BTreeMap::new();
        for node_id in self.part_node_ids.get(search_part_id)? {
            let Some(node) = self.snapshot.nodes.get(node_id) else {
                continue;
            };
            let mut origin: DVec3 = self.snapshot.node_position(node);
            if mirror_from.is_some() {
                origin.x = -origin.x;
            }
            nodes.insert(
                node_id,
                StitchNode {
                    origin,
                    radius: float_value(node, "radius"),
                },
            );
        }
        let mut links: BTreeMap<&str, &str> = BTreeMap::new();
        for edge_id in self.part_edge_ids.get(search_part_id).into_iter().flatten() {
            let Some(edge) = self.snapshot.edges.get(edge_id) else {
                continue;
            };
            let (from, to) = (value_or_empty(edge, "from"), value_or_empty(edge, "to"));
            if nodes.contains_key(from) && nodes.contains_key(to) {
                links.insert(from, to);
            }
        }

        let (mut order, is_circle) = flatten_links(&links);
        if order.is_empty() {
            order.extend(nodes.keys().next().copied());
        }
        let chain: Vec<StitchNode> = order.iter().filter_map(|id| nodes.get(id).copied()).collect();
        if chain.is_empty() {
            return None;
        }
        Some(Spline::new(source_id, chain, is_circle))
    }
}

/// Orders directed links into one chain.
///
/// An open chain is walked back from its tail, the only target that links
/// nowhere. Without a tail the links form a ring, started at the smallest
/// id.
fn flatten_links<'a>(links: &BTreeMap<&'a str, &'a str>) -> (Vec<&'a str>, bool) {
    let Some((&start, _)) = links.first_key_value() else {
        return (Vec::new(), false);
    };
    let mut visited: BTreeSet<&str> = BTreeSet::new();
    let mut chain = Vec::new();
    match links.values().copied().find(|to| !links.contains_key(to)) {
        Some(tail) => {
            let reversed: BTreeMap<&str, &str> = links.iter().map(|(&from, &to)| (to, from)).collect();
            let mut current = Some(tail);
            while let Some(id) = current {
                if !visited.insert(id) {
                    break;
                }
                chain.push(id);
                current = reversed.get(id).copied();
            }
            chain.reverse();
            (chain, false)
        }
        None => {
            let mut current = Some(start);
            while let Some(id) = current {
                if !visited.insert(id) {
                    break;
                }
                chain.push(id);
                current = links.get(id).copied();
            }
            (chain, true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_links_open_chain_from_head() {
        let links: BTreeMap<&str, &str> = [("b", "c"), ("a", "b")].into_iter().collect();
        assert_eq!(flatten_links(&links), (vec!["a", "b", "c"], false));
    }

    #[test]
    fn test_flatten_links_ring_starts_at_smallest_id() {
        let links: BTreeMap<&str, &str> = [("c", "a"), ("a", "b"), ("b", "c")].into_iter().collect();
        assert_eq!(flatten_links(&links), (vec!["a", "b", "c"], true));
    }

    #[test]
    fn test_flatten_links_empty() {
        assert_eq!(flatten_links(&BTreeMap::new()), (Vec::new(), false));
    }
}
