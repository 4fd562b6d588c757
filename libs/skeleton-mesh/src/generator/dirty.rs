//! Part collection and dirty propagation.

use super::GenerationPass;
use crate::snapshot::{bool_value, component_children, component_linked_part, value_or_empty};
use tracing::debug;

impl GenerationPass<'_> {
    /// Groups node and edge ids by their `partId`.
    pub(super) fn collect_parts(&mut self) {
        self.part_node_ids.clear();
        self.part_edge_ids.clear();
        for (node_id, node) in &self.snapshot.nodes {
            let part_id = value_or_empty(node, "partId");
            if part_id.is_empty() {
                continue;
            }
            self.part_node_ids
                .entry(part_id.to_string())
                .or_default()
                .insert(node_id.clone());
        }
        for (edge_id, edge) in &self.snapshot.edges {
            let part_id = value_or_empty(edge, "partId");
            if part_id.is_empty() {
                continue;
            }
            self.part_edge_ids
                .entry(part_id.to_string())
                .or_default()
                .insert(edge_id.clone());
        }
    }

    fn is_part_marked_dirty(&self, part_id: &str) -> bool {
        self.snapshot
            .parts
            .get(part_id)
            .is_some_and(|part| bool_value(part, "__dirty"))
    }

    /// Whether a part borrowing its cut face from another part sees that
    /// donor change. Both the part level and node level `cutFace` count.
    fn is_part_dependency_dirty(&self, part_id: &str) -> bool {
        let Some(part) = self.snapshot.parts.get(part_id) else {
            return false;
        };
        let source_id = part
            .get("__mirrorFromPartId")
            .map(String::as_str)
            .unwrap_or(part_id);
        let mut donors = vec![value_or_empty(part, "cutFace")];
        if let Some(node_ids) = self.part_node_ids.get(source_id) {
            donors.extend(
                node_ids
                    .iter()
                    .filter_map(|id| self.snapshot.nodes.get(id))
                    .map(|node| value_or_empty(node, "cutFace")),
            );
        }
        donors
            .into_iter()
            .filter(|donor| !donor.is_empty() && *donor != part_id)
            .any(|donor| self.snapshot.parts.contains_key(donor) && self.is_part_marked_dirty(donor))
    }

    /// Marks `component_id` and its dirty descendants, returning whether
    /// anything below it changed.
    pub(super) fn check_is_component_dirty(&mut self, component_id: &str) -> bool {
        let Some(component) = self.snapshot.component(component_id) else {
            debug!(component_id, "Skipping missing component");
            return false;
        };
        let mut is_dirty = bool_value(component, "__dirty");
        if let Some(part_id) = component_linked_part(component) {
            if self.is_part_marked_dirty(part_id) || self.is_part_dependency_dirty(part_id) {
                is_dirty = true;
            }
        }
        for child in component_children(component) {
            if self.check_is_component_dirty(&child) {
                is_dirty = true;
            }
        }
        if is_dirty {
            self.dirty_component_ids.insert(component_id.to_string());
        }
        is_dirty
    }
}
