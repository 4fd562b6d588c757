//! Profiles traced from the node ring of a `CutFace` part.

use super::cut_face_points_from_nodes;
use glam::{DVec2, DVec3};
use std::collections::{BTreeMap, BTreeSet};

/// Node of a donor part, projected onto the front plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileNode {
    /// Node radius
    pub radius: f64,
    /// Front plane position
    pub position: DVec2,
}

/// Traces a profile from a donor part's nodes and undirected links.
///
/// The walk starts at the endpoint whose direction from the endpoints'
/// center makes the smallest angle with `(-1, -1)`; ties keep the first
/// candidate in id order. When no node has exactly one link the part is a
/// ring and every node is a candidate. From the start the chain is threaded
/// depth-first, always following the first unvisited neighbor.
pub fn profile_from_linked_nodes(
    nodes: &BTreeMap<String, ProfileNode>,
    links: &BTreeMap<String, Vec<String>>,
) -> Vec<DVec2> {
    let mut endpoints: Vec<(&str, ProfileNode)> = links
        .iter()
        .filter(|(_, neighbors)| neighbors.len() == 1)
        .filter_map(|(id, _)| nodes.get(id).map(|node| (id.as_str(), *node)))
        .collect();
    let is_ring = endpoints.is_empty();
    if is_ring {
        endpoints = nodes.iter().map(|(id, node)| (id.as_str(), *node)).collect();
    }
    let Some(start) = extremal_endpoint(&endpoints) else {
        return Vec::new();
    };

    let mut chain = Vec::new();
    let mut visited = BTreeSet::new();
    let mut current = Some(start.to_string());
    while let Some(id) = current.take() {
        let Some(node) = nodes.get(&id) else {
            break;
        };
        if !visited.insert(id.clone()) {
            break;
        }
        chain.push((node.radius, node.position));
        current = links
            .get(&id)
            .and_then(|neighbors| neighbors.iter().find(|n| !visited.contains(*n)))
            .cloned();
    }
    cut_face_points_from_nodes(&chain, is_ring)
}

fn extremal_endpoint<'a>(endpoints: &[(&'a str, ProfileNode)]) -> Option<&'a str> {
    if endpoints.is_empty() {
        return None;
    }
    let center = endpoints
        .iter()
        .map(|(_, node)| node.position)
        .sum::<DVec2>()
        / endpoints.len() as f64;
    let reference = DVec3::new(-1.0, -1.0, 0.0).normalize();
    let mut chosen: Option<(&str, f64)> = None;
    for (id, node) in endpoints {
        let direction = (node.position - center).extend(0.0).normalize_or_zero();
        let radian = reference.dot(direction).clamp(-1.0, 1.0).acos();
        match chosen {
            Some((_, best)) if radian >= best => {}
            _ => chosen = Some((id, radian)),
        }
    }
    chosen.map(|(id, _)| id)
}
