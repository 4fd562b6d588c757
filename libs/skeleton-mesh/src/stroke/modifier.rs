//! # Stroke Modifier
//!
//! Prepares a part's node graph for sweeping: optional profile subdivision,
//! end rounding and insertion of intermediate nodes and profile points so
//! that the swept surface has roughly square quads.

use crate::cut_face::{average_edge_length, subdivide_face};
use config::constants::{END_ROUND_RADIUS_RATIO, INTERMEDIATE_EDGE_RATIO, MAX_INSERTED_POINTS};
use glam::{DVec2, DVec3};
use std::collections::BTreeMap;

/// Node of a stroke, original or synthesized.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeNode {
    /// Whether the node came from the snapshot
    pub is_original: bool,
    /// Model space position
    pub position: DVec3,
    /// Sweep radius
    pub radius: f64,
    /// Cross-section profile
    pub cut_template: Vec<DVec2>,
    /// Profile rotation, in half turns
    pub cut_rotation: f64,
    /// Original node this node is attributed to
    pub origin_node_index: usize,
    /// Closest original node, for synthesized nodes
    pub near_origin_node_index: Option<usize>,
    /// Farther original node, for synthesized nodes
    pub far_origin_node_index: Option<usize>,
    average_cut_template_length: f64,
}

/// Undirected edge between two node indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeEdge {
    /// First node index
    pub first: usize,
    /// Second node index
    pub second: usize,
}

/// Node graph editor run before [`super::StrokeMeshBuilder`].
#[derive(Debug, Clone, Default)]
pub struct StrokeModifier {
    nodes: Vec<StrokeNode>,
    edges: Vec<StrokeEdge>,
    intermediate_addition_enabled: bool,
}

impl StrokeModifier {
    /// Creates an empty modifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables intermediate node and profile point insertion in [`Self::finalize`].
    pub fn enable_intermediate_addition(&mut self) {
        self.intermediate_addition_enabled = true;
    }

    /// Adds an original node and returns its index.
    pub fn add_node(&mut self, position: DVec3, radius: f64, cut_template: Vec<DVec2>, cut_rotation: f64) -> usize {
        let index = self.nodes.len();
        self.nodes.push(StrokeNode {
            is_original: true,
            position,
            radius,
            cut_template,
            cut_rotation,
            origin_node_index: index,
            near_origin_node_index: None,
            far_origin_node_index: None,
            average_cut_template_length: 0.0,
        });
        index
    }

    /// Adds an edge and returns its index.
    pub fn add_edge(&mut self, first: usize, second: usize) -> usize {
        self.edges.push(StrokeEdge { first, second });
        self.edges.len() - 1
    }

    /// Nodes after modification.
    pub fn nodes(&self) -> &[StrokeNode] {
        &self.nodes
    }

    /// Edges after modification.
    pub fn edges(&self) -> &[StrokeEdge] {
        &self.edges
    }

    /// Subdivides every node's profile once.
    pub fn subdivide(&mut self) {
        for node in &mut self.nodes {
            subdivide_face(&mut node.cut_template);
        }
    }

    /// Caps every endpoint with a half-radius node pushed outward.
    pub fn round_end(&mut self) {
        let mut neighbors: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for edge in &self.edges {
            neighbors.entry(edge.first).or_default().push(edge.second);
            neighbors.entry(edge.second).or_default().push(edge.first);
        }
        for (index, linked) in neighbors {
            let [neighbor] = linked.as_slice() else {
                continue;
            };
            let current = &self.nodes[index];
            let radius = current.radius * END_ROUND_RADIUS_RATIO;
            let outward = (current.position - self.nodes[*neighbor].position).normalize_or_zero();
            let end = StrokeNode {
                is_original: false,
                position: current.position + outward * radius,
                radius,
                cut_template: current.cut_template.clone(),
                cut_rotation: current.cut_rotation,
                origin_node_index: current.origin_node_index,
                near_origin_node_index: None,
                far_origin_node_index: None,
                average_cut_template_length: 0.0,
            };
            let origin = end.origin_node_index;
            self.nodes.push(end);
            self.add_edge(origin, self.nodes.len() - 1);
        }
    }

    /// Inserts intermediate profile points and nodes when enabled.
    ///
    /// Edges that would need more than the maximum number of inserted
    /// nodes are dropped.
    pub fn finalize(&mut self) {
        if !self.intermediate_addition_enabled {
            return;
        }
        for node in &mut self.nodes {
            node.average_cut_template_length = average_edge_length(&node.cut_template);
            insert_intermediate_cut_template_points(&mut node.cut_template, node.average_cut_template_length);
        }

        let old_edges = std::mem::take(&mut self.edges);
        for edge in old_edges {
            let first = &self.nodes[edge.first];
            let second = &self.nodes[edge.second];
            let target_length = (first.average_cut_template_length * first.radius
                + second.average_cut_template_length * second.radius)
                * 0.5;
            let length = first.position.distance(second.position);
            if target_length >= length {
                self.add_edge(edge.first, edge.second);
                continue;
            }
            let insert_count = ((length / target_length) as usize).max(1);
            if insert_count > MAX_INSERTED_POINTS {
                continue;
            }
            let step = 1.0 / (insert_count + 1) as f64;
            let mut chain = vec![edge.first];
            for i in 0..insert_count {
                let factor = step * (i + 1) as f64;
                if factor >= 1.0 {
                    break;
                }
                let node = intermediate_node(&self.nodes[edge.first], &self.nodes[edge.second], factor);
                chain.push(self.nodes.len());
                self.nodes.push(node);
            }
            chain.push(edge.second);
            for pair in chain.windows(2) {
                self.add_edge(pair[0], pair[1]);
            }
        }
    }
}

fn intermediate_node(first: &StrokeNode, second: &StrokeNode, factor: f64) -> StrokeNode {
    let (near, far) = if factor <= 0.5 { (first, second) } else { (second, first) };
    StrokeNode {
        is_original: false,
        position: first.position.lerp(second.position, factor),
        radius: first.radius * (1.0 - factor) + second.radius * factor,
        cut_template: near.cut_template.clone(),
        cut_rotation: near.cut_rotation,
        origin_node_index: near.origin_node_index,
        near_origin_node_index: Some(near.origin_node_index),
        far_origin_node_index: Some(far.origin_node_index),
        average_cut_template_length: near.average_cut_template_length,
    }
}

fn insert_intermediate_cut_template_points(template: &mut Vec<DVec2>, average_length: f64) {
    let count = template.len();
    let target_length = average_length * INTERMEDIATE_EDGE_RATIO;
    let mut refined = Vec::with_capacity(count);
    for index in 0..count {
        let current = template[index];
        let next = template[(index + 1) % count];
        refined.push(current);
        let length = current.distance(next);
        if target_length >= length {
            continue;
        }
        let insert_count = ((length / target_length) as usize).max(1);
        if insert_count > MAX_INSERTED_POINTS {
            continue;
        }
        let step = 1.0 / (insert_count + 1) as f64;
        for i in 0..insert_count {
            let factor = step * (i + 1) as f64;
            if factor >= 1.0 {
                break;
            }
            refined.push(current.lerp(next, factor));
        }
    }
    *template = refined;
}
