//! # Stroke Mesh Builder
//!
//! Sweeps a chain (or ring) of nodes into a closed tube. Every node gets a
//! traverse direction and a base normal; its cut template is placed in the
//! plane spanned by them and consecutive cuts are stitched together.

use crate::box_mesh::build_box_mesh;
use crate::error::{MeshError, MeshResult};
use config::constants::{BASE_NORMAL_DOT_LIMIT, LENGTH_EPSILON, MIN_DEFORM_SCALE, TRAVERSE_REVISE_FACTOR};
use glam::{DQuat, DVec2, DVec3};
use std::collections::HashSet;

/// Part level shape parameters applied by [`StrokeMeshBuilder`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildParameters {
    /// Scale along the base normal, `1.0` keeps the profile
    pub deform_thickness: f64,
    /// Scale across the base normal, `1.0` keeps the profile
    pub deform_width: f64,
    /// Scale deform by `max radius / node radius` so thin nodes deform equally
    pub deform_unified: bool,
    /// Wall thickness ratio; zero builds a solid tube
    pub hollow_thickness: f64,
    pub base_normal_on_x: bool,
    pub base_normal_on_y: bool,
    pub base_normal_on_z: bool,
    /// Use one averaged base normal for the whole stroke
    pub base_normal_average: bool,
}

impl Default for BuildParameters {
    fn default() -> Self {
        Self {
            deform_thickness: 1.0,
            deform_width: 1.0,
            deform_unified: false,
            hollow_thickness: 0.0,
            base_normal_on_x: true,
            base_normal_on_y: true,
            base_normal_on_z: true,
            base_normal_average: false,
        }
    }
}

/// Output of a successful sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeMesh {
    pub vertices: Vec<DVec3>,
    /// Quads along the tube, n-gons for the caps
    pub faces: Vec<Vec<usize>>,
    /// Builder node index each vertex was generated from
    pub source_node_indices: Vec<usize>,
}

#[derive(Debug, Clone)]
struct BuilderNode {
    position: DVec3,
    radius: f64,
    cut_template: Vec<DVec2>,
    cut_rotation: f64,
    next: usize,
    index: usize,
    neighbors: Vec<usize>,
    traverse_order: usize,
    traverse_direction: DVec3,
    base_normal: DVec3,
    near_origin_node_index: Option<usize>,
    far_origin_node_index: Option<usize>,
}

impl BuilderNode {
    fn next_or_neighbor_other_than(&self, other: usize) -> usize {
        if self.next != other && self.next != self.index {
            return self.next;
        }
        self.neighbors
            .iter()
            .copied()
            .find(|&neighbor| neighbor != other)
            .unwrap_or(self.index)
    }
}

/// Tube sweep over a node chain.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use skeleton_mesh::cut_face::CutFace;
/// use skeleton_mesh::stroke::{BuildParameters, StrokeMeshBuilder};
///
/// let mut builder = StrokeMeshBuilder::new(BuildParameters::default());
/// let a = builder.add_node(DVec3::ZERO, 0.5, CutFace::Quad.points(), 0.0);
/// let b = builder.add_node(DVec3::X, 0.5, CutFace::Quad.points(), 0.0);
/// builder.add_edge(a, b);
/// let stroke = builder.build().unwrap();
/// assert_eq!(stroke.vertices.len(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct StrokeMeshBuilder {
    parameters: BuildParameters,
    nodes: Vec<BuilderNode>,
    node_indices: Vec<usize>,
    is_ring: bool,
    vertices: Vec<DVec3>,
    faces: Vec<Vec<usize>>,
    source_node_indices: Vec<usize>,
    cut_directs: Vec<DVec3>,
}

impl StrokeMeshBuilder {
    pub fn new(parameters: BuildParameters) -> Self {
        Self {
            parameters,
            nodes: Vec::new(),
            node_indices: Vec::new(),
            is_ring: false,
            vertices: Vec::new(),
            faces: Vec::new(),
            source_node_indices: Vec::new(),
            cut_directs: Vec::new(),
        }
    }

    /// Adds a node and returns its index.
    pub fn add_node(&mut self, position: DVec3, radius: f64, cut_template: Vec<DVec2>, cut_rotation: f64) -> usize {
        let index = self.nodes.len();
        self.nodes.push(BuilderNode {
            position,
            radius,
            cut_template,
            cut_rotation,
            next: index,
            index,
            neighbors: Vec::new(),
            traverse_order: 0,
            traverse_direction: DVec3::ZERO,
            base_normal: DVec3::ZERO,
            near_origin_node_index: None,
            far_origin_node_index: None,
        });
        index
    }

    /// Links `first` to `second`; the link direction guides traversal.
    pub fn add_edge(&mut self, first: usize, second: usize) {
        if first >= self.nodes.len() || second >= self.nodes.len() {
            return;
        }
        self.nodes[first].next = second;
        self.nodes[first].neighbors.push(second);
        self.nodes[second].neighbors.push(first);
    }

    /// Records the original nodes an intermediate node was interpolated from.
    pub fn set_node_origin_info(&mut self, node_index: usize, near: Option<usize>, far: Option<usize>) {
        if let Some(node) = self.nodes.get_mut(node_index) {
            node.near_origin_node_index = near;
            node.far_origin_node_index = far;
        }
    }

    /// Node indices in sweep order, valid after a successful build.
    pub fn node_indices(&self) -> &[usize] {
        &self.node_indices
    }

    /// Whether the swept chain closed on itself.
    pub fn is_ring(&self) -> bool {
        self.is_ring
    }

    /// Base normal of a node, valid after a successful build.
    pub fn node_base_normal(&self, node_index: usize) -> Option<DVec3> {
        self.nodes.get(node_index).map(|node| node.base_normal)
    }

    /// Runs the sweep.
    pub fn build(&mut self) -> MeshResult<StrokeMesh> {
        self.vertices.clear();
        self.faces.clear();
        self.source_node_indices.clear();
        self.cut_directs.clear();

        self.prepare()?;
        self.build_mesh();
        self.apply_deform();
        Ok(StrokeMesh {
            vertices: self.vertices.clone(),
            faces: self.faces.clone(),
            source_node_indices: self.source_node_indices.clone(),
        })
    }

    // =========================================================================
    // TRAVERSAL
    // =========================================================================

    fn nearest_to_world_center(&self, candidates: &[usize]) -> Option<usize> {
        candidates.iter().copied().min_by(|&a, &b| {
            let da = self.nodes[a].position.length_squared();
            let db = self.nodes[b].position.length_squared();
            da.total_cmp(&db)
        })
    }

    fn count_aligned_directions(&self, start: usize) -> usize {
        let mut aligned = 0;
        let mut from = start;
        let mut current = start;
        let mut visited = HashSet::new();
        while visited.insert(current) {
            let node = &self.nodes[current];
            let neighbor = node.next_or_neighbor_other_than(from);
            if neighbor == current {
                break;
            }
            if node.next == neighbor {
                aligned += 1;
            }
            from = current;
            current = neighbor;
        }
        aligned
    }

    /// Picks the sweep start and whether the chain is a ring.
    fn starting_node_index(&self) -> Option<(usize, bool)> {
        if self.nodes.len() == 1 {
            return Some((0, false));
        }
        let endpoints: Vec<usize> = self
            .nodes
            .iter()
            .filter(|node| node.neighbors.len() == 1)
            .map(|node| node.index)
            .collect();
        if endpoints.len() != 2 {
            if self.nodes.iter().any(|node| node.neighbors.len() != 2) {
                return None;
            }
            let all: Vec<usize> = (0..self.nodes.len()).collect();
            return self.nearest_to_world_center(&all).map(|start| (start, true));
        }

        let mut aligned: Vec<(usize, usize)> = endpoints
            .iter()
            .map(|&index| (index, self.count_aligned_directions(index)))
            .collect();
        aligned.sort_by(|a, b| b.1.cmp(&a.1));
        if aligned[0].1 > aligned[1].1 {
            return Some((aligned[0].0, false));
        }
        self.nearest_to_world_center(&[aligned[0].0, aligned[1].0])
            .map(|start| (start, false))
    }

    fn sorted_node_indices(&self, start: usize) -> Vec<usize> {
        let mut indices = Vec::new();
        let mut visited = HashSet::new();
        let mut from = start;
        let mut current = start;
        while visited.insert(current) {
            indices.push(current);
            let neighbor = self.nodes[current].next_or_neighbor_other_than(from);
            if neighbor == current {
                break;
            }
            from = current;
            current = neighbor;
        }
        indices
    }

    // =========================================================================
    // BASE NORMALS
    // =========================================================================

    fn prepare(&mut self) -> MeshResult<()> {
        if self.nodes.is_empty() {
            return Err(MeshError::degenerate("stroke has no nodes"));
        }
        if self.nodes.len() == 1 {
            let node = &mut self.nodes[0];
            node.traverse_order = 0;
            node.traverse_direction = DVec3::Y;
            node.base_normal = DVec3::Z;
            self.node_indices = vec![0];
            self.is_ring = false;
            return Ok(());
        }

        let (start, is_ring) = self
            .starting_node_index()
            .ok_or_else(|| MeshError::degenerate("stroke is neither a chain nor a ring"))?;
        self.is_ring = is_ring;
        self.node_indices = self.sorted_node_indices(start);
        let count = self.node_indices.len();
        if count < 2 {
            return Err(MeshError::degenerate("stroke chain is disconnected"));
        }

        let mut edge_directions = Vec::with_capacity(count);
        for i in 0..count {
            self.nodes[self.node_indices[i]].traverse_order = i;
            let j = if is_ring { (i + 1) % count } else { (i + 1).min(count - 1) };
            let from = self.nodes[self.node_indices[i]].position;
            let to = self.nodes[self.node_indices[j]].position;
            edge_directions.push((to - from).normalize_or_zero());
        }
        for i in 0..count {
            let h = if is_ring { (i + count - 1) % count } else { i.saturating_sub(1) };
            self.nodes[self.node_indices[i]].traverse_direction =
                (edge_directions[h] + edge_directions[i]).normalize_or_zero();
        }
        self.revise_traverse_directions();

        let parameters = self.parameters;
        for direction in &mut edge_directions {
            if !parameters.base_normal_on_x {
                direction.x = 0.0;
            }
            if !parameters.base_normal_on_y {
                direction.y = 0.0;
            }
            if !parameters.base_normal_on_z {
                direction.z = 0.0;
            }
        }

        let mut valid_positions: Vec<usize> = Vec::new();
        for i in (if is_ring { 0 } else { 1 })..count {
            let h = (i + count - 1) % count;
            if edge_directions[h].dot(edge_directions[i]).abs() >= BASE_NORMAL_DOT_LIMIT {
                continue;
            }
            let mut base_normal = edge_directions[h].cross(edge_directions[i]);
            if base_normal.length_squared() < LENGTH_EPSILON {
                continue;
            }
            base_normal = base_normal.normalize();
            if let Some(&last) = valid_positions.last() {
                if self.nodes[self.node_indices[last]].base_normal.dot(base_normal) < 0.0 {
                    base_normal = -base_normal;
                }
            }
            self.nodes[self.node_indices[i]].base_normal = base_normal;
            valid_positions.push(i);
        }

        match valid_positions.as_slice() {
            [] => {
                let sum: DVec3 = self
                    .node_indices
                    .iter()
                    .map(|&index| base_normal_from_traverse_direction(self.nodes[index].traverse_direction))
                    .sum();
                self.set_all_base_normals(sum.normalize_or_zero());
            }
            [only] => {
                let base_normal = self.nodes[self.node_indices[*only]].base_normal;
                self.set_all_base_normals(base_normal);
            }
            _ => {
                self.interpolate_base_normals(&valid_positions);
                if parameters.base_normal_average {
                    let sum: DVec3 = self.node_indices.iter().map(|&index| self.nodes[index].base_normal).sum();
                    self.set_all_base_normals(sum.normalize_or_zero());
                } else {
                    self.unify_base_normals();
                    self.local_average_base_normals();
                    for &index in &self.node_indices {
                        let node = &mut self.nodes[index];
                        node.base_normal = revised_base_normal(node.traverse_direction, node.base_normal);
                    }
                    self.unify_base_normals();
                }
            }
        }
        Ok(())
    }

    fn revise_traverse_directions(&mut self) {
        let mut revised = Vec::new();
        for &index in &self.node_indices {
            let node = &self.nodes[index];
            let (Some(near), Some(far)) = (node.near_origin_node_index, node.far_origin_node_index) else {
                continue;
            };
            let (Some(near_node), Some(far_node)) = (self.nodes.get(near), self.nodes.get(far)) else {
                continue;
            };
            let near_distance = node.position.distance(near_node.position);
            let far_distance = node.position.distance(far_node.position);
            let total = near_distance + far_distance;
            if total < LENGTH_EPSILON {
                continue;
            }
            let mut factor = near_distance / total;
            let (near_normal, far_normal) = if factor <= 0.5 {
                (near_node.traverse_direction, node.traverse_direction)
            } else {
                factor = 1.0 - factor;
                (far_node.traverse_direction, node.traverse_direction)
            };
            factor *= TRAVERSE_REVISE_FACTOR;
            let mut direction = if near_normal.dot(far_normal) <= 0.0 {
                (near_normal * (1.0 - factor) - far_normal * factor).normalize_or_zero()
            } else {
                (near_normal * (1.0 - factor) + far_normal * factor).normalize_or_zero()
            };
            if direction.dot(node.traverse_direction) <= 0.0 {
                direction = -direction;
            }
            revised.push((index, direction));
        }
        for (index, direction) in revised {
            self.nodes[index].traverse_direction = direction;
        }
    }

    fn set_all_base_normals(&mut self, base_normal: DVec3) {
        for &index in &self.node_indices {
            self.nodes[index].base_normal = base_normal;
        }
    }

    fn interpolate_base_normals(&mut self, valid_positions: &[usize]) {
        let count = self.node_indices.len();
        if !self.is_ring {
            let first = valid_positions[0];
            let last = valid_positions[valid_positions.len() - 1];
            let first_normal = self.nodes[self.node_indices[first]].base_normal;
            let last_normal = self.nodes[self.node_indices[last]].base_normal;
            for i in 0..first {
                self.nodes[self.node_indices[i]].base_normal = first_normal;
            }
            for i in last + 1..count {
                self.nodes[self.node_indices[i]].base_normal = last_normal;
            }
        }
        for k in (if self.is_ring { 0 } else { 1 })..valid_positions.len() {
            let u = valid_positions[(k + valid_positions.len() - 1) % valid_positions.len()];
            let v = valid_positions[k];
            let node_u = self.nodes[self.node_indices[u]].clone();
            let node_v = self.nodes[self.node_indices[v]].clone();
            let mut i = (u + 1) % count;
            while i != v {
                let node = &mut self.nodes[self.node_indices[i]];
                let distance_u = node.position.distance(node_u.position);
                let distance_v = node.position.distance(node_v.position);
                let total = distance_u + distance_v;
                let factor_u = if total > LENGTH_EPSILON { 1.0 - distance_u / total } else { 0.5 };
                let factor_v = 1.0 - factor_u;
                node.base_normal = (node_u.base_normal * factor_u + node_v.base_normal * factor_v).normalize_or_zero();
                i = (i + 1) % count;
            }
        }
    }

    fn unify_base_normals(&mut self) {
        for i in 1..self.node_indices.len() {
            let previous = self.nodes[self.node_indices[i - 1]].base_normal;
            let node = &mut self.nodes[self.node_indices[i]];
            if previous.dot(node.base_normal) < 0.0 {
                node.base_normal = -node.base_normal;
            }
        }
    }

    fn local_average_base_normals(&mut self) {
        let count = self.node_indices.len();
        let averaged: Vec<DVec3> = (0..count)
            .map(|i| {
                let (h, j) = if self.is_ring {
                    ((i + count - 1) % count, (i + 1) % count)
                } else {
                    (i.saturating_sub(1), (i + 1).min(count - 1))
                };
                (self.nodes[self.node_indices[h]].base_normal
                    + self.nodes[self.node_indices[i]].base_normal
                    + self.nodes[self.node_indices[j]].base_normal)
                    .normalize_or_zero()
            })
            .collect();
        for (i, base_normal) in averaged.into_iter().enumerate() {
            self.nodes[self.node_indices[i]].base_normal = base_normal;
        }
    }

    // =========================================================================
    // SWEEP
    // =========================================================================

    fn build_mesh(&mut self) {
        if self.nodes.len() == 1 {
            let node = &self.nodes[0];
            let subdivided = node.cut_template.len() / 4 > 1;
            let (vertices, faces) = build_box_mesh(node.position, node.radius, subdivided);
            self.source_node_indices = vec![0; vertices.len()];
            self.cut_directs = vec![node.traverse_direction; vertices.len()];
            self.vertices = vertices;
            self.faces = faces;
            return;
        }

        let mut cuts: Vec<Vec<usize>> = Vec::with_capacity(self.node_indices.len());
        for position in 0..self.node_indices.len() {
            let index = self.node_indices[position];
            let node = &mut self.nodes[index];
            if node.cut_rotation.abs() > LENGTH_EPSILON {
                let angle = (node.cut_rotation * 180.0).to_radians();
                let rotation = DQuat::from_axis_angle(node.traverse_direction, angle);
                node.base_normal = rotation * node.base_normal;
            }
            let points = make_cut(
                node.position,
                node.radius,
                &node.cut_template,
                node.traverse_direction,
                node.base_normal,
            );
            let direct = node.traverse_direction;
            let cut = points
                .into_iter()
                .map(|point| {
                    self.vertices.push(point);
                    self.source_node_indices.push(index);
                    self.cut_directs.push(direct);
                    self.vertices.len() - 1
                })
                .collect();
            cuts.push(cut);
        }

        let count = cuts.len();
        for i in (if self.is_ring { 0 } else { 1 })..count {
            let h = (i + count - 1) % count;
            let faces = stitch_cuts(&self.vertices, &cuts[h], &cuts[i]);
            self.faces.extend(faces);
        }

        if self.is_ring {
            return;
        }
        let start_cut = cuts[0].clone();
        let end_cut = edge_loop_flipped(&cuts[count - 1]);
        if self.parameters.hollow_thickness.abs() > LENGTH_EPSILON {
            self.build_hollow(&[start_cut, end_cut]);
        } else {
            self.faces.push(start_cut);
            self.faces.push(end_cut);
        }
    }

    /// Inner wall shrunk toward the nodes, joined to the outer wall by rims.
    fn build_hollow(&mut self, end_cuts: &[Vec<usize>]) {
        let offset = self.vertices.len();
        for i in 0..offset {
            let node = &self.nodes[self.source_node_indices[i]];
            let position = self.vertices[i];
            let ray = position - node.position;
            self.vertices.push(position - ray * self.parameters.hollow_thickness);
            self.source_node_indices.push(self.source_node_indices[i]);
            self.cut_directs.push(self.cut_directs[i]);
        }
        let outer_face_count = self.faces.len();
        for f in 0..outer_face_count {
            let inner: Vec<usize> = self.faces[f].iter().rev().map(|&v| v + offset).collect();
            self.faces.push(inner);
        }
        for cut in end_cuts {
            for i in 0..cut.len() {
                let j = (i + 1) % cut.len();
                self.faces.push(vec![cut[i], cut[j], offset + cut[j], offset + cut[i]]);
            }
        }
    }

    fn apply_deform(&mut self) {
        let parameters = self.parameters;
        let thickness = parameters.deform_thickness.max(MIN_DEFORM_SCALE);
        let width = parameters.deform_width.max(MIN_DEFORM_SCALE);
        let deform_thickness = (thickness - 1.0).abs() > LENGTH_EPSILON;
        let deform_width = (width - 1.0).abs() > LENGTH_EPSILON;
        if !deform_thickness && !deform_width {
            return;
        }
        let max_radius = if parameters.deform_unified {
            self.nodes.iter().map(|node| node.radius).fold(0.0, f64::max)
        } else {
            0.0
        };
        for i in 0..self.vertices.len() {
            let node = &self.nodes[self.source_node_indices[i]];
            let position = self.vertices[i];
            let ray = position - node.position;
            let unify = if parameters.deform_unified && node.radius > LENGTH_EPSILON {
                max_radius / node.radius
            } else {
                1.0
            };
            let mut sum = DVec3::ZERO;
            let mut count = 0.0;
            if deform_thickness {
                sum += deform_position(position, ray, node.base_normal, thickness * unify);
                count += 1.0;
            }
            if deform_width {
                let side = node.base_normal.cross(self.cut_directs[i]);
                sum += deform_position(position, ray, side, width * unify);
                count += 1.0;
            }
            self.vertices[i] = sum / count;
        }
    }
}

fn base_normal_from_traverse_direction(traverse: DVec3) -> DVec3 {
    let axes = [DVec3::X, DVec3::Y, DVec3::Z];
    let mut best = 0;
    let mut best_dot = -1.0;
    let mut reversed = false;
    for (k, axis) in axes.iter().enumerate() {
        let dot = traverse.dot(*axis);
        if dot.abs() >= best_dot {
            best_dot = dot.abs();
            best = k;
            reversed = dot < 0.0;
        }
    }
    let base_normal = traverse.cross(axes[(best + 1) % 3]).normalize_or_zero();
    if reversed {
        -base_normal
    } else {
        base_normal
    }
}

fn revised_base_normal(traverse: DVec3, base_normal: DVec3) -> DVec3 {
    if base_normal.length_squared() < LENGTH_EPSILON {
        return base_normal_from_traverse_direction(traverse);
    }
    if traverse.dot(base_normal) < 0.0 {
        -base_normal
    } else {
        base_normal
    }
}

fn make_cut(center: DVec3, radius: f64, template: &[DVec2], cut_normal: DVec3, base_normal: DVec3) -> Vec<DVec3> {
    let u = cut_normal.cross(base_normal).normalize_or_zero();
    let v = u.cross(cut_normal).normalize_or_zero();
    let u = u * radius;
    let v = v * radius;
    template.iter().map(|t| center + u * t.x + v * t.y).collect()
}

fn deform_position(position: DVec3, ray: DVec3, normal: DVec3, factor: f64) -> DVec3 {
    let length_squared = normal.length_squared();
    if length_squared < LENGTH_EPSILON {
        return position;
    }
    let revised = if ray.dot(normal) < 0.0 { -normal } else { normal };
    let projected = revised * (ray.dot(revised) / length_squared);
    position + projected * factor - projected
}

/// Reverses a loop keeping its first element in front.
pub(crate) fn edge_loop_flipped(edge_loop: &[usize]) -> Vec<usize> {
    let mut flipped: Vec<usize> = edge_loop.iter().rev().copied().collect();
    flipped.rotate_right(1);
    flipped
}

/// Side faces between two consecutive cuts swept along the same direction.
///
/// Equal sized cuts become quads aligned at the rotation with the smallest
/// total span; unequal cuts are joined by a greedy triangle strip.
fn stitch_cuts(vertices: &[DVec3], previous: &[usize], current: &[usize]) -> Vec<Vec<usize>> {
    let (m, n) = (previous.len(), current.len());
    if m < 2 || n < 2 {
        return Vec::new();
    }
    if m == n {
        let offset = (0..n)
            .min_by(|&a, &b| {
                let span = |offset: usize| -> f64 {
                    (0..n)
                        .map(|k| vertices[previous[k]].distance_squared(vertices[current[(k + offset) % n]]))
                        .sum()
                };
                span(a).total_cmp(&span(b))
            })
            .unwrap_or(0);
        return (0..n)
            .map(|i| {
                let j = (i + 1) % n;
                vec![
                    previous[j],
                    previous[i],
                    current[(i + offset) % n],
                    current[(j + offset) % n],
                ]
            })
            .collect();
    }

    let first = vertices[previous[0]];
    let start = (0..n)
        .min_by(|&a, &b| {
            first
                .distance_squared(vertices[current[a]])
                .total_cmp(&first.distance_squared(vertices[current[b]]))
        })
        .unwrap_or(0);
    let at_previous = |k: usize| previous[k % m];
    let at_current = |k: usize| current[(start + k) % n];
    let mut faces = Vec::with_capacity(m + n);
    let (mut a, mut b) = (0, 0);
    while a < m || b < n {
        let advance_previous = if a == m {
            false
        } else if b == n {
            true
        } else {
            let diagonal_previous = vertices[at_previous(a + 1)].distance_squared(vertices[at_current(b)]);
            let diagonal_current = vertices[at_previous(a)].distance_squared(vertices[at_current(b + 1)]);
            diagonal_previous <= diagonal_current
        };
        if advance_previous {
            faces.push(vec![at_previous(a + 1), at_previous(a), at_current(b)]);
            a += 1;
        } else {
            faces.push(vec![at_current(b), at_current(b + 1), at_previous(a)]);
            b += 1;
        }
    }
    faces
}
