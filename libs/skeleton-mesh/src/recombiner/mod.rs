//! # Mesh Recombiner
//!
//! Re-merges the faces a boolean split along its intersection seam.
//!
//! Seam vertices are result vertices with [`Source::None`]. They are grouped
//! into islands through the seam edges connecting them; every face touching
//! an island belongs to the island's seam area. The boundary of a seam area
//! is collected per side (faces holding a vertex of the first input are one
//! side, the rest the other) and turned into edge loops. When an island has
//! exactly one loop per side, its seam area is dropped and both loops are
//! bridged with fresh triangles.


use crate::combiner::Source;
use crate::mesh::Mesh;
use config::constants::MAX_EDGE_LOOP_LENGTH;
use glam::DVec3;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use tracing::debug;

#[derive(Debug, Default)]
struct IslandData {
    half_edges: [Vec<(usize, usize)>; 2],
    edge_loops: [Vec<Vec<usize>>; 2],
}

/// Seam optimizer over a boolean result.
#[derive(Debug)]
pub struct MeshRecombiner<'a> {
    vertices: &'a [DVec3],
    sources: &'a [Source],
    faces: &'a [[usize; 3]],
    half_edge_to_face: HashMap<(usize, usize), usize>,
    faces_in_seam_area: BTreeMap<usize, usize>,
    good_seams: BTreeSet<usize>,
    regenerated_faces: Vec<[usize; 3]>,
    regenerated_vertices: Vec<DVec3>,
    regenerated_sources: Vec<Source>,
}

impl<'a> MeshRecombiner<'a> {
    /// Creates a recombiner for a mesh and its per-vertex sources.
    pub fn new(mesh: &'a Mesh, sources: &'a [Source]) -> Self {
        Self {
            vertices: mesh.vertices(),
            sources,
            faces: mesh.triangles(),
            half_edge_to_face: HashMap::new(),
            faces_in_seam_area: BTreeMap::new(),
            good_seams: BTreeSet::new(),
            regenerated_faces: Vec::new(),
            regenerated_vertices: Vec::new(),
            regenerated_sources: Vec::new(),
        }
    }

    /// Runs the optimization, returning false when the input is unusable.
    pub fn recombine(&mut self) -> bool {
        if self.sources.len() != self.vertices.len() {
            return false;
        }
        self.build_half_edge_to_face_map();

        let mut seam_link: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for face in self.faces {
            for i in 0..3 {
                let (index, next) = (face[i], face[(i + 1) % 3]);
                if self.sources[index] == Source::None && self.sources[next] == Source::None {
                    seam_link.entry(index).or_default().push(next);
                }
            }
        }
        let seam_vertex_to_island = split_seam_vertices_to_islands(&seam_link);

        let mut edges_in_seam_area: BTreeMap<(usize, usize), (usize, bool)> = BTreeMap::new();
        for (face_index, face) in self.faces.iter().enumerate() {
            let mut island = None;
            let mut in_first_group = false;
            for &index in face {
                match self.sources[index] {
                    Source::None => {
                        if let Some(&found) = seam_vertex_to_island.get(&index) {
                            island = Some(found);
                        }
                    }
                    Source::First => in_first_group = true,
                    Source::Second => {}
                }
            }
            let Some(island) = island else {
                continue;
            };
            self.faces_in_seam_area.entry(face_index).or_insert(island);
            for i in 0..3 {
                edges_in_seam_area
                    .entry((face[i], face[(i + 1) % 3]))
                    .or_insert((island, in_first_group));
            }
        }

        let mut islands: BTreeMap<usize, IslandData> = BTreeMap::new();
        for (&(from, to), &(island, in_first_group)) in &edges_in_seam_area {
            if !edges_in_seam_area.contains_key(&(to, from)) {
                let side = if in_first_group { 0 } else { 1 };
                islands.entry(island).or_default().half_edges[side].push((from, to));
            }
        }
        for data in islands.values_mut() {
            for side in 0..2 {
                data.edge_loops[side] = convert_half_edges_to_edge_loops(&data.half_edges[side]).unwrap_or_default();
            }
        }

        for (&island, data) in &mut islands {
            for side in 0..2 {
                for edge_loop in &mut data.edge_loops[side] {
                    while self.adjust_triangles_from_seam(edge_loop, island) > 0 {}
                }
            }
        }

        for (&island, data) in &islands {
            if data.edge_loops[0].len() == 1
                && data.edge_loops[1].len() == 1
                && self.bridge(&data.edge_loops[0][0], &data.edge_loops[1][0])
            {
                self.good_seams.insert(island);
            }
        }
        debug!(
            islands = islands.len(),
            recombined = self.good_seams.len(),
            "Recombined seams"
        );

        self.copy_non_seam_faces();
        self.remove_unreferenced_vertices();
        true
    }

    /// Mesh after recombination.
    pub fn regenerated_mesh(&self) -> Mesh {
        Mesh::from_triangles(self.regenerated_vertices.clone(), self.regenerated_faces.clone())
    }

    /// Source of every regenerated vertex.
    pub fn regenerated_sources(&self) -> &[Source] {
        &self.regenerated_sources
    }

    fn build_half_edge_to_face_map(&mut self) {
        self.half_edge_to_face.clear();
        for (face_index, face) in self.faces.iter().enumerate() {
            for i in 0..3 {
                self.half_edge_to_face
                    .entry((face[i], face[(i + 1) % 3]))
                    .or_insert(face_index);
            }
        }
    }

    /// Pulls faces touching the loop twice into the seam area, shortening the loop.
    fn adjust_triangles_from_seam(&mut self, edge_loop: &mut Vec<usize>, island: usize) -> usize {
        if edge_loop.len() <= 3 {
            return 0;
        }
        let count = edge_loop.len();
        let mut loop_faces = Vec::with_capacity(count);
        for i in 0..count {
            let j = (i + 1) % count;
            match self.half_edge_to_face.get(&(edge_loop[j], edge_loop[i])) {
                Some(&face) => loop_faces.push(face),
                None => return 0,
            }
        }

        let mut removed_faces = Vec::new();
        let mut ignored = BTreeSet::new();
        let mut i = 0;
        while i < count {
            let j = (i + 1) % count;
            if loop_faces[i] == loop_faces[j] {
                removed_faces.push(loop_faces[i]);
                ignored.insert(edge_loop[j]);
                i += 1;
            }
            i += 1;
        }
        if ignored.is_empty() {
            return 0;
        }
        let shortened: Vec<usize> = edge_loop.iter().copied().filter(|v| !ignored.contains(v)).collect();
        if shortened.len() < 3 {
            return 0;
        }
        *edge_loop = shortened;
        for face in removed_faces {
            self.faces_in_seam_area.entry(face).or_insert(island);
        }
        ignored.len()
    }

    fn nearest_index(&self, position: DVec3, edge_loop: &[usize]) -> usize {
        let mut chosen = 0;
        let mut min_distance = f64::MAX;
        for (i, &vertex) in edge_loop.iter().enumerate() {
            let distance = self.vertices[vertex].distance_squared(position);
            if distance < min_distance {
                min_distance = distance;
                chosen = i;
            }
        }
        chosen
    }

    fn bridge(&mut self, first: &[usize], second: &[usize]) -> bool {
        let (large, small) = if first.len() < second.len() {
            (second, first)
        } else {
            (first, second)
        };
        let mut matched_pairs: Vec<(usize, usize)> = Vec::new();
        let mut nearest_from_large: HashMap<usize, usize> = HashMap::new();
        for i in 0..small.len() {
            let nearest_on_large = self.nearest_index(self.vertices[small[i]], large);
            let nearest_on_small = match nearest_from_large.get(&nearest_on_large) {
                Some(&found) => found,
                None => {
                    let found = self.nearest_index(self.vertices[large[nearest_on_large]], small);
                    nearest_from_large.insert(nearest_on_large, found);
                    found
                }
            };
            if nearest_on_small == i {
                matched_pairs.push((nearest_on_small, nearest_on_large));
            }
        }
        if matched_pairs.is_empty() {
            return false;
        }

        for i in 0..matched_pairs.len() {
            let j = (i + 1) % matched_pairs.len();
            let mut small_side = Vec::new();
            let mut index = matched_pairs[i].0;
            loop {
                small_side.push(small[index]);
                if index == matched_pairs[j].0 {
                    break;
                }
                index = (index + 1) % small.len();
            }
            let mut large_side = Vec::new();
            let mut index = matched_pairs[j].1;
            loop {
                large_side.push(large[index]);
                if index == matched_pairs[i].1 {
                    break;
                }
                index = (index + 1) % large.len();
            }
            large_side.reverse();
            self.fill_pairs(&small_side, &large_side);
        }
        true
    }

    /// Zips two opposite running chains with triangles, advancing on the
    /// side with the narrower angle.
    fn fill_pairs(&mut self, small: &[usize], large: &[usize]) {
        let (mut s, mut l) = (0, 0);
        while s + 1 < small.len() || l + 1 < large.len() {
            let advance_small = if s + 1 < small.len() && l + 1 < large.len() {
                let p = |index: usize| self.vertices[index];
                let angle_on_small = (p(large[l]) - p(small[s])).angle_between(p(small[s + 1]) - p(small[s]));
                let angle_on_large = (p(small[s]) - p(large[l])).angle_between(p(large[l + 1]) - p(large[l]));
                angle_on_small < angle_on_large
            } else {
                l + 1 >= large.len()
            };
            if advance_small {
                self.regenerated_faces.push([small[s], small[s + 1], large[l]]);
                s += 1;
            } else {
                self.regenerated_faces.push([large[l + 1], large[l], small[s]]);
                l += 1;
            }
        }
    }

    fn copy_non_seam_faces(&mut self) {
        for (face_index, face) in self.faces.iter().enumerate() {
            let in_good_seam = self
                .faces_in_seam_area
                .get(&face_index)
                .is_some_and(|island| self.good_seams.contains(island));
            if !in_good_seam {
                self.regenerated_faces.push(*face);
            }
        }
    }

    fn remove_unreferenced_vertices(&mut self) {
        let mut old_to_new: HashMap<usize, usize> = HashMap::new();
        for face in &mut self.regenerated_faces {
            for index in face.iter_mut() {
                let mapped = *old_to_new.entry(*index).or_insert_with(|| {
                    self.regenerated_vertices.push(self.vertices[*index]);
                    self.regenerated_sources.push(self.sources[*index]);
                    self.regenerated_vertices.len() - 1
                });
                *index = mapped;
            }
        }
    }
}

/// Groups seam vertices connected through seam edges.
fn split_seam_vertices_to_islands(seam_link: &BTreeMap<usize, Vec<usize>>) -> HashMap<usize, usize> {
    let mut vertex_to_island = HashMap::new();
    let mut next_island = 0;
    for &start in seam_link.keys() {
        if vertex_to_island.contains_key(&start) {
            continue;
        }
        let mut queue = VecDeque::from([start]);
        while let Some(vertex) = queue.pop_front() {
            if vertex_to_island.contains_key(&vertex) {
                continue;
            }
            vertex_to_island.insert(vertex, next_island);
            if let Some(neighbors) = seam_link.get(&vertex) {
                queue.extend(neighbors.iter().copied());
            }
        }
        next_island += 1;
    }
    vertex_to_island
}

/// Chains half edges into closed loops.
///
/// Fails when a vertex starts two half edges, a chain does not close or a
/// loop is shorter than a triangle.
pub(crate) fn convert_half_edges_to_edge_loops(half_edges: &[(usize, usize)]) -> Option<Vec<Vec<usize>>> {
    let mut links: BTreeMap<usize, usize> = BTreeMap::new();
    for &(from, to) in half_edges {
        if links.insert(from, to).is_some() {
            return None;
        }
    }
    let mut edge_loops = Vec::new();
    while let Some((&head, _)) = links.iter().next() {
        let mut edge_loop = Vec::new();
        let mut vertex = head;
        let mut loop_back = false;
        for _ in 0..MAX_EDGE_LOOP_LENGTH {
            edge_loop.push(vertex);
            let Some(&next) = links.get(&vertex) else {
                break;
            };
            vertex = next;
            if vertex == head {
                loop_back = true;
                break;
            }
        }
        if !loop_back || edge_loop.len() < 3 {
            return None;
        }
        for vertex in &edge_loop {
            links.remove(vertex);
        }
        edge_loops.push(edge_loop);
    }
    Some(edge_loops)
}
