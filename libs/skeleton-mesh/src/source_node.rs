//! # Triangle Source Resolution
//!
//! Attributes every output triangle to the `(part, node)` that generated
//! it. Vertices are matched to sweep positions by [`PositionKey`]; a
//! triangle takes the most frequent source among its corners. Triangles
//! with no matched corner (seam triangles created by booleans) are filled
//! from neighboring resolved triangles, best aligned neighbor first.
//! Vertices without a direct match take the most frequent source of their
//! triangles.

use crate::object::{NodeVertex, SourceNode};
use crate::position_key::PositionKey;
use glam::DVec3;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Resolved attribution for triangles and vertices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSources {
    pub triangle_sources: Vec<SourceNode>,
    pub vertex_sources: Vec<SourceNode>,
}

struct HalfEdgeSource {
    corner: usize,
    source: SourceNode,
}

struct Candidate {
    source: SourceNode,
    from: usize,
    to: usize,
    dot: f64,
    length: f64,
}

/// Resolves triangle and vertex sources.
pub fn resolve_triangle_source_node(
    vertices: &[DVec3],
    triangles: &[[usize; 3]],
    node_vertices: &[NodeVertex],
) -> ResolvedSources {
    let mut position_map: HashMap<PositionKey, &SourceNode> = HashMap::new();
    for (position, source) in node_vertices {
        position_map.entry(PositionKey::new(*position)).or_insert(source);
    }
    let mut vertex_sources: Vec<SourceNode> = vertices
        .iter()
        .map(|v| {
            position_map
                .get(&PositionKey::new(*v))
                .map(|source| (*source).clone())
                .unwrap_or_default()
        })
        .collect();

    let mut triangle_sources: Vec<SourceNode> = Vec::with_capacity(triangles.len());
    let mut broken: BTreeSet<usize> = BTreeSet::new();
    let mut half_edges: BTreeMap<(usize, usize), HalfEdgeSource> = BTreeMap::new();
    for (index, triangle) in triangles.iter().enumerate() {
        let mut counts: Vec<(&SourceNode, usize)> = Vec::new();
        for &vertex in triangle {
            let source = &vertex_sources[vertex];
            if source.is_unresolved() {
                continue;
            }
            match counts.iter_mut().find(|(existing, _)| *existing == source) {
                Some((_, count)) => *count += 1,
                None => counts.push((source, 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        let Some((chosen, _)) = counts.first() else {
            triangle_sources.push(SourceNode::default());
            broken.insert(index);
            continue;
        };
        let chosen = (*chosen).clone();
        for i in 0..3 {
            let (from, to) = (triangle[i], triangle[(i + 1) % 3]);
            if half_edges.remove(&(to, from)).is_some() {
                continue;
            }
            half_edges.insert(
                (from, to),
                HalfEdgeSource {
                    corner: triangle[(i + 2) % 3],
                    source: chosen.clone(),
                },
            );
        }
        triangle_sources.push(chosen);
    }

    let mut broken_by_edge: HashMap<(usize, usize), usize> = HashMap::new();
    let mut candidates: Vec<Candidate> = Vec::new();
    for &index in &broken {
        let triangle = triangles[index];
        for i in 0..3 {
            let (from, to) = (triangle[i], triangle[(i + 1) % 3]);
            broken_by_edge.insert((from, to), index);
            let Some(opposite) = half_edges.get(&(to, from)) else {
                continue;
            };
            let a = vertices[from];
            let ab = vertices[to] - a;
            let ac = (vertices[triangle[(i + 2) % 3]] - a).normalize_or_zero();
            let ad = (vertices[opposite.corner] - a).normalize_or_zero();
            let ab_unit = ab.normalize_or_zero();
            let face = ab_unit.cross(ac).normalize_or_zero();
            let neighbor = ad.cross(ab_unit).normalize_or_zero();
            candidates.push(Candidate {
                source: opposite.source.clone(),
                from,
                to,
                dot: face.dot(neighbor),
                length: ab.length(),
            });
        }
    }

    candidates.sort_by(|a, b| b.dot.total_cmp(&a.dot).then(b.length.total_cmp(&a.length)));
    for candidate in &candidates {
        if broken.is_empty() {
            break;
        }
        let mut pending = vec![(candidate.from, candidate.to)];
        let mut order = 0;
        while order < pending.len() {
            let edge = pending[order];
            order += 1;
            let Some(&index) = broken_by_edge.get(&edge) else {
                continue;
            };
            if !broken.remove(&index) {
                continue;
            }
            triangle_sources[index] = candidate.source.clone();
            let triangle = triangles[index];
            for i in 0..3 {
                pending.push((triangle[(i + 1) % 3], triangle[i]));
            }
        }
    }

    fix_remaining_vertex_sources(triangles, &triangle_sources, &mut vertex_sources);
    ResolvedSources {
        triangle_sources,
        vertex_sources,
    }
}

fn fix_remaining_vertex_sources(
    triangles: &[[usize; 3]],
    triangle_sources: &[SourceNode],
    vertex_sources: &mut [SourceNode],
) {
    let mut remaining: BTreeMap<usize, BTreeMap<&SourceNode, usize>> = BTreeMap::new();
    for (index, triangle) in triangles.iter().enumerate() {
        for &vertex in triangle {
            if !vertex_sources[vertex].is_unresolved() {
                continue;
            }
            *remaining
                .entry(vertex)
                .or_default()
                .entry(&triangle_sources[index])
                .or_default() += 1;
        }
    }
    for (vertex, counts) in remaining {
        let mut best: Option<(&SourceNode, usize)> = None;
        for (source, count) in counts {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((source, count));
            }
        }
        if let Some((source, _)) = best {
            vertex_sources[vertex] = source.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Square split into two triangles, plus a third triangle on the far
    /// side whose corners match no sweep position.
    fn strip() -> (Vec<DVec3>, Vec<[usize; 3]>) {
        let vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(2.0, 0.5, 0.0),
        ];
        (vertices, vec![[0, 1, 2], [0, 2, 3], [1, 4, 2]])
    }

    #[test]
    fn test_resolve_majority_source() {
        let (vertices, triangles) = strip();
        let node_vertices = vec![
            (vertices[0], SourceNode::new("p", "a")),
            (vertices[1], SourceNode::new("p", "a")),
            (vertices[2], SourceNode::new("p", "b")),
            (vertices[3], SourceNode::new("p", "b")),
        ];
        let resolved = resolve_triangle_source_node(&vertices, &triangles, &node_vertices);
        assert_eq!(resolved.triangle_sources[0], SourceNode::new("p", "a"));
        assert_eq!(resolved.triangle_sources[1], SourceNode::new("p", "b"));
    }

    #[test]
    fn test_resolve_fills_broken_triangle_from_neighbor() {
        let (vertices, triangles) = strip();
        // Only the left corners are known; triangle 2 touches vertex 1 and 2
        // which are unknown here, so it starts broken.
        let node_vertices = vec![
            (vertices[0], SourceNode::new("p", "a")),
            (vertices[3], SourceNode::new("p", "a")),
        ];
        let resolved = resolve_triangle_source_node(&vertices, &triangles, &node_vertices);
        assert!(resolved.triangle_sources.iter().all(|s| *s == SourceNode::new("p", "a")));
    }

    #[test]
    fn test_resolve_fixes_unmatched_vertices() {
        let (vertices, triangles) = strip();
        let node_vertices = vec![
            (vertices[0], SourceNode::new("p", "a")),
            (vertices[1], SourceNode::new("p", "a")),
            (vertices[2], SourceNode::new("p", "a")),
        ];
        let resolved = resolve_triangle_source_node(&vertices, &triangles, &node_vertices);
        assert_eq!(resolved.vertex_sources.len(), vertices.len());
        assert_eq!(resolved.vertex_sources[4], SourceNode::new("p", "a"));
    }

    #[test]
    fn test_resolve_without_node_vertices_leaves_unresolved() {
        let (vertices, triangles) = strip();
        let resolved = resolve_triangle_source_node(&vertices, &triangles, &[]);
        assert!(resolved.triangle_sources.iter().all(SourceNode::is_unresolved));
    }
}
