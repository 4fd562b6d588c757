//! # BSP Tree
//!
//! Solid BSP tree over convex polygons. Nodes live in an arena and are
//! addressed by index, so every traversal is an explicit work stack.

use super::polygon::{Plane, Polygon, SplitResult};

#[derive(Debug, Clone)]
struct BspNode {
    plane: Option<Plane>,
    front: Option<usize>,
    back: Option<usize>,
    polygons: Vec<Polygon>,
}

impl BspNode {
    fn empty() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }
}

/// Binary space partition of a closed polygon soup.
#[derive(Debug, Clone)]
pub struct BspTree {
    nodes: Vec<BspNode>,
}

impl BspTree {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let mut tree = Self {
            nodes: vec![BspNode::empty()],
        };
        tree.build(polygons);
        tree
    }

    /// Inserts polygons, splitting them by the existing planes.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        if polygons.is_empty() {
            return;
        }
        let mut stack = vec![(0usize, polygons)];
        while let Some((index, polygons)) = stack.pop() {
            let Some(first) = polygons.first() else {
                continue;
            };
            let plane = *self.nodes[index].plane.get_or_insert(first.plane);
            let mut split = SplitResult::default();
            for polygon in polygons {
                polygon.split(&plane, &mut split);
            }
            let node = &mut self.nodes[index];
            node.polygons.extend(split.coplanar_front);
            node.polygons.extend(split.coplanar_back);
            if !split.front.is_empty() {
                let child = self.child(index, true);
                stack.push((child, split.front));
            }
            if !split.back.is_empty() {
                let child = self.child(index, false);
                stack.push((child, split.back));
            }
        }
    }

    fn child(&mut self, index: usize, front: bool) -> usize {
        let existing = if front {
            self.nodes[index].front
        } else {
            self.nodes[index].back
        };
        if let Some(child) = existing {
            return child;
        }
        let child = self.nodes.len();
        self.nodes.push(BspNode::empty());
        if front {
            self.nodes[index].front = Some(child);
        } else {
            self.nodes[index].back = Some(child);
        }
        child
    }

    /// Turns the solid inside out.
    pub fn invert(&mut self) {
        for node in &mut self.nodes {
            for polygon in &mut node.polygons {
                polygon.flip();
            }
            node.plane = node.plane.map(|plane| plane.flip());
            std::mem::swap(&mut node.front, &mut node.back);
        }
    }

    /// Removes the parts of `polygons` inside this solid.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut kept = Vec::new();
        let mut stack = vec![(0usize, polygons)];
        while let Some((index, polygons)) = stack.pop() {
            let node = &self.nodes[index];
            let Some(plane) = node.plane else {
                kept.extend(polygons);
                continue;
            };
            let mut split = SplitResult::default();
            for polygon in polygons {
                polygon.split(&plane, &mut split);
            }
            let mut front = split.front;
            front.extend(split.coplanar_front);
            let mut back = split.back;
            back.extend(split.coplanar_back);
            match node.front {
                Some(child) => stack.push((child, front)),
                None => kept.extend(front),
            }
            if let Some(child) = node.back {
                stack.push((child, back));
            }
        }
        kept
    }

    /// Removes the parts of this tree's polygons inside `other`.
    pub fn clip_to(&mut self, other: &BspTree) {
        for index in 0..self.nodes.len() {
            let polygons = std::mem::take(&mut self.nodes[index].polygons);
            self.nodes[index].polygons = other.clip_polygons(polygons);
        }
    }

    pub fn all_polygons(&self) -> Vec<Polygon> {
        self.nodes.iter().flat_map(|node| node.polygons.iter().cloned()).collect()
    }

    pub fn polygon_count(&self) -> usize {
        self.nodes.iter().map(|node| node.polygons.len()).sum()
    }
}
