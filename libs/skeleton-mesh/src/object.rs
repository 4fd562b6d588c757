//! # Generated Object
//!
//! Output of one generation pass, plus the node attribution records that
//! travel with meshes through the cache.

use config::constants::DEFAULT_PART_COLOR;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// RGBA color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Parses `#rrggbb` or `#aarrggbb`.
    ///
    /// Any other spelling yields `None`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use skeleton_mesh::object::Color;
    ///
    /// let red = Color::from_name("#ff0000").unwrap();
    /// assert_eq!(red.r, 1.0);
    /// assert_eq!(red.a, 1.0);
    /// assert!(Color::from_name("red").is_none());
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let hex = name.strip_prefix('#')?;
        let channel = |offset: usize| -> Option<f32> {
            let digits = hex.get(offset..offset + 2)?;
            u8::from_str_radix(digits, 16).ok().map(|value| value as f32 / 255.0)
        };
        match hex.len() {
            6 => Some(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: 1.0,
            }),
            8 => Some(Self {
                a: channel(0)?,
                r: channel(2)?,
                g: channel(4)?,
                b: channel(6)?,
            }),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::from(DEFAULT_PART_COLOR)
    }
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// `(part id, node id)` a vertex or triangle is attributed to.
///
/// Empty ids mean unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNode {
    pub part_id: String,
    pub node_id: String,
}

impl SourceNode {
    pub fn new(part_id: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self {
            part_id: part_id.into(),
            node_id: node_id.into(),
        }
    }

    /// True when no node was resolved.
    pub fn is_unresolved(&self) -> bool {
        self.node_id.is_empty()
    }
}

/// Sweep position attributed to a source node.
pub type NodeVertex = (DVec3, SourceNode);

/// Echo of a snapshot node that contributed to the object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectNode {
    pub part_id: String,
    pub node_id: String,
    /// Model space position
    pub origin: DVec3,
    pub radius: f64,
    pub color: Color,
    pub material_id: Option<String>,
    pub countershaded: bool,
    pub mirror_from_part_id: Option<String>,
    pub mirrored_by_part_id: Option<String>,
    /// False for parts that were not combined (disabled or non-model)
    pub joined: bool,
}

/// Echo of a snapshot edge that contributed to the object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectEdge {
    pub part_id: String,
    pub from_node_id: String,
    pub to_node_id: String,
}

/// Geometry a component produced this pass, for editor previews.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentPreview {
    pub vertices: Vec<DVec3>,
    pub triangles: Vec<[usize; 3]>,
    pub color: Color,
}

/// Combined result of one generation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    pub vertices: Vec<DVec3>,
    pub triangles: Vec<[usize; 3]>,
    /// Faces with recovered quads, triangles elsewhere
    pub triangle_and_quads: Vec<Vec<usize>>,
    /// Flat normal per triangle
    pub triangle_normals: Vec<DVec3>,
    /// Smoothed normal per triangle corner
    pub triangle_vertex_normals: Vec<[DVec3; 3]>,
    pub triangle_colors: Vec<Color>,
    pub triangle_source_nodes: Vec<SourceNode>,
    pub vertex_source_nodes: Vec<SourceNode>,
    pub nodes: Vec<ObjectNode>,
    pub edges: Vec<ObjectEdge>,
    pub node_vertices: Vec<NodeVertex>,
    /// False when any part or boolean failed this pass
    pub is_successful: bool,
    /// Components whose preview was regenerated this pass
    pub preview_component_ids: BTreeSet<String>,
    pub component_previews: BTreeMap<String, ComponentPreview>,
}

impl Object {
    /// Serializes the object to JSON.
    pub fn to_json(&self) -> crate::error::MeshResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parses_rgb() {
        let color = Color::from_name("#336699").unwrap();
        assert!((color.g - 0.4).abs() < 1e-6);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_color_parses_leading_alpha() {
        let color = Color::from_name("#80ffffff").unwrap();
        assert!((color.a - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(color.r, 1.0);
    }

    #[test]
    fn test_color_rejects_malformed_names() {
        assert!(Color::from_name("#12345").is_none());
        assert!(Color::from_name("#gg0000").is_none());
        assert!(Color::from_name("").is_none());
    }

    #[test]
    fn test_source_node_unresolved_by_default() {
        assert!(SourceNode::default().is_unresolved());
        assert!(!SourceNode::new("p", "n").is_unresolved());
    }
}
