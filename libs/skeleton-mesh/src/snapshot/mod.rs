//! # Snapshot
//!
//! Declarative skeleton description consumed by one generation pass.
//!
//! Every record is a flat string-keyed property bag, mirroring the format
//! produced by the editing layer. Typed accessors live next to the bags so
//! the generator never parses strings inline.
//!
//! ```text
//! canvas ─ origin
//! nodes ──┐
//! edges ──┼─ grouped by "partId" into parts
//! parts ──┘
//! components ─ tree rooted at rootComponent ("children" lists)
//! ```

mod attributes;


pub use attributes::{CombineMode, PartBase, PartTarget};

use crate::error::MeshResult;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat string-keyed record.
pub type PropertyBag = BTreeMap<String, String>;

/// Id used for the root component in caches and dirty sets.
pub const ROOT_COMPONENT_ID: &str = "{00000000-0000-0000-0000-000000000000}";

/// Immutable skeleton graph for one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    /// Canvas settings (`originX`, `originY`, `originZ`)
    pub canvas: PropertyBag,
    /// Nodes by id
    pub nodes: BTreeMap<String, PropertyBag>,
    /// Edges by id
    pub edges: BTreeMap<String, PropertyBag>,
    /// Parts by id
    pub parts: BTreeMap<String, PropertyBag>,
    /// Components by id
    pub components: BTreeMap<String, PropertyBag>,
    /// Root of the component tree
    pub root_component: PropertyBag,
}

impl Snapshot {
    /// Parses a snapshot from JSON.
    pub fn from_json(text: &str) -> MeshResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serializes the snapshot to JSON.
    pub fn to_json(&self) -> MeshResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Canvas origin used to convert node coordinates.
    pub fn origin(&self) -> DVec3 {
        DVec3::new(
            float_value(&self.canvas, "originX"),
            float_value(&self.canvas, "originY"),
            float_value(&self.canvas, "originZ"),
        )
    }

    /// Looks up a component; the root id resolves to the root component.
    pub fn component(&self, id: &str) -> Option<&PropertyBag> {
        if id == ROOT_COMPONENT_ID {
            Some(&self.root_component)
        } else {
            self.components.get(id)
        }
    }

    /// Mutable component lookup with the same root rule.
    pub fn component_mut(&mut self, id: &str) -> Option<&mut PropertyBag> {
        if id == ROOT_COMPONENT_ID {
            Some(&mut self.root_component)
        } else {
            self.components.get_mut(id)
        }
    }

    /// Converts a node's canvas coordinates into model space.
    ///
    /// Y and Z are flipped around the origin so that the canvas' downward
    /// Y axis points up in model space.
    pub fn node_position(&self, node: &PropertyBag) -> DVec3 {
        let origin = self.origin();
        DVec3::new(
            float_value(node, "x") - origin.x,
            origin.y - float_value(node, "y"),
            origin.z - float_value(node, "z"),
        )
    }
}

/// Value of `key`, or an empty string.
pub fn value_or_empty<'a>(bag: &'a PropertyBag, key: &str) -> &'a str {
    bag.get(key).map(String::as_str).unwrap_or("")
}

/// Whether a property string spells a true value.
pub fn is_true_value(value: &str) -> bool {
    matches!(value, "true" | "True" | "1")
}

/// Boolean property, false when absent.
pub fn bool_value(bag: &PropertyBag, key: &str) -> bool {
    is_true_value(value_or_empty(bag, key))
}

/// Float property, zero when absent or malformed.
pub fn float_value(bag: &PropertyBag, key: &str) -> f64 {
    value_or_empty(bag, key).trim().parse().unwrap_or(0.0)
}

/// Float property when present and well formed.
pub fn optional_float(bag: &PropertyBag, key: &str) -> Option<f64> {
    bag.get(key).and_then(|value| value.trim().parse().ok())
}

/// Non-empty ids of a comma separated list.
pub fn split_ids(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').filter(|id| !id.is_empty())
}

/// Ordered child ids of a component.
pub fn component_children(component: &PropertyBag) -> Vec<String> {
    split_ids(value_or_empty(component, "children"))
        .map(str::to_string)
        .collect()
}

/// Part id linked by a leaf component.
pub fn component_linked_part(component: &PropertyBag) -> Option<&str> {
    if value_or_empty(component, "linkDataType") == "partId" {
        Some(value_or_empty(component, "linkData"))
    } else {
        None
    }
}
