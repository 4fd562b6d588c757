//! Typed views of enumerated snapshot properties.

use super::{bool_value, value_or_empty, PropertyBag};
use serde::{Deserialize, Serialize};

/// How a component joins its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CombineMode {
    /// Union into the accumulated result.
    #[default]
    Normal,
    /// Subtracted from the accumulated result.
    Inversion,
    /// Kept out of boolean combination entirely.
    Uncombined,
}

impl CombineMode {
    /// Parses a mode name; unknown names are `Normal`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Inversion" => Self::Inversion,
            "Uncombined" => Self::Uncombined,
            _ => Self::Normal,
        }
    }

    /// Mode of a component bag, honoring the legacy `inverse` flag.
    pub fn of_component(component: &PropertyBag) -> Self {
        let mode = Self::from_name(value_or_empty(component, "combineMode"));
        if mode == Self::Normal && bool_value(component, "inverse") {
            Self::Inversion
        } else {
            mode
        }
    }

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Inversion => "Inversion",
            Self::Uncombined => "Uncombined",
        }
    }
}

/// What a part's nodes are used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PartTarget {
    /// Swept into a tube and combined.
    #[default]
    Model,
    /// Donates a cut face profile to other parts.
    CutFace,
    /// One spline of a stitching mesh.
    StitchingLine,
}

impl PartTarget {
    /// Parses a target name; unknown names are `Model`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "CutFace" => Self::CutFace,
            "StitchingLine" => Self::StitchingLine,
            _ => Self::Model,
        }
    }
}

/// Plane constraint used when estimating base normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PartBase {
    /// Free base normal on every axis.
    #[default]
    Xyz,
    /// One averaged base normal for the whole stroke.
    Average,
    /// Base normal without an X component.
    Yz,
    /// Base normal without a Z component.
    Xy,
    /// Base normal without a Y component.
    Zx,
}

impl PartBase {
    /// Parses a base name; unknown names are `Xyz`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Average" => Self::Average,
            "YZ" => Self::Yz,
            "XY" => Self::Xy,
            "ZX" => Self::Zx,
            _ => Self::Xyz,
        }
    }
}
