//! # Stroke Sweeping
//!
//! A part's nodes and edges become a stroke: [`StrokeModifier`] refines the
//! node graph, [`StrokeMeshBuilder`] sweeps it into a closed tube.

mod builder;
mod modifier;

pub use builder::{BuildParameters, StrokeMesh, StrokeMeshBuilder};
pub use modifier::{StrokeEdge, StrokeModifier, StrokeNode};
