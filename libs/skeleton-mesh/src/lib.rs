//! # Skeleton Mesh
//!
//! Turns a skeleton [`Snapshot`] into one combined triangle mesh.
//!
//! ## Architecture
//!
//! ```text
//! Snapshot → parts (stroke sweep / stitching) → component tree (BSP CSG)
//!          → weld → quad recovery → Object
//! ```
//!
//! ## Algorithms
//!
//! - **Sweep**: node chains become tubes of cut-face profiles
//! - **Stitching**: resampled splines joined by quad rings
//! - **Boolean Operations**: BSP trees (csg.js algorithm) with seam
//!   recombination
//! - **Caching**: per part, per component and per boolean step, invalidated
//!   by dirty markers
//!
//! ## Usage
//!
//! ```rust
//! use skeleton_mesh::{GeneratedCacheContext, MeshGenerator, Snapshot};
//!
//! let json = r#"{
//!     "nodes": {"n1": {"id": "n1", "partId": "p1", "x": "0", "y": "0", "z": "0", "radius": "0.5"}},
//!     "parts": {"p1": {"id": "p1"}},
//!     "components": {"c1": {"id": "c1", "linkDataType": "partId", "linkData": "p1"}},
//!     "rootComponent": {"children": "c1"}
//! }"#;
//! let snapshot = Snapshot::from_json(json).unwrap();
//! let mut cache = GeneratedCacheContext::new();
//! let object = MeshGenerator::default().generate(&snapshot, &mut cache);
//! assert_eq!(object.vertices.len(), 8);
//! assert!(object.is_successful);
//! ```

pub mod box_mesh;
pub mod cache;
pub mod combiner;
pub mod cut_face;
pub mod error;
pub mod generator;
pub mod mesh;
pub mod normals;
pub mod object;
pub mod position_key;
pub mod quads;
pub mod recombiner;
pub mod snapshot;
pub mod source_node;
pub mod stitch;
pub mod stroke;
pub mod topology;
pub mod triangulate;
pub mod weld;

pub use cache::{CacheStats, GeneratedCacheContext};
pub use error::{MeshError, MeshResult};
pub use generator::{GeneratorOptions, MeshGenerator};
pub use mesh::Mesh;
pub use object::Object;
pub use position_key::PositionKey;
pub use snapshot::Snapshot;
