//! # Mesh Errors
//!
//! Error types for skeleton mesh generation.

use thiserror::Error;

/// Errors that can occur while building or combining meshes.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Snapshot could not be parsed
    #[error("Invalid snapshot: {message}")]
    InvalidSnapshot { message: String },

    /// A part's sweep could not be built
    #[error("Build failed for part {part_id}: {message}")]
    BuildFailed { part_id: String, message: String },

    /// Degenerate geometry
    #[error("Degenerate geometry: {message}")]
    Degenerate { message: String },

    /// Boolean combination failed
    #[error("Combine failed: {message}")]
    CombineFailed { message: String },

    /// Invalid mesh topology
    #[error("Invalid topology: {message}")]
    Topology { message: String },
}

impl MeshError {
    /// Creates an invalid snapshot error.
    pub fn invalid_snapshot(message: impl Into<String>) -> Self {
        Self::InvalidSnapshot {
            message: message.into(),
        }
    }

    /// Creates a build failure for the given part.
    pub fn build_failed(part_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BuildFailed {
            part_id: part_id.into(),
            message: message.into(),
        }
    }

    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::Degenerate {
            message: message.into(),
        }
    }

    /// Creates a combine failure error.
    pub fn combine_failed(message: impl Into<String>) -> Self {
        Self::CombineFailed {
            message: message.into(),
        }
    }

    /// Creates an invalid topology error.
    pub fn topology(message: impl Into<String>) -> Self {
        Self::Topology {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for MeshError {
    fn from(error: serde_json::Error) -> Self {
        Self::invalid_snapshot(error.to_string())
    }
}

/// Result alias used across the crate.
pub type MeshResult<T> = Result<T, MeshError>;
