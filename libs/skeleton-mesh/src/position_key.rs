//! # Position Key
//!
//! Quantized coordinate identity. Vertices produced by different builders
//! or by boolean splitting are matched through their position key rather
//! than through floating point equality.

use config::constants::POSITION_KEY_SCALE;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Hashable, totally ordered identity of a 3D position.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use skeleton_mesh::PositionKey;
///
/// let a = PositionKey::new(DVec3::new(1.0, 2.0, 3.0));
/// let b = PositionKey::new(DVec3::new(1.0 + 1e-9, 2.0, 3.0));
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionKey {
    x: i64,
    y: i64,
    z: i64,
}

impl PositionKey {
    /// Quantizes a position.
    pub fn new(position: DVec3) -> Self {
        Self {
            x: quantize(position.x),
            y: quantize(position.y),
            z: quantize(position.z),
        }
    }

    /// Position at the center of this key's cell.
    pub fn position(&self) -> DVec3 {
        DVec3::new(
            self.x as f64 / POSITION_KEY_SCALE,
            self.y as f64 / POSITION_KEY_SCALE,
            self.z as f64 / POSITION_KEY_SCALE,
        )
    }
}

impl From<DVec3> for PositionKey {
    fn from(position: DVec3) -> Self {
        Self::new(position)
    }
}

fn quantize(value: f64) -> i64 {
    (value * POSITION_KEY_SCALE).round() as i64
}

/// Unordered pair of position keys, used for shared quad diagonals.
pub type PositionKeyPair = (PositionKey, PositionKey);
