//! # Config Crate
//!
//! Centralized tuning constants for the skeleton mesh pipeline.
//! Every tolerance, limit and default used while sweeping, combining and
//! welding meshes is defined here so the generator crates never carry
//! scattered literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{POSITION_KEY_SCALE, WELD_DISTANCE};
//!
//! // Two coordinates closer than one quantization step share a key.
//! let a = (0.123_451_f64 * POSITION_KEY_SCALE).round() as i64;
//! let b = (0.123_449_f64 * POSITION_KEY_SCALE).round() as i64;
//! assert_eq!(a, b);
//!
//! // Weld distance is far above key precision.
//! assert!(WELD_DISTANCE * POSITION_KEY_SCALE > 1.0);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Unit Agnostic**: Values are expressed in skeleton canvas units
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
