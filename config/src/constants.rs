//! # Configuration Constants
//!
//! Centralized constants for the skeleton mesh pipeline. Precision values,
//! stroke sweeping parameters, weld limits and postprocess defaults are
//! defined here.
//!
//! ## Categories
//!
//! - **Precision**: Position quantization and plane tolerances
//! - **Stroke**: Sweep and intermediate node parameters
//! - **Weld**: Vertex merging thresholds and limits
//! - **Topology**: Safety bounds for loop walking
//! - **Postprocess**: Normal smoothing and color defaults

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Quantization scale for position keys.
///
/// Coordinates are multiplied by this factor and rounded to integers before
/// being compared or hashed, so two positions closer than `1 / SCALE` on
/// every axis share the same identity.
///
/// # Example
///
/// ```rust
/// use config::constants::POSITION_KEY_SCALE;
///
/// let quantize = |v: f64| (v * POSITION_KEY_SCALE).round() as i64;
/// assert_eq!(quantize(1.0), quantize(1.0 + 1e-9));
/// ```
pub const POSITION_KEY_SCALE: f64 = 1e5;

/// Epsilon for classifying points against BSP splitting planes.
///
/// Points within this distance of a plane are treated as coplanar.
pub const PLANE_EPSILON: f64 = 1e-5;

/// Smallest vector length treated as non-zero.
///
/// # Example
///
/// ```rust
/// use config::constants::LENGTH_EPSILON;
///
/// let length = 1e-12_f64;
/// assert!(length < LENGTH_EPSILON);
/// ```
pub const LENGTH_EPSILON: f64 = 1e-9;

// =============================================================================
// STROKE CONSTANTS
// =============================================================================

/// Absolute dot product limit for two edge directions to be considered
/// non-parallel when estimating a base normal from their cross product.
///
/// Roughly `cos(15°)`.
pub const BASE_NORMAL_DOT_LIMIT: f64 = 0.966;

/// Ratio between the desired intermediate segment length and the average
/// cut template edge length.
///
/// # Example
///
/// ```rust
/// use config::constants::INTERMEDIATE_EDGE_RATIO;
///
/// let average_template_edge = 0.5;
/// let target = average_template_edge * INTERMEDIATE_EDGE_RATIO;
/// assert!(target > average_template_edge);
/// ```
pub const INTERMEDIATE_EDGE_RATIO: f64 = 1.2;

/// Upper bound of intermediate points inserted along one edge.
///
/// Edges asking for more are left untouched.
pub const MAX_INSERTED_POINTS: usize = 100;

/// Blend factor applied when revising traverse directions of intermediate
/// nodes toward their origin nodes.
pub const TRAVERSE_REVISE_FACTOR: f64 = 1.75;

/// Radius ratio of the synthesized node added by end rounding.
pub const END_ROUND_RADIUS_RATIO: f64 = 0.5;

/// Minimum deform scale for thickness and width.
///
/// # Example
///
/// ```rust
/// use config::constants::MIN_DEFORM_SCALE;
///
/// let thickness = 0.0_f64.max(MIN_DEFORM_SCALE);
/// assert_eq!(thickness, MIN_DEFORM_SCALE);
/// ```
pub const MIN_DEFORM_SCALE: f64 = 0.01;

/// Scale applied to the unit subdivided box when a part has a single node.
pub const SUBDIVIDED_BOX_RATIO: f64 = 24.0;

/// Segments of a stitching spline are never fewer than this.
pub const MIN_STITCH_SEGMENTS: usize = 2;

// =============================================================================
// WELD CONSTANTS
// =============================================================================

/// Distance below which two vertices sharing an edge are welded.
///
/// # Example
///
/// ```rust
/// use config::constants::WELD_DISTANCE;
///
/// let edge_length = 0.0004;
/// assert!(edge_length < WELD_DISTANCE);
/// ```
pub const WELD_DISTANCE: f64 = 0.001;

/// Maximum number of incident faces a vertex may have to be welded away.
pub const WELD_MAX_ADJACENT_FACES: usize = 4;

/// Maximum chain length followed when resolving welded vertex mappings.
pub const WELD_MAX_FOLLOW: usize = 500;

/// Safety bound on weld passes in one generation.
pub const WELD_MAX_PASSES: usize = 100;

// =============================================================================
// TOPOLOGY CONSTANTS
// =============================================================================

/// Maximum number of half edges walked when assembling one edge loop.
pub const MAX_EDGE_LOOP_LENGTH: usize = 1000;

// =============================================================================
// POSTPROCESS CONSTANTS
// =============================================================================

/// Default dihedral threshold for smoothed vertex normals, in degrees.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_SMOOTH_THRESHOLD_DEGREES;
///
/// let cos_limit = DEFAULT_SMOOTH_THRESHOLD_DEGREES.to_radians().cos();
/// assert!((cos_limit - 0.5).abs() < 1e-9);
/// ```
pub const DEFAULT_SMOOTH_THRESHOLD_DEGREES: f64 = 60.0;

/// Default part color (white), RGBA in range [0.0, 1.0].
pub const DEFAULT_PART_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
