//! # Tests for Config Constants
//!
//! Sanity checks on the relationships between tuning constants.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_position_key_scale_resolves_below_weld_distance() {
    assert!(
        1.0 / POSITION_KEY_SCALE < WELD_DISTANCE,
        "key quantization must be finer than the weld distance"
    );
}

#[test]
fn test_length_epsilon_smaller_than_plane_epsilon() {
    assert!(LENGTH_EPSILON < PLANE_EPSILON);
}

// =============================================================================
// STROKE TESTS
// =============================================================================

#[test]
fn test_base_normal_dot_limit_is_cos_fifteen_degrees() {
    let expected = 15.0_f64.to_radians().cos();
    assert!((BASE_NORMAL_DOT_LIMIT - expected).abs() < 1e-3);
}

#[test]
fn test_intermediate_ratio_above_one() {
    assert!(INTERMEDIATE_EDGE_RATIO > 1.0);
}

#[test]
fn test_end_round_ratio_shrinks() {
    assert!(END_ROUND_RADIUS_RATIO > 0.0 && END_ROUND_RADIUS_RATIO < 1.0);
}

#[test]
fn test_min_stitch_segments_is_even() {
    assert_eq!(MIN_STITCH_SEGMENTS % 2, 0);
}

// =============================================================================
// WELD TESTS
// =============================================================================

#[test]
fn test_weld_limits_are_positive() {
    assert!(WELD_MAX_ADJACENT_FACES > 0);
    assert!(WELD_MAX_FOLLOW > 0);
    assert!(WELD_MAX_PASSES > 0);
}

// =============================================================================
// POSTPROCESS TESTS
// =============================================================================

#[test]
fn test_smooth_threshold_in_range() {
    assert!(DEFAULT_SMOOTH_THRESHOLD_DEGREES > 0.0);
    assert!(DEFAULT_SMOOTH_THRESHOLD_DEGREES < 180.0);
}

#[test]
fn test_default_color_is_opaque() {
    assert_eq!(DEFAULT_PART_COLOR[3], 1.0);
}
