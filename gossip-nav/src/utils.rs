//! Shared utility functions

use std::f32::consts::{PI, TAU};

/// Normalize angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a >= PI {
        a -= TAU;
    } else if a < -PI {
        a += TAU;
    }
    a
}

/// Smallest absolute difference between two angles, in [0, π]
#[inline]
pub fn angle_distance(a: f32, b: f32) -> f32 {
    normalize_angle(a - b).abs()
}
