//! Basic vector math helper functions.
//! Small helpers for normalising directions and converting between angles and
//! vectors in screen space (y grows downward).
use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;

/// Returns the unit vector in the direction of `vector`, or `fallback`.
///
/// Zero-length and non-finite inputs never propagate `NaN`; the caller picks
/// the direction that makes sense for its behaviour instead.
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use talon::vector_math::safe_normalize;
/// let unit = safe_normalize(Vec2::new(3.0, 4.0), Vec2::Y);
/// assert!((unit - Vec2::new(0.6, 0.8)).length() < 1e-6);
///
/// assert_eq!(safe_normalize(Vec2::ZERO, Vec2::Y), Vec2::Y);
/// assert_eq!(safe_normalize(Vec2::new(f32::NAN, 1.0), Vec2::ZERO), Vec2::ZERO);
/// ```
#[must_use]
pub fn safe_normalize(vector: Vec2, fallback: Vec2) -> Vec2 {
    vector.try_normalize().unwrap_or(fallback)
}

/// Angle of `vector` measured from the positive x axis, in radians.
#[must_use]
pub fn to_rotation(vector: Vec2) -> f32 {
    vector.y.atan2(vector.x)
}

/// Unit vector pointing along `angle`.
#[must_use]
pub fn rotation_vector(angle: f32) -> Vec2 {
    Vec2::from_angle(angle)
}

/// Rotates `vector` by `angle` radians.
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use talon::vector_math::rotated;
/// let turned = rotated(Vec2::X, std::f32::consts::FRAC_PI_2);
/// assert!((turned - Vec2::Y).length() < 1e-6);
/// ```
#[must_use]
pub fn rotated(vector: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(vector)
}

/// Wraps an angle into `[0, TAU)`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Rotation for a sprite drawn facing up, derived from a heading vector.
///
/// Rendering collaborators draw the actor pointing along negative y, so the
/// heading angle is offset by a quarter turn.
#[must_use]
pub fn sprite_rotation(heading: Vec2) -> f32 {
    to_rotation(heading) - FRAC_PI_2
}
