// Math utilities and helper functions

use glam::Vec3;

/// Squared length below which a vector has no usable direction
pub const DEGENERATE_LENGTH_SQUARED: f32 = 1e-12;

/// Check if two f32 values are approximately equal
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

/// Normalize a vector, or `None` when it is zero-length or not finite
pub fn try_normalize(v: Vec3) -> Option<Vec3> {
    let length_squared = v.length_squared();
    if !length_squared.is_finite() || length_squared <= DEGENERATE_LENGTH_SQUARED {
        return None;
    }
    Some(v / length_squared.sqrt())
}

/// Remove the component of `v` along `normal` (normal must be unit length)
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}

/// Project `v` onto the plane of `normal` and normalize the result
///
/// Returns `None` when `v` is parallel to `normal` and nothing is left.
pub fn flatten_direction(v: Vec3, normal: Vec3) -> Option<Vec3> {
    try_normalize(project_on_plane(v, normal))
}
