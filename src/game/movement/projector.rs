// Slope-relative velocity control
//
// Movement intent is read relative to the camera, flattened against the
// gravity plane, and then applied along axes that follow the slope the
// character stands on. Each axis approaches its target at a bounded rate.

use glam::{Mat3, Quat, Vec2, Vec3};

use crate::core::math::{flatten_direction, move_towards, project_on_plane};

/// Below this squared magnitude, input and horizontal speed count as idle
pub const FACING_THRESHOLD: f32 = 0.1;

/// Camera orientation used to interpret movement input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub right: Vec3,
    pub forward: Vec3,
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self {
            right: Vec3::X,
            forward: Vec3::Z,
        }
    }
}

impl CameraBasis {
    /// Basis of a camera rotated by `rotation` (local +X right, +Z forward)
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            right: rotation * Vec3::X,
            forward: rotation * Vec3::Z,
        }
    }
}

/// Per-tick movement input
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveInput {
    /// x = strafe right, y = forward
    pub intent: Vec2,
    pub camera: CameraBasis,
}

impl MoveInput {
    pub fn new(intent: Vec2, camera: CameraBasis) -> Self {
        Self { intent, camera }
    }
}

/// Character heading flattened onto the gravity plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heading {
    pub right: Vec3,
    pub forward: Vec3,
}

impl Heading {
    /// Heading of a body with the given rotation under the given up axis
    pub fn from_rotation(rotation: Quat, up: Vec3) -> Self {
        // A body pitched onto its back still has a usable belly direction
        let forward = flatten_direction(rotation * Vec3::Z, up)
            .or_else(|| flatten_direction(rotation * Vec3::NEG_Y, up))
            .unwrap_or_else(|| up.any_orthonormal_vector());
        Self {
            right: up.cross(forward),
            forward,
        }
    }
}

/// Velocity the input asks for, on the gravity plane
///
/// Camera axes that are parallel to up (camera looking straight down)
/// contribute nothing.
pub fn desired_velocity(intent: Vec2, camera: &CameraBasis, up: Vec3, speed: f32) -> Vec3 {
    let right = flatten_direction(camera.right, up).unwrap_or(Vec3::ZERO);
    let forward = flatten_direction(camera.forward, up).unwrap_or(Vec3::ZERO);
    (right * intent.x + forward * intent.y) * speed
}

/// Move the slope-relative components of `velocity` toward `desired`
///
/// The heading axes are projected onto the contact plane; along each, the
/// velocity component changes by at most `max_change`. Anything along the
/// contact normal is left untouched.
pub fn adjust_velocity(
    velocity: Vec3,
    desired: Vec3,
    contact_normal: Vec3,
    heading: &Heading,
    max_change: f32,
) -> Vec3 {
    let mut adjusted = velocity;
    for flat_axis in [heading.right, heading.forward] {
        let Some(slope_axis) = flatten_direction(flat_axis, contact_normal) else {
            continue;
        };
        let current = velocity.dot(slope_axis);
        let target = desired.dot(flat_axis);
        let next = move_towards(current, target, max_change);
        adjusted += slope_axis * (next - current);
    }
    adjusted
}

/// Rotation facing the horizontal velocity, if the character is actively moving
///
/// `None` means the body should stop spinning instead.
pub fn facing_rotation(velocity: Vec3, intent: Vec2, up: Vec3) -> Option<Quat> {
    if intent.length_squared() <= FACING_THRESHOLD {
        return None;
    }
    let horizontal = project_on_plane(velocity, up);
    if horizontal.length_squared() <= FACING_THRESHOLD {
        return None;
    }
    let forward = horizontal.normalize();
    let right = up.cross(forward);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, forward)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_heading() -> Heading {
        Heading::from_rotation(Quat::IDENTITY, Vec3::Y)
    }

    #[test]
    fn test_identity_heading() {
        let heading = flat_heading();
        assert!(heading.right.abs_diff_eq(Vec3::X, 1e-6));
        assert!(heading.forward.abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn test_heading_under_sideways_gravity() {
        let heading = Heading::from_rotation(Quat::IDENTITY, Vec3::Z);
        assert_relative_eq!(heading.forward.dot(Vec3::Z), 0.0, epsilon = 1e-6);
        assert_relative_eq!(heading.right.dot(Vec3::Z), 0.0, epsilon = 1e-6);
        assert_relative_eq!(heading.forward.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_desired_velocity_flattens_pitched_camera() {
        let pitched = Quat::from_rotation_x(0.6);
        let camera = CameraBasis::from_rotation(pitched);
        let desired = desired_velocity(Vec2::new(0.0, 1.0), &camera, Vec3::Y, 5.0);

        assert_relative_eq!(desired.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(desired.length(), 5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_desired_velocity_follows_gravity_plane() {
        let desired = desired_velocity(Vec2::new(1.0, 0.0), &CameraBasis::default(), Vec3::Z, 2.0);
        assert!(desired.abs_diff_eq(Vec3::X * 2.0, 1e-6));

        // Camera forward is parallel to up here and drops out
        let forward_only =
            desired_velocity(Vec2::new(0.0, 1.0), &CameraBasis::default(), Vec3::Z, 2.0);
        assert_eq!(forward_only, Vec3::ZERO);
    }

    #[test]
    fn test_adjust_velocity_bounded_per_axis() {
        let max_change = 9.0 / 60.0;
        let desired = Vec3::new(4.0, 0.0, -3.0);
        let next = adjust_velocity(Vec3::ZERO, desired, Vec3::Y, &flat_heading(), max_change);

        assert_relative_eq!(next.x, max_change, epsilon = 1e-6);
        assert_relative_eq!(next.z, -max_change, epsilon = 1e-6);
    }

    #[test]
    fn test_adjust_velocity_converges_without_overshoot() {
        let desired = Vec3::new(1.0, 0.0, 0.0);
        let mut velocity = Vec3::ZERO;
        for _ in 0..100 {
            let next = adjust_velocity(velocity, desired, Vec3::Y, &flat_heading(), 0.15);
            assert!((next.x - velocity.x).abs() <= 0.15 + 1e-6);
            assert!((next.z - velocity.z).abs() <= 0.15 + 1e-6);
            velocity = next;
        }
        assert!(velocity.abs_diff_eq(desired, 1e-6));
    }

    #[test]
    fn test_adjust_velocity_leaves_vertical_alone() {
        let velocity = Vec3::new(0.0, -4.0, 0.0);
        let next = adjust_velocity(velocity, Vec3::X, Vec3::Y, &flat_heading(), 10.0);
        assert_relative_eq!(next.y, -4.0, epsilon = 1e-6);
        assert_relative_eq!(next.x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_adjust_velocity_follows_slope() {
        // Ramp rising toward +Z
        let normal = Vec3::new(0.0, 0.8, -0.6);
        let next = adjust_velocity(
            Vec3::ZERO,
            Vec3::Z * 2.0,
            normal,
            &flat_heading(),
            100.0,
        );

        assert_relative_eq!(next.dot(normal), 0.0, epsilon = 1e-5);
        assert!(next.y > 0.0, "walking up the ramp should climb, got {next:?}");
        assert_relative_eq!(next.length(), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_facing_requires_input_and_motion() {
        let velocity = Vec3::new(3.0, 0.0, 0.0);
        assert!(facing_rotation(velocity, Vec2::ZERO, Vec3::Y).is_none());
        assert!(facing_rotation(Vec3::new(0.0, -5.0, 0.0), Vec2::Y, Vec3::Y).is_none());

        let rotation = facing_rotation(velocity, Vec2::X, Vec3::Y).unwrap();
        assert!((rotation * Vec3::Z).abs_diff_eq(Vec3::X, 1e-5));
        assert!((rotation * Vec3::Y).abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn test_facing_threshold_is_strict() {
        let barely = Vec2::new(FACING_THRESHOLD.sqrt(), 0.0);
        assert!(facing_rotation(Vec3::X * 5.0, barely * 0.999, Vec3::Y).is_none());
        assert!(facing_rotation(Vec3::X * 5.0, Vec2::X, Vec3::Y).is_some());
    }
}
