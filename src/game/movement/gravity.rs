// Up axis derived from the current gravity vector

use glam::Vec3;

use crate::core::math::try_normalize;

/// Earth gravity, used until the first tick supplies the real vector
pub const STANDARD_GRAVITY: f32 = 9.81;

/// The controller's notion of "up" for one tick
///
/// Always derived from gravity, never assumed to be world +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityAxis {
    up: Vec3,
    magnitude: f32,
}

impl Default for GravityAxis {
    fn default() -> Self {
        Self {
            up: Vec3::Y,
            magnitude: STANDARD_GRAVITY,
        }
    }
}

impl GravityAxis {
    /// Derive the axis from a gravity vector
    ///
    /// Returns `None` for a zero-length or non-finite vector, which has no
    /// direction to stand against.
    pub fn from_gravity(gravity: Vec3) -> Option<Self> {
        let down = try_normalize(gravity)?;
        Some(Self {
            up: -down,
            magnitude: gravity.length(),
        })
    }

    /// Unit vector opposite to gravity
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Gravity strength |g|
    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    /// Gravity vector this axis was derived from
    pub fn gravity(&self) -> Vec3 {
        -self.up * self.magnitude
    }
}
