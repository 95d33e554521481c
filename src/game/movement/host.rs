// Capabilities the controller needs from the physics host
//
// The controller never owns a physics engine. It reads and corrects a rigid
// body and casts rays through these traits; `engine::physics` implements them
// for rapier3d and the tests implement them with a scripted mock.

use glam::{Quat, Vec3};

use super::contact::SurfaceTag;

/// Rigid body driven by the controller
pub trait CharacterBody {
    /// World position of the body's center
    fn position(&self) -> Vec3;

    fn velocity(&self) -> Vec3;

    fn rotation(&self) -> Quat;

    fn angular_velocity(&self) -> Vec3;

    /// Body mass, used to turn velocity changes into impulses
    fn mass(&self) -> f32;

    fn set_velocity(&mut self, velocity: Vec3);

    fn set_rotation(&mut self, rotation: Quat);

    fn set_angular_velocity(&mut self, angular_velocity: Vec3);

    /// Apply an instantaneous change in momentum
    fn apply_impulse(&mut self, impulse: Vec3);
}

/// Result of a successful ray cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    pub normal: Vec3,
    pub surface: SurfaceTag,
    pub distance: f32,
}

/// Ray queries against the static world
pub trait GroundProbe {
    /// Cast a ray and return the closest hit within `max_distance`
    ///
    /// `layer_mask` holds the collision group bits the ray may hit. The
    /// character's own body is never reported.
    fn cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layer_mask: u32,
    ) -> Option<ProbeHit>;
}
