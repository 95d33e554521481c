// Physics system using rapier3d

pub mod body;
mod character;
mod collision;
mod world;

pub use body::{BodyBuilder, ColliderBuilder3D, ColliderHandle, RigidBodyHandle};
pub use character::RapierCharacter;
pub use collision::{query_groups, CollisionGroups};
pub use world::PhysicsWorld;

// Re-export commonly used rapier types for convenience
pub use rapier3d::prelude::{Real, Vector};

use glam::Vec3;

/// Convert a rapier vector into glam
pub fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Convert a glam vector into rapier
pub fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}
