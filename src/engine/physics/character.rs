// rapier3d host for the movement controller

use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;

use super::collision::query_groups;
use super::world::PhysicsWorld;
use super::{to_vec3, to_vector};
use crate::core::math::try_normalize;
use crate::game::movement::{CharacterBody, GroundProbe, ProbeHit};

/// A character's rigid body, borrowed from the world for one tick
pub struct RapierCharacter<'w> {
    world: &'w mut PhysicsWorld,
    handle: RigidBodyHandle,
}

impl<'w> RapierCharacter<'w> {
    /// Borrow the body behind `handle`, or `None` if it no longer exists
    pub fn new(world: &'w mut PhysicsWorld, handle: RigidBodyHandle) -> Option<Self> {
        world.get_rigid_body(handle)?;
        Some(Self { world, handle })
    }

    fn read<T: Default>(&self, f: impl FnOnce(&RigidBody) -> T) -> T {
        self.world.get_rigid_body(self.handle).map(f).unwrap_or_default()
    }

    fn write(&mut self, f: impl FnOnce(&mut RigidBody)) {
        if let Some(body) = self.world.get_rigid_body_mut(self.handle) {
            f(body);
        }
    }
}

impl CharacterBody for RapierCharacter<'_> {
    fn position(&self) -> Vec3 {
        self.read(|body| to_vec3(body.translation()))
    }

    fn velocity(&self) -> Vec3 {
        self.read(|body| to_vec3(body.linvel()))
    }

    fn rotation(&self) -> Quat {
        self.read(|body| {
            let q = body.rotation().coords;
            Quat::from_xyzw(q.x, q.y, q.z, q.w)
        })
    }

    fn angular_velocity(&self) -> Vec3 {
        self.read(|body| to_vec3(body.angvel()))
    }

    fn mass(&self) -> f32 {
        self.read(|body| body.mass())
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.write(|body| body.set_linvel(to_vector(velocity), true));
    }

    fn set_rotation(&mut self, rotation: Quat) {
        let rotation =
            UnitQuaternion::from_quaternion(Quaternion::new(rotation.w, rotation.x, rotation.y, rotation.z));
        self.write(|body| body.set_rotation(rotation, true));
    }

    fn set_angular_velocity(&mut self, angular_velocity: Vec3) {
        self.write(|body| body.set_angvel(to_vector(angular_velocity), true));
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        self.write(|body| body.apply_impulse(to_vector(impulse), true));
    }
}

impl GroundProbe for RapierCharacter<'_> {
    fn cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layer_mask: u32,
    ) -> Option<ProbeHit> {
        let direction = try_normalize(direction)?;
        let filter = QueryFilter::default()
            .exclude_rigid_body(self.handle)
            .exclude_sensors()
            .groups(query_groups(layer_mask));

        let (collider, hit) = self.world.raycast(
            point![origin.x, origin.y, origin.z],
            to_vector(direction),
            max_distance,
            true,
            filter,
        )?;

        Some(ProbeHit {
            normal: to_vec3(&hit.normal),
            surface: self.world.surface_tag(collider),
            distance: hit.time_of_impact,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::body::presets;
    use crate::engine::physics::CollisionGroups;
    use crate::game::movement::{
        ContactSample, Controller, ControllerConfig, Grounding, MoveInput, SurfaceTag,
    };
    use approx::assert_relative_eq;
    use glam::Vec2;

    struct Scene {
        world: PhysicsWorld,
        character: RigidBodyHandle,
    }

    fn scene(floor_tag: SurfaceTag) -> Scene {
        let mut world = PhysicsWorld::new();
        let floor = world.add_rigid_body(presets::terrain_body(0.0, 0.0, 0.0));
        world.add_tagged_collider(presets::terrain_collider(40.0, 1.0, 40.0), floor, floor_tag);
        let character = world.add_rigid_body(presets::character_body(0.0, 3.0, 0.0));
        world.add_collider(presets::character_collider(0.5, 2.0, 80.0), character);
        world.step();
        Scene { world, character }
    }

    #[test]
    fn test_missing_body_is_rejected() {
        let mut s = scene(SurfaceTag::Walkable);
        let character = s.character;
        s.world.remove_rigid_body(character);
        assert!(RapierCharacter::new(&mut s.world, character).is_none());
    }

    #[test]
    fn test_ray_skips_own_body() {
        let mut s = scene(SurfaceTag::Stairs);
        let host = RapierCharacter::new(&mut s.world, s.character).unwrap();
        let origin = host.position();

        let hit = host
            .cast(origin, Vec3::NEG_Y, 10.0, CollisionGroups::Terrain as u32)
            .unwrap();
        assert_relative_eq!(hit.distance, origin.y - 0.5, epsilon = 1e-3);
        assert!(hit.normal.abs_diff_eq(Vec3::Y, 1e-5));
        assert_eq!(hit.surface, SurfaceTag::Stairs);
    }

    #[test]
    fn test_ray_honours_layer_mask() {
        let mut s = scene(SurfaceTag::Walkable);
        let host = RapierCharacter::new(&mut s.world, s.character).unwrap();
        let origin = host.position();

        assert!(host
            .cast(origin, Vec3::NEG_Y, 10.0, CollisionGroups::Prop as u32)
            .is_none());
        assert!(host.cast(origin, Vec3::ZERO, 10.0, u32::MAX).is_none());
    }

    #[test]
    fn test_impulse_changes_velocity_by_inverse_mass() {
        let mut s = scene(SurfaceTag::Walkable);
        let mut host = RapierCharacter::new(&mut s.world, s.character).unwrap();
        assert_relative_eq!(host.mass(), 80.0, epsilon = 1e-3);

        host.set_velocity(Vec3::ZERO);
        host.apply_impulse(Vec3::new(0.0, 160.0, 0.0));
        assert_relative_eq!(host.velocity().y, 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_rotation_roundtrip() {
        let mut s = scene(SurfaceTag::Walkable);
        let mut host = RapierCharacter::new(&mut s.world, s.character).unwrap();
        let rotation = Quat::from_rotation_y(0.7);

        host.set_rotation(rotation);
        assert!(host.rotation().abs_diff_eq(rotation, 1e-5));
    }

    fn run_tick(s: &mut Scene, controller: &mut Controller, input: &MoveInput) -> Grounding {
        let contacts: Vec<ContactSample> = s.world.character_contacts(s.character);
        for sample in contacts {
            controller.on_contact(sample);
        }
        let gravity = s.world.gravity_vec3();
        let dt = s.world.timestep();
        let mut host = RapierCharacter::new(&mut s.world, s.character).unwrap();
        let report = controller.tick(&mut host, input, gravity, dt).unwrap();
        s.world.step();
        report.grounding
    }

    #[test]
    fn test_controller_walks_and_jumps_on_rapier_floor() {
        let mut s = scene(SurfaceTag::Walkable);
        let mut controller = Controller::new(ControllerConfig {
            movement_speed: 4.0,
            ..Default::default()
        })
        .unwrap();

        let idle = MoveInput::default();
        let mut grounding = Grounding::Airborne;
        for _ in 0..120 {
            grounding = run_tick(&mut s, &mut controller, &idle);
        }
        assert!(grounding.is_grounded(), "should settle on the floor");

        let forward = MoveInput::new(Vec2::Y, Default::default());
        for _ in 0..60 {
            run_tick(&mut s, &mut controller, &forward);
        }
        let body = s.world.get_rigid_body(s.character).unwrap();
        assert!(body.linvel().z > 3.0, "linvel {:?}", body.linvel());
        let rest_height = body.translation().y;

        controller.jump();
        run_tick(&mut s, &mut controller, &forward);
        for _ in 0..10 {
            run_tick(&mut s, &mut controller, &forward);
        }
        let body = s.world.get_rigid_body(s.character).unwrap();
        assert!(body.translation().y > rest_height + 0.3);
    }
}
