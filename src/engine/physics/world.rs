use log::debug;
use rapier3d::prelude::*;
use std::collections::HashMap;

use super::{to_vec3, to_vector};
use crate::core::math::approx_equal;
use crate::game::movement::{ContactSample, SurfaceTag};

/// Physics world that manages all physics simulation
pub struct PhysicsWorld {
    /// Gravity vector (default: -9.81 m/s² in y-axis)
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection, also the source of character contacts
    narrow_phase: NarrowPhase,

    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Query pipeline for raycasts
    query_pipeline: QueryPipeline,

    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,

    /// Surface tags of level geometry; untagged colliders count as walkable
    surface_tags: HashMap<ColliderHandle, SurfaceTag>,
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        Self::with_gravity(vector![0.0, -9.81, 0.0])
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vector<Real>) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Fixed timestep of 1/60 seconds (60 FPS)
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity,
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            surface_tags: HashMap::new(),
        }
    }

    /// Step the physics simulation forward by one timestep
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Add a rigid body to the physics world
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Add a collider attached to a rigid body
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
    ) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent_handle, &mut self.rigid_body_set)
    }

    /// Add a collider and tag the surface it represents
    pub fn add_tagged_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
        surface: SurfaceTag,
    ) -> ColliderHandle {
        let handle = self.add_collider(collider, parent_handle);
        self.set_surface_tag(handle, surface);
        handle
    }

    /// Remove a rigid body and all its attached colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        if let Some(body) = self.rigid_body_set.get(handle) {
            for collider in body.colliders() {
                self.surface_tags.remove(collider);
            }
        }
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a mutable reference to a rigid body
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    pub fn set_surface_tag(&mut self, collider: ColliderHandle, surface: SurfaceTag) {
        self.surface_tags.insert(collider, surface);
    }

    /// Surface tag of a collider
    pub fn surface_tag(&self, collider: ColliderHandle) -> SurfaceTag {
        self.surface_tags.get(&collider).copied().unwrap_or_default()
    }

    /// Cast a ray and return the first hit with its surface normal
    pub fn raycast(
        &self,
        ray_origin: Point<Real>,
        ray_dir: Vector<Real>,
        max_toi: Real,
        solid: bool,
        filter: QueryFilter,
    ) -> Option<(ColliderHandle, RayIntersection)> {
        let ray = Ray::new(ray_origin, ray_dir);
        self.query_pipeline.cast_ray_and_get_normal(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_toi,
            solid,
            filter,
        )
    }

    /// Contact points currently touching a body, one sample per point
    ///
    /// Normals point away from the touched surface, toward the body. Only
    /// pairs the solver is actively resolving are reported.
    pub fn character_contacts(&self, body_handle: RigidBodyHandle) -> Vec<ContactSample> {
        let Some(body) = self.rigid_body_set.get(body_handle) else {
            return Vec::new();
        };

        let mut samples = Vec::new();
        for &own in body.colliders() {
            for pair in self.narrow_phase.contact_pairs_with(own) {
                if !pair.has_any_active_contact {
                    continue;
                }
                // Manifold normals point from collider1 toward collider2
                let (other, sign): (ColliderHandle, Real) = if pair.collider1 == own {
                    (pair.collider2, -1.0)
                } else {
                    (pair.collider1, 1.0)
                };
                let surface = self.surface_tag(other);

                for manifold in &pair.manifolds {
                    let normal = to_vec3(&(manifold.data.normal * sign));
                    samples.extend(
                        manifold
                            .data
                            .solver_contacts
                            .iter()
                            .map(|_| ContactSample::new(normal, surface)),
                    );
                }
            }
        }
        samples
    }

    /// Set gravity for the physics world
    pub fn set_gravity(&mut self, gravity: Vector<Real>) {
        if !approx_equal(gravity.norm(), self.gravity.norm(), 1e-4) {
            debug!(
                "gravity strength changed: {:.2} -> {:.2}",
                self.gravity.norm(),
                gravity.norm()
            );
        }
        self.gravity = gravity;
    }

    /// Get current gravity
    pub fn gravity(&self) -> Vector<Real> {
        self.gravity
    }

    /// Current gravity as a glam vector, for the movement controller
    pub fn gravity_vec3(&self) -> glam::Vec3 {
        to_vec3(&self.gravity)
    }

    /// Set gravity from a glam vector
    pub fn set_gravity_vec3(&mut self, gravity: glam::Vec3) {
        self.set_gravity(to_vector(gravity));
    }

    /// Set the timestep for physics simulation
    pub fn set_timestep(&mut self, dt: Real) {
        self.integration_parameters.dt = dt;
    }

    /// Get the current timestep
    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
