use super::collision::CollisionGroups;
use rapier3d::prelude::*;

pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    linvel: Vector<Real>,
    gravity_scale: Real,
    can_sleep: bool,
    locked_axes: LockedAxes,
}

impl BodyBuilder {
    fn new(body_type: RigidBodyType) -> Self {
        Self {
            body_type,
            position: Isometry::identity(),
            linvel: Vector::zeros(),
            gravity_scale: 1.0,
            can_sleep: true,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Create a new dynamic body (affected by forces and collisions)
    pub fn new_dynamic() -> Self {
        Self::new(RigidBodyType::Dynamic)
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn new_fixed() -> Self {
        Self {
            gravity_scale: 0.0,
            can_sleep: false,
            ..Self::new(RigidBodyType::Fixed)
        }
    }

    /// Set the initial position of the body
    pub fn position(mut self, x: Real, y: Real, z: Real) -> Self {
        self.position = Isometry::translation(x, y, z);
        self
    }

    /// Set the initial position and rotation (axis-angle, radians)
    pub fn position_rotation(mut self, translation: Vector<Real>, axis_angle: Vector<Real>) -> Self {
        self.position = Isometry::new(translation, axis_angle);
        self
    }

    /// Set the initial linear velocity
    pub fn linvel(mut self, x: Real, y: Real, z: Real) -> Self {
        self.linvel = vector![x, y, z];
        self
    }

    /// Set whether the body can sleep when inactive
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Lock rotation so contacts cannot tip the body over
    pub fn lock_rotation(mut self) -> Self {
        self.locked_axes = LockedAxes::ROTATION_LOCKED;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .linvel(self.linvel)
            .gravity_scale(self.gravity_scale)
            .can_sleep(self.can_sleep)
            .locked_axes(self.locked_axes)
            .build()
    }
}

/// Builder for creating colliders with common configurations
pub struct ColliderBuilder3D {
    shape: SharedShape,
    collision_groups: CollisionGroups,
    is_sensor: bool,
    friction: Real,
    friction_combine: CoefficientCombineRule,
    /// Overrides the shape's unit density when set
    mass: Option<Real>,
}

impl ColliderBuilder3D {
    fn new(shape: SharedShape) -> Self {
        Self {
            shape,
            collision_groups: CollisionGroups::Default,
            is_sensor: false,
            friction: 0.5,
            friction_combine: CoefficientCombineRule::Average,
            mass: None,
        }
    }

    /// Create a box-shaped collider from half extents
    pub fn cuboid(hx: Real, hy: Real, hz: Real) -> Self {
        Self::new(SharedShape::cuboid(hx, hy, hz))
    }

    /// Create an upright capsule-shaped collider (good for characters)
    pub fn capsule(half_height: Real, radius: Real) -> Self {
        Self::new(SharedShape::capsule_y(half_height, radius))
    }

    /// Set the collision groups for filtering
    pub fn collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Make this a sensor (detects collisions but doesn't cause physical response)
    pub fn sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    /// Set friction coefficient (0.0 = no friction, 1.0 = high friction)
    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    /// Use the smaller friction of a contact pair instead of the average
    pub fn min_friction_combine(mut self) -> Self {
        self.friction_combine = CoefficientCombineRule::Min;
        self
    }

    /// Set mass directly instead of deriving it from the shape volume
    pub fn mass(mut self, mass: Real) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        let mut builder = ColliderBuilder::new(self.shape)
            .collision_groups(self.collision_groups.to_interaction_groups())
            .sensor(self.is_sensor)
            .friction(self.friction)
            .friction_combine_rule(self.friction_combine);

        if let Some(mass) = self.mass {
            builder = builder.mass(mass);
        }

        builder.build()
    }
}

/// Common body and collider configurations for a movement test level
pub mod presets {
    use super::*;

    /// Create a character body (dynamic, rotation locked, never sleeps)
    pub fn character_body(x: Real, y: Real, z: Real) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(x, y, z)
            .lock_rotation()
            .can_sleep(false) // Controllers write velocity every tick
            .build()
    }

    /// Create a character collider (capsule of total `height`)
    pub fn character_collider(radius: Real, height: Real, mass: Real) -> Collider {
        let half_height = (height / 2.0 - radius).max(0.0);

        ColliderBuilder3D::capsule(half_height, radius)
            .collision_groups(CollisionGroups::Character)
            .friction(0.0) // No friction for smooth movement
            .min_friction_combine()
            .mass(mass)
            .build()
    }

    /// Create a fixed body for level geometry
    pub fn terrain_body(x: Real, y: Real, z: Real) -> RigidBody {
        BodyBuilder::new_fixed().position(x, y, z).build()
    }

    /// Create a fixed body tilted around the X axis by `angle` radians
    pub fn tilted_terrain_body(x: Real, y: Real, z: Real, angle: Real) -> RigidBody {
        BodyBuilder::new_fixed()
            .position_rotation(vector![x, y, z], vector![angle, 0.0, 0.0])
            .build()
    }

    /// Create a box collider for level geometry from full extents
    pub fn terrain_collider(width: Real, height: Real, depth: Real) -> Collider {
        ColliderBuilder3D::cuboid(width / 2.0, height / 2.0, depth / 2.0)
            .collision_groups(CollisionGroups::Terrain)
            .friction(0.5)
            .build()
    }

    /// Create a sensor collider (detects but doesn't block)
    pub fn sensor_collider(width: Real, height: Real, depth: Real) -> Collider {
        ColliderBuilder3D::cuboid(width / 2.0, height / 2.0, depth / 2.0)
            .collision_groups(CollisionGroups::Sensor)
            .sensor(true)
            .build()
    }
}
