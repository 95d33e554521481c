use rapier3d::prelude::*;

/// Collision groups for filtering what objects can collide with each other
///
/// The snap ray's layer mask is a union of these bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// Default group - interacts with everything
    Default = 0b0000_0001,

    /// Player and NPC characters driven by a movement controller
    Character = 0b0000_0010,

    /// Static level geometry: floors, ramps, stairs, walls
    Terrain = 0b0000_0100,

    /// Loose or movable objects characters can stand on
    Prop = 0b0000_1000,

    /// Sensors (trigger zones, etc.) - don't cause physical collision
    Sensor = 0b1000_0000,
}

impl CollisionGroups {
    /// Convert to rapier3d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self as u32);

        let filter = match self {
            // Characters stand on terrain and props but pass through each other
            CollisionGroups::Character => Group::from_bits_truncate(
                CollisionGroups::Terrain as u32
                    | CollisionGroups::Prop as u32
                    | CollisionGroups::Sensor as u32
                    | CollisionGroups::Default as u32,
            ),

            // Terrain never needs to collide with other terrain
            CollisionGroups::Terrain => Group::from_bits_truncate(
                CollisionGroups::Character as u32
                    | CollisionGroups::Prop as u32
                    | CollisionGroups::Default as u32,
            ),

            CollisionGroups::Prop => Group::from_bits_truncate(
                CollisionGroups::Character as u32
                    | CollisionGroups::Terrain as u32
                    | CollisionGroups::Prop as u32
                    | CollisionGroups::Default as u32,
            ),

            CollisionGroups::Sensor => Group::from_bits_truncate(CollisionGroups::Character as u32),

            CollisionGroups::Default => Group::ALL,
        };

        InteractionGroups::new(memberships, filter)
    }

    /// Union of several groups as a raw layer mask
    pub fn mask(groups: &[CollisionGroups]) -> u32 {
        groups.iter().fold(0, |mask, group| mask | *group as u32)
    }
}

/// Query groups for a ray that may hit anything in `layer_mask`
pub fn query_groups(layer_mask: u32) -> InteractionGroups {
    InteractionGroups::new(Group::ALL, Group::from_bits_truncate(layer_mask))
}
