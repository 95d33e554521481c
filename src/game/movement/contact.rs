// Contact classification and steep-contact promotion

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::config::SlopeThresholds;
use super::state::MovementState;
use crate::core::math::try_normalize;

/// Alignment with up at or below which a contact is an overhang or ceiling
pub const OVERHANG_DOT: f32 = -0.01;

/// Surface tag carried by whatever the character touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SurfaceTag {
    /// Ordinary walkable terrain
    #[default]
    Walkable,
    /// Stairs or stair ramps, judged against the stairs angle
    Stairs,
    /// Anything else (props, walls)
    Other,
}

/// A single contact point as delivered by the collision system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSample {
    /// Surface normal pointing away from the surface, toward the character
    pub normal: Vec3,
    pub surface: SurfaceTag,
}

impl ContactSample {
    pub fn new(normal: Vec3, surface: SurfaceTag) -> Self {
        Self { normal, surface }
    }
}

/// How a contact was bucketed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Ground,
    Steep,
    Ignored,
}

/// Classify a contact normal against the up axis
///
/// Pure: the same normal, up axis, tag and thresholds always give the same
/// answer. Zero-length or non-finite normals are ignored.
pub fn classify(
    normal: Vec3,
    up: Vec3,
    surface: SurfaceTag,
    thresholds: &SlopeThresholds,
) -> ContactKind {
    let Some(normal) = try_normalize(normal) else {
        return ContactKind::Ignored;
    };

    let alignment = up.dot(normal);
    if alignment >= thresholds.for_surface(surface) {
        ContactKind::Ground
    } else if alignment > OVERHANG_DOT {
        ContactKind::Steep
    } else {
        ContactKind::Ignored
    }
}

/// Classify a sample and fold it into the tick accumulators
pub fn record_contact(
    state: &mut MovementState,
    sample: ContactSample,
    up: Vec3,
    thresholds: &SlopeThresholds,
) -> ContactKind {
    let kind = classify(sample.normal, up, sample.surface, thresholds);
    // classify() already rejected degenerate normals
    let normal = sample.normal.normalize();
    match kind {
        ContactKind::Ground => {
            state.ground_contact_count += 1;
            state.contact_normal += normal;
        }
        ContactKind::Steep => {
            // Last write wins: steep normals are not averaged
            state.steep_contact_count += 1;
            state.steep_normal = normal;
        }
        ContactKind::Ignored => {}
    }
    kind
}

/// Treat several steep contacts as ground when their normal is walkable
///
/// Covers a character wedged in a narrow crevice. A single steep contact
/// never promotes.
pub fn promote_steep_contacts(state: &mut MovementState, up: Vec3, min_ground_dot: f32) -> bool {
    if state.steep_contact_count <= 1 {
        return false;
    }
    let Some(steep_normal) = try_normalize(state.steep_normal) else {
        return false;
    };
    state.steep_normal = steep_normal;

    if up.dot(steep_normal) >= min_ground_dot {
        state.ground_contact_count = 1;
        state.contact_normal = steep_normal;
        true
    } else {
        false
    }
}
