// Ground snapping
//
// When a character crests a bump or crosses a ramp seam, the physics engine
// can report zero contacts for a single tick even though the ground is right
// there. The ray looks straight down along gravity and, if walkable ground
// is close, keeps the character grounded and bends its velocity back along
// the surface.

use glam::Vec3;
use log::trace;

use super::config::{ControllerConfig, SlopeThresholds};
use super::host::GroundProbe;
use super::state::MovementState;
use crate::core::math::try_normalize;

/// Try to keep the character glued to the ground below
///
/// Only runs when the character was grounded on the previous tick, did not
/// jump in the last two ticks and is not moving faster than `max_snap_speed`
/// (inclusive). Failure is normal control flow.
pub fn snap_to_ground<P: GroundProbe + ?Sized>(
    state: &mut MovementState,
    probe: &P,
    origin: Vec3,
    up: Vec3,
    config: &ControllerConfig,
    thresholds: &SlopeThresholds,
) -> bool {
    if state.steps_since_last_grounded > 1 || state.steps_since_last_jump <= 2 {
        return false;
    }

    let speed = state.velocity.length();
    if speed > config.max_snap_speed {
        return false;
    }

    let Some(hit) = probe.cast(origin, -up, config.probe_distance, config.probe_mask) else {
        return false;
    };
    let Some(normal) = try_normalize(hit.normal) else {
        return false;
    };
    if up.dot(normal) < thresholds.for_surface(hit.surface) {
        return false;
    }

    state.ground_contact_count = 1;
    state.contact_normal = normal;

    let away = state.velocity.dot(normal);
    if away > 0.0 {
        let tangent = state.velocity - normal * away;
        state.velocity = try_normalize(tangent).map_or(tangent, |direction| direction * speed);
    }

    trace!(
        "snapped to ground {:.2} below, normal {:?}",
        hit.distance,
        normal
    );
    true
}
