// Jump budget and jump impulses

use glam::Vec3;

use super::state::{JumpState, MovementState};
use crate::core::math::try_normalize;

/// Launch speed that reaches `height` against gravity of strength `gravity`
pub fn jump_speed(gravity: f32, height: f32) -> f32 {
    (2.0 * gravity * height).sqrt()
}

/// An accepted jump
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jump {
    /// Rule the jump was taken under
    pub taken_from: JumpState,
    /// Unit launch direction, blended toward up
    pub direction: Vec3,
    /// Velocity added to the body
    pub delta_velocity: Vec3,
}

/// Attempt a jump from the resolved state of the current tick
///
/// On success the state's velocity already includes the jump and the returned
/// `delta_velocity` is what the body still needs as an impulse. A rejected jump
/// changes nothing.
pub fn try_jump(
    state: &mut MovementState,
    up: Vec3,
    gravity: f32,
    jump_height: f32,
    max_air_jumps: u32,
) -> Option<Jump> {
    let taken_from = state.jump_state(max_air_jumps);
    let mut advance_phase = true;
    let source = match taken_from {
        JumpState::Grounded => state.contact_normal,
        JumpState::SteepContact => {
            state.jump_phase = 0;
            try_normalize(state.steep_normal).unwrap_or(up)
        }
        JumpState::AirborneWithBudget => {
            // Walking off a ledge counts as the first jump
            if state.jump_phase == 0 {
                state.jump_phase = 1;
                advance_phase = false;
            }
            up
        }
        JumpState::AirborneExhausted => return None,
    };

    state.steps_since_last_jump = 0;
    if advance_phase {
        state.jump_phase = state.jump_phase.saturating_add(1);
    }
    state.jump_phase = state.jump_phase.min(max_air_jumps.saturating_add(1));

    let direction = try_normalize(source + up).unwrap_or(up);
    let mut speed = jump_speed(gravity, jump_height);
    let aligned = state.velocity.dot(direction);
    if aligned > 0.0 {
        speed = (speed - aligned).max(0.0);
    }

    let delta_velocity = direction * speed;
    state.velocity += delta_velocity;

    Some(Jump {
        taken_from,
        direction,
        delta_velocity,
    })
}
