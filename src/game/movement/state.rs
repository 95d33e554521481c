// Per-character movement state carried between physics ticks

use glam::Vec3;

use crate::core::math::try_normalize;

/// How the character ended up grounded (or not) on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Grounding {
    /// At least one walkable contact was reported
    Contact,
    /// The snap ray found walkable ground just below
    Snapped,
    /// Several steep contacts combined into a walkable surface
    Promoted,
    /// Nothing to stand on
    #[default]
    Airborne,
}

impl Grounding {
    pub fn is_grounded(&self) -> bool {
        !matches!(self, Self::Airborne)
    }
}

/// Which jump rule applies right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JumpState {
    /// Standing on ground; jumps along the ground normal
    Grounded,
    /// Touching a wall; jumps off it and refreshes the air-jump budget
    SteepContact,
    /// In the air with air jumps left
    AirborneWithBudget,
    /// In the air with no jumps left
    AirborneExhausted,
}

/// Movement state owned by a single controller
///
/// The contact fields are accumulators: they fill up during a tick's collision
/// callbacks and are cleared once the tick is done. The step counters and the
/// jump phase persist across ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementState {
    /// Velocity as read from the body at the start of the tick, then corrected
    pub velocity: Vec3,
    /// Sum of ground normals while accumulating, unit normal once resolved
    pub contact_normal: Vec3,
    /// Most recent steep contact normal
    pub steep_normal: Vec3,
    pub ground_contact_count: u32,
    pub steep_contact_count: u32,
    pub steps_since_last_grounded: u32,
    pub steps_since_last_jump: u32,
    /// Jumps consumed since the last grounding
    pub jump_phase: u32,
}

impl Default for MovementState {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementState {
    pub fn new() -> Self {
        Self {
            velocity: Vec3::ZERO,
            contact_normal: Vec3::ZERO,
            steep_normal: Vec3::ZERO,
            ground_contact_count: 0,
            steep_contact_count: 0,
            steps_since_last_grounded: 0,
            steps_since_last_jump: 0,
            jump_phase: 0,
        }
    }

    /// Check if any ground contact (direct, snapped or promoted) is recorded
    pub fn is_grounded(&self) -> bool {
        self.ground_contact_count > 0
    }

    /// Check if the character touches a steep surface
    pub fn is_on_steep(&self) -> bool {
        self.steep_contact_count > 0
    }

    /// Advance the per-tick counters (called once at the start of every tick)
    pub fn advance_step(&mut self) {
        self.steps_since_last_grounded = self.steps_since_last_grounded.saturating_add(1);
        self.steps_since_last_jump = self.steps_since_last_jump.saturating_add(1);
    }

    /// Record that grounding was established this tick
    ///
    /// The jump budget only refreshes once a full tick has passed since the
    /// last jump, so the take-off tick cannot refund the jump.
    pub fn land(&mut self, up: Vec3) {
        self.steps_since_last_grounded = 0;
        if self.steps_since_last_jump > 1 {
            self.jump_phase = 0;
        }
        self.contact_normal = try_normalize(self.contact_normal).unwrap_or(up);
    }

    /// Record that the character is airborne this tick
    pub fn leave_ground(&mut self, up: Vec3) {
        self.contact_normal = up;
    }

    /// Current jump rule given the air-jump budget
    pub fn jump_state(&self, max_air_jumps: u32) -> JumpState {
        if self.is_grounded() {
            JumpState::Grounded
        } else if self.is_on_steep() {
            JumpState::SteepContact
        } else if max_air_jumps > 0 && self.jump_phase <= max_air_jumps {
            JumpState::AirborneWithBudget
        } else {
            JumpState::AirborneExhausted
        }
    }

    /// Reset the contact accumulators for the next tick
    pub fn clear_contacts(&mut self) {
        self.ground_contact_count = 0;
        self.steep_contact_count = 0;
        self.contact_normal = Vec3::ZERO;
        self.steep_normal = Vec3::ZERO;
    }

    /// Reset everything, as on respawn
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
