// Character movement controller

use glam::Vec3;
use log::{debug, trace};

use super::config::{ConfigError, ControllerConfig, SlopeThresholds};
use super::contact::{promote_steep_contacts, record_contact, ContactKind, ContactSample};
use super::gravity::GravityAxis;
use super::host::{CharacterBody, GroundProbe};
use super::jump::{try_jump, Jump};
use super::projector::{adjust_velocity, desired_velocity, facing_rotation, Heading, MoveInput};
use super::snap::snap_to_ground;
use super::state::{Grounding, JumpState, MovementState};

/// Errors that abort a tick before any state changes
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TickError {
    #[error("gravity vector {0:?} has no direction")]
    DegenerateGravity(Vec3),

    #[error("timestep must be positive and finite, got {0}")]
    InvalidTimestep(f32),
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub grounding: Grounding,
    /// Jump rule in effect after grounding was resolved
    pub jump_state: JumpState,
    /// The jump applied this tick, if one was requested and allowed
    pub jump: Option<Jump>,
    pub up: Vec3,
    /// Surface normal the velocity was projected against
    pub contact_normal: Vec3,
    /// Velocity written back to the body
    pub velocity: Vec3,
}

/// Physics-driven movement controller for a single character
///
/// Feed it contacts with [`Controller::on_contact`] as the physics engine
/// reports them, request jumps with [`Controller::jump`], and call
/// [`Controller::tick`] exactly once per physics step.
#[derive(Debug, Clone)]
pub struct Controller {
    config: ControllerConfig,
    thresholds: SlopeThresholds,
    state: MovementState,
    gravity: GravityAxis,
    jump_requested: bool,
    last_grounding: Grounding,
}

impl Controller {
    /// Create a controller, rejecting an inconsistent configuration
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        let thresholds = config.validate()?;
        debug!(
            "controller created: ground {:.1}° (dot {:.4}), stairs {:.1}° (dot {:.4})",
            config.max_ground_angle,
            thresholds.min_ground_dot,
            config.max_stairs_angle,
            thresholds.min_stairs_dot
        );
        Ok(Self {
            config,
            thresholds,
            state: MovementState::new(),
            gravity: GravityAxis::default(),
            jump_requested: false,
            last_grounding: Grounding::Airborne,
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Replace the configuration, revalidating the slope thresholds
    ///
    /// The current configuration stays in place when the new one is rejected.
    pub fn set_config(&mut self, config: ControllerConfig) -> Result<(), ConfigError> {
        match config.validate() {
            Ok(thresholds) => {
                self.thresholds = thresholds;
                self.config = config;
                Ok(())
            }
            Err(err) => {
                debug!("rejected controller config: {err}");
                Err(err)
            }
        }
    }

    pub fn thresholds(&self) -> &SlopeThresholds {
        &self.thresholds
    }

    pub fn state(&self) -> &MovementState {
        &self.state
    }

    /// Up axis from the most recent tick
    pub fn up(&self) -> Vec3 {
        self.gravity.up()
    }

    /// Gravity vector from the most recent tick
    pub fn gravity(&self) -> Vec3 {
        self.gravity.gravity()
    }

    /// Grounding resolved on the most recent tick
    pub fn grounding(&self) -> Grounding {
        self.last_grounding
    }

    /// Feed one contact point from the collision system
    ///
    /// May be called any number of times between ticks. Classification uses
    /// the up axis of the most recent tick.
    pub fn on_contact(&mut self, sample: ContactSample) -> ContactKind {
        record_contact(&mut self.state, sample, self.gravity.up(), &self.thresholds)
    }

    /// Request a jump on the next tick
    ///
    /// Requests are latched: several calls before the next tick still produce
    /// at most one jump.
    pub fn jump(&mut self) {
        self.jump_requested = true;
    }

    pub fn is_jump_pending(&self) -> bool {
        self.jump_requested
    }

    /// Forget all movement history, as on respawn
    pub fn reset(&mut self) {
        self.state.reset();
        self.jump_requested = false;
        self.last_grounding = Grounding::Airborne;
    }

    /// Run one physics step
    ///
    /// Resolves grounding from the contacts gathered since the last tick,
    /// corrects the body's velocity toward the input, applies a pending jump
    /// and clears the contact accumulators.
    pub fn tick<H>(
        &mut self,
        host: &mut H,
        input: &MoveInput,
        gravity: Vec3,
        dt: f32,
    ) -> Result<TickReport, TickError>
    where
        H: CharacterBody + GroundProbe + ?Sized,
    {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(TickError::InvalidTimestep(dt));
        }
        self.gravity =
            GravityAxis::from_gravity(gravity).ok_or(TickError::DegenerateGravity(gravity))?;
        let up = self.gravity.up();

        let grounding = self.resolve_grounding(host, up);

        let speed = if grounding.is_grounded() {
            self.config.movement_speed
        } else {
            self.config.air_movement_speed
        };
        let desired = desired_velocity(input.intent, &input.camera, up, speed);
        let heading = Heading::from_rotation(host.rotation(), up);
        self.state.velocity = adjust_velocity(
            self.state.velocity,
            desired,
            self.state.contact_normal,
            &heading,
            self.config.max_speed * dt,
        );

        if self.config.fall_gravity_multiplier > 0.0 && self.state.velocity.dot(up) < 0.0 {
            self.state.velocity -=
                up * self.gravity.magnitude() * self.config.fall_gravity_multiplier * dt;
        }
        host.set_velocity(self.state.velocity);

        let jump_state = self.state.jump_state(self.config.max_air_jumps);
        let jump = if std::mem::take(&mut self.jump_requested) {
            self.apply_jump(host, up)
        } else {
            None
        };

        match facing_rotation(self.state.velocity, input.intent, up) {
            Some(rotation) => host.set_rotation(rotation),
            None => host.set_angular_velocity(Vec3::ZERO),
        }

        let report = TickReport {
            grounding,
            jump_state,
            jump,
            up,
            contact_normal: self.state.contact_normal,
            velocity: self.state.velocity,
        };
        trace!(
            "tick: {:?} ground={} steep={} phase={} v={:?}",
            grounding,
            self.state.ground_contact_count,
            self.state.steep_contact_count,
            self.state.jump_phase,
            self.state.velocity
        );

        self.last_grounding = grounding;
        self.state.clear_contacts();
        Ok(report)
    }

    fn resolve_grounding<H>(&mut self, host: &H, up: Vec3) -> Grounding
    where
        H: CharacterBody + GroundProbe + ?Sized,
    {
        self.state.advance_step();
        self.state.velocity = host.velocity();
        let airborne_steps = self.state.steps_since_last_grounded;

        let grounding = if self.state.is_grounded() {
            Grounding::Contact
        } else if snap_to_ground(
            &mut self.state,
            host,
            host.position(),
            up,
            &self.config,
            &self.thresholds,
        ) {
            Grounding::Snapped
        } else if promote_steep_contacts(&mut self.state, up, self.thresholds.min_ground_dot) {
            Grounding::Promoted
        } else {
            Grounding::Airborne
        };

        if grounding.is_grounded() {
            if airborne_steps > 2 {
                debug!("landed ({grounding:?}) after {} airborne steps", airborne_steps - 1);
            }
            self.state.land(up);
        } else {
            self.state.leave_ground(up);
        }
        grounding
    }

    fn apply_jump<H>(&mut self, host: &mut H, up: Vec3) -> Option<Jump>
    where
        H: CharacterBody + GroundProbe + ?Sized,
    {
        let jump = try_jump(
            &mut self.state,
            up,
            self.gravity.magnitude(),
            self.config.jump_height,
            self.config.max_air_jumps,
        )?;
        host.apply_impulse(jump.delta_velocity * host.mass());
        debug!(
            "jump from {:?}: direction {:?}, phase {}",
            jump.taken_from, jump.direction, self.state.jump_phase
        );
        Some(jump)
    }
}
