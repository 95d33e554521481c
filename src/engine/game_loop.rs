// Fixed timestep accumulator
//
// Frame durations go in, a bounded number of fixed physics steps come out.
// The movement controller assumes exactly one tick per physics step, so
// everything downstream of this runs at a constant `dt`.

use std::time::Duration;

/// Default physics rate (60 steps per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Maximum number of physics steps per frame to prevent spiral of death
pub const MAX_PHYSICS_STEPS: u32 = 5;

/// Accumulates frame time and hands out fixed steps
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: Duration,
    max_steps: u32,
    accumulator: Duration,
    paused: bool,
    step_count: u64,
    dropped: Duration,
}

impl FixedTimestep {
    /// Accumulator running at [`FIXED_TIMESTEP`]
    pub fn new() -> Self {
        Self::with_step(Duration::from_secs_f32(FIXED_TIMESTEP))
    }

    /// Accumulator running at a custom step length
    pub fn with_step(step: Duration) -> Self {
        Self {
            step,
            max_steps: MAX_PHYSICS_STEPS,
            accumulator: Duration::ZERO,
            paused: false,
            step_count: 0,
            dropped: Duration::ZERO,
        }
    }

    /// Cap on steps handed out by a single [`FixedTimestep::advance`]
    pub fn max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Feed one frame's duration, returns the number of fixed steps to run
    ///
    /// Time beyond the per-frame cap is discarded rather than carried over.
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        if self.paused || self.step.is_zero() {
            return 0;
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }

        if self.accumulator >= self.step {
            let whole_steps = (self.accumulator.as_nanos() / self.step.as_nanos()) as u32;
            let behind = self.step * whole_steps;
            self.dropped += behind;
            self.accumulator -= behind;
            log::debug!("physics fell behind, dropped {:?}", behind);
        }

        self.step_count += steps as u64;
        steps
    }

    /// Step length in seconds, the `dt` handed to every tick
    pub fn dt(&self) -> f32 {
        self.step.as_secs_f32()
    }

    /// Fraction of a step left in the accumulator, in `[0, 1)`
    pub fn alpha(&self) -> f32 {
        if self.step.is_zero() {
            return 0.0;
        }
        self.accumulator.as_secs_f32() / self.step.as_secs_f32()
    }

    /// Total steps handed out
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Total time discarded because a frame exceeded the step cap
    pub fn dropped(&self) -> Duration {
        self.dropped
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    /// Resume stepping
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            log::info!("Simulation resumed");
        }
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new()
    }
}
