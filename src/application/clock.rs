//=========================================================================
// Fixed Timestep
//=========================================================================
//
// Accumulates real elapsed time and hands it back in fixed-size steps.
//
//   advance(elapsed) → accumulator += min(elapsed, max_frame)
//   next_step()      → Some(step) while accumulator > step
//
// The clamp keeps one long stall (debugger, window drag) from queueing
// an unbounded number of catch-up updates.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== FixedTimestep =======================================================

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: Duration,
    accumulator: Duration,
    max_frame: Duration,
}

impl FixedTimestep {
    /// Most catch-up steps one frame may queue.
    pub const MAX_STEPS_PER_FRAME: u32 = 8;

    /// # Panics
    ///
    /// Panics if `tps` is not a positive finite number.
    pub fn from_tps(tps: f64) -> Self {
        assert!(tps.is_finite() && tps > 0.0, "TPS must be positive, got {}", tps);
        Self::with_step(Duration::from_secs_f64(1.0 / tps))
    }

    /// # Panics
    ///
    /// Panics if `step` is zero.
    pub fn with_step(step: Duration) -> Self {
        assert!(!step.is_zero(), "Timestep must be non-zero");
        Self {
            step,
            accumulator: Duration::ZERO,
            max_frame: step * Self::MAX_STEPS_PER_FRAME,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Time not yet consumed by a step.
    pub fn accumulated(&self) -> Duration {
        self.accumulator
    }

    /// Adds real time, clamped to `MAX_STEPS_PER_FRAME` steps.
    pub fn advance(&mut self, elapsed: Duration) {
        self.accumulator += elapsed.min(self.max_frame);
    }

    /// Consumes one step if strictly more than a step is accumulated.
    pub fn next_step(&mut self) -> Option<Duration> {
        if self.accumulator > self.step {
            self.accumulator -= self.step;
            Some(self.step)
        } else {
            None
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
