//! Step scheduling
//!
//! A move of `n` mechanical steps becomes a sequence of ticks. Each tick is
//! one phase advance followed by a wait; the wait shrinks with the style's
//! resolution so that a mechanical step always takes `us_per_step`:
//!
//! - Single/Double: `n` ticks of `us_per_step`
//! - Interleave: `n` ticks of `us_per_step / 2`
//! - Microstep: `n * m` ticks of `us_per_step / m`
//!
//! The caller owns the clock. [`StepSchedule`] only says how many ticks are
//! left and how long to wait after each.

use crate::config::Microsteps;
use crate::traits::{StepStyle, StepperError};

/// Microseconds in one minute
const US_PER_MINUTE: u32 = 60_000_000;

/// Interval between full steps for a given speed
///
/// `60_000_000 / (steps_per_rev * rpm)`
pub fn us_per_step(steps_per_rev: u16, rpm: u16) -> Result<u32, StepperError> {
    if steps_per_rev == 0 {
        return Err(StepperError::InvalidConfig);
    }
    if rpm == 0 {
        return Err(StepperError::InvalidSpeed);
    }
    Ok(US_PER_MINUTE / (steps_per_rev as u32 * rpm as u32))
}

/// Remaining ticks of a stepper move
///
/// Iterating yields the wait (in µs) that follows each phase advance.
///
/// ```ignore
/// let schedule = StepSchedule::new(200, StepStyle::Microstep, us, Microsteps::Sixteen);
/// for wait_us in schedule {
///     stepper.onestep(MotorDirection::Forward, StepStyle::Microstep)?;
///     delay.delay_us(wait_us);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepSchedule {
    remaining: u32,
    interval_us: u32,
}

impl StepSchedule {
    /// Schedule `steps` mechanical steps in `style`
    pub fn new(steps: u16, style: StepStyle, us_per_step: u32, microsteps: Microsteps) -> Self {
        let (ticks_per_step, interval_us) = match style {
            StepStyle::Single | StepStyle::Double => (1, us_per_step),
            StepStyle::Interleave => (1, us_per_step / 2),
            StepStyle::Microstep => {
                let m = microsteps.count() as u32;
                (m, us_per_step / m)
            }
        };

        Self {
            remaining: steps as u32 * ticks_per_step,
            interval_us,
        }
    }

    /// Ticks left to run
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Wait after each tick in µs
    pub fn interval_us(&self) -> u32 {
        self.interval_us
    }

    /// Check if the move is complete
    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }

    /// Time still to spend on this move in µs
    pub fn remaining_us(&self) -> u64 {
        self.remaining as u64 * self.interval_us as u64
    }
}

impl Iterator for StepSchedule {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.interval_us)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for StepSchedule {}
