//! Stepper motor types
//!
//! Shared between the phase state machine in this crate and the shield
//! stepper driver.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stepping style
///
/// Selects the angular resolution and the coil current blending of a
/// stepper move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StepStyle {
    /// Full steps, one coil energized at a time
    #[default]
    Single,
    /// Full steps, two coils energized at a time (more torque)
    Double,
    /// Half steps, alternating between single and double alignment
    Interleave,
    /// Microsteps, coil currents blended along the microstep curve
    Microstep,
}

impl StepStyle {
    /// Whether coil currents follow the microstep curve
    pub fn is_microstep(self) -> bool {
        self == StepStyle::Microstep
    }
}

/// Errors that can occur with stepper configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepperError {
    /// Steps per revolution is zero
    InvalidConfig,
    /// Requested speed is zero
    InvalidSpeed,
}
