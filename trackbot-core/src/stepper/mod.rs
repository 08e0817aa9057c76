//! Stepper phase sequencing
//!
//! The phase counter models a two-coil bipolar stepper as four macro-phases
//! of `m` microsteps each. Every stepping style moves the same counter, so a
//! motor can switch style between moves without losing its position.
//!
//! - [`curve`] - microstep current curves for 8 and 16 microsteps
//! - [`phase`] - the phase counter state machine and coil drive output
//! - [`schedule`] - tick intervals for a multi-step move

pub mod curve;
pub mod phase;
pub mod schedule;

pub use curve::microstep_curve;
pub use phase::{CoilDrive, PhaseCounter};
pub use schedule::{us_per_step, StepSchedule};
