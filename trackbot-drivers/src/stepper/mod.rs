//! Stepper driver implementations
//!
//! - Bipolar steppers spanning two shield H-bridges

pub mod bipolar;

pub use bipolar::{StepperMotor, StepperState};
