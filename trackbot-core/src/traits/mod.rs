//! Hardware abstraction traits
//!
//! These traits define the interface between the drive logic and the
//! board-specific motor drivers.

pub mod motor;
pub mod stepper;

pub use motor::{HBridgeMotor, MotorDirection};
pub use stepper::{StepStyle, StepperError};
