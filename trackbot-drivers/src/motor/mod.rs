//! Motor driver implementations
//!
//! - DC motors: one H-bridge, two direction inputs and a PWM speed channel

pub mod dc;

pub use dc::DcMotor;
