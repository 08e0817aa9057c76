//! Motor shield driver implementations
//!
//! This crate drives the motor shield over I2C:
//!
//! - [`pwm`] - PCA9685 16-channel PWM expander (the only bus client)
//! - [`shield`] - board controller owning the expander and all motor slots
//! - [`motor`] - DC motor handles (one H-bridge each)
//! - [`stepper`] - stepper handles (two H-bridges each)
//!
//! Motion logic that does not touch the bus lives in `trackbot-core`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

mod fmt;

pub mod motor;
pub mod pwm;
pub mod shield;
pub mod stepper;

#[cfg(test)]
mod testing;

pub use motor::DcMotor;
pub use shield::{Error, MotorShield};
pub use stepper::StepperMotor;
