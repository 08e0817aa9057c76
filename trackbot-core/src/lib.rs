//! Board-agnostic motor control logic for the tracked robot
//!
//! This crate contains all motor logic that does not touch the bus:
//!
//! - Motor and stepper enumerations and driver traits
//! - Stepper phase state machine with microstep current blending
//! - Tick-driven step scheduling
//! - Differential-drive planning and the track `Engine`
//! - Board configuration types and the shield pin map

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod kinematics;
pub mod stepper;
pub mod traits;
