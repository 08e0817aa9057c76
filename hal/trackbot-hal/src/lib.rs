//! Trackbot Hardware Abstraction Layer
//!
//! This crate defines the bus traits that the motor-shield drivers are
//! written against. Chip HALs either implement [`I2cBus`] directly or hand
//! an `embedded-hal` 1.0 I2C peripheral to [`EmbeddedHalI2c`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  trackbot-drivers (PCA9685, shield)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  trackbot-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  chip HAL     │       │ embedded-hal  │
//! │  (native)     │       │   I2c impl    │
//! └───────────────┘       └───────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;

pub use i2c::{EmbeddedHalI2c, I2cBus};
