//! PWM expander drivers

pub mod pca9685;

pub use pca9685::{prescale_for, Error, Pca9685};
