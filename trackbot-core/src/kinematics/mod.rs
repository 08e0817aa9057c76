//! Differential-drive kinematics
//!
//! A speed plus turn-rate command becomes one direction/speed pair per
//! track. [`drive`] holds the pure planning math, [`engine`] applies plans
//! to two H-bridge motors.

pub mod drive;
pub mod engine;

pub use drive::{plan_straight, plan_turn, plan_turn_toward, DrivePlan, TrackCommand, TurnSide};
pub use engine::{Engine, TrackState};
