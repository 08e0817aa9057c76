//! Track engine
//!
//! Drives a robot with one motor per side (wheel or track). There is no
//! calibration: equal speeds on both sides are assumed to give a straight
//! line.
//!
//! The engine remembers the last direction it commanded on each side and
//! only calls [`HBridgeMotor::run`] when that changes. Speed is written on
//! every command.
//!
//! ```ignore
//! let mut engine = shield.engine();
//! engine.move_straight(200)?;   // both tracks forward
//! engine.turn(200, -255)?;      // spin left in place
//! engine.halt()?;
//! ```

use super::drive::{plan_straight, plan_turn, plan_turn_toward, DrivePlan, TrackCommand, TurnSide};
use crate::traits::{HBridgeMotor, MotorDirection};

/// Last commanded direction of each track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrackState {
    /// Left track direction
    pub left: MotorDirection,
    /// Right track direction
    pub right: MotorDirection,
}

/// Differential-drive engine over two H-bridge motors
pub struct Engine<M> {
    left: M,
    right: M,
    state: TrackState,
}

impl<M: HBridgeMotor> Engine<M> {
    /// Create an engine from the left and right track motors
    ///
    /// Both tracks are assumed released.
    pub fn new(left: M, right: M) -> Self {
        Self {
            left,
            right,
            state: TrackState::default(),
        }
    }

    /// Last commanded directions
    pub fn state(&self) -> TrackState {
        self.state
    }

    /// Give the motors back
    pub fn into_motors(self) -> (M, M) {
        (self.left, self.right)
    }

    /// Release both tracks
    pub fn halt(&mut self) -> Result<(), M::Error> {
        self.set_directions(MotorDirection::Release, MotorDirection::Release)
    }

    /// Drive forward in a straight line (0 = stopped, 255 = full speed)
    pub fn move_forward(&mut self, speed: u8) -> Result<(), M::Error> {
        self.apply(DrivePlan::both(TrackCommand::new(MotorDirection::Forward, speed)))
    }

    /// Drive backward in a straight line (0 = stopped, 255 = full speed)
    pub fn move_backward(&mut self, speed: u8) -> Result<(), M::Error> {
        self.apply(DrivePlan::both(TrackCommand::new(MotorDirection::Backward, speed)))
    }

    /// Drive in a straight line at signed `speed`
    ///
    /// Zero halts, positive drives forward, negative backward. Only the low
    /// byte of the magnitude is used.
    pub fn move_straight(&mut self, speed: i32) -> Result<(), M::Error> {
        let plan = plan_straight(speed);
        if plan.is_halt() {
            return self.halt();
        }
        self.apply(plan)
    }

    /// Turn at signed `speed` with signed `turn_rate`
    ///
    /// A negative `turn_rate` turns left, positive right. The higher its
    /// magnitude the sharper the turn; 255 turns in place.
    pub fn turn(&mut self, speed: i32, turn_rate: i32) -> Result<(), M::Error> {
        self.apply(plan_turn(speed, turn_rate))
    }

    /// Turn left while driving forward
    pub fn turn_left_forward(&mut self, speed: u8, turn_rate: u8) -> Result<(), M::Error> {
        self.apply(plan_turn_toward(TurnSide::Left, speed, turn_rate, MotorDirection::Forward))
    }

    /// Turn right while driving forward
    pub fn turn_right_forward(&mut self, speed: u8, turn_rate: u8) -> Result<(), M::Error> {
        self.apply(plan_turn_toward(TurnSide::Right, speed, turn_rate, MotorDirection::Forward))
    }

    /// Turn left while driving backward
    pub fn turn_left_backward(&mut self, speed: u8, turn_rate: u8) -> Result<(), M::Error> {
        self.apply(plan_turn_toward(TurnSide::Left, speed, turn_rate, MotorDirection::Backward))
    }

    /// Turn right while driving backward
    pub fn turn_right_backward(&mut self, speed: u8, turn_rate: u8) -> Result<(), M::Error> {
        self.apply(plan_turn_toward(TurnSide::Right, speed, turn_rate, MotorDirection::Backward))
    }

    /// Apply a plan: directions first, then speeds
    pub fn apply(&mut self, plan: DrivePlan) -> Result<(), M::Error> {
        self.set_directions(plan.left.direction, plan.right.direction)?;
        self.left.set_speed(plan.left.speed)?;
        self.right.set_speed(plan.right.speed)
    }

    /// Run each side whose direction changed
    ///
    /// A side's cache is only updated once its write went through.
    fn set_directions(
        &mut self,
        left: MotorDirection,
        right: MotorDirection,
    ) -> Result<(), M::Error> {
        if self.state.left != left {
            self.left.run(left)?;
            self.state.left = left;
        }
        if self.state.right != right {
            self.right.run(right)?;
            self.state.right = right;
        }
        Ok(())
    }
}
