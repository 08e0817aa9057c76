//! Drive planning
//!
//! Speeds and turn rates are 8-bit magnitudes. Signed entry points take the
//! low byte of the magnitude, so `256` behaves like `0` and `300` like `44`.
//!
//! # Turn blending
//!
//! The outer track always runs at the commanded speed. The inner track
//! follows the turn rate `t`:
//!
//! - `t <= 128`: same direction at `speed * (128 - t) / 128`, from straight
//!   (`t = 0`) down to a pivot on the stopped inner track (`t = 128`)
//! - `t > 128`: reversed at `speed * (t - 128) / 127`, up to rotation in
//!   place at `t = 255`

use crate::traits::MotorDirection;

/// Turn rate at which the inner track stops
pub const PIVOT_TURN_RATE: u8 = 0x80;

/// Direction and speed for one track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrackCommand {
    /// Bridge direction
    pub direction: MotorDirection,
    /// PWM speed (0-255)
    pub speed: u8,
}

impl TrackCommand {
    /// Create a track command
    pub const fn new(direction: MotorDirection, speed: u8) -> Self {
        Self { direction, speed }
    }

    /// Released track
    pub const RELEASE: Self = Self::new(MotorDirection::Release, 0);
}

/// Commands for both tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrivePlan {
    /// Left track
    pub left: TrackCommand,
    /// Right track
    pub right: TrackCommand,
}

impl DrivePlan {
    /// Both tracks running the same command
    pub const fn both(command: TrackCommand) -> Self {
        Self {
            left: command,
            right: command,
        }
    }

    /// Both tracks released
    pub const HALT: Self = Self::both(TrackCommand::RELEASE);

    /// Check if this plan releases both tracks
    pub fn is_halt(&self) -> bool {
        self.left.direction == MotorDirection::Release
            && self.right.direction == MotorDirection::Release
    }
}

/// Side the robot turns toward (the inner track)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TurnSide {
    /// Left track is inner
    Left,
    /// Right track is inner
    Right,
}

/// Split a signed speed into a base direction and an 8-bit magnitude
fn split_speed(speed: i32) -> (MotorDirection, u8) {
    if speed < 0 {
        (MotorDirection::Backward, speed.wrapping_neg() as u8)
    } else {
        (MotorDirection::Forward, speed as u8)
    }
}

/// Plan a straight move
///
/// Zero releases both tracks, positive drives forward, negative backward.
pub fn plan_straight(speed: i32) -> DrivePlan {
    if speed == 0 {
        return DrivePlan::HALT;
    }
    let (direction, magnitude) = split_speed(speed);
    DrivePlan::both(TrackCommand::new(direction, magnitude))
}

/// Plan a turn
///
/// The sign of `speed` selects forward/backward travel, the sign of
/// `turn_rate` the side: negative turns left, zero or positive right.
pub fn plan_turn(speed: i32, turn_rate: i32) -> DrivePlan {
    let (direction, magnitude) = split_speed(speed);
    let (side, rate) = if turn_rate < 0 {
        (TurnSide::Left, turn_rate.wrapping_neg() as u8)
    } else {
        (TurnSide::Right, turn_rate as u8)
    };
    plan_turn_toward(side, magnitude, rate, direction)
}

/// Plan a turn toward `side` travelling in `direction`
pub fn plan_turn_toward(
    side: TurnSide,
    speed: u8,
    turn_rate: u8,
    direction: MotorDirection,
) -> DrivePlan {
    let outer = TrackCommand::new(direction, speed);
    let inner = inner_track(speed, turn_rate, direction);

    match side {
        TurnSide::Left => DrivePlan { left: inner, right: outer },
        TurnSide::Right => DrivePlan { left: outer, right: inner },
    }
}

/// Inner track command for a turn
fn inner_track(speed: u8, turn_rate: u8, direction: MotorDirection) -> TrackCommand {
    let speed = speed as u32;
    let rate = turn_rate as u32;
    let pivot = PIVOT_TURN_RATE as u32;

    if turn_rate <= PIVOT_TURN_RATE {
        TrackCommand::new(direction, (speed * (pivot - rate) / pivot) as u8)
    } else {
        TrackCommand::new(direction.reversed(), (speed * (rate - pivot) / 127) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FWD: MotorDirection = MotorDirection::Forward;
    const BWD: MotorDirection = MotorDirection::Backward;

    #[test]
    fn test_straight_zero_halts() {
        assert_eq!(plan_straight(0), DrivePlan::HALT);
        assert!(plan_straight(0).is_halt());
    }

    #[test]
    fn test_straight_forward() {
        assert_eq!(plan_straight(200), DrivePlan::both(TrackCommand::new(FWD, 200)));
    }

    #[test]
    fn test_straight_backward() {
        assert_eq!(plan_straight(-40), DrivePlan::both(TrackCommand::new(BWD, 40)));
    }

    #[test]
    fn test_straight_truncates_to_byte() {
        assert_eq!(plan_straight(300).left.speed, 44);
        assert_eq!(plan_straight(-256).left, TrackCommand::new(BWD, 0));
    }

    #[test]
    fn test_turn_pivot() {
        let plan = plan_turn(200, 128);
        assert_eq!(plan.left, TrackCommand::new(FWD, 200));
        assert_eq!(plan.right, TrackCommand::new(FWD, 0));
    }

    #[test]
    fn test_turn_in_place() {
        let plan = plan_turn(200, 255);
        assert_eq!(plan.left, TrackCommand::new(FWD, 200));
        assert_eq!(plan.right, TrackCommand::new(BWD, 200));
    }

    #[test]
    fn test_turn_half_rate() {
        let plan = plan_turn(200, 64);
        assert_eq!(plan.left, TrackCommand::new(FWD, 200));
        assert_eq!(plan.right, TrackCommand::new(FWD, 100));
    }

    #[test]
    fn test_turn_left_swaps_sides() {
        let plan = plan_turn(200, -64);
        assert_eq!(plan.left, TrackCommand::new(FWD, 100));
        assert_eq!(plan.right, TrackCommand::new(FWD, 200));
    }

    #[test]
    fn test_turn_backward_reverses_inner_forward() {
        let plan = plan_turn(-100, -255);
        assert_eq!(plan.right, TrackCommand::new(BWD, 100));
        assert_eq!(plan.left, TrackCommand::new(FWD, 100));
    }

    #[test]
    fn test_turn_just_past_pivot() {
        let plan = plan_turn_toward(TurnSide::Right, 254, 129, FWD);
        assert_eq!(plan.right, TrackCommand::new(BWD, 2));
    }

    proptest! {
        #[test]
        fn prop_zero_turn_is_straight(speed in 1i32..=255) {
            prop_assert_eq!(plan_turn(speed, 0), plan_straight(speed));
            prop_assert_eq!(plan_turn(-speed, 0), plan_straight(-speed));
        }

        #[test]
        fn prop_outer_track_runs_full_speed(speed in 0u8..=255, rate in 0u8..=255) {
            let plan = plan_turn_toward(TurnSide::Right, speed, rate, FWD);
            prop_assert_eq!(plan.left, TrackCommand::new(FWD, speed));
            prop_assert!(plan.right.speed <= speed);
        }

        #[test]
        fn prop_inner_slows_then_reverses(speed in 0u8..=255, rate in 0u8..255) {
            let a = plan_turn_toward(TurnSide::Left, speed, rate, FWD).left;
            let b = plan_turn_toward(TurnSide::Left, speed, rate + 1, FWD).left;

            if rate < PIVOT_TURN_RATE {
                prop_assert_eq!(b.direction, FWD);
                prop_assert!(b.speed <= a.speed);
            } else {
                prop_assert_eq!(b.direction, BWD);
                prop_assert!(b.speed >= a.speed || a.direction == FWD);
            }
        }
    }
}
