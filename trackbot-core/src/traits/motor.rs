//! DC motor driver traits
//!
//! A DC motor on the shield sits behind one H-bridge: two direction inputs
//! and one PWM speed input. For stepper motors, see the [`stepper`] module.
//!
//! [`stepper`]: super::stepper

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Electrical state of an H-bridge pair
///
/// This is the state of the bridge inputs, not a measured velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MotorDirection {
    /// IN1 high, IN2 low
    Forward,
    /// IN1 low, IN2 high
    Backward,
    /// Both inputs low, motor coasts
    #[default]
    Release,
}

impl MotorDirection {
    /// Get the opposite running direction
    ///
    /// `Release` has no opposite and is returned unchanged.
    pub fn reversed(self) -> Self {
        match self {
            MotorDirection::Forward => MotorDirection::Backward,
            MotorDirection::Backward => MotorDirection::Forward,
            MotorDirection::Release => MotorDirection::Release,
        }
    }
}

/// Trait for a DC motor behind an H-bridge with PWM speed control
///
/// Implementations are stateless with respect to direction: every call to
/// [`run`](HBridgeMotor::run) reaches the hardware. Callers that want to
/// skip redundant writes keep their own cache (see
/// [`Engine`](crate::kinematics::Engine)).
pub trait HBridgeMotor {
    /// Error raised by the underlying transport
    type Error;

    /// Drive the bridge inputs for the given direction
    ///
    /// The input that must go low is written before the input that must go
    /// high, so the bridge never passes through the both-high brake state.
    fn run(&mut self, direction: MotorDirection) -> Result<(), Self::Error>;

    /// Set the PWM speed (0 = off, 255 = full)
    fn set_speed(&mut self, speed: u8) -> Result<(), Self::Error>;
}

impl<T: HBridgeMotor + ?Sized> HBridgeMotor for &mut T {
    type Error = T::Error;

    fn run(&mut self, direction: MotorDirection) -> Result<(), Self::Error> {
        T::run(self, direction)
    }

    fn set_speed(&mut self, speed: u8) -> Result<(), Self::Error> {
        T::set_speed(self, speed)
    }
}
