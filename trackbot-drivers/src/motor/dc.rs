//! DC motor on one shield H-bridge
//!
//! Direction is set by the bridge's two inputs, speed by its PWM channel:
//!
//! | Direction | IN1  | IN2  |
//! |-----------|------|------|
//! | Forward   | high | low  |
//! | Backward  | low  | high |
//! | Release   | low  | low  |
//!
//! The input going low is always written first, so both inputs are never
//! high at the same time.
//!
//! ```ignore
//! let mut motor = shield.motor(3)?;
//! motor.run(MotorDirection::Forward)?;
//! motor.set_speed(150)?;
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use trackbot_core::config::DcMotorPins;
use trackbot_core::traits::{HBridgeMotor, MotorDirection};
use trackbot_hal::I2cBus;

use crate::shield::{Error, MotorShield};

/// PWM ticks per unit of 8-bit speed
const SPEED_SCALE: u16 = 16;

/// Handle to one DC motor slot
pub struct DcMotor<'a, M: RawMutex, B> {
    shield: &'a MotorShield<M, B>,
    slot: u8,
    pins: DcMotorPins,
}

impl<'a, M: RawMutex, B: I2cBus> DcMotor<'a, M, B> {
    pub(crate) fn new(shield: &'a MotorShield<M, B>, slot: u8, pins: DcMotorPins) -> Self {
        Self { shield, slot, pins }
    }

    /// Slot number (1-4)
    pub fn slot(&self) -> u8 {
        self.slot
    }

    /// Expander channels of this slot
    pub fn pins(&self) -> DcMotorPins {
        self.pins
    }
}

impl<M: RawMutex, B: I2cBus> HBridgeMotor for DcMotor<'_, M, B> {
    type Error = Error<B::Error>;

    fn run(&mut self, direction: MotorDirection) -> Result<(), Self::Error> {
        trace!("M{}: run {}", self.slot, direction);
        let DcMotorPins { in1, in2, .. } = self.pins;

        // (first pin, level), (second pin, level)
        let writes = match direction {
            MotorDirection::Forward => [(in2, false), (in1, true)],
            MotorDirection::Backward => [(in1, false), (in2, true)],
            MotorDirection::Release => [(in1, false), (in2, false)],
        };

        self.shield
            .with_pwm(|pwm| writes.into_iter().try_for_each(|(pin, high)| pwm.set_pin(pin, high)))?;
        Ok(())
    }

    fn set_speed(&mut self, speed: u8) -> Result<(), Self::Error> {
        let duty = speed as u16 * SPEED_SCALE;
        Ok(self.shield.with_pwm(|pwm| pwm.set_duty(self.pins.pwm, duty))?)
    }
}
