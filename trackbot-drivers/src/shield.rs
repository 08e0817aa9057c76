//! Motor shield board controller
//!
//! The shield carries one PCA9685 and four H-bridges. It owns the expander
//! and the state of every motor slot for its whole lifetime; motor and
//! stepper handles borrow the shield and reach the bus only through it.
//!
//! # Slots
//!
//! | Slot      | Channels (PWM, IN1, IN2) |
//! |-----------|--------------------------|
//! | M1        | 8, 10, 9                 |
//! | M2        | 13, 11, 12               |
//! | M3        | 2, 4, 3                  |
//! | M4        | 7, 5, 6                  |
//! | Stepper 1 | M1 + M2                  |
//! | Stepper 2 | M3 + M4                  |
//!
//! # Bus Access
//!
//! The expander sits behind a blocking mutex. Each pin pair of a DC motor
//! command, each channel write, and each complete stepper phase update is
//! issued under a single lock, so handles may be shared between callers
//! when `M` is a real mutex (`CriticalSectionRawMutex`). Single-threaded
//! firmware uses `NoopRawMutex`.

use core::cell::{Cell, RefCell};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::delay::DelayNs;

use trackbot_core::config::{
    ShieldConfig, DC_MOTOR_COUNT, DC_MOTOR_PINS, STEPPER_COUNT, STEPPER_PINS,
};
use trackbot_core::kinematics::Engine;
use trackbot_core::traits::StepperError;
use trackbot_hal::I2cBus;

use crate::motor::DcMotor;
use crate::pwm::{self, Pca9685};
use crate::stepper::{StepperMotor, StepperState};

/// Slot of the left track motor used by [`MotorShield::engine`]
pub const LEFT_TRACK_SLOT: u8 = 1;

/// Slot of the right track motor used by [`MotorShield::engine`]
pub const RIGHT_TRACK_SLOT: u8 = 2;

/// Motor shield errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// PWM expander error (bus failure or bad channel)
    Pwm(pwm::Error<E>),
    /// DC motor slot outside 1..=4
    InvalidMotorSlot(u8),
    /// Stepper slot outside 1..=2
    InvalidStepperSlot(u8),
    /// Stepper configuration or speed rejected
    Stepper(StepperError),
}

impl<E> From<pwm::Error<E>> for Error<E> {
    fn from(e: pwm::Error<E>) -> Self {
        Error::Pwm(e)
    }
}

impl<E> From<StepperError> for Error<E> {
    fn from(e: StepperError) -> Self {
        Error::Stepper(e)
    }
}

/// Motor shield controller
pub struct MotorShield<M: RawMutex, B> {
    config: ShieldConfig,
    pwm: Mutex<M, RefCell<Pca9685<B>>>,
    steppers: [Mutex<M, Cell<StepperState>>; STEPPER_COUNT],
}

impl<M: RawMutex, B: I2cBus> MotorShield<M, B> {
    /// Create a controller on `bus`
    ///
    /// Nothing is written until [`begin`](Self::begin).
    pub fn new(bus: B, config: ShieldConfig) -> Self {
        let stepper = StepperState::new(config.microsteps);
        Self {
            config,
            pwm: Mutex::new(RefCell::new(Pca9685::new(bus, config.address))),
            steppers: [Mutex::new(Cell::new(stepper)), Mutex::new(Cell::new(stepper))],
        }
    }

    /// Board configuration
    pub fn config(&self) -> &ShieldConfig {
        &self.config
    }

    /// Release the bus
    pub fn release(self) -> B {
        self.pwm.into_inner().into_inner().release()
    }

    /// Initialize the expander at the configured PWM frequency
    ///
    /// Resets MODE1, programs the frequency and turns every channel off.
    pub fn begin<D: DelayNs>(&self, delay: &mut D) -> Result<(), Error<B::Error>> {
        debug!(
            "shield {:#x}: begin at {} Hz",
            self.config.address, self.config.pwm_frequency_hz
        );
        self.with_pwm(|pwm| {
            pwm.reset()?;
            pwm.set_frequency(self.config.pwm_frequency_hz, delay)?;
            pwm.all_off()
        })?;
        Ok(())
    }

    /// Change the PWM frequency after [`begin`](Self::begin)
    pub fn set_pwm_frequency<D: DelayNs>(
        &self,
        freq_hz: u16,
        delay: &mut D,
    ) -> Result<u8, Error<B::Error>> {
        Ok(self.with_pwm(|pwm| pwm.set_frequency(freq_hz, delay))?)
    }

    /// Drive a channel as a digital pin
    pub fn set_pin(&self, pin: u8, high: bool) -> Result<(), Error<B::Error>> {
        Ok(self.with_pwm(|pwm| pwm.set_pin(pin, high))?)
    }

    /// Set a channel's duty (0-4095); larger values drive it fully on
    pub fn set_pwm(&self, pin: u8, value: u16) -> Result<(), Error<B::Error>> {
        Ok(self.with_pwm(|pwm| pwm.set_duty(pin, value))?)
    }

    /// Run `f` with exclusive access to the expander
    pub(crate) fn with_pwm<R>(&self, f: impl FnOnce(&mut Pca9685<B>) -> R) -> R {
        self.pwm.lock(|pwm| f(&mut pwm.borrow_mut()))
    }

    /// DC motor in slot 1..=4
    pub fn motor(&self, slot: u8) -> Result<DcMotor<'_, M, B>, Error<B::Error>> {
        if slot == 0 || slot as usize > DC_MOTOR_COUNT {
            warn!("shield: no DC motor slot {}", slot);
            return Err(Error::InvalidMotorSlot(slot));
        }
        Ok(self.dc_motor(slot))
    }

    /// Stepper in slot 1..=2 with `steps_per_rev` full steps per revolution
    pub fn stepper(
        &self,
        steps_per_rev: u16,
        slot: u8,
    ) -> Result<StepperMotor<'_, M, B>, Error<B::Error>> {
        if slot == 0 || slot as usize > STEPPER_COUNT {
            warn!("shield: no stepper slot {}", slot);
            return Err(Error::InvalidStepperSlot(slot));
        }
        let index = slot as usize - 1;
        let mut stepper = StepperMotor::new(self, slot, STEPPER_PINS[index], &self.steppers[index]);
        stepper.set_steps_per_revolution(steps_per_rev);
        Ok(stepper)
    }

    /// Track engine on M1 (left) and M2 (right)
    pub fn engine(&self) -> Engine<DcMotor<'_, M, B>> {
        Engine::new(self.dc_motor(LEFT_TRACK_SLOT), self.dc_motor(RIGHT_TRACK_SLOT))
    }

    /// Handle for a slot already known to be valid
    fn dc_motor(&self, slot: u8) -> DcMotor<'_, M, B> {
        DcMotor::new(self, slot, DC_MOTOR_PINS[slot as usize - 1])
    }
}
