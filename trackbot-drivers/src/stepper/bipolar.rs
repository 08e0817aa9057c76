//! Bipolar stepper on two shield H-bridges
//!
//! Coil A uses the first bridge, coil B the second. A phase update writes
//! the two coil currents and then the four direction inputs, all under one
//! bus lock:
//!
//! | Latch bit | Input        |
//! |-----------|--------------|
//! | 0         | coil A, IN2  |
//! | 1         | coil B, IN1  |
//! | 2         | coil A, IN1  |
//! | 3         | coil B, IN2  |
//!
//! The phase counter belongs to the shield slot, not to the handle, so a
//! second handle for the same slot continues from the same position.
//!
//! # Usage
//!
//! ```ignore
//! let mut stepper = shield.stepper(200, 1)?;
//! stepper.set_speed_rpm(30)?;
//! stepper.step(100, MotorDirection::Forward, StepStyle::Double, &mut delay)?;
//! stepper.release()?;
//! ```
//!
//! A scheduler can run a move itself by calling [`StepperMotor::onestep`]
//! once per item of [`StepperMotor::schedule`].

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use trackbot_core::config::{Microsteps, StepperPins};
use trackbot_core::stepper::{us_per_step, CoilDrive, PhaseCounter, StepSchedule};
use trackbot_core::traits::{MotorDirection, StepStyle, StepperError};
use trackbot_hal::I2cBus;

use crate::pwm::{self, Pca9685};
use crate::shield::{Error, MotorShield};

/// Per-slot stepper state kept by the shield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepperState {
    /// Phase counter
    pub phase: PhaseCounter,
    /// Full steps per revolution (0 until configured)
    pub steps_per_rev: u16,
    /// Speed in RPM (0 until configured)
    pub rpm: u16,
}

impl StepperState {
    /// Unconfigured stepper at phase 0
    pub const fn new(microsteps: Microsteps) -> Self {
        Self {
            phase: PhaseCounter::new(microsteps),
            steps_per_rev: 0,
            rpm: 0,
        }
    }
}

/// Handle to one stepper slot
pub struct StepperMotor<'a, M: RawMutex, B> {
    shield: &'a MotorShield<M, B>,
    slot: u8,
    pins: StepperPins,
    state: &'a Mutex<M, Cell<StepperState>>,
}

impl<'a, M: RawMutex, B: I2cBus> StepperMotor<'a, M, B> {
    pub(crate) fn new(
        shield: &'a MotorShield<M, B>,
        slot: u8,
        pins: StepperPins,
        state: &'a Mutex<M, Cell<StepperState>>,
    ) -> Self {
        Self {
            shield,
            slot,
            pins,
            state,
        }
    }

    /// Slot number (1-2)
    pub fn slot(&self) -> u8 {
        self.slot
    }

    /// Expander channels of this slot
    pub fn pins(&self) -> StepperPins {
        self.pins
    }

    fn state(&self) -> StepperState {
        self.state.lock(|s| s.get())
    }

    fn update(&self, f: impl FnOnce(&mut StepperState)) {
        self.state.lock(|s| {
            let mut state = s.get();
            f(&mut state);
            s.set(state);
        });
    }

    /// Set the full steps per revolution
    ///
    /// The configured speed is kept; the step interval follows.
    pub fn set_steps_per_revolution(&mut self, steps: u16) {
        self.update(|s| s.steps_per_rev = steps);
    }

    /// Full steps per revolution
    pub fn steps_per_revolution(&self) -> u16 {
        self.state().steps_per_rev
    }

    /// Set the speed in revolutions per minute
    ///
    /// Rejected when the speed is zero or the steps per revolution were
    /// never configured.
    pub fn set_speed_rpm(&mut self, rpm: u16) -> Result<(), Error<B::Error>> {
        let us = us_per_step(self.steps_per_revolution(), rpm)?;
        debug!("stepper{}: {} rpm, {} us/step", self.slot, rpm, us);
        self.update(|s| s.rpm = rpm);
        Ok(())
    }

    /// Interval between full steps at the configured speed
    pub fn us_per_step(&self) -> Result<u32, StepperError> {
        let state = self.state();
        us_per_step(state.steps_per_rev, state.rpm)
    }

    /// Current phase counter
    pub fn position(&self) -> u16 {
        self.state().phase.position()
    }

    /// Advance the phase one step and drive the coils
    ///
    /// Returns the new phase counter. The counter only moves once every
    /// write went through. `Release` does not step: it de-energizes the
    /// coils like [`release`](Self::release) and keeps the counter.
    pub fn onestep(
        &mut self,
        direction: MotorDirection,
        style: StepStyle,
    ) -> Result<u16, Error<B::Error>> {
        if direction == MotorDirection::Release {
            self.release()?;
            return Ok(self.position());
        }

        let pins = self.pins;
        let slot = self.slot;
        let shield = self.shield;

        self.state.lock(|cell| {
            let mut state = cell.get();
            let drive = state.phase.advance(direction, style);
            trace!(
                "stepper{}: pos {} latch {:#x} a {} b {}",
                slot,
                state.phase.position(),
                drive.latch,
                drive.current_a,
                drive.current_b
            );

            shield.with_pwm(|pwm| write_phase(pwm, &pins, &drive))?;
            cell.set(state);
            Ok(state.phase.position())
        })
    }

    /// Tick schedule for `steps` mechanical steps in `style`
    pub fn schedule(&self, steps: u16, style: StepStyle) -> Result<StepSchedule, StepperError> {
        let state = self.state();
        let us = us_per_step(state.steps_per_rev, state.rpm)?;
        Ok(StepSchedule::new(steps, style, us, state.phase.microsteps()))
    }

    /// Move `steps` mechanical steps, blocking on `delay` between ticks
    ///
    /// `Release` de-energizes the coils once and returns without waiting.
    pub fn step<D: embedded_hal::delay::DelayNs>(
        &mut self,
        steps: u16,
        direction: MotorDirection,
        style: StepStyle,
        delay: &mut D,
    ) -> Result<(), Error<B::Error>> {
        if direction == MotorDirection::Release {
            return self.release();
        }
        for wait_us in self.schedule(steps, style)? {
            self.onestep(direction, style)?;
            delay.delay_us(wait_us);
        }
        Ok(())
    }

    /// Move `steps` mechanical steps, awaiting `delay` between ticks
    ///
    /// `Release` de-energizes the coils once and returns without waiting.
    pub async fn step_async<D: embedded_hal_async::delay::DelayNs>(
        &mut self,
        steps: u16,
        direction: MotorDirection,
        style: StepStyle,
        delay: &mut D,
    ) -> Result<(), Error<B::Error>> {
        if direction == MotorDirection::Release {
            return self.release();
        }
        for wait_us in self.schedule(steps, style)? {
            self.onestep(direction, style)?;
            delay.delay_us(wait_us).await;
        }
        Ok(())
    }

    /// De-energize both coils
    ///
    /// All four direction inputs go low and both currents to zero. The
    /// phase counter is kept.
    pub fn release(&mut self) -> Result<(), Error<B::Error>> {
        debug!("stepper{}: release", self.slot);
        let pins = self.pins;
        self.shield.with_pwm(|pwm| {
            for pin in pins.latch_pins() {
                pwm.set_pin(pin, false)?;
            }
            pwm.set_duty(pins.pwm_a, 0)?;
            pwm.set_duty(pins.pwm_b, 0)
        })?;
        Ok(())
    }
}

/// Coil currents first, then the latch inputs in bit order
fn write_phase<B: I2cBus>(
    pwm: &mut Pca9685<B>,
    pins: &StepperPins,
    drive: &CoilDrive,
) -> Result<(), pwm::Error<B::Error>> {
    pwm.set_duty(pins.pwm_a, drive.pwm_a())?;
    pwm.set_duty(pins.pwm_b, drive.pwm_b())?;
    for (bit, pin) in (0u8..).zip(pins.latch_pins()) {
        pwm.set_pin(pin, drive.is_high(bit))?;
    }
    Ok(())
}
