//! PCA9685 16-channel PWM expander (I2C)
//!
//! Every motor output on the shield, direction inputs included, is one
//! PCA9685 channel. A channel is programmed with an on tick and an off tick
//! inside a 4096-tick period; setting bit 12 of either makes the output
//! fully on or fully off. The chip has no plain GPIO, so digital pins use
//! that full-on/full-off convention.
//!
//! # Register Map
//!
//! - MODE1 (0x00): sleep, auto-increment and restart bits
//! - LEDn_ON_L..LEDn_OFF_H (0x06 + 4n): 4-byte on/off block of channel n
//! - PRE_SCALE (0xFE): output frequency prescaler, writable only in sleep
//!
//! # Frequency Sequence
//!
//! 1. Read MODE1
//! 2. Write MODE1 with SLEEP set (RESTART cleared)
//! 3. Write PRE_SCALE
//! 4. Restore the old MODE1
//! 5. Wait for the oscillator to settle (5 ms)
//! 6. Write MODE1 with RESTART | AUTO_INCREMENT | ALLCALL

use embedded_hal::delay::DelayNs;
use trackbot_core::config::PWM_CHANNEL_COUNT;
use trackbot_hal::I2cBus;

/// PCA9685 register addresses
pub mod reg {
    /// Mode register 1
    pub const MODE1: u8 = 0x00;
    /// Channel 0 on-time, low byte (start of the channel blocks)
    pub const LED0_ON_L: u8 = 0x06;
    /// Prescaler for output frequency
    pub const PRE_SCALE: u8 = 0xFE;
}

/// MODE1 bits
pub mod mode1 {
    /// Restart enabled
    pub const RESTART: u8 = 0x80;
    /// Register auto-increment
    pub const AUTO_INCREMENT: u8 = 0x20;
    /// Low power mode, oscillator off
    pub const SLEEP: u8 = 0x10;
    /// Respond to the LED all-call address
    pub const ALLCALL: u8 = 0x01;
}

/// Internal oscillator frequency in Hz
pub const OSCILLATOR_HZ: u32 = 25_000_000;

/// Ticks per PWM period
pub const PWM_PERIOD_TICKS: u32 = 4096;

/// Full-on / full-off flag (bit 12 of an on or off tick)
pub const FULL_TICK: u16 = 4096;

/// Largest duty value that is still a PWM window
pub const MAX_DUTY: u16 = 4095;

/// Oscillator settle time after leaving sleep
pub const SETTLE_MS: u32 = 5;

/// Smallest prescale the chip accepts
const MIN_PRESCALE: u32 = 3;

/// The chip's output runs fast; requested frequencies are scaled by 0.9
/// (as 9/10) to land on the intended rate.
const FREQ_CORRECTION_NUM: u32 = 9;
const FREQ_CORRECTION_DEN: u32 = 10;

/// PCA9685 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C transaction failed
    Bus(E),
    /// Channel number above 15
    InvalidChannel(u8),
    /// Frequency of zero
    InvalidFrequency(u16),
}

/// Prescale byte for an output frequency
///
/// `round(25 MHz / (4096 * 0.9 * freq)) - 1`, clamped to `3..=255`.
/// Returns `None` for a zero frequency.
pub fn prescale_for(freq_hz: u16) -> Option<u8> {
    if freq_hz == 0 {
        return None;
    }

    let num = OSCILLATOR_HZ * FREQ_CORRECTION_DEN;
    let den = PWM_PERIOD_TICKS * FREQ_CORRECTION_NUM * freq_hz as u32;
    let rounded = (num + den / 2) / den;
    let prescale = rounded.saturating_sub(1).clamp(MIN_PRESCALE, u8::MAX as u32);

    Some(prescale as u8)
}

/// PCA9685 driver
pub struct Pca9685<B> {
    bus: B,
    address: u8,
}

impl<B: I2cBus> Pca9685<B> {
    /// Create a driver for the chip at `address`
    pub fn new(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    /// 7-bit I2C address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the bus
    pub fn release(self) -> B {
        self.bus
    }

    /// Reset MODE1 to its power-on value (awake, no auto-increment)
    pub fn reset(&mut self) -> Result<(), Error<B::Error>> {
        self.write_register(reg::MODE1, 0x00)
    }

    /// Read one register
    pub fn read_register(&mut self, register: u8) -> Result<u8, Error<B::Error>> {
        let mut buf = [0u8; 1];
        self.bus
            .write_read(self.address, &[register], &mut buf)
            .map_err(Error::Bus)?;
        Ok(buf[0])
    }

    /// Write one register
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<B::Error>> {
        self.bus
            .write(self.address, &[register, value])
            .map_err(Error::Bus)
    }

    /// Program the output frequency
    ///
    /// Returns the prescale byte written.
    pub fn set_frequency<D: DelayNs>(
        &mut self,
        freq_hz: u16,
        delay: &mut D,
    ) -> Result<u8, Error<B::Error>> {
        let prescale = prescale_for(freq_hz).ok_or(Error::InvalidFrequency(freq_hz))?;
        debug!("pca9685: {} Hz -> prescale {}", freq_hz, prescale);

        let old_mode = self.read_register(reg::MODE1)?;
        let sleep_mode = (old_mode & !mode1::RESTART) | mode1::SLEEP;

        self.write_register(reg::MODE1, sleep_mode)?;
        self.write_register(reg::PRE_SCALE, prescale)?;
        self.write_register(reg::MODE1, old_mode)?;
        delay.delay_ms(SETTLE_MS);
        self.write_register(
            reg::MODE1,
            old_mode | mode1::RESTART | mode1::AUTO_INCREMENT | mode1::ALLCALL,
        )?;

        Ok(prescale)
    }

    /// Program the on and off ticks of a channel
    ///
    /// One 5-byte write: register, on low/high, off low/high.
    pub fn set_channel_pwm(
        &mut self,
        channel: u8,
        on: u16,
        off: u16,
    ) -> Result<(), Error<B::Error>> {
        if channel >= PWM_CHANNEL_COUNT {
            return Err(Error::InvalidChannel(channel));
        }

        let [on_l, on_h] = on.to_le_bytes();
        let [off_l, off_h] = off.to_le_bytes();
        let register = reg::LED0_ON_L + 4 * channel;

        self.bus
            .write(self.address, &[register, on_l, on_h, off_l, off_h])
            .map_err(Error::Bus)
    }

    /// Drive a channel as a digital pin
    pub fn set_pin(&mut self, channel: u8, high: bool) -> Result<(), Error<B::Error>> {
        let on = if high { FULL_TICK } else { 0 };
        self.set_channel_pwm(channel, on, 0)
    }

    /// Set a channel's duty (0-4095); larger values drive it fully on
    pub fn set_duty(&mut self, channel: u8, value: u16) -> Result<(), Error<B::Error>> {
        if value > MAX_DUTY {
            self.set_channel_pwm(channel, FULL_TICK, 0)
        } else {
            self.set_channel_pwm(channel, 0, value)
        }
    }

    /// Turn every channel off
    pub fn all_off(&mut self) -> Result<(), Error<B::Error>> {
        for channel in 0..PWM_CHANNEL_COUNT {
            self.set_channel_pwm(channel, 0, 0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{NoDelay, RecordingBus};

    #[test]
    fn test_prescale_default_frequency() {
        // 25e6 / (4096 * 1440) = 4.24 -> 4 - 1
        assert_eq!(prescale_for(1600), Some(3));
    }

    #[test]
    fn test_prescale_servo_frequency() {
        // 25e6 / (4096 * 54) = 113.03 -> 113 - 1
        assert_eq!(prescale_for(60), Some(112));
    }

    #[test]
    fn test_prescale_clamped() {
        assert_eq!(prescale_for(1), Some(255));
        assert_eq!(prescale_for(u16::MAX), Some(3));
        assert_eq!(prescale_for(0), None);
    }

    #[test]
    fn test_channel_register_layout() {
        let mut pca = Pca9685::new(RecordingBus::default(), 0x60);
        pca.set_channel_pwm(5, 0x0123, 0x0ABC).unwrap();

        let bus = pca.release();
        assert_eq!(bus.writes, [(0x60, vec![0x06 + 20, 0x23, 0x01, 0xBC, 0x0A])]);
    }

    #[test]
    fn test_invalid_channel() {
        let mut pca = Pca9685::new(RecordingBus::default(), 0x60);
        assert_eq!(pca.set_pin(16, true), Err(Error::InvalidChannel(16)));
        assert!(pca.release().writes.is_empty());
    }

    #[test]
    fn test_set_pin_uses_full_ticks() {
        let mut pca = Pca9685::new(RecordingBus::default(), 0x60);
        pca.set_pin(3, true).unwrap();
        pca.set_pin(3, false).unwrap();

        let bus = pca.release();
        assert_eq!(bus.channel_writes(), [(3, 4096, 0), (3, 0, 0)]);
    }

    #[test]
    fn test_set_duty_clamps_to_full_on() {
        let mut pca = Pca9685::new(RecordingBus::default(), 0x60);
        pca.set_duty(8, 4080).unwrap();
        pca.set_duty(8, 4096).unwrap();

        let bus = pca.release();
        assert_eq!(bus.channel_writes(), [(8, 0, 4080), (8, 4096, 0)]);
    }

    #[test]
    fn test_frequency_sequence() {
        let mut bus = RecordingBus::default();
        bus.mode1 = 0x01;
        let mut pca = Pca9685::new(bus, 0x60);
        let mut delay = NoDelay::default();

        assert_eq!(pca.set_frequency(1600, &mut delay), Ok(3));

        let bus = pca.release();
        assert_eq!(
            bus.register_writes(),
            [(0x00, 0x11), (0xFE, 3), (0x00, 0x01), (0x00, 0xA1)]
        );
        assert_eq!(delay.total_ns, 5_000_000);
    }

    #[test]
    fn test_zero_frequency_rejected_before_bus_access() {
        let mut pca = Pca9685::new(RecordingBus::default(), 0x60);
        assert_eq!(
            pca.set_frequency(0, &mut NoDelay::default()),
            Err(Error::InvalidFrequency(0))
        );
        assert!(pca.release().writes.is_empty());
    }
}
