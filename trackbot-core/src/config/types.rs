//! Board configuration
//!
//! Everything here is fixed for a given build; the defaults match an
//! unmodified shield.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default shield I2C address (no address jumpers bridged)
pub const DEFAULT_I2C_ADDRESS: u8 = 0x60;

/// Default PWM frequency in Hz
pub const DEFAULT_PWM_FREQUENCY_HZ: u16 = 1600;

/// Config format version
pub const CONFIG_VERSION: u8 = 1;

/// Microstep resolution of the stepper phase counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Microsteps {
    /// 8 microsteps per full step
    Eight,
    /// 16 microsteps per full step
    #[default]
    Sixteen,
}

impl Microsteps {
    /// Microsteps per full step
    pub const fn count(self) -> u16 {
        match self {
            Microsteps::Eight => 8,
            Microsteps::Sixteen => 16,
        }
    }
}

/// Motor shield configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShieldConfig {
    /// Config format version
    pub version: u8,
    /// 7-bit I2C address of the PWM expander
    pub address: u8,
    /// PWM frequency programmed at `begin`
    pub pwm_frequency_hz: u16,
    /// Stepper microstep resolution
    pub microsteps: Microsteps,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ShieldConfig {
    /// Default configuration
    pub const fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            address: DEFAULT_I2C_ADDRESS,
            pwm_frequency_hz: DEFAULT_PWM_FREQUENCY_HZ,
            microsteps: Microsteps::Sixteen,
        }
    }

    /// Same configuration at a different I2C address
    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Same configuration with a different microstep resolution
    pub const fn with_microsteps(mut self, microsteps: Microsteps) -> Self {
        self.microsteps = microsteps;
        self
    }
}

#[cfg(feature = "serde")]
impl ShieldConfig {
    /// Serialize into `buf` as postcard, returning the used prefix
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], postcard::Error> {
        postcard::to_slice(self, buf)
    }

    /// Deserialize from postcard bytes
    ///
    /// Data written by a different config version is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        let config: Self = postcard::from_bytes(bytes)?;
        if config.version != CONFIG_VERSION {
            return Err(postcard::Error::DeserializeBadEncoding);
        }
        Ok(config)
    }
}
