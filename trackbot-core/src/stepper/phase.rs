//! Stepper phase counter
//!
//! The counter `c` lives in `[0, 4m)` where `m` is the microstep count.
//! Stepping styles move it by different amounts:
//!
//! | Style      | Move per step                                    |
//! |------------|--------------------------------------------------|
//! | Single     | `m/2` from an odd half-phase, `m` otherwise      |
//! | Double     | `m/2` from an even half-phase, `m` otherwise     |
//! | Interleave | `m/2`                                            |
//! | Microstep  | `1`                                              |
//!
//! A half-phase is `c / (m/2)`, one of eight positions. Single lands on even
//! half-phases (one coil energized), Double on odd ones (two coils).
//!
//! The parity test assumes the counter sits on a half-phase boundary. After
//! a microstep move the counter may be anywhere inside a half-phase and the
//! first Single/Double step then realigns from wherever it is.

use crate::config::Microsteps;
use crate::stepper::curve::{microstep_curve, FULL_CURRENT};
use crate::traits::{MotorDirection, StepStyle};

/// Latch states for full/half stepping, indexed by half-phase
///
/// Bit 0: coil A+, bit 1: coil B+, bit 2: coil A-, bit 3: coil B-.
const STEP_LATCH: [u8; 8] = [0x1, 0x3, 0x2, 0x6, 0x4, 0xC, 0x8, 0x9];

/// Latch states for microstepping, indexed by quadrant
const MICROSTEP_LATCH: [u8; 4] = [0x3, 0x6, 0xC, 0x9];

/// Coil output for one phase position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoilDrive {
    /// 4-bit latch state selecting which direction inputs go high
    pub latch: u8,
    /// Coil A current (0-255)
    pub current_a: u8,
    /// Coil B current (0-255)
    pub current_b: u8,
}

impl CoilDrive {
    /// Check whether latch bit `bit` (0-3) is set
    pub fn is_high(&self, bit: u8) -> bool {
        self.latch & (1 << bit) != 0
    }

    /// Coil A current scaled to the 12-bit PWM range
    pub fn pwm_a(&self) -> u16 {
        self.current_a as u16 * 16
    }

    /// Coil B current scaled to the 12-bit PWM range
    pub fn pwm_b(&self) -> u16 {
        self.current_b as u16 * 16
    }
}

/// Stepper phase counter state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseCounter {
    position: u16,
    microsteps: Microsteps,
}

impl PhaseCounter {
    /// Create a counter at position 0
    pub const fn new(microsteps: Microsteps) -> Self {
        Self {
            position: 0,
            microsteps,
        }
    }

    /// Create a counter at an arbitrary position (normalized into range)
    pub fn at(microsteps: Microsteps, position: u16) -> Self {
        let period = 4 * microsteps.count();
        Self {
            position: position % period,
            microsteps,
        }
    }

    /// Current counter value, always in `[0, 4m)`
    pub fn position(&self) -> u16 {
        self.position
    }

    /// Microstep resolution
    pub fn microsteps(&self) -> Microsteps {
        self.microsteps
    }

    /// Counter period `4m` (one electrical cycle)
    pub fn period(&self) -> u16 {
        4 * self.microsteps.count()
    }

    /// Current half-phase, `0..8`
    pub fn half_phase(&self) -> u16 {
        self.position / (self.microsteps.count() / 2)
    }

    /// Advance one step and return the coil drive for the new position
    ///
    /// `Release` leaves the counter where it is.
    pub fn advance(&mut self, direction: MotorDirection, style: StepStyle) -> CoilDrive {
        let delta = self.step_size(style);
        let period = self.period();

        self.position = match direction {
            MotorDirection::Forward => (self.position + delta) % period,
            MotorDirection::Backward => (self.position + period - delta) % period,
            MotorDirection::Release => self.position,
        };

        self.coil_drive(style)
    }

    /// Counter distance covered by one step in `style` from here
    fn step_size(&self, style: StepStyle) -> u16 {
        let m = self.microsteps.count();
        let odd = self.half_phase() % 2 == 1;

        match style {
            StepStyle::Single if odd => m / 2,
            StepStyle::Single => m,
            StepStyle::Double if odd => m,
            StepStyle::Double => m / 2,
            StepStyle::Interleave => m / 2,
            StepStyle::Microstep => 1,
        }
    }

    /// Coil drive for the current position
    pub fn coil_drive(&self, style: StepStyle) -> CoilDrive {
        if !style.is_microstep() {
            return CoilDrive {
                latch: STEP_LATCH[self.half_phase() as usize],
                current_a: FULL_CURRENT,
                current_b: FULL_CURRENT,
            };
        }

        let m = self.microsteps.count();
        let curve = microstep_curve(self.microsteps);
        let quadrant = self.position / m;
        let offset = (self.position % m) as usize;
        let rising = curve[offset];
        let falling = curve[m as usize - offset];

        // Coil A hands over in even quadrants, coil B in odd ones
        let (current_a, current_b) = if quadrant % 2 == 0 {
            (falling, rising)
        } else {
            (rising, falling)
        };

        CoilDrive {
            latch: MICROSTEP_LATCH[quadrant as usize],
            current_a,
            current_b,
        }
    }
}
