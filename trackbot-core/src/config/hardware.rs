//! Shield wiring
//!
//! Channel numbers on the PCA9685 for each motor slot. These are fixed by
//! the shield's PCB traces.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of DC motor slots on the shield
pub const DC_MOTOR_COUNT: usize = 4;

/// Number of stepper slots on the shield
pub const STEPPER_COUNT: usize = 2;

/// Number of PWM channels on the expander
pub const PWM_CHANNEL_COUNT: u8 = 16;

/// Expander channels wired to one DC motor H-bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DcMotorPins {
    /// Speed (PWM) channel
    pub pwm: u8,
    /// Direction input 1
    pub in1: u8,
    /// Direction input 2
    pub in2: u8,
}

impl DcMotorPins {
    /// Create a pin set
    pub const fn new(pwm: u8, in1: u8, in2: u8) -> Self {
        Self { pwm, in1, in2 }
    }
}

/// Expander channels wired to one stepper (two H-bridges, coil A and coil B)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepperPins {
    /// Coil A current (PWM) channel
    pub pwm_a: u8,
    /// Coil A direction input 1
    pub in1_a: u8,
    /// Coil A direction input 2
    pub in2_a: u8,
    /// Coil B current (PWM) channel
    pub pwm_b: u8,
    /// Coil B direction input 1
    pub in1_b: u8,
    /// Coil B direction input 2
    pub in2_b: u8,
}

impl StepperPins {
    /// Build a stepper pin set from the two bridges it spans
    pub const fn from_bridges(a: DcMotorPins, b: DcMotorPins) -> Self {
        Self {
            pwm_a: a.pwm,
            in1_a: a.in1,
            in2_a: a.in2,
            pwm_b: b.pwm,
            in1_b: b.in1,
            in2_b: b.in2,
        }
    }

    /// The four direction inputs, in latch bit order (bit 0 first)
    pub const fn latch_pins(&self) -> [u8; 4] {
        [self.in2_a, self.in1_b, self.in1_a, self.in2_b]
    }
}

/// DC motor wiring, indexed by slot - 1 (M1..M4)
pub const DC_MOTOR_PINS: [DcMotorPins; DC_MOTOR_COUNT] = [
    DcMotorPins::new(8, 10, 9),
    DcMotorPins::new(13, 11, 12),
    DcMotorPins::new(2, 4, 3),
    DcMotorPins::new(7, 5, 6),
];

/// Stepper wiring, indexed by slot - 1
///
/// Stepper 1 shares the bridges of M1/M2, stepper 2 those of M3/M4.
pub const STEPPER_PINS: [StepperPins; STEPPER_COUNT] = [
    StepperPins::from_bridges(DC_MOTOR_PINS[0], DC_MOTOR_PINS[1]),
    StepperPins::from_bridges(DC_MOTOR_PINS[2], DC_MOTOR_PINS[3]),
];
