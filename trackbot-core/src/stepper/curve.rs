//! Microstep current curves
//!
//! Quarter-sine-like ramps from 0 to 255 with `m + 1` entries. Entry `k`
//! is the current of the coil being handed over to, `m - k` the current of
//! the coil handing over.

use crate::config::Microsteps;

/// Curve for 8 microsteps per full step
pub const MICROSTEP_CURVE_8: [u8; 9] = [0, 50, 98, 142, 180, 212, 236, 250, 255];

/// Curve for 16 microsteps per full step
pub const MICROSTEP_CURVE_16: [u8; 17] = [
    0, 25, 50, 74, 98, 120, 141, 162, 180, 197, 212, 225, 236, 244, 250, 253, 255,
];

/// Full-scale coil current
pub const FULL_CURRENT: u8 = 255;

/// Get the curve for a microstep resolution
pub fn microstep_curve(microsteps: Microsteps) -> &'static [u8] {
    match microsteps {
        Microsteps::Eight => &MICROSTEP_CURVE_8,
        Microsteps::Sixteen => &MICROSTEP_CURVE_16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_curve(microsteps: Microsteps) {
        let curve = microstep_curve(microsteps);
        assert_eq!(curve.len(), microsteps.count() as usize + 1);
        assert_eq!(curve[0], 0);
        assert_eq!(curve[curve.len() - 1], FULL_CURRENT);
        for pair in curve.windows(2) {
            assert!(pair[0] < pair[1], "curve not monotonic: {:?}", pair);
        }
    }

    #[test]
    fn test_curve_8_shape() {
        check_curve(Microsteps::Eight);
    }

    #[test]
    fn test_curve_16_shape() {
        check_curve(Microsteps::Sixteen);
    }

    #[test]
    fn test_curves_agree_on_shared_points() {
        // Every other 16-step entry sits close to the 8-step entry
        for (k, &v) in MICROSTEP_CURVE_8.iter().enumerate() {
            let fine = MICROSTEP_CURVE_16[2 * k];
            assert!(v.abs_diff(fine) <= 2, "k={} coarse={} fine={}", k, v, fine);
        }
    }
}
