//! Conversions between raw codes, volts, and normalized values.
//!
//! The raw 12-bit code is the canonical domain. Volts and normalized fractions are
//! computed from it using the reference voltage held in the driver's [`Config`].
//! The device has no voltage sense, so "reading" a voltage is always a
//! recomputation from the code in the DAC register.
//!
//! Conversions towards the device truncate toward zero rather than rounding, and
//! leave range handling to the clamp applied when the frame is built. They are
//! computed in `f64` so truncation applies to the exact quotient and not to an
//! `f32` product already rounded up to the next integer.
//!
//! [`Config`]: crate::config::Config

use crate::constants::MAX_CODE;

const FULL_SCALE: f32 = MAX_CODE as f32;
const FULL_SCALE_F64: f64 = MAX_CODE as f64;

/// Raw code for `voltage` against `reference_voltage`, truncated toward zero.
///
/// Voltages outside `0.0..=reference_voltage` produce codes outside `0..=4095`,
/// which saturate when written. `reference_voltage` must be positive.
pub fn voltage_to_code(voltage: f32, reference_voltage: f32) -> i32 {
    // `as` saturates at the i32 bounds and maps NaN to 0.
    (f64::from(voltage) / f64::from(reference_voltage) * FULL_SCALE_F64) as i32
}

/// Output voltage corresponding to `code` against `reference_voltage`.
pub fn code_to_voltage(code: u16, reference_voltage: f32) -> f32 {
    f32::from(code) / FULL_SCALE * reference_voltage
}

/// Raw code for a normalized output level, clamped to `0.0..=1.0` first.
///
/// NaN gives code 0, leaving the output at its lowest level.
pub fn norm_to_code(value: f32) -> i32 {
    (f64::from(value).clamp(0.0, 1.0) * FULL_SCALE_F64) as i32
}

/// Normalized output level (`0.0..=1.0`) corresponding to `code`.
pub fn code_to_norm(code: u16) -> f32 {
    f32::from(code) / FULL_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn voltage_truncates() {
        // int(1.2 / 3.3 * 4095) = 1489
        assert_eq!(voltage_to_code(1.2, 3.3), 1489);
        // int(1.2 / 5 * 4095) = 982.8 -> 982
        assert_eq!(voltage_to_code(1.2, 5.0), 982);
        assert_eq!(voltage_to_code(3.3, 3.3), 4095);
    }

    #[test]
    fn voltage_truncates_below_integer_boundary() {
        // The f32 product rounds up to 846.0; the exact quotient is 845.99...
        assert_eq!(voltage_to_code(0.681_758_2, 3.3), 845);
    }

    #[test]
    fn voltage_out_of_range_is_left_to_the_clamp() {
        assert!(voltage_to_code(10.0, 3.3) > 4095);
        assert!(voltage_to_code(-1.0, 3.3) < 0);
        assert_eq!(voltage_to_code(f32::INFINITY, 3.3), i32::MAX);
        assert_eq!(voltage_to_code(f32::NAN, 3.3), 0);
    }

    #[test]
    fn code_to_voltage_scales_reference() {
        assert!(close(code_to_voltage(3071, 3.3), 2.474_8));
        assert!(close(code_to_voltage(4095, 5.0), 5.0));
        assert_eq!(code_to_voltage(0, 3.3), 0.0);
    }

    #[test]
    fn norm_clamps_and_truncates() {
        assert_eq!(norm_to_code(0.75), 3071);
        assert_eq!(norm_to_code(0.5), 2047);
        assert_eq!(norm_to_code(1.5), 4095);
        assert_eq!(norm_to_code(-0.5), 0);
        assert_eq!(norm_to_code(f32::NAN), 0);
    }

    #[test]
    fn code_to_norm_is_fraction_of_full_scale() {
        assert!(close(code_to_norm(3071), 0.75));
        assert_eq!(code_to_norm(4095), 1.0);
        assert_eq!(code_to_norm(0), 0.0);
    }
}
