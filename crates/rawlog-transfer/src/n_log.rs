//! Nikon N-Log transfer function.
//!
//! A cube-root toe joined to a natural-log shoulder, defined in 10-bit code
//! values and normalized here to `[0, 1]`.
//!
//! ```text
//! x <  0.328:  y = (650 * cbrt(x + 0.0075)) / 1023
//! x >= 0.328:  y = (150 * ln(x) + 619) / 1023
//! ```
//!
//! The two published segments do not meet exactly at the cut. Decode switches
//! at the log segment's value at the cut, above every toe output, so decode
//! stays the exact inverse of encode.
//!
//! # Reference
//!
//! Nikon N-Log Specification Document v1.0.0

mod constants {
    pub const CUT: f64 = 0.328;
    pub const TOE_SCALE: f64 = 650.0 / 1023.0;
    pub const TOE_OFFSET: f64 = 0.0075;
    pub const LOG_SLOPE: f64 = 150.0 / 1023.0;
    pub const LOG_OFFSET: f64 = 619.0 / 1023.0;
}

use constants::*;

#[inline]
fn log_break() -> f64 {
    LOG_SLOPE * CUT.ln() + LOG_OFFSET
}

/// Linear to N-Log.
#[inline]
pub fn encode_f64(linear: f64) -> f64 {
    if linear < CUT {
        TOE_SCALE * (linear + TOE_OFFSET).cbrt()
    } else {
        LOG_SLOPE * linear.ln() + LOG_OFFSET
    }
}

/// N-Log to linear.
#[inline]
pub fn decode_f64(log: f64) -> f64 {
    if log < log_break() {
        (log / TOE_SCALE).powi(3) - TOE_OFFSET
    } else {
        ((log - LOG_OFFSET) / LOG_SLOPE).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn middle_gray() {
        assert_abs_diff_eq!(encode_f64(0.18), 0.3636677701, epsilon = 1e-9);
    }

    #[test]
    fn toe_stays_below_break() {
        let below = CUT - 1e-12;
        assert!(encode_f64(below) < log_break());
        assert_abs_diff_eq!(encode_f64(CUT), log_break(), epsilon = 1e-15);
    }

    #[test]
    fn roundtrip() {
        for &x in &[-0.007, 0.0, 0.01, 0.18, 0.3279, 0.328, 1.0, 10.0] {
            assert_abs_diff_eq!(decode_f64(encode_f64(x)), x, epsilon = 1e-9);
        }
    }
}
