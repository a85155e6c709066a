//! Camera log curves of the OCIO `LogCameraTransform` form.
//!
//! Most camera log encodings share one shape: a logarithm of an affine
//! function of linear light, joined below a break point by a straight
//! line that keeps the curve finite through zero and into negatives.
//!
//! ```text
//! x >= linSideBreak:  y = logSideSlope * log_base(linSideSlope * x + linSideOffset) + logSideOffset
//! x <  linSideBreak:  y = linearSlope * x + linearOffset
//! ```
//!
//! `linearSlope` is either published by the manufacturer or derived for C1
//! continuity at the break. `linearOffset` is always derived so the two
//! segments meet exactly, and decode switches segments at `encode(linSideBreak)`,
//! which makes [`CameraLog::decode`] the exact inverse of [`CameraLog::encode`].
//!
//! # Reference
//!
//! OCIO LogCameraTransform, ARRI LogC3/LogC4 white papers, Fujifilm F-Log and
//! F-Log2 data sheets, Sony S-Log3 and Panasonic V-Log technical summaries,
//! Leica L-Log reference, RED IPP2 Log3G10.

/// Parameters of one camera log curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraLogParams {
    /// Logarithm base.
    pub base: f64,
    /// Scale applied to linear input before the log.
    pub lin_side_slope: f64,
    /// Offset added to scaled linear before the log.
    pub lin_side_offset: f64,
    /// Scale applied to the log result.
    pub log_side_slope: f64,
    /// Offset added after log scaling.
    pub log_side_offset: f64,
    /// Linear value below which the straight segment is used.
    pub lin_side_break: f64,
    /// Published slope of the straight segment, or `None` to derive it.
    pub linear_slope: Option<f64>,
}

/// Fujifilm F-Log.
pub const F_LOG: CameraLogParams = CameraLogParams {
    base: 10.0,
    lin_side_slope: 0.555556,
    lin_side_offset: 0.009468,
    log_side_slope: 0.344676,
    log_side_offset: 0.790453,
    lin_side_break: 0.00089,
    linear_slope: Some(8.735631),
};

/// Fujifilm F-Log2.
pub const F_LOG2: CameraLogParams = CameraLogParams {
    base: 10.0,
    lin_side_slope: 5.555556,
    lin_side_offset: 0.064829,
    log_side_slope: 0.245281,
    log_side_offset: 0.384316,
    lin_side_break: 0.000889,
    linear_slope: Some(8.799461),
};

/// Panasonic V-Log.
pub const V_LOG: CameraLogParams = CameraLogParams {
    base: 10.0,
    lin_side_slope: 1.0,
    lin_side_offset: 0.00873,
    log_side_slope: 0.241514,
    log_side_offset: 0.598206,
    lin_side_break: 0.01,
    linear_slope: Some(5.6),
};

/// Sony S-Log3, expressed in normalized 10-bit code values.
pub const S_LOG3: CameraLogParams = CameraLogParams {
    base: 10.0,
    lin_side_slope: 1.0 / 0.19,
    lin_side_offset: 0.01 / 0.19,
    log_side_slope: 261.5 / 1023.0,
    log_side_offset: 420.0 / 1023.0,
    lin_side_break: 0.01125,
    linear_slope: Some((171.2102946929 - 95.0) / (0.01125 * 1023.0)),
};

/// Leica L-Log.
pub const L_LOG: CameraLogParams = CameraLogParams {
    base: 10.0,
    lin_side_slope: 1.3,
    lin_side_offset: 0.0115,
    log_side_slope: 0.27,
    log_side_offset: 0.6,
    lin_side_break: 0.006,
    linear_slope: Some(8.0),
};

/// ARRI LogC3 (EI 800, scene linear exposure factor).
pub const LOG_C3: CameraLogParams = CameraLogParams {
    base: 10.0,
    lin_side_slope: 5.555556,
    lin_side_offset: 0.052272,
    log_side_slope: 0.247190,
    log_side_offset: 0.385537,
    lin_side_break: 0.010591,
    linear_slope: Some(5.367655),
};

/// ARRI LogC4.
pub const LOG_C4: CameraLogParams = CameraLogParams {
    base: 2.0,
    lin_side_slope: 2231.82630906769,
    lin_side_offset: 64.0,
    log_side_slope: 0.0647954196341293,
    log_side_offset: -0.295908392682586,
    lin_side_break: -0.0180569961199113,
    linear_slope: None,
};

/// RED Log3G10 (IPP2).
pub const LOG3G10: CameraLogParams = CameraLogParams {
    base: 10.0,
    lin_side_slope: 155.975327,
    lin_side_offset: 0.01 * 155.975327 + 1.0,
    log_side_slope: 0.224282,
    log_side_offset: 0.0,
    lin_side_break: -0.01,
    linear_slope: Some(15.1927),
};

/// A camera log curve with its straight segment resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraLog {
    params: CameraLogParams,
    ln_base: f64,
    linear_slope: f64,
    linear_offset: f64,
    log_break: f64,
}

impl CameraLog {
    /// Resolves the straight segment of `params`.
    pub fn new(params: CameraLogParams) -> Self {
        let ln_base = params.base.ln();
        let lin_at_break = params.lin_side_slope * params.lin_side_break + params.lin_side_offset;
        let log_break = params.log_side_slope * lin_at_break.ln() / ln_base + params.log_side_offset;

        // Derivative of the log segment at the break
        let linear_slope = params.linear_slope.unwrap_or(
            params.log_side_slope * params.lin_side_slope / (lin_at_break * ln_base),
        );
        let linear_offset = log_break - linear_slope * params.lin_side_break;

        Self {
            params,
            ln_base,
            linear_slope,
            linear_offset,
            log_break,
        }
    }

    /// Linear to log.
    #[inline]
    pub fn encode(&self, linear: f64) -> f64 {
        let p = &self.params;
        if linear >= p.lin_side_break {
            let x = p.lin_side_slope * linear + p.lin_side_offset;
            p.log_side_slope * x.ln() / self.ln_base + p.log_side_offset
        } else {
            self.linear_slope * linear + self.linear_offset
        }
    }

    /// Log to linear.
    #[inline]
    pub fn decode(&self, log: f64) -> f64 {
        let p = &self.params;
        if log >= self.log_break {
            let exp = (log - p.log_side_offset) / p.log_side_slope;
            (p.base.powf(exp) - p.lin_side_offset) / p.lin_side_slope
        } else {
            (log - self.linear_offset) / self.linear_slope
        }
    }

    /// Encoded value at the break point.
    pub fn log_break(&self) -> f64 {
        self.log_break
    }

    /// Resolved straight segment as `(slope, offset)`.
    pub fn linear_segment(&self) -> (f64, f64) {
        (self.linear_slope, self.linear_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ALL: [CameraLogParams; 8] = [F_LOG, F_LOG2, V_LOG, S_LOG3, L_LOG, LOG_C3, LOG_C4, LOG3G10];

    #[test]
    fn derived_offsets_match_published() {
        // Manufacturer black offsets for the straight segment. F-Log and L-Log
        // publish offsets that leave a small step at the break; ours close it.
        assert_abs_diff_eq!(CameraLog::new(F_LOG).linear_segment().1, 0.092864, epsilon = 2e-4);
        assert_abs_diff_eq!(CameraLog::new(F_LOG2).linear_segment().1, 0.092864, epsilon = 1e-5);
        assert_abs_diff_eq!(CameraLog::new(V_LOG).linear_segment().1, 0.125, epsilon = 1e-5);
        assert_abs_diff_eq!(CameraLog::new(S_LOG3).linear_segment().1, 95.0 / 1023.0, epsilon = 1e-5);
        assert_abs_diff_eq!(CameraLog::new(L_LOG).linear_segment().1, 0.09, epsilon = 1e-3);
        assert_abs_diff_eq!(CameraLog::new(LOG_C3).linear_segment().1, 0.092809, epsilon = 1e-5);
        assert_abs_diff_eq!(CameraLog::new(LOG3G10).linear_segment().1, 0.151927, epsilon = 1e-9);
    }

    #[test]
    fn segments_meet_at_break() {
        for p in ALL {
            let c = CameraLog::new(p);
            let (slope, offset) = c.linear_segment();
            let straight = slope * p.lin_side_break + offset;
            assert_abs_diff_eq!(straight, c.log_break(), epsilon = 1e-12);
            assert_abs_diff_eq!(c.encode(p.lin_side_break), c.log_break(), epsilon = 1e-12);
        }
    }

    #[test]
    fn log_c4_is_c1_continuous() {
        let c = CameraLog::new(LOG_C4);
        let b = LOG_C4.lin_side_break;
        let h = 1e-7;
        let left = (c.encode(b) - c.encode(b - h)) / h;
        let right = (c.encode(b + h) - c.encode(b)) / h;
        assert_abs_diff_eq!(left, right, epsilon = 1e-4);
    }

    #[test]
    fn roundtrip_including_negatives() {
        for p in ALL {
            let c = CameraLog::new(p);
            for &x in &[-0.005, 0.0, 1e-4, 0.01, 0.18, 1.0, 16.0] {
                assert_abs_diff_eq!(c.decode(c.encode(x)), x, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn monotonic() {
        for p in ALL {
            let c = CameraLog::new(p);
            let mut prev = c.encode(-0.01);
            for i in 1..200 {
                let y = c.encode(-0.01 + i as f64 * 0.01);
                assert!(y > prev);
                prev = y;
            }
        }
    }
}
