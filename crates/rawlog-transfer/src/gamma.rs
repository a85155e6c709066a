//! Pure power-law transfer functions for display and delivery spaces.
//!
//! - Adobe RGB (1998): gamma 563/256 (≈ 2.19921875)
//! - BT.1886 reference EOTF: gamma 2.4, used to linearize LUT output
//!
//! Non-positive input maps to 0 in both directions.

/// Adobe RGB (1998) gamma.
pub const ADOBE_RGB_GAMMA: f64 = 563.0 / 256.0;

/// BT.1886 reference gamma.
pub const BT1886_GAMMA: f64 = 2.4;

/// EOTF for arbitrary gamma: `v^gamma`
///
/// # Example
///
/// ```rust
/// use rawlog_transfer::gamma::gamma_eotf;
///
/// assert_eq!(gamma_eotf(1.0, 2.4), 1.0);
/// assert_eq!(gamma_eotf(-0.5, 2.4), 0.0);
/// ```
#[inline]
pub fn gamma_eotf(v: f64, gamma: f64) -> f64 {
    if v <= 0.0 { 0.0 } else { v.powf(gamma) }
}

/// OETF for arbitrary gamma: `l^(1/gamma)`
#[inline]
pub fn gamma_oetf(l: f64, gamma: f64) -> f64 {
    if l <= 0.0 { 0.0 } else { l.powf(1.0 / gamma) }
}

/// Adobe RGB (1998) encode.
#[inline]
pub fn adobe_rgb_oetf(l: f64) -> f64 {
    gamma_oetf(l, ADOBE_RGB_GAMMA)
}

/// Adobe RGB (1998) decode.
#[inline]
pub fn adobe_rgb_eotf(v: f64) -> f64 {
    gamma_eotf(v, ADOBE_RGB_GAMMA)
}

/// BT.1886 decode (display signal to linear).
#[inline]
pub fn bt1886_eotf(v: f64) -> f64 {
    gamma_eotf(v, BT1886_GAMMA)
}
