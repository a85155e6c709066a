//! ICC profiles embedded in delivery files.
//!
//! Only display-referred delivery spaces get a profile. Log and LUT
//! masters carry their encoding name in text tags and nothing else.

use lcms2::{CIExyY, CIExyYTRIPLE, Profile, ToneCurve};
use rawlog_primaries::{ADOBE_RGB, Primaries};
use rawlog_transfer::gamma::ADOBE_RGB_GAMMA;

use crate::{IoError, IoResult};

/// ICC bytes for the color encoding named `profile`, or `None` when the
/// encoding has no matrix/TRC profile (camera log signals).
pub fn profile_for(profile: &str) -> IoResult<Option<Vec<u8>>> {
    if profile == ADOBE_RGB.name {
        matrix_trc(&ADOBE_RGB, ADOBE_RGB_GAMMA).map(Some)
    } else {
        Ok(None)
    }
}

/// Matrix/TRC RGB profile with a pure power curve on every channel.
fn matrix_trc(primaries: &Primaries, gamma: f64) -> IoResult<Vec<u8>> {
    let xy = |(x, y): (f64, f64)| CIExyY { x, y, Y: 1.0 };
    let triple = CIExyYTRIPLE {
        Red: xy(primaries.r),
        Green: xy(primaries.g),
        Blue: xy(primaries.b),
    };
    let curve = ToneCurve::new(gamma);

    Profile::new_rgb(&xy(primaries.w), &triple, &[&curve, &curve, &curve])
        .and_then(|profile| profile.icc())
        .map_err(|e| IoError::EncodeError(format!("ICC profile for {}: {e}", primaries.name)))
}
