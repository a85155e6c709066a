//! # rawlog-primaries
//!
//! Chromaticities of every gamut the pipeline touches, and the RGB ↔ XYZ
//! matrices derived from them.
//!
//! A space is stored only as CIE xy for its three primaries and white.
//! Matrices are computed from those, so white (1, 1, 1) always lands on
//! the declared white point.
//!
//! # Gamuts
//!
//! | Color Space | Role |
//! |-------------|------|
//! | ACES2065-1 (AP0) | Interchange hub |
//! | ACEScg (AP1) | Working space |
//! | F-Gamut, F-Gamut C, S-Gamut3, S-Gamut3.Cine, V-Gamut, N-Gamut | Camera log gamuts |
//! | Cinema Gamut, ARRI Wide Gamut 3/4, REDWideGamutRGB | Camera log gamuts |
//! | Rec.709, Rec.2020 | LUT output gamuts |
//! | Adobe RGB (1998), ProPhoto RGB | Delivery gamuts |
//!
//! # Usage
//!
//! ```rust
//! use rawlog_primaries::lookup;
//! use rawlog_math::Vec3;
//!
//! let adobe = lookup("Adobe RGB (1998)").unwrap();
//! let white = adobe.to_xyz * Vec3::ONE;
//! assert!((white.y - 1.0).abs() < 1e-12);
//!
//! assert!(lookup("Unknown Gamut").is_err());
//! ```
//!
//! # Dependencies
//!
//! - [`rawlog_math`] - matrix and vector types
//!
//! # Used By
//!
//! - `rawlog-transfer` - gamut pairing of log curves
//! - `rawlog-color` - matrix resolution and gamut transforms

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod table;

pub use error::{PrimariesError, PrimariesResult};
pub use table::{ColorSpaceDescriptor, lookup, names};

use rawlog_math::{Mat3, Vec3};

/// CIE xy chromaticities of an RGB space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primaries {
    /// Red.
    pub r: (f64, f64),
    /// Green.
    pub g: (f64, f64),
    /// Blue.
    pub b: (f64, f64),
    /// White.
    pub w: (f64, f64),
    /// Name used by [`lookup`].
    pub name: &'static str,
}

impl Primaries {
    /// White in XYZ, `Y = 1`.
    #[inline]
    pub fn white_xyz(&self) -> Vec3 {
        let (x, y) = self.w;
        xy_to_xyz(x, y)
    }

    fn primaries_xyz(&self) -> [Vec3; 3] {
        [self.r, self.g, self.b].map(|(x, y)| xy_to_xyz(x, y))
    }
}

/// D65 white point chromaticity.
pub const D65_XY: (f64, f64) = (0.3127, 0.3290);

/// D50 white point chromaticity.
pub const D50_XY: (f64, f64) = (0.3457, 0.3585);

/// ACES white point chromaticity (close to, but not exactly, D60).
pub const ACES_XY: (f64, f64) = (0.32168, 0.33767);

/// ACES AP0 primaries.
pub const ACES_AP0: Primaries = Primaries {
    r: (0.7347, 0.2653),
    g: (0.0000, 1.0000),
    b: (0.0001, -0.0770),
    w: ACES_XY,
    name: "ACES2065-1",
};

/// ACES AP1 primaries.
pub const ACES_AP1: Primaries = Primaries {
    r: (0.7130, 0.2930),
    g: (0.1650, 0.8300),
    b: (0.1280, 0.0440),
    w: ACES_XY,
    name: "ACEScg",
};

/// Rec.709 / sRGB primaries.
pub const REC709: Primaries = Primaries {
    r: (0.6400, 0.3300),
    g: (0.3000, 0.6000),
    b: (0.1500, 0.0600),
    w: D65_XY,
    name: "Rec.709",
};

/// Rec.2020 primaries.
pub const REC2020: Primaries = Primaries {
    r: (0.7080, 0.2920),
    g: (0.1700, 0.7970),
    b: (0.1310, 0.0460),
    w: D65_XY,
    name: "Rec.2020",
};

/// Adobe RGB (1998) primaries.
pub const ADOBE_RGB: Primaries = Primaries {
    r: (0.6400, 0.3300),
    g: (0.2100, 0.7100),
    b: (0.1500, 0.0600),
    w: D65_XY,
    name: "Adobe RGB (1998)",
};

/// ProPhoto RGB (ROMM), D50 white.
pub const PROPHOTO_RGB: Primaries = Primaries {
    r: (0.7347, 0.2653),
    g: (0.1596, 0.8404),
    b: (0.0366, 0.0001),
    w: D50_XY,
    name: "ProPhoto RGB",
};

/// Fujifilm F-Gamut (Rec.2020 primaries).
pub const F_GAMUT: Primaries = Primaries {
    name: "F-Gamut",
    ..REC2020
};

/// Fujifilm F-Gamut C, paired with F-Log2 C.
pub const F_GAMUT_C: Primaries = Primaries {
    r: (0.7347, 0.2653),
    g: (0.0263, 0.9737),
    b: (0.1173, -0.0224),
    w: D65_XY,
    name: "F-Gamut C",
};

/// Nikon N-Gamut (Rec.2020 primaries).
pub const N_GAMUT: Primaries = Primaries {
    name: "N-Gamut",
    ..REC2020
};

/// Sony S-Gamut3.
pub const S_GAMUT3: Primaries = Primaries {
    r: (0.7300, 0.2800),
    g: (0.1400, 0.8550),
    b: (0.1000, -0.0500),
    w: D65_XY,
    name: "S-Gamut3",
};

/// Sony S-Gamut3.Cine.
pub const S_GAMUT3_CINE: Primaries = Primaries {
    r: (0.7660, 0.2750),
    g: (0.2250, 0.8000),
    b: (0.0890, -0.0870),
    w: D65_XY,
    name: "S-Gamut3.Cine",
};

/// Panasonic V-Gamut.
pub const V_GAMUT: Primaries = Primaries {
    r: (0.7300, 0.2800),
    g: (0.1650, 0.8400),
    b: (0.1000, -0.0300),
    w: D65_XY,
    name: "V-Gamut",
};

/// Canon Cinema Gamut.
pub const CINEMA_GAMUT: Primaries = Primaries {
    r: (0.7400, 0.2700),
    g: (0.1700, 1.1400),
    b: (0.0800, -0.1000),
    w: D65_XY,
    name: "Cinema Gamut",
};

/// ARRI Wide Gamut 3.
pub const ARRI_WIDE_GAMUT_3: Primaries = Primaries {
    r: (0.6840, 0.3130),
    g: (0.2210, 0.8480),
    b: (0.0861, -0.1020),
    w: D65_XY,
    name: "ARRI Wide Gamut 3",
};

/// ARRI Wide Gamut 4.
pub const ARRI_WIDE_GAMUT_4: Primaries = Primaries {
    r: (0.7347, 0.2653),
    g: (0.1424, 0.8576),
    b: (0.0991, -0.0308),
    w: D65_XY,
    name: "ARRI Wide Gamut 4",
};

/// RED Wide Gamut RGB.
pub const RED_WIDE_GAMUT: Primaries = Primaries {
    r: (0.780308, 0.304253),
    g: (0.121595, 1.493994),
    b: (0.095612, -0.084589),
    w: D65_XY,
    name: "REDWideGamutRGB",
};

/// xy → XYZ at unit luminance. Zero when `y` is (near) zero.
pub fn xy_to_xyz(x: f64, y: f64) -> Vec3 {
    if y.abs() < 1e-12 {
        return Vec3::ZERO;
    }
    Vec3::new(x, y, 1.0 - x - y) / y
}

/// RGB → XYZ.
///
/// Columns are the XYZ of each primary scaled so `(1, 1, 1)` lands on the
/// white point: `S = M⁻¹ · W`.
///
/// Fails with [`PrimariesError::Degenerate`] when the primaries are collinear.
pub fn rgb_to_xyz_matrix(primaries: &Primaries) -> PrimariesResult<Mat3> {
    let [r, g, b] = primaries.primaries_xyz();
    let s = Mat3::from_columns(r, g, b)
        .inverse()
        .ok_or(PrimariesError::Degenerate(primaries.name))?
        * primaries.white_xyz();
    Ok(Mat3::from_columns(r * s.x, g * s.y, b * s.z))
}

/// XYZ → RGB, the inverse of [`rgb_to_xyz_matrix`].
pub fn xyz_to_rgb_matrix(primaries: &Primaries) -> PrimariesResult<Mat3> {
    rgb_to_xyz_matrix(primaries)?
        .inverse()
        .ok_or(PrimariesError::Degenerate(primaries.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ap0_matches_published() {
        // SMPTE ST 2065-1
        let published = Mat3::from_rows([
            [0.9525523959, 0.0000000000, 0.0000936786],
            [0.3439664498, 0.7281660966, -0.0721325464],
            [0.0000000000, 0.0000000000, 1.0088251844],
        ]);
        let m = rgb_to_xyz_matrix(&ACES_AP0).unwrap();
        assert!(m.max_abs_diff(&published) < 1e-9);
    }

    #[test]
    fn test_adobe_rgb_matrix() {
        let m = rgb_to_xyz_matrix(&ADOBE_RGB).unwrap();
        assert!((m.m[0][0] - 0.5766690429).abs() < 1e-9);
        assert!((m.m[1][1] - 0.6273635663).abs() < 1e-9);
        assert!((m.m[2][2] - 0.9913375368).abs() < 1e-9);
    }

    #[test]
    fn test_xyz_roundtrip() {
        let to = rgb_to_xyz_matrix(&S_GAMUT3_CINE).unwrap();
        let from = xyz_to_rgb_matrix(&S_GAMUT3_CINE).unwrap();
        assert!((from * to).max_abs_diff(&Mat3::IDENTITY) < 1e-12);
    }

    #[test]
    fn test_degenerate_primaries() {
        let line = Primaries {
            r: (0.1, 0.1),
            g: (0.2, 0.2),
            b: (0.3, 0.3),
            w: D65_XY,
            name: "line",
        };
        assert!(matches!(
            rgb_to_xyz_matrix(&line),
            Err(PrimariesError::Degenerate("line"))
        ));
    }
}
