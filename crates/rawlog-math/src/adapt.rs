//! von Kries-style white point adaptation in XYZ.
//!
//! Each method is a cone-response matrix; adaptation scales the cone
//! responses by the ratio of the two whites.
//! The pipeline adapts camera data from D65 to the ACES white and from
//! ACES back to D65 (or D50 for ProPhoto) when leaving AP0.
//!
//! # Supported Methods
//!
//! - [`Cat::Cat02`] - From the CIECAM02 appearance model (default)
//! - [`Cat::Bradford`] - Lam (1985) sharpened cone space
//! - [`Cat::VonKries`] - Hunt-Pointer-Estevez cone response
//!
//! # Usage
//!
//! ```rust
//! use rawlog_math::{adapt_matrix, Cat, Vec3};
//!
//! let d65 = Vec3::new(0.95047, 1.0, 1.08883);
//! let d50 = Vec3::new(0.96422, 1.0, 0.82521);
//! let d65_to_d50 = adapt_matrix(Cat::Bradford, d65, d50);
//! let white = d65_to_d50 * d65;
//! assert!((white.z - d50.z).abs() < 1e-9);
//! ```

use crate::{Mat3, Vec3};

/// Bradford cone-response matrix (Lam 1985).
pub const BRADFORD: Mat3 = Mat3::from_rows([
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
]);

/// CIECAM02 cone-response matrix.
pub const CAT02: Mat3 = Mat3::from_rows([
    [0.7328, 0.4296, -0.1624],
    [-0.7036, 1.6975, 0.0061],
    [0.0030, 0.0136, 0.9834],
]);

/// Hunt-Pointer-Estevez cone-response matrix.
pub const VON_KRIES: Mat3 = Mat3::from_rows([
    [0.40024, 0.70760, -0.08081],
    [-0.22630, 1.16532, 0.04570],
    [0.00000, 0.00000, 0.91822],
]);

/// Chromatic adaptation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cat {
    /// CIECAM02 cone space.
    #[default]
    Cat02,
    /// Bradford cone space.
    Bradford,
    /// Von Kries cone space.
    VonKries,
}

impl Cat {
    /// Forward cone-space matrix.
    pub const fn matrix(self) -> Mat3 {
        match self {
            Self::Cat02 => CAT02,
            Self::Bradford => BRADFORD,
            Self::VonKries => VON_KRIES,
        }
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cat02 => "CAT02",
            Self::Bradford => "Bradford",
            Self::VonKries => "Von Kries",
        }
    }
}

/// XYZ → XYZ matrix taking `src_white` to `dst_white`.
///
/// `M⁻¹ · diag(dst_cone / src_cone) · M`, evaluated in `f64`.
pub fn adapt_matrix(method: Cat, src_white: Vec3, dst_white: Vec3) -> Mat3 {
    let cone = method.matrix();
    let gain = (cone * dst_white) / (cone * src_white);
    // published cone matrices are invertible
    let from_cone = cone.inverse().unwrap_or(Mat3::IDENTITY);
    from_cone * Mat3::diagonal(gain.x, gain.y, gain.z) * cone
}
