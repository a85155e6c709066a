//! Static color space table and name lookup.

use rawlog_math::{Mat3, Vec3};

use crate::{
    ACES_AP0, ACES_AP1, ADOBE_RGB, ARRI_WIDE_GAMUT_3, ARRI_WIDE_GAMUT_4, CINEMA_GAMUT, F_GAMUT,
    F_GAMUT_C, N_GAMUT, PROPHOTO_RGB, Primaries, PrimariesError, PrimariesResult, RED_WIDE_GAMUT,
    REC709, REC2020, S_GAMUT3, S_GAMUT3_CINE, V_GAMUT, rgb_to_xyz_matrix,
};

/// A resolved color space: primaries plus the RGB→XYZ matrix derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSpaceDescriptor {
    /// Canonical name.
    pub name: &'static str,
    /// Source chromaticities.
    pub primaries: Primaries,
    /// RGB→XYZ matrix, columns scaled to the white point.
    pub to_xyz: Mat3,
    /// Whether conversions out of this space adapt its white point.
    pub chromatic_adaptation: bool,
}

impl ColorSpaceDescriptor {
    /// White point as CIE xy.
    #[inline]
    pub fn white(&self) -> (f64, f64) {
        self.primaries.w
    }

    /// White point as XYZ (Y=1).
    #[inline]
    pub fn white_xyz(&self) -> Vec3 {
        self.primaries.white_xyz()
    }

    /// XYZ→RGB matrix.
    pub fn from_xyz(&self) -> PrimariesResult<Mat3> {
        self.to_xyz
            .inverse()
            .ok_or(PrimariesError::Degenerate(self.name))
    }

    /// Luminance weights (the Y row of the RGB→XYZ matrix).
    #[inline]
    pub fn luminance_weights(&self) -> Vec3 {
        self.to_xyz.row(1)
    }
}

struct Entry {
    primaries: Primaries,
    aliases: &'static [&'static str],
    adapt: bool,
}

static TABLE: &[Entry] = &[
    Entry { primaries: ACES_AP0, aliases: &["ACES AP0", "AP0", "ACES"], adapt: true },
    Entry { primaries: ACES_AP1, aliases: &["ACES AP1", "AP1"], adapt: true },
    Entry { primaries: REC709, aliases: &["sRGB", "ITU-R BT.709", "Rec709", "BT.709"], adapt: true },
    Entry { primaries: REC2020, aliases: &["ITU-R BT.2020", "Rec2020", "BT.2020"], adapt: true },
    Entry { primaries: ADOBE_RGB, aliases: &["Adobe RGB", "AdobeRGB"], adapt: true },
    Entry { primaries: PROPHOTO_RGB, aliases: &["ProPhoto", "ROMM RGB"], adapt: true },
    Entry { primaries: F_GAMUT, aliases: &[], adapt: true },
    Entry { primaries: F_GAMUT_C, aliases: &[], adapt: true },
    Entry { primaries: N_GAMUT, aliases: &[], adapt: true },
    Entry { primaries: S_GAMUT3, aliases: &[], adapt: true },
    Entry { primaries: S_GAMUT3_CINE, aliases: &[], adapt: true },
    Entry { primaries: V_GAMUT, aliases: &[], adapt: true },
    Entry { primaries: CINEMA_GAMUT, aliases: &["Canon Cinema Gamut"], adapt: true },
    Entry { primaries: ARRI_WIDE_GAMUT_3, aliases: &["AWG3", "ALEXA Wide Gamut"], adapt: true },
    Entry { primaries: ARRI_WIDE_GAMUT_4, aliases: &["AWG4"], adapt: true },
    Entry { primaries: RED_WIDE_GAMUT, aliases: &["RED Wide Gamut RGB", "RWG"], adapt: true },
];

/// Looks up a color space by canonical name or alias (case-insensitive).
///
/// Fails with [`PrimariesError::UnsupportedColorSpace`] on a miss.
pub fn lookup(name: &str) -> PrimariesResult<ColorSpaceDescriptor> {
    let needle = name.trim();
    let entry = TABLE
        .iter()
        .find(|e| {
            e.primaries.name.eq_ignore_ascii_case(needle)
                || e.aliases.iter().any(|a| a.eq_ignore_ascii_case(needle))
        })
        .ok_or_else(|| PrimariesError::UnsupportedColorSpace(name.to_string()))?;

    Ok(ColorSpaceDescriptor {
        name: entry.primaries.name,
        primaries: entry.primaries,
        to_xyz: rgb_to_xyz_matrix(&entry.primaries)?,
        chromatic_adaptation: entry.adapt,
    })
}

/// Canonical names of every table entry.
pub fn names() -> impl Iterator<Item = &'static str> {
    TABLE.iter().map(|e| e.primaries.name)
}
