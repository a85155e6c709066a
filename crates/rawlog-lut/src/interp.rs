//! Interpolation strategies for 3D LUT sampling.
//!
//! Grid indexing and clamping live in [`Lut3D::cell`](crate::Lut3D::cell).
//! A strategy only blends the corners of the located [`Cell`].

use crate::Cell;

/// Blends the corners of one grid cell into an output triple.
pub trait Interpolator: Send + Sync {
    /// Short name for logs and benchmarks.
    fn name(&self) -> &'static str;

    /// Interpolates inside `cell`.
    fn blend(&self, cell: &Cell) -> [f32; 3];
}

/// Trilinear interpolation over all 8 corners.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trilinear;

impl Interpolator for Trilinear {
    fn name(&self) -> &'static str {
        "trilinear"
    }

    #[inline]
    fn blend(&self, cell: &Cell) -> [f32; 3] {
        let [rf, gf, bf] = cell.frac;
        let mut out = [0.0f32; 3];
        for (i, o) in out.iter_mut().enumerate() {
            let c00 = cell.at(0, 0, 0)[i] * (1.0 - rf) + cell.at(1, 0, 0)[i] * rf;
            let c10 = cell.at(0, 1, 0)[i] * (1.0 - rf) + cell.at(1, 1, 0)[i] * rf;
            let c01 = cell.at(0, 0, 1)[i] * (1.0 - rf) + cell.at(1, 0, 1)[i] * rf;
            let c11 = cell.at(0, 1, 1)[i] * (1.0 - rf) + cell.at(1, 1, 1)[i] * rf;

            let c0 = c00 * (1.0 - gf) + c10 * gf;
            let c1 = c01 * (1.0 - gf) + c11 * gf;

            *o = c0 * (1.0 - bf) + c1 * bf;
        }
        out
    }
}

/// Tetrahedral interpolation over the 4 corners of one of six tetrahedra.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tetrahedral;

impl Interpolator for Tetrahedral {
    fn name(&self) -> &'static str {
        "tetrahedral"
    }

    #[inline]
    fn blend(&self, cell: &Cell) -> [f32; 3] {
        let [rf, gf, bf] = cell.frac;
        let c000 = cell.at(0, 0, 0);
        let c111 = cell.at(1, 1, 1);

        // Walk from c000 to c111 along the edges in decreasing fraction order.
        let (w, a, b) = if rf > gf {
            if gf > bf {
                ([rf, gf, bf], cell.at(1, 0, 0), cell.at(1, 1, 0))
            } else if rf > bf {
                ([rf, bf, gf], cell.at(1, 0, 0), cell.at(1, 0, 1))
            } else {
                ([bf, rf, gf], cell.at(0, 0, 1), cell.at(1, 0, 1))
            }
        } else if gf > bf {
            if rf > bf {
                ([gf, rf, bf], cell.at(0, 1, 0), cell.at(1, 1, 0))
            } else {
                ([gf, bf, rf], cell.at(0, 1, 0), cell.at(0, 1, 1))
            }
        } else {
            ([bf, gf, rf], cell.at(0, 0, 1), cell.at(0, 1, 1))
        };

        let mut out = [0.0f32; 3];
        for (i, o) in out.iter_mut().enumerate() {
            *o = c000[i]
                + w[0] * (a[i] - c000[i])
                + w[1] * (b[i] - a[i])
                + w[2] * (c111[i] - b[i]);
        }
        out
    }
}

/// Interpolation method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Trilinear (8 corners).
    Trilinear,
    /// Tetrahedral (4 corners). Matches grading tools most closely.
    #[default]
    Tetrahedral,
}

impl Interpolation {
    /// The strategy for this method.
    pub fn strategy(self) -> &'static dyn Interpolator {
        match self {
            Self::Trilinear => &Trilinear,
            Self::Tetrahedral => &Tetrahedral,
        }
    }

    /// Parses `"trilinear"` or `"tetrahedral"` (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trilinear" | "linear" => Some(Self::Trilinear),
            "tetrahedral" | "tetra" => Some(Self::Tetrahedral),
            _ => None,
        }
    }
}
