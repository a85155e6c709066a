//! Double-precision 3×3 matrices.
//!
//! [`Mat3`] carries camera → XYZ, RGB → XYZ and adaptation matrices.
//! Rows are stored in `m[row]` and vectors are columns, so `A * B * v`
//! applies `B` first.
//!
//! Composition stays in `f64`; [`Mat3::to_glam`] narrows once for the
//! per-pixel path.

use crate::Vec3;
use std::ops::Mul;

/// Determinant magnitude below which a matrix is treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// Row-major 3×3 matrix.
///
/// ```rust
/// use rawlog_math::{Mat3, Vec3};
///
/// let gain = Mat3::diagonal(2.0, 1.0, 0.5);
/// assert_eq!(gain * Vec3::ONE, Vec3::new(2.0, 1.0, 0.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    /// `m[row][col]`.
    pub m: [[f64; 3]; 3],
}

impl Mat3 {
    /// Identity.
    pub const IDENTITY: Self = Self::diagonal(1.0, 1.0, 1.0);

    /// From rows.
    #[inline]
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { m: rows }
    }

    /// From column vectors, e.g. the XYZ of three primaries.
    pub fn from_columns(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self::from_rows([[c0.x, c1.x, c2.x], [c0.y, c1.y, c2.y], [c0.z, c1.z, c2.z]])
    }

    /// Diagonal scale.
    #[inline]
    pub const fn diagonal(d0: f64, d1: f64, d2: f64) -> Self {
        Self::from_rows([[d0, 0.0, 0.0], [0.0, d1, 0.0], [0.0, 0.0, d2]])
    }

    /// Row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> Vec3 {
        Vec3::from_array(self.m[i])
    }

    fn rows(&self) -> [Vec3; 3] {
        [self.row(0), self.row(1), self.row(2)]
    }

    /// Determinant (scalar triple product of the rows).
    pub fn determinant(&self) -> f64 {
        let [r0, r1, r2] = self.rows();
        r0.dot(r1.cross(r2))
    }

    /// Inverse, or `None` when singular or not finite.
    ///
    /// The columns of the inverse are the pairwise cross products of the
    /// rows, divided by the determinant.
    pub fn inverse(&self) -> Option<Self> {
        let [r0, r1, r2] = self.rows();
        let c0 = r1.cross(r2);
        let det = r0.dot(c0);
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return None;
        }
        Some(Self::from_columns(c0 / det, r2.cross(r0) / det, r0.cross(r1) / det))
    }

    /// Each row's sum, i.e. the image of `(1, 1, 1)`.
    #[inline]
    pub fn row_sums(&self) -> Vec3 {
        *self * Vec3::ONE
    }

    /// Divides every row by its sum so `(1, 1, 1)` maps to `(1, 1, 1)`.
    ///
    /// `None` when a row sums to (near) zero.
    pub fn normalize_rows(&self) -> Option<Self> {
        let sums = self.row_sums();
        if !sums.is_finite() || [sums.x, sums.y, sums.z].iter().any(|s| s.abs() < SINGULAR_EPSILON) {
            return None;
        }
        Some(Self::diagonal(1.0 / sums.x, 1.0 / sums.y, 1.0 / sums.z) * *self)
    }

    /// All elements finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|x| x.is_finite())
    }

    /// Largest element-wise absolute difference.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Narrows to a glam `Mat3` (column-major `f32`).
    pub fn to_glam(&self) -> glam::Mat3 {
        let [r0, r1, r2] = self.rows().map(|r| r.to_f32());
        glam::Mat3::from_cols_array_2d(&[
            [r0[0], r1[0], r2[0]],
            [r0[1], r1[1], r2[1]],
            [r0[2], r1[2], r2[2]],
        ])
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        let [r0, r1, r2] = self.rows();
        Vec3::new(r0.dot(v), r1.dot(v), r2.dot(v))
    }
}

impl Mul for Mat3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let cols = [0, 1, 2].map(|j| Vec3::new(rhs.m[0][j], rhs.m[1][j], rhs.m[2][j]));
        Self::from_columns(self * cols[0], self * cols[1], self * cols[2])
    }
}
