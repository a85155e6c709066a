//! 3-dimensional lookup table.

use crate::{Interpolator, LutError, LutResult};

/// A validated 3-dimensional lookup table.
///
/// Stores `size³` RGB triples, red fastest. Construction rejects grids that
/// cannot be sampled: fewer than 2 points per axis, a wrong entry count,
/// non-finite entries, or an empty or inverted domain.
///
/// The grid is read-only once built and is shared across threads by
/// reference (or `Arc`) for a whole batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Lut3D {
    data: Vec<[f32; 3]>,
    size: usize,
    domain_min: [f32; 3],
    domain_max: [f32; 3],
}

/// One grid cell around a sample point.
///
/// `corners[r + 2·g + 4·b]` holds the entry at offset `(r, g, b)` from the
/// cell origin, so `corners[0]` is `c000` and `corners[7]` is `c111`.
/// `frac` is the position inside the cell, each component in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// The 8 corner values.
    pub corners: [[f32; 3]; 8],
    /// Fractional position inside the cell (r, g, b).
    pub frac: [f32; 3],
}

impl Cell {
    /// Corner at offset `(r, g, b)`, each 0 or 1.
    #[inline]
    pub fn at(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        self.corners[r + 2 * g + 4 * b]
    }
}

impl Lut3D {
    /// Builds a LUT over the default `[0, 1]³` domain.
    ///
    /// `data` must hold exactly `size³` entries in red-fastest order.
    pub fn new(data: Vec<[f32; 3]>, size: usize) -> LutResult<Self> {
        if size < 2 {
            return Err(LutError::InvalidSize(format!(
                "grid needs at least 2 points per axis, got {size}"
            )));
        }
        let expected = size
            .checked_pow(3)
            .ok_or_else(|| LutError::InvalidSize(format!("grid size {size} overflows")))?;
        if data.len() != expected {
            return Err(LutError::InvalidSize(format!(
                "expected {expected} entries for size {size}, got {}",
                data.len()
            )));
        }
        if let Some(idx) = data
            .iter()
            .position(|rgb| !rgb.iter().all(|v| v.is_finite()))
        {
            return Err(LutError::NonFinite(idx));
        }

        Ok(Self {
            data,
            size,
            domain_min: [0.0; 3],
            domain_max: [1.0; 3],
        })
    }

    /// Creates an identity grid: entry `(i, j, k)` is `(i, j, k) / (size - 1)`.
    pub fn identity(size: usize) -> LutResult<Self> {
        let n = size.saturating_sub(1).max(1) as f32;
        let mut data = Vec::with_capacity(size * size * size);
        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    data.push([r as f32 / n, g as f32 / n, b as f32 / n]);
                }
            }
        }
        Self::new(data, size)
    }

    /// Sets the input domain.
    ///
    /// Each channel needs finite bounds with `max > min`.
    pub fn with_domain(mut self, min: [f32; 3], max: [f32; 3]) -> LutResult<Self> {
        for channel in 0..3 {
            let (lo, hi) = (min[channel], max[channel]);
            if !lo.is_finite() || !hi.is_finite() || hi <= lo {
                return Err(LutError::InvalidDomain {
                    channel,
                    min: lo,
                    max: hi,
                });
            }
        }
        self.domain_min = min;
        self.domain_max = max;
        Ok(self)
    }

    /// Points per axis.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Input domain minimum per channel.
    #[inline]
    pub fn domain_min(&self) -> [f32; 3] {
        self.domain_min
    }

    /// Input domain maximum per channel.
    #[inline]
    pub fn domain_max(&self) -> [f32; 3] {
        self.domain_max
    }

    /// Grid entries in red-fastest order.
    #[inline]
    pub fn data(&self) -> &[[f32; 3]] {
        &self.data
    }

    #[inline]
    fn index(&self, r: usize, g: usize, b: usize) -> usize {
        r + g * self.size + b * self.size * self.size
    }

    /// Gets the value at grid position (r, g, b).
    #[inline]
    pub fn get(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        self.data[self.index(r, g, b)]
    }

    /// Maps one channel into grid space, clamped to `[0, size - 1]`.
    ///
    /// NaN maps to the domain minimum.
    #[inline]
    pub fn grid_position(&self, value: f32, channel: usize) -> f32 {
        let n = (self.size - 1) as f32;
        let span = self.domain_max[channel] - self.domain_min[channel];
        let pos = (value - self.domain_min[channel]) * n / span;
        if pos.is_nan() { 0.0 } else { pos.clamp(0.0, n) }
    }

    /// Locates the cell containing `rgb` and gathers its corners.
    pub fn cell(&self, rgb: [f32; 3]) -> Cell {
        let last = self.size - 2;
        let mut origin = [0usize; 3];
        let mut frac = [0.0f32; 3];
        for c in 0..3 {
            let pos = self.grid_position(rgb[c], c);
            let i = (pos.floor() as usize).min(last);
            origin[c] = i;
            frac[c] = pos - i as f32;
        }

        let [r0, g0, b0] = origin;
        let mut corners = [[0.0f32; 3]; 8];
        for (k, corner) in corners.iter_mut().enumerate() {
            *corner = self.get(r0 + (k & 1), g0 + ((k >> 1) & 1), b0 + ((k >> 2) & 1));
        }
        Cell { corners, frac }
    }

    /// Samples the LUT at `rgb` with the given strategy.
    #[inline]
    pub fn sample<I: Interpolator + ?Sized>(&self, rgb: [f32; 3], interp: &I) -> [f32; 3] {
        interp.blend(&self.cell(rgb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Tetrahedral, Trilinear};

    #[test]
    fn test_identity_layout() {
        let lut = Lut3D::identity(3).unwrap();
        assert_eq!(lut.data()[1], [0.5, 0.0, 0.0]);
        assert_eq!(lut.data()[3], [0.0, 0.5, 0.0]);
        assert_eq!(lut.data()[9], [0.0, 0.0, 0.5]);
        assert_eq!(lut.get(2, 1, 0), [1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_rejects_bad_grids() {
        assert!(matches!(Lut3D::new(vec![], 0), Err(LutError::InvalidSize(_))));
        assert!(matches!(Lut3D::new(vec![[0.0; 3]], 1), Err(LutError::InvalidSize(_))));
        assert!(matches!(Lut3D::new(vec![[0.0; 3]; 7], 2), Err(LutError::InvalidSize(_))));

        let mut data = vec![[0.5; 3]; 8];
        data[5][1] = f32::NAN;
        assert!(matches!(Lut3D::new(data, 2), Err(LutError::NonFinite(5))));
    }

    #[test]
    fn test_rejects_bad_domain() {
        let lut = Lut3D::identity(2).unwrap();
        let err = lut.with_domain([0.0, 1.0, 0.0], [1.0, 1.0, 1.0]).unwrap_err();
        assert!(matches!(err, LutError::InvalidDomain { channel: 1, .. }));
    }

    #[test]
    fn test_grid_position_clamps() {
        let lut = Lut3D::identity(33).unwrap();
        assert_eq!(lut.grid_position(-0.5, 0), 0.0);
        assert_eq!(lut.grid_position(1.5, 0), 32.0);
        assert_eq!(lut.grid_position(0.5, 0), 16.0);
        assert_eq!(lut.grid_position(f32::NAN, 2), 0.0);
    }

    #[test]
    fn test_cell_at_upper_edge() {
        let lut = Lut3D::identity(5).unwrap();
        let cell = lut.cell([1.0, 1.0, 1.0]);
        assert_eq!(cell.frac, [1.0, 1.0, 1.0]);
        assert_eq!(cell.at(1, 1, 1), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_custom_domain() {
        let lut = Lut3D::identity(9)
            .unwrap()
            .with_domain([-0.5; 3], [1.5; 3])
            .unwrap();
        // 0.5 is the middle of [-0.5, 1.5]
        let out = lut.sample([0.5, 0.5, 0.5], &Trilinear);
        assert!((out[0] - 0.5).abs() < 1e-6);
        let out = lut.sample([1.5, -0.5, 0.0], &Tetrahedral);
        assert!((out[0] - 1.0).abs() < 1e-6);
        assert!(out[1].abs() < 1e-6);
        assert!((out[2] - 0.25).abs() < 1e-6);
    }
}
