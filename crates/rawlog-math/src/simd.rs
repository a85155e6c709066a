//! SIMD batch kernels for whole-buffer stages.
//!
//! Uses the `wide` crate for portable 8-lane `f32` SIMD on stable Rust.
//! Each kernel processes 8 samples at a time with a scalar tail.
//!
//! # Example
//!
//! ```rust
//! use rawlog_math::simd::{clamp01_inplace, scale_inplace};
//!
//! let mut values = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
//! scale_inplace(&mut values, 2.0);
//! clamp01_inplace(&mut values);
//! assert_eq!(values[8], 1.0);
//! ```

use wide::f32x8;

#[inline]
fn load(chunk: &[f32]) -> f32x8 {
    let mut lanes = [0.0f32; 8];
    lanes.copy_from_slice(chunk);
    f32x8::from(lanes)
}

/// Multiplies every value by `gain` in place.
pub fn scale_inplace(values: &mut [f32], gain: f32) {
    let g = f32x8::splat(gain);
    let mut chunks = values.chunks_exact_mut(8);
    for chunk in &mut chunks {
        let out = (load(chunk) * g).to_array();
        chunk.copy_from_slice(&out);
    }
    for v in chunks.into_remainder() {
        *v *= gain;
    }
}

/// Clamps every value to `[0, 1]` in place.
pub fn clamp01_inplace(values: &mut [f32]) {
    let zero = f32x8::splat(0.0);
    let one = f32x8::splat(1.0);
    let mut chunks = values.chunks_exact_mut(8);
    for chunk in &mut chunks {
        let out = load(chunk).max(zero).min(one).to_array();
        chunk.copy_from_slice(&out);
    }
    for v in chunks.into_remainder() {
        *v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_matches_scalar() {
        let input: Vec<f32> = (0..21).map(|i| i as f32 * 0.05 - 0.2).collect();
        let mut simd = input.clone();
        scale_inplace(&mut simd, 1.75);
        for (a, b) in simd.iter().zip(&input) {
            assert_eq!(*a, b * 1.75);
        }
    }

    #[test]
    fn test_clamp() {
        let mut values = vec![-0.5, 0.0, 0.25, 1.0, 1.5, 2.0, -3.0, 0.75, 1.25, -0.1];
        clamp01_inplace(&mut values);
        assert_eq!(values, vec![0.0, 0.0, 0.25, 1.0, 1.0, 1.0, 0.0, 0.75, 1.0, 0.0]);
    }
}
