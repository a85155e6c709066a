//! Linear gamut conversion between table color spaces.
//!
//! A [`GamutTransform`] is composed once in `f64`:
//!
//! ```text
//! XYZ→dst · CAT(src white → dst white) · src→XYZ
//! ```
//!
//! and applied per pixel through a narrowed `f32` copy. Values are never
//! clipped here; negatives and values above 1 pass through.

use rawlog_core::{Encoding, PixelBuffer};
use rawlog_math::glam::{GlamMat3, Vec3A};
use rawlog_math::{Cat, Mat3, Vec3, adapt_matrix};
use rawlog_primaries::ColorSpaceDescriptor;
use tracing::debug;

use crate::{ColorError, ColorResult};

/// White points closer than this (in XYZ) are treated as equal.
const WHITE_TOLERANCE: f64 = 1e-9;

/// A composed 3×3 linear conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GamutTransform {
    matrix: Mat3,
    fast: GlamMat3,
    src: &'static str,
    dst: &'static str,
}

impl GamutTransform {
    /// Composes `src → dst`.
    ///
    /// Adaptation is skipped when the white points agree or when `src`
    /// opts out of adaptation.
    pub fn between(src: &ColorSpaceDescriptor, dst: &ColorSpaceDescriptor, cat: Cat) -> ColorResult<Self> {
        let to_xyz = src.to_xyz;
        let from_xyz = dst.from_xyz()?;

        let (sw, dw) = (src.white_xyz(), dst.white_xyz());
        let same_white = (sw - dw).max_abs() < WHITE_TOLERANCE;
        let matrix = if same_white || !src.chromatic_adaptation {
            from_xyz * to_xyz
        } else {
            from_xyz * adapt_matrix(cat, sw, dw) * to_xyz
        };

        debug!(
            src = src.name,
            dst = dst.name,
            cat = cat.name(),
            adapted = !same_white,
            "Composed gamut transform"
        );
        Self::from_matrix(matrix, src.name, dst.name)
    }

    /// Composes `src → dst` from table names.
    pub fn between_names(src: &str, dst: &str, cat: Cat) -> ColorResult<Self> {
        let src = rawlog_primaries::lookup(src)?;
        let dst = rawlog_primaries::lookup(dst)?;
        Self::between(&src, &dst, cat)
    }

    /// Wraps an already-resolved matrix.
    ///
    /// # Errors
    ///
    /// [`ColorError::MissingColorMetadata`] for a non-finite matrix.
    pub fn from_matrix(matrix: Mat3, src: &'static str, dst: &'static str) -> ColorResult<Self> {
        if !matrix.is_finite() {
            return Err(ColorError::MissingColorMetadata(format!(
                "non-finite {src} → {dst} matrix"
            )));
        }
        Ok(Self {
            matrix,
            fast: matrix.to_glam(),
            src,
            dst,
        })
    }

    /// The exact `f64` matrix.
    pub fn matrix(&self) -> &Mat3 {
        &self.matrix
    }

    /// Source space name.
    pub fn src(&self) -> &'static str {
        self.src
    }

    /// Destination space name.
    pub fn dst(&self) -> &'static str {
        self.dst
    }

    /// Converts one triplet in double precision.
    #[inline]
    pub fn transform_f64(&self, v: Vec3) -> Vec3 {
        self.matrix * v
    }

    /// Converts one pixel through the `f32` matrix.
    #[inline]
    pub fn transform_pixel(&self, rgb: [f32; 3]) -> [f32; 3] {
        self.fast.mul_vec3a(Vec3A::from_array(rgb)).to_array()
    }

    /// Converts a scene-linear buffer in `src` to `dst`, rows in parallel.
    ///
    /// # Errors
    ///
    /// [`ColorError::EncodingMismatch`] unless the buffer is tagged
    /// `SceneLinear(src)`.
    pub fn apply(&self, buffer: PixelBuffer) -> ColorResult<PixelBuffer> {
        let expected = Encoding::SceneLinear(self.src);
        if buffer.encoding() != expected {
            return Err(ColorError::mismatch("gamut", expected.to_string(), buffer.encoding()));
        }
        Ok(buffer
            .map_pixels(|rgb| self.transform_pixel(rgb))
            .retag(Encoding::SceneLinear(self.dst)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_white_maps_to_white() {
        let t = GamutTransform::between_names("ACES2065-1", "Adobe RGB (1998)", Cat::Cat02).unwrap();
        let w = t.transform_f64(Vec3::ONE);
        assert_abs_diff_eq!(w.x, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(w.y, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(w.z, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_same_white_skips_adaptation() {
        let a = GamutTransform::between_names("Rec.709", "Rec.2020", Cat::Cat02).unwrap();
        let b = GamutTransform::between_names("Rec.709", "Rec.2020", Cat::Bradford).unwrap();
        assert_eq!(a.matrix(), b.matrix());
        // published BT.709 → BT.2020 first row
        assert_abs_diff_eq!(a.matrix().m[0][0], 0.6274, epsilon = 1e-4);
        assert_abs_diff_eq!(a.matrix().m[0][1], 0.3293, epsilon = 1e-4);
    }

    #[test]
    fn test_apply_retags_and_keeps_out_of_range() {
        let t = GamutTransform::between_names("ACES2065-1", "Rec.709", Cat::Cat02).unwrap();
        let buf = PixelBuffer::new(
            2,
            1,
            vec![0.0, 0.0, 1.5, -0.25, 0.5, 0.5],
            Encoding::SceneLinear("ACES2065-1"),
        )
        .unwrap();
        let out = t.apply(buf).unwrap();
        assert_eq!(out.encoding(), Encoding::SceneLinear("Rec.709"));
        // saturated AP0 blue lands outside Rec.709 and is kept
        assert!(out.pixel(0, 0).iter().any(|v| *v < 0.0 || *v > 1.0));
    }

    #[test]
    fn test_apply_rejects_wrong_space() {
        let t = GamutTransform::between_names("ACES2065-1", "Rec.709", Cat::Cat02).unwrap();
        let buf = PixelBuffer::filled(1, 1, [0.1; 3], Encoding::SceneLinear("Rec.709")).unwrap();
        assert!(matches!(t.apply(buf), Err(ColorError::EncodingMismatch { .. })));
    }

    #[test]
    fn test_from_matrix_rejects_nan() {
        let mut m = Mat3::IDENTITY;
        m.m[1][1] = f64::NAN;
        assert!(GamutTransform::from_matrix(m, "a", "b").is_err());
    }

    #[test]
    fn test_unknown_space() {
        let err = GamutTransform::between_names("DCI-P3", "Rec.709", Cat::Cat02).unwrap_err();
        assert!(matches!(err, ColorError::UnsupportedColorSpace(_)));
    }
}
