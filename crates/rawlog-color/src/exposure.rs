//! Exposure normalization before log encoding.
//!
//! One uniform linear gain is applied to the AP0 buffer. The gain comes
//! from the first available source, in order:
//!
//! 1. a manual stops value,
//! 2. the RAW file's `BaselineExposure`,
//! 3. an automatic middle-gray estimate ([`Metering`]).
//!
//! The choice is made once per image by [`ExposureMode::select`].
//!
//! # Auto exposure
//!
//! Metering works on AP0 luminance. Pixels at or below
//! [`AUTO_BLACK_FLOOR`] or non-finite are ignored. When nothing is left
//! the gain is 1.0; auto exposure never fails. The result is clamped to
//! ±[`AUTO_STOPS_LIMIT`] stops.

use rawlog_core::{Encoding, PixelBuffer};
use rawlog_math::simd::scale_inplace;
use rayon::prelude::*;
use std::fmt;
use tracing::{debug, info};

use crate::{AP0_SPACE, ColorError, ColorResult};

/// Linear value auto exposure places the metered gray at.
pub const TARGET_MIDDLE_GRAY: f64 = 0.18;

/// Luminance at or below which a pixel is ignored by metering.
pub const AUTO_BLACK_FLOOR: f64 = 1e-6;

/// Percentile (0..1) of luminance used by highlight-safe metering.
pub const HIGHLIGHT_PERCENTILE: f64 = 0.99;

/// Linear value the highlight percentile is mapped to.
pub const HIGHLIGHT_CEILING: f64 = 1.0;

/// Largest correction auto exposure applies, in stops.
pub const AUTO_STOPS_LIMIT: f64 = 10.0;

/// Zones per axis for matrix metering.
pub const MATRIX_ZONES: usize = 4;

/// Center-weighted Gaussian sigma as a fraction of the smaller dimension.
pub const CENTER_SIGMA_FRACTION: f64 = 0.25;

/// AP0 luminance weights (the Y row of AP0 → XYZ).
pub const AP0_LUMINANCE: [f64; 3] = [0.3439664498, 0.7281660966, -0.0721325464];

/// Auto-exposure metering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metering {
    /// Geometric mean of luminance.
    Average,
    /// Geometric mean weighted toward the image center.
    CenterWeighted,
    /// Maps the 99th percentile to 1.0.
    HighlightSafe,
    /// Median of 4×4 zone geometric means.
    Matrix,
    /// Average, limited so highlights never pass the highlight-safe gain.
    #[default]
    Hybrid,
}

impl Metering {
    /// All modes, in CLI order.
    pub const ALL: [Metering; 5] = [
        Self::Average,
        Self::CenterWeighted,
        Self::HighlightSafe,
        Self::Hybrid,
        Self::Matrix,
    ];

    /// Name as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::CenterWeighted => "center-weighted",
            Self::HighlightSafe => "highlight-safe",
            Self::Matrix => "matrix",
            Self::Hybrid => "hybrid",
        }
    }

    /// Parses a mode name; `_` and `-` are interchangeable.
    pub fn from_name(name: &str) -> Option<Self> {
        let folded = name.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|m| m.name() == folded)
    }
}

impl fmt::Display for Metering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the exposure gain of one image is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExposureMode {
    /// User-supplied stops.
    Manual(f64),
    /// `BaselineExposure` stops from the RAW file.
    Metadata(f64),
    /// Estimate from the image itself.
    Auto(Metering),
}

impl ExposureMode {
    /// Picks the highest-priority available source.
    ///
    /// A non-finite metadata value is treated as absent.
    pub fn select(manual: Option<f64>, metadata: Option<f64>, metering: Metering) -> Self {
        if let Some(stops) = manual {
            return Self::Manual(stops);
        }
        match metadata {
            Some(stops) if stops.is_finite() => Self::Metadata(stops),
            _ => Self::Auto(metering),
        }
    }
}

/// Where an exposure decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureSource {
    /// User-supplied.
    Manual,
    /// RAW `BaselineExposure`.
    Metadata,
    /// Metered.
    Auto(Metering),
}

impl fmt::Display for ExposureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => f.write_str("manual"),
            Self::Metadata => f.write_str("metadata"),
            Self::Auto(m) => write!(f, "auto ({m})"),
        }
    }
}

/// The gain applied to one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureDecision {
    /// Correction in stops.
    pub stops: f64,
    /// Linear gain, `2^stops`.
    pub scale: f64,
    /// Provenance.
    pub source: ExposureSource,
}

impl ExposureDecision {
    fn from_stops(stops: f64, source: ExposureSource) -> Self {
        Self {
            stops,
            scale: stops.exp2(),
            source,
        }
    }
}

/// Applies a single linear gain to an AP0 buffer.
#[derive(Debug, Clone, Copy)]
pub struct ExposureNormalizer {
    mode: ExposureMode,
}

impl ExposureNormalizer {
    /// Normalizer for one resolved mode.
    pub fn new(mode: ExposureMode) -> Self {
        Self { mode }
    }

    /// Decides the gain for `buffer` without touching it.
    ///
    /// # Errors
    ///
    /// [`ColorError::UsageError`] for a non-finite manual value.
    pub fn decide(&self, buffer: &PixelBuffer) -> ColorResult<ExposureDecision> {
        match self.mode {
            ExposureMode::Manual(stops) => {
                if !stops.is_finite() {
                    return Err(ColorError::UsageError(format!(
                        "exposure must be a finite number of stops, got {stops}"
                    )));
                }
                Ok(ExposureDecision::from_stops(stops, ExposureSource::Manual))
            }
            ExposureMode::Metadata(stops) => {
                Ok(ExposureDecision::from_stops(stops, ExposureSource::Metadata))
            }
            ExposureMode::Auto(metering) => {
                let stops = match auto_scale(buffer, metering) {
                    Some(scale) => scale.log2().clamp(-AUTO_STOPS_LIMIT, AUTO_STOPS_LIMIT),
                    None => {
                        debug!(%metering, "No meterable pixels, keeping exposure");
                        0.0
                    }
                };
                Ok(ExposureDecision::from_stops(stops, ExposureSource::Auto(metering)))
            }
        }
    }

    /// Scales `buffer` by the decided gain.
    ///
    /// # Errors
    ///
    /// [`ColorError::EncodingMismatch`] unless the buffer is scene-linear AP0.
    pub fn apply(&self, mut buffer: PixelBuffer) -> ColorResult<(PixelBuffer, ExposureDecision)> {
        let expected = Encoding::SceneLinear(AP0_SPACE);
        if buffer.encoding() != expected {
            return Err(ColorError::mismatch("exposure", expected.to_string(), buffer.encoding()));
        }

        let decision = self.decide(&buffer)?;
        info!(
            stops = decision.stops,
            scale = decision.scale,
            source = %decision.source,
            "Exposure"
        );

        let gain = decision.scale as f32;
        buffer.par_rows_mut(|_, row| scale_inplace(row, gain));
        Ok((buffer, decision))
    }
}

/// AP0 luminance of one pixel.
#[inline]
pub fn luminance([r, g, b]: [f32; 3]) -> f64 {
    AP0_LUMINANCE[0] * r as f64 + AP0_LUMINANCE[1] * g as f64 + AP0_LUMINANCE[2] * b as f64
}

/// Luminance per pixel; `None` for pixels metering ignores.
fn meterable_luminance(buffer: &PixelBuffer) -> Vec<Option<f64>> {
    buffer
        .data()
        .par_chunks_exact(3)
        .map(|p| {
            let y = luminance([p[0], p[1], p[2]]);
            (y.is_finite() && y > AUTO_BLACK_FLOOR).then_some(y)
        })
        .collect()
}

/// The auto gain, or `None` when no pixel is meterable.
fn auto_scale(buffer: &PixelBuffer, metering: Metering) -> Option<f64> {
    let lum = meterable_luminance(buffer);
    let (w, h) = (buffer.width() as usize, buffer.height() as usize);

    match metering {
        Metering::Average => average_scale(&lum),
        Metering::CenterWeighted => center_weighted_scale(&lum, w, h),
        Metering::HighlightSafe => highlight_scale(&lum),
        Metering::Matrix => matrix_scale(&lum, w, h),
        Metering::Hybrid => {
            let avg = average_scale(&lum)?;
            Some(highlight_scale(&lum).map_or(avg, |hl| avg.min(hl)))
        }
    }
}

fn geometric_mean<'a>(values: impl Iterator<Item = &'a Option<f64>>) -> Option<f64> {
    let (sum, n) = values
        .flatten()
        .fold((0.0, 0usize), |(s, n), y| (s + y.ln(), n + 1));
    (n > 0).then(|| (sum / n as f64).exp())
}

fn average_scale(lum: &[Option<f64>]) -> Option<f64> {
    geometric_mean(lum.iter()).map(|g| TARGET_MIDDLE_GRAY / g)
}

fn center_weighted_scale(lum: &[Option<f64>], w: usize, h: usize) -> Option<f64> {
    let sigma = CENTER_SIGMA_FRACTION * w.min(h) as f64;
    let denom = 2.0 * sigma * sigma;
    let (cx, cy) = (w as f64 / 2.0, h as f64 / 2.0);

    let (sum, weight) = lum
        .iter()
        .enumerate()
        .filter_map(|(i, y)| y.map(|y| (i, y)))
        .fold((0.0, 0.0), |(s, wsum), (i, y)| {
            let dx = (i % w) as f64 + 0.5 - cx;
            let dy = (i / w) as f64 + 0.5 - cy;
            let wt = (-(dx * dx + dy * dy) / denom).exp();
            (s + wt * y.ln(), wsum + wt)
        });
    (weight > 0.0).then(|| TARGET_MIDDLE_GRAY / (sum / weight).exp())
}

fn highlight_scale(lum: &[Option<f64>]) -> Option<f64> {
    let mut valid: Vec<f64> = lum.iter().flatten().copied().collect();
    if valid.is_empty() {
        return None;
    }
    valid.sort_unstable_by(f64::total_cmp);
    // nearest-rank percentile
    let rank = (HIGHLIGHT_PERCENTILE * valid.len() as f64).ceil() as usize;
    let y = valid[rank.clamp(1, valid.len()) - 1];
    Some(HIGHLIGHT_CEILING / y)
}

fn matrix_scale(lum: &[Option<f64>], w: usize, h: usize) -> Option<f64> {
    let mut zones = vec![(0.0f64, 0usize); MATRIX_ZONES * MATRIX_ZONES];
    for (i, y) in lum.iter().enumerate() {
        let Some(y) = y else { continue };
        let zx = (i % w) * MATRIX_ZONES / w;
        let zy = (i / w) * MATRIX_ZONES / h;
        let zone = &mut zones[zy * MATRIX_ZONES + zx];
        zone.0 += y.ln();
        zone.1 += 1;
    }

    let mut means: Vec<f64> = zones
        .iter()
        .filter(|(_, n)| *n > 0)
        .map(|(s, n)| (s / *n as f64).exp())
        .collect();
    if means.is_empty() {
        return None;
    }
    means.sort_unstable_by(f64::total_cmp);
    let mid = means.len() / 2;
    let median = if means.len() % 2 == 0 {
        0.5 * (means[mid - 1] + means[mid])
    } else {
        means[mid]
    };
    Some(TARGET_MIDDLE_GRAY / median)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ap0(w: u32, h: u32, data: Vec<f32>) -> PixelBuffer {
        PixelBuffer::new(w, h, data, Encoding::SceneLinear(AP0_SPACE)).unwrap()
    }

    fn gray(w: u32, h: u32, v: f32) -> PixelBuffer {
        PixelBuffer::filled(w, h, [v; 3], Encoding::SceneLinear(AP0_SPACE)).unwrap()
    }

    #[test]
    fn test_luminance_weights_match_table() {
        let weights = rawlog_primaries::lookup(AP0_SPACE).unwrap().luminance_weights();
        assert_abs_diff_eq!(weights.x, AP0_LUMINANCE[0], epsilon = 1e-9);
        assert_abs_diff_eq!(weights.y, AP0_LUMINANCE[1], epsilon = 1e-9);
        assert_abs_diff_eq!(weights.z, AP0_LUMINANCE[2], epsilon = 1e-9);
    }

    #[test]
    fn test_select_priority() {
        let m = Metering::Hybrid;
        assert_eq!(ExposureMode::select(Some(1.0), Some(0.5), m), ExposureMode::Manual(1.0));
        assert_eq!(ExposureMode::select(None, Some(0.5), m), ExposureMode::Metadata(0.5));
        assert_eq!(ExposureMode::select(None, None, m), ExposureMode::Auto(m));
        assert_eq!(ExposureMode::select(None, Some(f64::NAN), m), ExposureMode::Auto(m));
    }

    #[test]
    fn test_manual_gain() {
        let (out, d) = ExposureNormalizer::new(ExposureMode::Manual(1.0))
            .apply(gray(3, 3, 0.1))
            .unwrap();
        assert_eq!(d.source, ExposureSource::Manual);
        assert_abs_diff_eq!(d.scale, 2.0);
        assert_abs_diff_eq!(out.pixel(2, 2)[1], 0.2, epsilon = 1e-7);
    }

    #[test]
    fn test_manual_rejects_nan() {
        let err = ExposureNormalizer::new(ExposureMode::Manual(f64::NAN))
            .decide(&gray(1, 1, 0.1))
            .unwrap_err();
        assert!(matches!(err, ColorError::UsageError(_)));
    }

    #[test]
    fn test_auto_maps_gray_to_target() {
        for metering in Metering::ALL {
            if metering == Metering::HighlightSafe {
                continue;
            }
            let (out, d) = ExposureNormalizer::new(ExposureMode::Auto(metering))
                .apply(gray(8, 6, 0.05))
                .unwrap();
            assert!(d.stops.is_finite(), "{metering}");
            for c in out.pixel(4, 3) {
                assert_abs_diff_eq!(c as f64, TARGET_MIDDLE_GRAY, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_highlight_safe_maps_percentile_to_ceiling() {
        let d = ExposureNormalizer::new(ExposureMode::Auto(Metering::HighlightSafe))
            .decide(&gray(4, 4, 0.25))
            .unwrap();
        assert_abs_diff_eq!(d.scale, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hybrid_limits_by_highlights() {
        // 98 dark pixels and two very bright ones
        let mut data = vec![0.01f32; 300];
        data[294..].copy_from_slice(&[0.9; 6]);
        let buf = ap0(10, 10, data);
        let avg = ExposureNormalizer::new(ExposureMode::Auto(Metering::Average))
            .decide(&buf)
            .unwrap();
        let hyb = ExposureNormalizer::new(ExposureMode::Auto(Metering::Hybrid))
            .decide(&buf)
            .unwrap();
        let hl = ExposureNormalizer::new(ExposureMode::Auto(Metering::HighlightSafe))
            .decide(&buf)
            .unwrap();
        assert!(avg.scale > hl.scale);
        assert_abs_diff_eq!(hyb.scale, hl.scale, epsilon = 1e-9);
    }

    #[test]
    fn test_auto_black_image_is_unity() {
        let d = ExposureNormalizer::new(ExposureMode::Auto(Metering::Hybrid))
            .decide(&gray(4, 4, 0.0))
            .unwrap();
        assert_eq!(d.stops, 0.0);
        assert_eq!(d.scale, 1.0);
    }

    #[test]
    fn test_auto_is_clamped() {
        let d = ExposureNormalizer::new(ExposureMode::Auto(Metering::Average))
            .decide(&gray(2, 2, 1e-5))
            .unwrap();
        assert_eq!(d.stops, AUTO_STOPS_LIMIT);
    }

    #[test]
    fn test_center_weighted_prefers_center() {
        // bright center pixel in a dim 5x5 frame
        let mut data = vec![0.02f32; 75];
        data[36..39].copy_from_slice(&[0.5, 0.5, 0.5]);
        let buf = ap0(5, 5, data);
        let avg = ExposureNormalizer::new(ExposureMode::Auto(Metering::Average))
            .decide(&buf)
            .unwrap();
        let cw = ExposureNormalizer::new(ExposureMode::Auto(Metering::CenterWeighted))
            .decide(&buf)
            .unwrap();
        assert!(cw.scale < avg.scale);
    }

    #[test]
    fn test_rejects_non_ap0() {
        let buf = PixelBuffer::filled(1, 1, [0.1; 3], Encoding::Log("F-Log2")).unwrap();
        let err = ExposureNormalizer::new(ExposureMode::Manual(0.0)).apply(buf).unwrap_err();
        assert!(matches!(err, ColorError::EncodingMismatch { .. }));
    }

    #[test]
    fn test_metering_names() {
        for m in Metering::ALL {
            assert_eq!(Metering::from_name(m.name()), Some(m));
        }
        assert_eq!(Metering::from_name("center_weighted"), Some(Metering::CenterWeighted));
        assert_eq!(Metering::default(), Metering::Hybrid);
    }
}
