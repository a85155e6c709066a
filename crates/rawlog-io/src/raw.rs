//! RAW decoding to a camera-native scene-linear buffer.
//!
//! # Development
//!
//! ```text
//! sensor codes ─ (x - black) / (white - black) ─ × wb ─ crop ─ demosaic
//! ```
//!
//! The result is tagged `SceneLinear(CAMERA_NATIVE)`. The as-shot
//! multipliers are applied here and also recorded in [`CameraMetadata`],
//! so the matrix stage can undo them before applying the camera matrix.
//!
//! Nothing is clipped. Highlights pushed above 1 by the white balance
//! stay there until the delivery quantizer.
//!
//! # Example
//!
//! ```rust,ignore
//! use rawlog_io::raw::{RawDecoder, RawloaderDecoder};
//!
//! let decoded = RawloaderDecoder::new().decode("DSCF0001.RAF")?;
//! println!("{}", decoded.metadata.camera_name());
//! ```

use rawlog_core::{CAMERA_NATIVE, CameraMetadata, Encoding, PixelBuffer};
use rawlog_math::Mat3;
use rawloader::RawImageData;
use rayon::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

use crate::{IoError, IoResult};

/// File extensions treated as RAW input (lowercase, no dot).
pub const RAW_EXTENSIONS: &[&str] = &[
    "dng", "cr2", "cr3", "nef", "arw", "rw2", "raf", "orf", "pef", "srw",
];

/// Whether `path` has one of the [`RAW_EXTENSIONS`] (case-insensitive).
pub fn is_raw_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| RAW_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// A decoded RAW frame.
#[derive(Debug, Clone)]
pub struct DecodedRaw {
    /// Demosaiced, white-balanced camera RGB.
    pub buffer: PixelBuffer,
    /// Color metadata read from the container.
    pub metadata: CameraMetadata,
}

/// Trait for RAW decoders.
pub trait RawDecoder {
    /// Decodes the file at `path`.
    fn decode<P: AsRef<Path>>(&self, path: P) -> IoResult<DecodedRaw> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading RAW file");
        let data = std::fs::read(path)?;
        self.decode_from_memory(&data)
    }

    /// Decodes a RAW file held in memory.
    fn decode_from_memory(&self, data: &[u8]) -> IoResult<DecodedRaw>;
}

/// Color filter array layout.
///
/// Color indices are 0 = red, 1 = green, 2 = blue. The pattern repeats
/// with period `width × height`, so Bayer (2×2) and X-Trans (6×6) are
/// both expressible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfaPattern {
    width: usize,
    height: usize,
    colors: Vec<u8>,
}

impl CfaPattern {
    /// Builds a pattern from row-major color indices.
    ///
    /// # Errors
    ///
    /// [`IoError::UnsupportedFormat`] when the size is zero, the index
    /// count does not match, or an index is not 0, 1 or 2.
    pub fn new(width: usize, height: usize, colors: Vec<u8>) -> IoResult<Self> {
        if width == 0 || height == 0 || colors.len() != width * height {
            return Err(IoError::UnsupportedFormat(format!(
                "CFA of {width}x{height} with {} entries",
                colors.len()
            )));
        }
        if let Some(bad) = colors.iter().find(|&&c| c > 2) {
            return Err(IoError::UnsupportedFormat(format!("CFA color index {bad}")));
        }
        Ok(Self {
            width,
            height,
            colors,
        })
    }

    /// Parses a 2×2 pattern name such as `"RGGB"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let colors: Vec<u8> = name
            .chars()
            .map(|c| match c.to_ascii_uppercase() {
                'R' => Some(0),
                'G' => Some(1),
                'B' => Some(2),
                _ => None,
            })
            .collect::<Option<_>>()?;
        if colors.len() != 4 {
            return None;
        }
        Self::new(2, 2, colors).ok()
    }

    /// Color index at sensor position `(row, col)`.
    #[inline]
    pub fn color_at(&self, row: usize, col: usize) -> usize {
        self.colors[(row % self.height) * self.width + col % self.width] as usize
    }

    /// The same pattern seen from a window starting at `(top, left)`.
    pub fn offset(&self, top: usize, left: usize) -> Self {
        let colors = (0..self.height)
            .flat_map(|r| (0..self.width).map(move |c| (r, c)))
            .map(|(r, c)| self.color_at(r + top, c + left) as u8)
            .collect();
        Self {
            width: self.width,
            height: self.height,
            colors,
        }
    }

    fn from_rawloader(cfa: &rawloader::CFA) -> IoResult<Self> {
        let colors = (0..cfa.height)
            .flat_map(|r| (0..cfa.width).map(move |c| (r, c)))
            // index 3 is the second green of four-color sensors
            .map(|(r, c)| cfa.color_at(r, c).min(3) as u8)
            .map(|c| if c == 3 { 1 } else { c })
            .collect();
        Self::new(cfa.width, cfa.height, colors)
    }
}

/// Black/white levels and white-balance gains per color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Levels {
    /// Black level per color index.
    pub black: [f32; 3],
    /// White (saturation) level per color index.
    pub white: [f32; 3],
    /// Gains applied after normalization.
    pub gains: [f32; 3],
}

impl Levels {
    /// Normalizes one code value of color `c`.
    #[inline]
    pub fn apply(&self, code: f32, c: usize) -> f32 {
        (code - self.black[c]) / (self.white[c] - self.black[c]) * self.gains[c]
    }

    fn validate(&self) -> IoResult<()> {
        for c in 0..3 {
            if self.white[c] <= self.black[c] {
                return Err(IoError::DecodeError(format!(
                    "white level {} is not above black level {} for channel {c}",
                    self.white[c], self.black[c]
                )));
            }
        }
        Ok(())
    }
}

/// Visible window of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crop {
    /// First visible row.
    pub top: usize,
    /// First visible column.
    pub left: usize,
    /// Visible width.
    pub width: usize,
    /// Visible height.
    pub height: usize,
}

impl Crop {
    /// Window from rawloader's `[top, right, bottom, left]` margins.
    pub fn from_margins(width: usize, height: usize, margins: [usize; 4]) -> IoResult<Self> {
        let [top, right, bottom, left] = margins;
        let w = width.checked_sub(left + right).filter(|w| *w > 0);
        let h = height.checked_sub(top + bottom).filter(|h| *h > 0);
        match (w, h) {
            (Some(width), Some(height)) => Ok(Self {
                top,
                left,
                width,
                height,
            }),
            _ => Err(IoError::DecodeError(format!(
                "crop {margins:?} leaves nothing of {width}x{height}"
            ))),
        }
    }
}

/// Normalizes and crops a single-channel mosaic.
///
/// `samples` is the full `stride`-wide sensor readout.
pub fn normalize_mosaic(
    samples: &[f32],
    stride: usize,
    cfa: &CfaPattern,
    levels: &Levels,
    crop: Crop,
) -> Vec<f32> {
    let mut out = vec![0.0f32; crop.width * crop.height];
    out.par_chunks_mut(crop.width).enumerate().for_each(|(y, row)| {
        let sy = y + crop.top;
        let src = &samples[sy * stride + crop.left..sy * stride + crop.left + crop.width];
        for (x, (dst, &code)) in row.iter_mut().zip(src).enumerate() {
            *dst = levels.apply(code, cfa.color_at(sy, x + crop.left));
        }
    });
    out
}

/// Normalizes and crops three-sample-per-pixel data (linear DNG).
pub fn normalize_rgb(samples: &[f32], stride: usize, levels: &Levels, crop: Crop) -> Vec<f32> {
    let mut out = vec![0.0f32; crop.width * crop.height * 3];
    out.par_chunks_mut(crop.width * 3).enumerate().for_each(|(y, row)| {
        let start = ((y + crop.top) * stride + crop.left) * 3;
        let src = &samples[start..start + crop.width * 3];
        for (i, (dst, &code)) in row.iter_mut().zip(src).enumerate() {
            *dst = levels.apply(code, i % 3);
        }
    });
    out
}

/// Bilinear demosaic for any repeating CFA.
///
/// Each missing color is the mean of the same-color samples in the 3×3
/// neighborhood, widening to 5×5 when the 3×3 window has none. On a Bayer
/// sensor this is classic bilinear interpolation. Returns interleaved RGB.
pub fn demosaic_bilinear(mosaic: &[f32], width: usize, height: usize, cfa: &CfaPattern) -> Vec<f32> {
    let mut out = vec![0.0f32; width * height * 3];
    out.par_chunks_mut(width * 3).enumerate().for_each(|(y, row)| {
        for (x, px) in row.chunks_exact_mut(3).enumerate() {
            let native = cfa.color_at(y, x);
            for (c, v) in px.iter_mut().enumerate() {
                *v = if c == native {
                    mosaic[y * width + x]
                } else {
                    neighbor_mean(mosaic, width, height, cfa, x, y, c, 1)
                        .or_else(|| neighbor_mean(mosaic, width, height, cfa, x, y, c, 2))
                        .unwrap_or(0.0)
                };
            }
        }
    });
    out
}

#[allow(clippy::too_many_arguments)]
fn neighbor_mean(
    mosaic: &[f32],
    width: usize,
    height: usize,
    cfa: &CfaPattern,
    x: usize,
    y: usize,
    color: usize,
    radius: usize,
) -> Option<f32> {
    let (mut sum, mut n) = (0.0f32, 0u32);
    for ny in y.saturating_sub(radius)..(y + radius + 1).min(height) {
        for nx in x.saturating_sub(radius)..(x + radius + 1).min(width) {
            if cfa.color_at(ny, nx) == color {
                sum += mosaic[ny * width + nx];
                n += 1;
            }
        }
    }
    (n > 0).then(|| sum / n as f32)
}

/// Inverts rawloader's XYZ → camera matrix.
///
/// `None` for unknown cameras (all-zero matrix) or a non-invertible one.
fn camera_to_xyz(xyz_to_cam: &[[f32; 3]; 4]) -> Option<[[f64; 3]; 3]> {
    let rows = [0, 1, 2].map(|r| xyz_to_cam[r].map(f64::from));
    let m = Mat3::from_rows(rows);
    if !m.is_finite() || rows.iter().flatten().all(|v| *v == 0.0) {
        return None;
    }
    m.inverse().filter(Mat3::is_finite).map(|inv| inv.m)
}

/// As-shot multipliers, if every one is usable.
fn as_shot_white_balance(wb: &[f32; 4]) -> Option<[f64; 3]> {
    let rgb = [wb[0], wb[1], wb[2]].map(f64::from);
    rgb.iter().all(|v| v.is_finite() && *v > 0.0).then_some(rgb)
}

/// [`RawDecoder`] backed by `rawloader`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawloaderDecoder;

impl RawloaderDecoder {
    /// Creates the decoder.
    pub fn new() -> Self {
        Self
    }
}

impl RawDecoder for RawloaderDecoder {
    fn decode_from_memory(&self, data: &[u8]) -> IoResult<DecodedRaw> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let raw = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| IoError::DecodeError(e.to_string()))?;

        let samples: Vec<f32> = match raw.data {
            RawImageData::Integer(ref values) => values.iter().map(|&v| v as f32).collect(),
            RawImageData::Float(ref values) => values.clone(),
        };
        if samples.len() < raw.width * raw.height * raw.cpp {
            return Err(IoError::DecodeError(format!(
                "{} samples for a {}x{}x{} frame",
                samples.len(),
                raw.width,
                raw.height,
                raw.cpp
            )));
        }

        let white_balance = as_shot_white_balance(&raw.wb_coeffs);
        let gains = match white_balance {
            Some([r, g, b]) => [(r / g) as f32, 1.0, (b / g) as f32],
            None => {
                warn!(make = %raw.make, model = %raw.model, "No as-shot white balance");
                [1.0; 3]
            }
        };
        let levels = Levels {
            black: [0, 1, 2].map(|c| raw.blacklevels[c] as f32),
            white: [0, 1, 2].map(|c| raw.whitelevels[c] as f32),
            gains,
        };
        levels.validate()?;
        let crop = Crop::from_margins(raw.width, raw.height, raw.crops)?;

        let rgb = match raw.cpp {
            1 => {
                let cfa = CfaPattern::from_rawloader(&raw.cfa)?;
                debug!(
                    cfa = %raw.cfa.name,
                    width = crop.width,
                    height = crop.height,
                    "Demosaicing"
                );
                let mosaic = normalize_mosaic(&samples, raw.width, &cfa, &levels, crop);
                demosaic_bilinear(&mosaic, crop.width, crop.height, &cfa.offset(crop.top, crop.left))
            }
            3 => normalize_rgb(&samples, raw.width, &levels, crop),
            cpp => {
                return Err(IoError::UnsupportedFormat(format!(
                    "{cpp} components per pixel"
                )));
            }
        };

        let cam_to_xyz = camera_to_xyz(&raw.xyz_to_cam);
        if cam_to_xyz.is_none() {
            warn!(make = %raw.make, model = %raw.model, "No usable camera matrix");
        }
        let metadata = CameraMetadata {
            make: raw.make.clone(),
            model: raw.model.clone(),
            cam_to_xyz,
            white_balance,
            baseline_exposure: None,
        };

        let buffer = PixelBuffer::new(
            crop.width as u32,
            crop.height as u32,
            rgb,
            Encoding::SceneLinear(CAMERA_NATIVE),
        )?;
        debug!(
            camera = %metadata.camera_name(),
            width = buffer.width(),
            height = buffer.height(),
            "Decoded RAW"
        );
        Ok(DecodedRaw { buffer, metadata })
    }
}
