//! Scene buffers passed between pipeline stages.
//!
//! # Memory Layout
//!
//! Samples are interleaved RGB, row-major, top-to-bottom:
//!
//! ```text
//! [R G B R G B R G B ...]  ← Row 0
//! [R G B R G B R G B ...]  ← Row 1
//! ```
//!
//! Every buffer carries an [`Encoding`] tag naming what its samples mean.
//! Stages check the tag on entry and retag on exit, so a log buffer can
//! never be fed to a stage that expects scene-linear light.

use crate::error::sample_count;
use crate::{CoreError, CoreResult};
use rayon::prelude::*;
use std::fmt;

/// Encoding name for white-balanced, demosaiced camera RGB before any
/// matrix has been applied.
pub const CAMERA_NATIVE: &str = "Camera Native";

/// What the samples of a [`PixelBuffer`] represent.
///
/// The payload names the color space or log curve, using the registry
/// names (`"ACES2065-1"`, `"F-Log2"`, `"Rec.709"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Linear light in the named RGB space.
    SceneLinear(&'static str),
    /// Log signal of the named log curve.
    Log(&'static str),
    /// Display-referred signal (e.g. LUT output) in the named space.
    Display(&'static str),
}

impl Encoding {
    /// The color space or log curve name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SceneLinear(n) | Self::Log(n) | Self::Display(n) => n,
        }
    }

    /// Short label for the encoding kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SceneLinear(_) => "scene-linear",
            Self::Log(_) => "log",
            Self::Display(_) => "display",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.name())
    }
}

/// Owned RGB `f32` raster with an encoding tag.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    data: Vec<f32>,
    width: u32,
    height: u32,
    encoding: Encoding,
}

impl PixelBuffer {
    /// Wraps interleaved RGB samples.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidDimensions`] for a zero-sized raster,
    /// [`CoreError::DataLength`] when `data.len() != width * height * 3`.
    pub fn new(width: u32, height: u32, data: Vec<f32>, encoding: Encoding) -> CoreResult<Self> {
        let expected = sample_count(width, height)?;
        if data.len() != expected {
            return Err(CoreError::DataLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            encoding,
        })
    }

    /// A buffer where every pixel is `rgb`.
    pub fn filled(width: u32, height: u32, rgb: [f32; 3], encoding: Encoding) -> CoreResult<Self> {
        let n = sample_count(width, height)?;
        let data = rgb.iter().copied().cycle().take(n).collect();
        Self::new(width, height, data, encoding)
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.data.len() / 3
    }

    /// Current encoding tag.
    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Interleaved samples.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Replaces the encoding tag without touching samples.
    pub fn retag(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics when the coordinate is outside the raster.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Iterates pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.data.chunks_exact(3).map(|p| [p[0], p[1], p[2]])
    }

    /// Runs `f` on each row in parallel. `f` receives the row index and
    /// the row's interleaved samples.
    pub fn par_rows_mut<F>(&mut self, f: F)
    where
        F: Fn(usize, &mut [f32]) + Sync + Send,
    {
        let row_len = self.width as usize * 3;
        self.data
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| f(y, row));
    }

    /// Rewrites every pixel through `f`, rows in parallel.
    pub fn map_pixels<F>(mut self, f: F) -> Self
    where
        F: Fn([f32; 3]) -> [f32; 3] + Sync + Send,
    {
        self.par_rows_mut(|_, row| {
            for px in row.chunks_exact_mut(3) {
                let out = f([px[0], px[1], px[2]]);
                px.copy_from_slice(&out);
            }
        });
        self
    }
}
