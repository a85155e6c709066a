//! Creative 3D LUT stage.
//!
//! Applies a shared [`Lut3D`] to a log buffer. The grid is read-only, so a
//! whole batch holds one `Arc<Lut3D>` across threads.

use rawlog_core::{Encoding, PixelBuffer};
use rawlog_lut::{Interpolation, Lut3D};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::{ColorError, ColorResult};

/// Output gamut of a creative LUT.
///
/// The LUT's output transfer is taken to be BT.1886 (pure 2.4 power).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LutSpace {
    /// ITU-R BT.709 primaries.
    Rec709,
    /// ITU-R BT.2020 primaries.
    Rec2020,
}

impl LutSpace {
    /// Primaries table name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Rec709 => "Rec.709",
            Self::Rec2020 => "Rec.2020",
        }
    }

    /// Parses `"Rec.709"`/`"Rec.2020"`; the dot is optional.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('.', "").as_str() {
            "rec709" | "bt709" => Some(Self::Rec709),
            "rec2020" | "bt2020" => Some(Self::Rec2020),
            _ => None,
        }
    }
}

impl fmt::Display for LutSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Applies a 3D LUT to a log-encoded buffer.
#[derive(Debug, Clone)]
pub struct LutStage {
    lut: Arc<Lut3D>,
    interpolation: Interpolation,
    space: LutSpace,
}

impl LutStage {
    /// Stage for `lut`, whose output is in `space`.
    pub fn new(lut: Arc<Lut3D>, space: LutSpace) -> Self {
        Self {
            lut,
            interpolation: Interpolation::default(),
            space,
        }
    }

    /// Sets the interpolation method.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Output gamut.
    pub fn space(&self) -> LutSpace {
        self.space
    }

    /// Interpolation method.
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Applies the LUT. Input outside the LUT domain is clamped.
    ///
    /// # Errors
    ///
    /// [`ColorError::EncodingMismatch`] unless the buffer is log-encoded.
    pub fn apply(&self, buffer: PixelBuffer) -> ColorResult<PixelBuffer> {
        if !matches!(buffer.encoding(), Encoding::Log(_)) {
            return Err(ColorError::mismatch("lut", "a log signal", buffer.encoding()));
        }
        debug!(
            size = self.lut.size(),
            interpolation = self.interpolation.strategy().name(),
            space = %self.space,
            "Applying LUT"
        );

        let lut = &*self.lut;
        let strategy = self.interpolation.strategy();
        Ok(buffer
            .map_pixels(|rgb| lut.sample(rgb, strategy))
            .retag(Encoding::Display(self.space.name())))
    }
}
