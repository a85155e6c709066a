//! Log encode/decode stage.
//!
//! Wraps a registry [`LogCurveSpec`] and runs its codec over a buffer.
//! Samples are widened to `f64` per pixel, so encode followed by decode
//! only loses the final `f32` rounding.

use rawlog_core::{Encoding, PixelBuffer};
use rawlog_transfer::{LogCodec, LogCurveSpec};

use crate::{ColorError, ColorResult};

/// Direction of a log stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Linear → log.
    Encode,
    /// Log → linear.
    Decode,
}

/// A buffer stage for one log space.
#[derive(Debug, Clone, Copy)]
pub struct LogStage {
    spec: &'static LogCurveSpec,
    codec: LogCodec,
}

impl LogStage {
    /// Looks up `name` in the log space registry.
    ///
    /// # Errors
    ///
    /// [`ColorError::UnsupportedLogSpace`] for an unknown name.
    pub fn new(name: &str) -> ColorResult<Self> {
        Ok(Self::from_spec(rawlog_transfer::lookup(name)?))
    }

    /// Stage for a registry entry.
    pub fn from_spec(spec: &'static LogCurveSpec) -> Self {
        Self {
            spec,
            codec: spec.codec(),
        }
    }

    /// The registry entry.
    pub fn spec(&self) -> &'static LogCurveSpec {
        self.spec
    }

    /// Log space name.
    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    /// Linear gamut the curve is defined over.
    pub fn gamut(&self) -> &'static str {
        self.spec.gamut
    }

    /// Encodes one linear value.
    #[inline]
    pub fn encode_value(&self, linear: f32) -> f32 {
        self.codec.encode(linear as f64) as f32
    }

    /// Runs the stage in `direction`.
    ///
    /// Encoding expects `SceneLinear(gamut)` and yields `Log(name)`;
    /// decoding is the reverse.
    ///
    /// # Errors
    ///
    /// [`ColorError::EncodingMismatch`] when the buffer carries any other tag.
    pub fn apply(&self, mut buffer: PixelBuffer, direction: Direction) -> ColorResult<PixelBuffer> {
        let (expected, output, stage) = match direction {
            Direction::Encode => (
                Encoding::SceneLinear(self.spec.gamut),
                Encoding::Log(self.spec.name),
                "log encode",
            ),
            Direction::Decode => (
                Encoding::Log(self.spec.name),
                Encoding::SceneLinear(self.spec.gamut),
                "log decode",
            ),
        };
        if buffer.encoding() != expected {
            return Err(ColorError::mismatch(stage, expected.to_string(), buffer.encoding()));
        }

        let codec = self.codec;
        buffer.par_rows_mut(|_, row| match direction {
            Direction::Encode => row.iter_mut().for_each(|v| *v = codec.encode(*v as f64) as f32),
            Direction::Decode => row.iter_mut().for_each(|v| *v = codec.decode(*v as f64) as f32),
        });
        Ok(buffer.retag(output))
    }

    /// Shorthand for [`apply`](Self::apply) with [`Direction::Encode`].
    pub fn encode(&self, buffer: PixelBuffer) -> ColorResult<PixelBuffer> {
        self.apply(buffer, Direction::Encode)
    }

    /// Shorthand for [`apply`](Self::apply) with [`Direction::Decode`].
    pub fn decode(&self, buffer: PixelBuffer) -> ColorResult<PixelBuffer> {
        self.apply(buffer, Direction::Decode)
    }
}
