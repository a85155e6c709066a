//! Error types for pipeline stages.
//!
//! Every stage fails fast with a [`ColorError`]. The pipeline wraps a stage
//! failure in [`ColorError::Stage`] so the caller learns which stage broke;
//! [`ColorError::root`] peels the wrapper off again.

use rawlog_core::{CoreError, Encoding};
use rawlog_lut::LutError;
use rawlog_primaries::PrimariesError;
use rawlog_transfer::TransferError;
use std::fmt;
use thiserror::Error;

/// Pipeline stage identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Camera-native → AP0 matrix resolution and application.
    CameraToAces,
    /// Exposure normalization in AP0.
    Exposure,
    /// AP0 → camera log gamut.
    AcesToCamera,
    /// Linear → log encoding.
    LogEncode,
    /// Creative 3D LUT.
    Lut,
    /// Delivery conversion and quantization.
    Render,
}

impl PipelineStage {
    /// Stage name for messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::CameraToAces => "camera-to-aces",
            Self::Exposure => "exposure",
            Self::AcesToCamera => "aces-to-camera",
            Self::LogEncode => "log-encode",
            Self::Lut => "lut",
            Self::Render => "render",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Color pipeline error.
#[derive(Debug, Error)]
pub enum ColorError {
    /// The camera matrix or white balance is absent or unusable.
    #[error("missing color metadata: {0}")]
    MissingColorMetadata(String),

    /// Log space name is not in the registry.
    #[error("unsupported log space: {0}")]
    UnsupportedLogSpace(String),

    /// Color space name is not in the primaries table, or its primaries
    /// are degenerate.
    #[error("unsupported color space: {0}")]
    UnsupportedColorSpace(String),

    /// LUT grid failed validation or could not be loaded.
    #[error("LUT domain error: {0}")]
    LutDomainError(#[from] LutError),

    /// Invalid combination of options.
    #[error("usage error: {0}")]
    UsageError(String),

    /// A buffer reached a stage in the wrong encoding.
    #[error("{stage} expects {expected}, got {found}")]
    EncodingMismatch {
        /// Stage that rejected the buffer
        stage: &'static str,
        /// What the stage accepts
        expected: String,
        /// Tag the buffer carried
        found: Encoding,
    },

    /// The run was cancelled before `stage` started.
    #[error("cancelled before {stage}")]
    Cancelled {
        /// Stage that did not run
        stage: PipelineStage,
    },

    /// Buffer construction failed.
    #[error("buffer error: {0}")]
    Buffer(#[from] CoreError),

    /// A failure inside a named stage.
    #[error("{stage} stage failed: {source}")]
    Stage {
        /// Offending stage
        stage: PipelineStage,
        /// Underlying failure
        #[source]
        source: Box<ColorError>,
    },
}

impl ColorError {
    /// The underlying condition with every [`Stage`](Self::Stage) wrapper removed.
    pub fn root(&self) -> &ColorError {
        let mut err = self;
        while let Self::Stage { source, .. } = err {
            err = &**source;
        }
        err
    }

    /// The innermost stage named by a wrapper or cancellation, if any.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::Stage { stage, source } => source.stage().or(Some(*stage)),
            Self::Cancelled { stage } => Some(*stage),
            _ => None,
        }
    }

    /// Wraps `self` with the stage it happened in. Cancellations and
    /// already-wrapped errors pass through unchanged.
    pub fn in_stage(self, stage: PipelineStage) -> Self {
        match self {
            Self::Stage { .. } | Self::Cancelled { .. } => self,
            other => Self::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    pub(crate) fn mismatch(stage: &'static str, expected: impl Into<String>, found: Encoding) -> Self {
        Self::EncodingMismatch {
            stage,
            expected: expected.into(),
            found,
        }
    }
}

impl From<PrimariesError> for ColorError {
    fn from(err: PrimariesError) -> Self {
        match err {
            PrimariesError::UnsupportedColorSpace(name) => Self::UnsupportedColorSpace(name),
            PrimariesError::Degenerate(name) => {
                Self::UnsupportedColorSpace(format!("{name} (degenerate primaries)"))
            }
        }
    }
}

impl From<TransferError> for ColorError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::UnsupportedLogSpace(name) => Self::UnsupportedLogSpace(name),
        }
    }
}

/// Result type for color operations.
pub type ColorResult<T> = Result<T, ColorError>;

/// Attaches a [`PipelineStage`] to the error of a `Result`.
pub trait StageContext<T> {
    /// Wraps an error with `stage`.
    fn stage(self, stage: PipelineStage) -> ColorResult<T>;
}

impl<T> StageContext<T> for ColorResult<T> {
    fn stage(self, stage: PipelineStage) -> ColorResult<T> {
        self.map_err(|e| e.in_stage(stage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_and_stage() {
        let err = ColorError::MissingColorMetadata("no matrix".into()).in_stage(PipelineStage::CameraToAces);
        assert!(matches!(err.root(), ColorError::MissingColorMetadata(_)));
        assert_eq!(err.stage(), Some(PipelineStage::CameraToAces));
        assert!(err.to_string().contains("camera-to-aces"));
    }

    #[test]
    fn test_wrapping_is_idempotent() {
        let err = ColorError::UsageError("x".into())
            .in_stage(PipelineStage::Lut)
            .in_stage(PipelineStage::Render);
        assert_eq!(err.stage(), Some(PipelineStage::Lut));

        let cancelled = ColorError::Cancelled { stage: PipelineStage::Exposure }.in_stage(PipelineStage::Lut);
        assert!(matches!(cancelled, ColorError::Cancelled { stage: PipelineStage::Exposure }));
    }

    #[test]
    fn test_conversions() {
        let err: ColorError = TransferError::UnsupportedLogSpace("D-Log".into()).into();
        assert!(matches!(err, ColorError::UnsupportedLogSpace(ref n) if n == "D-Log"));
        let err: ColorError = PrimariesError::UnsupportedColorSpace("P3".into()).into();
        assert!(matches!(err, ColorError::UnsupportedColorSpace(_)));
    }
}
