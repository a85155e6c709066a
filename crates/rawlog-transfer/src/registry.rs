//! Static registry of named log spaces.
//!
//! Each [`LogCurveSpec`] pairs a user-facing log space name with the curve
//! that encodes it and the linear camera gamut the curve is defined over.
//! Some log spaces share a curve and differ only in gamut (`S-Log3.Cine`
//! is S-Log3 over S-Gamut3.Cine, `F-Log2C` is F-Log2 over F-Gamut C).

use crate::camera_log::{self, CameraLog, CameraLogParams};
use crate::{TransferError, TransferResult, canon_log, n_log};

/// Curve family and its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveFamily {
    /// OCIO `LogCameraTransform` shape.
    Camera(CameraLogParams),
    /// Nikon N-Log.
    NLog,
    /// Canon Log 2.
    CanonLog2,
    /// Canon Log 3.
    CanonLog3,
}

/// A named log space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogCurveSpec {
    /// Log space name as accepted on the command line.
    pub name: &'static str,
    /// Name of the encoding curve.
    pub curve: &'static str,
    /// Curve family and parameters.
    pub family: CurveFamily,
    /// Linear gamut the curve is applied in (a `rawlog-primaries` name).
    pub gamut: &'static str,
}

impl LogCurveSpec {
    /// Builds the codec for this curve, resolving any derived parameters.
    pub fn codec(&self) -> LogCodec {
        match self.family {
            CurveFamily::Camera(p) => LogCodec::Camera(CameraLog::new(p)),
            CurveFamily::NLog => LogCodec::NLog,
            CurveFamily::CanonLog2 => LogCodec::CanonLog2,
            CurveFamily::CanonLog3 => LogCodec::CanonLog3,
        }
    }
}

/// Resolved encode/decode pair for one curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogCodec {
    /// Camera log with resolved straight segment.
    Camera(CameraLog),
    /// Nikon N-Log.
    NLog,
    /// Canon Log 2.
    CanonLog2,
    /// Canon Log 3.
    CanonLog3,
}

impl LogCodec {
    /// Linear to log.
    #[inline]
    pub fn encode(&self, linear: f64) -> f64 {
        match self {
            Self::Camera(c) => c.encode(linear),
            Self::NLog => n_log::encode_f64(linear),
            Self::CanonLog2 => canon_log::canon_log2_encode(linear),
            Self::CanonLog3 => canon_log::canon_log3_encode(linear),
        }
    }

    /// Log to linear.
    #[inline]
    pub fn decode(&self, log: f64) -> f64 {
        match self {
            Self::Camera(c) => c.decode(log),
            Self::NLog => n_log::decode_f64(log),
            Self::CanonLog2 => canon_log::canon_log2_decode(log),
            Self::CanonLog3 => canon_log::canon_log3_decode(log),
        }
    }
}

static REGISTRY: &[LogCurveSpec] = &[
    LogCurveSpec {
        name: "F-Log",
        curve: "F-Log",
        family: CurveFamily::Camera(camera_log::F_LOG),
        gamut: "F-Gamut",
    },
    LogCurveSpec {
        name: "F-Log2",
        curve: "F-Log2",
        family: CurveFamily::Camera(camera_log::F_LOG2),
        gamut: "F-Gamut",
    },
    LogCurveSpec {
        name: "F-Log2C",
        curve: "F-Log2",
        family: CurveFamily::Camera(camera_log::F_LOG2),
        gamut: "F-Gamut C",
    },
    LogCurveSpec {
        name: "V-Log",
        curve: "V-Log",
        family: CurveFamily::Camera(camera_log::V_LOG),
        gamut: "V-Gamut",
    },
    LogCurveSpec {
        name: "N-Log",
        curve: "N-Log",
        family: CurveFamily::NLog,
        gamut: "N-Gamut",
    },
    LogCurveSpec {
        name: "L-Log",
        curve: "L-Log",
        family: CurveFamily::Camera(camera_log::L_LOG),
        gamut: "Rec.2020",
    },
    LogCurveSpec {
        name: "Canon Log 2",
        curve: "Canon Log 2",
        family: CurveFamily::CanonLog2,
        gamut: "Cinema Gamut",
    },
    LogCurveSpec {
        name: "Canon Log 3",
        curve: "Canon Log 3",
        family: CurveFamily::CanonLog3,
        gamut: "Cinema Gamut",
    },
    LogCurveSpec {
        name: "S-Log3",
        curve: "S-Log3",
        family: CurveFamily::Camera(camera_log::S_LOG3),
        gamut: "S-Gamut3",
    },
    LogCurveSpec {
        name: "S-Log3.Cine",
        curve: "S-Log3",
        family: CurveFamily::Camera(camera_log::S_LOG3),
        gamut: "S-Gamut3.Cine",
    },
    LogCurveSpec {
        name: "Arri LogC3",
        curve: "ARRI LogC3",
        family: CurveFamily::Camera(camera_log::LOG_C3),
        gamut: "ARRI Wide Gamut 3",
    },
    LogCurveSpec {
        name: "Arri LogC4",
        curve: "ARRI LogC4",
        family: CurveFamily::Camera(camera_log::LOG_C4),
        gamut: "ARRI Wide Gamut 4",
    },
    LogCurveSpec {
        name: "Log3G10",
        curve: "Log3G10",
        family: CurveFamily::Camera(camera_log::LOG3G10),
        gamut: "REDWideGamutRGB",
    },
];

/// Lowercase alphanumerics only: `"S-Log3.Cine"` and `"slog3cine"` match.
fn fold(name: &str) -> impl Iterator<Item = char> + '_ {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
}

/// Looks up a log space by name.
///
/// Matching ignores case and punctuation. A miss fails with
/// [`TransferError::UnsupportedLogSpace`].
///
/// # Example
///
/// ```rust
/// use rawlog_transfer::lookup;
///
/// let spec = lookup("f-log2").unwrap();
/// assert_eq!(spec.gamut, "F-Gamut");
/// assert!(lookup("Z-Log").is_err());
/// ```
pub fn lookup(name: &str) -> TransferResult<&'static LogCurveSpec> {
    REGISTRY
        .iter()
        .find(|spec| fold(spec.name).eq(fold(name)))
        .ok_or_else(|| TransferError::UnsupportedLogSpace(name.to_string()))
}

/// Every registered log space name, in registry order.
pub fn names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|spec| spec.name)
}
