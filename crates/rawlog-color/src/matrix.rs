//! Camera-native → ACES AP0 matrix resolution.
//!
//! # Composition
//!
//! ```text
//! M = XYZ→AP0 · CAT(D65 → ACES white) · cam→XYZ · diag(1/wb)
//! ```
//!
//! `cam→XYZ` comes from the RAW metadata ([`MatrixMethod::Metadata`]) or
//! is the fixed Adobe RGB (1998) → XYZ set ([`MatrixMethod::Adobe`], which
//! acts on the white-balanced buffer directly and so skips `diag(1/wb)`).
//! Each row of `M` is then divided by its sum, pinning the white-balanced
//! neutral `(1, 1, 1)` to AP0 `(1, 1, 1)`.
//!
//! Everything is composed in `f64`.

use rawlog_core::CameraMetadata;
use rawlog_math::{Cat, Mat3, adapt_matrix};
use rawlog_primaries::{D65_XY, xy_to_xyz};
use tracing::debug;

use crate::{ColorError, ColorResult, aces_ap0};

/// Where the camera → XYZ coefficients come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixMethod {
    /// Matrix and white balance read from the RAW file.
    #[default]
    Metadata,
    /// Built-in, camera-independent Adobe RGB (1998) coefficients.
    Adobe,
}

impl MatrixMethod {
    /// Name as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Metadata => "metadata",
            Self::Adobe => "adobe",
        }
    }

    /// Parses `"metadata"` or `"adobe"` (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "metadata" => Some(Self::Metadata),
            "adobe" => Some(Self::Adobe),
            _ => None,
        }
    }
}

/// Builds the camera-native → AP0 matrix for one image.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixResolver {
    method: MatrixMethod,
    cat: Cat,
}

impl MatrixResolver {
    /// Resolver for `method` with CAT02 adaptation.
    pub fn new(method: MatrixMethod) -> Self {
        Self {
            method,
            cat: Cat::default(),
        }
    }

    /// Sets the chromatic adaptation transform.
    pub fn with_cat(mut self, cat: Cat) -> Self {
        self.cat = cat;
        self
    }

    /// Selected method.
    pub fn method(&self) -> MatrixMethod {
        self.method
    }

    /// Resolves the matrix.
    ///
    /// # Errors
    ///
    /// In `Metadata` mode, [`ColorError::MissingColorMetadata`] when the
    /// matrix or white balance is absent or unusable, or when the
    /// composition is singular or has a zero row sum. There is no fallback
    /// to the built-in coefficients.
    pub fn resolve(&self, meta: &CameraMetadata) -> ColorResult<Mat3> {
        let cam_to_xyz = match self.method {
            MatrixMethod::Metadata => metadata_cam_to_xyz(meta)?,
            MatrixMethod::Adobe => adobe_to_xyz()?,
        };

        let ap0 = aces_ap0()?;
        let xyz_to_ap0 = ap0.from_xyz()?;
        let cat = adapt_matrix(self.cat, xy_to_xyz(D65_XY.0, D65_XY.1), ap0.white_xyz());
        let composed = xyz_to_ap0 * cat * cam_to_xyz;

        if !composed.is_finite() || composed.inverse().is_none() {
            return Err(ColorError::MissingColorMetadata(
                "camera matrix composition is singular".into(),
            ));
        }
        let matrix = composed.normalize_rows().ok_or_else(|| {
            ColorError::MissingColorMetadata("camera matrix has a zero row sum".into())
        })?;

        debug!(
            method = self.method.name(),
            cat = self.cat.name(),
            camera = %meta.camera_name(),
            matrix = ?matrix.m,
            "Resolved camera-to-AP0 matrix"
        );
        Ok(matrix)
    }
}

fn metadata_cam_to_xyz(meta: &CameraMetadata) -> ColorResult<Mat3> {
    let rows = meta.cam_to_xyz.ok_or_else(|| {
        ColorError::MissingColorMetadata(format!("{} has no camera matrix", meta.camera_name()))
    })?;
    let cam_to_xyz = Mat3::from_rows(rows);
    if !cam_to_xyz.is_finite() {
        return Err(ColorError::MissingColorMetadata(
            "camera matrix has non-finite coefficients".into(),
        ));
    }
    let wb = meta.normalized_white_balance().ok_or_else(|| {
        ColorError::MissingColorMetadata(format!(
            "{} has no usable white balance ({:?})",
            meta.camera_name(),
            meta.white_balance
        ))
    })?;
    Ok(cam_to_xyz * Mat3::diagonal(1.0 / wb[0], 1.0 / wb[1], 1.0 / wb[2]))
}

fn adobe_to_xyz() -> ColorResult<Mat3> {
    Ok(rawlog_primaries::lookup("Adobe RGB (1998)")?.to_xyz)
}
