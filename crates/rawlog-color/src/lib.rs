//! # rawlog-color
//!
//! Pipeline stages that turn a demosaiced RAW buffer into a camera log
//! signal and a quantized delivery raster.
//!
//! # Stages
//!
//! | Stage | Type | Input → output |
//! |-------|------|----------------|
//! | Matrix | [`MatrixResolver`] + [`GamutTransform`] | camera RGB → AP0 |
//! | Exposure | [`ExposureNormalizer`] | AP0 → AP0 × gain |
//! | Camera gamut | [`GamutTransform`] | AP0 → log gamut |
//! | Log | [`LogStage`] | linear → log |
//! | LUT | [`LutStage`] (optional) | log → display |
//! | Render | [`OutputRenderer`] | log/display → Adobe RGB codes |
//!
//! Every stage takes a [`PixelBuffer`](rawlog_core::PixelBuffer) by value,
//! checks its [`Encoding`](rawlog_core::Encoding) tag and returns a
//! retagged buffer. [`Pipeline`] chains them.
//!
//! # Usage
//!
//! ```rust
//! use rawlog_color::{CancelToken, Pipeline};
//! use rawlog_core::{CAMERA_NATIVE, CameraMetadata, Encoding, PixelBuffer};
//!
//! let pipeline = Pipeline::builder("F-Log2").exposure(Some(0.0)).build().unwrap();
//! let meta = CameraMetadata {
//!     cam_to_xyz: Some([
//!         [0.4124564, 0.3575761, 0.1804375],
//!         [0.2126729, 0.7151522, 0.0721750],
//!         [0.0193339, 0.1191920, 0.9503041],
//!     ]),
//!     white_balance: Some([2.0, 1.0, 1.5]),
//!     ..Default::default()
//! };
//! let raw = PixelBuffer::filled(4, 4, [0.18; 3], Encoding::SceneLinear(CAMERA_NATIVE)).unwrap();
//! let out = pipeline.run(raw, &meta, &CancelToken::new()).unwrap();
//! assert_eq!(out.image.profile(), "Adobe RGB (1998)");
//! ```
//!
//! # Dependencies
//!
//! - [`rayon`] - row-parallel stages
//! - [`tracing`] - stage and decision logging
//! - [`thiserror`] - [`ColorError`]
//!
//! # Used By
//!
//! - `rawlog-cli` - single-file and batch rendering
//! - `rawlog-bench` - pipeline benchmarks

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod exposure;
pub mod gamut;
pub mod log;
pub mod lut;
pub mod matrix;
pub mod pipeline;
pub mod render;

pub use error::{ColorError, ColorResult, PipelineStage, StageContext};
pub use exposure::{ExposureDecision, ExposureMode, ExposureNormalizer, ExposureSource, Metering};
pub use gamut::GamutTransform;
pub use log::{Direction, LogStage};
pub use lut::{LutSpace, LutStage};
pub use matrix::{MatrixMethod, MatrixResolver};
pub use pipeline::{CancelToken, Pipeline, PipelineBuilder, PipelineOutput};
pub use render::{OutputRenderer, RenderTarget};

/// Interchange space every image passes through.
pub const AP0_SPACE: &str = "ACES2065-1";

pub(crate) fn aces_ap0() -> ColorResult<rawlog_primaries::ColorSpaceDescriptor> {
    Ok(rawlog_primaries::lookup(AP0_SPACE)?)
}
