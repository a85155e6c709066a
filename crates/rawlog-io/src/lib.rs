//! # rawlog-io
//!
//! File boundaries of the rawlog pipeline.
//!
//! - [`raw`] - RAW decoding through [`rawloader`] into a camera-native
//!   [`PixelBuffer`](rawlog_core::PixelBuffer) plus [`CameraMetadata`](rawlog_core::CameraMetadata)
//! - [`tiff`] - RGB8/RGB16 TIFF output of a [`RenderedImage`](rawlog_core::RenderedImage)
//! - [`jpeg`] - 8-bit JPEG output
//! - [`output`] - format selection by extension ([`OutputFormat`], [`write`])
//! - [`icc`] - embedded ICC profiles for display-referred output
//!
//! # Usage
//!
//! ```rust,ignore
//! use rawlog_io::raw::{RawDecoder, RawloaderDecoder};
//!
//! let decoded = RawloaderDecoder::new().decode("input.nef")?;
//! let output = pipeline.run(decoded.buffer, &decoded.metadata, &cancel)?;
//! rawlog_io::write("output.tif", &output.image)?;
//! ```
//!
//! # Dependencies
//!
//! - [`rawloader`] - RAW container parsing and sensor readout
//! - `tiff` - TIFF encoding
//! - `jpeg-encoder` - JPEG encoding
//! - `lcms2` - ICC profile generation
//! - [`tempfile`] - write-then-rename output
//! - [`rayon`] - Row-parallel development
//!
//! # Used By
//!
//! - `rawlog-cli` - the `rawlog` binary

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod icc;
pub mod jpeg;
pub mod output;
pub mod raw;
pub mod tiff;

pub use error::{IoError, IoResult};
pub use output::{OutputFormat, write};
pub use raw::{DecodedRaw, RAW_EXTENSIONS, RawDecoder, RawloaderDecoder, is_raw_path};
