//! # rawlog-core
//!
//! Core types shared by every stage of the rawlog pipeline.
//!
//! - [`PixelBuffer`] - interleaved RGB `f32` samples tagged with an [`Encoding`]
//! - [`CameraMetadata`] - color metadata extracted from a RAW file
//! - [`RenderedImage`] - quantized delivery raster
//! - [`CoreError`] - construction errors
//!
//! ## Ownership
//!
//! A stage takes a [`PixelBuffer`] by value and returns a new (or the same,
//! rewritten) buffer. No stage keeps a buffer after returning it, so a run
//! needs at most one full-resolution buffer alive at a time.
//!
//! ```rust
//! use rawlog_core::{Encoding, PixelBuffer};
//!
//! let buf = PixelBuffer::new(2, 1, vec![0.18; 6], Encoding::SceneLinear("ACES2065-1")).unwrap();
//! let buf = buf.map_pixels(|[r, g, b]| [r * 2.0, g * 2.0, b * 2.0]);
//! assert_eq!(buf.pixel(1, 0), [0.36, 0.36, 0.36]);
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//! rawlog-core (this crate)
//!    ^
//!    +-- rawlog-color (pipeline stages)
//!    +-- rawlog-io (RAW decode, TIFF write)
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - Error handling
//! - [`rayon`] - Row-parallel pixel iteration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod metadata;
pub mod rendered;

pub use buffer::{CAMERA_NATIVE, Encoding, PixelBuffer};
pub use error::{CoreError, CoreResult};
pub use metadata::CameraMetadata;
pub use rendered::{BitDepth, RenderedImage};
