//! # rawlog-lut
//!
//! 3D Look-Up Tables for creative grading of log-encoded footage.
//!
//! - [`Lut3D`] - validated N×N×N grid with a per-channel input domain
//! - [`Interpolator`] - blending strategy over one grid cell
//! - [`cube`] - Adobe/Resolve `.cube` reading and writing
//!
//! # Grid order
//!
//! Entries are stored in `.cube` traversal order: red varies fastest,
//! then green, then blue. Index `(r, g, b)` lives at `r + g·N + b·N²`.
//!
//! # Domain policy
//!
//! Input is mapped into grid space with `(v - min) · (N - 1) / (max - min)`
//! and clamped to `[0, N - 1]`. Values outside the domain are clamped,
//! never wrapped or extrapolated.
//!
//! # Usage
//!
//! ```rust
//! use rawlog_lut::{Lut3D, Tetrahedral};
//!
//! let lut = Lut3D::identity(17).unwrap();
//! let out = lut.sample([0.25, 0.5, 0.75], &Tetrahedral);
//! assert!((out[1] - 0.5).abs() < 1e-6);
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - Error handling
//!
//! # Used By
//!
//! - `rawlog-color` - LUT stage
//! - `rawlog-cli` - `.cube` loading

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cube;
mod error;
mod interp;
mod lut3d;

pub use cube::{read_3d as read_cube, write_3d as write_cube};
pub use error::{LutError, LutResult};
pub use interp::{Interpolation, Interpolator, Tetrahedral, Trilinear};
pub use lut3d::{Cell, Lut3D};
