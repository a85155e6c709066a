//! # rawlog-math
//!
//! Math primitives for the rawlog color pipeline.
//!
//! - [`Mat3`] - 3x3 matrices in `f64` for color space composition
//! - [`Vec3`] - `f64` RGB / XYZ triples
//! - Chromatic adaptation transforms ([`CAT02`], [`BRADFORD`])
//! - [`simd`] - `wide`-backed batch kernels for buffer stages
//!
//! # Design
//!
//! Matrices are composed in double precision. Only the final, composed
//! matrix is narrowed to `f32` (via [`Mat3::to_glam`]) for per-pixel work,
//! so error does not compound across a chain of conversions.
//!
//! Storage is row-major and vectors are columns (`m * v`).
//!
//! # Usage
//!
//! ```rust
//! use rawlog_math::{Mat3, Vec3};
//!
//! let adobe_to_xyz = Mat3::from_rows([
//!     [0.5766690, 0.1855582, 0.1882286],
//!     [0.2973450, 0.6273636, 0.0752915],
//!     [0.0270314, 0.0706889, 0.9913375],
//! ]);
//!
//! let white = adobe_to_xyz * Vec3::ONE;
//! assert!((white.y - 1.0).abs() < 1e-6);
//! let back = adobe_to_xyz.inverse().unwrap() * white;
//! assert!((back - Vec3::ONE).max_abs() < 1e-12);
//! ```
//!
//! # Dependencies
//!
//! - [`glam`] - per-pixel `f32` application
//! - [`wide`] - portable SIMD
//!
//! # Used By
//!
//! - `rawlog-primaries` - RGB/XYZ matrix generation
//! - `rawlog-color` - matrix resolution, gamut and exposure stages

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod adapt;
mod mat3;
pub mod simd;
mod vec3;

pub use adapt::*;
pub use mat3::*;
pub use vec3::*;

/// glam types used on the per-pixel path.
pub mod glam {
    pub use ::glam::{Mat3 as GlamMat3, Vec3A};
}
