//! # rawlog-transfer
//!
//! Transfer functions between scene-linear light and encoded signals.
//!
//! # Log Spaces
//!
//! | Log space | Curve | Gamut |
//! |-----------|-------|-------|
//! | F-Log / F-Log2 | [`camera_log`] | F-Gamut |
//! | F-Log2C | F-Log2 | F-Gamut C |
//! | V-Log | [`camera_log`] | V-Gamut |
//! | N-Log | [`n_log`] | N-Gamut |
//! | L-Log | [`camera_log`] | ITU-R BT.2020 |
//! | Canon Log 2 / 3 | [`canon_log`] | Cinema Gamut |
//! | S-Log3 / S-Log3.Cine | [`camera_log`] | S-Gamut3 / S-Gamut3.Cine |
//! | Arri LogC3 / LogC4 | [`camera_log`] | ARRI Wide Gamut 3 / 4 |
//! | Log3G10 | [`camera_log`] | REDWideGamutRGB |
//!
//! All curves are evaluated in `f64`. Decode is the exact inverse of encode.
//!
//! # Delivery
//!
//! [`gamma`] holds the Adobe RGB (1998) encoding and the BT.1886 decode
//! used to linearize display-referred LUT output.
//!
//! # Usage
//!
//! ```rust
//! use rawlog_transfer::lookup;
//!
//! let codec = lookup("S-Log3").unwrap().codec();
//! let mid = codec.encode(0.18);
//! assert!((mid - 420.0 / 1023.0).abs() < 1e-9);
//! assert!((codec.decode(mid) - 0.18).abs() < 1e-12);
//! ```
//!
//! # Used By
//!
//! - `rawlog-color` - log encode stage and output decode

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod camera_log;
pub mod canon_log;
mod error;
pub mod gamma;
pub mod n_log;
mod registry;

pub use error::{TransferError, TransferResult};
pub use registry::{CurveFamily, LogCodec, LogCurveSpec, lookup, names};
