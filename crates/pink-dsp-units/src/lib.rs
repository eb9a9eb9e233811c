// SPDX-License-Identifier: LGPL-3.0-or-later

//! # pink-dsp-units
//!
//! Calibration signal generation and level metering.
//!
//! - **Noise**: 32-bit LCG random source, Gardner/McCartney pink noise,
//!   per-channel pink noise bank
//! - **Meters**: windowed RMS volume-level meter with jump detection
//!
//! Everything here is synchronous and allocation-free once configured.
//! Configuration errors are reported through [`Error`]; processing calls
//! never fail.
//!
//! Diagnostics go through the [`log`] facade and are only emitted on
//! configuration changes and meter findings, never per sample.

// Foundational modules
pub mod consts;
pub mod error;
pub mod units;

pub mod meters;
pub mod noise;

pub use error::{Error, Result};
