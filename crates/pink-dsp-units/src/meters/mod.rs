// SPDX-License-Identifier: LGPL-3.0-or-later

//! Audio metering utilities.
//!
//! - **VolumeLevelMeter**: windowed RMS with running overall level and
//!   high/low jump detection

pub mod volume_level;

pub use volume_level::{LevelFinding, LevelReading, VolumeLevelMeter};
