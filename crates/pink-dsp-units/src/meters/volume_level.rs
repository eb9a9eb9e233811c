// SPDX-License-Identifier: LGPL-3.0-or-later

//! Windowed RMS volume-level meter with jump detection.
//!
//! Each processed block is one window. The meter reports the window RMS,
//! the RMS of everything seen so far, and their difference. A window that
//! is much louder or quieter than the long-term level raises a
//! [`LevelFinding`].
//!
//! # Algorithm
//!
//! 1. Accumulate the window's sum of squares in `f64`, skipping NaN and
//!    infinite samples.
//! 2. Add it to the running total, so the overall level includes the
//!    current window.
//! 3. Convert both mean-square powers to dBFS, floored at
//!    [`MIN_LEVEL`](crate::consts::MIN_LEVEL).
//! 4. `delta = window_db - overall_db`; compare against the thresholds.
//!
//! # Examples
//!
//! ```
//! use pink_dsp_units::meters::volume_level::VolumeLevelMeter;
//!
//! let mut meter = VolumeLevelMeter::new();
//! let quiet = vec![0.1f32; 1024];
//! let loud = vec![1.0f32; 1024];
//! for _ in 0..10 {
//!     meter.process(&quiet);
//! }
//! let reading = meter.process(&loud).unwrap();
//! assert!(reading.finding.is_some());
//! ```

use crate::consts::{DEFAULT_HIGH_THRESHOLD_DB, DEFAULT_LOW_THRESHOLD_DB, MIN_POWER};
use crate::units::power_to_dbfs;

/// Level jump raised by a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFinding {
    /// Window is louder than the overall level by at least the high threshold.
    High,
    /// Window is quieter than the overall level by at least the low threshold.
    Low,
}

impl LevelFinding {
    /// Short lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

/// Result of metering one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelReading {
    /// Window RMS (dBFS).
    pub window_db: f32,
    /// RMS of all samples so far, including this window (dBFS).
    pub overall_db: f32,
    /// `window_db - overall_db`.
    pub delta_db: f32,
    /// Raised finding, if any.
    pub finding: Option<LevelFinding>,
}

/// Windowed RMS meter with a running overall level.
#[derive(Debug, Clone)]
pub struct VolumeLevelMeter {
    /// Delta at or above which a window is flagged [`LevelFinding::High`].
    high_threshold_db: f32,
    /// Delta at or below which a window is flagged [`LevelFinding::Low`].
    low_threshold_db: f32,
    /// Sum of squares over every sample seen.
    sum_squares: f64,
    /// Number of samples seen.
    samples_seen: u64,
    /// Most recent reading.
    last: Option<LevelReading>,
}

impl Default for VolumeLevelMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl VolumeLevelMeter {
    /// Create a meter with +6 dB / -12 dB thresholds.
    pub fn new() -> Self {
        Self {
            high_threshold_db: DEFAULT_HIGH_THRESHOLD_DB,
            low_threshold_db: DEFAULT_LOW_THRESHOLD_DB,
            sum_squares: 0.0,
            samples_seen: 0,
            last: None,
        }
    }

    /// Set the high threshold in dB (positive).
    pub fn set_high_threshold(&mut self, db: f32) -> &mut Self {
        self.high_threshold_db = db;
        self
    }

    /// Set the low threshold in dB (negative).
    pub fn set_low_threshold(&mut self, db: f32) -> &mut Self {
        self.low_threshold_db = db;
        self
    }

    /// High threshold in dB.
    pub fn high_threshold(&self) -> f32 {
        self.high_threshold_db
    }

    /// Low threshold in dB.
    pub fn low_threshold(&self) -> f32 {
        self.low_threshold_db
    }

    /// Meter one window of samples.
    ///
    /// Interleaved multichannel input is metered as a single stream.
    /// Non-finite samples are ignored. Returns `None` when the window holds
    /// no finite sample, which leaves the meter unchanged.
    pub fn process(&mut self, samples: &[f32]) -> Option<LevelReading> {
        let (window_squares, n) = samples
            .iter()
            .filter(|x| x.is_finite())
            .fold((0.0f64, 0u64), |(sum, n), &x| {
                (sum + (x as f64) * (x as f64), n + 1)
            });

        let skipped = samples.len() as u64 - n;
        if skipped > 0 {
            log::debug!("volume level: ignored {skipped} non-finite samples");
        }
        if n == 0 {
            return None;
        }

        self.sum_squares += window_squares;
        self.samples_seen += n;

        let window_db = power_to_dbfs((window_squares / n as f64) as f32);
        let overall_db = power_to_dbfs((self.sum_squares / self.samples_seen as f64) as f32);
        let delta_db = window_db - overall_db;

        let finding = if delta_db >= self.high_threshold_db {
            Some(LevelFinding::High)
        } else if delta_db <= self.low_threshold_db {
            Some(LevelFinding::Low)
        } else {
            None
        };

        if let Some(f) = finding {
            log::debug!(
                "volume level {}: window {window_db:.2} dB, overall {overall_db:.2} dB, delta {delta_db:.2} dB",
                f.as_str()
            );
        }

        let reading = LevelReading {
            window_db,
            overall_db,
            delta_db,
            finding,
        };
        self.last = Some(reading);
        Some(reading)
    }

    /// Most recent reading.
    pub fn last_reading(&self) -> Option<LevelReading> {
        self.last
    }

    /// Overall level so far in dBFS (floor value before any input).
    pub fn overall_db(&self) -> f32 {
        if self.samples_seen == 0 {
            return power_to_dbfs(MIN_POWER);
        }
        power_to_dbfs((self.sum_squares / self.samples_seen as f64) as f32)
    }

    /// Number of samples metered since creation or the last reset.
    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    /// Forget the accumulated level.
    pub fn reset(&mut self) {
        self.sum_squares = 0.0;
        self.samples_seen = 0;
        self.last = None;
    }
}
