// SPDX-License-Identifier: LGPL-3.0-or-later

//! Pink noise generator (Gardner method with McCartney's tree update).
//!
//! The output is the sum of `num_rows` random "rows" plus one fresh white
//! noise value. Row `i` is redrawn once every `2^(i+1)` samples, which
//! stacks octaves of white noise into a 1/f spectrum.
//!
//! # Algorithm
//!
//! A wrapping counter is incremented on every sample. Its trailing-zero
//! count selects the single row to redraw:
//!
//! ```text
//! index:  1 2 3 4 5 6 7 8 9 ...
//! row 0:  x   x   x   x   x
//! row 1:    x       x
//! row 2:        x
//! row 3:                x
//! ```
//!
//! When the counter wraps to zero no row is touched. The sum of all rows is
//! kept incrementally, so each sample costs one row update and two random
//! draws regardless of `num_rows`.
//!
//! # Examples
//! ```
//! use pink_dsp_units::noise::pink::PinkNoise;
//!
//! let mut pink = PinkNoise::new(12)?;
//! let sample = pink.generate_sample();
//! assert!(sample.abs() < 1.5);
//! # Ok::<(), pink_dsp_units::Error>(())
//! ```

use crate::consts::{DEFAULT_ROWS, DEFAULT_SEED, MAX_ROWS, RANDOM_BITS};
use crate::error::{Error, Result};
use crate::noise::lcg32::Lcg32;

/// Row refreshed when the counter holds `index`, or `None` for zero.
#[inline]
pub fn row_for_index(index: u32) -> Option<usize> {
    if index == 0 {
        None
    } else {
        Some(index.trailing_zeros() as usize)
    }
}

fn validate_rows(num_rows: usize) -> Result<()> {
    if num_rows == 0 || num_rows > MAX_ROWS {
        return Err(Error::invalid_argument(
            "num_rows",
            num_rows as i64,
            "must be in 1..=30",
        ));
    }
    Ok(())
}

/// Streaming pink noise generator.
///
/// Each call to [`generate_sample`](Self::generate_sample) mutates the
/// generator, so one instance serves one channel. Use
/// [`PinkNoiseBank`](crate::noise::PinkNoiseBank) for several channels.
#[derive(Debug, Clone)]
pub struct PinkNoise {
    rows: Vec<i32>,
    running_sum: i32,
    index: u32,
    index_mask: u32,
    scale: f32,
    amplitude: f32,
    rng: Lcg32,
}

impl Default for PinkNoise {
    fn default() -> Self {
        Self::with_seed(DEFAULT_ROWS, DEFAULT_SEED).expect("default row count is valid")
    }
}

impl PinkNoise {
    /// Create a generator with `num_rows` rows and the default seed.
    pub fn new(num_rows: usize) -> Result<Self> {
        Self::with_seed(num_rows, DEFAULT_SEED)
    }

    /// Create a generator with `num_rows` rows and an explicit seed.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] unless `1 <= num_rows <= 30`.
    pub fn with_seed(num_rows: usize, seed: u32) -> Result<Self> {
        let mut pink = Self {
            rows: Vec::new(),
            running_sum: 0,
            index: 0,
            index_mask: 0,
            scale: 0.0,
            amplitude: 1.0,
            rng: Lcg32::with_seed(seed),
        };
        pink.initialize(num_rows)?;
        Ok(pink)
    }

    /// Set up the generator for `num_rows` rows.
    ///
    /// Clears all rows, the running sum and the counter, and recomputes the
    /// output scale. The random source keeps its position; call
    /// [`set_seed`](Self::set_seed) to restart it. On error the generator
    /// is left unchanged.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] unless `1 <= num_rows <= 30`.
    pub fn initialize(&mut self, num_rows: usize) -> Result<()> {
        validate_rows(num_rows)?;

        self.index = 0;
        self.index_mask = (1u32 << num_rows) - 1;
        self.rows.clear();
        self.rows.resize(num_rows, 0);
        self.running_sum = 0;

        // Largest signed magnitude: every row plus the white term at full scale.
        let pmax = (num_rows as i32 + 1) * (1i32 << (RANDOM_BITS - 1));
        self.scale = 1.0 / pmax as f32;

        log::debug!(
            "pink noise initialized: rows={num_rows} mask={:#x} scale={:e}",
            self.index_mask,
            self.scale
        );
        Ok(())
    }

    /// Clear rows, sum and counter, keeping the row count and seed position.
    pub fn reset(&mut self) {
        self.index = 0;
        self.rows.fill(0);
        self.running_sum = 0;
    }

    /// Produce one sample, nominally in `[-1.0, 1.0)`.
    ///
    /// The bound is statistical: the output is never clamped.
    #[inline]
    pub fn generate_sample(&mut self) -> f32 {
        self.index = (self.index + 1) & self.index_mask;

        if let Some(row) = row_for_index(self.index) {
            // Only one row changes; adjust the sum by its delta.
            self.running_sum -= self.rows[row];
            let new_random = self.rng.next_signed();
            self.running_sum += new_random;
            self.rows[row] = new_random;
        }

        let white = self.rng.next_signed();
        self.scale * (self.running_sum + white) as f32
    }

    /// Restart the random source from `seed`.
    pub fn set_seed(&mut self, seed: u32) {
        self.rng.set_seed(seed);
    }

    /// Current random source position.
    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    /// Set the linear gain applied by the block `process_*` methods.
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    /// Linear gain applied by the block `process_*` methods.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Current row values.
    pub fn rows(&self) -> &[i32] {
        &self.rows
    }

    /// Current counter value.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Counter wrap mask, `2^num_rows - 1`.
    pub fn index_mask(&self) -> u32 {
        self.index_mask
    }

    /// Sum of all rows.
    pub fn running_sum(&self) -> i32 {
        self.running_sum
    }

    /// Factor mapping the integer sum to the output range.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Output noise to a destination buffer, overwriting its content.
    pub fn process_overwrite(&mut self, dst: &mut [f32]) {
        for d in dst.iter_mut() {
            *d = self.generate_sample() * self.amplitude;
        }
    }

    /// Output noise to the destination buffer in additive mode.
    ///
    /// If `src` is `None`, it's treated as zeros: `dst[i] = noise[i]`.
    /// Otherwise: `dst[i] = src[i] + noise[i]`.
    pub fn process_add(&mut self, dst: &mut [f32], src: Option<&[f32]>) {
        let Some(src) = src else {
            self.process_overwrite(dst);
            return;
        };
        for (d, &s) in dst.iter_mut().zip(src.iter()) {
            *d = s + self.generate_sample() * self.amplitude;
        }
    }

    /// Output noise to the destination buffer in multiplicative mode.
    ///
    /// If `src` is `None`, it's treated as zeros: `dst[i] = 0`.
    /// Otherwise: `dst[i] = src[i] * noise[i]`.
    pub fn process_mul(&mut self, dst: &mut [f32], src: Option<&[f32]>) {
        let Some(src) = src else {
            dst.fill(0.0);
            return;
        };
        for (d, &s) in dst.iter_mut().zip(src.iter()) {
            *d = s * self.generate_sample() * self.amplitude;
        }
    }
}
