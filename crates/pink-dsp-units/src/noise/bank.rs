// SPDX-License-Identifier: LGPL-3.0-or-later

//! Per-channel bank of independent pink noise generators.
//!
//! Speaker calibration wants uncorrelated noise on every channel, so each
//! channel owns its own [`PinkNoise`] with its own seed. Channel `c` is
//! seeded with `seed + c`.

use crate::error::{Error, Result};
use crate::noise::pink::PinkNoise;

/// Independent pink noise generators, one per channel.
///
/// # Examples
/// ```
/// use pink_dsp_units::noise::PinkNoiseBank;
///
/// let mut bank = PinkNoiseBank::new(2, 16, 1)?;
/// let mut frames = vec![0.0f32; 2 * 256];
/// bank.process_interleaved(&mut frames);
/// # Ok::<(), pink_dsp_units::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PinkNoiseBank {
    generators: Vec<PinkNoise>,
}

impl PinkNoiseBank {
    /// Create `channels` generators with `num_rows` rows each.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if `channels` is zero or `num_rows` is
    /// out of range.
    pub fn new(channels: usize, num_rows: usize, seed: u32) -> Result<Self> {
        if channels == 0 {
            return Err(Error::invalid_argument(
                "channels",
                0,
                "must be non-zero",
            ));
        }

        let generators = (0..channels)
            .map(|ch| PinkNoise::with_seed(num_rows, seed.wrapping_add(ch as u32)))
            .collect::<Result<Vec<_>>>()?;

        log::debug!("pink noise bank: channels={channels} rows={num_rows} seed={seed}");
        Ok(Self { generators })
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.generators.len()
    }

    /// Generator for channel `ch`.
    pub fn channel(&self, ch: usize) -> Option<&PinkNoise> {
        self.generators.get(ch)
    }

    /// Mutable generator for channel `ch`.
    pub fn channel_mut(&mut self, ch: usize) -> Option<&mut PinkNoise> {
        self.generators.get_mut(ch)
    }

    /// Set the output gain of every channel.
    pub fn set_amplitude(&mut self, amplitude: f32) {
        for g in &mut self.generators {
            g.set_amplitude(amplitude);
        }
    }

    /// Reset every channel.
    pub fn reset(&mut self) {
        for g in &mut self.generators {
            g.reset();
        }
    }

    /// Fill interleaved frames, one sample per channel per frame.
    ///
    /// A trailing partial frame is left untouched.
    pub fn process_interleaved(&mut self, dst: &mut [f32]) {
        let channels = self.generators.len();
        for frame in dst.chunks_exact_mut(channels) {
            for (s, g) in frame.iter_mut().zip(self.generators.iter_mut()) {
                *s = g.generate_sample() * g.amplitude();
            }
        }
    }

    /// Fill one buffer per channel.
    ///
    /// Extra buffers beyond the channel count are left untouched.
    pub fn process_planar(&mut self, dst: &mut [&mut [f32]]) {
        for (buf, g) in dst.iter_mut().zip(self.generators.iter_mut()) {
            g.process_overwrite(buf);
        }
    }
}
