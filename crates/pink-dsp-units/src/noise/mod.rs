// SPDX-License-Identifier: LGPL-3.0-or-later

//! Noise generators and their random source.
//!
//! - **Lcg32**: 32-bit linear congruential generator
//! - **PinkNoise**: Gardner/McCartney pink (1/f) noise
//! - **PinkNoiseBank**: one independent pink noise generator per channel
//!
//! # Examples
//! ```
//! use pink_dsp_units::noise::PinkNoise;
//!
//! let mut pink = PinkNoise::with_seed(16, 12345)?;
//! pink.set_amplitude(0.5);
//!
//! let mut output = vec![0.0; 100];
//! pink.process_overwrite(&mut output);
//! # Ok::<(), pink_dsp_units::Error>(())
//! ```

pub mod bank;
pub mod lcg32;
pub mod pink;

// Re-export commonly used types
pub use bank::PinkNoiseBank;
pub use lcg32::Lcg32;
pub use pink::PinkNoise;
