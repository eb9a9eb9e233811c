// SPDX-License-Identifier: LGPL-3.0-or-later

//! 32-bit linear congruential random source.
//!
//! `seed' = seed * 196314165 + 907633515 (mod 2^32)`. Fast and fully
//! deterministic, which is what a reproducible test signal needs. The seed
//! is owned by each instance, so generators never share hidden state.

use crate::consts::{DEFAULT_SEED, LCG_INCREMENT, LCG_MULTIPLIER, RANDOM_SHIFT};

/// 32-bit linear congruential generator.
///
/// # Examples
/// ```
/// use pink_dsp_units::noise::lcg32::Lcg32;
///
/// let mut a = Lcg32::with_seed(7);
/// let mut b = Lcg32::with_seed(7);
/// assert_eq!(a.next_u32(), b.next_u32());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg32 {
    seed: u32,
}

impl Default for Lcg32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Lcg32 {
    /// Create a generator with [`DEFAULT_SEED`].
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create a generator with an explicit seed.
    pub fn with_seed(seed: u32) -> Self {
        Self { seed }
    }

    /// Current seed, i.e. the last value returned.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Restart the sequence from `seed`.
    pub fn set_seed(&mut self, seed: u32) {
        self.seed = seed;
    }

    /// Advance the recurrence and return the new seed.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.seed = self
            .seed
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.seed
    }

    /// Draw a signed value in `[-2^23, 2^23)` from the high bits.
    #[inline]
    pub fn next_signed(&mut self) -> i32 {
        (self.next_u32() as i32) >> RANDOM_SHIFT
    }
}
