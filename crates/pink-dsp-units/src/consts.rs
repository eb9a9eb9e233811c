// SPDX-License-Identifier: LGPL-3.0-or-later

//! Generator and metering constants.
//!
//! The random-source constants fix the bit-exact behaviour of the pink
//! noise generator: identical seeds and row counts must reproduce identical
//! sample sequences on every platform.

// Random source

/// LCG multiplier (`seed' = seed * A + C mod 2^32`).
pub const LCG_MULTIPLIER: u32 = 196_314_165;

/// LCG increment.
pub const LCG_INCREMENT: u32 = 907_633_515;

/// Seed used when none is given.
pub const DEFAULT_SEED: u32 = 22_222;

/// Significant bits kept from each LCG draw.
pub const RANDOM_BITS: u32 = 24;

/// Arithmetic right shift applied to a signed LCG draw.
///
/// Discards the low-order bits, which carry the short periods of a
/// power-of-two modulus LCG.
pub const RANDOM_SHIFT: u32 = u32::BITS - RANDOM_BITS;

// Pink noise

/// Largest supported row count.
///
/// Bounds the index counter to 30 bits and keeps
/// `(MAX_ROWS + 1) * 2^(RANDOM_BITS - 1)` inside an `i32`.
pub const MAX_ROWS: usize = 30;

/// Row count used by [`crate::noise::PinkNoise::default`].
pub const DEFAULT_ROWS: usize = 16;

// Metering

/// Smallest level reported by the volume meter (one 16-bit LSB).
pub const MIN_LEVEL: f32 = 1.0 / 32767.0;

/// Mean-square power of [`MIN_LEVEL`].
pub const MIN_POWER: f32 = MIN_LEVEL * MIN_LEVEL;

/// Window-over-overall delta that flags a loud section (dB).
pub const DEFAULT_HIGH_THRESHOLD_DB: f32 = 6.0;

/// Window-over-overall delta that flags a quiet section (dB).
pub const DEFAULT_LOW_THRESHOLD_DB: f32 = -12.0;
