// SPDX-License-Identifier: LGPL-3.0-or-later

//! Unit conversion functions.
//!
//! Conversions between linear gain, power ratio and decibels used by the
//! meters and by calibration code that sets noise levels in dBFS.

use crate::consts::MIN_POWER;

/// Convert decibels to linear gain (amplitude ratio).
///
/// # Arguments
/// * `db` - Level in decibels
///
/// # Returns
/// Linear gain (amplitude ratio)
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    (db * (std::f32::consts::LN_10 / 20.0)).exp()
}

/// Convert linear gain (amplitude ratio) to decibels.
///
/// # Arguments
/// * `gain` - Linear gain (amplitude ratio)
///
/// # Returns
/// Level in decibels
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    20.0 * gain.log10()
}

/// Convert power ratio to decibels.
///
/// # Arguments
/// * `pwr` - Power ratio
///
/// # Returns
/// Level in decibels
#[inline]
pub fn power_to_db(pwr: f32) -> f32 {
    10.0 * pwr.log10()
}

/// Convert a mean-square power to dBFS, flooring at [`MIN_POWER`].
///
/// Silence reads as about -90.3 dBFS instead of negative infinity.
#[inline]
pub fn power_to_dbfs(pwr: f32) -> f32 {
    power_to_db(pwr.max(MIN_POWER))
}
