// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Scaled-integer arithmetic for the control law.
//!
//! The PID runs without floating point. Gains are stored as [`Centi`] values, i.e. integers with
//! two implied decimal digits (`5500` means `55.00`). Products are accumulated in `i64` with
//! saturating adds and brought back to native units by [`descale`], which truncates toward zero
//! and saturates to the `i32` range.

use core::fmt;

/// Implied scale of a [`Centi`] value.
pub const SCALE: i32 = 100;

/// Fixed-point number with a scale of [`SCALE`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Centi(i32);

impl Centi {
    pub const ZERO: Centi = Centi(0);

    /// Wrap an already scaled value (`5500` is `55.00`).
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Scale a whole number up, saturating at the `i32` range.
    #[inline]
    pub const fn from_int(value: i32) -> Self {
        Self(value.saturating_mul(SCALE))
    }

    /// The stored, scaled integer.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Multiply by a native-unit integer. The result keeps the scale.
    #[inline]
    pub const fn mul_int(self, value: i32) -> i64 {
        self.0 as i64 * value as i64
    }
}

impl fmt::Display for Centi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = SCALE as u32;
        write!(f, "{}{}.{:02}", sign, abs / scale, abs % scale)
    }
}

/// Bring a scaled accumulator back to native units.
///
/// Division truncates toward zero; the result saturates at the `i32` range.
#[inline]
pub fn descale(acc: i64) -> i32 {
    let native = acc / SCALE as i64;
    native.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Clamp to the symmetric range `[-limit, limit]`. `limit` must be non-negative.
#[inline]
pub fn saturate(value: i32, limit: i32) -> i32 {
    value.clamp(-limit, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descale_truncates_toward_zero() {
        assert_eq!(descale(199), 1);
        assert_eq!(descale(-199), -1);
        assert_eq!(descale(-99), 0);
    }

    #[test]
    fn descale_saturates() {
        assert_eq!(descale(i64::MAX), i32::MAX);
        assert_eq!(descale(i64::MIN), i32::MIN);
    }

    #[test]
    fn from_int_saturates() {
        assert_eq!(Centi::from_int(3).raw(), 300);
        assert_eq!(Centi::from_int(i32::MAX).raw(), i32::MAX);
    }

    #[test]
    fn display_shows_two_decimals() {
        assert_eq!(format!("{}", Centi::from_raw(5500)), "55.00");
        assert_eq!(format!("{}", Centi::from_raw(-805)), "-8.05");
        assert_eq!(format!("{}", Centi::from_raw(7)), "0.07");
    }
}
