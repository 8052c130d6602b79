// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Actuation interface.
//!
//! The control tick hands four saturated, signed drive values to an [`Actuator`] once per tick.
//! For H-bridge drivers, [`HBridgeDrive::from_output`] splits a drive value into the two direction
//! inputs and a PWM compare value.

use crate::axis::AXIS_COUNT;

/// Consumer of the per-tick drive commands, indexed A, B, C, D.
pub trait Actuator {
    fn apply(&mut self, outputs: [i32; AXIS_COUNT]);
}

/// Direction of an H-bridge channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// IN1 high, IN2 low
    Forward,
    /// IN1 low, IN2 high
    Reverse,
}

/// Pin levels and duty for one H-bridge channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HBridgeDrive {
    pub direction: Direction,
    /// PWM compare value, `0..=limit`.
    pub duty: u16,
}

impl HBridgeDrive {
    /// Map a signed drive value to direction + duty, clamping the magnitude to `limit`.
    ///
    /// Zero drives forward at zero duty.
    pub fn from_output(output: i32, limit: u16) -> Self {
        let direction = if output >= 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        let magnitude = output.unsigned_abs().min(limit as u32) as u16;
        Self {
            direction,
            duty: magnitude,
        }
    }

    /// IN1/IN2 levels (`true` = high).
    #[inline]
    pub fn inputs(&self) -> (bool, bool) {
        match self.direction {
            Direction::Forward => (true, false),
            Direction::Reverse => (false, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_selects_direction() {
        let fwd = HBridgeDrive::from_output(640, 1000);
        assert_eq!(fwd.direction, Direction::Forward);
        assert_eq!(fwd.duty, 640);
        assert_eq!(fwd.inputs(), (true, false));

        let rev = HBridgeDrive::from_output(-640, 1000);
        assert_eq!(rev.direction, Direction::Reverse);
        assert_eq!(rev.duty, 640);
        assert_eq!(rev.inputs(), (false, true));
    }

    #[test]
    fn magnitude_is_clamped() {
        assert_eq!(HBridgeDrive::from_output(5000, 1000).duty, 1000);
        assert_eq!(HBridgeDrive::from_output(i32::MIN, 1000).duty, 1000);
        assert_eq!(HBridgeDrive::from_output(0, 1000).duty, 0);
    }
}
