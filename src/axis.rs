// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! The four drive axes.
//!
//! Every per-axis quantity in the firmware is stored in a `[T; AXIS_COUNT]` bank indexed by
//! [`Axis::index`]. Iteration always runs A, B, C, D in that order.

/// Number of independently controlled motor/encoder channels.
pub const AXIS_COUNT: usize = 4;

/// One motor/encoder channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    A,
    B,
    C,
    D,
}

impl Axis {
    /// All axes in control order.
    pub const ALL: [Axis; AXIS_COUNT] = [Axis::A, Axis::B, Axis::C, Axis::D];

    /// Position of this axis inside a per-axis bank.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}
