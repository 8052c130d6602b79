// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Wire format of the drivetrain link.
//!
//! Command frame, host -> drivetrain, 11 bytes, no checksum:
//!
//! ```text
//! 0      0x23 '#'  header
//! 1..=4  i8 x4     target velocity A, B, C, D (counts per tick)
//! 5      u8        flags, bit 0 = ramp enable
//! 6..=9  i8 x4     bias A, B, C, D (added to the target before the PID)
//! 10     0x21 '!'  tail
//! ```
//!
//! Independently of framing, the three bytes `!@!` anywhere in the stream zero the odometry.

use crate::axis::AXIS_COUNT;

/// First byte of every frame.
pub const HEADER: u8 = b'#';
/// Last byte of every frame.
pub const TAIL: u8 = b'!';

/// Total length of a command frame.
pub const COMMAND_FRAME_LEN: usize = 11;
/// Bytes between header and tail.
pub const COMMAND_PAYLOAD_LEN: usize = COMMAND_FRAME_LEN - 2;

// Payload offsets (relative to the first byte after the header)
const TARGET_OFFSET: usize = 0;
const FLAGS_OFFSET: usize = 4;
const BIAS_OFFSET: usize = 5;

/// Flag bit: enable the trapezoidal speed ramp.
pub const FLAG_RAMP_ENABLE: u8 = 0x01;

/// Out-of-band sequence that zeroes the odometry.
pub const RESET_SEQUENCE: [u8; 3] = *b"!@!";

/// One decoded command frame.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    /// Target velocity per axis, in encoder counts per tick.
    pub targets: [i8; AXIS_COUNT],
    /// Rate-limit target changes through the speed ramp.
    pub ramp_enabled: bool,
    /// Additive term applied on top of the ramped target.
    pub bias: [i8; AXIS_COUNT],
}

impl Command {
    /// Decode the bytes between header and tail.
    pub fn from_payload(payload: &[u8; COMMAND_PAYLOAD_LEN]) -> Self {
        let mut cmd = Command {
            ramp_enabled: payload[FLAGS_OFFSET] & FLAG_RAMP_ENABLE != 0,
            ..Default::default()
        };
        for i in 0..AXIS_COUNT {
            cmd.targets[i] = payload[TARGET_OFFSET + i] as i8;
            cmd.bias[i] = payload[BIAS_OFFSET + i] as i8;
        }
        cmd
    }

    /// Encode as a complete frame, as a host would send it.
    pub fn to_frame(&self) -> [u8; COMMAND_FRAME_LEN] {
        let mut frame = [0u8; COMMAND_FRAME_LEN];
        frame[0] = HEADER;
        let payload = &mut frame[1..=COMMAND_PAYLOAD_LEN];
        for i in 0..AXIS_COUNT {
            payload[TARGET_OFFSET + i] = self.targets[i] as u8;
            payload[BIAS_OFFSET + i] = self.bias[i] as u8;
        }
        payload[FLAGS_OFFSET] = if self.ramp_enabled { FLAG_RAMP_ENABLE } else { 0 };
        frame[COMMAND_FRAME_LEN - 1] = TAIL;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_fields_are_signed() {
        let payload = [0x7F, 0x80, 0xFF, 0x01, 0x03, 0xF6, 0x0A, 0x00, 0x81];
        let cmd = Command::from_payload(&payload);
        assert_eq!(cmd.targets, [127, -128, -1, 1]);
        assert!(cmd.ramp_enabled);
        assert_eq!(cmd.bias, [-10, 10, 0, -127]);
    }

    #[test]
    fn only_bit_zero_enables_ramp() {
        let mut payload = [0u8; COMMAND_PAYLOAD_LEN];
        payload[FLAGS_OFFSET] = 0xFE;
        assert!(!Command::from_payload(&payload).ramp_enabled);
        payload[FLAGS_OFFSET] = 0x01;
        assert!(Command::from_payload(&payload).ramp_enabled);
    }

    #[test]
    fn frame_layout() {
        let cmd = Command {
            targets: [1, 2, 3, -4],
            ramp_enabled: true,
            bias: [5, 6, 7, -8],
        };
        let frame = cmd.to_frame();
        assert_eq!(
            frame,
            [b'#', 1, 2, 3, 0xFC, 0x01, 5, 6, 7, 0xF8, b'!']
        );
    }
}
