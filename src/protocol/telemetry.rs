// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Telemetry frame, drivetrain -> host, 42 bytes, little-endian, no checksum:
//!
//! ```text
//! 0       0x23 '#'  header
//! 1..=8   i16 x4    commanded target velocity A..D
//! 9..=24  i32 x4    scaled position A..D
//! 25..=40 i32 x4    measured speed A..D (counts in the last control tick)
//! 41      0x21 '!'  tail
//! ```

use thiserror::Error;

use crate::axis::AXIS_COUNT;
use crate::protocol::messages::{HEADER, TAIL};

/// Total length of a telemetry frame.
pub const TELEMETRY_FRAME_LEN: usize = 1 + AXIS_COUNT * (2 + 4 + 4) + 1;

const TARGETS_AT: usize = 1;
const POSITIONS_AT: usize = TARGETS_AT + AXIS_COUNT * 2;
const SPEEDS_AT: usize = POSITIONS_AT + AXIS_COUNT * 4;
const TAIL_AT: usize = SPEEDS_AT + AXIS_COUNT * 4;

/// Error type for [`TelemetryFrame::decode`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryDecodeError {
    #[error("expected 42 bytes, got {0}")]
    Length(usize),
    #[error("bad header byte {0:#04x}")]
    Header(u8),
    #[error("bad tail byte {0:#04x}")]
    Tail(u8),
}

/// One telemetry sample.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryFrame {
    pub targets: [i16; AXIS_COUNT],
    pub positions: [i32; AXIS_COUNT],
    pub speeds: [i32; AXIS_COUNT],
}

impl TelemetryFrame {
    /// Write the frame into `buf`.
    pub fn encode(&self, buf: &mut [u8; TELEMETRY_FRAME_LEN]) {
        buf[0] = HEADER;
        for i in 0..AXIS_COUNT {
            let t = TARGETS_AT + i * 2;
            buf[t..t + 2].copy_from_slice(&self.targets[i].to_le_bytes());

            let p = POSITIONS_AT + i * 4;
            buf[p..p + 4].copy_from_slice(&self.positions[i].to_le_bytes());

            let s = SPEEDS_AT + i * 4;
            buf[s..s + 4].copy_from_slice(&self.speeds[i].to_le_bytes());
        }
        buf[TAIL_AT] = TAIL;
    }

    /// Parse a complete frame.
    pub fn decode(bytes: &[u8]) -> Result<Self, TelemetryDecodeError> {
        let buf: &[u8; TELEMETRY_FRAME_LEN] = bytes
            .try_into()
            .map_err(|_| TelemetryDecodeError::Length(bytes.len()))?;

        if buf[0] != HEADER {
            return Err(TelemetryDecodeError::Header(buf[0]));
        }
        if buf[TAIL_AT] != TAIL {
            return Err(TelemetryDecodeError::Tail(buf[TAIL_AT]));
        }

        let mut frame = TelemetryFrame::default();
        for i in 0..AXIS_COUNT {
            let t = TARGETS_AT + i * 2;
            frame.targets[i] = i16::from_le_bytes([buf[t], buf[t + 1]]);

            let p = POSITIONS_AT + i * 4;
            frame.positions[i] = i32::from_le_bytes([buf[p], buf[p + 1], buf[p + 2], buf[p + 3]]);

            let s = SPEEDS_AT + i * 4;
            frame.speeds[i] = i32::from_le_bytes([buf[s], buf[s + 1], buf[s + 2], buf[s + 3]]);
        }
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TelemetryFrame {
        TelemetryFrame {
            targets: [-128, 127, 0, -1],
            positions: [i32::MIN, -123_456, 654_321, i32::MAX],
            speeds: [-32768, 32767, 17, -3],
        }
    }

    #[test]
    fn layout_is_fixed() {
        assert_eq!(TELEMETRY_FRAME_LEN, 42);
        assert_eq!(POSITIONS_AT, 9);
        assert_eq!(SPEEDS_AT, 25);
        assert_eq!(TAIL_AT, 41);
    }

    #[test]
    fn encode_places_little_endian_fields() {
        let mut buf = [0u8; TELEMETRY_FRAME_LEN];
        sample().encode(&mut buf);
        assert_eq!(buf[0], b'#');
        assert_eq!(&buf[1..3], &[0x80, 0xFF]);
        assert_eq!(&buf[9..13], &[0x00, 0x00, 0x00, 0x80]);
        assert_eq!(&buf[37..41], &[0xFD, 0xFF, 0xFF, 0xFF]);
        assert_eq!(buf[41], b'!');
    }

    #[test]
    fn decode_recovers_encoded_values() {
        let mut buf = [0u8; TELEMETRY_FRAME_LEN];
        sample().encode(&mut buf);
        assert_eq!(TelemetryFrame::decode(&buf), Ok(sample()));
    }

    #[test]
    fn decode_rejects_malformed() {
        let mut buf = [0u8; TELEMETRY_FRAME_LEN];
        sample().encode(&mut buf);

        assert_eq!(
            TelemetryFrame::decode(&buf[..41]),
            Err(TelemetryDecodeError::Length(41))
        );

        let mut bad = buf;
        bad[0] = 0x24;
        assert_eq!(TelemetryFrame::decode(&bad), Err(TelemetryDecodeError::Header(0x24)));

        let mut bad = buf;
        bad[41] = 0x00;
        assert_eq!(TelemetryFrame::decode(&bad), Err(TelemetryDecodeError::Tail(0x00)));
    }
}
