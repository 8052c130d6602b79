// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Byte-wise command frame parser.
//!
//! Fed one byte per receive interrupt. There is no checksum: a frame is accepted whenever a header
//! is followed by nine payload bytes and a tail. Anything else drops the partial frame and the
//! parser goes back to hunting for a header on the next byte.

use crate::protocol::messages::*;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum State {
    WaitHeader,
    Payload { len: usize },
    WaitTail,
}

pub struct Parser {
    state: State,
    payload: [u8; COMMAND_PAYLOAD_LEN],
}

impl Parser {
    pub const fn new() -> Self {
        Self {
            state: State::WaitHeader,
            payload: [0; COMMAND_PAYLOAD_LEN],
        }
    }

    /// Process a single incoming byte. Returns `Some(Command)` if a complete frame is received.
    pub fn push(&mut self, byte: u8) -> Option<Command> {
        match self.state {
            State::WaitHeader => {
                if byte == HEADER {
                    self.state = State::Payload { len: 0 };
                }
            }
            State::Payload { len } => {
                self.payload[len] = byte;
                let len = len + 1;
                self.state = if len == COMMAND_PAYLOAD_LEN {
                    State::WaitTail
                } else {
                    State::Payload { len }
                };
            }
            State::WaitTail => {
                // Back to header search whether or not the tail matched
                self.state = State::WaitHeader;

                if byte == TAIL {
                    return Some(Command::from_payload(&self.payload));
                }
            }
        }
        None
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Command {
        Command {
            targets: [10, -20, 30, -40],
            ramp_enabled: true,
            bias: [1, -2, 3, -4],
        }
    }

    fn feed(parser: &mut Parser, bytes: &[u8]) -> Vec<Command> {
        bytes.iter().filter_map(|&b| parser.push(b)).collect()
    }

    #[test]
    fn decodes_one_frame_on_tail() {
        let mut parser = Parser::new();
        let frame = sample().to_frame();
        for &b in &frame[..COMMAND_FRAME_LEN - 1] {
            assert_eq!(parser.push(b), None);
        }
        assert_eq!(parser.push(TAIL), Some(sample()));
        assert_eq!(parser.state, State::WaitHeader);
    }

    #[test]
    fn ignores_noise_before_header() {
        let mut parser = Parser::new();
        let mut stream = vec![0x00, 0x55, b'!', 0xAA];
        stream.extend_from_slice(&sample().to_frame());
        assert_eq!(feed(&mut parser, &stream), vec![sample()]);
    }

    #[test]
    fn bad_tail_drops_frame_and_resyncs() {
        let mut parser = Parser::new();
        let mut bad = sample().to_frame();
        bad[COMMAND_FRAME_LEN - 1] = 0x00;

        let mut stream = bad.to_vec();
        stream.extend_from_slice(&sample().to_frame());
        assert_eq!(feed(&mut parser, &stream), vec![sample()]);
    }

    #[test]
    fn header_inside_payload_is_data() {
        let cmd = Command {
            targets: [b'#' as i8, 0, 0, 0],
            ..sample()
        };
        let mut parser = Parser::new();
        assert_eq!(feed(&mut parser, &cmd.to_frame()), vec![cmd]);
    }

    #[test]
    fn misaligned_header_costs_at_most_one_frame() {
        let mut parser = Parser::new();
        // A stray header just before a real frame shifts alignment by one byte.
        let mut stream = vec![HEADER];
        for _ in 0..4 {
            stream.extend_from_slice(&sample().to_frame());
        }
        let decoded = feed(&mut parser, &stream);
        assert!(decoded.len() >= 3);
        assert!(decoded.iter().all(|c| *c == sample()));
    }

    #[test]
    fn truncated_frame_then_full_frame() {
        let mut parser = Parser::new();
        let frame = sample().to_frame();
        let mut stream = frame[..5].to_vec();
        stream.extend_from_slice(&frame);
        stream.extend_from_slice(&frame);
        // The truncated frame swallows the first full one
        assert_eq!(feed(&mut parser, &stream), vec![sample()]);
        assert_eq!(parser.state, State::WaitHeader);
    }
}
