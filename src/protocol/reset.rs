// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Out-of-band reset sequence detector.
//!
//! Watches every received byte, regardless of what the frame parser is doing, and reports when
//! the last three bytes were [`RESET_SEQUENCE`]. The window is cleared after a match so that an
//! overlapping tail (`!@!@!`) does not fire twice.

use crate::protocol::messages::RESET_SEQUENCE;

const WINDOW: usize = RESET_SEQUENCE.len();

pub struct ResetDetector {
    ring: [u8; WINDOW],
    /// Next slot to write; also the oldest byte in the window.
    pos: usize,
}

impl ResetDetector {
    pub const fn new() -> Self {
        Self {
            ring: [0; WINDOW],
            pos: 0,
        }
    }

    pub fn clear(&mut self) {
        self.ring = [0; WINDOW];
        self.pos = 0;
    }

    /// Process one byte. Returns `true` when it completes the reset sequence.
    pub fn push(&mut self, byte: u8) -> bool {
        self.ring[self.pos] = byte;
        self.pos = (self.pos + 1) % WINDOW;

        let matched = (0..WINDOW).all(|i| self.ring[(self.pos + i) % WINDOW] == RESET_SEQUENCE[i]);
        if matched {
            self.clear();
        }
        matched
    }
}

impl Default for ResetDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(bytes: &[u8]) -> Vec<usize> {
        let mut det = ResetDetector::new();
        bytes
            .iter()
            .enumerate()
            .filter(|&(_, &b)| det.push(b))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn fires_on_third_byte() {
        assert_eq!(hits(b"!@!"), vec![2]);
        assert_eq!(hits(b"xx!@!yy"), vec![4]);
    }

    #[test]
    fn every_ring_alignment_matches() {
        for lead in 0..WINDOW {
            let mut stream = vec![0u8; lead];
            stream.extend_from_slice(b"!@!");
            assert_eq!(hits(&stream), vec![lead + 2]);
        }
    }

    #[test]
    fn overlapping_sequence_fires_once() {
        assert_eq!(hits(b"!@!@!"), vec![2]);
        // A fresh, non-overlapping sequence fires again
        assert_eq!(hits(b"!@!!@!"), vec![2, 5]);
    }

    #[test]
    fn near_misses_do_not_fire() {
        assert!(hits(b"!@@!").is_empty());
        assert!(hits(b"!!@").is_empty());
        assert!(hits(b"@!@").is_empty());
    }
}
