// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Receive side of the drivetrain link.
//!
//! [`CommandLink::on_byte`] is called from the USART receive interrupt with each byte. The byte is
//! shown to the reset detector first and then to the frame parser; the two never affect each
//! other. A completed frame is committed to the shared [`CommandState`]; a completed reset
//! sequence zeroes the shared [`Odometer`] immediately.

use crate::motors::Odometer;
use crate::protocol::command::CommandState;
use crate::protocol::messages::Command;
use crate::protocol::parser::Parser;
use crate::protocol::reset::ResetDetector;

/// What a single received byte caused.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxEvent {
    /// Frame completed and committed by this byte.
    pub command: Option<Command>,
    /// Odometry was zeroed by this byte.
    pub odometry_reset: bool,
}

pub struct CommandLink<'a> {
    parser: Parser,
    detector: ResetDetector,
    commands: &'a CommandState,
    odometer: &'a Odometer,
    frames: u32,
}

impl<'a> CommandLink<'a> {
    pub fn new(commands: &'a CommandState, odometer: &'a Odometer) -> Self {
        Self {
            parser: Parser::new(),
            detector: ResetDetector::new(),
            commands,
            odometer,
            frames: 0,
        }
    }

    /// Number of frames accepted since boot (wraps).
    #[inline]
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Process one received byte.
    pub fn on_byte(&mut self, byte: u8) -> RxEvent {
        let mut event = RxEvent::default();

        if self.detector.push(byte) {
            self.odometer.reset_all();
            event.odometry_reset = true;
            info!("odometry reset");
        }

        if let Some(cmd) = self.parser.push(byte) {
            self.commands.apply(&cmd);
            self.frames = self.frames.wrapping_add(1);
            event.command = Some(cmd);
            debug!("command {}", cmd);
        }

        event
    }
}
