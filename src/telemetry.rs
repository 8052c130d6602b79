// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Non-blocking telemetry transmitter.
//!
//! The telemetry tick calls [`Transmitter::try_send`]. If the previous frame is still being sent
//! the new sample is dropped; nothing is queued or retried. Otherwise the frame is encoded into
//! the transmitter's own buffer and handed to the transport, which reads it asynchronously (DMA on
//! the target).
//!
//! Ownership of the buffer is tracked by a [`TxFlag`]. It is set before the transfer is started
//! and cleared only by [`TxFlag::complete`] or [`TxFlag::fail`], which the transport's completion
//! and error interrupts call, or when the transport refuses the submission outright. While the
//! flag is set the buffer is never rewritten.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::axis::Axis;
use crate::motors::Odometer;
use crate::protocol::command::CommandState;
use crate::protocol::telemetry::{TelemetryFrame, TELEMETRY_FRAME_LEN};

/// Asynchronous multi-byte transmit primitive.
pub trait Transmit {
    type Error;

    /// Start sending `bytes` and return without waiting.
    ///
    /// The transport may keep reading `bytes` until it signals completion or error through the
    /// [`TxFlag`] shared with the transmitter.
    fn start(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Busy flag shared between the transmitter and the transport's interrupts.
pub struct TxFlag {
    busy: AtomicBool,
}

impl TxFlag {
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Transfer finished; the buffer may be reused.
    #[inline]
    pub fn complete(&self) {
        self.busy.store(false, Ordering::Release);
    }

    /// Transfer aborted by a transport error; the buffer may be reused.
    #[inline]
    pub fn fail(&self) {
        warn!("telemetry transfer error");
        self.busy.store(false, Ordering::Release);
    }

    /// Claim the buffer. Returns `false` if a transfer is already in flight.
    #[inline]
    fn claim(&self) -> bool {
        !self.busy.swap(true, Ordering::AcqRel)
    }
}

impl Default for TxFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one [`Transmitter::try_send`] call.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendOutcome {
    /// Frame handed to the transport.
    Sent,
    /// Previous transfer still in flight; this sample was dropped.
    Busy,
    /// Transport refused the transfer; this sample was dropped.
    Rejected,
}

/// Transfer counters, for diagnostics.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxStats {
    pub sent: u32,
    pub busy: u32,
    pub rejected: u32,
}

impl TelemetryFrame {
    /// Sample the shared drivetrain state.
    ///
    /// Targets are the commanded values, not the ramped setpoints. Fields are read one at a time.
    pub fn capture(commands: &CommandState, odometer: &Odometer) -> Self {
        let mut frame = TelemetryFrame::default();
        for axis in Axis::ALL {
            let i = axis.index();
            frame.targets[i] = commands.target(axis) as i16;
            frame.positions[i] = odometer.position(axis);
            frame.speeds[i] = odometer.speed(axis);
        }
        frame
    }
}

pub struct Transmitter<'a, T> {
    transport: T,
    flag: &'a TxFlag,
    buf: [u8; TELEMETRY_FRAME_LEN],
    stats: TxStats,
}

impl<'a, T: Transmit> Transmitter<'a, T> {
    pub fn new(transport: T, flag: &'a TxFlag) -> Self {
        Self {
            transport,
            flag,
            buf: [0; TELEMETRY_FRAME_LEN],
            stats: TxStats::default(),
        }
    }

    /// Encode and start sending `frame` unless a transfer is in flight.
    pub fn try_send(&mut self, frame: &TelemetryFrame) -> SendOutcome {
        if !self.flag.claim() {
            self.stats.busy = self.stats.busy.wrapping_add(1);
            trace!("telemetry dropped, link busy");
            return SendOutcome::Busy;
        }

        frame.encode(&mut self.buf);

        match self.transport.start(&self.buf) {
            Ok(()) => {
                self.stats.sent = self.stats.sent.wrapping_add(1);
                SendOutcome::Sent
            }
            Err(_) => {
                self.flag.complete();
                self.stats.rejected = self.stats.rejected.wrapping_add(1);
                warn!("telemetry transfer rejected");
                SendOutcome::Rejected
            }
        }
    }

    /// Telemetry tick: sample the shared state and try to send it.
    pub fn tick(&mut self, commands: &CommandState, odometer: &Odometer) -> SendOutcome {
        let frame = TelemetryFrame::capture(commands, odometer);
        self.try_send(&frame)
    }

    /// Last encoded frame. Only meaningful while no transfer is being prepared.
    #[inline]
    pub fn buffer(&self) -> &[u8; TELEMETRY_FRAME_LEN] {
        &self.buf
    }

    #[inline]
    pub fn stats(&self) -> TxStats {
        self.stats
    }

    #[inline]
    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeLink {
        started: Vec<Vec<u8>>,
        refuse: bool,
    }

    impl Transmit for FakeLink {
        type Error = ();

        fn start(&mut self, bytes: &[u8]) -> Result<(), ()> {
            if self.refuse {
                return Err(());
            }
            self.started.push(bytes.to_vec());
            Ok(())
        }
    }

    fn frame(n: i32) -> TelemetryFrame {
        TelemetryFrame {
            targets: [n as i16; 4],
            positions: [n; 4],
            speeds: [-n; 4],
        }
    }

    #[test]
    fn second_send_without_completion_is_dropped() {
        let flag = TxFlag::new();
        let mut tx = Transmitter::new(FakeLink::default(), &flag);

        assert_eq!(tx.try_send(&frame(1)), SendOutcome::Sent);
        assert!(flag.is_busy());
        assert_eq!(tx.try_send(&frame(2)), SendOutcome::Busy);
        assert_eq!(tx.transport().started.len(), 1);

        // The in-flight buffer still holds the first frame.
        assert_eq!(TelemetryFrame::decode(tx.buffer()), Ok(frame(1)));
        assert_eq!(
            tx.stats(),
            TxStats {
                sent: 1,
                busy: 1,
                rejected: 0
            }
        );
    }

    #[test]
    fn completion_clears_busy() {
        let flag = TxFlag::new();
        let mut tx = Transmitter::new(FakeLink::default(), &flag);

        tx.try_send(&frame(1));
        flag.complete();
        assert!(!flag.is_busy());
        assert_eq!(tx.try_send(&frame(2)), SendOutcome::Sent);

        let started = &tx.transport().started;
        assert_eq!(started.len(), 2);
        assert_eq!(TelemetryFrame::decode(&started[1]), Ok(frame(2)));
    }

    #[test]
    fn error_clears_busy() {
        let flag = TxFlag::new();
        let mut tx = Transmitter::new(FakeLink::default(), &flag);

        tx.try_send(&frame(1));
        flag.fail();
        assert!(!flag.is_busy());
        assert_eq!(tx.try_send(&frame(2)), SendOutcome::Sent);
    }

    #[test]
    fn refused_submission_leaves_link_idle() {
        let flag = TxFlag::new();
        let link = FakeLink {
            refuse: true,
            ..Default::default()
        };
        let mut tx = Transmitter::new(link, &flag);

        assert_eq!(tx.try_send(&frame(1)), SendOutcome::Rejected);
        assert!(!flag.is_busy());

        tx.transport().refuse = false;
        assert_eq!(tx.try_send(&frame(1)), SendOutcome::Sent);
    }

    #[test]
    fn tick_reports_commanded_targets_and_odometry() {
        let commands = CommandState::new();
        let odometer = Odometer::new();
        commands.set_target(Axis::A, -100);
        commands.set_target(Axis::D, 7);
        odometer.record(Axis::B, 1234);
        odometer.record(Axis::C, -55);

        let flag = TxFlag::new();
        let mut tx = Transmitter::new(FakeLink::default(), &flag);
        assert_eq!(tx.tick(&commands, &odometer), SendOutcome::Sent);

        let sent = TelemetryFrame::decode(&tx.transport().started[0]).unwrap();
        assert_eq!(sent.targets, [-100, 0, 0, 7]);
        assert_eq!(sent.positions, [0, 12, 0, 0]);
        assert_eq!(sent.speeds, [0, 1234, -55, 0]);
    }
}
