// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Shared command state.
//!
//! Written by the receive interrupt, read by the control and telemetry ticks. Every field is its
//! own atomic and is stored individually, so a tick that lands in the middle of
//! [`CommandState::apply`] can see some fields from the new frame and some from the old one. Each
//! field on its own is always consistent and the next tick sees the complete frame.

use core::sync::atomic::{AtomicBool, AtomicI8, Ordering};

use crate::axis::{Axis, AXIS_COUNT};
use crate::protocol::messages::Command;

pub struct CommandState {
    targets: [AtomicI8; AXIS_COUNT],
    bias: [AtomicI8; AXIS_COUNT],
    ramp_enabled: AtomicBool,
}

impl CommandState {
    /// All targets and biases zero, ramp disabled.
    pub const fn new() -> Self {
        Self {
            targets: [
                AtomicI8::new(0),
                AtomicI8::new(0),
                AtomicI8::new(0),
                AtomicI8::new(0),
            ],
            bias: [
                AtomicI8::new(0),
                AtomicI8::new(0),
                AtomicI8::new(0),
                AtomicI8::new(0),
            ],
            ramp_enabled: AtomicBool::new(false),
        }
    }

    /// Store every field of a decoded frame, in wire order.
    pub fn apply(&self, cmd: &Command) {
        for axis in Axis::ALL {
            self.set_target(axis, cmd.targets[axis.index()]);
        }
        self.ramp_enabled.store(cmd.ramp_enabled, Ordering::Relaxed);
        for axis in Axis::ALL {
            self.bias[axis.index()].store(cmd.bias[axis.index()], Ordering::Relaxed);
        }
    }

    /// Override one target without a frame (bench bring-up).
    #[inline]
    pub fn set_target(&self, axis: Axis, target: i8) {
        self.targets[axis.index()].store(target, Ordering::Relaxed);
    }

    #[inline]
    pub fn target(&self, axis: Axis) -> i8 {
        self.targets[axis.index()].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bias(&self, axis: Axis) -> i8 {
        self.bias[axis.index()].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn ramp_enabled(&self) -> bool {
        self.ramp_enabled.load(Ordering::Relaxed)
    }

    /// Field-by-field copy of the current state. Not atomic across fields.
    pub fn snapshot(&self) -> Command {
        let mut cmd = Command {
            ramp_enabled: self.ramp_enabled(),
            ..Default::default()
        };
        for axis in Axis::ALL {
            cmd.targets[axis.index()] = self.target(axis);
            cmd.bias[axis.index()] = self.bias(axis);
        }
        cmd
    }
}

impl Default for CommandState {
    fn default() -> Self {
        Self::new()
    }
}
