// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Serial protocol between the host and the drivetrain.
//!
//! - [`messages`] - Wire constants and the decoded [`Command`].
//! - [`parser`] - Byte-wise command frame state machine.
//! - [`reset`] - `!@!` out-of-band reset detector.
//! - [`command`] - Shared command state written by the receive interrupt.
//! - [`link`] - Receive-interrupt entry point tying the above together.
//! - [`telemetry`] - Outbound telemetry frame codec.

pub mod command;
pub mod link;
pub mod messages;
pub mod parser;
pub mod reset;
pub mod telemetry;

pub use command::CommandState;
pub use link::{CommandLink, RxEvent};
pub use messages::Command;
pub use parser::Parser;
pub use reset::ResetDetector;
pub use telemetry::{TelemetryDecodeError, TelemetryFrame, TELEMETRY_FRAME_LEN};
