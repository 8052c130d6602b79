// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Quadrive Firmware
//!
//! This crate contains the firmware for a four-motor drivetrain controller, written in Rust,
//! targeting an STM32F777 MCU. Each motor runs a closed velocity loop on quadrature feedback;
//! velocity commands arrive over a framed serial link and telemetry is reported back over the
//! same link.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`axis`] | The four axis identities and per-axis storage helpers |
//! | [`config`] | Tuning constants and boot-time configuration |
//! | [`motors`] | Quadrature odometry and the actuation interface |
//! | [`control`] | Fixed-point PID, speed ramp and the control-tick orchestrator |
//! | [`protocol`] | Command frame decoder, reset detector and telemetry frame codec |
//! | [`telemetry`] | Non-blocking telemetry transmitter |
//! | `hw` | MCU-level wrappers around timers, USART and DMA (feature `firmware`) |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features firmware
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod logging;

pub mod axis;
pub mod config;
pub mod control;
pub mod motors;
pub mod protocol;
pub mod telemetry;

#[cfg(feature = "firmware")]
pub mod hw;

pub use axis::{Axis, AXIS_COUNT};
pub use config::DrivetrainConfig;
pub use control::Drivetrain;
