// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! This module provides the building blocks for the per-axis velocity loop.
//!
//! ## Modules
//!
//! - [`fixed`] - Scaled-integer helpers for the control law.
//! - [`pid`] - Integer PID controller with anti-windup and output saturation.
//! - [`ramp`] - Trapezoidal speed ramp applied to commanded targets.
//! - [`drivetrain`] - Control-tick orchestrator for all four axes.

pub mod drivetrain;
pub mod fixed;
pub mod pid;
pub mod ramp;

pub use drivetrain::Drivetrain;
pub use fixed::Centi;
pub use pid::{Pid, PidGains};
pub use ramp::SpeedRamp;
