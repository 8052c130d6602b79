// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Motor Abstractions
//!
//! This module contains motor-level pieces that sit between the `hw` layer and the control loop.
//!
//! ## Modules
//!
//! - [`quadrature`] - Per-axis encoder delta sampling and accumulated odometry.
//! - [`actuator`] - Drive-command sink and H-bridge direction/duty mapping.

pub mod actuator;
pub mod quadrature;

pub use actuator::{Actuator, Direction, HBridgeDrive};
pub use quadrature::{Odometer, QuadratureCounter, QuadratureTracker};
