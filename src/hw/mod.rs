// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! STM32F7 peripherals behind the drivetrain's hardware traits.

pub mod encoder;
pub mod pins;
pub mod pwm;
pub mod tick;
pub mod usart;

pub use encoder::{AxisEncoder, Encoder};
pub use pins::BoardPins;
pub use pwm::{BridgeInputs, HBridgePwm};
pub use tick::TickTimer;
pub use usart::{DmaTx, LinkRx};
