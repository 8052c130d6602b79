// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Drivetrain tuning and timing configuration.
//!
//! Compile-time defaults live here as constants. [`DrivetrainConfig`] collects them into one value
//! that is validated once at boot before any interrupt is enabled.

use thiserror::Error;

use crate::control::pid::PidGains;
use crate::control::ramp;

/* --------------------------- PID -------------------------- */

/// Shared default gains: Kp = 55.00, Ki = 8.00, Kd = 0.00.
pub const DEFAULT_GAINS: PidGains = PidGains::from_raw(5500, 800, 0);

/// Integrator clamp, in accumulated encoder counts.
pub const INTEGRAL_LIMIT: i32 = 100_000;

/// Output clamp. Matches the PWM compare range of the H-bridge timer.
pub const OUTPUT_LIMIT: i32 = 1000;

/* --------------------------- Timing -------------------------- */

/// Control-tick rate (Hz).
pub const CONTROL_HZ: u32 = 100;

/// Telemetry rate (Hz).
pub const TELEMETRY_HZ: u32 = 20;

/* --------------------------- Ramp -------------------------- */

/// Ramp sub-units per native unit (milli-counts).
pub const RAMP_SCALE: i32 = 1000;

/// Maximum ramp acceleration, in native units per second.
pub const RAMP_MAX_ACCEL: i32 = 10;

/* --------------------------- Odometry -------------------------- */

/// Divisor applied to accumulated encoder counts when reporting position.
pub const POSITION_DIVISOR: i32 = 100;

/* --------------------------- Link -------------------------- */

/// Baud rate of the command/telemetry USART.
pub const LINK_BAUD: u32 = 115_200;

/// Error returned by [`DrivetrainConfig::validate`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    #[error("control rate must be non-zero")]
    ZeroControlRate,
    #[error("telemetry rate must be non-zero")]
    ZeroTelemetryRate,
    #[error("telemetry rate {telemetry_hz} Hz exceeds control rate {control_hz} Hz")]
    TelemetryFasterThanControl { control_hz: u32, telemetry_hz: u32 },
    #[error("integral limit must be positive, got {0}")]
    IntegralLimit(i32),
    #[error("output limit must be positive, got {0}")]
    OutputLimit(i32),
    #[error("ramp scale must be positive, got {0}")]
    RampScale(i32),
    #[error("ramp acceleration must be positive, got {0}")]
    RampAcceleration(i32),
    #[error("{rate_hz} Hz cannot be generated from a {timclk_hz} Hz timer clock")]
    TickRate { rate_hz: u32, timclk_hz: u32 },
}

/// Prescaler and auto-reload values for a periodic timer update.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerDivider {
    pub prescaler: u16,
    pub reload: u16,
}

impl TimerDivider {
    /// Divider for `rate_hz` updates per second, using the smallest prescaler whose reload fits
    /// in 16 bits.
    ///
    /// Returns `None` for a zero rate or one that leaves fewer than two timer clocks per period.
    pub const fn for_rate(timclk_hz: u32, rate_hz: u32) -> Option<Self> {
        if rate_hz == 0 {
            return None;
        }
        let ticks = timclk_hz / rate_hz;
        if ticks < 2 {
            return None;
        }
        // ticks < 2^32, so the prescaler always fits 16 bits
        let prescaler = (ticks - 1) / 0x1_0000;
        let reload = ticks / (prescaler + 1) - 1;
        Some(Self {
            prescaler: prescaler as u16,
            reload: reload as u16,
        })
    }

    /// Update rate this divider produces, rounded down.
    pub const fn rate_hz(&self, timclk_hz: u32) -> u32 {
        let period = (self.prescaler as u64 + 1) * (self.reload as u64 + 1);
        (timclk_hz as u64 / period) as u32
    }
}

/// Full drivetrain configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrivetrainConfig {
    /// Gains applied to every axis unless overridden per axis.
    pub gains: PidGains,
    pub integral_limit: i32,
    pub output_limit: i32,

    pub control_hz: u32,
    pub telemetry_hz: u32,

    /// Ramp resolution, sub-units per native unit.
    pub ramp_scale: i32,
    /// Ramp acceleration, native units per second.
    pub ramp_max_accel: i32,
}

impl Default for DrivetrainConfig {
    fn default() -> Self {
        Self {
            gains: DEFAULT_GAINS,
            integral_limit: INTEGRAL_LIMIT,
            output_limit: OUTPUT_LIMIT,
            control_hz: CONTROL_HZ,
            telemetry_hz: TELEMETRY_HZ,
            ramp_scale: RAMP_SCALE,
            ramp_max_accel: RAMP_MAX_ACCEL,
        }
    }
}

impl DrivetrainConfig {
    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.control_hz == 0 {
            return Err(ConfigError::ZeroControlRate);
        }
        if self.telemetry_hz == 0 {
            return Err(ConfigError::ZeroTelemetryRate);
        }
        if self.telemetry_hz > self.control_hz {
            return Err(ConfigError::TelemetryFasterThanControl {
                control_hz: self.control_hz,
                telemetry_hz: self.telemetry_hz,
            });
        }
        if self.integral_limit <= 0 {
            return Err(ConfigError::IntegralLimit(self.integral_limit));
        }
        if self.output_limit <= 0 {
            return Err(ConfigError::OutputLimit(self.output_limit));
        }
        if self.ramp_scale <= 0 {
            return Err(ConfigError::RampScale(self.ramp_scale));
        }
        if self.ramp_max_accel <= 0 {
            return Err(ConfigError::RampAcceleration(self.ramp_max_accel));
        }
        Ok(())
    }

    /// Control and telemetry tick dividers for a timer clocked at `timclk_hz`.
    pub fn tick_dividers(
        &self,
        timclk_hz: u32,
    ) -> Result<(TimerDivider, TimerDivider), ConfigError> {
        let divider = |rate_hz| {
            TimerDivider::for_rate(timclk_hz, rate_hz).ok_or(ConfigError::TickRate {
                rate_hz,
                timclk_hz,
            })
        };
        Ok((divider(self.control_hz)?, divider(self.telemetry_hz)?))
    }

    /// Ramp step per control tick, in sub-units.
    pub fn ramp_step(&self) -> i32 {
        ramp::step_for(self.ramp_max_accel, self.ramp_scale, self.control_hz)
    }
}
