// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Integer PID controller for closed-loop velocity control.
//!
//! Works in `no_std`, does not allocate and uses no floating point, so it is safe to call from the
//! control-tick interrupt on an MCU without an FPU context switch.
//!
//! The control law, evaluated once per tick with a constant tick period folded into the gains:
//!
//! ```text
//! error      = setpoint - measurement
//! integral   = clamp(integral + error, ±integral_limit)
//! derivative = error - previous_error
//! output     = clamp((Kp·error + Ki·integral + Kd·derivative) / 100, ±output_limit)
//! ```

use crate::config::{INTEGRAL_LIMIT, OUTPUT_LIMIT};
use crate::control::fixed::{self, Centi};

/// Proportional, integral and derivative gains, each with two implied decimal digits.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PidGains {
    pub kp: Centi,
    pub ki: Centi,
    pub kd: Centi,
}

impl PidGains {
    /// Build gains from already scaled integers (`5500` is `55.00`).
    pub const fn from_raw(kp: i32, ki: i32, kd: i32) -> Self {
        Self {
            kp: Centi::from_raw(kp),
            ki: Centi::from_raw(ki),
            kd: Centi::from_raw(kd),
        }
    }
}

/// PID controller with integer gains, integral anti-windup and output saturation.
#[derive(Clone, Debug)]
pub struct Pid {
    gains: PidGains,

    /// Integrator state, in native error units
    integral: i32,
    /// Error seen on the previous update (for the derivative term)
    prev_error: i32,

    /// Symmetric output clamp
    output_limit: i32,
    /// Symmetric anti-windup clamp
    integral_limit: i32,
}

impl Pid {
    /// Create a new PID controller with the default limits.
    pub const fn new(gains: PidGains) -> Self {
        Self {
            gains,
            integral: 0,
            prev_error: 0,
            output_limit: OUTPUT_LIMIT,
            integral_limit: INTEGRAL_LIMIT,
        }
    }

    /// Set the symmetric output limit. Negative limits are treated as their magnitude.
    pub const fn with_output_limit(mut self, limit: i32) -> Self {
        self.output_limit = limit.saturating_abs();
        self
    }

    /// Set the symmetric integral limit for anti-windup.
    pub const fn with_integral_limit(mut self, limit: i32) -> Self {
        self.integral_limit = limit.saturating_abs();
        self
    }

    #[inline]
    pub fn gains(&self) -> PidGains {
        self.gains
    }

    /// Replace the gains. Integrator and derivative history are kept.
    #[inline]
    pub fn set_gains(&mut self, gains: PidGains) {
        self.gains = gains;
    }

    #[inline]
    pub fn integral(&self) -> i32 {
        self.integral
    }

    #[inline]
    pub fn prev_error(&self) -> i32 {
        self.prev_error
    }

    /// Reset integrator + derivative history.
    pub fn reset(&mut self) {
        self.integral = 0;
        self.prev_error = 0;
    }

    /// Run one control step.
    ///
    /// `setpoint` and `measurement` are in encoder counts per tick. Returns the saturated drive
    /// command in `[-output_limit, output_limit]`.
    pub fn update(&mut self, setpoint: i32, measurement: i32) -> i32 {
        let error = setpoint.saturating_sub(measurement);

        // ----- I term, with anti-windup clamp -----
        self.integral = fixed::saturate(self.integral.saturating_add(error), self.integral_limit);

        // ----- D term (on error, constant tick period) -----
        let derivative = error.saturating_sub(self.prev_error);
        self.prev_error = error;

        let acc = self
            .gains
            .kp
            .mul_int(error)
            .saturating_add(self.gains.ki.mul_int(self.integral))
            .saturating_add(self.gains.kd.mul_int(derivative));

        // ----- Output clamp -----
        fixed::saturate(fixed::descale(acc), self.output_limit)
    }
}
