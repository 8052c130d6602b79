// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Trapezoidal speed ramp.
//!
//! Commanded targets arrive as whole encoder counts per tick. The ramp keeps its own setpoint at
//! a finer resolution (`scale` sub-units per count, milli-counts by default) so that small
//! accelerations still move the setpoint every tick. The PID only ever sees the truncated,
//! native-unit value.

use crate::config::RAMP_SCALE;

/// Per-tick step for a maximum acceleration, rounded to the nearest sub-unit.
///
/// `max_accel` is in native units per second. The step is never smaller than one sub-unit, so an
/// enabled ramp always makes progress.
pub const fn step_for(max_accel: i32, scale: i32, tick_hz: u32) -> i32 {
    if tick_hz == 0 {
        return i32::MAX;
    }
    let hz = tick_hz as i64;
    let step = (max_accel as i64 * scale as i64 + hz / 2) / hz;
    if step < 1 {
        1
    } else if step > i32::MAX as i64 {
        i32::MAX
    } else {
        step as i32
    }
}

/// Rate limiter for one axis.
#[derive(Clone, Debug)]
pub struct SpeedRamp {
    /// Current setpoint in sub-units
    current: i32,
    /// Maximum change per tick in sub-units
    step: i32,
    /// Sub-units per native unit
    scale: i32,
}

impl SpeedRamp {
    /// Create a ramp at rest with the given per-tick step (sub-units) and default resolution.
    pub const fn new(step: i32) -> Self {
        Self::with_scale(step, RAMP_SCALE)
    }

    /// Create a ramp at rest with an explicit resolution.
    pub const fn with_scale(step: i32, scale: i32) -> Self {
        Self {
            current: 0,
            step: if step < 1 { 1 } else { step },
            scale: if scale < 1 { 1 } else { scale },
        }
    }

    #[inline]
    pub fn step(&self) -> i32 {
        self.step
    }

    /// Current setpoint at full resolution.
    #[inline]
    pub fn current_fine(&self) -> i32 {
        self.current
    }

    /// Current setpoint in native units, truncated toward zero.
    #[inline]
    pub fn current(&self) -> i32 {
        self.current / self.scale
    }

    /// Drop back to rest.
    pub fn reset(&mut self) {
        self.current = 0;
    }

    /// Advance one tick toward `target` and return the native-unit setpoint.
    ///
    /// With `enabled == false` the setpoint jumps straight to the target. Otherwise it moves by
    /// at most one step and lands exactly on the target once within a step of it.
    pub fn advance(&mut self, target: i32, enabled: bool) -> i32 {
        let goal = target.saturating_mul(self.scale);

        self.current = if enabled {
            let diff = goal as i64 - self.current as i64;
            let step = self.step as i64;
            if diff > step {
                self.current + self.step
            } else if diff < -step {
                self.current - self.step
            } else {
                goal
            }
        } else {
            goal
        };

        self.current()
    }
}
