// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Closed-loop velocity controller for all four drive axes.
//!
//! The controller owns the encoder counters, the per-axis PID and ramp state, and the actuator.
//! It reads the shared [`CommandState`] written by the receive interrupt. Call
//! [`control_tick`](Drivetrain::control_tick) from the control timer interrupt at the configured
//! rate.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! let mut drivetrain = Drivetrain::new(&config, counters, actuator, &COMMANDS, &ODOMETER);
//!
//! // TIM6 update interrupt, CONTROL_HZ
//! drivetrain.control_tick();
//! ```

use crate::axis::{Axis, AXIS_COUNT};
use crate::config::DrivetrainConfig;
use crate::control::pid::{Pid, PidGains};
use crate::control::ramp::SpeedRamp;
use crate::motors::{Actuator, Odometer, QuadratureCounter, QuadratureTracker};
use crate::protocol::command::CommandState;

/// Controller state and configuration.
pub struct Drivetrain<'a, C, A> {
    encoders: QuadratureTracker<'a, C>,
    actuator: A,
    commands: &'a CommandState,

    pids: [Pid; AXIS_COUNT],
    ramps: [SpeedRamp; AXIS_COUNT],

    /// Ramped target plus bias, as handed to the PID (counts per tick)
    setpoints: [i32; AXIS_COUNT],
    /// Last saturated drive command
    outputs: [i32; AXIS_COUNT],
}

impl<'a, C, A> Drivetrain<'a, C, A>
where
    C: QuadratureCounter,
    A: Actuator,
{
    /// Create a controller at rest. `config` is expected to have passed
    /// [`DrivetrainConfig::validate`].
    pub fn new(
        config: &DrivetrainConfig,
        counters: [C; AXIS_COUNT],
        actuator: A,
        commands: &'a CommandState,
        odometer: &'a Odometer,
    ) -> Self {
        let pid = Pid::new(config.gains)
            .with_integral_limit(config.integral_limit)
            .with_output_limit(config.output_limit);
        let ramp = SpeedRamp::with_scale(config.ramp_step(), config.ramp_scale);

        Self {
            encoders: QuadratureTracker::new(counters, odometer),
            actuator,
            commands,
            pids: [pid.clone(), pid.clone(), pid.clone(), pid],
            ramps: [ramp.clone(), ramp.clone(), ramp.clone(), ramp],
            setpoints: [0; AXIS_COUNT],
            outputs: [0; AXIS_COUNT],
        }
    }

    /// Override the gains of one axis.
    pub fn set_gains(&mut self, axis: Axis, gains: PidGains) {
        self.pids[axis.index()].set_gains(gains);
    }

    #[inline]
    pub fn gains(&self, axis: Axis) -> PidGains {
        self.pids[axis.index()].gains()
    }

    #[inline]
    pub fn pid(&self, axis: Axis) -> &Pid {
        &self.pids[axis.index()]
    }

    #[inline]
    pub fn ramp(&self, axis: Axis) -> &SpeedRamp {
        &self.ramps[axis.index()]
    }

    /// PID input used in the last tick: ramped target plus bias.
    #[inline]
    pub fn setpoint(&self, axis: Axis) -> i32 {
        self.setpoints[axis.index()]
    }

    /// Encoder counts measured in the last tick.
    #[inline]
    pub fn measured(&self, axis: Axis) -> i32 {
        self.encoders.last_delta(axis) as i32
    }

    /// Drive command produced in the last tick.
    #[inline]
    pub fn output(&self, axis: Axis) -> i32 {
        self.outputs[axis.index()]
    }

    /// Scaled accumulated position.
    #[inline]
    pub fn position(&self, axis: Axis) -> i32 {
        self.encoders.position(axis)
    }

    /// Return every axis to rest: PID history, ramps, setpoints, outputs, odometry.
    ///
    /// The actuator is not driven until the next tick.
    pub fn reset(&mut self) {
        for pid in self.pids.iter_mut() {
            pid.reset();
        }
        for ramp in self.ramps.iter_mut() {
            ramp.reset();
        }
        self.setpoints = [0; AXIS_COUNT];
        self.outputs = [0; AXIS_COUNT];
        self.encoders.odometer().clear();
    }

    /// Run one control step on all axes, A through D, and apply the outputs.
    pub fn control_tick(&mut self) -> [i32; AXIS_COUNT] {
        let ramp_enabled = self.commands.ramp_enabled();

        for axis in Axis::ALL {
            let i = axis.index();

            let measured = self.encoders.sample(axis) as i32;

            let target = self.commands.target(axis) as i32;
            let ramped = self.ramps[i].advance(target, ramp_enabled);

            let setpoint = ramped + self.commands.bias(axis) as i32;
            self.setpoints[i] = setpoint;

            self.outputs[i] = self.pids[i].update(setpoint, measured);
        }

        self.actuator.apply(self.outputs);
        self.outputs
    }

    #[inline]
    pub fn actuator(&mut self) -> &mut A {
        &mut self.actuator
    }

    /// Release the counters and actuator.
    pub fn free(self) -> ([C; AXIS_COUNT], A) {
        (self.encoders.free(), self.actuator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OUTPUT_LIMIT;
    use crate::protocol::messages::Command;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counter whose next reading is set from outside through a shared cell.
    #[derive(Clone, Default)]
    struct SharedCounter(Rc<Cell<u16>>);

    impl QuadratureCounter for SharedCounter {
        fn count(&self) -> u16 {
            self.0.get()
        }

        fn clear(&mut self) {
            self.0.set(0);
        }
    }

    #[derive(Default)]
    struct Recorder {
        applied: Vec<[i32; AXIS_COUNT]>,
    }

    impl Actuator for Recorder {
        fn apply(&mut self, outputs: [i32; AXIS_COUNT]) {
            self.applied.push(outputs);
        }
    }

    fn counters() -> ([SharedCounter; AXIS_COUNT], [Rc<Cell<u16>>; AXIS_COUNT]) {
        let counters: [SharedCounter; AXIS_COUNT] = Default::default();
        let handles = [
            counters[0].0.clone(),
            counters[1].0.clone(),
            counters[2].0.clone(),
            counters[3].0.clone(),
        ];
        (counters, handles)
    }

    fn p_only() -> DrivetrainConfig {
        DrivetrainConfig {
            gains: PidGains::from_raw(100, 0, 0),
            ..Default::default()
        }
    }

    #[test]
    fn idle_drivetrain_outputs_zero() {
        let commands = CommandState::new();
        let odometer = Odometer::new();
        let (raw, _) = counters();
        let mut dt = Drivetrain::new(
            &DrivetrainConfig::default(),
            raw,
            Recorder::default(),
            &commands,
            &odometer,
        );

        for _ in 0..50 {
            assert_eq!(dt.control_tick(), [0; AXIS_COUNT]);
        }
        assert_eq!(dt.actuator().applied.len(), 50);
    }

    #[test]
    fn target_plus_bias_feeds_pid() {
        let commands = CommandState::new();
        let odometer = Odometer::new();
        let (raw, handles) = counters();
        let mut dt = Drivetrain::new(&p_only(), raw, Recorder::default(), &commands, &odometer);

        commands.apply(&Command {
            targets: [10, -10, 0, 20],
            ramp_enabled: false,
            bias: [5, 0, -3, 0],
        });
        handles[3].set(8);

        let out = dt.control_tick();
        assert_eq!(dt.setpoint(Axis::A), 15);
        assert_eq!(dt.setpoint(Axis::C), -3);
        assert_eq!(dt.measured(Axis::D), 8);
        // Kp = 1.00
        assert_eq!(out, [15, -10, -3, 12]);
        assert_eq!(dt.actuator().applied, vec![out]);
        assert_eq!(handles[3].get(), 0);
    }

    #[test]
    fn ramp_limits_setpoint_slew() {
        let commands = CommandState::new();
        let odometer = Odometer::new();
        let (raw, _) = counters();
        let config = p_only();
        let step = config.ramp_step();
        let mut dt = Drivetrain::new(&config, raw, Recorder::default(), &commands, &odometer);

        commands.apply(&Command {
            targets: [100, 0, 0, 0],
            ramp_enabled: true,
            bias: [0; 4],
        });

        let expected_ticks = (100 * config.ramp_scale + step - 1) / step;
        let mut last = 0;
        let mut ticks = 0;
        while dt.ramp(Axis::A).current_fine() != 100 * config.ramp_scale {
            dt.control_tick();
            ticks += 1;
            let fine = dt.ramp(Axis::A).current_fine();
            assert!(fine - last <= step && fine > last);
            last = fine;
        }
        assert_eq!(ticks, expected_ticks);
        assert_eq!(dt.setpoint(Axis::A), 100);
    }

    #[test]
    fn disabling_ramp_jumps_next_tick() {
        let commands = CommandState::new();
        let odometer = Odometer::new();
        let (raw, _) = counters();
        let mut dt = Drivetrain::new(&p_only(), raw, Recorder::default(), &commands, &odometer);

        let mut cmd = Command {
            targets: [100, 0, 0, 0],
            ramp_enabled: true,
            bias: [0; 4],
        };
        commands.apply(&cmd);
        dt.control_tick();
        assert!(dt.setpoint(Axis::A) < 100);

        cmd.ramp_enabled = false;
        commands.apply(&cmd);
        dt.control_tick();
        assert_eq!(dt.setpoint(Axis::A), 100);
    }

    #[test]
    fn outputs_stay_saturated() {
        let commands = CommandState::new();
        let odometer = Odometer::new();
        let (raw, handles) = counters();
        let mut dt = Drivetrain::new(
            &DrivetrainConfig::default(),
            raw,
            Recorder::default(),
            &commands,
            &odometer,
        );

        for axis in Axis::ALL {
            commands.set_target(axis, 127);
        }
        for _ in 0..200 {
            handles[1].set(0u16.wrapping_sub(300));
            let out = dt.control_tick();
            assert!(out.iter().all(|o| o.abs() <= OUTPUT_LIMIT));
            for axis in Axis::ALL {
                assert!(dt.pid(axis).integral().abs() <= crate::config::INTEGRAL_LIMIT);
            }
        }
        assert_eq!(dt.output(Axis::A), OUTPUT_LIMIT);
    }

    #[test]
    fn per_axis_gains_override() {
        let commands = CommandState::new();
        let odometer = Odometer::new();
        let (raw, _) = counters();
        let mut dt = Drivetrain::new(&p_only(), raw, Recorder::default(), &commands, &odometer);
        dt.set_gains(Axis::B, PidGains::from_raw(300, 0, 0));

        for axis in Axis::ALL {
            commands.set_target(axis, 4);
        }
        assert_eq!(dt.control_tick(), [4, 12, 4, 4]);
        assert_eq!(dt.gains(Axis::B), PidGains::from_raw(300, 0, 0));
    }

    #[test]
    fn torn_command_converges_next_tick() {
        let commands = CommandState::new();
        let odometer = Odometer::new();
        let (raw, _) = counters();
        let mut dt = Drivetrain::new(&p_only(), raw, Recorder::default(), &commands, &odometer);

        // A tick lands after the receive interrupt stored only the first two targets.
        commands.set_target(Axis::A, 30);
        commands.set_target(Axis::B, 30);
        assert_eq!(dt.control_tick(), [30, 30, 0, 0]);

        commands.apply(&Command {
            targets: [30; 4],
            ramp_enabled: false,
            bias: [0; 4],
        });
        assert_eq!(dt.control_tick(), [30; 4]);
    }

    #[test]
    fn reset_returns_to_rest() {
        let commands = CommandState::new();
        let odometer = Odometer::new();
        let (raw, handles) = counters();
        let mut dt = Drivetrain::new(
            &DrivetrainConfig::default(),
            raw,
            Recorder::default(),
            &commands,
            &odometer,
        );

        commands.set_target(Axis::C, 50);
        handles[2].set(400);
        dt.control_tick();
        assert_ne!(dt.pid(Axis::C).integral(), 0);
        assert_eq!(dt.position(Axis::C), 4);

        dt.reset();
        for axis in Axis::ALL {
            assert_eq!(dt.pid(axis).integral(), 0);
            assert_eq!(dt.ramp(axis).current_fine(), 0);
            assert_eq!(dt.output(axis), 0);
            assert_eq!(dt.position(axis), 0);
            assert_eq!(dt.measured(axis), 0);
        }
    }
}
