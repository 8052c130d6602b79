// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Quadrature odometry.
//!
//! Each axis has a hardware counter in encoder mode. Once per control tick the counter is read,
//! interpreted as a signed 16-bit delta and cleared, so the counter itself is the delta since the
//! previous tick. The delta is correct as long as the motor moves fewer than 32768 counts per
//! tick.
//!
//! Accumulated positions and the latest per-tick deltas live in an [`Odometer`] built from
//! atomics. The control tick writes it, the telemetry tick reads it and the receive interrupt may
//! zero the positions at any time (out-of-band reset), so it is shared by reference rather than
//! owned by the tracker.

use core::sync::atomic::{AtomicI32, Ordering};

use crate::axis::{Axis, AXIS_COUNT};
use crate::config::POSITION_DIVISOR;

/// Hardware counter in quadrature mode.
pub trait QuadratureCounter {
    /// Read the low 16 bits of the counter.
    fn count(&self) -> u16;

    /// Set the counter back to zero.
    fn clear(&mut self);
}

/// Accumulated encoder positions and last measured speeds for all four axes.
pub struct Odometer {
    counts: [AtomicI32; AXIS_COUNT],
    speeds: [AtomicI32; AXIS_COUNT],
    divisor: i32,
}

impl Odometer {
    /// Create an odometer at zero with the default position divisor.
    pub const fn new() -> Self {
        Self::with_divisor(POSITION_DIVISOR)
    }

    /// Create an odometer at zero. A non-positive divisor is treated as 1.
    pub const fn with_divisor(divisor: i32) -> Self {
        Self {
            counts: [
                AtomicI32::new(0),
                AtomicI32::new(0),
                AtomicI32::new(0),
                AtomicI32::new(0),
            ],
            speeds: [
                AtomicI32::new(0),
                AtomicI32::new(0),
                AtomicI32::new(0),
                AtomicI32::new(0),
            ],
            divisor: if divisor < 1 { 1 } else { divisor },
        }
    }

    /// Add one tick's delta to an axis and remember it as the measured speed.
    ///
    /// The position wraps on overflow like the counter it mirrors.
    #[inline]
    pub fn record(&self, axis: Axis, delta: i32) {
        self.counts[axis.index()].fetch_add(delta, Ordering::Relaxed);
        self.speeds[axis.index()].store(delta, Ordering::Relaxed);
    }

    /// Counts seen in the most recent control tick.
    #[inline]
    pub fn speed(&self, axis: Axis) -> i32 {
        self.speeds[axis.index()].load(Ordering::Relaxed)
    }

    /// Raw accumulated counts.
    #[inline]
    pub fn counts(&self, axis: Axis) -> i32 {
        self.counts[axis.index()].load(Ordering::Relaxed)
    }

    /// Accumulated counts divided by the position divisor, truncated toward zero.
    #[inline]
    pub fn position(&self, axis: Axis) -> i32 {
        self.counts(axis) / self.divisor
    }

    /// Zero every accumulated position. Measured speeds and the hardware counters are not
    /// touched.
    pub fn reset_all(&self) {
        for count in &self.counts {
            count.store(0, Ordering::Relaxed);
        }
    }

    /// Zero positions and measured speeds.
    pub fn clear(&self) {
        self.reset_all();
        for speed in &self.speeds {
            speed.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for Odometer {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-axis delta sampler over four hardware counters.
pub struct QuadratureTracker<'a, C> {
    counters: [C; AXIS_COUNT],
    odometer: &'a Odometer,
}

impl<'a, C: QuadratureCounter> QuadratureTracker<'a, C> {
    /// Take ownership of the counters, clearing each to establish a zero baseline.
    pub fn new(mut counters: [C; AXIS_COUNT], odometer: &'a Odometer) -> Self {
        for counter in counters.iter_mut() {
            counter.clear();
        }
        Self { counters, odometer }
    }

    /// Read and clear one counter, add the delta to the odometer and return it.
    pub fn sample(&mut self, axis: Axis) -> i16 {
        let counter = &mut self.counters[axis.index()];
        // Baseline is zero, so the two's-complement reading is the wrapped delta.
        let delta = counter.count() as i16;
        counter.clear();

        self.odometer.record(axis, delta as i32);
        delta
    }

    /// Delta returned by the most recent [`sample`](Self::sample) of `axis`.
    #[inline]
    pub fn last_delta(&self, axis: Axis) -> i16 {
        self.odometer.speed(axis) as i16
    }

    /// Scaled accumulated position of `axis`.
    #[inline]
    pub fn position(&self, axis: Axis) -> i32 {
        self.odometer.position(axis)
    }

    #[inline]
    pub fn odometer(&self) -> &'a Odometer {
        self.odometer
    }

    pub fn free(self) -> [C; AXIS_COUNT] {
        self.counters
    }
}
