// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! H-bridge drive for the four motors.
//!
//! TIM1 CH1..CH4 (PA8..PA11) generate the duty cycle for axes A..D through direct PAC register
//! access. Each axis also has an IN1/IN2 direction pair on GPIO.

use stm32f7xx_hal::{
    gpio::{self, Output, PushPull},
    pac,
};

use crate::axis::AXIS_COUNT;
use crate::config::OUTPUT_LIMIT;
use crate::motors::{Actuator, HBridgeDrive};

/// PWM carrier frequency (Hz).
pub const PWM_HZ: u32 = 20_000;

/// Two direction inputs of one H-bridge channel.
pub trait BridgeDirection {
    fn set_inputs(&mut self, in1: bool, in2: bool);
}

/// IN1/IN2 pair on any two GPIO pins.
pub struct BridgeInputs<const P1: char, const N1: u8, const P2: char, const N2: u8> {
    in1: gpio::Pin<P1, N1, Output<PushPull>>,
    in2: gpio::Pin<P2, N2, Output<PushPull>>,
}

impl<const P1: char, const N1: u8, const P2: char, const N2: u8> BridgeInputs<P1, N1, P2, N2> {
    /// Wrap both inputs and drive them low (bridge coasting).
    pub fn new(
        mut in1: gpio::Pin<P1, N1, Output<PushPull>>,
        mut in2: gpio::Pin<P2, N2, Output<PushPull>>,
    ) -> Self {
        in1.set_low();
        in2.set_low();
        Self { in1, in2 }
    }
}

impl<const P1: char, const N1: u8, const P2: char, const N2: u8> BridgeDirection
    for BridgeInputs<P1, N1, P2, N2>
{
    fn set_inputs(&mut self, in1: bool, in2: bool) {
        if in1 {
            self.in1.set_high();
        } else {
            self.in1.set_low();
        }
        if in2 {
            self.in2.set_high();
        } else {
            self.in2.set_low();
        }
    }
}

/// Four H-bridge channels sharing TIM1.
pub struct HBridgePwm<DA, DB, DC, DD> {
    tim: pac::TIM1,
    a: DA,
    b: DB,
    c: DC,
    d: DD,
}

impl<DA, DB, DC, DD> HBridgePwm<DA, DB, DC, DD>
where
    DA: BridgeDirection,
    DB: BridgeDirection,
    DC: BridgeDirection,
    DD: BridgeDirection,
{
    /// Configure TIM1 for edge-aligned PWM with a `0..=OUTPUT_LIMIT` compare range.
    ///
    /// `timclk_hz` is the APB2 timer clock. The CH1..CH4 pins must already be in their TIM1
    /// alternate function.
    pub fn new(tim: pac::TIM1, timclk_hz: u32, a: DA, b: DB, c: DC, d: DD) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.tim1en().set_bit());

        let period = OUTPUT_LIMIT as u32;
        let psc = (timclk_hz / (PWM_HZ * period)).max(1) - 1;

        tim.cr1.modify(|_, w| w.cen().clear_bit());
        tim.psc.write(|w| unsafe { w.bits(psc) });
        tim.arr.write(|w| unsafe { w.bits(period - 1) });

        // PWM mode 1 with preload on all four channels
        tim.ccmr1_output().write(|w| unsafe { w.bits(0x6868) });
        tim.ccmr2_output().write(|w| unsafe { w.bits(0x6868) });

        // CC1E..CC4E, active high
        tim.ccer.write(|w| unsafe { w.bits(0x1111) });

        // Advanced timer: main output enable
        tim.bdtr.modify(|_, w| w.moe().set_bit());

        // Load shadow registers, then start with ARR preload
        tim.egr.write(|w| w.ug().set_bit());
        tim.cr1.modify(|_, w| w.arpe().set_bit().cen().set_bit());

        let mut pwm = Self { tim, a, b, c, d };
        pwm.apply([0; AXIS_COUNT]);
        pwm
    }

    fn set_duty(&mut self, channel: usize, duty: u16) {
        match channel {
            0 => self.tim.ccr1().write(|w| unsafe { w.ccr().bits(duty) }),
            1 => self.tim.ccr2().write(|w| unsafe { w.ccr().bits(duty) }),
            2 => self.tim.ccr3().write(|w| unsafe { w.ccr().bits(duty) }),
            _ => self.tim.ccr4().write(|w| unsafe { w.ccr().bits(duty) }),
        }
    }
}

impl<DA, DB, DC, DD> Actuator for HBridgePwm<DA, DB, DC, DD>
where
    DA: BridgeDirection,
    DB: BridgeDirection,
    DC: BridgeDirection,
    DD: BridgeDirection,
{
    fn apply(&mut self, outputs: [i32; AXIS_COUNT]) {
        for (channel, &output) in outputs.iter().enumerate() {
            let drive = HBridgeDrive::from_output(output, OUTPUT_LIMIT as u16);
            let (in1, in2) = drive.inputs();
            match channel {
                0 => self.a.set_inputs(in1, in2),
                1 => self.b.set_inputs(in1, in2),
                2 => self.c.set_inputs(in1, in2),
                _ => self.d.set_inputs(in1, in2),
            }
            self.set_duty(channel, drive.duty);
        }
    }
}
