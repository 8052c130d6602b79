// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Quadrature encoder support via STM32F7 timers in encoder mode.
//!
//! TIM2, TIM3, TIM4 and TIM5 are configured for encoder mode 3 with a 16-bit reload, one timer
//! per drive axis. The control tick reads and clears each counter once per period, so 16 bits are
//! plenty and the 32-bit timers (TIM2, TIM5) wrap the same way as the 16-bit ones.

use stm32f7xx_hal::pac;

use crate::motors::QuadratureCounter;

pub struct Encoder<TIM> {
    tim: TIM,
}

macro_rules! encoder_timer {
    ($($TIM:ident: ($ctor:ident, $en:ident),)+) => {$(
        // ARR/CNT `bits` writes are unsafe on the 16-bit timers only
        #[allow(unused_unsafe)]
        impl Encoder<pac::$TIM> {
            /// Configure the timer as a quadrature encoder with a 16-bit range.
            pub fn $ctor(tim: pac::$TIM) -> Self {
                let rcc = unsafe { &*pac::RCC::ptr() };
                rcc.apb1enr.modify(|_, w| w.$en().set_bit());

                // Disable counter while configuring
                tim.cr1.modify(|_, w| w.cen().clear_bit());

                // Auto-reload: 16-bit wrap on every timer
                tim.arr.write(|w| unsafe { w.bits(0xFFFF) });

                // Slave mode: encoder mode 3 (count on both TI1 and TI2)
                tim.smcr.modify(|_, w| w.sms().bits(0b011));

                // Configure CH1/CH2 as inputs from TI1/TI2
                tim.ccmr1_input().modify(|_, w| w.cc1s().ti1().cc2s().ti2());

                // Polarity and enable for both channels.
                tim.ccer.modify(|_, w| {
                    w.cc1p()
                        .clear_bit()
                        .cc2p()
                        .clear_bit()
                        .cc1e()
                        .set_bit()
                        .cc2e()
                        .set_bit()
                });

                // Reset the counter
                tim.cnt.write(|w| unsafe { w.bits(0) });

                // Enable the counter
                tim.cr1.modify(|_, w| w.cen().set_bit());

                Self { tim }
            }
        }

        #[allow(unused_unsafe)]
        impl QuadratureCounter for Encoder<pac::$TIM> {
            #[inline]
            fn count(&self) -> u16 {
                self.tim.cnt.read().bits() as u16
            }

            #[inline]
            fn clear(&mut self) {
                self.tim.cnt.write(|w| unsafe { w.bits(0) });
            }
        }
    )+};
}

encoder_timer! {
    TIM2: (tim2, tim2en),
    TIM3: (tim3, tim3en),
    TIM4: (tim4, tim4en),
    TIM5: (tim5, tim5en),
}

/// One encoder per drive axis, so the four timers fit in a single `[_; AXIS_COUNT]` bank.
pub enum AxisEncoder {
    A(Encoder<pac::TIM2>),
    B(Encoder<pac::TIM3>),
    C(Encoder<pac::TIM4>),
    D(Encoder<pac::TIM5>),
}

impl AxisEncoder {
    /// Configure all four timers and return them in axis order.
    pub fn bank(
        tim2: pac::TIM2,
        tim3: pac::TIM3,
        tim4: pac::TIM4,
        tim5: pac::TIM5,
    ) -> [AxisEncoder; 4] {
        [
            AxisEncoder::A(Encoder::tim2(tim2)),
            AxisEncoder::B(Encoder::tim3(tim3)),
            AxisEncoder::C(Encoder::tim4(tim4)),
            AxisEncoder::D(Encoder::tim5(tim5)),
        ]
    }
}

impl QuadratureCounter for AxisEncoder {
    fn count(&self) -> u16 {
        match self {
            AxisEncoder::A(e) => e.count(),
            AxisEncoder::B(e) => e.count(),
            AxisEncoder::C(e) => e.count(),
            AxisEncoder::D(e) => e.count(),
        }
    }

    fn clear(&mut self) {
        match self {
            AxisEncoder::A(e) => e.clear(),
            AxisEncoder::B(e) => e.clear(),
            AxisEncoder::C(e) => e.clear(),
            AxisEncoder::D(e) => e.clear(),
        }
    }
}
