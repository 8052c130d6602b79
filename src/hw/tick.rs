// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Periodic update interrupts from the basic timers.
//!
//! TIM6 paces the control loop and TIM7 the telemetry stream.

use stm32f7xx_hal::pac;

use crate::config::TimerDivider;

pub struct TickTimer<TIM> {
    tim: TIM,
}

macro_rules! tick_timer {
    ($($TIM:ident: ($ctor:ident, $en:ident),)+) => {$(
        impl TickTimer<pac::$TIM> {
            /// Start the timer with its update interrupt enabled.
            ///
            /// `divider` comes from [`DrivetrainConfig::tick_dividers`] for the APB1 timer clock.
            ///
            /// [`DrivetrainConfig::tick_dividers`]: crate::config::DrivetrainConfig::tick_dividers
            pub fn $ctor(tim: pac::$TIM, divider: TimerDivider) -> Self {
                let rcc = unsafe { &*pac::RCC::ptr() };
                rcc.apb1enr.modify(|_, w| w.$en().set_bit());

                tim.cr1.modify(|_, w| w.cen().clear_bit());
                tim.psc.write(|w| unsafe { w.bits(divider.prescaler as u32) });
                tim.arr.write(|w| unsafe { w.bits(divider.reload as u32) });

                // Latch PSC/ARR without raising an interrupt
                tim.cr1.modify(|_, w| w.urs().set_bit());
                tim.egr.write(|w| w.ug().set_bit());
                tim.sr.write(|w| unsafe { w.bits(0) });

                tim.dier.modify(|_, w| w.uie().set_bit());
                tim.cr1.modify(|_, w| w.cen().set_bit());

                Self { tim }
            }

            /// Acknowledge the update interrupt. Call first thing in the handler.
            #[inline]
            pub fn clear_interrupt(&mut self) {
                self.tim.sr.write(|w| unsafe { w.bits(0) });
            }
        }
    )+};
}

tick_timer! {
    TIM6: (tim6, tim6en),
    TIM7: (tim7, tim7en),
}
