// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the drivetrain controller board (STM32F7).

use stm32f7xx_hal::gpio::{gpioa, gpiob, gpioc, Alternate, Output, PushPull};

use super::pwm::BridgeInputs;

pub struct BoardPins {
    pub encoders: EncoderPins,
    pub pwm: PwmPins,
    pub direction: DirectionPins,
    pub link: LinkPins,
    pub status_led: gpioc::PC7<Output<PushPull>>,
}

/// Encoder inputs, CH1/CH2 of TIM2..TIM5.
pub struct EncoderPins {
    pub a: (gpioa::PA15<Alternate<1>>, gpiob::PB3<Alternate<1>>),
    pub b: (gpioa::PA6<Alternate<2>>, gpioa::PA7<Alternate<2>>),
    pub c: (gpiob::PB6<Alternate<2>>, gpiob::PB7<Alternate<2>>),
    pub d: (gpioa::PA0<Alternate<2>>, gpioa::PA1<Alternate<2>>),
}

/// TIM1 CH1..CH4.
pub struct PwmPins {
    pub a: gpioa::PA8<Alternate<1>>,
    pub b: gpioa::PA9<Alternate<1>>,
    pub c: gpioa::PA10<Alternate<1>>,
    pub d: gpioa::PA11<Alternate<1>>,
}

/// H-bridge IN1/IN2 per axis.
pub struct DirectionPins {
    pub a: BridgeInputs<'C', 1, 'C', 0>,
    pub b: BridgeInputs<'C', 3, 'C', 2>,
    pub c: BridgeInputs<'B', 13, 'B', 12>,
    pub d: BridgeInputs<'B', 15, 'B', 14>,
}

/// USART2 host link.
pub struct LinkPins {
    pub tx: gpioa::PA2<Alternate<7>>,
    pub rx: gpioa::PA3<Alternate<7>>,
}

impl BoardPins {
    pub fn new(gpioa: gpioa::Parts, gpiob: gpiob::Parts, gpioc: gpioc::Parts) -> Self {
        Self {
            encoders: EncoderPins {
                a: (gpioa.pa15.into_alternate(), gpiob.pb3.into_alternate()),
                b: (gpioa.pa6.into_alternate(), gpioa.pa7.into_alternate()),
                c: (gpiob.pb6.into_alternate(), gpiob.pb7.into_alternate()),
                d: (gpioa.pa0.into_alternate(), gpioa.pa1.into_alternate()),
            },
            pwm: PwmPins {
                a: gpioa.pa8.into_alternate(),
                b: gpioa.pa9.into_alternate(),
                c: gpioa.pa10.into_alternate(),
                d: gpioa.pa11.into_alternate(),
            },
            direction: DirectionPins {
                a: BridgeInputs::new(
                    gpioc.pc1.into_push_pull_output(),
                    gpioc.pc0.into_push_pull_output(),
                ),
                b: BridgeInputs::new(
                    gpioc.pc3.into_push_pull_output(),
                    gpioc.pc2.into_push_pull_output(),
                ),
                c: BridgeInputs::new(
                    gpiob.pb13.into_push_pull_output(),
                    gpiob.pb12.into_push_pull_output(),
                ),
                d: BridgeInputs::new(
                    gpiob.pb15.into_push_pull_output(),
                    gpiob.pb14.into_push_pull_output(),
                ),
            },
            link: LinkPins {
                tx: gpioa.pa2.into_alternate(),
                rx: gpioa.pa3.into_alternate(),
            },
            status_led: gpioc.pc7.into_push_pull_output(),
        }
    }
}
