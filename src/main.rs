// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use core::cell::RefCell;

use cortex_m::interrupt::{free, Mutex};
use cortex_m_rt::entry;
use panic_halt as _;

#[cfg(feature = "defmt")]
use defmt_rtt as _;

use hal::{
    gpio::{gpioc, Output, PushPull},
    pac::{self, interrupt, Interrupt},
    prelude::*,
    serial::Serial,
};
use stm32f7xx_hal as hal;

use quadrive::{
    config::{ConfigError, DrivetrainConfig, LINK_BAUD},
    hw::{
        pins::DirectionPins,
        pwm::BridgeInputs,
        usart::link_config,
        AxisEncoder, BoardPins, DmaTx, HBridgePwm, LinkRx, TickTimer,
    },
    motors::Odometer,
    protocol::{CommandLink, CommandState},
    telemetry::{SendOutcome, Transmitter, TxFlag},
    Drivetrain,
};

type Bridge = HBridgePwm<
    BridgeInputs<'C', 1, 'C', 0>,
    BridgeInputs<'C', 3, 'C', 2>,
    BridgeInputs<'B', 13, 'B', 12>,
    BridgeInputs<'B', 15, 'B', 14>,
>;

type Control = (TickTimer<pac::TIM6>, Drivetrain<'static, AxisEncoder, Bridge>);
type Telemetry = (
    TickTimer<pac::TIM7>,
    Transmitter<'static, DmaTx>,
    gpioc::PC7<Output<PushPull>>,
);
type Link = (LinkRx<pac::USART2>, CommandLink<'static>);

// State shared between interrupts
static COMMANDS: CommandState = CommandState::new();
static ODOMETER: Odometer = Odometer::new();
static TX_FLAG: TxFlag = TxFlag::new();

// Handoff from `main` to the interrupt handlers that own each part
static CONTROL: Mutex<RefCell<Option<Control>>> = Mutex::new(RefCell::new(None));
static TELEMETRY: Mutex<RefCell<Option<Telemetry>>> = Mutex::new(RefCell::new(None));
static LINK: Mutex<RefCell<Option<Link>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let mut cp = cortex_m::Peripherals::take().unwrap();

    // Configuration
    let config = DrivetrainConfig::default();
    if let Err(e) = config.validate() {
        halt(e);
    }

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.sysclk(96.MHz()).freeze();
    let timclk1 = clocks.timclk1().raw();
    let timclk2 = clocks.timclk2().raw();
    let (control_div, telemetry_div) = match config.tick_dividers(timclk1) {
        Ok(dividers) => dividers,
        Err(e) => halt(e),
    };

    // GPIO
    let BoardPins {
        encoders: _,
        pwm: _,
        direction: DirectionPins { a, b, c, d },
        link,
        status_led,
    } = BoardPins::new(dp.GPIOA.split(), dp.GPIOB.split(), dp.GPIOC.split());

    // Motors and encoders
    let counters = AxisEncoder::bank(dp.TIM2, dp.TIM3, dp.TIM4, dp.TIM5);
    let bridge = HBridgePwm::new(dp.TIM1, timclk2, a, b, c, d);
    let drivetrain = Drivetrain::new(&config, counters, bridge, &COMMANDS, &ODOMETER);

    // USART2 link: RX by interrupt, TX by DMA
    let serial = Serial::new(
        dp.USART2,
        (link.tx, link.rx),
        &clocks,
        link_config(LINK_BAUD),
    );
    let rx = LinkRx::new(serial);
    let transmitter = Transmitter::new(DmaTx::new(dp.DMA1), &TX_FLAG);

    // Tick sources
    let control_tick = TickTimer::tim6(dp.TIM6, control_div);
    let telemetry_tick = TickTimer::tim7(dp.TIM7, telemetry_div);

    free(|cs| {
        CONTROL.borrow(cs).replace(Some((control_tick, drivetrain)));
        TELEMETRY
            .borrow(cs)
            .replace(Some((telemetry_tick, transmitter, status_led)));
        LINK.borrow(cs)
            .replace(Some((rx, CommandLink::new(&COMMANDS, &ODOMETER))));
    });

    // Receive preempts everything; the control loop preempts telemetry.
    unsafe {
        cp.NVIC.set_priority(Interrupt::USART2, 0x10);
        cp.NVIC.set_priority(Interrupt::DMA1_STREAM6, 0x20);
        cp.NVIC.set_priority(Interrupt::TIM6_DAC, 0x30);
        cp.NVIC.set_priority(Interrupt::TIM7, 0x40);

        pac::NVIC::unmask(Interrupt::USART2);
        pac::NVIC::unmask(Interrupt::DMA1_STREAM6);
        pac::NVIC::unmask(Interrupt::TIM6_DAC);
        pac::NVIC::unmask(Interrupt::TIM7);
    }

    #[cfg(feature = "defmt")]
    defmt::info!(
        "drivetrain up: control {} Hz, telemetry {} Hz, ramp step {}",
        config.control_hz,
        config.telemetry_hz,
        config.ramp_step()
    );

    loop {
        cortex_m::asm::wfi();
    }
}

/// Park the core before any interrupt is enabled.
fn halt(_e: ConfigError) -> ! {
    #[cfg(feature = "defmt")]
    defmt::error!("invalid drivetrain config: {}", _e);
    loop {
        cortex_m::asm::wfi();
    }
}

#[interrupt]
fn TIM6_DAC() {
    static mut STATE: Option<Control> = None;

    if STATE.is_none() {
        *STATE = free(|cs| CONTROL.borrow(cs).borrow_mut().take());
    }
    if let Some((timer, drivetrain)) = STATE {
        timer.clear_interrupt();
        drivetrain.control_tick();
    }
}

#[interrupt]
fn TIM7() {
    static mut STATE: Option<Telemetry> = None;

    if STATE.is_none() {
        *STATE = free(|cs| TELEMETRY.borrow(cs).borrow_mut().take());
    }
    if let Some((timer, transmitter, led)) = STATE {
        timer.clear_interrupt();
        if transmitter.tick(&COMMANDS, &ODOMETER) == SendOutcome::Sent {
            led.toggle();
        }
    }
}

#[interrupt]
fn USART2() {
    static mut STATE: Option<Link> = None;

    if STATE.is_none() {
        *STATE = free(|cs| LINK.borrow(cs).borrow_mut().take());
    }
    if let Some((rx, link)) = STATE {
        if let Some(byte) = rx.read() {
            link.on_byte(byte);
        }
    }
}

#[interrupt]
fn DMA1_STREAM6() {
    DmaTx::on_interrupt(&TX_FLAG);
}
