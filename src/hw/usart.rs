// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART2 host link.
//!
//! Receive is interrupt driven, one byte per RXNE interrupt. Transmit hands whole telemetry frames
//! to DMA1 stream 6 (channel 4) and returns immediately; the stream's transfer-complete and error
//! interrupts report back through [`DmaTx::on_interrupt`].
//!
//! To watch the raw link on the host machine, use
//! ```text
//! $ screen /dev/tty.usbmodem* 115200
//! ```

use stm32f7xx_hal::{
    pac,
    prelude::*,
    serial::{self, Event, Instance, Pins, Rx, Serial},
};

use crate::telemetry::{Transmit, TxFlag};

const STREAM: usize = 6;
const CHANNEL: u32 = 4;

// DMA_SxCR bits
const CR_EN: u32 = 1 << 0;
const CR_DMEIE: u32 = 1 << 1;
const CR_TEIE: u32 = 1 << 2;
const CR_TCIE: u32 = 1 << 4;
const CR_DIR_M2P: u32 = 0b01 << 6;
const CR_MINC: u32 = 1 << 10;
const CR_CHSEL_SHIFT: u32 = 25;

// DMA_HISR / DMA_HIFCR bits for stream 6
const HISR_FEIF6: u32 = 1 << 16;
const HISR_DMEIF6: u32 = 1 << 18;
const HISR_TEIF6: u32 = 1 << 19;
const HISR_HTIF6: u32 = 1 << 20;
const HISR_TCIF6: u32 = 1 << 21;
const HISR_ALL6: u32 = HISR_FEIF6 | HISR_DMEIF6 | HISR_TEIF6 | HISR_HTIF6 | HISR_TCIF6;

// USART_CR3.DMAT
const CR3_DMAT: u32 = 1 << 7;

/// Receive half of the link.
pub struct LinkRx<U: Instance> {
    rx: Rx<U>,
}

impl<U: Instance> LinkRx<U> {
    /// Split `serial`, enable the RXNE interrupt and keep the receive half.
    ///
    /// The transmit half is left to DMA; see [`DmaTx`].
    pub fn new<PINS: Pins<U>>(mut serial: Serial<U, PINS>) -> Self {
        serial.listen(Event::Rxne);
        let (_tx, rx) = serial.split();
        Self { rx }
    }

    /// Read the byte that raised RXNE. `None` on overrun, framing or noise errors.
    #[inline]
    pub fn read(&mut self) -> Option<u8> {
        match self.rx.read() {
            Ok(b) => Some(b),
            Err(nb::Error::WouldBlock) => None,
            Err(nb::Error::Other(_e)) => {
                warn!("link rx error");
                None
            }
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaTxError {
    /// Stream still enabled from a previous transfer.
    StreamBusy,
    /// Zero-length or oversized buffer.
    Length(usize),
}

/// DMA transmit half of USART2.
pub struct DmaTx {
    dma: pac::DMA1,
}

impl DmaTx {
    /// Enable DMA1 and route USART2 TX requests to it.
    pub fn new(dma: pac::DMA1) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.ahb1enr.modify(|_, w| w.dma1en().set_bit());

        let usart = unsafe { &*pac::USART2::ptr() };
        usart.cr3.modify(|r, w| unsafe { w.bits(r.bits() | CR3_DMAT) });

        let st = &dma.st[STREAM];
        st.cr.write(|w| unsafe { w.bits(0) });
        dma.hifcr.write(|w| unsafe { w.bits(HISR_ALL6) });

        Self { dma }
    }

    /// Handle the DMA1_STREAM6 interrupt: acknowledge the stream flags and release `flag`.
    pub fn on_interrupt(flag: &TxFlag) {
        let dma = unsafe { &*pac::DMA1::ptr() };
        let status = dma.hisr.read().bits() & HISR_ALL6;
        dma.hifcr.write(|w| unsafe { w.bits(status) });

        if status & (HISR_TEIF6 | HISR_DMEIF6) != 0 {
            flag.fail();
        } else if status & HISR_TCIF6 != 0 {
            flag.complete();
        }
    }
}

impl Transmit for DmaTx {
    type Error = DmaTxError;

    fn start(&mut self, bytes: &[u8]) -> Result<(), DmaTxError> {
        if bytes.is_empty() || bytes.len() > u16::MAX as usize {
            return Err(DmaTxError::Length(bytes.len()));
        }

        let st = &self.dma.st[STREAM];
        if st.cr.read().bits() & CR_EN != 0 {
            return Err(DmaTxError::StreamBusy);
        }

        let usart = unsafe { &*pac::USART2::ptr() };
        let tdr = &usart.tdr as *const _ as u32;

        self.dma.hifcr.write(|w| unsafe { w.bits(HISR_ALL6) });
        st.par.write(|w| unsafe { w.bits(tdr) });
        st.m0ar.write(|w| unsafe { w.bits(bytes.as_ptr() as u32) });
        st.ndtr.write(|w| unsafe { w.bits(bytes.len() as u32) });
        st.cr.write(|w| unsafe {
            w.bits(
                (CHANNEL << CR_CHSEL_SHIFT)
                    | CR_MINC
                    | CR_DIR_M2P
                    | CR_TCIE
                    | CR_TEIE
                    | CR_DMEIE
                    | CR_EN,
            )
        });

        Ok(())
    }
}

/// Default link configuration at `baud`.
pub fn link_config(baud: u32) -> serial::Config {
    serial::Config {
        baud_rate: baud.bps(),
        ..Default::default()
    }
}
