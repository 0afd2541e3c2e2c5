// The SoC's UART bridge exposes a four-register AXI-lite block.
use crate::io;
use bitflags::bitflags;

const UART_RX_FIFO: usize = 0x00; // Receive FIFO (read)
const UART_TX_FIFO: usize = 0x04; // Transmit FIFO (write)
const UART_STAT: usize = 0x08; // Status register
const UART_CTRL: usize = 0x0c; // Control register

bitflags! {
    pub struct UartStat: u32 {
        const RX_NOT_EMPTY = 0x1;
        const TX_EMPTY = 0x4;
        const TX_FULL = 0x8;
    }
}

bitflags! {
    pub struct UartCtrl: u32 {
        const TX_RESET = 0x1;
        const RX_RESET = 0x2;
    }
}

pub struct Uart {
    base: usize,
}

impl Uart {
    /// # Safety
    ///
    /// `base` must be the base address of the UART register block.
    pub const unsafe fn new(base: usize) -> Self {
        Uart { base }
    }

    fn write(&self, offset: usize, val: u32) {
        unsafe { io::write32(self.base + offset, val) }
    }

    fn read(&self, offset: usize) -> u32 {
        unsafe { io::read32(self.base + offset) }
    }

    fn stat(&self) -> UartStat {
        UartStat::from_bits_truncate(self.read(UART_STAT))
    }

    /// Drop anything buffered in either FIFO.
    pub fn init(&self) {
        self.write(UART_CTRL, (UartCtrl::TX_RESET | UartCtrl::RX_RESET).bits());
    }

    /// Blocking send of one byte.
    pub fn put(&self, c: u8) {
        // wait for the transmitter to drain
        while !self.stat().contains(UartStat::TX_EMPTY) {}
        self.write(UART_TX_FIFO, c as u32);
    }

    /// Blocking receive of one byte.
    pub fn get(&self) -> u8 {
        while !self.stat().contains(UartStat::RX_NOT_EMPTY) {}
        self.read(UART_RX_FIFO) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_waits_for_tx_empty_then_writes() {
        let space = vec![0u32, 0, UartStat::TX_EMPTY.bits(), 0];
        let uart = unsafe { Uart::new(space.as_ptr() as usize) };
        uart.put(b'U');
        assert_eq!(space[UART_TX_FIFO / 4], b'U' as u32);
    }

    #[test]
    fn get_returns_the_rx_fifo_byte() {
        let space = vec![b'#' as u32, 0, UartStat::RX_NOT_EMPTY.bits(), 0];
        let uart = unsafe { Uart::new(space.as_ptr() as usize) };
        assert_eq!(uart.get(), b'#');
    }

    #[test]
    fn init_resets_both_fifos() {
        let space = vec![0u32; 4];
        let uart = unsafe { Uart::new(space.as_ptr() as usize) };
        uart.init();
        assert_eq!(space[UART_CTRL / 4], 0x3);
    }
}
