// Xilinx AXI GPIO, https://docs.amd.com/v/u/en-US/pg144-axi-gpio
//
// Single-channel configuration with a 16-bit pin vector, so the channel 2
// registers are never touched.
use crate::io;
use bitflags::bitflags;

const GPIO_DATA: usize = 0x0000; // Data register
const GPIO_TRI: usize = 0x0004; // Direction register (1 = input)
const GIER: usize = 0x011c; // Global interrupt enable register
const IP_ISR: usize = 0x0120; // Interrupt status register
const IP_IER: usize = 0x0128; // Interrupt enable register

// Channel 1 bit in IP_IER / IP_ISR
const CHANNEL_1: u32 = 0x1;
// Master enable bit in GIER
const GIER_ENABLE: u32 = 0x8000_0000;

bitflags! {
    /// The 16 pins of the single wired channel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Pins: u16 {
        const PIN_0 = 1 << 0;
        const PIN_1 = 1 << 1;
        const PIN_2 = 1 << 2;
        const PIN_3 = 1 << 3;
        const PIN_4 = 1 << 4;
        const PIN_5 = 1 << 5;
        const PIN_6 = 1 << 6;
        const PIN_7 = 1 << 7;
        const PIN_8 = 1 << 8;
        const PIN_9 = 1 << 9;
        const PIN_10 = 1 << 10;
        const PIN_11 = 1 << 11;
        const PIN_12 = 1 << 12;
        const PIN_13 = 1 << 13;
        const PIN_14 = 1 << 14;
        const PIN_15 = 1 << 15;
    }
}

pub struct Gpio {
    base: usize,
}

impl Gpio {
    /// # Safety
    ///
    /// `base` must be the base address of an AXI GPIO block.
    pub const unsafe fn new(base: usize) -> Self {
        Gpio { base }
    }

    fn write(&self, offset: usize, val: u32) {
        unsafe { io::write32(self.base + offset, val) }
    }

    fn read(&self, offset: usize) -> u32 {
        unsafe { io::read32(self.base + offset) }
    }

    /// Switch `pins` to input. Not an atomic RMW; direction is settled
    /// once at init.
    pub fn set_input(&self, pins: Pins) {
        let tri = self.read(GPIO_TRI);
        self.write(GPIO_TRI, tri | pins.bits() as u32);
    }

    /// Switch `pins` to output.
    pub fn set_output(&self, pins: Pins) {
        let tri = self.read(GPIO_TRI);
        self.write(GPIO_TRI, tri & !(pins.bits() as u32));
    }

    pub fn read_pins(&self) -> Pins {
        Pins::from_bits_truncate(unsafe { io::read16(self.base + GPIO_DATA) })
    }

    pub fn write_pins(&self, pins: Pins) {
        unsafe { io::write16(self.base + GPIO_DATA, pins.bits()) }
    }

    /// Flip `pins` in the data register, leaving the rest alone.
    pub fn toggle(&self, pins: Pins) {
        let cur = unsafe { io::read16(self.base + GPIO_DATA) };
        unsafe { io::write16(self.base + GPIO_DATA, cur ^ pins.bits()) }
    }

    /// Arm the channel interrupt: channel 1 in IP_IER, then the master
    /// bit in GIER.
    pub fn enable_interrupt(&self) {
        self.write(IP_IER, CHANNEL_1);
        self.write(GIER, GIER_ENABLE);
    }

    /// Acknowledge a pending channel interrupt (IP_ISR is
    /// toggle-on-write).
    pub fn clear_interrupt(&self) {
        self.write(IP_ISR, CHANNEL_1);
    }
}
