// Xilinx AXI Timer, https://docs.amd.com/v/u/en-US/pg079-axi-timer
//
// Only timer 0 of the block is wired on this SoC.
use crate::io;
use bitflags::bitflags;

const TIM_CSR: usize = 0x0000; // Control/status register (TCSR0)
const TIM_TLR: usize = 0x0004; // Load register (TLR0)
const TIM_TCR: usize = 0x0008; // Counter register (TCR0)

bitflags! {
    /// TCSR0 bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TimCsr: u32 {
        /// Count down instead of up.
        const UDT0 = 1 << 1;
        /// Auto-reload from TLR0 on carry instead of holding.
        const ARHT0 = 1 << 4;
        /// Latch TLR0 into the counter.
        const LOAD0 = 1 << 5;
        /// Interrupt enable.
        const ENIT0 = 1 << 6;
        /// Timer enable.
        const ENT0 = 1 << 7;
        /// Interrupt pending; write back to clear.
        const T0INT = 1 << 8;
    }
}

pub struct Tim {
    base: usize,
}

impl Tim {
    /// # Safety
    ///
    /// `base` must be the base address of an AXI Timer block.
    pub const unsafe fn new(base: usize) -> Self {
        Tim { base }
    }

    fn write(&self, offset: usize, val: u32) {
        unsafe { io::write32(self.base + offset, val) }
    }

    fn read(&self, offset: usize) -> u32 {
        unsafe { io::read32(self.base + offset) }
    }

    /// Load `counter` and set the count mode. LOAD0 is raised here so
    /// the value latches; [`start`](Self::start) drops it again.
    pub fn configure(&self, counter: u32, mode: TimCsr) {
        self.write(TIM_TLR, counter);
        self.write(TIM_CSR, (mode | TimCsr::LOAD0).bits());
    }

    pub fn enable_interrupt(&self) {
        let csr = self.read(TIM_CSR);
        self.write(TIM_CSR, csr | TimCsr::ENIT0.bits());
    }

    /// Lower LOAD0 (the counter will not move otherwise) and enable.
    pub fn start(&self) {
        let csr = self.read(TIM_CSR);
        self.write(TIM_CSR, (csr & !TimCsr::LOAD0.bits()) | TimCsr::ENT0.bits());
    }

    /// Acknowledge a pending interrupt: T0INT clears on write-back.
    pub fn clear_interrupt(&self) {
        let csr = self.read(TIM_CSR);
        self.write(TIM_CSR, csr | TimCsr::T0INT.bits());
    }

    pub fn counter(&self) -> u32 {
        self.read(TIM_TCR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_tim() -> (Vec<u32>, Tim) {
        let space = vec![0u32; 3];
        let tim = unsafe { Tim::new(space.as_ptr() as usize) };
        (space, tim)
    }

    #[test]
    fn one_second_blink_setup() {
        let (space, tim) = mock_tim();
        // 20 MHz clock, one second
        tim.configure(20_000_000, TimCsr::UDT0 | TimCsr::ARHT0);
        assert_eq!(space[TIM_TLR / 4], 0x1312d00);
        assert_eq!(
            space[TIM_CSR / 4],
            (TimCsr::UDT0 | TimCsr::ARHT0 | TimCsr::LOAD0).bits()
        );

        tim.enable_interrupt();
        tim.start();
        let csr = TimCsr::from_bits_truncate(space[TIM_CSR / 4]);
        assert!(!csr.contains(TimCsr::LOAD0), "LOAD0 must drop on start");
        assert!(csr.contains(TimCsr::UDT0 | TimCsr::ARHT0 | TimCsr::ENIT0 | TimCsr::ENT0));
    }

    #[test]
    fn clear_interrupt_writes_back_t0int() {
        let (space, tim) = mock_tim();
        tim.configure(100, TimCsr::empty());
        tim.clear_interrupt();
        assert!(TimCsr::from_bits_truncate(space[TIM_CSR / 4]).contains(TimCsr::T0INT));
    }

    #[test]
    fn counter_reads_tcr() {
        let (mut space, tim) = mock_tim();
        space[TIM_TCR / 4] = 1234;
        assert_eq!(tim.counter(), 1234);
    }
}
