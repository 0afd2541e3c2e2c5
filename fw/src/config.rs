/* The crossbar configuration fixes every peripheral window; the values
 * here must match the generated address map the bitstream was built
 * with. */

// Peripheral base addresses
pub const UART_BASE: usize = 0x1_0000;
pub const GPIO_OUT_BASE: usize = 0x2_0000;
pub const GPIO_IN_BASE: usize = 0x3_0000;
pub const TIM0_BASE: usize = 0x4_0000;
pub const PLIC_BASE: usize = 0x400_0000;

// PLIC source ids of the wired lines (source 0 is reserved)
pub const GPIO_IN_IRQ: usize = 1;
pub const TIM0_IRQ: usize = 2;
// Lines physically connected to the PLIC
pub const EXT_SOURCES: usize = 3;

// Vector table slots for the machine interrupt causes
pub const SW_ENTRY: usize = 3;
pub const TIM_ENTRY: usize = 7;
pub const EXT_ENTRY: usize = 11;

// One second of timer counts at the 20 MHz system clock
pub const TIM0_PERIOD: u32 = 20_000_000;
