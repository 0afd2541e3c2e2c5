use crate::config;
use core::sync::atomic::{AtomicUsize, Ordering};
use hal::gpio::{Gpio, Pins};
use hal::irq::{IrqSource, IrqTable};
use hal::plic::Plic;
use hal::tim::{Tim, TimCsr};
use hal::vector::VectorTable;
use lazy_static::lazy_static;
use riscv::register::{mcause, mepc, mtvec};

extern "C" {
    /* entry.asm: the writable 32-slot jump table and the register-save
     * trampolines. Each trampoline forwards to the matching handler
     * below and leaves with mret. */
    static _vector_table: u32;
    fn _sw_vector();
    fn _tim_vector();
    fn _ext_vector();
}

static PLIC: Plic = unsafe { Plic::new(config::PLIC_BASE, config::EXT_SOURCES) };
static GPIO_IN: Gpio = unsafe { Gpio::new(config::GPIO_IN_BASE) };
static GPIO_OUT: Gpio = unsafe { Gpio::new(config::GPIO_OUT_BASE) };
static TIM0: Tim = unsafe { Tim::new(config::TIM0_BASE) };

static TICKS: AtomicUsize = AtomicUsize::new(0);

/* Per-line acknowledgment actions. Status pins on the output block make
 * serviced interrupts visible on the board leds. */

struct GpioInLine;

impl IrqSource for GpioInLine {
    fn acknowledge(&self) {
        GPIO_OUT.toggle(Pins::PIN_0);
        GPIO_IN.clear_interrupt();
    }
}

struct Tim0Line;

impl IrqSource for Tim0Line {
    fn acknowledge(&self) {
        GPIO_OUT.toggle(Pins::PIN_1);
        TIM0.clear_interrupt();
        TICKS.fetch_add(1, Ordering::Relaxed);
    }
}

static GPIO_IN_LINE: GpioInLine = GpioInLine;
static TIM0_LINE: Tim0Line = Tim0Line;

lazy_static! {
    static ref IRQ_TABLE: IrqTable<'static> = {
        let mut table = IrqTable::new(&PLIC);
        table.register(config::GPIO_IN_IRQ, &GPIO_IN_LINE);
        table.register(config::TIM0_IRQ, &TIM0_LINE);
        table
    };
}

/// Timer interrupts serviced since boot.
pub fn ticks() -> usize {
    TICKS.load(Ordering::Relaxed)
}

pub fn init() {
    let table = unsafe { VectorTable::new(&_vector_table as *const u32 as usize) };

    let entries = [
        (config::SW_ENTRY, _sw_vector as usize),
        (config::TIM_ENTRY, _tim_vector as usize),
        (config::EXT_ENTRY, _ext_vector as usize),
    ];
    print!("vector slots:");
    for &(cause, target) in entries.iter() {
        /* A slot that cannot be patched would trap to the fault stop on
         * first use; give up at boot, where the console still works. */
        if let Err(err) = table.install(cause, target) {
            panic!("vector entry {} rejected: {:?}", cause, err);
        }
        if let Some(insn) = table.slot(cause) {
            print!(" {}={:#010x}", cause, insn);
        }
    }
    println!("");

    /* Build the dispatch table while this is still the only thread of
     * control; the first claim must not race its construction. */
    lazy_static::initialize(&IRQ_TABLE);

    unsafe {
        mtvec::write(
            &_vector_table as *const u32 as usize,
            mtvec::TrapMode::Vectored,
        );
    }
}

pub fn configure_devices() {
    /* Every wired line at the same priority: claim order alone decides
     * who is served first. */
    PLIC.configure(&[1, 1, 1]);
    PLIC.enable_all();

    GPIO_IN.set_input(Pins::PIN_0);
    GPIO_IN.enable_interrupt();

    GPIO_OUT.set_output(Pins::PIN_0 | Pins::PIN_1);

    TIM0.configure(config::TIM0_PERIOD, TimCsr::UDT0 | TimCsr::ARHT0);
    TIM0.enable_interrupt();
    TIM0.start();
}

#[no_mangle]
pub extern "C" fn _sw_handler() {
    // no software interrupts are raised on this SoC
}

#[no_mangle]
pub extern "C" fn _tim_handler() {
    /* The AXI timer interrupts through the PLIC, not the core TIM line;
     * nothing arrives here. */
}

#[no_mangle]
pub extern "C" fn _ext_handler() {
    /* The core keeps interrupts disabled for the whole trap: one claim,
     * one device acknowledgment, one completion, then mret. */
    IRQ_TABLE.dispatch();
}

#[no_mangle]
pub extern "C" fn _fault_handler() -> ! {
    panic!(
        "unhandled trap: mcause={:#x} mepc={:#x}",
        mcause::read().bits(),
        mepc::read()
    );
}
