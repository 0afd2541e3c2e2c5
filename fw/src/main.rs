#![no_std] // Disables all standard library
#![no_main] // Disables emitting the main symbol

use core::arch::global_asm;

global_asm!(include_str!("asm/entry.asm"));

#[macro_use]
mod console;

mod config;
mod cpu;
mod lock;
mod panic;
mod trap;

#[no_mangle] // Disables Rust to change the symbol name
pub extern "C" fn fw_main() -> ! {
    console::init();
    cpu::enable_counters();
    info!("SoC up, wiring the interrupt path");

    trap::init();
    trap::configure_devices();

    // everything is armed; open the gate
    cpu::extint_on();
    cpu::intr_on();
    info!("interrupts enabled, timer ticking at 1 Hz");

    let mut reported = 0;
    loop {
        unsafe { riscv::asm::wfi() };
        let ticks = trap::ticks();
        if ticks != reported {
            reported = ticks;
            println!("tick {} ({} cycles since reset)", ticks, cpu::cycles());
        }
    }
}
