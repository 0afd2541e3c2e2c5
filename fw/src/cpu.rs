use core::arch::asm;
use riscv::register::{mcycle, mie, mstatus};

pub fn intr_on() {
    unsafe { mstatus::set_mie() };
}

pub fn intr_off() {
    unsafe { mstatus::clear_mie() };
}

pub fn extint_on() {
    unsafe { mie::set_mext() };
}

pub fn cycles() -> usize {
    mcycle::read()
}

pub fn enable_counters() {
    // let mcycle run: clear every inhibit bit
    unsafe {
        asm!("csrw mcountinhibit, zero");
    }
}
