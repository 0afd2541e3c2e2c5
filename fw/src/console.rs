use crate::config;
use crate::lock::Locked;
use core::fmt::{self, Error, Write};
use hal::uart::Uart;

static UART: Locked<Uart> = Locked::new(unsafe { Uart::new(config::UART_BASE) });

pub fn init() {
    UART.lock().init();
}

struct Stdout;

impl Write for Stdout {
    fn write_str(&mut self, out: &str) -> Result<(), Error> {
        let uart = UART.lock();
        for c in out.bytes() {
            uart.put(c);
        }
        Ok(())
    }
}

pub fn print(args: fmt::Arguments) {
    Stdout.write_fmt(args).unwrap();
}

macro_rules! print {
    ($fmt: literal $(, $($arg: tt)+)?) => {
        $crate::console::print(format_args!($fmt $(, $($arg)+)?));
    }
}

macro_rules! println {
    ($fmt: literal $(, $($arg: tt)+)?) => {
        $crate::console::print(format_args!(concat!($fmt, "\n") $(, $($arg)+)?));
    }
}

macro_rules! info {
    ($fmt: literal $(, $($arg: tt)+)?) => {
        $crate::console::print(format_args!(concat!("\x1b[1;94m", $fmt, "\x1b[0m\n") $(, $($arg)+)?));
    }
}
