// print! / println! over UART0 for the board demo.
// The board code initializes the peripheral and parks the transmit half
// in UART_TX; until that happens the macros silently drop their output.

use core::fmt;
use core::fmt::Write;
use embedded_hal::prelude::_embedded_hal_serial_Write;
use rp2040_hal as hal;
use rp2040_hal::gpio::bank0::{Gpio0, Gpio1};
use rp2040_hal::pac;

pub static mut UART_TX: Option<hal::uart::Writer<pac::UART0, UartPins>> = None;

pub type UartPins = (
    hal::gpio::Pin<Gpio0, hal::gpio::FunctionUart, hal::gpio::PullNone>,
    hal::gpio::Pin<Gpio1, hal::gpio::FunctionUart, hal::gpio::PullNone>,
);

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::uart_log::_print(format_args!($($arg)*)));
}

#[macro_export]
macro_rules! println {
    ($fmt:expr) => ($crate::print!(concat!($fmt, "\n")));
    ($fmt:expr, $($arg:tt)*) => ($crate::print!(concat!($fmt, "\n"), $($arg)*));
}

pub fn _print(args: fmt::Arguments) {
    let mut writer = UartWriter {};
    let _ = writer.write_fmt(args);
}

struct UartWriter;

impl core::fmt::Write for UartWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.bytes() {
            write_byte(c);
        }
        Ok(())
    }
}

fn write_byte(c: u8) {
    unsafe {
        if let Some(ref mut writer) = UART_TX.as_mut() {
            let _ = nb::block!(writer.write(c));
        }
    }
}
