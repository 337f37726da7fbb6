#![cfg_attr(not(test), no_std)]

pub mod bme280;
#[cfg(feature = "rp2040")]
pub mod uart_log;

pub use bme280::spi::BME280;
pub use bme280::{Error, Measurements, CHIP_ID};
