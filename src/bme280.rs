//! BME280 driver core.
//!
//! The register protocol, calibration model and compensation engine are
//! independent of any particular board; the bus, chip-select pin and
//! delay are injected through `embedded-hal` traits.

pub mod calibration;
pub mod compensation;
pub mod spi;

/// OR-ed into the register address byte for read framing. Write framing
/// clears it instead.
const READ_BIT: u8 = 0x80;

const ID_REG: u8 = 0xd0;
/// Chip id reported by a genuine BME280. Some compatible clones report
/// other values, so a mismatch is a warning, not a failure.
pub const CHIP_ID: u8 = 0x60;

const RESET_REG: u8 = 0xe0;
const RESET_CMD: u8 = 0xb6;

const OSRS_H: u8 = 0x1; // humidity x1 sampling
const CTRL_HUM_WDATA: u8 = OSRS_H;

const OSRS_T: u8 = 0x1; // temperature x1 sampling
const OSRS_P: u8 = 0x1; // pressure x1 sampling
const MODE_NORMAL: u8 = 0x3;
const CTRL_MEAS_WDATA: u8 = OSRS_T << 5 | OSRS_P << 2 | MODE_NORMAL;

const CTRL_HUM_REG: u8 = 0xf2;
const CTRL_MEAS_REG: u8 = 0xf4;

// dig_T1..dig_P9 plus dig_H1 at 0xa1, one reserved byte at 0xa0 in between
const CALIB_TP_REG: u8 = 0x88;
// dig_H2..dig_H6 at 0xe1..0xe7
const CALIB_H_REG: u8 = 0xe1;
const PRESS_MSB_REG: u8 = 0xf7;

/// Errors surfaced by the driver. Neither variant is retried internally;
/// the polling loop decides whether to try again on its next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<SpiE, PinE> {
    /// The bus exchange failed.
    Transport(SpiE),
    /// The chip-select pin could not be driven.
    ChipSelect(PinE),
}

/// One compensated reading, in the fixed-point units of the Bosch
/// reference algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurements {
    /// Temperature in 0.01 degC.
    pub temperature: i32,
    /// Pressure in Pa.
    pub pressure: u32,
    /// Relative humidity in 1/1024 %RH.
    pub humidity: u32,
}
