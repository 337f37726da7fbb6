//! 4-wire SPI register protocol and the acquisition driver.

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::blocking::spi::{Transfer, Write};
use embedded_hal::digital::v2::OutputPin;

use super::calibration::Calibration;
use super::compensation;
use super::{Error, Measurements};

use super::{CALIB_H_REG, CALIB_TP_REG, ID_REG, PRESS_MSB_REG, READ_BIT};
use super::{CTRL_HUM_REG, CTRL_HUM_WDATA, CTRL_MEAS_REG, CTRL_MEAS_WDATA};
use super::{RESET_CMD, RESET_REG};

// t_startup per datasheet: 2 ms until the device accepts transactions.
const STARTUP_DELAY_US: u32 = 2_000;
const RESET_DELAY_US: u32 = 2_000;

/// The register read/write framing. Chip-select brackets exactly one
/// transaction and returns to the idle (high) level on every exit path,
/// transport errors included.
pub struct SpiInterface<SPI, CS> {
    pub(crate) spi: SPI,
    pub(crate) cs: CS,
}

impl<SPI, CS, SpiE, PinE> SpiInterface<SPI, CS>
where
    SPI: Transfer<u8, Error = SpiE> + Write<u8, Error = SpiE>,
    CS: OutputPin<Error = PinE>,
{
    fn select(&mut self) -> Result<(), Error<SpiE, PinE>> {
        self.cs.set_low().map_err(Error::ChipSelect)
    }

    fn deselect(&mut self) -> Result<(), Error<SpiE, PinE>> {
        self.cs.set_high().map_err(Error::ChipSelect)
    }

    /// Burst-reads `buffer.len()` consecutive registers starting at
    /// `start`. One transmitted byte, `start | READ_BIT`, then the
    /// response; the buffer contents are clocked out as don't-care
    /// bytes, so callers pass it zeroed.
    pub fn read_registers(
        &mut self,
        start: u8,
        buffer: &mut [u8],
    ) -> Result<(), Error<SpiE, PinE>> {
        self.select()?;
        let exchanged = self
            .spi
            .write(&[start | READ_BIT])
            .and_then(|_| self.spi.transfer(buffer).map(|_| ()))
            .map_err(Error::Transport);
        let released = self.deselect();
        exchanged.and(released)
    }

    /// Writes one register: `[register & 0x7f, value]`, no read bit.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<SpiE, PinE>> {
        self.select()?;
        let written = self
            .spi
            .write(&[register & !READ_BIT, value])
            .map_err(Error::Transport);
        let released = self.deselect();
        written.and(released)
    }
}

/// One BME280 behind one chip-select line. Owns the bus, the pin, the
/// delay and the calibration set for the life of the process; the
/// calibration is loaded before the handle exists, so compensation can
/// never run against an unpopulated set.
pub struct BME280<SPI, CS, D> {
    interface: SpiInterface<SPI, CS>,
    delay: D,
    calibration: Calibration,
    chip_id: u8,
}

impl<SPI, CS, D, SpiE, PinE> BME280<SPI, CS, D>
where
    SPI: Transfer<u8, Error = SpiE> + Write<u8, Error = SpiE>,
    CS: OutputPin<Error = PinE>,
    D: DelayUs<u32>,
{
    /// Brings the sensor up: chip-select idled, start-up wait, chip id
    /// read (soft check, see [`chip_id`](Self::chip_id)), calibration
    /// load, then humidity oversampling (0xf2) and the remaining
    /// oversampling plus normal run mode (0xf4).
    pub fn init(spi: SPI, cs: CS, mut delay: D) -> Result<Self, Error<SpiE, PinE>> {
        let mut interface = SpiInterface { spi, cs };
        interface.deselect()?;
        delay.delay_us(STARTUP_DELAY_US);

        let mut id = [0u8; 1];
        interface.read_registers(ID_REG, &mut id)?;

        let calibration = load_calibration(&mut interface)?;

        interface.write_register(CTRL_HUM_REG, CTRL_HUM_WDATA)?;
        interface.write_register(CTRL_MEAS_REG, CTRL_MEAS_WDATA)?;

        Ok(Self {
            interface,
            delay,
            calibration,
            chip_id: id[0],
        })
    }

    /// The id byte read at init. A genuine part reports
    /// [`CHIP_ID`](crate::bme280::CHIP_ID); some clones answer with
    /// other values and still measure fine, so the caller decides
    /// whether to warn.
    pub fn chip_id(&self) -> u8 {
        self.chip_id
    }

    /// Runs one acquisition cycle: one 8-byte burst read at 0xf7,
    /// raw-code decode, then compensation. Temperature is compensated
    /// first because pressure and humidity consume its t_fine output;
    /// the order is a data dependency, not a style choice. A failed
    /// burst read aborts the whole cycle, no partial reading.
    pub fn measure(&mut self) -> Result<Measurements, Error<SpiE, PinE>> {
        let mut data = [0u8; 8];
        self.interface.read_registers(PRESS_MSB_REG, &mut data)?;

        // 20-bit codes packed msb/lsb/xlsb, low nibble of xlsb unused
        let adc_p = (data[0] as u32) << 12 | (data[1] as u32) << 4 | (data[2] as u32) >> 4;
        let adc_t = (data[3] as u32) << 12 | (data[4] as u32) << 4 | (data[5] as u32) >> 4;
        let adc_h = (data[6] as u32) << 8 | data[7] as u32;

        let (temperature, t_fine) = compensation::temperature(&self.calibration, adc_t as i32);
        let pressure = compensation::pressure(&self.calibration, t_fine, adc_p as i32);
        let humidity = compensation::humidity(&self.calibration, t_fine, adc_h as i32);

        Ok(Measurements {
            temperature,
            pressure,
            humidity,
        })
    }

    /// Soft reset (0xe0 = 0xb6) followed by re-configuration. The
    /// calibration coefficients live in NVM and survive the reset, only
    /// the control registers need rewriting.
    pub fn reset(&mut self) -> Result<(), Error<SpiE, PinE>> {
        self.interface.write_register(RESET_REG, RESET_CMD)?;
        self.delay.delay_us(RESET_DELAY_US);
        self.interface.write_register(CTRL_HUM_REG, CTRL_HUM_WDATA)?;
        self.interface.write_register(CTRL_MEAS_REG, CTRL_MEAS_WDATA)?;
        Ok(())
    }

    /// Hands the bus, pin and delay back.
    pub fn release(self) -> (SPI, CS, D) {
        (self.interface.spi, self.interface.cs, self.delay)
    }
}

fn load_calibration<SPI, CS, SpiE, PinE>(
    interface: &mut SpiInterface<SPI, CS>,
) -> Result<Calibration, Error<SpiE, PinE>>
where
    SPI: Transfer<u8, Error = SpiE> + Write<u8, Error = SpiE>,
    CS: OutputPin<Error = PinE>,
{
    let mut tp = [0u8; 26];
    interface.read_registers(CALIB_TP_REG, &mut tp)?;
    let mut h = [0u8; 7];
    interface.read_registers(CALIB_H_REG, &mut h)?;
    Ok(Calibration::from_registers(&tp, &h))
}
