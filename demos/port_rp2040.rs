//! BME280 polling demo for the Raspberry Pi Pico.
//!
//! Wiring (4-wire SPI, SPI0 at 0.5 MHz):
//!   GPIO 16 (pin 21) MISO/spi0_rx  -> SDO on the bme280 board
//!   GPIO 17 (pin 22) chip select   -> CSB/!CS
//!   GPIO 18 (pin 24) SCK/spi0_sclk -> SCL/SCK
//!   GPIO 19 (pin 25) MOSI/spi0_tx  -> SDA/SDI
//!   3.3v (pin 36) -> VCC, GND (pin 38) -> GND
//! Console on UART0 (GPIO 0/1) at 115200 baud.

#![no_std]
#![no_main]

use embedded_hal::blocking::delay::DelayMs;
use fugit::RateExtU32;
use hal::pac;
use hal::uart::{DataBits, StopBits, UartConfig};
use hal::Clock;
use rp_pico::entry;

use panic_halt as _;
use rp2040_hal as hal;

use bme280_spi::println;
use bme280_spi::uart_log::UART_TX;
use bme280_spi::{BME280, CHIP_ID};

const POLL_INTERVAL_MS: u32 = 250;

#[entry]
fn main() -> ! {
    let mut pac = pac::Peripherals::take().unwrap();
    let core = pac::CorePeripherals::take().unwrap();
    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);
    let clocks = hal::clocks::init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let delay = cortex_m::delay::Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());
    let mut timer = hal::Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    let sio = hal::Sio::new(pac.SIO);

    let pins = rp_pico::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let uart_pins = (pins.gpio0.reconfigure(), pins.gpio1.reconfigure());
    let uart = hal::uart::UartPeripheral::new(pac.UART0, uart_pins, &mut pac.RESETS)
        .enable(
            UartConfig::new(115200.Hz(), DataBits::Eight, None, StopBits::One),
            clocks.peripheral_clock.freq(),
        )
        .unwrap();

    let (_, uart_tx) = uart.split();

    critical_section::with(|_| unsafe {
        UART_TX = Some(uart_tx);
    });

    println!("Hello, bme280! Reading sensor data via SPI...");

    let spi_mosi = pins.gpio19.into_function::<hal::gpio::FunctionSpi>();
    let spi_miso = pins.gpio16.into_function::<hal::gpio::FunctionSpi>();
    let spi_sclk = pins.gpio18.into_function::<hal::gpio::FunctionSpi>();
    let spi = hal::spi::Spi::<_, _, _, 8>::new(pac.SPI0, (spi_mosi, spi_miso, spi_sclk));

    let cs = pins.gpio17.into_push_pull_output();

    let spi = spi.init(
        &mut pac.RESETS,
        clocks.peripheral_clock.freq(),
        500.kHz(),
        embedded_hal::spi::MODE_0,
    );

    let mut bme280 = match BME280::init(spi, cs, delay) {
        Ok(device) => device,
        Err(_) => {
            println!("BME280 initialization failed.");
            loop {
                cortex_m::asm::wfi();
            }
        }
    };

    let id = bme280.chip_id();
    if id == CHIP_ID {
        println!("Chip ID is 0x{:x}\r\n", id);
    } else {
        // compatible clones answer with other ids and still measure
        println!("Warning: chip ID 0x{:x}, expected 0x{:x}\r\n", id, CHIP_ID);
    }

    loop {
        match bme280.measure() {
            Ok(m) => {
                println!("Humidity = {:.2}%", m.humidity as f32 / 1024.0);
                println!("Pressure = {}Pa", m.pressure);
                println!("Temp. = {:.2}C\r\n", m.temperature as f32 / 100.0);
            }
            Err(_) => println!("Sensor read failed, retrying next cycle.\r\n"),
        }

        timer.delay_ms(POLL_INTERVAL_MS);
    }
}
