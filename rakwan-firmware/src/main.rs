//! rakwan - LoRaWAN node firmware
//!
//! RP2040 board with a RAK3172 module on UART0. The radio driver runs as
//! two tasks: the UART ingestion loop and the LoRaWAN node logic.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use rakwan_driver::{DriverConfig, Ingest, Radio, ResetTiming};
use rakwan_hal_rp2040::{uart_for_pins, IoRx, IoTx, ResetPin, UartId};

use crate::radio::SharedRadio;

mod config;
mod radio;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// GPIO wiring on this board; radio.toml must agree
const RADIO_TX_GPIO: u8 = 0;
const RADIO_RX_GPIO: u8 = 1;
const RADIO_RESET_GPIO: u8 = 25;

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
// Holds a full RXP2P line plus margin while the ingestion task sleeps
static RX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();

static RADIO: StaticCell<SharedRadio> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("rakwan firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let board = config::load();

    let pins = &board.radio;
    if uart_for_pins(pins.tx_pin, pins.rx_pin) != Some(UartId::Uart0)
        || (pins.tx_pin, pins.rx_pin, pins.reset_pin)
            != (RADIO_TX_GPIO, RADIO_RX_GPIO, RADIO_RESET_GPIO)
    {
        warn!(
            "radio.toml pins (gpio{}, gpio{}, gpio{}) differ from board wiring, using gpio{}/gpio{}/gpio{}",
            pins.tx_pin,
            pins.rx_pin,
            pins.reset_pin,
            RADIO_TX_GPIO,
            RADIO_RX_GPIO,
            RADIO_RESET_GPIO
        );
    }

    // Setup UART0 for the radio link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = board.uart.baudrate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 1024]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART0 initialized at {} baud", board.uart.baudrate);

    // Reset is active low, so idle high
    let reset = ResetPin::new(Output::new(p.PIN_25, Level::High), true);

    let radio: &'static SharedRadio = RADIO.init(Radio::new(
        IoTx::new(tx),
        DriverConfig::from(&board.driver),
    ));
    radio.register_event_callback(radio::on_data);

    // Spawn tasks
    spawner
        .spawn(tasks::radio_rx_task(Ingest::new(radio, IoRx::new(rx))))
        .unwrap();
    spawner
        .spawn(tasks::lorawan_task(
            radio,
            reset,
            ResetTiming::from(&board.driver),
            board.lorawan,
        ))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        let stats = radio.stats();
        debug!(
            "Radio: {} transactions, {} timeouts, {} errors, {} downlinks",
            stats.transactions, stats.timeouts, stats.protocol_errors, stats.data_events
        );
    }
}
