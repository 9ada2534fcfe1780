//! Screwcount - Screw Counting Fixture Firmware
//!
//! Main firmware binary for RP2040-based counting stations. A proximity
//! sensor counts screws against a target received from an MQTT broker,
//! reached through a network bridge co-processor on UART1. Progress is shown
//! on a text display on UART0.

#![no_std]
#![no_main]

mod channels;
mod config;
mod display;
mod link;
mod tasks;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use screwcount_hal_rp2040::{board_buttons, RpInput};

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

// Static cells for UART buffers (must live forever)
static DISPLAY_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static DISPLAY_RX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static BRIDGE_TX_BUF: StaticCell<[u8; 1280]> = StaticCell::new();
static BRIDGE_RX_BUF: StaticCell<[u8; 1280]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Screwcount firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();

    // Display link on UART0 (GPIO0 TX, GPIO1 RX), 115200 baud default
    let display_uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default())
        .into_buffered::<UART0>(
            Irqs,
            DISPLAY_TX_BUF.init([0u8; 256]),
            DISPLAY_RX_BUF.init([0u8; 16]),
        );
    let (display_tx, _display_rx) = display_uart.split();

    // Network bridge on UART1 (GPIO8 TX, GPIO9 RX)
    let bridge_uart = Uart::new_blocking(p.UART1, p.PIN_8, p.PIN_9, UartConfig::default())
        .into_buffered::<UART1>(
            Irqs,
            BRIDGE_TX_BUF.init([0u8; 1280]),
            BRIDGE_RX_BUF.init([0u8; 1280]),
        );
    let (bridge_tx, bridge_rx) = bridge_uart.split();

    info!("UARTs initialized for display and bridge");

    // Proximity sensor on GPIO2, buttons on GPIO14 (start) and GPIO15 (menu)
    let sensor = RpInput::pull_up(p.PIN_2);
    let buttons = board_buttons(p.PIN_14, p.PIN_15);

    // Spawn tasks
    spawner.spawn(tasks::display_tx_task(display_tx)).unwrap();
    spawner.spawn(tasks::bridge_tx_task(bridge_tx)).unwrap();
    spawner.spawn(tasks::bridge_rx_task(bridge_rx)).unwrap();
    spawner
        .spawn(tasks::controller_task(config, sensor, buttons))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
