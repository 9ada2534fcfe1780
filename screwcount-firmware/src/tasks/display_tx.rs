//! Display UART transmit task
//!
//! Sends screen updates to the text display.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use screwcount_display::Screen;

use crate::channels::{SCREEN_BUFFER, SCREEN_UPDATE};
use crate::display::FrameBackend;

/// Display TX task - redraws the display whenever the screen changes
#[embassy_executor::task]
pub async fn display_tx_task(mut tx: BufferedUartTx) {
    info!("Display TX task started");

    let mut backend = FrameBackend::new();

    loop {
        SCREEN_UPDATE.wait().await;

        // Copy out so the controller is never blocked on the UART
        let mut screen: Screen = SCREEN_BUFFER.lock(|screen| screen.borrow().clone());

        if let Err(e) = screen.render_to(&mut backend) {
            warn!("Failed to encode screen: {:?}", e);
            continue;
        }

        if let Err(e) = tx.write_all(backend.bytes()).await {
            warn!("Failed to send screen frames: {:?}", e);
            continue;
        }

        trace!("Screen update sent ({} bytes)", backend.bytes().len());
    }
}
