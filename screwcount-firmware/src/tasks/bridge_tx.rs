//! Bridge UART transmit task
//!
//! Writes encoded commands to the network bridge in the order the
//! controller queued them.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use screwcount_protocol::frame::MAX_FRAME_SIZE;

use crate::channels::BRIDGE_OUT;

/// Bridge TX task - drains the outbound frame queue
#[embassy_executor::task]
pub async fn bridge_tx_task(mut tx: BufferedUartTx) {
    info!("Bridge TX task started");

    let mut buf = [0u8; MAX_FRAME_SIZE];

    loop {
        let frame = BRIDGE_OUT.receive().await;

        let len = match frame.encode(&mut buf) {
            Ok(len) => len,
            Err(e) => {
                warn!("Failed to encode bridge frame: {:?}", e);
                continue;
            }
        };

        match tx.write_all(&buf[..len]).await {
            Ok(()) => trace!("Bridge TX: type {=u8:#x}, {} bytes", frame.msg_type, len),
            Err(e) => warn!("Bridge UART write error: {:?}", e),
        }
    }
}
