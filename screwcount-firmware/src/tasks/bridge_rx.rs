//! Bridge UART receive task
//!
//! Receives frames from the network bridge and dispatches link events.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use screwcount_core::channel::InboundMessage;
use screwcount_protocol::{FrameParser, LinkEvent};

use crate::channels::{CONNACK, INBOUND, LINK_UP};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Bridge RX task - receives and parses frames from the network bridge
#[embassy_executor::task]
pub async fn bridge_rx_task(mut rx: BufferedUartRx) {
    info!("Bridge RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("Bridge RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match LinkEvent::from_frame(&frame) {
                            Ok(event) => handle_link_event(event),
                            Err(e) => warn!("Failed to parse link event: {:?}", e),
                        },
                        Ok(None) => {}
                        Err(e) => warn!("Frame parse error: {:?}", e),
                    }
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Bridge UART read error: {:?}", e),
        }
    }
}

/// Handle a parsed link event
fn handle_link_event(event: LinkEvent) {
    match event {
        LinkEvent::ConnAck { accepted } => {
            debug!("CONNACK accepted={}", accepted);
            CONNACK.signal(accepted);
        }
        LinkEvent::Message { topic, payload } => {
            let msg = InboundMessage::new(&topic, &payload);
            if INBOUND.try_send(msg).is_err() {
                warn!("Inbound queue full, dropping message on {}", topic.as_str());
            }
        }
        LinkEvent::LinkDown => {
            warn!("Bridge reports broker link down");
            LINK_UP.store(false, Ordering::Release);
        }
    }
}
