//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod bridge_rx;
pub mod bridge_tx;
pub mod controller;
pub mod display_tx;

pub use bridge_rx::bridge_rx_task;
pub use bridge_tx::bridge_tx_task;
pub use controller::controller_task;
pub use display_tx::display_tx_task;
